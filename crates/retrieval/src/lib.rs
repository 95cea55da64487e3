//! Streaming search over Q&A record corpora.
//!
//! This crate implements the retrieval half of the askstack backend: a
//! single-pass, budget-bounded scan over a streamed sequence of Q&A records,
//! applying text/tag/score predicates and returning a bounded set of ranked
//! matches. Repeated searches are memoized through a small LRU cache.
//!
//! The main entry points are [`StreamingMatcher`] for one-shot searches and
//! [`CachedSearch`] for the memoized variant. Records come from a
//! [`RecordSource`]: an in-memory list, a local JSON file, or the Hugging
//! Face datasets-server rows API.

pub mod cache;
pub mod matcher;
pub mod predicate;
pub mod progress;
pub mod ranking;
pub mod scan;
pub mod source;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use cache::{CacheStats, CachedSearch, DEFAULT_SEARCH_CACHE_SIZE};
pub use matcher::StreamingMatcher;
pub use progress::{ProgressCallback, ProgressEvent, ProgressReporter};
pub use ranking::RankingPolicy;
pub use scan::ScanControl;
pub use source::{HfRowsSource, JsonFileSource, MemorySource, RecordSource, RecordStream};
pub use types::{
    MatchResult, Query, Record, ScanFailure, ScanStatus, SearchError, SearchOutcome,
};
