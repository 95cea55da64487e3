//! Record sources.
//!
//! A source is any corpus that can be opened as an ordered stream of
//! records: an in-memory list, a local JSON file, or the Hugging Face
//! datasets-server rows API. Sources map their own wire formats into
//! [`Record`]; the scan never sees raw wire data.

use std::pin::Pin;

use askstack_core::AppResult;
use futures::Stream;

use crate::types::Record;

pub mod hf_rows;
pub mod json_file;
pub mod memory;

pub use hf_rows::HfRowsSource;
pub use json_file::JsonFileSource;
pub use memory::MemorySource;

/// Stream of records pulled incrementally from a source.
///
/// An `Err` item means the source failed mid-stream; the scan converts it
/// into an error status rather than propagating a panic or retrying.
pub type RecordStream = Pin<Box<dyn Stream<Item = AppResult<Record>> + Send>>;

/// A corpus that can be scanned as an ordered stream of records.
pub trait RecordSource: Send + Sync {
    /// Short name used in logs (e.g. "memory", "local", "stream").
    fn name(&self) -> &str;

    /// Open a fresh stream over the source's records.
    ///
    /// Each call starts from the beginning; sources have no random access
    /// and make no length promises.
    fn produce(&self) -> RecordStream;
}
