//! LRU memoization for streaming searches.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use crate::matcher::StreamingMatcher;
use crate::scan::ScanControl;
use crate::types::{MatchResult, Query, SearchError, SearchOutcome};

/// Default number of memoized searches.
pub const DEFAULT_SEARCH_CACHE_SIZE: usize = 128;

/// Canonical cache key for a query.
///
/// `max_results` and `max_items_scanned` are deliberately excluded: they
/// shape how much of the same ranked list is returned, not which records
/// qualify. The question is kept case-sensitive; the predicate lowercases
/// internally, so differing-case questions merely recompute, never
/// return wrong results.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    question: String,
    tags: String,
    min_score: i64,
}

impl CacheKey {
    fn from_query(query: &Query) -> Self {
        let mut tags = query.tags_filter.clone();
        tags.sort();
        Self {
            question: query.question.clone(),
            tags: tags.join(","),
            min_score: query.min_score,
        }
    }
}

/// Hit and miss counters for the search cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// A [`StreamingMatcher`] with an LRU cache in front of it.
///
/// Only completed scans are stored; failures and cancellations are never
/// memoized. Entries live until evicted by capacity, so a long-running
/// process serves results as old as its cache. A hit is truncated to the
/// caller's `max_results`; asking for more results than the cached scan
/// produced returns the cached list as-is.
///
/// The internal locks are held only for lookups and inserts, never across
/// a scan, so a miss on one key does not block searches for other keys.
pub struct CachedSearch {
    matcher: StreamingMatcher,
    entries: Mutex<LruCache<CacheKey, Vec<MatchResult>>>,
    stats: Mutex<CacheStats>,
}

impl CachedSearch {
    /// Wrap a matcher with the default cache capacity.
    pub fn new(matcher: StreamingMatcher) -> Self {
        Self::with_capacity(matcher, DEFAULT_SEARCH_CACHE_SIZE)
    }

    /// Wrap a matcher with an explicit capacity; zero is clamped to one.
    pub fn with_capacity(matcher: StreamingMatcher, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            matcher,
            entries: Mutex::new(LruCache::new(capacity)),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Search through the cache, scanning the source only on a miss.
    ///
    /// Validation runs before the lookup, so an invalid query is an error
    /// even when a matching key is cached.
    pub async fn search(
        &self,
        query: &Query,
        control: &ScanControl,
    ) -> Result<SearchOutcome, SearchError> {
        query.validate()?;

        let key = CacheKey::from_query(query);
        if let Some(mut results) = self.lookup(&key) {
            self.record(true);
            tracing::debug!(question = %query.question, "Search cache hit");
            results.truncate(query.max_results);
            return Ok(SearchOutcome::done(results));
        }
        self.record(false);

        let outcome = self.matcher.search(query, control).await?;
        if outcome.is_done() {
            self.store(key, outcome.results.clone());
        }
        Ok(outcome)
    }

    /// A snapshot of the hit and miss counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.lock().map(|stats| *stats).unwrap_or_default()
    }

    /// Drop every cached entry, keeping the counters.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned lock degrades to a miss rather than wedging searches.
    fn lookup(&self, key: &CacheKey) -> Option<Vec<MatchResult>> {
        let mut entries = self.entries.lock().ok()?;
        entries.get(key).cloned()
    }

    fn store(&self, key: CacheKey, results: Vec<MatchResult>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(key, results);
        }
    }

    fn record(&self, hit: bool) {
        if let Ok(mut stats) = self.stats.lock() {
            if hit {
                stats.hits += 1;
            } else {
                stats.misses += 1;
            }
        }
    }
}
