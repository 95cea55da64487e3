//! In-memory record source.

use crate::source::{RecordSource, RecordStream};
use crate::types::Record;

/// A source backed by an in-memory list of records.
///
/// Used for fixtures and tests; production corpora come from
/// [`crate::source::JsonFileSource`] or [`crate::source::HfRowsSource`].
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<Record>,
}

impl MemorySource {
    /// Create a source over the given records.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Number of records in the source.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the source holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn produce(&self) -> RecordStream {
        let records = self.records.clone();
        Box::pin(futures::stream::iter(records.into_iter().map(Ok)))
    }
}
