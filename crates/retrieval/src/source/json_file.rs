//! Local JSON file record source.

use std::path::{Path, PathBuf};

use askstack_core::{AppError, AppResult};

use crate::source::{RecordSource, RecordStream};
use crate::types::Record;

/// A source backed by a local JSON file.
///
/// The file holds an array of objects with `question` and `answer` fields;
/// `tags` and `score` are optional. Field-level problems (missing keys,
/// wrong types) become defaults rather than errors, so a partially broken
/// corpus still loads. The file itself being unreadable or not valid JSON
/// is an error.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    records: Vec<Record>,
}

impl JsonFileSource {
    /// Load the file once at construction; streams replay the loaded records.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            AppError::Retrieval(format!("Failed to read data file {:?}: {}", path, e))
        })?;

        let entries: Vec<serde_json::Value> = serde_json::from_str(&contents).map_err(|e| {
            AppError::Retrieval(format!("Failed to parse data file {:?}: {}", path, e))
        })?;

        let records: Vec<Record> = entries.iter().map(record_from_entry).collect();

        tracing::info!(path = ?path, records = records.len(), "Loaded local Q&A data");

        Ok(Self { path, records })
    }

    /// Path this source was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The loaded records, in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records in the file.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the file held no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for JsonFileSource {
    fn name(&self) -> &str {
        "local"
    }

    fn produce(&self) -> RecordStream {
        let records = self.records.clone();
        Box::pin(futures::stream::iter(records.into_iter().map(Ok)))
    }
}

/// Map one JSON entry into a record, defaulting anything malformed.
fn record_from_entry(entry: &serde_json::Value) -> Record {
    Record {
        question_text: entry
            .get("question")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        answer_text: entry
            .get("answer")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        tags: entry
            .get("tags")
            .and_then(|v| v.as_array())
            .map(|tags| {
                tags.iter()
                    .filter_map(|t| t.as_str())
                    .map(|t| t.to_string())
                    .collect()
            })
            .unwrap_or_default(),
        score: entry.get("score").and_then(|v| v.as_i64()).unwrap_or(0),
        favorite_count: 0,
        accepted_answer_id: None,
    }
}
