//! Record, query, and search outcome types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One candidate Q&A entry from a corpus.
///
/// Sources map their wire formats into this model; missing or malformed
/// fields become defaults there, never errors. A record with both text
/// fields empty can never match (see [`crate::predicate::matches`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Question text (the post title for the streamed dataset); may be empty
    pub question_text: String,

    /// Answer text (the post body); may be empty
    pub answer_text: String,

    /// Topic tags; may be empty
    pub tags: Vec<String>,

    /// Vote score; absent in the source becomes 0
    pub score: i64,

    /// Favorite count; only the streamed dataset populates this
    pub favorite_count: i64,

    /// Identifier of the accepted answer, when one exists
    pub accepted_answer_id: Option<u64>,
}

/// A search request over a record corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Text matched case-insensitively as a substring of record text and tags
    pub question: String,

    /// Tags the record must intersect, case-insensitively; empty means no filter
    #[serde(default)]
    pub tags_filter: Vec<String>,

    /// Minimum record score; records below are rejected
    #[serde(default)]
    pub min_score: i64,

    /// How many ranked results to return at most
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// How many source items one scan may inspect
    #[serde(default = "default_max_items_scanned")]
    pub max_items_scanned: usize,
}

fn default_max_results() -> usize {
    3
}

fn default_max_items_scanned() -> usize {
    2000
}

impl Query {
    /// Create a query with default limits.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            tags_filter: Vec::new(),
            min_score: 0,
            max_results: default_max_results(),
            max_items_scanned: default_max_items_scanned(),
        }
    }

    /// Require the record's tags to intersect these tags.
    pub fn with_tags_filter(mut self, tags: Vec<String>) -> Self {
        self.tags_filter = tags;
        self
    }

    /// Set the minimum record score.
    pub fn with_min_score(mut self, min_score: i64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Set the maximum number of returned results.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the scan budget.
    pub fn with_max_items_scanned(mut self, max_items_scanned: usize) -> Self {
        self.max_items_scanned = max_items_scanned;
        self
    }

    /// Reject queries that cannot produce a meaningful search.
    ///
    /// Called before any cache lookup or source pull; an invalid query is an
    /// error, not an empty result.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.question.trim().is_empty() {
            return Err(SearchError::InvalidQuery(
                "question must not be empty".to_string(),
            ));
        }
        if self.max_results == 0 {
            return Err(SearchError::InvalidQuery(
                "max_results must be greater than zero".to_string(),
            ));
        }
        if self.max_items_scanned == 0 {
            return Err(SearchError::InvalidQuery(
                "max_items_scanned must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// One ranked search result, copied out of a matching record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The record's question text, or its answer text when the question is empty
    pub question: String,

    /// The record's answer text
    pub answer: String,

    /// Topic tags
    pub tags: Vec<String>,

    /// Vote score
    pub score: i64,

    /// Favorite count
    pub favorite_count: i64,

    /// Identifier of the accepted answer, when one exists
    pub accepted_answer_id: Option<u64>,
}

impl MatchResult {
    /// Copy the result fields out of a record.
    pub fn from_record(record: &Record) -> Self {
        let question = if record.question_text.is_empty() {
            record.answer_text.clone()
        } else {
            record.question_text.clone()
        };

        Self {
            question,
            answer: record.answer_text.clone(),
            tags: record.tags.clone(),
            score: record.score,
            favorite_count: record.favorite_count,
            accepted_answer_id: record.accepted_answer_id,
        }
    }
}

/// Why a scan ended without results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanFailure {
    /// The record source failed mid-stream
    #[error("{0}")]
    Source(String),

    /// The scan was cancelled or ran past its deadline
    #[error("cancelled")]
    Cancelled,
}

/// Terminal state of one scan.
///
/// Renders as `"done"` or `"error: <message>"`, which is the form the HTTP
/// layer reports to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStatus {
    /// The scan ran to completion and ranking was applied
    Done,

    /// The scan was abandoned; partial matches were discarded
    Error(ScanFailure),
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanStatus::Done => write!(f, "done"),
            ScanStatus::Error(failure) => write!(f, "error: {}", failure),
        }
    }
}

/// Results and terminal status of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Ranked matches, at most `max_results` of them; empty on failure
    pub results: Vec<MatchResult>,

    /// How the underlying scan ended
    pub status: ScanStatus,
}

impl SearchOutcome {
    /// A completed search with ranked results.
    pub fn done(results: Vec<MatchResult>) -> Self {
        Self {
            results,
            status: ScanStatus::Done,
        }
    }

    /// A failed search; any partial matches are dropped.
    pub fn failed(failure: ScanFailure) -> Self {
        Self {
            results: Vec::new(),
            status: ScanStatus::Error(failure),
        }
    }

    /// Whether the scan ran to completion.
    pub fn is_done(&self) -> bool {
        self.status == ScanStatus::Done
    }
}

/// Errors reported to the caller instead of a degraded outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The query cannot produce a meaningful search
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl From<SearchError> for askstack_core::AppError {
    fn from(err: SearchError) -> Self {
        askstack_core::AppError::Retrieval(err.to_string())
    }
}
