//! Request and response bodies for the REST API.

use askstack_retrieval::MatchResult;
use serde::{Deserialize, Serialize};

/// Response body for `GET /`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Request body for `POST /ask`.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// The natural-language question to answer
    #[serde(default)]
    pub question: String,

    /// Which corpus to search: "stream" (the default, "hf" is accepted as an
    /// alias), "local", or "llm" to skip retrieval entirely
    pub source: Option<String>,

    /// Tags matching records must share at least one of
    #[serde(default)]
    pub tags: Vec<String>,

    /// Minimum record score to qualify as a source
    pub min_score: Option<i64>,

    /// Cap on the number of sources returned
    pub max_results: Option<usize>,
}

/// Response body for `POST /ask`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    /// Generated answer, or a fallback when the LLM call failed
    pub answer: String,

    /// Ranked records the answer was grounded on
    pub sources: Vec<MatchResult>,

    /// Whitespace-separated token count of the answer
    pub tokens: usize,

    /// Terminal status of the retrieval scan ("done" or "error: ...")
    pub status: String,
}

/// Response body for `GET /health/dataset`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetHealthResponse {
    pub status: String,
    pub sample_question: String,
    pub sample_answer: String,
}

/// Response body for `GET /stats`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub cache: CacheStatsBody,
}

/// Search cache counters.
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStatsBody {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_request_defaults() {
        let request: AskRequest = serde_json::from_str(r#"{"question": "rust"}"#).unwrap();
        assert_eq!(request.question, "rust");
        assert!(request.source.is_none());
        assert!(request.tags.is_empty());
        assert!(request.min_score.is_none());
        assert!(request.max_results.is_none());
    }

    #[test]
    fn test_ask_request_tolerates_missing_question() {
        let request: AskRequest = serde_json::from_str(r#"{"source": "local"}"#).unwrap();
        assert!(request.question.is_empty());
    }
}
