//! Streamed record source over the Hugging Face datasets-server rows API.
//!
//! Rows API: https://huggingface.co/docs/datasets-server/rows

use askstack_core::{AppError, AppResult};
use futures::TryStreamExt;
use serde::Deserialize;

use crate::source::{RecordSource, RecordStream};
use crate::types::Record;

/// Default base URL of the datasets-server.
pub const DEFAULT_HF_ENDPOINT: &str = "https://datasets-server.huggingface.co";

/// Rows fetched per request; the API caps `length` at 100.
const DEFAULT_PAGE_SIZE: usize = 100;

/// Rows API response envelope.
#[derive(Debug, Deserialize)]
struct RowsResponse {
    rows: Vec<RowEntry>,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row: serde_json::Value,
}

/// A source that pages through a hosted dataset, lazily, in row order.
///
/// Rows are fetched one page at a time as the scan pulls the stream, so a
/// budget-bounded scan only downloads the pages it inspects.
#[derive(Debug, Clone)]
pub struct HfRowsSource {
    endpoint: String,
    dataset: String,
    config: String,
    split: String,
    page_size: usize,
    client: reqwest::Client,
}

impl HfRowsSource {
    /// Create a source over a hosted dataset split.
    pub fn new(
        dataset: impl Into<String>,
        config: impl Into<String>,
        split: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: DEFAULT_HF_ENDPOINT.to_string(),
            dataset: dataset.into(),
            config: config.into(),
            split: split.into(),
            page_size: DEFAULT_PAGE_SIZE,
            client: reqwest::Client::new(),
        }
    }

    /// Point the source at a different rows API endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Change the page size (the API rejects lengths above 100).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Fetch one page of rows starting at `offset`.
    async fn fetch_page(&self, offset: usize) -> AppResult<Vec<Record>> {
        let url = format!("{}/rows", self.endpoint);

        tracing::debug!(dataset = %self.dataset, offset, "Fetching dataset rows");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("dataset", self.dataset.as_str()),
                ("config", self.config.as_str()),
                ("split", self.split.as_str()),
            ])
            .query(&[("offset", offset), ("length", self.page_size)])
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to fetch dataset rows: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Retrieval(format!(
                "Rows API error ({}): {}",
                status, error_text
            )));
        }

        let rows: RowsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to parse rows response: {}", e)))?;

        Ok(rows
            .rows
            .iter()
            .map(|entry| record_from_row(&entry.row))
            .collect())
    }
}

impl RecordSource for HfRowsSource {
    fn name(&self) -> &str {
        "stream"
    }

    fn produce(&self) -> RecordStream {
        let source = self.clone();

        // A short page signals the end of the split; `None` stops paging.
        let pages = futures::stream::try_unfold(Some(0usize), move |state| {
            let source = source.clone();
            async move {
                let offset = match state {
                    Some(offset) => offset,
                    None => return Ok::<_, AppError>(None),
                };

                let records = source.fetch_page(offset).await?;
                let next = if records.len() < source.page_size {
                    None
                } else {
                    Some(offset + records.len())
                };

                Ok(Some((
                    futures::stream::iter(records.into_iter().map(Ok)),
                    next,
                )))
            }
        });

        Box::pin(pages.try_flatten())
    }
}

/// Map one dataset row into a record, defaulting anything malformed.
fn record_from_row(row: &serde_json::Value) -> Record {
    Record {
        question_text: row
            .get("Title")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        answer_text: row
            .get("Body")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        tags: row
            .get("Tags")
            .and_then(|v| v.as_array())
            .map(|tags| {
                tags.iter()
                    .filter_map(|t| t.as_str())
                    .map(|t| t.to_string())
                    .collect()
            })
            .unwrap_or_default(),
        score: row.get("Score").and_then(|v| v.as_i64()).unwrap_or(0),
        favorite_count: row
            .get("FavoriteCount")
            .and_then(|v| v.as_i64())
            .unwrap_or(0),
        accepted_answer_id: row.get("AcceptedAnswerId").and_then(|v| v.as_u64()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use httpmock::prelude::*;
    use serde_json::json;

    fn row(title: &str, score: i64) -> serde_json::Value {
        json!({ "row": { "Title": title, "Body": "body", "Tags": [], "Score": score } })
    }

    #[test]
    fn test_record_from_row_maps_fields() {
        let record = record_from_row(&json!({
            "Title": "How do I exit Vim?",
            "Body": "Press :q to quit.",
            "Tags": ["vim", "editor"],
            "Score": 11000,
            "FavoriteCount": 4000,
            "AcceptedAnswerId": 100326
        }));

        assert_eq!(record.question_text, "How do I exit Vim?");
        assert_eq!(record.answer_text, "Press :q to quit.");
        assert_eq!(record.tags, vec!["vim".to_string(), "editor".to_string()]);
        assert_eq!(record.score, 11000);
        assert_eq!(record.favorite_count, 4000);
        assert_eq!(record.accepted_answer_id, Some(100326));
    }

    #[test]
    fn test_record_from_row_defaults_malformed_fields() {
        let record = record_from_row(&json!({
            "Title": null,
            "Tags": "not-a-list",
            "Score": null,
            "AcceptedAnswerId": null
        }));

        assert_eq!(record.question_text, "");
        assert_eq!(record.answer_text, "");
        assert!(record.tags.is_empty());
        assert_eq!(record.score, 0);
        assert_eq!(record.favorite_count, 0);
        assert_eq!(record.accepted_answer_id, None);
    }

    #[tokio::test]
    async fn test_produce_pages_until_short_page() {
        let server = MockServer::start_async().await;

        let first_page = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rows")
                    .query_param("dataset", "org/dataset")
                    .query_param("config", "default")
                    .query_param("split", "train")
                    .query_param("offset", "0")
                    .query_param("length", "2");
                then.status(200)
                    .json_body(json!({ "rows": [row("one", 1), row("two", 2)] }));
            })
            .await;

        let second_page = server
            .mock_async(|when, then| {
                when.method(GET).path("/rows").query_param("offset", "2");
                then.status(200).json_body(json!({ "rows": [row("three", 3)] }));
            })
            .await;

        let source = HfRowsSource::new("org/dataset", "default", "train")
            .with_endpoint(server.base_url())
            .with_page_size(2);

        let records: Vec<Record> = source
            .produce()
            .map(|item| item.unwrap())
            .collect()
            .await;

        first_page.assert_async().await;
        second_page.assert_async().await;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].question_text, "one");
        assert_eq!(records[2].question_text, "three");
    }

    #[tokio::test]
    async fn test_produce_surfaces_api_errors() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/rows");
                then.status(500).body("upstream exploded");
            })
            .await;

        let source = HfRowsSource::new("org/dataset", "default", "train")
            .with_endpoint(server.base_url());

        let first = source.produce().next().await;
        let err = first.expect("stream yields an item").unwrap_err();
        assert!(err.to_string().contains("Rows API error"));
    }

    #[tokio::test]
    async fn test_empty_split_yields_no_records() {
        let server = MockServer::start_async().await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/rows");
                then.status(200).json_body(json!({ "rows": [] }));
            })
            .await;

        let source = HfRowsSource::new("org/dataset", "default", "train")
            .with_endpoint(server.base_url());

        assert_eq!(source.produce().count().await, 0);
    }
}
