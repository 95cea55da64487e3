//! The streaming scan-and-collect loop.
//!
//! One scan pulls a record stream once, in order, inspecting at most the
//! query's budget of items. Matches are accumulated unbounded during the
//! scan; ranking and truncation happen after it ends, so a high-ranked
//! record seen late still displaces earlier ones in the final results.

use std::time::{Duration, Instant};

use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::predicate;
use crate::progress::ProgressReporter;
use crate::ranking::{self, RankingPolicy};
use crate::source::RecordStream;
use crate::types::{MatchResult, Query, ScanFailure, SearchOutcome};

/// Cancellation and deadline control for one scan.
///
/// Both signals are checked at each iteration boundary; a scan already
/// awaiting the next item notices them when that item arrives.
#[derive(Debug, Clone, Default)]
pub struct ScanControl {
    cancel: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl ScanControl {
    /// A control that never stops the scan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the scan when this token is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Stop the scan at this instant.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop the scan after this long.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Whether either signal has tripped.
    pub fn is_stopped(&self) -> bool {
        if let Some(token) = &self.cancel {
            if token.is_cancelled() {
                return true;
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return true;
            }
        }
        false
    }
}

/// Scan `records` for matches, rank them, and truncate to the query's size.
///
/// The stream is pulled at most `max_items_scanned` times. A mid-stream
/// source error or a tripped control discards all partial matches and
/// reports the failure through the outcome's status; this function itself
/// never fails. Validation is the caller's job.
pub async fn scan(
    mut records: RecordStream,
    query: &Query,
    policy: RankingPolicy,
    control: &ScanControl,
    progress: &ProgressReporter,
) -> SearchOutcome {
    let budget = query.max_items_scanned as u64;
    let mut matches: Vec<MatchResult> = Vec::new();
    let mut scanned: u64 = 0;

    tracing::debug!(budget, question = %query.question, "Starting record scan");

    while scanned < budget {
        if control.is_stopped() {
            tracing::info!(scanned, "Scan cancelled, discarding partial matches");
            return SearchOutcome::failed(ScanFailure::Cancelled);
        }

        let record = match records.next().await {
            Some(Ok(record)) => record,
            Some(Err(e)) => {
                tracing::warn!(scanned, error = %e, "Record source failed mid-scan");
                return SearchOutcome::failed(ScanFailure::Source(e.to_string()));
            }
            None => break,
        };

        scanned += 1;

        if predicate::matches(&record, query) {
            tracing::debug!(
                question = %preview(&record.question_text, 60),
                score = record.score,
                "Match found"
            );
            matches.push(MatchResult::from_record(&record));
        }

        progress.scanned(scanned, budget, matches.len() as u64);
    }

    ranking::rank(&mut matches, policy);

    let total_matches = matches.len();
    matches.truncate(query.max_results);
    progress.finished(scanned, total_matches as u64);

    tracing::debug!(
        scanned,
        matched = total_matches,
        returned = matches.len(),
        "Scan complete"
    );

    SearchOutcome::done(matches)
}

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MemorySource, RecordSource};
    use crate::types::{Record, ScanStatus};

    fn record(question: &str, score: i64) -> Record {
        Record {
            question_text: question.to_string(),
            answer_text: format!("answer to {}", question),
            score,
            ..Record::default()
        }
    }

    #[tokio::test]
    async fn test_scan_empty_source_is_done() {
        let source = MemorySource::new(Vec::new());
        let outcome = scan(
            source.produce(),
            &Query::new("python"),
            RankingPolicy::AcceptedFirst,
            &ScanControl::new(),
            &ProgressReporter::noop(),
        )
        .await;

        assert!(outcome.results.is_empty());
        assert_eq!(outcome.status, ScanStatus::Done);
    }

    #[tokio::test]
    async fn test_scan_respects_budget() {
        let records = (0..50).map(|i| record(&format!("python {}", i), 0)).collect();
        let source = MemorySource::new(records);

        let query = Query::new("python")
            .with_max_items_scanned(10)
            .with_max_results(100);
        let outcome = scan(
            source.produce(),
            &query,
            RankingPolicy::AcceptedFirst,
            &ScanControl::new(),
            &ProgressReporter::noop(),
        )
        .await;

        assert_eq!(outcome.results.len(), 10, "only budgeted items are seen");
        assert_eq!(outcome.status, ScanStatus::Done);
    }

    #[tokio::test]
    async fn test_scan_truncates_to_max_results() {
        let records = (0..10).map(|i| record(&format!("python {}", i), i)).collect();
        let source = MemorySource::new(records);

        let query = Query::new("python").with_max_results(3);
        let outcome = scan(
            source.produce(),
            &query,
            RankingPolicy::ScoreOnly,
            &ScanControl::new(),
            &ProgressReporter::noop(),
        )
        .await;

        assert_eq!(outcome.results.len(), 3);
        // Ranked by score descending before truncation
        assert_eq!(outcome.results[0].score, 9);
        assert_eq!(outcome.results[2].score, 7);
    }

    #[tokio::test]
    async fn test_cancelled_scan_discards_partial_matches() {
        let records = (0..10).map(|i| record(&format!("python {}", i), 0)).collect();
        let source = MemorySource::new(records);

        let token = CancellationToken::new();
        token.cancel();
        let control = ScanControl::new().with_cancellation(token);

        let outcome = scan(
            source.produce(),
            &Query::new("python"),
            RankingPolicy::AcceptedFirst,
            &control,
            &ProgressReporter::noop(),
        )
        .await;

        assert!(outcome.results.is_empty());
        assert_eq!(
            outcome.status,
            ScanStatus::Error(ScanFailure::Cancelled)
        );
        assert_eq!(outcome.status.to_string(), "error: cancelled");
    }

    #[tokio::test]
    async fn test_expired_deadline_cancels_scan() {
        let source = MemorySource::new(vec![record("python", 0)]);
        let control = ScanControl::new().with_deadline(Instant::now() - Duration::from_secs(1));

        let outcome = scan(
            source.produce(),
            &Query::new("python"),
            RankingPolicy::AcceptedFirst,
            &control,
            &ProgressReporter::noop(),
        )
        .await;

        assert_eq!(outcome.status, ScanStatus::Error(ScanFailure::Cancelled));
    }

    #[tokio::test]
    async fn test_source_error_discards_partial_matches() {
        use askstack_core::AppError;

        // One good match, then the stream fails
        let items: Vec<askstack_core::AppResult<Record>> = vec![
            Ok(record("python basics", 5)),
            Err(AppError::Retrieval("connection reset".to_string())),
        ];
        let stream: RecordStream = Box::pin(futures::stream::iter(items));

        let outcome = scan(
            stream,
            &Query::new("python"),
            RankingPolicy::AcceptedFirst,
            &ScanControl::new(),
            &ProgressReporter::noop(),
        )
        .await;

        assert!(outcome.results.is_empty(), "partial matches are discarded");
        match &outcome.status {
            ScanStatus::Error(ScanFailure::Source(message)) => {
                assert!(message.contains("connection reset"));
            }
            other => panic!("expected source failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_progress_events_do_not_affect_results() {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::sync::Arc;

        let records = (0..30).map(|i| record(&format!("python {}", i), 0)).collect();
        let source = MemorySource::new(records);
        let query = Query::new("python").with_max_items_scanned(30);

        let quiet = scan(
            source.produce(),
            &query,
            RankingPolicy::AcceptedFirst,
            &ScanControl::new(),
            &ProgressReporter::noop(),
        )
        .await;

        let events = Arc::new(AtomicU64::new(0));
        let counter = events.clone();
        let reporter = ProgressReporter::new(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .with_interval(10);

        let verbose = scan(
            source.produce(),
            &query,
            RankingPolicy::AcceptedFirst,
            &ScanControl::new(),
            &reporter,
        )
        .await;

        assert!(events.load(Ordering::SeqCst) >= 3, "3 interval ticks + done");
        assert_eq!(quiet.results, verbose.results);
        assert_eq!(quiet.status, verbose.status);
    }
}
