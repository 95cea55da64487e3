//! Single-pass streaming matcher over a record source.

use std::sync::Arc;

use crate::progress::ProgressReporter;
use crate::ranking::RankingPolicy;
use crate::scan::{self, ScanControl};
use crate::source::RecordSource;
use crate::types::{Query, SearchError, SearchOutcome};

/// Runs validated queries against one record source.
///
/// Every search pulls a fresh stream from the source and scans it once;
/// the matcher holds no corpus state of its own. Wrap it in a
/// [`crate::cache::CachedSearch`] to memoize repeated queries.
pub struct StreamingMatcher {
    source: Arc<dyn RecordSource>,
    policy: RankingPolicy,
    progress: ProgressReporter,
}

impl StreamingMatcher {
    /// Create a matcher with the default ranking policy and silent progress.
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            policy: RankingPolicy::default(),
            progress: ProgressReporter::noop(),
        }
    }

    /// Rank results with this policy.
    pub fn with_policy(mut self, policy: RankingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Report scan progress through this reporter.
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// The ranking policy applied to results.
    pub fn policy(&self) -> RankingPolicy {
        self.policy
    }

    /// The name of the underlying source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Validate `query`, then scan the source for ranked matches.
    ///
    /// Returns `Err` only for an invalid query; scan failures (source
    /// errors, cancellation) come back as the outcome's status with no
    /// partial results.
    pub async fn search(
        &self,
        query: &Query,
        control: &ScanControl,
    ) -> Result<SearchOutcome, SearchError> {
        query.validate()?;

        tracing::info!(
            source = self.source.name(),
            question = %query.question,
            max_results = query.max_results,
            "Starting streaming search"
        );

        let outcome = scan::scan(
            self.source.produce(),
            query,
            self.policy,
            control,
            &self.progress,
        )
        .await;

        if outcome.is_done() {
            tracing::info!(results = outcome.results.len(), "Search complete");
        } else {
            tracing::warn!(status = %outcome.status, "Search failed");
        }

        Ok(outcome)
    }
}
