//! Structured progress reporting for record scans.
//!
//! Scans over streamed sources can inspect thousands of items before
//! returning; this module provides observable, incremental feedback while
//! they run. Progress is a side channel only and never affects results.

use std::sync::Arc;
use std::time::Instant;

/// Emit a progress event every this many scanned items by default.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100;

/// Progress event emitted during a scan.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Phase of the operation: "scan" or "done"
    pub phase: String,

    /// Items pulled from the source so far
    pub scanned: u64,

    /// Scan budget, when known
    pub budget: Option<u64>,

    /// Percentage of the budget consumed (0.0 - 100.0)
    pub percentage: Option<f64>,

    /// Human-readable message
    pub message: String,

    /// Elapsed time since the scan started
    pub elapsed_secs: Option<f64>,
}

impl ProgressEvent {
    /// Create a new progress event.
    pub fn new(
        phase: impl Into<String>,
        scanned: u64,
        budget: Option<u64>,
        message: impl Into<String>,
    ) -> Self {
        let percentage = budget.map(|b| {
            if b > 0 {
                (scanned as f64 / b as f64) * 100.0
            } else {
                0.0
            }
        });

        Self {
            phase: phase.into(),
            scanned,
            budget,
            percentage,
            message: message.into(),
            elapsed_secs: None,
        }
    }

    /// Set elapsed time.
    pub fn with_elapsed(mut self, elapsed_secs: f64) -> Self {
        self.elapsed_secs = Some(elapsed_secs);
        self
    }

    /// Format as a simple user-facing line.
    pub fn format_simple(&self) -> String {
        let progress = if let Some(budget) = self.budget {
            format!("{}/{}", self.scanned, budget)
        } else {
            format!("{}", self.scanned)
        };

        let pct = if let Some(p) = self.percentage {
            format!(" ({:.0}%)", p)
        } else {
            String::new()
        };

        format!("[{}] {}{} - {}", self.phase, progress, pct, self.message)
    }
}

/// Callback for progress events.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Progress reporter that emits events through a callback.
#[derive(Clone)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
    interval: u64,
    start_time: Arc<Instant>,
}

impl ProgressReporter {
    /// Create a new reporter with a callback and the default interval.
    pub fn new(callback: ProgressCallback) -> Self {
        Self {
            callback: Some(callback),
            interval: DEFAULT_PROGRESS_INTERVAL,
            start_time: Arc::new(Instant::now()),
        }
    }

    /// Create a no-op reporter (events are logged but go to no callback).
    pub fn noop() -> Self {
        Self {
            callback: None,
            interval: DEFAULT_PROGRESS_INTERVAL,
            start_time: Arc::new(Instant::now()),
        }
    }

    /// Change how many scanned items separate two "scan" events.
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Emit a progress event.
    pub fn emit(&self, event: ProgressEvent) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let event_with_time = event.with_elapsed(elapsed);

        tracing::debug!(
            phase = %event_with_time.phase,
            scanned = event_with_time.scanned,
            budget = ?event_with_time.budget,
            percentage = ?event_with_time.percentage,
            message = %event_with_time.message,
            elapsed_secs = elapsed,
            "Scan progress"
        );

        if let Some(callback) = &self.callback {
            callback(event_with_time);
        }
    }

    /// Report scan progress; emits only at interval boundaries.
    pub fn scanned(&self, scanned: u64, budget: u64, matched: u64) {
        if scanned % self.interval == 0 {
            self.emit(ProgressEvent::new(
                "scan",
                scanned,
                Some(budget),
                format!("{} matches so far", matched),
            ));
        }
    }

    /// Report a finished scan.
    pub fn finished(&self, scanned: u64, matched: u64) {
        self.emit(ProgressEvent::new(
            "done",
            scanned,
            None,
            format!("{} matches", matched),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn capture() -> (ProgressReporter, Arc<Mutex<Vec<ProgressEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::new(Arc::new(move |event| {
            sink.lock().unwrap().push(event);
        }));
        (reporter, events)
    }

    #[test]
    fn test_progress_event_format() {
        let event = ProgressEvent::new("scan", 120, Some(2000), "4 matches so far");
        let formatted = event.format_simple();
        assert!(formatted.contains("[scan]"));
        assert!(formatted.contains("120/2000"));
        assert!(formatted.contains("6%"));
    }

    #[test]
    fn test_scanned_respects_interval() {
        let (reporter, events) = capture();
        let reporter = reporter.with_interval(10);

        for scanned in 1..=25 {
            reporter.scanned(scanned, 100, 0);
        }

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 2, "only multiples of the interval emit");
        assert_eq!(captured[0].scanned, 10);
        assert_eq!(captured[1].scanned, 20);
    }

    #[test]
    fn test_finished_always_emits() {
        let (reporter, events) = capture();
        reporter.finished(7, 2);

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].phase, "done");
        assert_eq!(captured[0].scanned, 7);
        assert!(captured[0].elapsed_secs.is_some());
    }

    #[test]
    fn test_noop_reporter() {
        let reporter = ProgressReporter::noop();
        reporter.scanned(100, 2000, 3); // Should not panic
        reporter.finished(100, 3);
    }
}
