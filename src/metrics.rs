// src/metrics.rs
//
// Session observability. Counts what the feed and the detector are
// doing so a run can be summarized in one log line at teardown.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct SessionMetrics {
    pub samples_seen: Arc<AtomicU64>,
    pub samples_rejected: Arc<AtomicU64>,
    pub verdict_changes: Arc<AtomicU64>,
    pub assist_triggers: Arc<AtomicU64>,
    pub assist_successes: Arc<AtomicU64>,
    pub assist_failures: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            samples_seen: Arc::new(AtomicU64::new(0)),
            samples_rejected: Arc::new(AtomicU64::new(0)),
            verdict_changes: Arc::new(AtomicU64::new(0)),
            assist_triggers: Arc::new(AtomicU64::new(0)),
            assist_successes: Arc::new(AtomicU64::new(0)),
            assist_failures: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }

    pub fn inc(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Effective feed rate over the session so far.
    pub fn sample_rate_hz(&self) -> f64 {
        let samples = self.samples_seen.load(Ordering::Relaxed);
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            samples as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            samples_seen: self.samples_seen.load(Ordering::Relaxed),
            samples_rejected: self.samples_rejected.load(Ordering::Relaxed),
            verdict_changes: self.verdict_changes.load(Ordering::Relaxed),
            assist_triggers: self.assist_triggers.load(Ordering::Relaxed),
            assist_successes: self.assist_successes.load(Ordering::Relaxed),
            assist_failures: self.assist_failures.load(Ordering::Relaxed),
            sample_rate_hz: self.sample_rate_hz(),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub samples_seen: u64,
    pub samples_rejected: u64,
    pub verdict_changes: u64,
    pub assist_triggers: u64,
    pub assist_successes: u64,
    pub assist_failures: u64,
    pub sample_rate_hz: f64,
    pub elapsed_secs: f64,
}
