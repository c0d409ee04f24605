//! Observability: tracing setup and job counters

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "mediafetch=info";

/// Install the global fmt subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second install (tests, embedding) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Metrics handle for recording job counters
#[derive(Debug, Default)]
pub struct Metrics {
    jobs_submitted: AtomicU64,
    jobs_rejected: AtomicU64,
    jobs_succeeded: AtomicU64,
    jobs_failed: AtomicU64,
    probes: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job_submitted(&self) {
        self.jobs_submitted.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "jobs_submitted", "Metric incremented");
    }

    /// Rejected by validation before reaching the backend
    pub fn job_rejected(&self) {
        self.jobs_rejected.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "jobs_rejected", "Metric incremented");
    }

    pub fn job_succeeded(&self) {
        self.jobs_succeeded.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "jobs_succeeded", "Metric incremented");
    }

    pub fn job_failed(&self) {
        self.jobs_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "jobs_failed", "Metric incremented");
    }

    pub fn probe(&self) {
        self.probes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "probes", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            jobs_submitted: self.jobs_submitted.load(Ordering::Relaxed),
            jobs_rejected: self.jobs_rejected.load(Ordering::Relaxed),
            jobs_succeeded: self.jobs_succeeded.load(Ordering::Relaxed),
            jobs_failed: self.jobs_failed.load(Ordering::Relaxed),
            probes: self.probes.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub jobs_submitted: u64,
    pub jobs_rejected: u64,
    pub jobs_succeeded: u64,
    pub jobs_failed: u64,
    pub probes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.job_submitted();
        metrics.job_submitted();
        metrics.job_rejected();
        metrics.job_succeeded();
        metrics.job_failed();
        metrics.probe();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.jobs_submitted, 2);
        assert_eq!(snapshot.jobs_rejected, 1);
        assert_eq!(snapshot.jobs_succeeded, 1);
        assert_eq!(snapshot.jobs_failed, 1);
        assert_eq!(snapshot.probes, 1);
    }
}
