//! In-process counters for resolution outcomes

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::resolver::{MetadataSource, ResolutionResult};

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    resolved_primary: AtomicU64,
    resolved_fallback: AtomicU64,
    resolution_failures: AtomicU64,
    health_checks: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_resolution(&self, result: &ResolutionResult) {
        let (counter, name) = match (result.success, result.source) {
            (false, _) => (&self.resolution_failures, "resolution_failures"),
            (true, MetadataSource::Primary) => (&self.resolved_primary, "resolved_primary"),
            (true, MetadataSource::Fallback) => (&self.resolved_fallback, "resolved_fallback"),
        };
        counter.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = name, "Metric incremented");
    }

    pub fn health_checked(&self) {
        self.health_checks.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "health_checks", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            resolved_primary: self.resolved_primary.load(Ordering::Relaxed),
            resolved_fallback: self.resolved_fallback.load(Ordering::Relaxed),
            resolution_failures: self.resolution_failures.load(Ordering::Relaxed),
            health_checks: self.health_checks.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub resolved_primary: u64,
    pub resolved_fallback: u64,
    pub resolution_failures: u64,
    pub health_checks: u64,
}
