//! Request and mutation counters
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Registry of operational counters
///
/// Relaxed ordering is enough: counters are independent and read only
/// for reporting.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    requests_total: AtomicU64,
    responses_2xx: AtomicU64,
    responses_4xx: AtomicU64,
    responses_5xx: AtomicU64,
    records_created: AtomicU64,
    records_updated: AtomicU64,
    records_deleted: AtomicU64,
    validation_rejections: AtomicU64,
}

impl MetricsRegistry {
    /// Create a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a finished request by its status code
    pub fn record_response(&self, status: u16) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        match status {
            200..=299 => self.responses_2xx.fetch_add(1, Ordering::Relaxed),
            400..=499 => self.responses_4xx.fetch_add(1, Ordering::Relaxed),
            500..=599 => self.responses_5xx.fetch_add(1, Ordering::Relaxed),
            _ => 0,
        };
    }

    pub fn increment_created(&self) {
        self.records_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_updated(&self) {
        self.records_updated.fetch_add(1, Ordering::Relaxed);
    }

    /// Count deleted records, cascaded children included
    pub fn add_deleted(&self, count: u64) {
        self.records_deleted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_validation_rejections(&self) {
        self.validation_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            responses_2xx: self.responses_2xx.load(Ordering::Relaxed),
            responses_4xx: self.responses_4xx.load(Ordering::Relaxed),
            responses_5xx: self.responses_5xx.load(Ordering::Relaxed),
            records_created: self.records_created.load(Ordering::Relaxed),
            records_updated: self.records_updated.load(Ordering::Relaxed),
            records_deleted: self.records_deleted.load(Ordering::Relaxed),
            validation_rejections: self.validation_rejections.load(Ordering::Relaxed),
        }
    }
}

/// Serializable copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub responses_2xx: u64,
    pub responses_4xx: u64,
    pub responses_5xx: u64,
    pub records_created: u64,
    pub records_updated: u64,
    pub records_deleted: u64,
    pub validation_rejections: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_zeroed() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.requests_total, 0);
        assert_eq!(snapshot.records_deleted, 0);
    }

    #[test]
    fn test_response_classes() {
        let metrics = MetricsRegistry::new();
        metrics.record_response(200);
        metrics.record_response(204);
        metrics.record_response(404);
        metrics.record_response(500);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests_total, 4);
        assert_eq!(snapshot.responses_2xx, 2);
        assert_eq!(snapshot.responses_4xx, 1);
        assert_eq!(snapshot.responses_5xx, 1);
    }

    #[test]
    fn test_mutation_counters() {
        let metrics = MetricsRegistry::new();
        metrics.increment_created();
        metrics.increment_updated();
        metrics.add_deleted(3);
        metrics.increment_validation_rejections();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.records_created, 1);
        assert_eq!(snapshot.records_updated, 1);
        assert_eq!(snapshot.records_deleted, 3);
        assert_eq!(snapshot.validation_rejections, 1);
    }
}
