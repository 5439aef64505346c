//! Retry statistics shared by all calls of one client
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Process-local retry counters for one client instance.
///
/// Counters only ever grow. Reading a snapshot never resets them.
#[derive(Debug, Default)]
pub struct RetryStats {
    total_retries: AtomicU64,
    failed_requests: AtomicU64,
    retried_methods: DashMap<String, u64>,
}

impl RetryStats {
    /// Counters starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one retry of `operation` (called before the backoff sleep).
    pub fn record_retry(&self, operation: &str) {
        self.total_retries.fetch_add(1, Ordering::Relaxed);
        *self.retried_methods.entry(operation.to_owned()).or_insert(0) += 1;
    }

    /// Count one logical call that ended without success.
    pub fn record_failure(&self) {
        self.failed_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Retries across every operation.
    pub fn total_retries(&self) -> u64 {
        self.total_retries.load(Ordering::Relaxed)
    }

    /// Logical calls that ended without success.
    pub fn failed_requests(&self) -> u64 {
        self.failed_requests.load(Ordering::Relaxed)
    }

    /// Retries of one operation, zero if never retried.
    pub fn retries_for(&self, operation: &str) -> u64 {
        self.retried_methods.get(operation).map_or(0, |count| *count)
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> RetryStatsSnapshot {
        let retried_methods = self
            .retried_methods
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();

        RetryStatsSnapshot {
            total_retries: self.total_retries(),
            failed_requests: self.failed_requests(),
            retried_methods,
        }
    }
}

/// Serializable view of [`RetryStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryStatsSnapshot {
    /// Retries across every operation.
    pub total_retries: u64,
    /// Logical calls that ended without success.
    pub failed_requests: u64,
    /// Retries per operation name.
    pub retried_methods: BTreeMap<String, u64>,
}

impl RetryStatsSnapshot {
    /// Retries of one operation, zero if never retried.
    pub fn retries_for(&self, operation: &str) -> u64 {
        self.retried_methods.get(operation).copied().unwrap_or(0)
    }
}

impl fmt::Display for RetryStatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RetryStats {{ total_retries: {}, failed_requests: {}, operations: {} }}",
            self.total_retries,
            self.failed_requests,
            self.retried_methods.len()
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for resilience::stats.
    use std::sync::Arc;

    use super::*;

    /// Validates counter bookkeeping for retries and failures.
    ///
    /// Assertions:
    /// - Confirms `total_retries` sums retries across operations.
    /// - Confirms `retried_methods` tracks each operation separately.
    /// - Confirms reading a snapshot does not reset anything.
    #[test]
    fn test_record_retry_and_failure() {
        let stats = RetryStats::new();
        stats.record_retry("get_guild");
        stats.record_retry("get_guild");
        stats.record_retry("create_guild");
        stats.record_failure();

        let first = stats.snapshot();
        assert_eq!(first.total_retries, 3);
        assert_eq!(first.failed_requests, 1);
        assert_eq!(first.retries_for("get_guild"), 2);
        assert_eq!(first.retries_for("create_guild"), 1);
        assert_eq!(first.retries_for("delete_guild"), 0);

        assert_eq!(stats.snapshot(), first);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = RetryStats::new().snapshot();
        assert_eq!(snapshot, RetryStatsSnapshot::default());
        assert!(snapshot.to_string().contains("total_retries: 0"));
    }

    /// Validates concurrent updates from many threads.
    ///
    /// Assertions:
    /// - Confirms no increments are lost under contention.
    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let stats = Arc::new(RetryStats::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    let op = if worker % 2 == 0 { "even" } else { "odd" };
                    for _ in 0..1000 {
                        stats.record_retry(op);
                        stats.record_failure();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_retries, 8000);
        assert_eq!(snapshot.failed_requests, 8000);
        assert_eq!(snapshot.retries_for("even"), 4000);
        assert_eq!(snapshot.retries_for("odd"), 4000);
    }

    #[test]
    fn test_snapshot_serializes() {
        let stats = RetryStats::new();
        stats.record_retry("health_check");
        let json = serde_json::to_value(stats.snapshot()).unwrap();
        assert_eq!(json["total_retries"], 1);
        assert_eq!(json["retried_methods"]["health_check"], 1);
    }
}
