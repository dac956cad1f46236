//! Lock-free counters exposing cache activity for inspection.
//!
//! Read-only from the caller's perspective: nothing in the core ever
//! branches on these numbers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Point-in-time snapshot of cache activity counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub admissions: u64,
    pub replacements: u64,
    pub duplicates: u64,
    pub collisions: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub handler_successes: u64,
    pub handler_failures: u64,
}

#[derive(Debug)]
pub(crate) struct CacheStats {
    admissions: AtomicU64,
    replacements: AtomicU64,
    duplicates: AtomicU64,
    collisions: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
    handler_successes: AtomicU64,
    handler_failures: AtomicU64,
}

impl CacheStats {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            admissions: AtomicU64::new(0),
            replacements: AtomicU64::new(0),
            duplicates: AtomicU64::new(0),
            collisions: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
            handler_successes: AtomicU64::new(0),
            handler_failures: AtomicU64::new(0),
        })
    }

    pub(crate) fn record_admission(&self) {
        self.admissions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_replacement(&self) {
        self.replacements.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_collision(&self) {
        self.collisions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_evictions(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_expirations(&self, count: u64) {
        self.expirations.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_handler_success(&self) {
        self.handler_successes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_handler_failure(&self) {
        self.handler_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            admissions: self.admissions.load(Ordering::Relaxed),
            replacements: self.replacements.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            collisions: self.collisions.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            handler_successes: self.handler_successes.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates `CacheStats::new` behavior for the stats start at zero
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `snapshot` equals `CacheStatsSnapshot::default()`.
    #[test]
    fn test_stats_start_at_zero() {
        let stats = CacheStats::new();
        assert_eq!(stats.snapshot(), CacheStatsSnapshot::default());
    }

    /// Validates `CacheStats::record_admission` behavior for the record
    /// admission and duplicate scenario.
    ///
    /// Assertions:
    /// - Confirms `snapshot.admissions` equals `2`.
    /// - Confirms `snapshot.duplicates` equals `1`.
    #[test]
    fn test_record_admission_and_duplicate() {
        let stats = CacheStats::new();
        stats.record_admission();
        stats.record_admission();
        stats.record_duplicate();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.admissions, 2);
        assert_eq!(snapshot.duplicates, 1);
    }

    /// Validates `CacheStats::record_evictions` behavior for the record
    /// evictions accumulates scenario.
    ///
    /// Assertions:
    /// - Confirms `snapshot.evictions` equals `7`.
    #[test]
    fn test_record_evictions_accumulates() {
        let stats = CacheStats::new();
        stats.record_evictions(3);
        stats.record_evictions(4);
        assert_eq!(stats.snapshot().evictions, 7);
    }

    /// Validates `CacheStats::new` behavior for the stats thread safety
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `stats.snapshot().handler_successes` equals `1000`.
    #[test]
    fn test_stats_thread_safety() {
        use std::thread;

        let stats = CacheStats::new();
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..100 {
                        stats.record_handler_success();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(stats.snapshot().handler_successes, 1000);
    }
}
