//! Operation Statistics Module
//!
//! Counters describing how calculations were served. The handle is created
//! by whoever builds the service and shared through an `Arc`.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Operation Stats ==
#[derive(Debug, Default)]
pub struct OperationStats {
    calculations: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    cache_write_failures: AtomicU64,
    history_write_failures: AtomicU64,
    division_by_zero: AtomicU64,
}

/// Point-in-time copy of [`OperationStats`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    /// Successful calculations, hits and misses alike
    pub calculations: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_write_failures: u64,
    pub history_write_failures: u64,
    /// Divide requests rejected for a zero divisor
    pub division_by_zero: u64,
}

impl OperationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_calculation(&self) {
        self.calculations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_write_failure(&self) {
        self.cache_write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_history_write_failure(&self) {
        self.history_write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_division_by_zero(&self) {
        self.division_by_zero.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            calculations: self.calculations.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            cache_write_failures: self.cache_write_failures.load(Ordering::Relaxed),
            history_write_failures: self.history_write_failures.load(Ordering::Relaxed),
            division_by_zero: self.division_by_zero.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}
