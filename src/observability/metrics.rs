//! Query counters
//!
//! Counters only, monotonic, exact. Atomics keep `Table` `Sync` while
//! read-path operations increment through `&self`.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-table operational counters
#[derive(Debug, Default)]
pub struct QueryMetrics {
    /// Hash indexes built
    indexes_built: AtomicU64,
    /// Index requests served from the cache
    indexes_reused: AtomicU64,
    /// Queries answered through a hash index
    indexed_queries: AtomicU64,
    /// Queries answered by a full scan
    scan_queries: AtomicU64,
    /// Rows passed through the composite sorter
    rows_sorted: AtomicU64,
}

impl QueryMetrics {
    /// Create a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_indexes_built(&self) {
        self.indexes_built.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_indexes_reused(&self) {
        self.indexes_reused.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_indexed_queries(&self) {
        self.indexed_queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_scan_queries(&self) {
        self.scan_queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_rows_sorted(&self, rows: u64) {
        self.rows_sorted.fetch_add(rows, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            indexes_built: self.indexes_built.load(Ordering::Relaxed),
            indexes_reused: self.indexes_reused.load(Ordering::Relaxed),
            indexed_queries: self.indexed_queries.load(Ordering::Relaxed),
            scan_queries: self.scan_queries.load(Ordering::Relaxed),
            rows_sorted: self.rows_sorted.load(Ordering::Relaxed),
        }
    }
}

/// Immutable copy of [`QueryMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub indexes_built: u64,
    pub indexes_reused: u64,
    pub indexed_queries: u64,
    pub scan_queries: u64,
    pub rows_sorted: u64,
}

impl MetricsSnapshot {
    /// Total queries dispatched on either path
    pub fn total_queries(&self) -> u64 {
        self.indexed_queries + self.scan_queries
    }
}
