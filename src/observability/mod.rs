//! Observability for memtab
//!
//! - Structured JSON logging with a process-wide severity threshold
//! - Per-table query counters
//!
//! Observability is read-only: nothing here influences which path a query
//! takes or what it returns.

mod logger;
mod metrics;

pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, QueryMetrics};
