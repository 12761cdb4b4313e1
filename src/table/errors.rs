//! Table error types
//!
//! Error codes:
//! - MEMTAB_UNKNOWN_COLUMN
//! - MEMTAB_INVALID_NUMBER
//! - MEMTAB_ROW_OUT_OF_RANGE
//! - MEMTAB_SOURCE_FAILED
//! - MEMTAB_OPTIONS_INVALID
//!
//! Contract violations (unknown column, malformed numeric field, bad row
//! index) are returned, never recovered. Absence of data is not an error.

use thiserror::Error;

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

/// Failure reported by a record source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {record}: {message}")]
pub struct SourceError {
    /// Zero-based record number where reading failed
    pub record: usize,
    /// Upstream description
    pub message: String,
}

impl SourceError {
    /// Creates a source error for the given record
    pub fn new(record: usize, message: impl Into<String>) -> Self {
        Self {
            record,
            message: message.into(),
        }
    }
}

/// Table errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// Column name is not part of the schema
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Field could not be parsed under a numeric comparator
    #[error("invalid number in column {column}: {value:?}")]
    InvalidNumber {
        /// Column being ordered
        column: String,
        /// Offending field value
        value: String,
    },

    /// Row position beyond the end of the table
    #[error("row {index} out of range (row count {len})")]
    RowOutOfRange { index: usize, len: usize },

    /// The record source failed while reading
    #[error("source failed: {0}")]
    Source(#[from] SourceError),

    /// Options could not be read or parsed
    #[error("invalid options: {0}")]
    Options(String),
}

impl TableError {
    /// Creates an unknown column error
    pub fn unknown_column(name: impl Into<String>) -> Self {
        TableError::UnknownColumn(name.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TableError::UnknownColumn(_) => "MEMTAB_UNKNOWN_COLUMN",
            TableError::InvalidNumber { .. } => "MEMTAB_INVALID_NUMBER",
            TableError::RowOutOfRange { .. } => "MEMTAB_ROW_OUT_OF_RANGE",
            TableError::Source(_) => "MEMTAB_SOURCE_FAILED",
            TableError::Options(_) => "MEMTAB_OPTIONS_INVALID",
        }
    }

    /// Returns true for caller-contract violations
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            TableError::UnknownColumn(_)
                | TableError::InvalidNumber { .. }
                | TableError::RowOutOfRange { .. }
        )
    }
}

impl From<serde_json::Error> for TableError {
    fn from(e: serde_json::Error) -> Self {
        TableError::Options(format!("JSON error: {}", e))
    }
}

impl From<std::io::Error> for TableError {
    fn from(e: std::io::Error) -> Self {
        TableError::Options(e.to_string())
    }
}
