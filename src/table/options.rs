//! Table configuration
//!
//! Options are plain data with serde defaults, so a partial JSON document
//! yields a usable configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{TableError, TableResult};

/// Largest accepted `index_capacity`
pub const MAX_INDEX_CAPACITY: usize = 64;

/// Table construction options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Characters stripped from both ends of a column name before it is
    /// registered in the name map (default: space and comma)
    #[serde(default = "default_trim_chars")]
    pub trim_chars: String,

    /// Prefix for synthesized column names (default: "Column")
    #[serde(default = "default_column_prefix")]
    pub column_prefix: String,

    /// Initial capacity of a table's index list (default: 3, at most
    /// [`MAX_INDEX_CAPACITY`])
    #[serde(default = "default_index_capacity")]
    pub index_capacity: usize,
}

fn default_trim_chars() -> String {
    " ,".to_string()
}

fn default_column_prefix() -> String {
    "Column".to_string()
}

fn default_index_capacity() -> usize {
    3
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            trim_chars: default_trim_chars(),
            column_prefix: default_column_prefix(),
            index_capacity: default_index_capacity(),
        }
    }
}

impl TableOptions {
    /// Parses and validates options from a JSON document
    pub fn from_json_str(json: &str) -> TableResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Rejects values outside their accepted range
    pub fn validate(&self) -> TableResult<()> {
        if self.index_capacity > MAX_INDEX_CAPACITY {
            return Err(TableError::Options(format!(
                "index_capacity {} exceeds {}",
                self.index_capacity, MAX_INDEX_CAPACITY
            )));
        }
        Ok(())
    }

    /// Capacity to reserve for the index list, clamped for options built
    /// without validation
    pub fn index_capacity_hint(&self) -> usize {
        self.index_capacity.min(MAX_INDEX_CAPACITY)
    }

    /// Loads options from a JSON file
    pub fn load(path: impl AsRef<Path>) -> TableResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Trims a raw column name for registration in the name map
    pub fn trim_column_name<'a>(&self, name: &'a str) -> &'a str {
        name.trim_matches(|c: char| self.trim_chars.contains(c))
    }

    /// Synthesized name for the zero-based column position
    pub fn synthesized_name(&self, position: usize) -> String {
        format!("{}{}", self.column_prefix, position + 1)
    }
}
