//! Column schema
//!
//! Ordered column names plus a name -> position map. Names are trimmed
//! before registration; when two columns trim to the same name, the later
//! column wins.

use std::collections::HashMap;

use super::errors::{TableError, TableResult};
use super::options::TableOptions;

/// Column names and their positions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Builds a schema from raw column names
    pub fn new(columns: Vec<String>, options: &TableOptions) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            index.insert(options.trim_column_name(name).to_string(), i);
        }
        Self { columns, index }
    }

    /// Builds a schema of `count` synthesized names (`Column1..ColumnN`)
    pub fn synthesized(count: usize, options: &TableOptions) -> Self {
        let columns = (0..count).map(|i| options.synthesized_name(i)).collect();
        Self::new(columns, options)
    }

    /// Raw column names, in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column, or `None` if the name is not registered
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Position of a column; an unknown name is an error
    pub fn require(&self, name: &str) -> TableResult<usize> {
        self.position(name)
            .ok_or_else(|| TableError::unknown_column(name))
    }

    /// Resolves every name, failing on the first unknown one
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> TableResult<Vec<usize>> {
        names.iter().map(|name| self.require(name.as_ref())).collect()
    }
}
