//! Hash index over an ordered column set
//!
//! Maps each composite key to the row positions that produced it, in row
//! order. Built in one pass and never updated: an index describes the rows
//! as they were when it was built.

use std::collections::HashMap;

use super::key::CompositeKey;

/// Cached equality index owned by a table
#[derive(Debug, Clone)]
pub struct HashIndex {
    /// Column names, in the order given at creation
    columns: Vec<String>,
    /// Resolved column positions, parallel to `columns`
    positions: Vec<usize>,
    /// Key -> row positions, ascending
    index: HashMap<CompositeKey, Vec<usize>>,
}

impl HashIndex {
    /// Builds an index by scanning `rows` once.
    ///
    /// `positions` must be valid column positions for every row.
    pub fn build(columns: Vec<String>, positions: Vec<usize>, rows: &[Vec<String>]) -> Self {
        let mut index: HashMap<CompositeKey, Vec<usize>> = HashMap::new();
        for (i, row) in rows.iter().enumerate() {
            index
                .entry(CompositeKey::from_row(row, &positions))
                .or_default()
                .push(i);
        }

        Self {
            columns,
            positions,
            index,
        }
    }

    /// Column names this index was built over
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Column positions this index was built over
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// True if `names` equals this index's columns, position by position
    pub fn covers<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.columns.len() == names.len()
            && self
                .columns
                .iter()
                .zip(names)
                .all(|(own, name)| own == name.as_ref())
    }

    /// Row positions for a key; empty if no row produced it
    pub fn lookup(&self, key: &CompositeKey) -> &[usize] {
        self.index.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Row positions whose indexed fields equal `values`, in column order
    pub fn lookup_values<'a, I>(&self, values: I) -> &[usize]
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.lookup(&CompositeKey::from_fields(values))
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.index.len()
    }
}
