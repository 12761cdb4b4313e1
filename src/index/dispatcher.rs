//! Query dispatch
//!
//! An equality query is answered through a hash index when one exists over
//! exactly the queried column names, in the queried order. Otherwise every
//! row is scanned. Both paths return the matching rows in row order.

use crate::observability::{Logger, Severity};
use crate::table::{Table, TableResult};

use super::hash::HashIndex;

/// A column equality constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equality {
    /// Column name
    pub name: String,
    /// Required field value
    pub value: String,
}

impl Equality {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Path chosen for a query
#[derive(Debug, Clone, Copy)]
pub enum QueryPath<'a> {
    /// Answer by key lookup in this index
    Indexed(&'a HashIndex),
    /// Answer by scanning every row
    Scan,
}

impl QueryPath<'_> {
    pub fn is_indexed(&self) -> bool {
        matches!(self, QueryPath::Indexed(_))
    }
}

/// Chooses and runs the query path
pub struct QueryDispatcher;

impl QueryDispatcher {
    /// Picks the path for a query over `equalities` without running it
    pub fn plan<'a>(table: &'a Table, equalities: &[Equality]) -> QueryPath<'a> {
        let names: Vec<&str> = equalities.iter().map(|e| e.name.as_str()).collect();
        match table.hash_index(&names) {
            Some(index) => QueryPath::Indexed(index),
            None => QueryPath::Scan,
        }
    }

    /// Runs an equality query.
    ///
    /// The indexed path trusts the index's column validation; the scan path
    /// fails on any unknown column.
    pub fn dispatch(table: &Table, equalities: &[Equality]) -> TableResult<Table> {
        match Self::plan(table, equalities) {
            QueryPath::Indexed(index) => {
                let positions =
                    index.lookup_values(equalities.iter().map(|e| e.value.as_str()));
                let rows = positions.iter().map(|&i| table.rows()[i].clone()).collect();
                table.metrics_registry().increment_indexed_queries();
                Self::trace("QUERY_INDEXED", equalities, positions.len());
                Ok(table.derive(rows))
            }
            QueryPath::Scan => {
                let names: Vec<&str> = equalities.iter().map(|e| e.name.as_str()).collect();
                let positions = table.map_columns(&names)?;
                let result = table.find_all(|row| {
                    positions
                        .iter()
                        .zip(equalities)
                        .all(|(&c, e)| row[c] == e.value)
                });
                table.metrics_registry().increment_scan_queries();
                Self::trace("QUERY_SCAN", equalities, result.row_count());
                Ok(result)
            }
        }
    }

    fn trace(event: &str, equalities: &[Equality], matched: usize) {
        if !Logger::enabled(Severity::Trace) {
            return;
        }
        let columns = equalities
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let matched = matched.to_string();
        Logger::trace(
            event,
            &[("columns", columns.as_str()), ("matched", matched.as_str())],
        );
    }
}
