//! In-memory string table
//!
//! Rows of string fields addressed by column name. Read operations return
//! derived tables that own fresh row vectors and share the source schema.
//!
//! # Index staleness
//!
//! Hash indexes record row positions at build time. Any later mutation
//! (`append`, `order_by`, `set_columns`) leaves them pointing at the old
//! layout. This is logged as `INDEX_STALE` but not repaired.

use std::collections::HashSet;
use std::sync::Arc;

use crate::index::{CompositeKey, Equality, HashIndex, QueryDispatcher};
use crate::observability::{Logger, MetricsSnapshot, QueryMetrics};
use crate::sort::{ColumnLess, Comparator, CompositeSorter};

use super::errors::{TableError, TableResult};
use super::options::TableOptions;
use super::schema::Schema;
use super::source::RecordSource;
use super::Row;

/// One column of an ordering, with its comparator
#[derive(Debug, Clone)]
pub struct OrderSpec {
    /// Column name
    pub column: String,
    /// Comparator for that column
    pub comparator: Comparator,
}

impl OrderSpec {
    pub fn new(column: impl Into<String>, comparator: Comparator) -> Self {
        Self {
            column: column.into(),
            comparator,
        }
    }

    /// Lexicographic ascending
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, Comparator::StringAsc)
    }

    /// Lexicographic descending
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, Comparator::StringDesc)
    }
}

impl From<&str> for OrderSpec {
    fn from(column: &str) -> Self {
        Self::asc(column)
    }
}

impl From<(&str, Comparator)> for OrderSpec {
    fn from((column, comparator): (&str, Comparator)) -> Self {
        Self::new(column, comparator)
    }
}

/// In-memory table of string rows
#[derive(Debug)]
pub struct Table {
    schema: Arc<Schema>,
    rows: Vec<Row>,
    indexes: Vec<HashIndex>,
    options: Arc<TableOptions>,
    metrics: QueryMetrics,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// Creates an empty table with no columns
    pub fn new() -> Self {
        Self::with_options(TableOptions::default())
    }

    /// Creates an empty table with the given options
    pub fn with_options(options: TableOptions) -> Self {
        Self {
            schema: Arc::new(Schema::default()),
            rows: Vec::new(),
            indexes: Vec::new(),
            options: Arc::new(options),
            metrics: QueryMetrics::new(),
        }
    }

    /// Builds a table from tokenized records.
    ///
    /// With `header`, the first record names the columns; otherwise columns
    /// are synthesized from the width of the first record. No records yield
    /// an empty table with no columns.
    pub fn from_records(records: Vec<Row>, header: bool) -> Self {
        Self::from_records_with(records, header, TableOptions::default())
    }

    /// [`Table::from_records`] with explicit options
    pub fn from_records_with(records: Vec<Row>, header: bool, options: TableOptions) -> Self {
        let mut table = Self::with_options(options);
        let mut records = records.into_iter();

        let Some(first) = records.next() else {
            return table;
        };

        if header {
            table.set_columns(first);
        } else {
            table.add_columns(first.len());
            table.rows.push(first);
        }
        table.rows.extend(records);
        table
    }

    /// Reads every record from `source` into a new table
    pub fn read_all<S: RecordSource>(source: &mut S, header: bool) -> TableResult<Self> {
        Self::read_all_with(source, header, TableOptions::default())
    }

    /// [`Table::read_all`] with explicit options
    pub fn read_all_with<S: RecordSource>(
        source: &mut S,
        header: bool,
        options: TableOptions,
    ) -> TableResult<Self> {
        let records = source.read_all()?;
        Ok(Self::from_records_with(records, header, options))
    }

    /// New table sharing this table's schema and options, owning `rows`
    pub(crate) fn derive(&self, rows: Vec<Row>) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            rows,
            indexes: Vec::new(),
            options: Arc::clone(&self.options),
            metrics: QueryMetrics::new(),
        }
    }

    // ------------------------------------------------------------------
    // Schema
    // ------------------------------------------------------------------

    /// Replaces the column names and rebuilds the name map
    pub fn set_columns(&mut self, columns: Vec<String>) {
        self.warn_if_indexed("set_columns");
        self.schema = Arc::new(Schema::new(columns, &self.options));
    }

    /// Replaces the columns with `count` synthesized names
    pub fn add_columns(&mut self, count: usize) {
        self.warn_if_indexed("add_columns");
        self.schema = Arc::new(Schema::synthesized(count, &self.options));
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Position of a column, or `None`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.schema.position(name)
    }

    /// Position of a column; unknown names are an error
    pub fn require_column(&self, name: &str) -> TableResult<usize> {
        self.schema.require(name)
    }

    /// Positions of several columns; fails on the first unknown name
    pub fn map_columns<S: AsRef<str>>(&self, names: &[S]) -> TableResult<Vec<usize>> {
        self.schema.resolve(names)
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    // ------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row; its width is the caller's responsibility
    pub fn append(&mut self, row: Row) {
        self.warn_if_indexed("append");
        self.rows.push(row);
    }

    /// Field at (`row`, `column`)
    pub fn get(&self, row: usize, column: &str) -> TableResult<&str> {
        let c = self.require_column(column)?;
        let fields = self.rows.get(row).ok_or(TableError::RowOutOfRange {
            index: row,
            len: self.rows.len(),
        })?;
        Ok(fields[c].as_str())
    }

    // ------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------

    /// All rows satisfying `predicate`, in order
    pub fn find_all<F>(&self, predicate: F) -> Table
    where
        F: Fn(&[String]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row))
            .cloned()
            .collect();
        self.derive(rows)
    }

    /// Position of the first row at or after `start` satisfying `predicate`
    pub fn find_first<F>(&self, start: usize, predicate: F) -> Option<usize>
    where
        F: Fn(&[String]) -> bool,
    {
        self.rows
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, row)| predicate(row))
            .map(|(i, _)| i)
    }

    // ------------------------------------------------------------------
    // Ordering
    // ------------------------------------------------------------------

    /// Sorts the rows in place by `specs`, left to right.
    ///
    /// Fails without reordering on an unknown column or on a field that
    /// does not parse under a numeric comparator.
    pub fn order_by<S>(&mut self, specs: &[S]) -> TableResult<&mut Self>
    where
        S: Clone + Into<OrderSpec>,
    {
        let mut columns = Vec::with_capacity(specs.len());
        for spec in specs {
            let spec: OrderSpec = spec.clone().into();
            let column = self.require_column(&spec.column)?;
            columns.push(ColumnLess::new(column, spec.comparator));
        }

        if columns.is_empty() {
            return Ok(self);
        }

        let sorter = CompositeSorter::ordered_by(columns);
        if let Err(invalid) = sorter.sort(&mut self.rows) {
            let column = self.schema.columns()[invalid.column].clone();
            Logger::error(
                "ORDER_REJECTED",
                &[("column", column.as_str()), ("value", invalid.value.as_str())],
            );
            return Err(TableError::InvalidNumber {
                column,
                value: invalid.value,
            });
        }

        self.metrics.add_rows_sorted(self.rows.len() as u64);
        self.warn_if_indexed("order_by");
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Distinct
    // ------------------------------------------------------------------

    /// One row per distinct combination of `columns`, in first-occurrence
    /// order, projected to exactly those columns
    pub fn distinct<S: AsRef<str>>(&self, columns: &[S]) -> TableResult<Table> {
        let positions = self.map_columns(columns)?;
        self.distinct_by_index(&positions)
    }

    /// [`Table::distinct`] over already-resolved column positions
    pub fn distinct_by_index(&self, positions: &[usize]) -> TableResult<Table> {
        let names = positions
            .iter()
            .map(|&c| {
                self.schema
                    .columns()
                    .get(c)
                    .cloned()
                    .ok_or_else(|| TableError::unknown_column(format!("#{}", c)))
            })
            .collect::<TableResult<Vec<_>>>()?;

        let mut seen = HashSet::new();
        let mut rows = Vec::new();
        for row in &self.rows {
            if seen.insert(CompositeKey::from_row(row, positions)) {
                rows.push(positions.iter().map(|&c| row[c].clone()).collect());
            }
        }

        Ok(Self {
            schema: Arc::new(Schema::new(names, &self.options)),
            rows,
            indexes: Vec::new(),
            options: Arc::clone(&self.options),
            metrics: QueryMetrics::new(),
        })
    }

    // ------------------------------------------------------------------
    // Hash indexes
    // ------------------------------------------------------------------

    /// Returns the index over exactly `columns`, building it on first use
    pub fn create_hash_index<S: AsRef<str>>(&mut self, columns: &[S]) -> TableResult<&HashIndex> {
        let positions = self.map_columns(columns)?;

        if let Some(i) = self.indexes.iter().position(|index| index.covers(columns)) {
            self.metrics.increment_indexes_reused();
            Logger::trace("INDEX_REUSED", &[("columns", join_names(columns).as_str())]);
            return Ok(&self.indexes[i]);
        }

        let names = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let index = HashIndex::build(names, positions, &self.rows);

        let keys = index.key_count().to_string();
        let rows = self.rows.len().to_string();
        Logger::info(
            "INDEX_BUILT",
            &[
                ("columns", join_names(columns).as_str()),
                ("keys", keys.as_str()),
                ("rows", rows.as_str()),
            ],
        );

        if self.indexes.is_empty() {
            self.indexes.reserve(self.options.index_capacity_hint());
        }
        self.indexes.push(index);
        self.metrics.increment_indexes_built();
        Ok(&self.indexes[self.indexes.len() - 1])
    }

    /// The registered index over exactly `columns`, if any
    pub fn hash_index<S: AsRef<str>>(&self, columns: &[S]) -> Option<&HashIndex> {
        self.indexes.iter().find(|index| index.covers(columns))
    }

    pub fn indexes(&self) -> &[HashIndex] {
        &self.indexes
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Rows whose fields equal every constraint, in row order
    pub fn query(&self, equalities: &[Equality]) -> TableResult<Table> {
        QueryDispatcher::dispatch(self, equalities)
    }

    /// Lower-bound binary search.
    ///
    /// Rows must already be sorted ascending by the given columns. Returns
    /// the first position whose fields are not lexicographically less than
    /// the target tuple, or `row_count()` if every row is less.
    pub fn search(&self, equalities: &[Equality]) -> TableResult<usize> {
        let names: Vec<&str> = equalities.iter().map(|e| e.name.as_str()).collect();
        let positions = self.map_columns(&names)?;

        Ok(self.rows.partition_point(|row| {
            for (&c, target) in positions.iter().zip(equalities) {
                let field = row[c].as_str();
                if field < target.value.as_str() {
                    return true;
                }
                if field > target.value.as_str() {
                    return false;
                }
            }
            false
        }))
    }

    // ------------------------------------------------------------------
    // Metrics
    // ------------------------------------------------------------------

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub(crate) fn metrics_registry(&self) -> &QueryMetrics {
        &self.metrics
    }

    fn warn_if_indexed(&self, operation: &str) {
        if self.indexes.is_empty() {
            return;
        }
        let count = self.indexes.len().to_string();
        Logger::warn(
            "INDEX_STALE",
            &[("indexes", count.as_str()), ("operation", operation)],
        );
    }
}

fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| n.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|s| s.to_string()).collect()
    }

    fn people() -> Table {
        Table::from_records(
            vec![
                row(&["name", "city", "age"]),
                row(&["ann", "oslo", "31"]),
                row(&["bob", "rome", "25"]),
                row(&["cid", "oslo", "40"]),
                row(&["dan", "rome", "25"]),
            ],
            true,
        )
    }

    #[test]
    fn test_header_record_names_columns() {
        let table = people();
        assert_eq!(table.columns(), &["name", "city", "age"]);
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.get(0, "name").unwrap(), "ann");
    }

    #[test]
    fn test_no_header_synthesizes_columns() {
        let table = Table::from_records(vec![row(&["1", "2"]), row(&["3", "4"])], false);
        assert_eq!(table.columns(), &["Column1", "Column2"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(1, "Column2").unwrap(), "4");
    }

    #[test]
    fn test_no_records_empty_table() {
        let table = Table::from_records(Vec::new(), true);
        assert_eq!(table.column_count(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_custom_prefix() {
        let options = TableOptions {
            column_prefix: "F".to_string(),
            ..Default::default()
        };
        let table = Table::from_records_with(vec![row(&["x", "y"])], false, options);
        assert_eq!(table.columns(), &["F1", "F2"]);
    }

    #[test]
    fn test_get_unknown_column() {
        let table = people();
        let err = table.get(0, "salary").unwrap_err();
        assert_eq!(err, TableError::unknown_column("salary"));
    }

    #[test]
    fn test_get_row_out_of_range() {
        let table = people();
        let err = table.get(10, "name").unwrap_err();
        assert_eq!(err, TableError::RowOutOfRange { index: 10, len: 4 });
    }

    #[test]
    fn test_column_lookup_is_optional() {
        let table = people();
        assert_eq!(table.column_index("city"), Some(1));
        assert_eq!(table.column_index("salary"), None);
        assert!(table.require_column("salary").is_err());
    }

    #[test]
    fn test_find_all_keeps_order_and_schema() {
        let table = people();
        let oslo = table.find_all(|r| r[1] == "oslo");
        assert_eq!(oslo.row_count(), 2);
        assert_eq!(oslo.get(0, "name").unwrap(), "ann");
        assert_eq!(oslo.get(1, "name").unwrap(), "cid");
        assert_eq!(oslo.columns(), table.columns());
    }

    #[test]
    fn test_find_all_no_match_is_empty() {
        let table = people();
        let none = table.find_all(|r| r[1] == "paris");
        assert!(none.is_empty());
        assert_eq!(none.column_count(), 3);
    }

    #[test]
    fn test_find_first_from_start() {
        let table = people();
        assert_eq!(table.find_first(0, |r| r[1] == "rome"), Some(1));
        assert_eq!(table.find_first(2, |r| r[1] == "rome"), Some(3));
        assert_eq!(table.find_first(4, |r| r[1] == "rome"), None);
        assert_eq!(table.find_first(99, |_| true), None);
    }

    #[test]
    fn test_order_by_default_ascending() {
        let mut table = people();
        table.order_by(&["city", "name"]).unwrap();
        let names: Vec<&str> = (0..4).map(|i| table.get(i, "name").unwrap()).collect();
        assert_eq!(names, vec!["ann", "cid", "bob", "dan"]);
    }

    #[test]
    fn test_order_by_mixed_comparators() {
        let mut table = people();
        table
            .order_by(&[
                OrderSpec::new("age", Comparator::FloatAsc),
                OrderSpec::desc("name"),
            ])
            .unwrap();
        let names: Vec<&str> = (0..4).map(|i| table.get(i, "name").unwrap()).collect();
        assert_eq!(names, vec!["dan", "bob", "ann", "cid"]);
    }

    #[test]
    fn test_order_by_chains() {
        let mut table = people();
        let first = table
            .order_by(&["name"])
            .unwrap()
            .order_by(&[("age", Comparator::FloatDesc)])
            .unwrap()
            .get(0, "name")
            .unwrap()
            .to_string();
        assert_eq!(first, "cid");
    }

    #[test]
    fn test_order_by_unknown_column() {
        let mut table = people();
        let err = table.order_by(&["salary"]).unwrap_err();
        assert_eq!(err.code(), "MEMTAB_UNKNOWN_COLUMN");
    }

    #[test]
    fn test_order_by_invalid_number() {
        let mut table = people();
        let err = table
            .order_by(&[("name", Comparator::FloatAsc)])
            .unwrap_err();
        assert_eq!(
            err,
            TableError::InvalidNumber {
                column: "name".to_string(),
                value: "ann".to_string()
            }
        );
        assert_eq!(table.get(0, "name").unwrap(), "ann");
        assert_eq!(table.metrics().rows_sorted, 0);
    }

    #[test]
    fn test_order_by_single_row_validates_numbers() {
        let mut table = Table::from_records(vec![row(&["price"]), row(&["n/a"])], true);
        let err = table
            .order_by(&[("price", Comparator::FloatAsc)])
            .unwrap_err();
        assert_eq!(err.code(), "MEMTAB_INVALID_NUMBER");
        assert_eq!(table.metrics().rows_sorted, 0);
    }

    #[test]
    fn test_order_by_empty_is_noop() {
        let mut table = people();
        table.order_by::<OrderSpec>(&[]).unwrap();
        assert_eq!(table.get(0, "name").unwrap(), "ann");
    }

    #[test]
    fn test_distinct_projects_in_first_occurrence_order() {
        let table = people();
        let cities = table.distinct(&["city"]).unwrap();
        assert_eq!(cities.columns(), &["city"]);
        assert_eq!(cities.rows(), &[row(&["oslo"]), row(&["rome"])]);

        let pairs = table.distinct(&["age", "city"]).unwrap();
        assert_eq!(
            pairs.rows(),
            &[row(&["31", "oslo"]), row(&["25", "rome"]), row(&["40", "oslo"])]
        );
    }

    #[test]
    fn test_distinct_unknown_column() {
        let table = people();
        assert!(table.distinct(&["city", "zip"]).is_err());
        assert!(table.distinct_by_index(&[7]).is_err());
    }

    #[test]
    fn test_distinct_keys_do_not_collide() {
        let table = Table::from_records(vec![row(&["ab", "c"]), row(&["a", "bc"])], false);
        let distinct = table.distinct(&["Column1", "Column2"]).unwrap();
        assert_eq!(distinct.row_count(), 2);
    }

    #[test]
    fn test_create_hash_index_reuses_instance() {
        let mut table = people();
        let first = table.create_hash_index(&["city"]).unwrap() as *const HashIndex;
        let second = table.create_hash_index(&["city"]).unwrap() as *const HashIndex;
        assert!(std::ptr::eq(first, second));
        assert_eq!(table.indexes().len(), 1);

        let snap = table.metrics();
        assert_eq!(snap.indexes_built, 1);
        assert_eq!(snap.indexes_reused, 1);
    }

    #[test]
    fn test_create_hash_index_order_sensitive() {
        let mut table = people();
        table.create_hash_index(&["city", "age"]).unwrap();
        table.create_hash_index(&["age", "city"]).unwrap();
        assert_eq!(table.indexes().len(), 2);
        assert!(table.hash_index(&["city"]).is_none());
    }

    #[test]
    fn test_create_hash_index_with_huge_capacity_option() {
        let options = TableOptions {
            index_capacity: usize::MAX,
            ..Default::default()
        };
        let mut table = Table::from_records_with(vec![row(&["1", "a"])], false, options);
        let index = table.create_hash_index(&["Column1"]).unwrap();
        assert_eq!(index.key_count(), 1);
    }

    #[test]
    fn test_create_hash_index_unknown_column() {
        let mut table = people();
        assert!(table.create_hash_index(&["zip"]).is_err());
        assert!(table.indexes().is_empty());
    }

    #[test]
    fn test_query_indexed_and_scanned_agree() {
        let scanned = people();
        let mut indexed = people();
        indexed.create_hash_index(&["city", "age"]).unwrap();

        let q = [Equality::new("city", "rome"), Equality::new("age", "25")];
        let a = scanned.query(&q).unwrap();
        let b = indexed.query(&q).unwrap();
        assert_eq!(a.rows(), b.rows());
        assert_eq!(a.row_count(), 2);
        assert_eq!(scanned.metrics().scan_queries, 1);
        assert_eq!(indexed.metrics().indexed_queries, 1);
    }

    #[test]
    fn test_query_result_shares_schema() {
        let table = people();
        let result = table.query(&[Equality::new("city", "oslo")]).unwrap();
        assert!(Arc::ptr_eq(&table.schema, &result.schema));
        assert!(result.indexes().is_empty());
    }

    #[test]
    fn test_search_lower_bound() {
        let mut table = people();
        table.order_by(&["city", "name"]).unwrap();

        assert_eq!(table.search(&[Equality::new("city", "oslo")]).unwrap(), 0);
        assert_eq!(table.search(&[Equality::new("city", "paris")]).unwrap(), 2);
        assert_eq!(table.search(&[Equality::new("city", "rome")]).unwrap(), 2);
        assert_eq!(table.search(&[Equality::new("city", "zurich")]).unwrap(), 4);
        assert_eq!(
            table
                .search(&[Equality::new("city", "rome"), Equality::new("name", "c")])
                .unwrap(),
            3
        );
    }

    #[test]
    fn test_search_unknown_column() {
        let table = people();
        assert!(table.search(&[Equality::new("zip", "1")]).is_err());
    }

    #[test]
    fn test_set_columns_rebuilds_map() {
        let mut table = people();
        table.set_columns(row(&["n", "c", "a"]));
        assert_eq!(table.column_index("n"), Some(0));
        assert_eq!(table.column_index("name"), None);
    }
}
