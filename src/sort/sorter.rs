//! Composite row sorter
//!
//! Orders rows by a list of (column, comparator) pairs. Every pair but the
//! last is a two-way tie-breaker; the last pair's `less(p, q)` decides
//! outright.
//!
//! The sort works on row positions and only ever asks `less(p, q)`, so it
//! terminates and never panics when a comparator is not a strict weak
//! ordering (`FloatDesc` reports equal values as less in both directions).

use super::comparator::{parse_number, Comparator};

/// Runs shorter than this are insertion sorted
const INSERTION_THRESHOLD: usize = 12;

/// One step of a composite ordering
#[derive(Debug, Clone, Copy)]
pub struct ColumnLess {
    /// Column position in the row
    pub column: usize,
    /// Ordering applied to that column
    pub comparator: Comparator,
}

impl ColumnLess {
    pub fn new(column: usize, comparator: Comparator) -> Self {
        Self { column, comparator }
    }
}

/// A field that failed to parse under a numeric comparator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidField {
    /// Column position of the field
    pub column: usize,
    /// Raw field value
    pub value: String,
}

/// Column values prepared once per sort
enum Keys<'a> {
    Text(Vec<&'a str>),
    Number(Vec<f64>),
}

struct PreparedColumn<'a> {
    comparator: Comparator,
    keys: Keys<'a>,
}

impl<'a> PreparedColumn<'a> {
    fn prepare(spec: &ColumnLess, rows: &'a [Vec<String>]) -> Result<Self, InvalidField> {
        let fields = rows.iter().map(|row| row[spec.column].as_str());

        let keys = if spec.comparator.is_numeric() {
            let mut numbers = Vec::with_capacity(rows.len());
            for field in fields {
                let parsed = parse_number(field).map_err(|_| InvalidField {
                    column: spec.column,
                    value: field.to_string(),
                })?;
                numbers.push(parsed);
            }
            Keys::Number(numbers)
        } else {
            Keys::Text(fields.collect())
        };

        Ok(Self {
            comparator: spec.comparator,
            keys,
        })
    }

    fn less(&self, p: usize, q: usize) -> bool {
        match &self.keys {
            Keys::Text(values) => self.comparator.less_text(values[p], values[q]),
            Keys::Number(values) => self.comparator.less_parsed(values[p], values[q]),
        }
    }
}

/// Sorts rows by a composite ordering
#[derive(Debug, Clone, Default)]
pub struct CompositeSorter {
    columns: Vec<ColumnLess>,
}

impl CompositeSorter {
    /// Creates a sorter for the given ordering
    pub fn ordered_by(columns: Vec<ColumnLess>) -> Self {
        Self { columns }
    }

    /// Returns the ordering
    pub fn columns(&self) -> &[ColumnLess] {
        &self.columns
    }

    /// Sorts `rows` in place.
    ///
    /// Numeric columns are parsed before any row moves, even for a single
    /// row; on a parse failure the rows are left untouched. An empty
    /// ordering is a no-op.
    pub fn sort(&self, rows: &mut Vec<Vec<String>>) -> Result<(), InvalidField> {
        if self.columns.is_empty() {
            return Ok(());
        }

        let order = {
            let view: &[Vec<String>] = rows;
            let prepared = self
                .columns
                .iter()
                .map(|spec| PreparedColumn::prepare(spec, view))
                .collect::<Result<Vec<_>, _>>()?;

            let mut positions: Vec<usize> = (0..view.len()).collect();
            let mut scratch = positions.clone();
            merge_sort(&mut positions, &mut scratch, &|p, q| {
                Self::less(&prepared, p, q)
            });
            positions
        };

        let mut source = std::mem::take(rows);
        rows.extend(order.into_iter().map(|p| std::mem::take(&mut source[p])));
        Ok(())
    }

    /// Composite comparison of rows `p` and `q`
    fn less(prepared: &[PreparedColumn<'_>], p: usize, q: usize) -> bool {
        let Some((last, leading)) = prepared.split_last() else {
            return false;
        };

        for column in leading {
            if column.less(p, q) {
                return true;
            }
            if column.less(q, p) {
                return false;
            }
        }

        // All leading pairs tie; the last pair answers one-way.
        last.less(p, q)
    }
}

/// Top-down merge sort over positions; `scratch` has the same length.
fn merge_sort<F>(positions: &mut [usize], scratch: &mut [usize], less: &F)
where
    F: Fn(usize, usize) -> bool,
{
    let len = positions.len();
    if len < INSERTION_THRESHOLD {
        insertion_sort(positions, less);
        return;
    }

    let mid = len / 2;
    {
        let (left, right) = positions.split_at_mut(mid);
        let (left_scratch, right_scratch) = scratch.split_at_mut(mid);
        merge_sort(left, left_scratch, less);
        merge_sort(right, right_scratch, less);
    }

    scratch.copy_from_slice(positions);
    let (left, right) = scratch.split_at(mid);
    let (mut i, mut j) = (0, 0);
    for slot in positions.iter_mut() {
        // Take from the right only when it strictly precedes the left.
        let take_right = i >= left.len() || (j < right.len() && less(right[j], left[i]));
        if take_right {
            *slot = right[j];
            j += 1;
        } else {
            *slot = left[i];
            i += 1;
        }
    }
}

fn insertion_sort<F>(positions: &mut [usize], less: &F)
where
    F: Fn(usize, usize) -> bool,
{
    for i in 1..positions.len() {
        let mut j = i;
        while j > 0 && less(positions[j], positions[j - 1]) {
            positions.swap(j, j - 1);
            j -= 1;
        }
    }
}
