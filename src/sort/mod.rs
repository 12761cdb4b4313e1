//! Ordering subsystem for memtab
//!
//! - Comparators: named orderings over two string fields
//! - Composite sorter: multi-column ordering with left-to-right tie-breaks

mod comparator;
mod sorter;

pub use comparator::{
    less_float_asc, less_float_desc, less_string_asc, less_string_desc, parse_number,
    Comparator, LessFn, NumberError,
};
pub use sorter::{ColumnLess, CompositeSorter, InvalidField};
