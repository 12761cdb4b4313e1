//! memtab - an in-memory string table
//!
//! Rows of string fields loaded from tokenized delimited text, with
//! column-name lookup, multi-column ordering, hash-index accelerated
//! equality queries, de-duplication and binary search.

pub mod index;
pub mod observability;
pub mod sort;
pub mod table;

pub use index::{CompositeKey, Equality, HashIndex, QueryDispatcher, QueryPath};
pub use sort::{ColumnLess, Comparator, CompositeSorter, NumberError};
pub use table::{
    IterSource, MemorySource, OrderSpec, RecordSource, Row, Schema, SourceError, Table,
    TableError, TableOptions, TableResult,
};
