//! Table subsystem for memtab
//!
//! A table holds string rows under named columns and answers:
//!
//! 1. Field lookup by row position and column name
//! 2. Predicate filtering (`find_all`, `find_first`)
//! 3. Multi-column ordering (`order_by`)
//! 4. De-duplication over a column subset (`distinct`)
//! 5. Equality queries, through a hash index when one matches (`query`)
//! 6. Lower-bound binary search over sorted rows (`search`)
//!
//! # Invariants
//!
//! - `column_index(name) == Some(i)` iff column `i` registers as `name`
//! - Derived tables never alias the source's row storage
//! - Unknown columns are errors, never defaults

mod errors;
mod options;
mod schema;
mod source;
mod table;

/// One row of string fields
pub type Row = Vec<String>;

pub use errors::{SourceError, TableError, TableResult};
pub use options::{TableOptions, MAX_INDEX_CAPACITY};
pub use schema::Schema;
pub use source::{IterSource, MemorySource, RecordSource};
pub use table::{OrderSpec, Table};
