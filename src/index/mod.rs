//! Index subsystem for memtab
//!
//! Hash indexes are derived, in-memory state owned by a table.
//!
//! # Design Principles
//!
//! - Built lazily on first request, cached for the table's lifetime
//! - Identified by the exact ordered column-name list: an index over
//!   `[A, B]` is not used for `[B, A]` or `[A]`
//! - Never refreshed: rows must not change after an index is built
//! - Correctness-neutral: a query returns the same rows with or without an
//!   index

mod dispatcher;
mod hash;
mod key;

pub use dispatcher::{Equality, QueryDispatcher, QueryPath};
pub use hash::HashIndex;
pub use key::CompositeKey;
