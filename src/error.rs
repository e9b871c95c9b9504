//! Error taxonomy shared by the table and its cursor.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A key was required but none was supplied.
    #[error("key must be present")]
    InvalidKey,
    /// Requested initial capacity was below 1.
    #[error("initial capacity must be at least 1, got {requested}")]
    InvalidArgument { requested: usize },
    /// The table was structurally modified behind a live cursor.
    #[error("table modified since cursor last observed it (expected {expected}, found {found})")]
    ConcurrentStructuralChange { expected: u64, found: u64 },
    #[error("illegal cursor state: {0}")]
    IllegalState(&'static str),
    /// `next` was called with no unvisited entry left.
    #[error("no more entries")]
    Exhausted,
}
