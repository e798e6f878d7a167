//! Database error types.

use std::time::Duration;

use thiserror::Error;

/// Errors produced by the database handle.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The underlying SQLite engine rejected the statement or a row scan
    /// failed mid-iteration.
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The statement did not complete within its deadline.
    #[error("query deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    /// A row produced a different number of values than the statement has
    /// columns.
    #[error("row has {got} values, expected {expected}")]
    RowWidth {
        /// Number of columns the statement reported.
        expected: usize,
        /// Number of values actually accumulated.
        got: usize,
    },

    /// The database handle has been closed.
    #[error("database is closed")]
    Closed,

    /// Internal error (runtime failure while scheduling the statement).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
