//! Engine Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. See `ERRORS.md` for design rationale.

use derive_more::{Display, Error};

/// An engine error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bytes are not a SQLite database, or the database is corrupt. Don't
    /// retry with the same input.
    #[display("invalid or corrupted database image")]
    Format,
    /// The statement could not be prepared or executed against this database
    /// (missing table or column, type mismatch while decoding).
    #[display("query execution failed")]
    Query,
    /// Staging the image for the engine failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}

// Primary result codes; SQLite reports extended codes whose low byte is the
// primary code.
const SQLITE_CORRUPT: i32 = 11;
const SQLITE_NOTADB: i32 = 26;

/// Decide whether a driver error means the image itself is unusable.
///
/// SQLite opens files lazily, so a corrupt image is frequently only detected
/// by the first statement that touches it.
pub(crate) fn classify(err: &sqlx::Error, fallback: ErrorKind) -> ErrorKind {
    let code = match err {
        sqlx::Error::Database(db) => db.code().and_then(|code| code.parse::<i32>().ok()),
        _ => None,
    };
    match code.map(|code| code & 0xFF) {
        Some(SQLITE_CORRUPT | SQLITE_NOTADB) => ErrorKind::Format,
        _ => fallback,
    }
}
