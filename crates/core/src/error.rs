//! Pipeline Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. See `ERRORS.md` for design rationale.
//!
//! Every kind is terminal for the current invocation: there is no partial
//! result and nothing is retried internally.

use derive_more::{Display, Error};
use lensmerge_archive::error::{Error as ArchiveError, ErrorKind as ArchiveErrorKind};
use lensmerge_engine::error::{Error as EngineError, ErrorKind as EngineErrorKind};

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The archive input is not a valid ZIP archive.
    #[display("invalid or corrupted archive")]
    ArchiveFormat,
    /// No entry in the archive ends with the configured suffix.
    #[display("archive does not contain any *{_0} file")]
    DatabaseNotFound(#[error(not(source))] String),
    /// The matched entry could not be extracted, or extracted to nothing.
    #[display("could not read database file from archive: {_0}")]
    DatabaseRead(#[error(not(source))] String),
    /// The standalone input, or the extracted entry, is not a SQLite database.
    #[display("invalid or corrupted database image")]
    DatabaseFormat,
    /// A required relation or column is missing, or the query failed.
    #[display("query execution failed")]
    QueryExecution,
    /// The key column is absent from the scanned relation.
    /// Raised in the same situations as [`QueryExecution`](Self::QueryExecution),
    /// but names the offending column.
    #[display("key column `{_0}` is missing")]
    KeyColumn(#[error(not(source))] String),
    /// A loaded image could not be staged for the query engine.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }

    /// Convert an archive error into a pipeline error, preserving the archive
    /// crate's `Exn` frame (error tree) as a child in its own error tree.
    #[track_caller]
    pub(crate) fn archive(err: ArchiveError) -> Error {
        let kind = match &*err {
            ArchiveErrorKind::InvalidArchive => ErrorKind::ArchiveFormat,
            ArchiveErrorKind::Read(name) | ArchiveErrorKind::Empty(name) => ErrorKind::DatabaseRead(name.clone()),
        };
        err.raise(kind)
    }

    /// Convert an engine error into a pipeline error, preserving the engine
    /// crate's `Exn` frame (error tree) as a child in its own error tree.
    #[track_caller]
    pub(crate) fn engine(err: EngineError) -> Error {
        let kind = match *err {
            EngineErrorKind::Format => ErrorKind::DatabaseFormat,
            EngineErrorKind::Query => ErrorKind::QueryExecution,
            EngineErrorKind::Io => ErrorKind::Io,
        };
        err.raise(kind)
    }
}
