//! Archive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. See `ERRORS.md` for design rationale.

use derive_more::{Display, Error};

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input is not a ZIP archive, or its central directory is truncated or
    /// corrupt. Don't retry with the same input.
    #[display("invalid or corrupted archive")]
    InvalidArchive,
    /// The entry exists but its content could not be decompressed (bad
    /// checksum, unsupported compression method, corrupt stream).
    #[display("failed to read archive entry: {_0}")]
    Read(#[error(not(source))] String),
    /// The entry decompressed to zero bytes.
    #[display("archive entry is empty: {_0}")]
    Empty(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
