//! Configuration Error Types
//!
//! See `ERRORS.md` for design rationale.

use derive_more::{Display, Error};

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A configuration source could not be read or did not match the schema.
    #[display("could not load configuration")]
    Load,
    /// A setting was read successfully but its value is unusable.
    #[display("invalid configuration: {_0}")]
    Invalid(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(ErrorKind::Load.to_string(), "could not load configuration");
        assert_eq!(
            ErrorKind::Invalid("archive.suffix must not be empty".to_string()).to_string(),
            "invalid configuration: archive.suffix must not be empty"
        );
        assert!(!ErrorKind::Load.is_retryable());
    }
}
