//! CLI Error Types
//!
//! See `ERRORS.md` for design rationale.

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An input file could not be read.
    #[display("could not read {_0}")]
    Read(#[error(not(source))] String),
    /// Configuration could not be loaded.
    #[display("configuration error")]
    Config,
    /// The merge itself failed; the error tree holds the pipeline's reason.
    #[display("merge failed")]
    Pipeline,
    /// The output file could not be created.
    #[display("could not create {_0}")]
    Create(#[error(not(source))] String),
    /// Serialising or writing the merged records failed.
    #[display("could not write merged records")]
    Export,
}

impl ErrorKind {
    #[track_caller]
    pub(crate) fn config(err: lensmerge_config::error::Error) -> Error {
        err.raise(ErrorKind::Config)
    }

    #[track_caller]
    pub(crate) fn pipeline(err: lensmerge_core::error::Error) -> Error {
        err.raise(ErrorKind::Pipeline)
    }
}
