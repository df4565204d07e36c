//! The two input loaders. Each owns its database engine for the duration of
//! one load and releases it before returning.

mod archive;
mod standalone;

pub use self::archive::{ArchiveLoader, DEFAULT_NAMES_QUERY, DEFAULT_SUFFIX};
pub use self::standalone::{DEFAULT_TABLE, StandaloneLoader};
