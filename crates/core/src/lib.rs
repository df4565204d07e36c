//! Joins scanned card exports with card names from an APK's embedded
//! database.
//!
//! Two independent inputs feed one merge:
//! - an archive (an Android APK) holding a SQLite card catalogue, read by
//!   [`ArchiveLoader`] into [`NameRecord`]s;
//! - a standalone SQLite export of scanned cards, read by
//!   [`StandaloneLoader`] into [`ScannedRecord`]s.
//!
//! [`merge`] attaches a name to every scanned row by card id. [`Pipeline`]
//! runs both loaders concurrently and merges once both have finished.

pub mod error;
mod load;
mod merge;
mod models;
mod pipeline;

pub use crate::load::{
    ArchiveLoader, DEFAULT_NAMES_QUERY, DEFAULT_SUFFIX, DEFAULT_TABLE, StandaloneLoader,
};
pub use crate::merge::{MergeStats, merge};
pub use crate::models::{DEFAULT_KEY_COLUMN, EnrichedRecord, NAME_COLUMN, NameRecord, ScannedRecord};
pub use crate::pipeline::Pipeline;
pub use lensmerge_engine::Value;
