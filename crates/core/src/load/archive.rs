//! Card names from the database embedded in an APK.

use crate::error::{ErrorKind, Result};
use crate::models::NameRecord;
use exn::OptionExt;
use lensmerge_archive::Archive;
use lensmerge_engine::DatabaseImage;
use tracing::instrument;

/// Suffix identifying the embedded database entry.
pub const DEFAULT_SUFFIX: &str = ".db";
/// Resolves every card id to its name via the catalogue's `names` relation.
pub const DEFAULT_NAMES_QUERY: &str = "SELECT cards._id, names.name FROM cards JOIN names ON cards.name = names._id";

/// Loads the card name table from a database file embedded in an archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveLoader {
    suffix: String,
    names_query: String,
}

impl Default for ArchiveLoader {
    fn default() -> Self {
        Self::new(DEFAULT_SUFFIX, DEFAULT_NAMES_QUERY)
    }
}

impl ArchiveLoader {
    /// `names_query` must project exactly `(id INTEGER, name TEXT)`.
    pub fn new(suffix: impl Into<String>, names_query: impl Into<String>) -> Self {
        Self { suffix: suffix.into(), names_query: names_query.into() }
    }

    /// Extract the embedded database and resolve its name table.
    ///
    /// Only the first entry (in archive order) ending with the suffix is
    /// used; any later candidates are ignored. Rows whose name resolves to
    /// `NULL` carry no name and are skipped.
    #[instrument(skip_all, fields(archive_size = archive.len(), suffix = %self.suffix, entry, names))]
    pub async fn load(&self, archive: Vec<u8>) -> Result<Vec<NameRecord>> {
        let mut archive = Archive::from_bytes(archive).map_err(ErrorKind::archive)?;
        let entry = archive
            .find_by_suffix(&self.suffix)
            .map_err(ErrorKind::archive)?
            .ok_or_raise(|| ErrorKind::DatabaseNotFound(self.suffix.clone()))?;
        tracing::Span::current().record("entry", entry.name());
        let bytes = archive.extract(&entry).map_err(ErrorKind::archive)?;
        drop(archive);

        let mut engine = DatabaseImage::new(bytes).map_err(ErrorKind::engine)?.load().await.map_err(ErrorKind::engine)?;
        let pairs = engine.fetch_pairs(&self.names_query).await.map_err(ErrorKind::engine);
        engine.close().await;

        let records: Vec<NameRecord> = pairs?
            .into_iter()
            .filter_map(|(id, name)| match name {
                Some(name) => Some(NameRecord::new(id, name)),
                None => {
                    tracing::debug!(id, "card has no name; skipping");
                    None
                },
            })
            .collect();
        tracing::Span::current().record("names", records.len());
        Ok(records)
    }
}
