use crate::error::Result;
use crate::load::{ArchiveLoader, StandaloneLoader};
use crate::merge::{MergeStats, merge};
use crate::models::EnrichedRecord;
use tracing::instrument;

/// Loads both inputs concurrently, then joins them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pipeline {
    archive: ArchiveLoader,
    standalone: StandaloneLoader,
}

impl Pipeline {
    pub fn new(archive: ArchiveLoader, standalone: StandaloneLoader) -> Self {
        Self { archive, standalone }
    }

    /// Run one merge over an archive and a standalone database image.
    ///
    /// The merge only starts once both loaders have finished. If either
    /// loader fails, its error is returned and nothing is produced.
    #[instrument(skip_all, fields(archive_size = archive.len(), image_size = image.len()))]
    pub async fn run(&self, archive: Vec<u8>, image: Vec<u8>) -> Result<Vec<EnrichedRecord>> {
        let (names, scanned) = tokio::try_join!(self.archive.load(archive), self.standalone.load(image))?;
        tracing::debug!(names = names.len(), scanned = scanned.len(), "both inputs loaded");

        let records = merge(&names, &scanned);
        let stats = MergeStats::from(records.as_slice());
        tracing::info!(
            names = names.len(),
            total = stats.total,
            matched = stats.matched,
            unmatched = stats.unmatched,
            "merged scanned cards with card names"
        );
        Ok(records)
    }
}
