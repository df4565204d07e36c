//! Scanned rows from a standalone database export.

use crate::error::{ErrorKind, Result};
use crate::models::{DEFAULT_KEY_COLUMN, ScannedRecord};
use lensmerge_engine::{DatabaseImage, quote_identifier};
use tracing::instrument;

/// Relation holding one row per scanned card.
pub const DEFAULT_TABLE: &str = "cards";

/// Loads every row of one relation from a standalone database image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StandaloneLoader {
    table: String,
    key_column: String,
}

impl Default for StandaloneLoader {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE, DEFAULT_KEY_COLUMN)
    }
}

impl StandaloneLoader {
    pub fn new(table: impl Into<String>, key_column: impl Into<String>) -> Self {
        Self { table: table.into(), key_column: key_column.into() }
    }

    /// Read the whole relation, keeping every column of every row.
    #[instrument(skip_all, fields(image_size = image.len(), table = %self.table, rows))]
    pub async fn load(&self, image: Vec<u8>) -> Result<Vec<ScannedRecord>> {
        let mut engine = DatabaseImage::new(image).map_err(ErrorKind::engine)?.load().await.map_err(ErrorKind::engine)?;
        let sql = format!("SELECT * FROM {}", quote_identifier(&self.table));
        let rows = engine.fetch_all(&sql).await.map_err(ErrorKind::engine);
        engine.close().await;

        let records = rows?
            .into_iter()
            .map(|row| ScannedRecord::from_row(row, &self.key_column))
            .collect::<Result<Vec<_>>>()?;
        tracing::Span::current().record("rows", records.len());
        Ok(records)
    }
}
