use crate::Engine;
use crate::error::{ErrorKind, Result, classify};
use exn::ResultExt;
use sqlx::ConnectOptions;
use sqlx::sqlite::SqliteConnectOptions;
use std::io::Write;
use tracing::instrument;

/// Every SQLite 3 database file starts with this 16-byte header string.
const SQLITE_MAGIC: &[u8; 16] = b"SQLite format 3\0";

/// A complete SQLite database file held in memory.
///
/// An image is consumed exactly once by [`load`](Self::load); the bytes are
/// not retained after the engine takes over.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseImage {
    bytes: Vec<u8>,
}

impl std::fmt::Debug for DatabaseImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseImage").field("size", &self.bytes.len()).finish()
    }
}

impl DatabaseImage {
    /// Wrap raw bytes as a database image.
    ///
    /// Returns [`ErrorKind::Format`] if the bytes do not start with the
    /// SQLite header. Corruption past the header is only detected once the
    /// engine reads it.
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        if !Self::check_magic_bytes(&bytes) {
            exn::bail!(ErrorKind::Format);
        }
        Ok(Self { bytes })
    }

    /// Returns `true` if `bytes` start with the SQLite 3 file header.
    #[must_use]
    pub fn check_magic_bytes(bytes: &[u8]) -> bool {
        bytes.starts_with(SQLITE_MAGIC)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Load the image into a fresh, private, read-only engine.
    ///
    /// The image is staged into an anonymous temporary file owned by the
    /// returned [`Engine`] and removed when the engine is closed or dropped.
    #[instrument(skip_all, fields(size = self.bytes.len()))]
    pub async fn load(self) -> Result<Engine> {
        let mut staged = tempfile::Builder::new()
            .prefix("lensmerge-")
            .suffix(".db")
            .tempfile()
            .or_raise(|| ErrorKind::Io)?;
        staged.write_all(&self.bytes).or_raise(|| ErrorKind::Io)?;
        staged.flush().or_raise(|| ErrorKind::Io)?;
        drop(self);

        let options = SqliteConnectOptions::new()
            .filename(staged.path())
            .create_if_missing(false)
            // Nothing else can see the staged file, so skip locking and
            // change detection entirely.
            .read_only(true)
            .immutable(true);
        let conn = match options.connect().await {
            Ok(conn) => conn,
            Err(err) => {
                let kind = classify(&err, ErrorKind::Format);
                return Err(err).or_raise(|| kind);
            },
        };
        tracing::debug!(path = %staged.path().display(), "database image staged and opened");
        Ok(Engine::new(conn, staged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"SQLite format 3\0", true)]
    #[case(b"SQLite format 3\0\x10\x00\x01\x01", true)]
    #[case(b"SQLite format 3", false)]
    #[case(b"SQLite format 2\0", false)]
    #[case(b"PK\x03\x04", false)]
    #[case(b"", false)]
    fn test_check_magic_bytes(#[case] bytes: &[u8], #[case] expected: bool) {
        assert_eq!(DatabaseImage::check_magic_bytes(bytes), expected);
    }

    #[test]
    fn test_new_rejects_non_database() {
        let err = DatabaseImage::new(b"<!DOCTYPE html>".to_vec()).unwrap_err();
        assert_eq!(*err, ErrorKind::Format);
    }

    #[test]
    fn test_debug_hides_content() {
        let image = DatabaseImage::new(b"SQLite format 3\0secret".to_vec()).unwrap();
        assert_eq!(format!("{image:?}"), "DatabaseImage { size: 22 }");
    }
}
