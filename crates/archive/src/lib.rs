//! ZIP archive access for locating embedded files.
//!
//! Android packages (and plenty of other distribution formats) are plain ZIP
//! archives. This crate wraps the [`zip`] crate behind a small API tailored to
//! "find the one file I care about and give me its bytes":
//!
//! - **Open** an archive held entirely in memory ([`Archive::from_bytes`])
//! - **Scan** entries in central directory order and pick the first whose
//!   name ends with a suffix ([`Archive::find_by_suffix`])
//! - **Extract** the full content of a located [`Entry`] ([`Archive::extract`])
//!
//! Scanning reads entry headers only; nothing is decompressed until an entry
//! is extracted.

pub mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::{Cursor, Read};
use tracing::instrument;
use zip::ZipArchive;

// Sizes in entry headers are attacker-controlled; never trust them for more
// than a modest up-front allocation.
const MAX_PREALLOCATION: u64 = 64 * 1024 * 1024;

/// An entry located inside an [`Archive`].
///
/// Only valid for the archive that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    index: usize,
    name: String,
    size: u64,
}

impl Entry {
    /// Full path of the entry inside the archive (e.g. `"assets/data.db"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uncompressed size as recorded in the entry header.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Position of the entry in the archive's central directory.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// An in-memory ZIP archive.
pub struct Archive {
    inner: ZipArchive<Cursor<Vec<u8>>>,
}

impl Archive {
    /// Open an archive from its raw bytes.
    ///
    /// Returns [`ErrorKind::InvalidArchive`] if the bytes are not a ZIP
    /// archive, including truncated downloads where the central directory is
    /// missing.
    #[instrument(skip_all, fields(size = bytes.len(), entries))]
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let inner = ZipArchive::new(Cursor::new(bytes)).or_raise(|| ErrorKind::InvalidArchive)?;
        tracing::Span::current().record("entries", inner.len());
        Ok(Self { inner })
    }

    /// Number of entries (files and directories) in the archive.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    /// All entry names, in central directory order.
    pub fn entry_names(&mut self) -> Result<Vec<String>> {
        (0..self.inner.len())
            .map(|index| {
                let file = self.inner.by_index_raw(index).or_raise(|| ErrorKind::InvalidArchive)?;
                Ok(file.name().to_string())
            })
            .collect()
    }

    /// Find the first file entry whose name ends with `suffix`.
    ///
    /// Entries are visited in central directory order and the first match
    /// wins; any later candidates are ignored. Matching is case-sensitive,
    /// and directory entries never match.
    #[instrument(skip(self), fields(entries = self.inner.len(), matched))]
    pub fn find_by_suffix(&mut self, suffix: &str) -> Result<Option<Entry>> {
        for index in 0..self.inner.len() {
            let file = self.inner.by_index_raw(index).or_raise(|| ErrorKind::InvalidArchive)?;
            if file.is_dir() || !file.name().ends_with(suffix) {
                continue;
            }
            let entry = Entry { index, name: file.name().to_string(), size: file.size() };
            tracing::Span::current().record("matched", entry.name.as_str());
            return Ok(Some(entry));
        }
        Ok(None)
    }

    /// Decompress the full content of an entry.
    ///
    /// Returns [`ErrorKind::Read`] if the content cannot be decompressed or
    /// fails its checksum, and [`ErrorKind::Empty`] if it contains no bytes.
    #[instrument(skip(self), fields(name = entry.name(), output_size))]
    pub fn extract(&mut self, entry: &Entry) -> Result<Vec<u8>> {
        let mut file = self.inner.by_index(entry.index).or_raise(|| ErrorKind::Read(entry.name.clone()))?;
        let capacity = usize::try_from(file.size().min(MAX_PREALLOCATION)).unwrap_or_default();
        let mut output = Vec::with_capacity(capacity);
        file.read_to_end(&mut output).or_raise(|| ErrorKind::Read(entry.name.clone()))?;
        tracing::Span::current().record("output_size", output.len());
        if output.is_empty() {
            exn::bail!(ErrorKind::Empty(entry.name.clone()));
        }
        Ok(output)
    }
}
