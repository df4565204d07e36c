//! Writes merged records as CSV or JSON.

use crate::error::{ErrorKind, Result};
use clap::ValueEnum;
use exn::ResultExt;
use lensmerge_core::EnrichedRecord;
use std::io::Write;
use std::path::Path;

/// Suggested output file name when saving a merge.
pub const DEFAULT_FILE_NAME: &str = "cards.csv";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Header row of every scanned column then `name`; unmatched names are empty.
    #[default]
    Csv,
    /// Array of flat objects; unmatched names are `null`.
    Json,
}

impl Format {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Write `records` to `writer`. Returns the number of records written.
pub fn write<W: Write>(format: Format, records: &[EnrichedRecord], writer: W) -> Result<usize> {
    match format {
        Format::Csv => write_csv(records, writer),
        Format::Json => write_json(records, writer),
    }
}

/// An empty record set has no columns to describe, so nothing is written.
fn write_csv<W: Write>(records: &[EnrichedRecord], writer: W) -> Result<usize> {
    let Some(first) = records.first() else {
        return Ok(0);
    };
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(first.column_names()).or_raise(|| ErrorKind::Export)?;
    for record in records {
        csv.write_record(record.columns().iter().map(|(_, value)| value.to_string()))
            .or_raise(|| ErrorKind::Export)?;
    }
    csv.flush().or_raise(|| ErrorKind::Export)?;
    Ok(records.len())
}

fn write_json<W: Write>(records: &[EnrichedRecord], mut writer: W) -> Result<usize> {
    serde_json::to_writer_pretty(&mut writer, records).or_raise(|| ErrorKind::Export)?;
    writeln!(writer).or_raise(|| ErrorKind::Export)?;
    writer.flush().or_raise(|| ErrorKind::Export)?;
    Ok(records.len())
}
