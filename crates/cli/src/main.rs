//! lensmerge CLI entry point.

mod error;
mod export;

use crate::error::{ErrorKind, Result};
use crate::export::Format;
use clap::{ArgAction, Parser};
use exn::ResultExt;
use lensmerge_config::Config;
use lensmerge_core::MergeStats;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Attach card names from an APK's catalogue to a scanned card export.
#[derive(Debug, Parser)]
#[command(name = "lensmerge", version, about)]
struct Args {
    /// APK (ZIP archive) containing the card catalogue database.
    apk: PathBuf,
    /// Scanned card export (a standalone SQLite database).
    dlens: PathBuf,
    /// Write the merged records here instead of stdout. A directory gets a
    /// `cards.csv` inside it.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Output format. Defaults to the output file's extension, then CSV.
    #[arg(short, long, value_enum)]
    format: Option<Format>,
    /// Configuration file (TOML).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn output_path(&self) -> Option<PathBuf> {
        let path = self.output.as_ref()?;
        Some(if path.is_dir() { path.join(export::DEFAULT_FILE_NAME) } else { path.clone() })
    }

    fn format(&self) -> Format {
        self.format.or_else(|| self.output.as_deref().and_then(Format::from_path)).unwrap_or_default()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(args: &Args) -> Result<()> {
    let config = Config::load(args.config.as_deref()).map_err(ErrorKind::config)?;
    let (apk, dlens) = tokio::try_join!(read(&args.apk), read(&args.dlens))?;
    let records = config.pipeline().run(apk, dlens).await.map_err(ErrorKind::pipeline)?;

    let output = args.output_path();
    let format = args.format();
    let written = match &output {
        Some(path) => {
            let file = std::fs::File::create(path).or_raise(|| ErrorKind::Create(path.display().to_string()))?;
            export::write(format, &records, BufWriter::new(file))?
        },
        None => export::write(format, &records, std::io::stdout().lock())?,
    };

    let stats = MergeStats::from(records.as_slice());
    tracing::info!(written, matched = stats.matched, unmatched = stats.unmatched, ?format, "export complete");
    if let Some(path) = &output {
        eprintln!("Wrote {written} records to {} ({} without a name)", path.display(), stats.unmatched);
    }
    Ok(())
}

async fn read(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.or_raise(|| ErrorKind::Read(path.display().to_string()))
}
