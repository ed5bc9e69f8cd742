//! Main entry point for the zipmeta CLI.
//!
//! Accepts a path, scans the archive, and renders the collected headers.

use anyhow::{Context, Result};
use clap::Parser;

use zipmeta::{ArchiveMetadata, ByteCursor, Cli, ScanOptions, ZipScanner};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cursor = ByteCursor::open(&cli.file)
        .with_context(|| format!("cannot open {}", cli.file.display()))?;

    let options =
        ScanOptions { max_entries: cli.max_entries, max_scan_bytes: cli.max_scan_bytes };
    let metadata = ZipScanner::with_options(cursor, options)
        .scan()
        .with_context(|| format!("failed to scan {}", cli.file.display()))?;

    if cli.list {
        list_names(&metadata);
    } else {
        dump(&metadata);
    }

    Ok(())
}

/// One stored name per line, from the local headers in file order.
fn list_names(metadata: &ArchiveMetadata) {
    for header in &metadata.local_headers {
        println!("{}", header.file_name);
    }
}

/// Full field/value dump of every collected header.
fn dump(metadata: &ArchiveMetadata) {
    for header in &metadata.local_headers {
        println!("[Local header]\n{header}");
    }
    for header in &metadata.central_headers {
        println!("[Central header]\n{header}");
    }
    if let Some(record) = &metadata.end_of_central_directory {
        println!("[End of central directory]\n{record}");
    }
}
