use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "zipmeta")]
#[command(version)]
#[command(about = "Scan ZIP archive metadata without extracting anything", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipmeta archive.zip                   dump every header in the archive\n  \
  zipmeta -l archive.zip                list stored file names only\n  \
  zipmeta --max-entries 1000 evil.zip   bound work on untrusted input")]
pub struct Cli {
    /// ZIP file path
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// List stored file names only
    #[arg(short = 'l')]
    pub list: bool,

    /// Stop with an error after this many headers
    #[arg(long, value_name = "N")]
    pub max_entries: Option<usize>,

    /// Stop with an error past this scan position
    #[arg(long, value_name = "BYTES")]
    pub max_scan_bytes: Option<u64>,
}
