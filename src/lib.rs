//! # zipmeta
//!
//! A ZIP archive metadata scanner.
//!
//! This library walks the raw bytes of a ZIP container, locates record
//! signatures, and decodes the local file headers and central directory
//! headers describing each stored entry, without decompressing or
//! extracting anything. Archives are read in small bounded chunks, so a
//! large file never has to reside in memory at once.
//!
//! ## Features
//!
//! - Local file header and central directory header decoding in file order
//! - DOS date/time, flag-bit, compression-method and version decoding
//! - CP437 and UTF-8 file name handling per flag bit 11
//! - Trailing data descriptor capture for streamed entries
//! - Configurable scan bounds for untrusted input
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use zipmeta::{ByteCursor, ZipScanner};
//!
//! fn main() -> zipmeta::Result<()> {
//!     let cursor = ByteCursor::open(Path::new("archive.zip"))?;
//!     let metadata = ZipScanner::new(cursor).scan()?;
//!
//!     for header in &metadata.local_headers {
//!         println!("{} ({})", header.file_name, header.compression_method);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod zip;

pub use cli::Cli;
pub use error::{Result, ZipError};
pub use io::ByteCursor;
pub use zip::{
    ArchiveMetadata, CentralDirectoryHeader, CompressionMethod, DataDescriptor, DosDate, DosTime,
    EndOfCentralDirectory, GeneralPurposeFlags, LocalFileHeader, Platform, ScanOptions,
    TextEncoding, Version, ZipScanner, ZipText,
};
