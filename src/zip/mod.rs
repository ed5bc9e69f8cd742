//! ZIP archive metadata parsing.
//!
//! This module decodes the binary structures that describe an archive's
//! contents without touching any payload bytes.
//!
//! ## Architecture
//!
//! The module is organized into leaf-first components:
//!
//! - [`fields`]: the shared little-endian field decoder
//! - [`string`]: name/comment text and its two encodings
//! - [`structures`]: the data model plus the pure domain decoders
//!   (DOS date/time, flag bits, compression methods, version words)
//! - [`parser`]: local/central header, data descriptor, and trailer parsers
//! - [`scanner`]: the signature-driven walk that produces [`ArchiveMetadata`]
//!
//! ## ZIP format overview
//!
//! A ZIP file consists of:
//! 1. A local file header followed by payload bytes, per entry
//! 2. Central directory headers for all entries, stored together
//! 3. An End of Central Directory record at the end
//!
//! Rather than trusting the trailer to locate entries, the scanner walks
//! the file front to back matching record signatures, which also copes
//! with archives whose trailer is damaged or absent.
//!
//! ## Limitations
//!
//! - No decompression or extraction; metadata only
//! - No ZIP64 extensions
//! - No repair of corrupt archives beyond surfacing decode errors

mod fields;
mod parser;
mod scanner;
mod string;
mod structures;

pub use scanner::{ScanOptions, ZipScanner};
pub use string::{TextEncoding, ZipText};
pub use structures::*;
