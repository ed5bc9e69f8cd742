//! Signature-driven archive walk.
//!
//! The scanner does not trust the end-of-central-directory record to
//! locate entries; it reads the archive front to back and classifies
//! 4-byte windows against the known signatures. That tolerates archives
//! whose trailer is malformed or missing, at the cost of a known
//! false-positive risk: a signature byte sequence inside compressed
//! payload looks like a header. A mis-detected header fails its decode
//! and aborts the scan with that error instead of desynchronising.

use std::io::{Read, Seek};

use tracing::debug;

use crate::error::{Result, ZipError};
use crate::io::ByteCursor;

use super::structures::*;

/// Work bounds for scanning untrusted input.
///
/// A crafted archive can make a signature scan arbitrarily expensive, so
/// callers exposed to hostile bytes can cap the scan. `max_entries` counts
/// local and central headers together.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub max_entries: Option<usize>,
    pub max_scan_bytes: Option<u64>,
}

enum State {
    Scanning,
    ParsingLocalHeader,
    ParsingCentralHeader,
    ParsingDataDescriptor,
    ParsingEndOfCentralDirectory,
    Done,
}

/// Walks an archive and accumulates [`ArchiveMetadata`].
///
/// Single sequential pass; each step depends on the cursor position
/// established by the previous one. The byte source is owned for the
/// duration of the scan and dropped on every exit path.
pub struct ZipScanner<R> {
    cursor: ByteCursor<R>,
    options: ScanOptions,
}

impl<R: Read + Seek> ZipScanner<R> {
    pub fn new(cursor: ByteCursor<R>) -> Self {
        Self::with_options(cursor, ScanOptions::default())
    }

    pub fn with_options(cursor: ByteCursor<R>, options: ScanOptions) -> Self {
        Self { cursor, options }
    }

    /// Run the scan to completion.
    ///
    /// Returns the complete metadata or the first decode error; partial
    /// results are never returned (a header with unreadable length fields
    /// cannot be skipped without losing every later record boundary).
    pub fn scan(mut self) -> Result<ArchiveMetadata> {
        let mut metadata = ArchiveMetadata::default();
        let mut state = State::Scanning;

        loop {
            state = match state {
                State::Scanning => self.classify(&metadata)?,
                State::ParsingLocalHeader => {
                    let offset = self.cursor.position();
                    let header = LocalFileHeader::parse(&mut self.cursor)?;
                    debug!(offset, name = %header.file_name, "local file header");
                    metadata.local_headers.push(header);
                    self.check_entry_limit(&metadata)?;
                    State::Scanning
                }
                State::ParsingCentralHeader => {
                    let offset = self.cursor.position();
                    let header = CentralDirectoryHeader::parse(&mut self.cursor)?;
                    debug!(offset, name = %header.file_name, "central directory header");
                    metadata.central_headers.push(header);
                    self.check_entry_limit(&metadata)?;
                    State::Scanning
                }
                State::ParsingDataDescriptor => {
                    let offset = self.cursor.position();
                    let descriptor = DataDescriptor::parse(&mut self.cursor)?;
                    debug!(offset, "data descriptor");
                    if let Some(header) = metadata.local_headers.last_mut() {
                        header.data_descriptor = Some(descriptor);
                    }
                    State::Scanning
                }
                State::ParsingEndOfCentralDirectory => {
                    let offset = self.cursor.position();
                    let record = EndOfCentralDirectory::parse(&mut self.cursor)?;
                    debug!(offset, entries = record.total_entries, "end of central directory");
                    metadata.end_of_central_directory = Some(record);
                    // The trailer closes the archive; bytes after it are
                    // not part of the format.
                    State::Done
                }
                State::Done => {
                    debug!(
                        local = metadata.local_headers.len(),
                        central = metadata.central_headers.len(),
                        "scan complete"
                    );
                    return Ok(metadata);
                }
            };
        }
    }

    /// Read one 4-byte window and decide where to go next.
    fn classify(&mut self, metadata: &ArchiveMetadata) -> Result<State> {
        if let Some(limit) = self.options.max_scan_bytes {
            if self.cursor.position() > limit {
                return Err(ZipError::ScanLimitExceeded { limit });
            }
        }

        let mut window = [0u8; 4];
        let filled = self.cursor.read_window(&mut window)?;
        if filled < 4 {
            // Exhausted, or a tail too short to hold any signature.
            return Ok(State::Done);
        }

        match u32::from_le_bytes(window) {
            LOCAL_FILE_SIGNATURE => {
                self.cursor.rewind_by(4)?;
                Ok(State::ParsingLocalHeader)
            }
            CENTRAL_DIRECTORY_SIGNATURE => {
                self.cursor.rewind_by(4)?;
                Ok(State::ParsingCentralHeader)
            }
            END_OF_CENTRAL_DIRECTORY_SIGNATURE => {
                self.cursor.rewind_by(4)?;
                Ok(State::ParsingEndOfCentralDirectory)
            }
            DATA_DESCRIPTOR_SIGNATURE if expects_data_descriptor(metadata) => {
                self.cursor.rewind_by(4)?;
                Ok(State::ParsingDataDescriptor)
            }
            _ => {
                // Signatures are not 4-byte aligned; overlap the next
                // window by stepping back all but one byte.
                self.cursor.rewind_by(3)?;
                Ok(State::Scanning)
            }
        }
    }

    fn check_entry_limit(&self, metadata: &ArchiveMetadata) -> Result<()> {
        if let Some(limit) = self.options.max_entries {
            if metadata.local_headers.len() + metadata.central_headers.len() > limit {
                return Err(ZipError::EntryLimitExceeded { limit });
            }
        }
        Ok(())
    }
}

/// A descriptor window only counts when the most recent local header
/// declared flag bit 3 and has not been given its descriptor yet;
/// anything else is payload.
fn expects_data_descriptor(metadata: &ArchiveMetadata) -> bool {
    metadata
        .local_headers
        .last()
        .is_some_and(|h| h.general_flags.has_data_descriptor() && h.data_descriptor.is_none())
}
