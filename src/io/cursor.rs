use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Result, ZipError};

/// Sequential, forward-only reader over a seekable byte source.
///
/// The scanner walks the archive in 4-byte windows and needs to step back
/// over a window once a signature matches (or overlap the next window by
/// one byte when it does not), so the cursor supports relative rewinds on
/// top of plain reads. The backing storage is anything `Read + Seek`: a
/// file handle or an in-memory buffer. No buffering is done beyond what a
/// single read requires, so the whole archive never has to fit in memory.
pub struct ByteCursor<R> {
    inner: R,
    position: u64,
}

impl ByteCursor<File> {
    /// Open a file on the local filesystem at position zero.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl ByteCursor<Cursor<Vec<u8>>> {
    /// Wrap an in-memory buffer, mostly useful for tests and small inputs.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::new(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Absolute offset of the next byte to be read.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Fill as much of `buf` as the source can provide and return the
    /// number of bytes actually read. Zero signals exhaustion, a short
    /// fill signals trailing bytes; neither is an error.
    pub fn read_window(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.inner.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        self.position += filled as u64;
        Ok(filled)
    }

    /// Read exactly `n` bytes or fail with [`ZipError::TruncatedInput`]
    /// carrying the offset at which the input ran out.
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        let filled = self.read_window(&mut buf)?;
        if filled < n {
            return Err(ZipError::TruncatedInput { offset: self.position });
        }
        Ok(buf)
    }

    /// Move the position backwards by `n` bytes.
    pub fn rewind_by(&mut self, n: u64) -> Result<()> {
        self.position = self.inner.seek(SeekFrom::Current(-(n as i64)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_reads_advance_the_position() {
        let mut cursor = ByteCursor::from_bytes(vec![1, 2, 3, 4, 5, 6]);
        let mut window = [0u8; 4];
        assert_eq!(cursor.read_window(&mut window).unwrap(), 4);
        assert_eq!(window, [1, 2, 3, 4]);
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn short_window_at_end_of_input() {
        let mut cursor = ByteCursor::from_bytes(vec![1, 2]);
        let mut window = [0u8; 4];
        assert_eq!(cursor.read_window(&mut window).unwrap(), 2);
        assert_eq!(cursor.read_window(&mut window).unwrap(), 0);
    }

    #[test]
    fn rewind_steps_back_over_a_window() {
        let mut cursor = ByteCursor::from_bytes(vec![b'P', b'K', 3, 4, 9, 9]);
        let mut window = [0u8; 4];
        cursor.read_window(&mut window).unwrap();
        cursor.rewind_by(4).unwrap();
        assert_eq!(cursor.position(), 0);
        let again = cursor.read_exact(4).unwrap();
        assert_eq!(again, vec![b'P', b'K', 3, 4]);
    }

    #[test]
    fn exact_read_past_the_end_reports_the_offset() {
        let mut cursor = ByteCursor::from_bytes(vec![0u8; 10]);
        let err = cursor.read_exact(30).unwrap_err();
        assert!(matches!(err, ZipError::TruncatedInput { offset: 10 }));
    }
}
