use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, ZipError};

/// Little-endian field decoder over one fixed-size record slice.
///
/// Every header parser funnels its fixed prefix through this type, so the
/// bit-twiddling lives in exactly one place. `base` is the absolute archive
/// offset of the slice's first byte; truncation errors report `base` plus
/// the slice length, the position at which more input was needed.
pub struct FieldReader<'a> {
    buf: &'a [u8],
    pos: usize,
    base: u64,
}

impl<'a> FieldReader<'a> {
    pub fn new(buf: &'a [u8], base: u64) -> Self {
        Self { buf, pos: 0, base }
    }

    fn take(&mut self, width: usize) -> Result<&'a [u8]> {
        if self.buf.len() - self.pos < width {
            return Err(ZipError::TruncatedInput { offset: self.base + self.buf.len() as u64 });
        }
        let slice = &self.buf[self.pos..self.pos + width];
        self.pos += width;
        Ok(slice)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }
}
