//! Header parsers.
//!
//! Each parser expects the cursor to sit on the first byte of its record's
//! signature. The shape is the same everywhere: read the fixed prefix,
//! decode it through [`FieldReader`], validate the signature (the scanner
//! already classified it, but the parser does not trust its caller), then
//! read the variable-length suffix in a single exact read and slice it in
//! the format's fixed order. A parse either fully succeeds or the error
//! aborts the scan; no partial header is ever produced.

use std::io::{Read, Seek};

use crate::error::{Result, ZipError};
use crate::io::ByteCursor;

use super::fields::FieldReader;
use super::string::ZipText;
use super::structures::*;

fn check_signature(actual: u32, expected: u32) -> Result<u32> {
    if actual != expected {
        return Err(ZipError::SignatureMismatch { expected, actual });
    }
    Ok(actual)
}

impl LocalFileHeader {
    pub fn parse<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        let base = cursor.position();
        let prefix = cursor.read_exact(LOCAL_FILE_HEADER_SIZE)?;
        let mut fields = FieldReader::new(&prefix, base);

        let signature = check_signature(fields.read_u32()?, LOCAL_FILE_SIGNATURE)?;
        let minimum_version = fields.read_u16()?;
        let general_flags = GeneralPurposeFlags::from_raw(fields.read_u16()?);
        let compression_method = CompressionMethod::try_from(fields.read_u16()?)?;
        let last_modification_time = DosTime::from_raw(fields.read_u16()?);
        let last_modification_date = DosDate::from_raw(fields.read_u16()?);
        let crc_32 = fields.read_u32()?;
        let compressed_size = fields.read_u32()?;
        let uncompressed_size = fields.read_u32()?;
        let file_name_length = fields.read_u16()? as usize;
        let extra_field_length = fields.read_u16()? as usize;

        // One read for the whole variable-length suffix, then slice.
        let suffix = cursor.read_exact(file_name_length + extra_field_length)?;
        let mut parts = FieldReader::new(&suffix, base + LOCAL_FILE_HEADER_SIZE as u64);
        let file_name =
            ZipText::new(parts.read_bytes(file_name_length)?.to_vec(), general_flags.utf8_filename());
        let extra_bytes = parts.read_bytes(extra_field_length)?;
        let extra_field = (!extra_bytes.is_empty()).then(|| extra_bytes.to_vec());

        Ok(Self {
            signature,
            minimum_version,
            general_flags,
            compression_method,
            last_modification_time,
            last_modification_date,
            crc_32,
            compressed_size,
            uncompressed_size,
            file_name,
            extra_field,
            data_descriptor: None,
        })
    }
}

impl CentralDirectoryHeader {
    pub fn parse<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        let base = cursor.position();
        let prefix = cursor.read_exact(CENTRAL_DIRECTORY_HEADER_SIZE)?;
        let mut fields = FieldReader::new(&prefix, base);

        let signature = check_signature(fields.read_u32()?, CENTRAL_DIRECTORY_SIGNATURE)?;
        let version_made_by = Version::from_raw(fields.read_u16()?)?;
        let minimum_version = fields.read_u16()?;
        let general_flags = GeneralPurposeFlags::from_raw(fields.read_u16()?);
        let compression_method = CompressionMethod::try_from(fields.read_u16()?)?;
        let last_modification_time = DosTime::from_raw(fields.read_u16()?);
        let last_modification_date = DosDate::from_raw(fields.read_u16()?);
        let crc_32 = fields.read_u32()?;
        let compressed_size = fields.read_u32()?;
        let uncompressed_size = fields.read_u32()?;
        let file_name_length = fields.read_u16()? as usize;
        let extra_field_length = fields.read_u16()? as usize;
        let file_comment_length = fields.read_u16()? as usize;
        let disk_number = fields.read_u16()?;
        let internal_attributes = fields.read_u16()?;
        let external_attributes = fields.read_u32()?;
        let local_header_offset = fields.read_u32()?;

        // Suffix order is fixed by the format: name, extra field, comment.
        let suffix =
            cursor.read_exact(file_name_length + extra_field_length + file_comment_length)?;
        let mut parts = FieldReader::new(&suffix, base + CENTRAL_DIRECTORY_HEADER_SIZE as u64);
        let file_name =
            ZipText::new(parts.read_bytes(file_name_length)?.to_vec(), general_flags.utf8_filename());
        let extra_bytes = parts.read_bytes(extra_field_length)?;
        let extra_field = (!extra_bytes.is_empty()).then(|| extra_bytes.to_vec());
        let comment_bytes = parts.read_bytes(file_comment_length)?;
        let file_comment = (!comment_bytes.is_empty())
            .then(|| ZipText::new(comment_bytes.to_vec(), general_flags.utf8_filename()));

        Ok(Self {
            signature,
            version_made_by,
            minimum_version,
            general_flags,
            compression_method,
            last_modification_time,
            last_modification_date,
            crc_32,
            compressed_size,
            uncompressed_size,
            disk_number,
            internal_attributes,
            external_attributes,
            local_header_offset,
            file_name,
            extra_field,
            file_comment,
        })
    }
}

impl DataDescriptor {
    /// Parses the signature-prefixed form. Descriptors written without the
    /// optional signature cannot be located by a signature scan at all, so
    /// this is the only form that ever reaches a parser.
    pub fn parse<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        let base = cursor.position();
        let record = cursor.read_exact(DATA_DESCRIPTOR_SIZE)?;
        let mut fields = FieldReader::new(&record, base);

        check_signature(fields.read_u32()?, DATA_DESCRIPTOR_SIGNATURE)?;
        Ok(Self {
            crc_32: fields.read_u32()?,
            compressed_size: fields.read_u32()?,
            uncompressed_size: fields.read_u32()?,
        })
    }
}

impl EndOfCentralDirectory {
    pub fn parse<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        let base = cursor.position();
        let prefix = cursor.read_exact(END_OF_CENTRAL_DIRECTORY_SIZE)?;
        let mut fields = FieldReader::new(&prefix, base);

        let signature = check_signature(fields.read_u32()?, END_OF_CENTRAL_DIRECTORY_SIGNATURE)?;
        let disk_number = fields.read_u16()?;
        let disk_with_central_directory = fields.read_u16()?;
        let disk_entries = fields.read_u16()?;
        let total_entries = fields.read_u16()?;
        let central_directory_size = fields.read_u32()?;
        let central_directory_offset = fields.read_u32()?;
        let comment_length = fields.read_u16()? as usize;

        // The archive comment has no encoding flag anywhere; CP437 is the
        // only defensible reading.
        let comment = if comment_length > 0 {
            Some(ZipText::new(cursor.read_exact(comment_length)?, false))
        } else {
            None
        };

        Ok(Self {
            signature,
            disk_number,
            disk_with_central_directory,
            disk_entries,
            total_entries,
            central_directory_size,
            central_directory_offset,
            comment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_header_bytes(name: &str, method: u16, flags: u16, extra: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&LOCAL_FILE_SIGNATURE.to_le_bytes());
        buf.extend_from_slice(&20u16.to_le_bytes());
        buf.extend_from_slice(&flags.to_le_bytes());
        buf.extend_from_slice(&method.to_le_bytes());
        buf.extend_from_slice(&0x632fu16.to_le_bytes()); // 12:25:30
        buf.extend_from_slice(&0x0821u16.to_le_bytes()); // 1984-01-01
        buf.extend_from_slice(&0xdead_beefu32.to_le_bytes());
        buf.extend_from_slice(&5u32.to_le_bytes());
        buf.extend_from_slice(&5u32.to_le_bytes());
        buf.extend_from_slice(&(name.len() as u16).to_le_bytes());
        buf.extend_from_slice(&(extra.len() as u16).to_le_bytes());
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(extra);
        buf
    }

    #[test]
    fn local_header_parses_fixed_and_variable_parts() {
        let mut cursor = ByteCursor::from_bytes(local_header_bytes("a.txt", 0, 0, &[]));
        let header = LocalFileHeader::parse(&mut cursor).unwrap();

        assert_eq!(header.minimum_version, 20);
        assert_eq!(header.compression_method, CompressionMethod::Store);
        assert_eq!(header.last_modification_time.to_string(), "12:25:30");
        assert_eq!(header.last_modification_date.to_string(), "1984-01-01");
        assert_eq!(header.crc32_hex(), "deadbeef");
        assert_eq!(header.file_name.decode(), "a.txt");
        assert_eq!(header.extra_field, None);
        assert_eq!(header.data_descriptor, None);
        assert_eq!(cursor.position(), 35);
    }

    #[test]
    fn zero_length_extra_field_is_absent_not_empty() {
        let mut cursor = ByteCursor::from_bytes(local_header_bytes("a", 0, 0, &[1, 2, 3]));
        let header = LocalFileHeader::parse(&mut cursor).unwrap();
        assert_eq!(header.extra_field, Some(vec![1, 2, 3]));

        let mut cursor = ByteCursor::from_bytes(local_header_bytes("a", 0, 0, &[]));
        let header = LocalFileHeader::parse(&mut cursor).unwrap();
        assert_eq!(header.extra_field, None);
    }

    #[test]
    fn truncated_prefix_never_yields_a_partial_header() {
        let bytes = local_header_bytes("a.txt", 0, 0, &[]);
        let mut cursor = ByteCursor::from_bytes(bytes[..10].to_vec());
        let err = LocalFileHeader::parse(&mut cursor).unwrap_err();
        assert!(matches!(err, ZipError::TruncatedInput { offset: 10 }));
    }

    #[test]
    fn wrong_signature_is_rejected_defensively() {
        let mut bytes = local_header_bytes("a.txt", 0, 0, &[]);
        bytes[2] = 0x01; // corrupt the magic
        let mut cursor = ByteCursor::from_bytes(bytes);
        let err = LocalFileHeader::parse(&mut cursor).unwrap_err();
        assert!(matches!(
            err,
            ZipError::SignatureMismatch { expected: LOCAL_FILE_SIGNATURE, .. }
        ));
    }

    #[test]
    fn unknown_method_code_fails_the_parse() {
        let mut cursor = ByteCursor::from_bytes(local_header_bytes("a.txt", 99, 0, &[]));
        let err = LocalFileHeader::parse(&mut cursor).unwrap_err();
        assert!(matches!(
            err,
            ZipError::UnknownEnumerationValue { field: "compression method", value: 99 }
        ));
    }

    #[test]
    fn data_descriptor_parses_its_three_fields() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&DATA_DESCRIPTOR_SIGNATURE.to_le_bytes());
        buf.extend_from_slice(&0x1234_5678u32.to_le_bytes());
        buf.extend_from_slice(&3u32.to_le_bytes());
        buf.extend_from_slice(&9u32.to_le_bytes());

        let mut cursor = ByteCursor::from_bytes(buf);
        let descriptor = DataDescriptor::parse(&mut cursor).unwrap();
        assert_eq!(
            descriptor,
            DataDescriptor { crc_32: 0x1234_5678, compressed_size: 3, uncompressed_size: 9 }
        );
    }
}
