use std::fmt;

use crate::error::{Result, ZipError};

use super::string::ZipText;

/// Record magics, little-endian. Any 4-byte window matching none of these
/// is payload, not a header.
pub const LOCAL_FILE_SIGNATURE: u32 = 0x0403_4b50;
pub const CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0201_4b50;
pub const END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0605_4b50;
pub const DATA_DESCRIPTOR_SIGNATURE: u32 = 0x0807_4b50;

/// Fixed prefix sizes, before the variable-length suffixes.
pub const LOCAL_FILE_HEADER_SIZE: usize = 30;
pub const CENTRAL_DIRECTORY_HEADER_SIZE: usize = 46;
pub const DATA_DESCRIPTOR_SIZE: usize = 16;
pub const END_OF_CENTRAL_DIRECTORY_SIZE: usize = 22;

/// Render a signature the way the format references write it: the four
/// bytes in file order, e.g. `\x50\x4b\x03\x04`.
pub fn signature_string(signature: u32) -> String {
    signature.to_le_bytes().iter().map(|b| format!("\\x{b:02x}")).collect()
}

/// The closed table of compression method codes.
///
/// Codes outside the table (7, 13, 99, ...) are rejected rather than
/// coerced, so a corrupt method field cannot masquerade as STORE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Store,
    Shrunk,
    Reduced1,
    Reduced2,
    Reduced3,
    Reduced4,
    Imploded,
    Deflate,
    EnhancedDeflate,
    PkwareDclImploded,
    Reserved,
    Bzip2,
    Lzma,
    IbmCmpsc,
    IbmTerse,
    IbmLz77Z,
    JpegVariant,
    WavPack,
    PpmdVersionI,
}

impl TryFrom<u16> for CompressionMethod {
    type Error = ZipError;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0 => Ok(CompressionMethod::Store),
            1 => Ok(CompressionMethod::Shrunk),
            2 => Ok(CompressionMethod::Reduced1),
            3 => Ok(CompressionMethod::Reduced2),
            4 => Ok(CompressionMethod::Reduced3),
            5 => Ok(CompressionMethod::Reduced4),
            6 => Ok(CompressionMethod::Imploded),
            8 => Ok(CompressionMethod::Deflate),
            9 => Ok(CompressionMethod::EnhancedDeflate),
            10 => Ok(CompressionMethod::PkwareDclImploded),
            11 => Ok(CompressionMethod::Reserved),
            12 => Ok(CompressionMethod::Bzip2),
            14 => Ok(CompressionMethod::Lzma),
            16 => Ok(CompressionMethod::IbmCmpsc),
            18 => Ok(CompressionMethod::IbmTerse),
            19 => Ok(CompressionMethod::IbmLz77Z),
            96 => Ok(CompressionMethod::JpegVariant),
            97 => Ok(CompressionMethod::WavPack),
            98 => Ok(CompressionMethod::PpmdVersionI),
            _ => Err(ZipError::UnknownEnumerationValue {
                field: "compression method",
                value: value as u32,
            }),
        }
    }
}

impl From<CompressionMethod> for u16 {
    fn from(method: CompressionMethod) -> u16 {
        match method {
            CompressionMethod::Store => 0,
            CompressionMethod::Shrunk => 1,
            CompressionMethod::Reduced1 => 2,
            CompressionMethod::Reduced2 => 3,
            CompressionMethod::Reduced3 => 4,
            CompressionMethod::Reduced4 => 5,
            CompressionMethod::Imploded => 6,
            CompressionMethod::Deflate => 8,
            CompressionMethod::EnhancedDeflate => 9,
            CompressionMethod::PkwareDclImploded => 10,
            CompressionMethod::Reserved => 11,
            CompressionMethod::Bzip2 => 12,
            CompressionMethod::Lzma => 14,
            CompressionMethod::IbmCmpsc => 16,
            CompressionMethod::IbmTerse => 18,
            CompressionMethod::IbmLz77Z => 19,
            CompressionMethod::JpegVariant => 96,
            CompressionMethod::WavPack => 97,
            CompressionMethod::PpmdVersionI => 98,
        }
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompressionMethod::Store => "STORE",
            CompressionMethod::Shrunk => "SHRUNK",
            CompressionMethod::Reduced1 => "REDUCED_1",
            CompressionMethod::Reduced2 => "REDUCED_2",
            CompressionMethod::Reduced3 => "REDUCED_3",
            CompressionMethod::Reduced4 => "REDUCED_4",
            CompressionMethod::Imploded => "IMPLODED",
            CompressionMethod::Deflate => "DEFLATE",
            CompressionMethod::EnhancedDeflate => "ENHANCED_DEFLATED",
            CompressionMethod::PkwareDclImploded => "PKWARE_DCL_IMPLODED",
            CompressionMethod::Reserved => "RESERVED",
            CompressionMethod::Bzip2 => "BZIP2",
            CompressionMethod::Lzma => "LZMA",
            CompressionMethod::IbmCmpsc => "IBM_CMPSC",
            CompressionMethod::IbmTerse => "IBM_TERSE",
            CompressionMethod::IbmLz77Z => "IBM_LZ77_Z",
            CompressionMethod::JpegVariant => "JPEG_VARIANT",
            CompressionMethod::WavPack => "WAVPACK",
            CompressionMethod::PpmdVersionI => "PPMD_VERSION_I",
        };
        f.write_str(name)
    }
}

/// The platform half of a version word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MsDos,
    Amiga,
    OpenVms,
    Unix,
    VmCms,
    AtariSt,
    Os2Hpfs,
    Macintosh,
    ZSystem,
    CpM,
    WindowsNtfs,
    Mvs,
    Vse,
    AcornRisc,
    Vfat,
    AlternateMvs,
    BeOs,
    Tandem,
    Os400,
    MacOsX,
    Unused,
}

impl TryFrom<u8> for Platform {
    type Error = ZipError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Platform::MsDos),
            1 => Ok(Platform::Amiga),
            2 => Ok(Platform::OpenVms),
            3 => Ok(Platform::Unix),
            4 => Ok(Platform::VmCms),
            5 => Ok(Platform::AtariSt),
            6 => Ok(Platform::Os2Hpfs),
            7 => Ok(Platform::Macintosh),
            8 => Ok(Platform::ZSystem),
            9 => Ok(Platform::CpM),
            10 => Ok(Platform::WindowsNtfs),
            11 => Ok(Platform::Mvs),
            12 => Ok(Platform::Vse),
            13 => Ok(Platform::AcornRisc),
            14 => Ok(Platform::Vfat),
            15 => Ok(Platform::AlternateMvs),
            16 => Ok(Platform::BeOs),
            17 => Ok(Platform::Tandem),
            18 => Ok(Platform::Os400),
            19 => Ok(Platform::MacOsX),
            20 => Ok(Platform::Unused),
            _ => Err(ZipError::UnknownEnumerationValue {
                field: "version platform",
                value: value as u32,
            }),
        }
    }
}

/// A "version made by" word: high byte platform, low byte spec version
/// (tens/units, so 20 means 2.0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub platform: Platform,
    pub spec_version: u8,
}

impl Version {
    pub fn from_raw(raw: u16) -> Result<Self> {
        let platform = Platform::try_from((raw >> 8) as u8)?;
        Ok(Self { platform, spec_version: (raw & 0xff) as u8 })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}.{}", self.platform, self.spec_version / 10, self.spec_version % 10)
    }
}

/// A packed MS-DOS date: year (7 bits, 1980-based), month (4), day (5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl DosDate {
    /// Total over all 16-bit inputs; the format has no notion of an
    /// invalid calendar day.
    pub fn from_raw(raw: u16) -> Self {
        Self {
            year: (raw >> 9) + 1980,
            month: ((raw >> 5) & 0x0f) as u8,
            day: (raw & 0x1f) as u8,
        }
    }
}

impl fmt::Display for DosDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A packed MS-DOS time: hour (5 bits), minute (6), second (5, halved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DosTime {
    pub fn from_raw(raw: u16) -> Self {
        Self {
            hour: (raw >> 11) as u8,
            minute: ((raw >> 5) & 0x3f) as u8,
            second: ((raw & 0x1f) * 2) as u8,
        }
    }
}

impl fmt::Display for DosTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// The 16-bit general-purpose flag word, exposed bit by bit.
///
/// Bit indices are zero-based from the least significant bit. Bit 3 is the
/// data-descriptor flag per the published format; the legacy bit-2
/// convention floating around in older decoders is not used here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneralPurposeFlags {
    raw: u16,
}

impl GeneralPurposeFlags {
    pub fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    pub fn raw(self) -> u16 {
        self.raw
    }

    pub fn bit(self, index: usize) -> bool {
        (self.raw >> index) & 1 == 1
    }

    /// All 16 flags in order, index 0 = least significant bit.
    pub fn bits(self) -> [bool; 16] {
        std::array::from_fn(|i| self.bit(i))
    }

    pub fn encrypted(self) -> bool {
        self.bit(0)
    }

    /// CRC-32 and sizes were unknown at write time; a data descriptor
    /// trails the entry's payload.
    pub fn has_data_descriptor(self) -> bool {
        self.bit(3)
    }

    pub fn utf8_filename(self) -> bool {
        self.bit(11)
    }
}

impl fmt::Display for GeneralPurposeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            write!(f, "{}", bit as u8)?;
        }
        Ok(())
    }
}

/// Trailing CRC-32 and size fields for entries written by streaming
/// producers, located by their optional signature during the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataDescriptor {
    pub crc_32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
}

/// Per-entry metadata block preceding the entry's payload bytes.
///
/// Immutable once parsed; the scanner owns them in encounter order.
#[derive(Debug, Clone)]
pub struct LocalFileHeader {
    pub signature: u32,
    pub minimum_version: u16,
    pub general_flags: GeneralPurposeFlags,
    pub compression_method: CompressionMethod,
    pub last_modification_time: DosTime,
    pub last_modification_date: DosDate,
    pub crc_32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name: ZipText,
    /// `None` when the header declared a zero-length extra field, which is
    /// distinct from an empty one in downstream reporting.
    pub extra_field: Option<Vec<u8>>,
    /// Filled in by the scanner when flag bit 3 is set and the descriptor's
    /// signature is found after the payload.
    pub data_descriptor: Option<DataDescriptor>,
}

impl LocalFileHeader {
    /// CRC-32 as a fixed-width hex string, for deterministic comparison.
    pub fn crc32_hex(&self) -> String {
        format!("{:08x}", self.crc_32)
    }
}

impl fmt::Display for LocalFileHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "header_signature: {}", signature_string(self.signature))?;
        writeln!(f, "minimum_version: {}", self.minimum_version)?;
        writeln!(f, "general_flags: {}", self.general_flags)?;
        writeln!(f, "compression_method: {}", self.compression_method)?;
        writeln!(f, "last_modification_time: {}", self.last_modification_time)?;
        writeln!(f, "last_modification_date: {}", self.last_modification_date)?;
        writeln!(f, "crc_32: {}", self.crc32_hex())?;
        writeln!(f, "compressed_size: {}", self.compressed_size)?;
        writeln!(f, "uncompressed_size: {}", self.uncompressed_size)?;
        writeln!(f, "file_name: {}", self.file_name)?;
        writeln!(f, "extra_field: {}", opaque_field(&self.extra_field))?;
        match &self.data_descriptor {
            Some(descriptor) => writeln!(
                f,
                "data_descriptor: crc_32 {:08x}, compressed {}, uncompressed {}",
                descriptor.crc_32, descriptor.compressed_size, descriptor.uncompressed_size
            ),
            None => writeln!(f, "data_descriptor: -"),
        }
    }
}

/// Per-entry metadata block from the archive's trailing directory,
/// duplicating the local header plus attributes and the local offset.
#[derive(Debug, Clone)]
pub struct CentralDirectoryHeader {
    pub signature: u32,
    pub version_made_by: Version,
    pub minimum_version: u16,
    pub general_flags: GeneralPurposeFlags,
    pub compression_method: CompressionMethod,
    pub last_modification_time: DosTime,
    pub last_modification_date: DosDate,
    pub crc_32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub disk_number: u16,
    pub internal_attributes: u16,
    pub external_attributes: u32,
    pub local_header_offset: u32,
    pub file_name: ZipText,
    pub extra_field: Option<Vec<u8>>,
    pub file_comment: Option<ZipText>,
}

impl CentralDirectoryHeader {
    pub fn crc32_hex(&self) -> String {
        format!("{:08x}", self.crc_32)
    }
}

impl fmt::Display for CentralDirectoryHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "header_signature: {}", signature_string(self.signature))?;
        writeln!(f, "version_made_by: {}", self.version_made_by)?;
        writeln!(f, "minimum_version: {}", self.minimum_version)?;
        writeln!(f, "general_flags: {}", self.general_flags)?;
        writeln!(f, "compression_method: {}", self.compression_method)?;
        writeln!(f, "last_modification_time: {}", self.last_modification_time)?;
        writeln!(f, "last_modification_date: {}", self.last_modification_date)?;
        writeln!(f, "crc_32: {}", self.crc32_hex())?;
        writeln!(f, "compressed_size: {}", self.compressed_size)?;
        writeln!(f, "uncompressed_size: {}", self.uncompressed_size)?;
        writeln!(f, "disk_number: {}", self.disk_number)?;
        writeln!(f, "internal_attributes: {:#06x}", self.internal_attributes)?;
        writeln!(f, "external_attributes: {:#010x}", self.external_attributes)?;
        writeln!(f, "local_header_offset: {}", self.local_header_offset)?;
        writeln!(f, "file_name: {}", self.file_name)?;
        writeln!(f, "extra_field: {}", opaque_field(&self.extra_field))?;
        match &self.file_comment {
            Some(comment) => writeln!(f, "file_comment: {comment}"),
            None => writeln!(f, "file_comment: -"),
        }
    }
}

/// The archive trailer: entry counts and the directory's size and offset.
#[derive(Debug, Clone)]
pub struct EndOfCentralDirectory {
    pub signature: u32,
    pub disk_number: u16,
    pub disk_with_central_directory: u16,
    pub disk_entries: u16,
    pub total_entries: u16,
    pub central_directory_size: u32,
    pub central_directory_offset: u32,
    pub comment: Option<ZipText>,
}

impl fmt::Display for EndOfCentralDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "header_signature: {}", signature_string(self.signature))?;
        writeln!(f, "disk_number: {}", self.disk_number)?;
        writeln!(f, "disk_with_central_directory: {}", self.disk_with_central_directory)?;
        writeln!(f, "disk_entries: {}", self.disk_entries)?;
        writeln!(f, "total_entries: {}", self.total_entries)?;
        writeln!(f, "central_directory_size: {}", self.central_directory_size)?;
        writeln!(f, "central_directory_offset: {}", self.central_directory_offset)?;
        match &self.comment {
            Some(comment) => writeln!(f, "comment: {comment}"),
            None => writeln!(f, "comment: -"),
        }
    }
}

/// Everything a scan accumulates, in encounter order.
///
/// Central directory headers are a collection like local headers; an
/// archive holds one per stored entry, not one overall.
#[derive(Debug, Clone, Default)]
pub struct ArchiveMetadata {
    pub local_headers: Vec<LocalFileHeader>,
    pub central_headers: Vec<CentralDirectoryHeader>,
    pub end_of_central_directory: Option<EndOfCentralDirectory>,
}

fn opaque_field(field: &Option<Vec<u8>>) -> String {
    match field {
        Some(bytes) => bytes.iter().map(|b| format!("{b:02x}")).collect(),
        None => "-".to_string(),
    }
}
