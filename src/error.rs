//! Error reporting types shared across the crate.

use thiserror::Error;

/// A Result type alias over [`ZipError`] to minimise repetition.
pub type Result<T> = std::result::Result<T, ZipError>;

/// Everything that can go wrong while scanning archive metadata.
///
/// A failed header parse aborts the whole scan: a header with unreadable
/// length fields cannot be skipped safely, because the suffix length is
/// unknown and every later record boundary would be off.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ZipError {
    /// Fewer bytes were available than a record layout requires.
    #[error("unexpected end of input at offset {offset}")]
    TruncatedInput { offset: u64 },

    /// A raw code fell outside a closed enumeration, e.g. compression
    /// method 7 (reserved) or a version platform byte above 20.
    #[error("unknown {field} code {value}")]
    UnknownEnumerationValue { field: &'static str, value: u32 },

    /// A parser was handed a position not holding its expected magic.
    #[error("signature mismatch (actual: {actual:#010x}, expected: {expected:#010x})")]
    SignatureMismatch { expected: u32, actual: u32 },

    /// More headers were found than [`ScanOptions`](crate::ScanOptions) allows.
    #[error("header count exceeded the configured limit of {limit}")]
    EntryLimitExceeded { limit: usize },

    /// The scan position moved past the configured byte bound.
    #[error("scan position exceeded the configured limit of {limit} bytes")]
    ScanLimitExceeded { limit: u64 },

    #[error("an upstream reader returned an error: {0}")]
    Io(#[from] std::io::Error),
}
