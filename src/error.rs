//! Error type for the container codec

use std::io;
use thiserror::Error;

/// Result type alias for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// The single error kind raised by the codec.
///
/// Every variant that originates inside a buffer carries the byte offset at
/// which it was raised. All errors are non-recoverable for the current call:
/// a failed decode yields no tree.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Read past the end of the buffer
    #[error("unexpected end of data at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// Magic number mismatch
    #[error("invalid magic number {found:#010x} (expected {expected:#010x})")]
    InvalidMagic { found: u32, expected: u32 },

    /// Format version the reader was not built for
    #[error("unsupported format version {found} (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },

    /// Compression flag set in the header
    #[error("compressed containers are not supported")]
    CompressionUnsupported,

    /// String longer than the configured maximum
    #[error("string length {len} at offset {offset} exceeds maximum {max}")]
    StringTooLong {
        len: usize,
        max: usize,
        offset: usize,
    },

    /// String-table count exceeding the defensive cap
    #[error("string table count {count} at offset {offset} exceeds maximum {max}")]
    StringTableTooLarge {
        count: usize,
        max: usize,
        offset: usize,
    },

    /// String reference outside the decoded table
    #[error("string reference {index} out of range (table size {table_size}) at offset {offset}")]
    InvalidStringRef {
        index: u32,
        table_size: usize,
        offset: usize,
    },

    /// Declared sequence count exceeding the defensive cap
    #[error("declared {what} count {count} at offset {offset} exceeds maximum {max}")]
    CountTooLarge {
        what: &'static str,
        count: usize,
        max: usize,
        offset: usize,
    },

    /// Unknown discriminant byte
    #[error("unknown {kind} tag {value:#04x} at offset {offset}")]
    UnknownTag {
        kind: &'static str,
        value: u8,
        offset: usize,
    },

    /// Node nesting deeper than the decode ceiling
    #[error("recursion depth exceeds maximum {max} at offset {offset}")]
    DepthExceeded { max: usize, offset: usize },

    /// Malformed UTF-8 inside a length-prefixed string
    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// Checksum trailer did not match the payload
    #[error("checksum mismatch: file is possibly corrupted")]
    ChecksumMismatch,

    /// I/O error from the file-level helpers
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    /// Create an unknown-tag error
    pub fn unknown_tag(kind: &'static str, value: u8, offset: usize) -> Self {
        Self::UnknownTag {
            kind,
            value,
            offset,
        }
    }
}
