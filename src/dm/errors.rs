//! Error types for tag-tree container parsing

use std::io;
use thiserror::Error;

/// Errors raised while reading or writing a DM3/DM4 container
#[derive(Debug, Error)]
pub enum DmError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Version word is neither 3 nor 4
    #[error("unsupported container version: {0}")]
    UnsupportedVersion(u32),

    /// Container version differs from the one the caller requires
    #[error("expected a DM{expected} container, found DM{found}")]
    VersionMismatch { expected: u32, found: u32 },

    /// Byte order flag is neither 0 nor 1
    #[error("invalid byte order flag: {0}")]
    InvalidByteOrder(u32),

    /// Entry kind byte is neither a directory nor a data tag
    #[error("invalid tag kind {kind} at offset {offset}")]
    InvalidTagKind { kind: u8, offset: u64 },

    /// Data tag does not open with `%%%%`
    #[error("missing tag delimiter for {path} at offset {offset}")]
    InvalidDelimiter { path: String, offset: u64 },

    /// Info words describe an encoding the parser does not know
    #[error("unsupported tag encoding {infos:?} for {path}")]
    UnsupportedEncoding { path: String, infos: Vec<u64> },

    /// A named or indexed entry is absent from its directory
    #[error("missing entry: {path}")]
    MissingEntry { path: String },

    /// An entry exists but holds a value of the wrong kind
    #[error("unexpected value at {path}: expected {expected}, found {found}")]
    UnexpectedValue {
        path: String,
        expected: &'static str,
        found: String,
    },

    /// A tag payload extends beyond the end of the file
    #[error("payload of {path} ends at {end}, past end of file ({file_size})")]
    PayloadOutOfBounds { path: String, end: u64, file_size: u64 },

    /// A configured parse limit was exceeded
    #[error("parse limit exceeded: {0}")]
    LimitExceeded(String),
}

/// Result type for container operations
pub type DmResult<T> = Result<T, DmError>;

impl DmError {
    /// Whether this error means the expected tag layout is not there
    ///
    /// Readers surface these as malformed containers rather than
    /// decode failures.
    pub fn is_structural(&self) -> bool {
        matches!(self, DmError::MissingEntry { .. } | DmError::UnexpectedValue { .. })
    }
}
