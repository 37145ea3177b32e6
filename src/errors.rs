//! Error types surfaced by the slice readers

use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::dm::errors::DmError;

/// Errors returned by `read_array` and `read_dimensions`
#[derive(Debug, Error)]
pub enum SliceError {
    /// No reader is registered for the file's extension
    #[error("unsupported format {extension:?} for {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The container lacks an expected tag or directory
    #[error("malformed container {}: {reason}", .path.display())]
    MalformedContainer { path: PathBuf, reason: String },

    /// The decoder or parser failed on the file
    #[error("failed to decode {}: {source}", .path.display())]
    DecodeFailure {
        path: PathBuf,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Sample width unsupported or incompatible with the source
    #[error("invalid datatype: {0}")]
    InvalidDatatype(String),
}

/// Result type for slice reading
pub type SliceResult<T> = Result<T, SliceError>;

impl SliceError {
    /// Wraps a decoder error with the file it came from
    pub fn decode<E>(path: &Path, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        SliceError::DecodeFailure {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    /// Wraps a container error with the file it came from
    ///
    /// Missing entries and wrongly typed structural tags become
    /// `MalformedContainer`; everything else is a decode failure.
    pub fn from_container(path: &Path, error: DmError) -> Self {
        if error.is_structural() {
            SliceError::MalformedContainer {
                path: path.to_path_buf(),
                reason: error.to_string(),
            }
        } else {
            SliceError::decode(path, error)
        }
    }
}
