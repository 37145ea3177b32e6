//! Core container header structures

use std::fmt;

use crate::dm::constants::header;
use crate::dm::errors::{DmError, DmResult};
use crate::io::byte_order::ByteOrder;

/// Container generation
///
/// DM4 widens the root length, directory entry counts and info words from
/// 32 to 64 bits and adds a size word after every entry label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVersion {
    Dm3,
    Dm4,
}

impl FormatVersion {
    /// Decodes the version word from the start of the header
    pub fn from_word(word: u32) -> DmResult<Self> {
        match word {
            header::DM3_VERSION => Ok(FormatVersion::Dm3),
            header::DM4_VERSION => Ok(FormatVersion::Dm4),
            _ => Err(DmError::UnsupportedVersion(word)),
        }
    }

    pub fn word(&self) -> u32 {
        match self {
            FormatVersion::Dm3 => header::DM3_VERSION,
            FormatVersion::Dm4 => header::DM4_VERSION,
        }
    }

    /// Whether counts and info words are 64 bits wide
    pub fn is_wide(&self) -> bool {
        matches!(self, FormatVersion::Dm4)
    }

    /// Size of the header preceding the root directory
    pub fn header_size(&self) -> u64 {
        match self {
            FormatVersion::Dm3 => header::DM3_HEADER_SIZE,
            FormatVersion::Dm4 => header::DM4_HEADER_SIZE,
        }
    }

    /// Fails unless this is the `expected` version
    pub fn require(&self, expected: FormatVersion) -> DmResult<()> {
        if *self == expected {
            Ok(())
        } else {
            Err(DmError::VersionMismatch {
                expected: expected.word(),
                found: self.word(),
            })
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DM{}", self.word())
    }
}

/// Parsed container header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub version: FormatVersion,
    /// Length declared for the root directory (informational only)
    pub root_length: u64,
    /// Byte order of tag payloads
    pub byte_order: ByteOrder,
}

impl fmt::Display for ContainerHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} container, root length {}, {} payloads",
            self.version,
            self.root_length,
            self.byte_order.name()
        )
    }
}
