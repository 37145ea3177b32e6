//! DigitalMicrograph (DM3/DM4) container support
//!
//! This module provides structures and functions for reading and writing
//! the tag-tree containers Gatan microscopes store slices in.

pub mod builder;
pub(crate) mod constants;
pub mod directory;
pub mod errors;
pub mod image;
pub mod reader;
#[cfg(test)]
mod tests;
pub mod types;
pub(crate) mod validation;
pub mod values;

pub use builder::{ContainerBuilder, DirectoryNode, Node};
pub use directory::{TagData, TagDirectory, TagEncoding, TagEntry};
pub use errors::{DmError, DmResult};
pub use reader::ContainerReader;
pub use types::{ContainerHeader, FormatVersion};
pub use values::{DataType, SampleBuffer, Scalar, TagValue};
pub use crate::io::byte_order::ByteOrder;
