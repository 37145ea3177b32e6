//! Tag directory structures
//!
//! A container is a tree: every directory holds named and unnamed
//! sub-directories plus named and unnamed data tags. Data tags are recorded
//! with their encoding and payload offset only; payloads are decoded on
//! demand through `ContainerReader::read_tag_data`.

use std::collections::HashMap;
use std::fmt;

use log::trace;

use crate::dm::constants::encodings;
use crate::dm::errors::{DmError, DmResult};
use crate::dm::values::DataType;

/// Layout of a data tag's payload, decoded from its info words
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEncoding {
    Simple(DataType),
    /// UTF-16 string of `length` code units
    Text { length: u64 },
    Struct(Vec<DataType>),
    Array { element: DataType, count: u64 },
    StructArray { fields: Vec<DataType>, count: u64 },
}

impl TagEncoding {
    /// Decodes the info words of a data tag
    ///
    /// `path` only feeds the error message.
    pub fn from_infos(infos: &[u64], path: &str) -> DmResult<Self> {
        let unsupported = || DmError::UnsupportedEncoding {
            path: path.to_string(),
            infos: infos.to_vec(),
        };

        let (&code, rest) = infos.split_first().ok_or_else(unsupported)?;
        match code {
            encodings::STRING => match rest {
                [length] => Ok(TagEncoding::Text { length: *length }),
                _ => Err(unsupported()),
            },
            encodings::STRUCT => {
                let (fields, consumed) = Self::struct_fields(rest).ok_or_else(unsupported)?;
                if consumed != rest.len() {
                    return Err(unsupported());
                }
                Ok(TagEncoding::Struct(fields))
            }
            encodings::ARRAY => match rest {
                [element, count] => {
                    let element = DataType::from_code(*element).ok_or_else(unsupported)?;
                    Ok(TagEncoding::Array { element, count: *count })
                }
                [encodings::STRUCT, struct_infos @ ..] => {
                    let (fields, consumed) = Self::struct_fields(struct_infos).ok_or_else(unsupported)?;
                    // zero-sized elements would let any count pass the payload bounds check
                    if fields.is_empty() {
                        return Err(unsupported());
                    }
                    match &struct_infos[consumed..] {
                        [count] => Ok(TagEncoding::StructArray { fields, count: *count }),
                        _ => Err(unsupported()),
                    }
                }
                _ => Err(unsupported()),
            },
            _ if rest.is_empty() => DataType::from_code(code)
                .map(TagEncoding::Simple)
                .ok_or_else(unsupported),
            _ => Err(unsupported()),
        }
    }

    /// Parses `name_length, field_count, (name_length, type) * field_count`
    ///
    /// Returns the field types and how many words were consumed.
    fn struct_fields(infos: &[u64]) -> Option<(Vec<DataType>, usize)> {
        let field_count = usize::try_from(*infos.get(1)?).ok()?;
        let consumed = field_count.checked_mul(2)?.checked_add(2)?;
        let pairs = infos.get(2..consumed)?;

        let fields = pairs
            .chunks_exact(2)
            .map(|pair| DataType::from_code(pair[1]))
            .collect::<Option<Vec<_>>>()?;

        Some((fields, consumed))
    }

    /// Encodes this layout back into info words
    pub fn infos(&self) -> Vec<u64> {
        fn struct_words(fields: &[DataType], words: &mut Vec<u64>) {
            words.push(0);
            words.push(fields.len() as u64);
            for field in fields {
                words.push(0);
                words.push(field.code());
            }
        }

        let mut words = Vec::new();
        match self {
            TagEncoding::Simple(data_type) => words.push(data_type.code()),
            TagEncoding::Text { length } => {
                words.push(encodings::STRING);
                words.push(*length);
            }
            TagEncoding::Struct(fields) => {
                words.push(encodings::STRUCT);
                struct_words(fields, &mut words);
            }
            TagEncoding::Array { element, count } => {
                words.push(encodings::ARRAY);
                words.push(element.code());
                words.push(*count);
            }
            TagEncoding::StructArray { fields, count } => {
                words.push(encodings::ARRAY);
                words.push(encodings::STRUCT);
                struct_words(fields, &mut words);
                words.push(*count);
            }
        }
        words
    }

    /// Size of the payload in bytes, or `None` on overflow
    pub fn payload_size(&self) -> Option<u64> {
        let struct_size = |fields: &[DataType]| fields.iter().map(DataType::size).sum::<u64>();

        match self {
            TagEncoding::Simple(data_type) => Some(data_type.size()),
            TagEncoding::Text { length } => length.checked_mul(2),
            TagEncoding::Struct(fields) => Some(struct_size(fields)),
            TagEncoding::Array { element, count } => count.checked_mul(element.size()),
            TagEncoding::StructArray { fields, count } => count.checked_mul(struct_size(fields)),
        }
    }
}

/// A data tag: its location in the tree and where its payload lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagData {
    /// Label, `None` for unnamed tags
    pub label: Option<String>,
    /// Dotted path from the root, e.g. `root.ImageList.1.ImageData.Data`
    pub path: String,
    pub encoding: TagEncoding,
    /// File offset of the first payload byte
    pub offset: u64,
}

/// An entry of a directory, as read from the container
#[derive(Debug, Clone)]
pub enum TagEntry {
    Directory(TagDirectory),
    Data(TagData),
}

/// A directory of the tag tree
#[derive(Debug, Clone, Default)]
pub struct TagDirectory {
    /// Label, `None` for the root and for unnamed directories
    pub label: Option<String>,
    /// Dotted path from the root
    pub path: String,
    pub sorted: bool,
    pub open: bool,
    named_subdirs: HashMap<String, TagDirectory>,
    unnamed_subdirs: Vec<TagDirectory>,
    named_tags: HashMap<String, TagData>,
    unnamed_tags: Vec<TagData>,
}

impl TagDirectory {
    /// Creates an empty directory at `path`
    pub fn new(label: Option<String>, path: String, sorted: bool, open: bool) -> Self {
        TagDirectory {
            label,
            path,
            sorted,
            open,
            ..Default::default()
        }
    }

    /// Adds an entry, filing it by kind and by whether it has a label
    ///
    /// A repeated label replaces the earlier entry of the same kind.
    pub fn add_entry(&mut self, entry: TagEntry) {
        match entry {
            TagEntry::Directory(dir) => match dir.label.clone() {
                Some(label) => {
                    trace!("{}: named directory {}", self.path, label);
                    self.named_subdirs.insert(label, dir);
                }
                None => self.unnamed_subdirs.push(dir),
            },
            TagEntry::Data(tag) => match tag.label.clone() {
                Some(label) => {
                    trace!("{}: named tag {}", self.path, label);
                    self.named_tags.insert(label, tag);
                }
                None => self.unnamed_tags.push(tag),
            },
        }
    }

    /// Path a child with `label` (or at `index` when unnamed) would have
    pub fn child_path(&self, label: Option<&str>, index: usize) -> String {
        match label {
            Some(label) => format!("{}.{}", self.path, label),
            None => format!("{}.{}", self.path, index),
        }
    }

    pub fn named_subdir(&self, name: &str) -> DmResult<&TagDirectory> {
        self.named_subdirs.get(name).ok_or_else(|| DmError::MissingEntry {
            path: self.child_path(Some(name), 0),
        })
    }

    pub fn unnamed_subdir(&self, index: usize) -> DmResult<&TagDirectory> {
        self.unnamed_subdirs.get(index).ok_or_else(|| DmError::MissingEntry {
            path: self.child_path(None, index),
        })
    }

    pub fn named_tag(&self, name: &str) -> DmResult<&TagData> {
        self.named_tags.get(name).ok_or_else(|| DmError::MissingEntry {
            path: self.child_path(Some(name), 0),
        })
    }

    pub fn unnamed_tag(&self, index: usize) -> DmResult<&TagData> {
        self.unnamed_tags.get(index).ok_or_else(|| DmError::MissingEntry {
            path: self.child_path(None, index),
        })
    }

    pub fn unnamed_subdir_count(&self) -> usize {
        self.unnamed_subdirs.len()
    }

    pub fn unnamed_tag_count(&self) -> usize {
        self.unnamed_tags.len()
    }

    /// Total number of entries in this directory
    pub fn entry_count(&self) -> usize {
        self.named_subdirs.len() + self.unnamed_subdirs.len() + self.named_tags.len() + self.unnamed_tags.len()
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        writeln!(f, "{}{} ({} entries)", indent, self.path, self.entry_count())?;

        let mut tags: Vec<&TagData> = self.named_tags.values().chain(self.unnamed_tags.iter()).collect();
        tags.sort_by(|a, b| a.path.cmp(&b.path));
        for tag in tags {
            writeln!(f, "{}  {} {:?} @ {}", indent, tag.path, tag.encoding, tag.offset)?;
        }

        let mut subdirs: Vec<&TagDirectory> = self.named_subdirs.values().chain(self.unnamed_subdirs.iter()).collect();
        subdirs.sort_by(|a, b| a.path.cmp(&b.path));
        for subdir in subdirs {
            subdir.fmt_indented(f, depth + 1)?;
        }

        Ok(())
    }
}

impl fmt::Display for TagDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
