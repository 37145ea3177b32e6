//! DM3/DM4 container construction
//!
//! Builds a tag tree in memory and serializes it. Directory structure is
//! written big-endian; payloads use the byte order chosen for the builder.

use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{BigEndian, WriteBytesExt};

use crate::dm::constants::{header, paths, tag_kinds, TAG_DELIMITER};
use crate::dm::directory::TagEncoding;
use crate::dm::errors::{DmError, DmResult};
use crate::dm::types::FormatVersion;
use crate::dm::values::{SampleBuffer, Scalar, TagValue};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};

/// A node of the tree being built
#[derive(Debug, Clone)]
pub enum Node {
    Directory(DirectoryNode),
    Data(TagValue),
}

/// A directory being built; entries keep insertion order
#[derive(Debug, Clone, Default)]
pub struct DirectoryNode {
    entries: Vec<(Option<String>, Node)>,
}

impl DirectoryNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named_dir(mut self, name: &str, dir: DirectoryNode) -> Self {
        self.entries.push((Some(name.to_string()), Node::Directory(dir)));
        self
    }

    pub fn unnamed_dir(mut self, dir: DirectoryNode) -> Self {
        self.entries.push((None, Node::Directory(dir)));
        self
    }

    pub fn named_tag(mut self, name: &str, value: TagValue) -> Self {
        self.entries.push((Some(name.to_string()), Node::Data(value)));
        self
    }

    pub fn unnamed_tag(mut self, value: TagValue) -> Self {
        self.entries.push((None, Node::Data(value)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for DigitalMicrograph containers
pub struct ContainerBuilder {
    version: FormatVersion,
    byte_order: ByteOrder,
    root: DirectoryNode,
}

impl ContainerBuilder {
    /// Creates a builder with an empty root directory
    pub fn new(version: FormatVersion, byte_order: ByteOrder) -> Self {
        ContainerBuilder {
            version,
            byte_order,
            root: DirectoryNode::new(),
        }
    }

    /// Sets the byte order used for payloads
    pub fn byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Replaces the root directory
    pub fn root(mut self, root: DirectoryNode) -> Self {
        self.root = root;
        self
    }

    /// Builds a single-slice document in the layout microscopes write
    ///
    /// `ImageList` holds a 1x1 thumbnail at index 0 and the slice at index 1.
    /// `samples` are row-major, `height` rows of `width` values.
    pub fn image_document(version: FormatVersion, width: u32, height: u32, samples: SampleBuffer) -> DmResult<Self> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(DmError::UnexpectedValue {
                path: format!("{}.{}.1.{}.{}", paths::ROOT, paths::IMAGE_LIST, paths::IMAGE_DATA, paths::DATA),
                expected: "width * height samples",
                found: format!("{} samples for {}x{}", samples.len(), width, height),
            });
        }

        let thumbnail = Self::image_entry(1, 1, SampleBuffer::U8(vec![0]), "thumbnail");
        let slice = Self::image_entry(width, height, samples, "slice");
        let root = DirectoryNode::new().named_dir(
            paths::IMAGE_LIST,
            DirectoryNode::new().unnamed_dir(thumbnail).unnamed_dir(slice),
        );

        Ok(ContainerBuilder::new(version, ByteOrder::LittleEndian).root(root))
    }

    fn image_entry(width: u32, height: u32, samples: SampleBuffer, name: &str) -> DirectoryNode {
        let dimensions = DirectoryNode::new()
            .unnamed_tag(TagValue::Scalar(Scalar::U32(width)))
            .unnamed_tag(TagValue::Scalar(Scalar::U32(height)));

        let mut image_data = DirectoryNode::new();
        if let Some(code) = samples.data_type().image_data_type() {
            image_data = image_data.named_tag(paths::DATA_TYPE, TagValue::Scalar(Scalar::U32(code)));
        }
        let image_data = image_data
            .named_tag(paths::DATA, TagValue::Array(samples))
            .named_dir(paths::DIMENSIONS, dimensions);

        DirectoryNode::new()
            .named_dir(paths::IMAGE_DATA, image_data)
            .named_tag(paths::NAME, TagValue::Text(name.to_string()))
    }

    /// Serializes the container
    pub fn to_bytes(&self) -> DmResult<Vec<u8>> {
        let handler = self.byte_order.create_handler();
        let root = self.encode_directory(&self.root, handler.as_ref())?;

        let mut out = Vec::with_capacity(root.len() + 32);
        out.write_u32::<BigEndian>(self.version.word())?;
        if self.version.is_wide() {
            out.write_u64::<BigEndian>(root.len() as u64)?;
        } else {
            let length = u32::try_from(root.len())
                .map_err(|_| DmError::LimitExceeded(format!("DM3 root of {} bytes", root.len())))?;
            out.write_u32::<BigEndian>(length)?;
        }
        out.write_u32::<BigEndian>(self.byte_order.flag())?;
        out.extend_from_slice(&root);
        out.extend_from_slice(&[0u8; header::TRAILER_SIZE]);

        debug!("Encoded {} container: {} bytes", self.version, out.len());
        Ok(out)
    }

    /// Writes the container to `path`
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> DmResult<()> {
        let path = path.as_ref();
        info!("Writing {} container to {}", self.version, path.display());

        let bytes = self.to_bytes()?;
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    fn encode_directory(&self, dir: &DirectoryNode, handler: &dyn ByteOrderHandler) -> DmResult<Vec<u8>> {
        let mut out = Vec::new();
        out.write_u8(1)?; // sorted
        out.write_u8(0)?; // open
        self.write_count(&mut out, dir.entries.len() as u64)?;

        for (label, node) in &dir.entries {
            let (kind, body) = match node {
                Node::Directory(child) => (tag_kinds::DIRECTORY, self.encode_directory(child, handler)?),
                Node::Data(value) => (tag_kinds::DATA, self.encode_data(value, handler)?),
            };

            let label = label.as_deref().unwrap_or("");
            let label_length = u16::try_from(label.len())
                .map_err(|_| DmError::LimitExceeded(format!("label of {} bytes", label.len())))?;

            out.write_u8(kind)?;
            out.write_u16::<BigEndian>(label_length)?;
            out.extend_from_slice(label.as_bytes());
            if self.version.is_wide() {
                out.write_u64::<BigEndian>(body.len() as u64)?;
            }
            out.extend_from_slice(&body);
        }

        Ok(out)
    }

    fn encode_data(&self, value: &TagValue, handler: &dyn ByteOrderHandler) -> DmResult<Vec<u8>> {
        let infos = encoding_of(value).infos();

        let mut out = Vec::new();
        out.extend_from_slice(&TAG_DELIMITER);
        self.write_count(&mut out, infos.len() as u64)?;
        for info in infos {
            self.write_count(&mut out, info)?;
        }

        match value {
            TagValue::Scalar(scalar) => write_scalar(&mut out, scalar, handler)?,
            TagValue::Text(text) => {
                for unit in text.encode_utf16() {
                    handler.write_u16(&mut out, unit)?;
                }
            }
            TagValue::Struct(fields) => {
                for field in fields {
                    write_scalar(&mut out, field, handler)?;
                }
            }
            TagValue::Array(buffer) => write_samples(&mut out, buffer, handler)?,
            TagValue::StructArray { elements, .. } => {
                for element in elements {
                    for field in element {
                        write_scalar(&mut out, field, handler)?;
                    }
                }
            }
        }

        Ok(out)
    }

    fn write_count(&self, out: &mut Vec<u8>, value: u64) -> DmResult<()> {
        if self.version.is_wide() {
            out.write_u64::<BigEndian>(value)?;
        } else {
            let value = u32::try_from(value)
                .map_err(|_| DmError::LimitExceeded(format!("DM3 count {} exceeds 32 bits", value)))?;
            out.write_u32::<BigEndian>(value)?;
        }
        Ok(())
    }
}

/// Encoding that describes `value`
fn encoding_of(value: &TagValue) -> TagEncoding {
    match value {
        TagValue::Scalar(scalar) => TagEncoding::Simple(scalar.data_type()),
        TagValue::Text(text) => TagEncoding::Text {
            length: text.encode_utf16().count() as u64,
        },
        TagValue::Struct(fields) => TagEncoding::Struct(fields.iter().map(Scalar::data_type).collect()),
        TagValue::Array(buffer) => TagEncoding::Array {
            element: buffer.data_type(),
            count: buffer.len() as u64,
        },
        TagValue::StructArray { fields, elements } => TagEncoding::StructArray {
            fields: fields.clone(),
            count: elements.len() as u64,
        },
    }
}

fn write_scalar(out: &mut Vec<u8>, scalar: &Scalar, handler: &dyn ByteOrderHandler) -> DmResult<()> {
    match *scalar {
        Scalar::I8(v) => out.write_i8(v)?,
        Scalar::U8(v) => out.write_u8(v)?,
        Scalar::Bool(v) => out.write_u8(v as u8)?,
        Scalar::I16(v) => handler.write_i16(out, v)?,
        Scalar::U16(v) => handler.write_u16(out, v)?,
        Scalar::I32(v) => handler.write_i32(out, v)?,
        Scalar::U32(v) => handler.write_u32(out, v)?,
        Scalar::I64(v) => handler.write_i64(out, v)?,
        Scalar::U64(v) => handler.write_u64(out, v)?,
        Scalar::F32(v) => handler.write_f32(out, v)?,
        Scalar::F64(v) => handler.write_f64(out, v)?,
    }
    Ok(())
}

fn write_samples(out: &mut Vec<u8>, buffer: &SampleBuffer, handler: &dyn ByteOrderHandler) -> DmResult<()> {
    match buffer {
        SampleBuffer::U8(values) => out.extend_from_slice(values),
        SampleBuffer::I8(values) => {
            for &v in values {
                out.write_i8(v)?;
            }
        }
        SampleBuffer::Bool(values) => out.extend(values.iter().map(|&v| v as u8)),
        SampleBuffer::I16(values) => {
            for &v in values {
                handler.write_i16(out, v)?;
            }
        }
        SampleBuffer::U16(values) => {
            for &v in values {
                handler.write_u16(out, v)?;
            }
        }
        SampleBuffer::I32(values) => {
            for &v in values {
                handler.write_i32(out, v)?;
            }
        }
        SampleBuffer::U32(values) => {
            for &v in values {
                handler.write_u32(out, v)?;
            }
        }
        SampleBuffer::I64(values) => {
            for &v in values {
                handler.write_i64(out, v)?;
            }
        }
        SampleBuffer::U64(values) => {
            for &v in values {
                handler.write_u64(out, v)?;
            }
        }
        SampleBuffer::F32(values) => {
            for &v in values {
                handler.write_f32(out, v)?;
            }
        }
        SampleBuffer::F64(values) => {
            for &v in values {
                handler.write_f64(out, v)?;
            }
        }
    }
    Ok(())
}
