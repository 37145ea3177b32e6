//! DM3/DM4 container reader
//!
//! The reader owns the byte source for the lifetime of one read. Dropping
//! it (or calling `close`) releases the source, so a handle opened for a
//! call is released on every exit path, including errors.

use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, info, trace};
use std::fs::File;
use std::io::{BufReader, SeekFrom};
use std::path::{Path, PathBuf};

use crate::config::ParseLimits;
use crate::dm::constants::{paths, tag_kinds, TAG_DELIMITER};
use crate::dm::directory::{TagData, TagDirectory, TagEncoding, TagEntry};
use crate::dm::errors::{DmError, DmResult};
use crate::dm::types::{ContainerHeader, FormatVersion};
use crate::dm::validation;
use crate::dm::values::{DataType, SampleBuffer, Scalar, TagValue};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;

/// Reader for DigitalMicrograph tag-tree containers
pub struct ContainerReader<R: SeekableReader> {
    source: R,
    header: ContainerHeader,
    handler: Box<dyn ByteOrderHandler>,
    file_size: u64,
    limits: ParseLimits,
    path: Option<PathBuf>,
}

impl ContainerReader<BufReader<File>> {
    /// Opens the container at `path` and reads its header
    pub fn open<P: AsRef<Path>>(path: P, limits: ParseLimits) -> DmResult<Self> {
        let path = path.as_ref();
        info!("Opening container: {}", path.display());

        let file = File::open(path)?;
        let mut reader = Self::from_reader(BufReader::with_capacity(1024 * 1024, file), limits)?;
        reader.path = Some(path.to_path_buf());
        Ok(reader)
    }
}

impl<R: SeekableReader> ContainerReader<R> {
    /// Wraps an already opened source and reads the header from its start
    pub fn from_reader(mut source: R, limits: ParseLimits) -> DmResult<Self> {
        source.seek(SeekFrom::Start(0))?;
        let file_size = validation::get_file_size(&mut source)?;
        let header = Self::read_header(&mut source)?;
        debug!("Container header: {}", header);

        Ok(ContainerReader {
            source,
            handler: header.byte_order.create_handler(),
            header,
            file_size,
            limits,
            path: None,
        })
    }

    /// Reads the version word, root length and payload byte order
    fn read_header(source: &mut R) -> DmResult<ContainerHeader> {
        let version = FormatVersion::from_word(source.read_u32::<BigEndian>()?)?;
        let root_length = if version.is_wide() {
            source.read_u64::<BigEndian>()?
        } else {
            source.read_u32::<BigEndian>()? as u64
        };
        let byte_order = ByteOrder::from_flag(source.read_u32::<BigEndian>()?)?;

        Ok(ContainerHeader {
            version,
            root_length,
            byte_order,
        })
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    pub fn version(&self) -> FormatVersion {
        self.header.version
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.header.byte_order
    }

    /// Path the container was opened from, if it came from a file
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Reads the whole directory tree without decoding any payload
    pub fn read_directory(&mut self) -> DmResult<TagDirectory> {
        self.source.seek(SeekFrom::Start(self.header.version.header_size()))?;
        let root = self.read_directory_body(None, paths::ROOT.to_string(), 0)?;
        debug!("Read root directory with {} entries", root.entry_count());
        Ok(root)
    }

    /// Decodes the payload of a data tag
    pub fn read_tag_data(&mut self, tag: &TagData) -> DmResult<TagValue> {
        trace!("Reading payload of {} at offset {}", tag.path, tag.offset);
        validation::validate_payload_bounds(tag.offset, tag.encoding.payload_size(), self.file_size, &tag.path)?;
        self.source.seek(SeekFrom::Start(tag.offset))?;

        match &tag.encoding {
            TagEncoding::Simple(data_type) => Ok(TagValue::Scalar(self.read_scalar(*data_type)?)),
            TagEncoding::Text { length } => {
                let mut units = vec![0u16; to_len(*length, &tag.path)?];
                self.handler.read_u16_into(&mut self.source, &mut units)?;
                Ok(TagValue::Text(String::from_utf16_lossy(&units)))
            }
            TagEncoding::Struct(fields) => Ok(TagValue::Struct(self.read_struct(fields)?)),
            TagEncoding::Array { element, count } => {
                let count = to_len(*count, &tag.path)?;
                Ok(TagValue::Array(self.read_samples(*element, count)?))
            }
            TagEncoding::StructArray { fields, count } => {
                let count = to_len(*count, &tag.path)?;
                let elements = (0..count)
                    .map(|_| self.read_struct(fields))
                    .collect::<DmResult<Vec<_>>>()?;
                Ok(TagValue::StructArray {
                    fields: fields.clone(),
                    elements,
                })
            }
        }
    }

    /// Releases the underlying source
    pub fn close(self) {
        drop(self)
    }

    fn read_directory_body(&mut self, label: Option<String>, path: String, depth: usize) -> DmResult<TagDirectory> {
        validation::validate_depth(depth, &self.limits, &path)?;

        let sorted = self.source.read_u8()? != 0;
        let open = self.source.read_u8()? != 0;
        let entry_count = self.read_count()?;
        validation::validate_entry_count(entry_count, &self.limits, &path)?;
        trace!("Directory {}: {} entries", path, entry_count);

        let mut directory = TagDirectory::new(label, path, sorted, open);
        let mut unnamed_dirs = 0;
        let mut unnamed_tags = 0;

        for _ in 0..entry_count {
            let entry_offset = self.source.stream_position()?;
            let kind = self.source.read_u8()?;
            let label = self.read_label()?;

            if self.header.version.is_wide() {
                let declared_size = self.source.read_u64::<BigEndian>()?;
                trace!("Entry at {} declares {} bytes", entry_offset, declared_size);
            }

            match kind {
                tag_kinds::DIRECTORY => {
                    let child_path = directory.child_path(label.as_deref(), unnamed_dirs);
                    if label.is_none() {
                        unnamed_dirs += 1;
                    }
                    let child = self.read_directory_body(label, child_path, depth + 1)?;
                    directory.add_entry(TagEntry::Directory(child));
                }
                tag_kinds::DATA => {
                    let child_path = directory.child_path(label.as_deref(), unnamed_tags);
                    if label.is_none() {
                        unnamed_tags += 1;
                    }
                    let tag = self.read_data_header(label, child_path)?;
                    directory.add_entry(TagEntry::Data(tag));
                }
                _ => {
                    return Err(DmError::InvalidTagKind {
                        kind,
                        offset: entry_offset,
                    })
                }
            }
        }

        Ok(directory)
    }

    /// Reads a data tag's delimiter and info words, then skips its payload
    fn read_data_header(&mut self, label: Option<String>, path: String) -> DmResult<TagData> {
        let delimiter_offset = self.source.stream_position()?;
        let mut delimiter = [0u8; 4];
        self.source.read_exact(&mut delimiter)?;
        if delimiter != TAG_DELIMITER {
            return Err(DmError::InvalidDelimiter {
                path,
                offset: delimiter_offset,
            });
        }

        let info_count = self.read_count()?;
        validation::validate_info_count(info_count, &path)?;
        let infos = (0..info_count)
            .map(|_| self.read_count())
            .collect::<DmResult<Vec<u64>>>()?;

        let encoding = TagEncoding::from_infos(&infos, &path)?;
        let offset = self.source.stream_position()?;
        let end = validation::validate_payload_bounds(offset, encoding.payload_size(), self.file_size, &path)?;
        self.source.seek(SeekFrom::Start(end))?;

        trace!("Tag {}: {:?} at offset {}", path, encoding, offset);
        Ok(TagData {
            label,
            path,
            encoding,
            offset,
        })
    }

    /// Reads a label; an empty label marks an unnamed entry
    fn read_label(&mut self) -> DmResult<Option<String>> {
        let length = self.source.read_u16::<BigEndian>()? as usize;
        if length == 0 {
            return Ok(None);
        }

        let mut buffer = vec![0u8; length];
        self.source.read_exact(&mut buffer)?;
        Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
    }

    /// Reads an entry count or info word, 32 bits in DM3 and 64 bits in DM4
    fn read_count(&mut self) -> DmResult<u64> {
        if self.header.version.is_wide() {
            Ok(self.source.read_u64::<BigEndian>()?)
        } else {
            Ok(self.source.read_u32::<BigEndian>()? as u64)
        }
    }

    fn read_scalar(&mut self, data_type: DataType) -> DmResult<Scalar> {
        let handler = &self.handler;
        let source = &mut self.source;

        let scalar = match data_type {
            DataType::I8 => Scalar::I8(source.read_i8()?),
            DataType::U8 => Scalar::U8(source.read_u8()?),
            DataType::Bool => Scalar::Bool(source.read_u8()? != 0),
            DataType::I16 => Scalar::I16(handler.read_i16(source)?),
            DataType::U16 => Scalar::U16(handler.read_u16(source)?),
            DataType::I32 => Scalar::I32(handler.read_i32(source)?),
            DataType::U32 => Scalar::U32(handler.read_u32(source)?),
            DataType::I64 => Scalar::I64(handler.read_i64(source)?),
            DataType::U64 => Scalar::U64(handler.read_u64(source)?),
            DataType::F32 => Scalar::F32(handler.read_f32(source)?),
            DataType::F64 => Scalar::F64(handler.read_f64(source)?),
        };

        Ok(scalar)
    }

    fn read_struct(&mut self, fields: &[DataType]) -> DmResult<Vec<Scalar>> {
        fields.iter().map(|field| self.read_scalar(*field)).collect()
    }

    /// Bulk-reads `count` elements of one type
    fn read_samples(&mut self, element: DataType, count: usize) -> DmResult<SampleBuffer> {
        let handler = &self.handler;
        let source = &mut self.source;

        let buffer = match element {
            DataType::U8 => {
                let mut values = vec![0u8; count];
                source.read_exact(&mut values)?;
                SampleBuffer::U8(values)
            }
            DataType::I8 => {
                let mut values = vec![0i8; count];
                source.read_i8_into(&mut values)?;
                SampleBuffer::I8(values)
            }
            DataType::Bool => {
                let mut values = vec![0u8; count];
                source.read_exact(&mut values)?;
                SampleBuffer::Bool(values.into_iter().map(|v| v != 0).collect())
            }
            DataType::I16 => {
                let mut values = vec![0i16; count];
                handler.read_i16_into(source, &mut values)?;
                SampleBuffer::I16(values)
            }
            DataType::U16 => {
                let mut values = vec![0u16; count];
                handler.read_u16_into(source, &mut values)?;
                SampleBuffer::U16(values)
            }
            DataType::I32 => {
                let mut values = vec![0i32; count];
                handler.read_i32_into(source, &mut values)?;
                SampleBuffer::I32(values)
            }
            DataType::U32 => {
                let mut values = vec![0u32; count];
                handler.read_u32_into(source, &mut values)?;
                SampleBuffer::U32(values)
            }
            DataType::I64 => {
                let mut values = vec![0i64; count];
                handler.read_i64_into(source, &mut values)?;
                SampleBuffer::I64(values)
            }
            DataType::U64 => {
                let mut values = vec![0u64; count];
                handler.read_u64_into(source, &mut values)?;
                SampleBuffer::U64(values)
            }
            DataType::F32 => {
                let mut values = vec![0f32; count];
                handler.read_f32_into(source, &mut values)?;
                SampleBuffer::F32(values)
            }
            DataType::F64 => {
                let mut values = vec![0f64; count];
                handler.read_f64_into(source, &mut values)?;
                SampleBuffer::F64(values)
            }
        };

        Ok(buffer)
    }
}

impl<R: SeekableReader> Drop for ContainerReader<R> {
    fn drop(&mut self) {
        match &self.path {
            Some(path) => trace!("Closing container: {}", path.display()),
            None => trace!("Closing in-memory container"),
        }
    }
}

fn to_len(count: u64, path: &str) -> DmResult<usize> {
    usize::try_from(count).map_err(|_| DmError::LimitExceeded(format!("{} holds {} elements", path, count)))
}
