//! Tests for the container reader

extern crate std;

use std::io::{Cursor, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::config::ParseLimits;
use crate::dm::directory::TagEncoding;
use crate::dm::errors::DmError;
use crate::dm::reader::ContainerReader;
use crate::dm::tests::test_utils::{header_only, sample_container, TreeWriter};
use crate::dm::types::FormatVersion;
use crate::dm::values::{DataType, SampleBuffer, Scalar, TagValue};
use crate::io::byte_order::ByteOrder;

fn open(cursor: Cursor<Vec<u8>>) -> Result<ContainerReader<Cursor<Vec<u8>>>, DmError> {
    ContainerReader::from_reader(cursor, ParseLimits::default())
}

#[test]
fn test_dm3_header() {
    let reader = open(header_only(3, 1)).unwrap();
    std::assert_eq!(reader.version(), FormatVersion::Dm3);
    std::assert_eq!(reader.byte_order(), ByteOrder::LittleEndian);
    std::assert_eq!(reader.header().root_length, 6);
    std::assert!(reader.path().is_none());
}

#[test]
fn test_dm4_header() {
    let reader = open(header_only(4, 0)).unwrap();
    std::assert_eq!(reader.version(), FormatVersion::Dm4);
    std::assert_eq!(reader.byte_order(), ByteOrder::BigEndian);
    std::assert_eq!(reader.header().root_length, 10);
}

#[test]
fn test_empty_root_directory() {
    for version in [3, 4] {
        let mut reader = open(header_only(version, 1)).unwrap();
        let root = reader.read_directory().unwrap();
        std::assert_eq!(root.entry_count(), 0);
        std::assert_eq!(root.path, "root");
        std::assert!(root.sorted);
        std::assert!(!root.open);
    }
}

#[test]
fn test_unsupported_version() {
    let result = open(header_only(5, 1));
    std::assert!(matches!(result, Err(DmError::UnsupportedVersion(5))));
}

#[test]
fn test_invalid_byte_order_flag() {
    let result = open(header_only(3, 7));
    std::assert!(matches!(result, Err(DmError::InvalidByteOrder(7))));
}

#[test]
fn test_truncated_header() {
    let result = open(Cursor::new(vec![0, 0, 0]));
    std::assert!(matches!(result, Err(DmError::Io(_))));
}

#[test]
fn test_read_tree_in_every_layout() {
    let writers = [
        TreeWriter::dm3(ByteOrder::LittleEndian),
        TreeWriter::dm3(ByteOrder::BigEndian),
        TreeWriter::dm4(ByteOrder::LittleEndian),
        TreeWriter::dm4(ByteOrder::BigEndian),
    ];

    for writer in &writers {
        let mut reader = open(sample_container(writer)).unwrap();
        let root = reader.read_directory().unwrap();
        std::assert_eq!(root.entry_count(), 2);

        let width = root.named_tag("Width").unwrap();
        std::assert_eq!(width.path, "root.Width");
        std::assert_eq!(width.encoding, TagEncoding::Simple(DataType::U32));
        std::assert_eq!(reader.read_tag_data(width).unwrap(), TagValue::Scalar(Scalar::U32(640)));

        let sub = root.named_subdir("Sub").unwrap();
        let samples = sub.unnamed_tag(0).unwrap();
        std::assert_eq!(samples.path, "root.Sub.0");
        std::assert_eq!(
            reader.read_tag_data(samples).unwrap(),
            TagValue::Array(SampleBuffer::U16(vec![1, 2, 300]))
        );
    }
}

#[test]
fn test_payloads_can_be_read_in_any_order() {
    let writer = TreeWriter::dm3(ByteOrder::LittleEndian);
    let mut reader = open(sample_container(&writer)).unwrap();
    let root = reader.read_directory().unwrap();

    let samples = root.named_subdir("Sub").unwrap().unnamed_tag(0).unwrap().clone();
    let width = root.named_tag("Width").unwrap().clone();

    std::assert!(matches!(reader.read_tag_data(&samples).unwrap(), TagValue::Array(_)));
    std::assert_eq!(reader.read_tag_data(&width).unwrap().expect_u64("root.Width").unwrap(), 640);
}

#[test]
fn test_text_tag() {
    let writer = TreeWriter::dm3(ByteOrder::LittleEndian);
    let text = writer.data(&[18, 2], &writer.u16s(&[b'H' as u16, b'i' as u16]));
    let mut reader = open(writer.file(writer.directory(vec![(21, "Name", text)]))).unwrap();

    let root = reader.read_directory().unwrap();
    let tag = root.named_tag("Name").unwrap();
    std::assert_eq!(tag.encoding, TagEncoding::Text { length: 2 });
    std::assert_eq!(reader.read_tag_data(tag).unwrap(), TagValue::Text("Hi".to_string()));
}

#[test]
fn test_struct_tag() {
    let writer = TreeWriter::dm4(ByteOrder::LittleEndian);
    let mut payload = Vec::new();
    payload.write_i32::<LittleEndian>(-7).unwrap();
    payload.write_f32::<LittleEndian>(1.5).unwrap();
    let tag = writer.data(&[15, 0, 2, 0, 3, 0, 6], &payload);
    let mut reader = open(writer.file(writer.directory(vec![(21, "Origin", tag)]))).unwrap();

    let root = reader.read_directory().unwrap();
    let origin = root.named_tag("Origin").unwrap();
    std::assert_eq!(
        reader.read_tag_data(origin).unwrap(),
        TagValue::Struct(vec![Scalar::I32(-7), Scalar::F32(1.5)])
    );
}

#[test]
fn test_invalid_tag_kind() {
    let writer = TreeWriter::dm3(ByteOrder::LittleEndian);
    let mut reader = open(writer.file(writer.directory(vec![(99, "X", Vec::new())]))).unwrap();

    let result = reader.read_directory();
    std::assert!(matches!(result, Err(DmError::InvalidTagKind { kind: 99, offset: 18 })));
}

#[test]
fn test_invalid_delimiter() {
    let writer = TreeWriter::dm3(ByteOrder::LittleEndian);
    let mut body = writer.data(&[5], &writer.u32s(&[1]));
    body[3] = b'X';
    let mut reader = open(writer.file(writer.directory(vec![(21, "Bad", body)]))).unwrap();

    match reader.read_directory() {
        Err(DmError::InvalidDelimiter { path, .. }) => std::assert_eq!(path, "root.Bad"),
        other => std::panic!("expected InvalidDelimiter, got {:?}", other),
    }
}

#[test]
fn test_unsupported_encoding() {
    let writer = TreeWriter::dm3(ByteOrder::LittleEndian);
    let body = writer.data(&[99], &[]);
    let mut reader = open(writer.file(writer.directory(vec![(21, "Odd", body)]))).unwrap();

    match reader.read_directory() {
        Err(DmError::UnsupportedEncoding { path, infos }) => {
            std::assert_eq!(path, "root.Odd");
            std::assert_eq!(infos, vec![99]);
        }
        other => std::panic!("expected UnsupportedEncoding, got {:?}", other),
    }
}

#[test]
fn test_array_of_empty_structs_rejected() {
    let writer = TreeWriter::dm4(ByteOrder::LittleEndian);
    let body = writer.data(&[20, 15, 0, 0, 1 << 61], &[]);
    let mut reader = open(writer.file(writer.directory(vec![(21, "Data", body)]))).unwrap();

    match reader.read_directory() {
        Err(DmError::UnsupportedEncoding { path, infos }) => {
            std::assert_eq!(path, "root.Data");
            std::assert_eq!(infos, vec![20, 15, 0, 0, 1 << 61]);
        }
        other => std::panic!("expected UnsupportedEncoding, got {:?}", other),
    }
}

#[test]
fn test_zero_info_words_rejected() {
    let writer = TreeWriter::dm3(ByteOrder::LittleEndian);
    let body = writer.data(&[], &[]);
    let mut reader = open(writer.file(writer.directory(vec![(21, "Empty", body)]))).unwrap();

    std::assert!(matches!(reader.read_directory(), Err(DmError::LimitExceeded(_))));
}

#[test]
fn test_payload_past_end_of_file() {
    let writer = TreeWriter::dm4(ByteOrder::LittleEndian);
    let body = writer.data(&[20, 4, 1000], &writer.u16s(&[1, 2, 3]));
    let mut reader = open(writer.file(writer.directory(vec![(21, "Data", body)]))).unwrap();

    match reader.read_directory() {
        Err(DmError::PayloadOutOfBounds { path, end, file_size }) => {
            std::assert_eq!(path, "root.Data");
            std::assert!(end > file_size);
        }
        other => std::panic!("expected PayloadOutOfBounds, got {:?}", other),
    }
}

#[test]
fn test_depth_limit() {
    let writer = TreeWriter::dm3(ByteOrder::LittleEndian);
    let limits = ParseLimits {
        max_depth: 0,
        ..ParseLimits::default()
    };
    let mut reader = ContainerReader::from_reader(sample_container(&writer), limits).unwrap();

    std::assert!(matches!(reader.read_directory(), Err(DmError::LimitExceeded(_))));
}

#[test]
fn test_entry_limit() {
    let writer = TreeWriter::dm4(ByteOrder::BigEndian);
    let limits = ParseLimits {
        max_entries_per_directory: 1,
        ..ParseLimits::default()
    };
    let mut reader = ContainerReader::from_reader(sample_container(&writer), limits).unwrap();

    std::assert!(matches!(reader.read_directory(), Err(DmError::LimitExceeded(_))));
}

#[test]
fn test_open_from_file() {
    let writer = TreeWriter::dm3(ByteOrder::BigEndian);
    let bytes = sample_container(&writer).into_inner();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();

    let mut reader = ContainerReader::open(file.path(), ParseLimits::default()).unwrap();
    std::assert_eq!(reader.path(), Some(file.path()));

    let root = reader.read_directory().unwrap();
    std::assert!(root.named_tag("Width").is_ok());
    reader.close();
}

#[test]
fn test_open_missing_file() {
    let result = ContainerReader::open("/nonexistent/slice.dm3", ParseLimits::default());
    std::assert!(matches!(result, Err(DmError::Io(_))));
}
