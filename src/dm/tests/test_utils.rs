use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use crate::io::byte_order::ByteOrder;

/// Hand-assembles container bytes, independent of `ContainerBuilder`
pub struct TreeWriter {
    /// DM4 layout when set
    pub wide: bool,
    /// Byte order of payloads
    pub order: ByteOrder,
}

impl TreeWriter {
    pub fn dm3(order: ByteOrder) -> Self {
        TreeWriter { wide: false, order }
    }

    pub fn dm4(order: ByteOrder) -> Self {
        TreeWriter { wide: true, order }
    }

    /// Writes a count or info word at the container's width (always big-endian)
    pub fn count(&self, out: &mut Vec<u8>, value: u64) {
        if self.wide {
            out.write_u64::<BigEndian>(value).unwrap();
        } else {
            out.write_u32::<BigEndian>(value as u32).unwrap();
        }
    }

    /// Directory body: flags, entry count, then `(kind, label, body)` entries
    pub fn directory(&self, entries: Vec<(u8, &str, Vec<u8>)>) -> Vec<u8> {
        let mut out = vec![1u8, 0u8];
        self.count(&mut out, entries.len() as u64);
        for (kind, label, body) in entries {
            out.push(kind);
            out.write_u16::<BigEndian>(label.len() as u16).unwrap();
            out.extend_from_slice(label.as_bytes());
            if self.wide {
                out.write_u64::<BigEndian>(body.len() as u64).unwrap();
            }
            out.extend_from_slice(&body);
        }
        out
    }

    /// Data tag body: delimiter, info words, payload
    pub fn data(&self, infos: &[u64], payload: &[u8]) -> Vec<u8> {
        let mut out = b"%%%%".to_vec();
        self.count(&mut out, infos.len() as u64);
        for &info in infos {
            self.count(&mut out, info);
        }
        out.extend_from_slice(payload);
        out
    }

    /// Header, root directory and trailer
    pub fn file(&self, root: Vec<u8>) -> Cursor<Vec<u8>> {
        let mut out = Vec::new();
        if self.wide {
            out.write_u32::<BigEndian>(4).unwrap();
            out.write_u64::<BigEndian>(root.len() as u64).unwrap();
        } else {
            out.write_u32::<BigEndian>(3).unwrap();
            out.write_u32::<BigEndian>(root.len() as u32).unwrap();
        }
        out.write_u32::<BigEndian>(self.order.flag()).unwrap();
        out.extend_from_slice(&root);
        out.extend_from_slice(&[0u8; 8]);
        Cursor::new(out)
    }

    pub fn u16s(&self, values: &[u16]) -> Vec<u8> {
        let mut out = Vec::new();
        for &v in values {
            match self.order {
                ByteOrder::LittleEndian => out.write_u16::<LittleEndian>(v).unwrap(),
                ByteOrder::BigEndian => out.write_u16::<BigEndian>(v).unwrap(),
            }
        }
        out
    }

    pub fn u32s(&self, values: &[u32]) -> Vec<u8> {
        let mut out = Vec::new();
        for &v in values {
            match self.order {
                ByteOrder::LittleEndian => out.write_u32::<LittleEndian>(v).unwrap(),
                ByteOrder::BigEndian => out.write_u32::<BigEndian>(v).unwrap(),
            }
        }
        out
    }
}

/// A small tree: `Width` (u32 640) and `Sub` holding one unnamed u16 array
pub fn sample_container(writer: &TreeWriter) -> Cursor<Vec<u8>> {
    let width = writer.data(&[5], &writer.u32s(&[640]));
    let samples = writer.data(&[20, 4, 3], &writer.u16s(&[1, 2, 300]));
    let sub = writer.directory(vec![(21, "", samples)]);
    let root = writer.directory(vec![(21, "Width", width), (20, "Sub", sub)]);
    writer.file(root)
}

/// Header bytes followed by an empty root directory
pub fn header_only(version: u32, flag: u32) -> Cursor<Vec<u8>> {
    let mut out = Vec::new();
    out.write_u32::<BigEndian>(version).unwrap();
    if version == 4 {
        out.write_u64::<BigEndian>(10).unwrap();
        out.write_u32::<BigEndian>(flag).unwrap();
        out.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    } else {
        out.write_u32::<BigEndian>(6).unwrap();
        out.write_u32::<BigEndian>(flag).unwrap();
        out.extend_from_slice(&[1, 0, 0, 0, 0, 0]);
    }
    Cursor::new(out)
}
