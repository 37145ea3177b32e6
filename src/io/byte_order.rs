//! Byte order handling for tag payloads
//!
//! DigitalMicrograph containers store their directory structure big-endian,
//! while tag payloads follow the byte order declared in the file header.
//! This module implements the Strategy pattern for payload access so the
//! parser and the writer never branch on endianness themselves.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Result, Write};

use crate::dm::constants::header;
use crate::dm::errors::{DmError, DmResult};
use crate::io::seekable::SeekableReader;

/// Byte order of the tag payloads in a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian payloads (header flag 1)
    LittleEndian,
    /// Big-endian payloads (header flag 0)
    BigEndian,
}

impl ByteOrder {
    /// Decodes the byte order flag stored in the container header
    pub fn from_flag(flag: u32) -> DmResult<Self> {
        match flag {
            header::LITTLE_ENDIAN_FLAG => Ok(ByteOrder::LittleEndian),
            header::BIG_ENDIAN_FLAG => Ok(ByteOrder::BigEndian),
            _ => Err(DmError::InvalidByteOrder(flag)),
        }
    }

    /// The header flag for this byte order
    pub fn flag(&self) -> u32 {
        match self {
            ByteOrder::LittleEndian => header::LITTLE_ENDIAN_FLAG,
            ByteOrder::BigEndian => header::BIG_ENDIAN_FLAG,
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "little-endian",
            ByteOrder::BigEndian => "big-endian",
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Trait for byte order handling strategies
///
/// Single bytes (`u8`, `i8`, booleans) carry no byte order and are read
/// directly through `ReadBytesExt`; everything wider goes through here.
pub trait ByteOrderHandler: Send + Sync {
    fn read_i16(&self, reader: &mut dyn SeekableReader) -> Result<i16>;
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;
    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32>;
    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32>;
    fn read_i64(&self, reader: &mut dyn SeekableReader) -> Result<i64>;
    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64>;
    fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32>;
    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64>;

    /// Bulk reads used for pixel payloads
    fn read_i16_into(&self, reader: &mut dyn SeekableReader, dst: &mut [i16]) -> Result<()>;
    fn read_u16_into(&self, reader: &mut dyn SeekableReader, dst: &mut [u16]) -> Result<()>;
    fn read_i32_into(&self, reader: &mut dyn SeekableReader, dst: &mut [i32]) -> Result<()>;
    fn read_u32_into(&self, reader: &mut dyn SeekableReader, dst: &mut [u32]) -> Result<()>;
    fn read_i64_into(&self, reader: &mut dyn SeekableReader, dst: &mut [i64]) -> Result<()>;
    fn read_u64_into(&self, reader: &mut dyn SeekableReader, dst: &mut [u64]) -> Result<()>;
    fn read_f32_into(&self, reader: &mut dyn SeekableReader, dst: &mut [f32]) -> Result<()>;
    fn read_f64_into(&self, reader: &mut dyn SeekableReader, dst: &mut [f64]) -> Result<()>;

    fn write_i16(&self, writer: &mut dyn Write, value: i16) -> Result<()>;
    fn write_u16(&self, writer: &mut dyn Write, value: u16) -> Result<()>;
    fn write_i32(&self, writer: &mut dyn Write, value: i32) -> Result<()>;
    fn write_u32(&self, writer: &mut dyn Write, value: u32) -> Result<()>;
    fn write_i64(&self, writer: &mut dyn Write, value: i64) -> Result<()>;
    fn write_u64(&self, writer: &mut dyn Write, value: u64) -> Result<()>;
    fn write_f32(&self, writer: &mut dyn Write, value: f32) -> Result<()>;
    fn write_f64(&self, writer: &mut dyn Write, value: f64) -> Result<()>;
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

/// Big-endian byte order handler
pub struct BigEndianHandler;

macro_rules! impl_byte_order_handler {
    ($handler:ty, $order:ty) => {
        impl ByteOrderHandler for $handler {
            fn read_i16(&self, reader: &mut dyn SeekableReader) -> Result<i16> {
                reader.read_i16::<$order>()
            }

            fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
                reader.read_u16::<$order>()
            }

            fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32> {
                reader.read_i32::<$order>()
            }

            fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
                reader.read_u32::<$order>()
            }

            fn read_i64(&self, reader: &mut dyn SeekableReader) -> Result<i64> {
                reader.read_i64::<$order>()
            }

            fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
                reader.read_u64::<$order>()
            }

            fn read_f32(&self, reader: &mut dyn SeekableReader) -> Result<f32> {
                reader.read_f32::<$order>()
            }

            fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
                reader.read_f64::<$order>()
            }

            fn read_i16_into(&self, reader: &mut dyn SeekableReader, dst: &mut [i16]) -> Result<()> {
                reader.read_i16_into::<$order>(dst)
            }

            fn read_u16_into(&self, reader: &mut dyn SeekableReader, dst: &mut [u16]) -> Result<()> {
                reader.read_u16_into::<$order>(dst)
            }

            fn read_i32_into(&self, reader: &mut dyn SeekableReader, dst: &mut [i32]) -> Result<()> {
                reader.read_i32_into::<$order>(dst)
            }

            fn read_u32_into(&self, reader: &mut dyn SeekableReader, dst: &mut [u32]) -> Result<()> {
                reader.read_u32_into::<$order>(dst)
            }

            fn read_i64_into(&self, reader: &mut dyn SeekableReader, dst: &mut [i64]) -> Result<()> {
                reader.read_i64_into::<$order>(dst)
            }

            fn read_u64_into(&self, reader: &mut dyn SeekableReader, dst: &mut [u64]) -> Result<()> {
                reader.read_u64_into::<$order>(dst)
            }

            fn read_f32_into(&self, reader: &mut dyn SeekableReader, dst: &mut [f32]) -> Result<()> {
                reader.read_f32_into::<$order>(dst)
            }

            fn read_f64_into(&self, reader: &mut dyn SeekableReader, dst: &mut [f64]) -> Result<()> {
                reader.read_f64_into::<$order>(dst)
            }

            fn write_i16(&self, writer: &mut dyn Write, value: i16) -> Result<()> {
                writer.write_i16::<$order>(value)
            }

            fn write_u16(&self, writer: &mut dyn Write, value: u16) -> Result<()> {
                writer.write_u16::<$order>(value)
            }

            fn write_i32(&self, writer: &mut dyn Write, value: i32) -> Result<()> {
                writer.write_i32::<$order>(value)
            }

            fn write_u32(&self, writer: &mut dyn Write, value: u32) -> Result<()> {
                writer.write_u32::<$order>(value)
            }

            fn write_i64(&self, writer: &mut dyn Write, value: i64) -> Result<()> {
                writer.write_i64::<$order>(value)
            }

            fn write_u64(&self, writer: &mut dyn Write, value: u64) -> Result<()> {
                writer.write_u64::<$order>(value)
            }

            fn write_f32(&self, writer: &mut dyn Write, value: f32) -> Result<()> {
                writer.write_f32::<$order>(value)
            }

            fn write_f64(&self, writer: &mut dyn Write, value: f64) -> Result<()> {
                writer.write_f64::<$order>(value)
            }
        }
    };
}

impl_byte_order_handler!(LittleEndianHandler, LittleEndian);
impl_byte_order_handler!(BigEndianHandler, BigEndian);
