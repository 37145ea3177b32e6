//! Tag payload types
//!
//! A data tag's info words describe its payload as a simple element type,
//! a string, a struct of simple fields, or an array of either. This module
//! holds the decoded forms of those payloads.

use std::fmt;

use crate::dm::constants::{encodings, image_data_types};
use crate::dm::errors::{DmError, DmResult};

/// Simple element types a tag payload can be built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Bool,
}

impl DataType {
    /// Decodes an element type from its encoding code
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            encodings::I16 => Some(DataType::I16),
            encodings::I32 => Some(DataType::I32),
            encodings::U16 => Some(DataType::U16),
            encodings::U32 => Some(DataType::U32),
            encodings::F32 => Some(DataType::F32),
            encodings::F64 => Some(DataType::F64),
            encodings::BOOL => Some(DataType::Bool),
            encodings::I8 => Some(DataType::I8),
            encodings::U8 => Some(DataType::U8),
            encodings::I64 => Some(DataType::I64),
            encodings::U64 => Some(DataType::U64),
            _ => None,
        }
    }

    /// The encoding code written to the info words
    pub fn code(&self) -> u64 {
        match self {
            DataType::I16 => encodings::I16,
            DataType::I32 => encodings::I32,
            DataType::U16 => encodings::U16,
            DataType::U32 => encodings::U32,
            DataType::F32 => encodings::F32,
            DataType::F64 => encodings::F64,
            DataType::Bool => encodings::BOOL,
            DataType::I8 => encodings::I8,
            DataType::U8 => encodings::U8,
            DataType::I64 => encodings::I64,
            DataType::U64 => encodings::U64,
        }
    }

    /// Size of one element in bytes
    pub fn size(&self) -> u64 {
        match self {
            DataType::I8 | DataType::U8 | DataType::Bool => 1,
            DataType::I16 | DataType::U16 => 2,
            DataType::I32 | DataType::U32 | DataType::F32 => 4,
            DataType::I64 | DataType::U64 | DataType::F64 => 8,
        }
    }

    /// Value of the `ImageData.DataType` tag describing pixels of this type
    pub fn image_data_type(&self) -> Option<u32> {
        match self {
            DataType::I16 => Some(image_data_types::SIGNED_INT16),
            DataType::F32 => Some(image_data_types::REAL4),
            DataType::U8 => Some(image_data_types::UNSIGNED_INT8),
            DataType::I32 => Some(image_data_types::SIGNED_INT32),
            DataType::I8 => Some(image_data_types::SIGNED_INT8),
            DataType::U16 => Some(image_data_types::UNSIGNED_INT16),
            DataType::U32 => Some(image_data_types::UNSIGNED_INT32),
            DataType::F64 => Some(image_data_types::REAL8),
            DataType::Bool => Some(image_data_types::BINARY),
            DataType::I64 | DataType::U64 => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataType::I8 => "int8",
            DataType::U8 => "uint8",
            DataType::I16 => "int16",
            DataType::U16 => "uint16",
            DataType::I32 => "int32",
            DataType::U32 => "uint32",
            DataType::I64 => "int64",
            DataType::U64 => "uint64",
            DataType::F32 => "float32",
            DataType::F64 => "float64",
            DataType::Bool => "bool",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single typed value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
}

impl Scalar {
    pub fn data_type(&self) -> DataType {
        match self {
            Scalar::I8(_) => DataType::I8,
            Scalar::U8(_) => DataType::U8,
            Scalar::I16(_) => DataType::I16,
            Scalar::U16(_) => DataType::U16,
            Scalar::I32(_) => DataType::I32,
            Scalar::U32(_) => DataType::U32,
            Scalar::I64(_) => DataType::I64,
            Scalar::U64(_) => DataType::U64,
            Scalar::F32(_) => DataType::F32,
            Scalar::F64(_) => DataType::F64,
            Scalar::Bool(_) => DataType::Bool,
        }
    }

    /// Returns the value as an unsigned integer if it is a non-negative integer
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Scalar::I8(v) => u64::try_from(v).ok(),
            Scalar::U8(v) => Some(v as u64),
            Scalar::I16(v) => u64::try_from(v).ok(),
            Scalar::U16(v) => Some(v as u64),
            Scalar::I32(v) => u64::try_from(v).ok(),
            Scalar::U32(v) => Some(v as u64),
            Scalar::I64(v) => u64::try_from(v).ok(),
            Scalar::U64(v) => Some(v),
            Scalar::F32(_) | Scalar::F64(_) | Scalar::Bool(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::I8(v) => write!(f, "{}", v),
            Scalar::U8(v) => write!(f, "{}", v),
            Scalar::I16(v) => write!(f, "{}", v),
            Scalar::U16(v) => write!(f, "{}", v),
            Scalar::I32(v) => write!(f, "{}", v),
            Scalar::U32(v) => write!(f, "{}", v),
            Scalar::I64(v) => write!(f, "{}", v),
            Scalar::U64(v) => write!(f, "{}", v),
            Scalar::F32(v) => write!(f, "{}", v),
            Scalar::F64(v) => write!(f, "{}", v),
            Scalar::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// A homogeneous array of simple elements, as stored in array tags
#[derive(Debug, Clone, PartialEq)]
pub enum SampleBuffer {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    I64(Vec<i64>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
}

impl SampleBuffer {
    pub fn data_type(&self) -> DataType {
        match self {
            SampleBuffer::I8(_) => DataType::I8,
            SampleBuffer::U8(_) => DataType::U8,
            SampleBuffer::I16(_) => DataType::I16,
            SampleBuffer::U16(_) => DataType::U16,
            SampleBuffer::I32(_) => DataType::I32,
            SampleBuffer::U32(_) => DataType::U32,
            SampleBuffer::I64(_) => DataType::I64,
            SampleBuffer::U64(_) => DataType::U64,
            SampleBuffer::F32(_) => DataType::F32,
            SampleBuffer::F64(_) => DataType::F64,
            SampleBuffer::Bool(_) => DataType::Bool,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SampleBuffer::I8(v) => v.len(),
            SampleBuffer::U8(v) => v.len(),
            SampleBuffer::I16(v) => v.len(),
            SampleBuffer::U16(v) => v.len(),
            SampleBuffer::I32(v) => v.len(),
            SampleBuffer::U32(v) => v.len(),
            SampleBuffer::I64(v) => v.len(),
            SampleBuffer::U64(v) => v.len(),
            SampleBuffer::F32(v) => v.len(),
            SampleBuffer::F64(v) => v.len(),
            SampleBuffer::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decoded payload of a data tag
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Scalar(Scalar),
    Text(String),
    Struct(Vec<Scalar>),
    Array(SampleBuffer),
    StructArray {
        fields: Vec<DataType>,
        elements: Vec<Vec<Scalar>>,
    },
}

impl TagValue {
    /// Short description of the value's shape, used in error messages
    pub fn kind_name(&self) -> String {
        match self {
            TagValue::Scalar(s) => format!("{} scalar", s.data_type()),
            TagValue::Text(_) => "string".to_string(),
            TagValue::Struct(fields) => format!("struct of {} fields", fields.len()),
            TagValue::Array(buffer) => format!("{} array", buffer.data_type()),
            TagValue::StructArray { elements, .. } => format!("array of {} structs", elements.len()),
        }
    }

    /// Interprets the value as a non-negative integer
    ///
    /// `path` only feeds the error message.
    pub fn expect_u64(&self, path: &str) -> DmResult<u64> {
        match self {
            TagValue::Scalar(s) => s.as_u64(),
            _ => None,
        }
        .ok_or_else(|| DmError::UnexpectedValue {
            path: path.to_string(),
            expected: "non-negative integer",
            found: self.kind_name(),
        })
    }

    /// Interprets the value as an array of simple elements
    pub fn into_samples(self, path: &str) -> DmResult<SampleBuffer> {
        match self {
            TagValue::Array(buffer) => Ok(buffer),
            other => Err(DmError::UnexpectedValue {
                path: path.to_string(),
                expected: "array",
                found: other.kind_name(),
            }),
        }
    }
}
