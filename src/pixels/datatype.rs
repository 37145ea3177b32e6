//! Sample datatypes
//!
//! Only unsigned integer widths can be requested or rescaled; signed and
//! floating-point names are rejected when parsed.

use std::fmt;
use std::str::FromStr;

use crate::errors::{SliceError, SliceResult};

/// Unsigned integer sample width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Datatype {
    U8,
    U16,
    U32,
}

impl Datatype {
    pub const ALL: [Datatype; 3] = [Datatype::U8, Datatype::U16, Datatype::U32];

    /// Width in bits
    pub fn bits(&self) -> u32 {
        match self {
            Datatype::U8 => 8,
            Datatype::U16 => 16,
            Datatype::U32 => 32,
        }
    }

    /// Largest representable sample value
    pub fn max_value(&self) -> u64 {
        (1u64 << self.bits()) - 1
    }

    /// Looks up the datatype with the given width
    pub fn from_bits(bits: u32) -> SliceResult<Self> {
        match bits {
            8 => Ok(Datatype::U8),
            16 => Ok(Datatype::U16),
            32 => Ok(Datatype::U32),
            _ => Err(SliceError::InvalidDatatype(format!("no unsigned sample type is {} bits wide", bits))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Datatype::U8 => "uint8",
            Datatype::U16 => "uint16",
            Datatype::U32 => "uint32",
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Datatype {
    type Err = SliceError;

    /// Accepts `uint8`/`u8`, `uint16`/`u16` and `uint32`/`u32`
    fn from_str(s: &str) -> SliceResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uint8" | "u8" => Ok(Datatype::U8),
            "uint16" | "u16" => Ok(Datatype::U16),
            "uint32" | "u32" => Ok(Datatype::U32),
            other => Err(SliceError::InvalidDatatype(format!(
                "{:?} is not an unsigned integer sample type",
                other
            ))),
        }
    }
}

/// Rust sample types matching a `Datatype`
pub trait Sample: Copy + Default + PartialOrd + fmt::Debug + Send + Sync + 'static {
    const DATATYPE: Datatype;

    fn to_u64(self) -> u64;

    /// Narrowing cast; callers keep `value` within `DATATYPE.max_value()`
    fn from_u64(value: u64) -> Self;
}

macro_rules! impl_sample {
    ($ty:ty, $datatype:expr) => {
        impl Sample for $ty {
            const DATATYPE: Datatype = $datatype;

            fn to_u64(self) -> u64 {
                self as u64
            }

            fn from_u64(value: u64) -> Self {
                value as $ty
            }
        }
    };
}

impl_sample!(u8, Datatype::U8);
impl_sample!(u16, Datatype::U16);
impl_sample!(u32, Datatype::U32);
