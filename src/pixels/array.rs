//! Normalized pixel arrays

use std::fmt;

use ndarray::{Array3, Ix3};

use crate::errors::{SliceError, SliceResult};
use crate::pixels::datatype::{Datatype, Sample};
use crate::pixels::rescale::rescale;

/// Width and height of a slice in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize) -> Self {
        Dimensions { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

impl From<(usize, usize)> for Dimensions {
    fn from((width, height): (usize, usize)) -> Self {
        Dimensions { width, height }
    }
}

impl From<Dimensions> for (usize, usize) {
    fn from(dimensions: Dimensions) -> Self {
        (dimensions.width, dimensions.height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A 3-D array of unsigned samples
///
/// Readers return axes ordered (x, y, channel), except DM4 slices which are
/// (y, x, 1).
#[derive(Debug, Clone, PartialEq)]
pub enum PixelArray {
    U8(Array3<u8>),
    U16(Array3<u16>),
    U32(Array3<u32>),
}

macro_rules! dispatch {
    ($array:expr, $data:ident => $body:expr) => {
        match $array {
            PixelArray::U8($data) => $body,
            PixelArray::U16($data) => $body,
            PixelArray::U32($data) => $body,
        }
    };
}

impl PixelArray {
    pub fn datatype(&self) -> Datatype {
        match self {
            PixelArray::U8(_) => Datatype::U8,
            PixelArray::U16(_) => Datatype::U16,
            PixelArray::U32(_) => Datatype::U32,
        }
    }

    /// Extents of the three axes
    pub fn shape(&self) -> [usize; 3] {
        let (x, y, channels) = dispatch!(self, data => data.dim());
        [x, y, channels]
    }

    pub fn len(&self) -> usize {
        dispatch!(self, data => data.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_u8(&self) -> Option<&Array3<u8>> {
        match self {
            PixelArray::U8(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<&Array3<u16>> {
        match self {
            PixelArray::U16(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<&Array3<u32>> {
        match self {
            PixelArray::U32(data) => Some(data),
            _ => None,
        }
    }

    /// Sample at `index`, widened to `u64`
    pub fn get(&self, index: [usize; 3]) -> Option<u64> {
        dispatch!(self, data => data.get(index).map(|v| v.to_u64()))
    }

    /// Rescales the full native range onto the full range of `target`
    pub fn rescale(&self, target: Datatype) -> PixelArray {
        dispatch!(self, data => rescale_to(data, target))
    }

    /// Converts to `target` without changing sample values
    ///
    /// Fails with `InvalidDatatype` when `target` is narrower than the
    /// current datatype.
    pub fn cast(self, target: Datatype) -> SliceResult<PixelArray> {
        let native = self.datatype();
        if target < native {
            return Err(SliceError::InvalidDatatype(format!(
                "cannot represent {} samples as {} without rescaling",
                native, target
            )));
        }
        if target == native {
            return Ok(self);
        }
        Ok(dispatch!(&self, data => cast_to(data, target)))
    }

    /// Swaps axes 0 and 1, returning a standard-layout array
    pub fn swap_xy(self) -> PixelArray {
        match self {
            PixelArray::U8(data) => PixelArray::U8(swap_axes(data)),
            PixelArray::U16(data) => PixelArray::U16(swap_axes(data)),
            PixelArray::U32(data) => PixelArray::U32(swap_axes(data)),
        }
    }
}

impl From<Array3<u8>> for PixelArray {
    fn from(data: Array3<u8>) -> Self {
        PixelArray::U8(data)
    }
}

impl From<Array3<u16>> for PixelArray {
    fn from(data: Array3<u16>) -> Self {
        PixelArray::U16(data)
    }
}

impl From<Array3<u32>> for PixelArray {
    fn from(data: Array3<u32>) -> Self {
        PixelArray::U32(data)
    }
}

fn rescale_to<T: Sample>(data: &Array3<T>, target: Datatype) -> PixelArray {
    match target {
        Datatype::U8 => PixelArray::U8(rescale::<T, u8, Ix3>(data)),
        Datatype::U16 => PixelArray::U16(rescale::<T, u16, Ix3>(data)),
        Datatype::U32 => PixelArray::U32(rescale::<T, u32, Ix3>(data)),
    }
}

fn cast_to<T: Sample>(data: &Array3<T>, target: Datatype) -> PixelArray {
    match target {
        Datatype::U8 => PixelArray::U8(data.mapv(|v| u8::from_u64(v.to_u64()))),
        Datatype::U16 => PixelArray::U16(data.mapv(|v| u16::from_u64(v.to_u64()))),
        Datatype::U32 => PixelArray::U32(data.mapv(|v| u32::from_u64(v.to_u64()))),
    }
}

fn swap_axes<T: Clone>(mut data: Array3<T>) -> Array3<T> {
    data.swap_axes(0, 1);
    data.as_standard_layout().into_owned()
}
