//! Format readers
//!
//! Every supported file family has one stateless reader implementing
//! `SliceReader`. The registry picks the reader from the file extension.

pub mod dm3;
pub mod dm4;
pub mod raster;
pub mod registry;

#[cfg(test)]
mod tests;

use std::path::Path;

use ndarray::Array3;

use crate::dm::SampleBuffer;
use crate::errors::{SliceError, SliceResult};
use crate::pixels::{Datatype, Dimensions, PixelArray};

pub use dm3::Dm3Reader;
pub use dm4::Dm4Reader;
pub use raster::RasterReader;
pub use registry::{extension_of, read_array, read_dimensions, FormatKind, ImageReader, ImageReaderBuilder};

/// Reads one family of slice files
pub trait SliceReader: Send + Sync {
    /// Short name used in log records
    fn name(&self) -> &'static str;

    /// Decodes the slice at `path` into a 3-D array of `dtype` samples
    fn read_array(&self, path: &Path, dtype: Datatype) -> SliceResult<PixelArray>;

    /// Reads the slice's width and height without decoding pixels where possible
    fn read_dimensions(&self, path: &Path) -> SliceResult<Dimensions>;
}

/// Shapes row-major `samples` into an array of `shape`
pub(crate) fn rows_to_array<T>(path: &Path, shape: (usize, usize, usize), samples: Vec<T>) -> SliceResult<Array3<T>> {
    let count = samples.len();
    Array3::from_shape_vec(shape, samples).map_err(|e| SliceError::MalformedContainer {
        path: path.to_path_buf(),
        reason: format!("{} samples cannot fill shape {:?}: {}", count, shape, e),
    })
}

/// Converts a container payload into an array at its native sample type
///
/// Only unsigned 8, 16 and 32 bit payloads can be rescaled.
pub(crate) fn native_array(path: &Path, shape: (usize, usize, usize), samples: SampleBuffer) -> SliceResult<PixelArray> {
    match samples {
        SampleBuffer::U8(values) => Ok(PixelArray::U8(rows_to_array(path, shape, values)?)),
        SampleBuffer::U16(values) => Ok(PixelArray::U16(rows_to_array(path, shape, values)?)),
        SampleBuffer::U32(values) => Ok(PixelArray::U32(rows_to_array(path, shape, values)?)),
        other => Err(SliceError::InvalidDatatype(format!(
            "{} holds {} samples, which cannot be rescaled",
            path.display(),
            other.data_type()
        ))),
    }
}
