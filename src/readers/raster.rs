//! Reader for TIFF, PNG and JPEG slices

use std::path::Path;

use image::DynamicImage;
use log::{debug, info};

use crate::errors::{SliceError, SliceResult};
use crate::pixels::{Datatype, Dimensions, PixelArray};
use crate::readers::{rows_to_array, SliceReader};

/// Decodes common raster formats through the `image` crate
///
/// Samples keep their decoded values. The requested datatype must be at
/// least as wide as the file's native sample type.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterReader;

impl RasterReader {
    pub fn new() -> Self {
        RasterReader
    }

    fn open(path: &Path) -> SliceResult<image::ImageReader<std::io::BufReader<std::fs::File>>> {
        image::ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| SliceError::decode(path, e))
    }

    /// Lays the decoded buffer out as (row, column, channel)
    fn to_array(path: &Path, image: DynamicImage) -> SliceResult<PixelArray> {
        let width = image.width() as usize;
        let height = image.height() as usize;

        let array = match image {
            DynamicImage::ImageLuma8(buffer) => PixelArray::U8(rows_to_array(path, (height, width, 1), buffer.into_raw())?),
            DynamicImage::ImageLumaA8(buffer) => PixelArray::U8(rows_to_array(path, (height, width, 2), buffer.into_raw())?),
            DynamicImage::ImageRgb8(buffer) => PixelArray::U8(rows_to_array(path, (height, width, 3), buffer.into_raw())?),
            DynamicImage::ImageRgba8(buffer) => PixelArray::U8(rows_to_array(path, (height, width, 4), buffer.into_raw())?),
            DynamicImage::ImageLuma16(buffer) => PixelArray::U16(rows_to_array(path, (height, width, 1), buffer.into_raw())?),
            DynamicImage::ImageLumaA16(buffer) => PixelArray::U16(rows_to_array(path, (height, width, 2), buffer.into_raw())?),
            DynamicImage::ImageRgb16(buffer) => PixelArray::U16(rows_to_array(path, (height, width, 3), buffer.into_raw())?),
            DynamicImage::ImageRgba16(buffer) => PixelArray::U16(rows_to_array(path, (height, width, 4), buffer.into_raw())?),
            other => {
                return Err(SliceError::InvalidDatatype(format!(
                    "{} decodes to {:?} samples, not unsigned integers",
                    path.display(),
                    other.color()
                )))
            }
        };

        Ok(array)
    }
}

impl SliceReader for RasterReader {
    fn name(&self) -> &'static str {
        "raster"
    }

    fn read_array(&self, path: &Path, dtype: Datatype) -> SliceResult<PixelArray> {
        info!("Decoding raster slice: {}", path.display());

        let image = Self::open(path)?.decode().map_err(|e| SliceError::decode(path, e))?;
        debug!("{}: {}x{} {:?}", path.display(), image.width(), image.height(), image.color());

        let array = Self::to_array(path, image)?.swap_xy();
        array.cast(dtype)
    }

    fn read_dimensions(&self, path: &Path) -> SliceResult<Dimensions> {
        let (width, height) = Self::open(path)?
            .into_dimensions()
            .map_err(|e| SliceError::decode(path, e))?;
        debug!("{}: {}x{}", path.display(), width, height);

        Ok(Dimensions::new(width as usize, height as usize))
    }
}
