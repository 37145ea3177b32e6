//! Reader for DM4 slices
//!
//! The slice is always `ImageList.1.ImageData`; there is no fallback when
//! that entry is missing. The array comes back as (y, x, 1), unlike the
//! other readers.

use std::path::Path;

use log::{info, trace};

use crate::config::ReaderOptions;
use crate::dm::image::{data_tag, image_data_dir, read_dimensions, SLICE_INDEX};
use crate::dm::{ContainerReader, DmError, FormatVersion, SampleBuffer};
use crate::errors::{SliceError, SliceResult};
use crate::io::seekable::SeekableReader;
use crate::pixels::{Datatype, Dimensions, PixelArray};
use crate::readers::{rows_to_array, SliceReader};

#[derive(Debug, Default, Clone, Copy)]
pub struct Dm4Reader {
    options: ReaderOptions,
}

impl Dm4Reader {
    pub fn new(options: ReaderOptions) -> Self {
        Dm4Reader { options }
    }

    fn open(&self, path: &Path) -> SliceResult<ContainerReader<std::io::BufReader<std::fs::File>>> {
        ContainerReader::open(path, self.options.limits).map_err(|e| SliceError::from_container(path, e))
    }

    fn trace_step(&self, step: &str, path: &Path) {
        if self.options.trace_reads {
            trace!("DM4 {}: {}", step, path.display());
        }
    }

    pub(crate) fn read_array_from<R: SeekableReader>(
        &self,
        mut container: ContainerReader<R>,
        path: &Path,
        dtype: Datatype,
    ) -> SliceResult<PixelArray> {
        self.trace_step("read_array enter", path);
        let wrap = |e: DmError| SliceError::from_container(path, e);

        container.version().require(FormatVersion::Dm4).map_err(wrap)?;
        let root = container.read_directory().map_err(wrap)?;
        let image_data = image_data_dir(&root, SLICE_INDEX).map_err(wrap)?;
        let (width, height) = read_dimensions(&mut container, image_data).map_err(wrap)?;

        let tag = data_tag(image_data).map_err(wrap)?;
        let samples = container
            .read_tag_data(tag)
            .and_then(|value| value.into_samples(&tag.path))
            .map_err(wrap)?;
        container.close();

        let samples = match samples {
            SampleBuffer::U16(values) => values,
            SampleBuffer::U8(values) => values.into_iter().map(u16::from).collect(),
            other => {
                return Err(SliceError::InvalidDatatype(format!(
                    "{} holds {} samples, expected uint16",
                    path.display(),
                    other.data_type()
                )))
            }
        };

        let native = PixelArray::U16(rows_to_array(path, (height, width, 1), samples)?);
        let array = native.rescale(dtype);
        self.trace_step("read_array exit", path);
        Ok(array)
    }

    pub(crate) fn read_dimensions_from<R: SeekableReader>(
        &self,
        mut container: ContainerReader<R>,
        path: &Path,
    ) -> SliceResult<Dimensions> {
        self.trace_step("read_dimensions enter", path);
        let wrap = |e: DmError| SliceError::from_container(path, e);

        container.version().require(FormatVersion::Dm4).map_err(wrap)?;
        let root = container.read_directory().map_err(wrap)?;
        let image_data = image_data_dir(&root, SLICE_INDEX).map_err(wrap)?;
        let dimensions = read_dimensions(&mut container, image_data).map_err(wrap)?;
        container.close();

        self.trace_step("read_dimensions exit", path);
        Ok(Dimensions::from(dimensions))
    }
}

impl SliceReader for Dm4Reader {
    fn name(&self) -> &'static str {
        "DM4"
    }

    fn read_array(&self, path: &Path, dtype: Datatype) -> SliceResult<PixelArray> {
        info!("Reading DM4 slice as {}: {}", dtype, path.display());
        let container = self.open(path)?;
        self.read_array_from(container, path, dtype)
    }

    fn read_dimensions(&self, path: &Path) -> SliceResult<Dimensions> {
        let container = self.open(path)?;
        self.read_dimensions_from(container, path)
    }
}
