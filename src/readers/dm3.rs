//! Reader for DM3 slices

use std::path::Path;

use log::{debug, info};

use crate::config::ReaderOptions;
use crate::dm::image::{data_tag, image_data_dir, main_image_index, read_dimensions};
use crate::dm::{ContainerReader, DmError, FormatVersion};
use crate::errors::{SliceError, SliceResult};
use crate::io::seekable::SeekableReader;
use crate::pixels::{Datatype, Dimensions, PixelArray};
use crate::readers::{native_array, SliceReader};

/// Reads the main image of a DM3 container
///
/// Samples are rescaled from their stored width to the requested one, then
/// laid out as (x, y, 1).
#[derive(Debug, Default, Clone, Copy)]
pub struct Dm3Reader {
    options: ReaderOptions,
}

impl Dm3Reader {
    pub fn new(options: ReaderOptions) -> Self {
        Dm3Reader { options }
    }

    fn open(&self, path: &Path) -> SliceResult<ContainerReader<std::io::BufReader<std::fs::File>>> {
        ContainerReader::open(path, self.options.limits).map_err(|e| SliceError::from_container(path, e))
    }

    pub(crate) fn read_array_from<R: SeekableReader>(
        &self,
        mut container: ContainerReader<R>,
        path: &Path,
        dtype: Datatype,
    ) -> SliceResult<PixelArray> {
        let wrap = |e: DmError| SliceError::from_container(path, e);

        container.version().require(FormatVersion::Dm3).map_err(wrap)?;
        let root = container.read_directory().map_err(wrap)?;
        let image_data = image_data_dir(&root, main_image_index(&root).map_err(wrap)?).map_err(wrap)?;
        let (width, height) = read_dimensions(&mut container, image_data).map_err(wrap)?;

        let tag = data_tag(image_data).map_err(wrap)?;
        let samples = container
            .read_tag_data(tag)
            .and_then(|value| value.into_samples(&tag.path))
            .map_err(wrap)?;
        container.close();

        debug!("{}: {}x{} {} samples", path.display(), width, height, samples.data_type());
        let native = native_array(path, (height, width, 1), samples)?;
        Ok(native.rescale(dtype).swap_xy())
    }

    pub(crate) fn read_dimensions_from<R: SeekableReader>(
        &self,
        mut container: ContainerReader<R>,
        path: &Path,
    ) -> SliceResult<Dimensions> {
        let wrap = |e: DmError| SliceError::from_container(path, e);

        container.version().require(FormatVersion::Dm3).map_err(wrap)?;
        let root = container.read_directory().map_err(wrap)?;
        let image_data = image_data_dir(&root, main_image_index(&root).map_err(wrap)?).map_err(wrap)?;
        let dimensions = read_dimensions(&mut container, image_data).map_err(wrap)?;

        Ok(Dimensions::from(dimensions))
    }
}

impl SliceReader for Dm3Reader {
    fn name(&self) -> &'static str {
        "DM3"
    }

    fn read_array(&self, path: &Path, dtype: Datatype) -> SliceResult<PixelArray> {
        info!("Reading DM3 slice as {}: {}", dtype, path.display());
        let container = self.open(path)?;
        self.read_array_from(container, path, dtype)
    }

    fn read_dimensions(&self, path: &Path) -> SliceResult<Dimensions> {
        let container = self.open(path)?;
        self.read_dimensions_from(container, path)
    }
}
