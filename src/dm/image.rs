//! Navigation to the image stored in a container
//!
//! Microscope documents keep their slices under
//! `ImageList.<n>.ImageData`, with the pixel payload in `Data` and the
//! extent in the two unnamed tags of `Dimensions` (width, then height).

use log::{debug, warn};

use crate::dm::constants::paths;
use crate::dm::directory::{TagData, TagDirectory};
use crate::dm::errors::{DmError, DmResult};
use crate::dm::reader::ContainerReader;
use crate::io::seekable::SeekableReader;

/// `ImageList` position of the slice when a thumbnail precedes it
pub const SLICE_INDEX: usize = 1;

/// Returns `ImageList.<index>.ImageData`
pub fn image_data_dir(root: &TagDirectory, index: usize) -> DmResult<&TagDirectory> {
    root.named_subdir(paths::IMAGE_LIST)?
        .unnamed_subdir(index)?
        .named_subdir(paths::IMAGE_DATA)
}

/// Picks the `ImageList` entry holding the main slice
///
/// Entry 0 is normally the thumbnail. A document with a single entry has no
/// thumbnail, so that entry is the slice.
pub fn main_image_index(root: &TagDirectory) -> DmResult<usize> {
    let image_list = root.named_subdir(paths::IMAGE_LIST)?;
    if image_list.unnamed_subdir_count() > SLICE_INDEX {
        Ok(SLICE_INDEX)
    } else {
        warn!("{} has a single entry, reading it as the slice", image_list.path);
        Ok(0)
    }
}

/// The `Data` tag holding the pixel payload
pub fn data_tag(image_data: &TagDirectory) -> DmResult<&TagData> {
    image_data.named_tag(paths::DATA)
}

/// Reads `(width, height)` from the `Dimensions` tags of `image_data`
pub fn read_dimensions<R: SeekableReader>(
    container: &mut ContainerReader<R>,
    image_data: &TagDirectory,
) -> DmResult<(usize, usize)> {
    let dimensions = image_data.named_subdir(paths::DIMENSIONS)?;
    let width_tag = dimensions.unnamed_tag(0)?;
    let height_tag = dimensions.unnamed_tag(1)?;

    let width = container.read_tag_data(width_tag)?.expect_u64(&width_tag.path)?;
    let height = container.read_tag_data(height_tag)?.expect_u64(&height_tag.path)?;
    debug!("{}: {}x{}", dimensions.path, width, height);

    Ok((to_extent(width, &width_tag.path)?, to_extent(height, &height_tag.path)?))
}

fn to_extent(value: u64, path: &str) -> DmResult<usize> {
    usize::try_from(value).map_err(|_| DmError::UnexpectedValue {
        path: path.to_string(),
        expected: "extent addressable on this platform",
        found: value.to_string(),
    })
}
