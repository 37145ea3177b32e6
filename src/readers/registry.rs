//! Extension-based reader dispatch
//!
//! Extensions are matched exactly as written: `slice.png` is a raster file,
//! `slice.PNG` is unsupported.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use lazy_static::lazy_static;
use log::debug;

use crate::config::{ParseLimits, ReaderOptions};
use crate::errors::{SliceError, SliceResult};
use crate::pixels::{Datatype, Dimensions, PixelArray};
use crate::readers::{Dm3Reader, Dm4Reader, RasterReader, SliceReader};

/// Family of files handled by one reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Raster,
    Dm3,
    Dm4,
}

impl FormatKind {
    pub const fn name(&self) -> &'static str {
        match self {
            FormatKind::Raster => "raster",
            FormatKind::Dm3 => "DM3",
            FormatKind::Dm4 => "DM4",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registered extensions, without the leading dot
pub const EXTENSIONS: [(&str, FormatKind); 7] = [
    ("tif", FormatKind::Raster),
    ("tiff", FormatKind::Raster),
    ("jpg", FormatKind::Raster),
    ("jpeg", FormatKind::Raster),
    ("png", FormatKind::Raster),
    ("dm3", FormatKind::Dm3),
    ("dm4", FormatKind::Dm4),
];

/// The text after the last dot of the file name, if any
pub fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(OsStr::to_str)
}

/// Looks up the format registered for `extension`
pub fn format_for(extension: &str) -> Option<FormatKind> {
    EXTENSIONS
        .iter()
        .find(|(registered, _)| *registered == extension)
        .map(|(_, kind)| *kind)
}

/// Dispatches reads to the reader registered for each extension
pub struct ImageReader {
    options: ReaderOptions,
    readers: HashMap<FormatKind, Arc<dyn SliceReader>>,
}

impl ImageReader {
    pub fn new(options: ReaderOptions) -> Self {
        let mut readers: HashMap<FormatKind, Arc<dyn SliceReader>> = HashMap::new();
        readers.insert(FormatKind::Raster, Arc::new(RasterReader::new()));
        readers.insert(FormatKind::Dm3, Arc::new(Dm3Reader::new(options)));
        readers.insert(FormatKind::Dm4, Arc::new(Dm4Reader::new(options)));

        ImageReader { options, readers }
    }

    pub fn builder() -> ImageReaderBuilder {
        ImageReaderBuilder::new()
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Registered extensions in sorted order
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        let mut extensions: Vec<&'static str> = EXTENSIONS
            .iter()
            .filter(|(_, kind)| self.readers.contains_key(kind))
            .map(|(extension, _)| *extension)
            .collect();
        extensions.sort_unstable();
        extensions
    }

    /// The reader registered for the extension of `path`
    pub fn reader_for(&self, path: &Path) -> SliceResult<&dyn SliceReader> {
        let extension = extension_of(path).unwrap_or("");
        match format_for(extension).and_then(|kind| self.readers.get(&kind)) {
            Some(reader) => {
                debug!("Dispatching {} to the {} reader", path.display(), reader.name());
                Ok(reader.as_ref())
            }
            None => Err(SliceError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: extension.to_string(),
            }),
        }
    }

    /// Reads the slice at `path` as `dtype` samples
    pub fn read_array<P: AsRef<Path>>(&self, path: P, dtype: Datatype) -> SliceResult<PixelArray> {
        let path = path.as_ref();
        self.reader_for(path)?.read_array(path, dtype)
    }

    /// Reads the width and height of the slice at `path`
    pub fn read_dimensions<P: AsRef<Path>>(&self, path: P) -> SliceResult<Dimensions> {
        let path = path.as_ref();
        self.reader_for(path)?.read_dimensions(path)
    }
}

impl Default for ImageReader {
    fn default() -> Self {
        ImageReader::new(ReaderOptions::default())
    }
}

impl fmt::Debug for ImageReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageReader")
            .field("options", &self.options)
            .field("extensions", &self.supported_extensions())
            .finish()
    }
}

/// Builder for ImageReader
#[derive(Debug, Default, Clone)]
pub struct ImageReaderBuilder {
    options: ReaderOptions,
}

impl ImageReaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit trace records on entry and exit of DM4 reads
    pub fn trace_reads(mut self, enabled: bool) -> Self {
        self.options.trace_reads = enabled;
        self
    }

    pub fn limits(mut self, limits: ParseLimits) -> Self {
        self.options.limits = limits;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.limits.max_depth = depth;
        self
    }

    pub fn max_entries_per_directory(mut self, entries: u64) -> Self {
        self.options.limits.max_entries_per_directory = entries;
        self
    }

    pub fn build(self) -> ImageReader {
        ImageReader::new(self.options)
    }
}

lazy_static! {
    static ref IMAGE_READER: ImageReader = ImageReader::default();
}

/// Reads the slice at `path` with the default reader
pub fn read_array<P: AsRef<Path>>(path: P, dtype: Datatype) -> SliceResult<PixelArray> {
    IMAGE_READER.read_array(path, dtype)
}

/// Reads the slice dimensions at `path` with the default reader
pub fn read_dimensions<P: AsRef<Path>>(path: P) -> SliceResult<Dimensions> {
    IMAGE_READER.read_dimensions(path)
}
