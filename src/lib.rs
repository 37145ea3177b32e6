//! Uniform slice reading for microscopy images
//!
//! Reads single slices from TIFF, PNG and JPEG files and from
//! DigitalMicrograph DM3/DM4 containers into 3-D arrays of unsigned
//! samples, dispatching on the file extension.

pub mod config;
pub mod dm;
pub mod errors;
pub mod io;
pub mod pixels;
pub mod readers;

pub use config::{ParseLimits, ReaderOptions};
pub use errors::{SliceError, SliceResult};
pub use pixels::{Datatype, Dimensions, PixelArray};
pub use readers::{read_array, read_dimensions, ImageReader, ImageReaderBuilder, SliceReader};
