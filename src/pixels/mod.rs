pub mod array;
pub mod datatype;
pub mod rescale;


pub use array::{Dimensions, PixelArray};
pub use datatype::{Datatype, Sample};
pub use rescale::{rescale, rescale_value, scale_factor};
