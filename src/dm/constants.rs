//! DigitalMicrograph container constants
//!
//! Magic numbers of the DM3/DM4 tag-tree layout, grouped the same way the
//! parser consumes them.

/// Container header constants
pub mod header {
    /// Version word of a DM3 container
    pub const DM3_VERSION: u32 = 3;

    /// Version word of a DM4 container
    pub const DM4_VERSION: u32 = 4;

    /// Header flag for big-endian tag payloads
    pub const BIG_ENDIAN_FLAG: u32 = 0;

    /// Header flag for little-endian tag payloads
    pub const LITTLE_ENDIAN_FLAG: u32 = 1;

    /// Header size of a DM3 container (version, root length, byte order)
    pub const DM3_HEADER_SIZE: u64 = 12;

    /// Header size of a DM4 container (root length widened to 64 bits)
    pub const DM4_HEADER_SIZE: u64 = 16;

    /// Zero padding that closes every container
    pub const TRAILER_SIZE: usize = 8;
}

/// Entry kind markers
pub mod tag_kinds {
    pub const DIRECTORY: u8 = 20;
    pub const DATA: u8 = 21;
}

/// Marker that opens the body of every data tag
pub const TAG_DELIMITER: [u8; 4] = *b"%%%%";

/// Upper bound on encoding info words for a single data tag
pub const MAX_INFO_WORDS: u64 = 4096;

/// Encoding codes found in the first info word of a data tag
pub mod encodings {
    pub const I16: u64 = 2;
    pub const I32: u64 = 3;
    pub const U16: u64 = 4;
    pub const U32: u64 = 5;
    pub const F32: u64 = 6;
    pub const F64: u64 = 7;
    pub const BOOL: u64 = 8;
    pub const I8: u64 = 9;
    pub const U8: u64 = 10;
    pub const I64: u64 = 11;
    pub const U64: u64 = 12;
    pub const STRUCT: u64 = 15;
    pub const STRING: u64 = 18;
    pub const ARRAY: u64 = 20;
}

/// Names along the path to the pixel payload
pub mod paths {
    pub const ROOT: &str = "root";
    pub const IMAGE_LIST: &str = "ImageList";
    pub const IMAGE_DATA: &str = "ImageData";
    pub const DATA: &str = "Data";
    pub const DATA_TYPE: &str = "DataType";
    pub const DIMENSIONS: &str = "Dimensions";
    pub const NAME: &str = "Name";
}

/// Values of the `ImageData.DataType` tag
pub mod image_data_types {
    pub const SIGNED_INT16: u32 = 1;
    pub const REAL4: u32 = 2;
    pub const UNSIGNED_INT8: u32 = 6;
    pub const SIGNED_INT32: u32 = 7;
    pub const SIGNED_INT8: u32 = 9;
    pub const UNSIGNED_INT16: u32 = 10;
    pub const UNSIGNED_INT32: u32 = 11;
    pub const REAL8: u32 = 12;
    pub const BINARY: u32 = 14;
}
