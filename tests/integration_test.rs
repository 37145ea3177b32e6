//! Integration tests for slice reading through the public API

extern crate std;

use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};
use slicereader::dm::{ContainerBuilder, FormatVersion, SampleBuffer};
use slicereader::{read_array, read_dimensions, Datatype, Dimensions, ImageReader, PixelArray, SliceError};

const WIDTH: u32 = 4;
const HEIGHT: u32 = 3;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn pixel(x: u32, y: u32) -> u8 {
    (x * 16 + y * 64 + 1) as u8
}

fn deep_pixel(x: u32, y: u32) -> u16 {
    (x * 4000 + y * 16000 + 300) as u16
}

fn write_png(dir: &Path) -> PathBuf {
    let path = dir.join("slice.png");
    GrayImage::from_fn(WIDTH, HEIGHT, |x, y| Luma([pixel(x, y)])).save(&path).unwrap();
    path
}

fn write_dm(dir: &Path, version: FormatVersion) -> PathBuf {
    let name = match version {
        FormatVersion::Dm3 => "slice.dm3",
        FormatVersion::Dm4 => "slice.dm4",
    };
    let samples: Vec<u16> = (0..HEIGHT)
        .flat_map(|y| (0..WIDTH).map(move |x| deep_pixel(x, y)))
        .collect();

    let path = dir.join(name);
    ContainerBuilder::image_document(version, WIDTH, HEIGHT, SampleBuffer::U16(samples))
        .unwrap()
        .write_file(&path)
        .unwrap();
    path
}

#[test]
fn test_png_end_to_end() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path());

    let array = read_array(&path, Datatype::U8).unwrap();
    std::assert_eq!(array.shape(), [4, 3, 1]);

    let data = array.as_u8().unwrap();
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            std::assert_eq!(data[[x as usize, y as usize, 0]], pixel(x, y));
        }
    }
}

#[test]
fn test_dm3_sixteen_bit_read_as_eight_bit() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = write_dm(dir.path(), FormatVersion::Dm3);

    let array = read_array(&path, Datatype::U8).unwrap();
    std::assert_eq!(array.shape(), [4, 3, 1]);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let expected = (deep_pixel(x, y) / 256) as u64;
            std::assert_eq!(array.get([x as usize, y as usize, 0]), Some(expected));
        }
    }
}

#[test]
fn test_dm4_sixteen_bit_read_as_eight_bit() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = write_dm(dir.path(), FormatVersion::Dm4);

    let reader = ImageReader::builder().trace_reads(true).build();
    let array = reader.read_array(&path, Datatype::U8).unwrap();
    std::assert_eq!(array.shape(), [3, 4, 1]);

    match array {
        PixelArray::U8(data) => {
            std::assert_eq!(data[[0, 0, 0]], (deep_pixel(0, 0) / 256) as u8);
            std::assert_eq!(data[[2, 3, 0]], (deep_pixel(3, 2) / 256) as u8);
        }
        other => std::panic!("expected uint8 samples, got {}", other.datatype()),
    }
}

#[test]
fn test_dimensions_agree_with_arrays() {
    let dir = tempfile::tempdir().unwrap();
    let png = write_png(dir.path());
    let dm3 = write_dm(dir.path(), FormatVersion::Dm3);
    let dm4 = write_dm(dir.path(), FormatVersion::Dm4);
    let expected = Dimensions::new(WIDTH as usize, HEIGHT as usize);

    for dtype in [Datatype::U8, Datatype::U16, Datatype::U32] {
        for path in [&png, &dm3] {
            let shape = read_array(path, dtype).unwrap().shape();
            std::assert_eq!(read_dimensions(path).unwrap(), expected);
            std::assert_eq!(Dimensions::new(shape[0], shape[1]), expected);
        }

        // DM4 slices come back as (height, width, 1)
        let shape = read_array(&dm4, dtype).unwrap().shape();
        std::assert_eq!(read_dimensions(&dm4).unwrap(), expected);
        std::assert_eq!(Dimensions::new(shape[1], shape[0]), expected);
    }
}

#[test]
fn test_unsupported_extensions() {
    let dir = tempfile::tempdir().unwrap();
    let png = write_png(dir.path());
    let upper = dir.path().join("slice.PNG");
    std::fs::copy(&png, &upper).unwrap();

    for path in [upper, dir.path().join("slice.bmp")] {
        std::assert!(matches!(
            read_array(&path, Datatype::U8),
            Err(SliceError::UnsupportedFormat { .. })
        ));
        std::assert!(matches!(read_dimensions(&path), Err(SliceError::UnsupportedFormat { .. })));
    }
}

#[test]
fn test_error_messages_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.dm4");
    ContainerBuilder::new(FormatVersion::Dm4, slicereader::dm::ByteOrder::LittleEndian)
        .write_file(&path)
        .unwrap();

    let error = read_dimensions(&path).unwrap_err();
    std::assert!(matches!(error, SliceError::MalformedContainer { .. }));
    let message = error.to_string();
    std::assert!(message.contains("empty.dm4"));
    std::assert!(message.contains("root.ImageList"));
}
