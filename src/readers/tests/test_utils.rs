use std::io::{Cursor, Read, Result, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::ParseLimits;
use crate::dm::{ContainerBuilder, ContainerReader, FormatVersion, SampleBuffer};

pub const WIDTH: usize = 4;
pub const HEIGHT: usize = 3;

/// Value of the synthetic 16-bit slice at (x, y)
pub fn sample_at(x: usize, y: usize) -> u16 {
    ((y * WIDTH + x) * 1000 + 7) as u16
}

pub fn samples_u16() -> Vec<u16> {
    (0..HEIGHT)
        .flat_map(|y| (0..WIDTH).map(move |x| sample_at(x, y)))
        .collect()
}

/// Writes a WIDTH x HEIGHT 16-bit image document to `dir/name`
pub fn write_document(dir: &Path, name: &str, version: FormatVersion) -> PathBuf {
    let path = dir.join(name);
    ContainerBuilder::image_document(version, WIDTH as u32, HEIGHT as u32, SampleBuffer::U16(samples_u16()))
        .unwrap()
        .write_file(&path)
        .unwrap();
    path
}

/// In-memory source that counts how often it is dropped
pub struct TrackedSource {
    inner: Cursor<Vec<u8>>,
    drops: Arc<AtomicUsize>,
}

impl TrackedSource {
    pub fn new(bytes: Vec<u8>) -> (Self, Arc<AtomicUsize>) {
        let drops = Arc::new(AtomicUsize::new(0));
        let source = TrackedSource {
            inner: Cursor::new(bytes),
            drops: Arc::clone(&drops),
        };
        (source, drops)
    }
}

impl Read for TrackedSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for TrackedSource {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.inner.seek(pos)
    }
}

impl Drop for TrackedSource {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Opens `builder`'s bytes through a tracked source
pub fn tracked_container(builder: &ContainerBuilder) -> (ContainerReader<TrackedSource>, Arc<AtomicUsize>) {
    let (source, drops) = TrackedSource::new(builder.to_bytes().unwrap());
    let container = ContainerReader::from_reader(source, ParseLimits::default()).unwrap();
    (container, drops)
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
