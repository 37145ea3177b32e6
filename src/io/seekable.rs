//! Seekable reader trait
//!
//! Container parsing jumps between directory structures and tag payloads,
//! so every source handed to the parser must support both reading and
//! seeking.

use std::io::{Read, Seek};

/// A byte source the container parser can read from and seek within
///
/// Implemented for any `Read + Seek` that can be shared across threads,
/// which covers `BufReader<File>` as well as in-memory `Cursor`s.
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
