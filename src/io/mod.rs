//! I/O utilities for container access
//!
//! This module provides the reader trait and byte order strategies used by
//! the DigitalMicrograph tag-tree parser.

pub mod seekable;
pub mod byte_order;
