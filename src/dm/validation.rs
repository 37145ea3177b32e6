//! Container validation utilities
//!
//! Checks applied while walking the tag tree so a corrupt or hostile file
//! fails cleanly instead of driving huge allocations or deep recursion.

use log::warn;
use std::io::SeekFrom;

use crate::config::ParseLimits;
use crate::dm::constants::MAX_INFO_WORDS;
use crate::dm::errors::{DmError, DmResult};
use crate::io::seekable::SeekableReader;

/// Gets the size of the underlying source, restoring the current position
///
/// Returns `u64::MAX` when the source cannot report its end.
pub fn get_file_size(reader: &mut dyn SeekableReader) -> DmResult<u64> {
    let current_position = reader.stream_position()?;
    let file_size = match reader.seek(SeekFrom::End(0)) {
        Ok(size) => size,
        Err(e) => {
            warn!("Could not determine container size: {}", e);
            u64::MAX
        }
    };
    reader.seek(SeekFrom::Start(current_position))?;

    Ok(file_size)
}

/// Rejects directories nested deeper than the configured limit
pub fn validate_depth(depth: usize, limits: &ParseLimits, path: &str) -> DmResult<()> {
    if depth > limits.max_depth {
        return Err(DmError::LimitExceeded(format!(
            "{} is nested {} levels deep (limit {})",
            path, depth, limits.max_depth
        )));
    }
    Ok(())
}

/// Rejects directories declaring more entries than the configured limit
pub fn validate_entry_count(count: u64, limits: &ParseLimits, path: &str) -> DmResult<()> {
    if count > limits.max_entries_per_directory {
        return Err(DmError::LimitExceeded(format!(
            "{} declares {} entries (limit {})",
            path, count, limits.max_entries_per_directory
        )));
    }
    Ok(())
}

/// Rejects data tags with an implausible number of info words
pub fn validate_info_count(count: u64, path: &str) -> DmResult<()> {
    if count == 0 || count > MAX_INFO_WORDS {
        return Err(DmError::LimitExceeded(format!(
            "{} declares {} encoding info words (allowed 1..={})",
            path, count, MAX_INFO_WORDS
        )));
    }
    Ok(())
}

/// Ensures a payload of `size` bytes at `offset` lies inside the file
///
/// Returns the offset one past the payload.
pub fn validate_payload_bounds(offset: u64, size: Option<u64>, file_size: u64, path: &str) -> DmResult<u64> {
    let end = size.and_then(|size| offset.checked_add(size)).ok_or_else(|| {
        DmError::LimitExceeded(format!("payload size of {} overflows", path))
    })?;

    if end > file_size {
        return Err(DmError::PayloadOutOfBounds {
            path: path.to_string(),
            end,
            file_size,
        });
    }

    Ok(end)
}
