//! Partial-write filter
//!
//! Best-effort only: a payload below the threshold is assumed to be caught
//! mid-write. Nothing guarantees a payload above it is complete; producers
//! should publish by rename (see [`crate::pose::write_message`]).

use std::path::Path;

use thiserror::Error;

/// Reasons a message file is not handed to the decoder
#[derive(Error, Debug)]
pub enum ReadError {
    /// File shorter than the minimum viable payload
    #[error("Message not ready: {size} bytes, need at least {min}")]
    NotReady {
        /// Observed size
        size: u64,
        /// Required size
        min: u64,
    },

    /// File could not be read (missing, permissions)
    #[error("IO error reading message: {0}")]
    Io(#[from] std::io::Error),
}

/// Read the whole message file if it is at least `min_bytes` long
///
/// Reads once and checks the length of what was read, so the size check and
/// the decoded bytes always agree.
pub fn read_ready(path: &Path, min_bytes: u64) -> Result<Vec<u8>, ReadError> {
    let bytes = std::fs::read(path)?;
    let size = bytes.len() as u64;
    if size < min_bytes {
        log::debug!("{}: {size} bytes, treating as partial write", path.display());
        return Err(ReadError::NotReady { size, min: min_bytes });
    }
    Ok(bytes)
}
