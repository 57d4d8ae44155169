//! Producer-side message encoding
//!
//! Producers should go through [`write_message`]: it writes a sibling temp
//! file and renames it over the target, so the render node never observes a
//! half-written payload.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use super::PoseSample;

#[derive(Serialize)]
struct PoseMessage {
    sat_pose: [f64; 4],
    sat_position: [f64; 3],
}

/// Message encoding / writing errors
#[derive(Error, Debug)]
pub enum EncodeError {
    /// Serialisation failed (non-finite component)
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// IO error while writing the message
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Component that JSON cannot carry
    #[error("Pose contains a non-finite component")]
    NonFinite,
}

/// Encode a sample as the JSON message payload
pub fn encode(sample: &PoseSample) -> Result<Vec<u8>, EncodeError> {
    let message = PoseMessage {
        sat_pose: sample.pose_wire(),
        sat_position: sample.position_wire(),
    };
    if message.sat_pose.iter().chain(&message.sat_position).any(|v| !v.is_finite()) {
        return Err(EncodeError::NonFinite);
    }
    Ok(serde_json::to_vec_pretty(&message)?)
}

/// Atomically replace the message file at `path` with `sample`
pub fn write_message(path: impl AsRef<Path>, sample: &PoseSample) -> Result<(), EncodeError> {
    let path = path.as_ref();
    let payload = encode(sample)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(&payload)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| EncodeError::Io(e.error))?;

    log::debug!("Wrote pose message to {} ({} bytes)", path.display(), payload.len());
    Ok(())
}
