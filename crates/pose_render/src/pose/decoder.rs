//! Pose message decoder
//!
//! Validates the exact schema before anything fixed-size is populated:
//! arrays with the wrong number of elements are rejected, never truncated.

use serde_json::Value;
use thiserror::Error;

use super::PoseSample;

/// JSON key holding the quaternion `[qx, qy, qz, qw]`
pub const POSE_KEY: &str = "sat_pose";

/// JSON key holding the position `[x, y, z]`
pub const POSITION_KEY: &str = "sat_position";

/// Reasons a payload fails to decode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload is not valid JSON or does not have the expected shape
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A required key is absent
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// An array has the wrong number of elements
    #[error("Arity mismatch for {field}: expected {expected} elements, found {found}")]
    ArityMismatch {
        /// Offending key
        field: &'static str,
        /// Required element count
        expected: usize,
        /// Element count in the payload
        found: usize,
    },
}

/// Decode a message payload into a pose sample
///
/// Never panics: every byte sequence maps to either a sample or a
/// [`DecodeError`]. The quaternion is passed through untouched.
pub fn decode(bytes: &[u8]) -> Result<PoseSample, DecodeError> {
    let root: Value = serde_json::from_slice(bytes)
        .map_err(|e| DecodeError::MalformedPayload(e.to_string()))?;

    let object = root
        .as_object()
        .ok_or_else(|| DecodeError::MalformedPayload("top-level value is not an object".to_string()))?;

    let pose = object.get(POSE_KEY).ok_or(DecodeError::MissingField(POSE_KEY))?;
    let position = object.get(POSITION_KEY).ok_or(DecodeError::MissingField(POSITION_KEY))?;

    let pose: [f64; 4] = numbers(POSE_KEY, pose)?;
    let position: [f64; 3] = numbers(POSITION_KEY, position)?;

    Ok(PoseSample::from_wire(pose, position))
}

fn numbers<const N: usize>(field: &'static str, value: &Value) -> Result<[f64; N], DecodeError> {
    let items = value
        .as_array()
        .ok_or_else(|| DecodeError::MalformedPayload(format!("{field} is not an array")))?;

    if items.len() != N {
        return Err(DecodeError::ArityMismatch {
            field,
            expected: N,
            found: items.len(),
        });
    }

    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item
            .as_f64()
            .ok_or_else(|| DecodeError::MalformedPayload(format!("{field} contains a non-numeric element: {item}")))?;
    }
    Ok(out)
}
