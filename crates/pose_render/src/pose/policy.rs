//! Unit-length handling for incoming quaternions
//!
//! The producer is trusted to send unit quaternions but nothing on the wire
//! guarantees it. Which behaviour applies is a configuration decision.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::PoseSample;

/// What to do with a quaternion that is not unit length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuaternionPolicy {
    /// Use the components exactly as supplied
    AsIs,
    /// Rescale to unit length
    #[default]
    Normalize,
    /// Refuse samples whose norm is further than the tolerance from 1
    Reject,
}

/// Pose validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoseError {
    /// Norm too far from 1 under [`QuaternionPolicy::Reject`]
    #[error("Quaternion norm {norm} outside tolerance {tolerance}")]
    NonUnit {
        /// Observed norm
        norm: f64,
        /// Allowed deviation from 1
        tolerance: f64,
    },

    /// Zero or non-finite quaternion, no rotation can be derived
    #[error("Degenerate quaternion (norm {0})")]
    Degenerate(f64),
}

impl QuaternionPolicy {
    /// Apply the policy, returning the sample to build the scene from
    pub fn apply(self, sample: PoseSample, tolerance: f64) -> Result<PoseSample, PoseError> {
        let norm = sample.orientation.norm();

        match self {
            Self::AsIs => Ok(sample),
            _ if !norm.is_finite() || norm <= f64::EPSILON => Err(PoseError::Degenerate(norm)),
            Self::Normalize => {
                if (norm - 1.0).abs() > tolerance {
                    log::debug!("Normalizing quaternion with norm {norm}");
                }
                Ok(PoseSample::new(sample.orientation / norm, sample.position))
            }
            Self::Reject => {
                if (norm - 1.0).abs() > tolerance {
                    Err(PoseError::NonUnit { norm, tolerance })
                } else {
                    Ok(sample)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scaled() -> PoseSample {
        PoseSample::from_wire([0.0, 0.0, 0.0, 2.0], [1.0, 2.0, 3.0])
    }

    #[test]
    fn test_as_is_passes_through() {
        assert_eq!(QuaternionPolicy::AsIs.apply(scaled(), 1e-3).unwrap(), scaled());
    }

    #[test]
    fn test_normalize_rescales() {
        let sample = QuaternionPolicy::Normalize.apply(scaled(), 1e-3).unwrap();
        assert_relative_eq!(sample.orientation.norm(), 1.0, epsilon = 1e-12);
        assert_eq!(sample.position, scaled().position);
    }

    #[test]
    fn test_reject_outside_tolerance() {
        let err = QuaternionPolicy::Reject.apply(scaled(), 1e-3).unwrap_err();
        assert!(matches!(err, PoseError::NonUnit { .. }));

        let near_unit = PoseSample::from_wire([0.0, 0.0, 0.0, 1.0005], [0.0; 3]);
        assert!(QuaternionPolicy::Reject.apply(near_unit, 1e-3).is_ok());
    }

    #[test]
    fn test_zero_quaternion_is_degenerate() {
        let zero = PoseSample::from_wire([0.0; 4], [0.0; 3]);
        assert!(matches!(
            QuaternionPolicy::Normalize.apply(zero, 1e-3),
            Err(PoseError::Degenerate(_))
        ));
        assert!(matches!(
            QuaternionPolicy::Reject.apply(zero, 1e-3),
            Err(PoseError::Degenerate(_))
        ));
    }
}
