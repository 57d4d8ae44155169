//! Pose messages exchanged with the telemetry producer
//!
//! The wire format is a JSON object with a vector-first, scalar-last
//! quaternion (`sat_pose`) and a position (`sat_position`). This module owns
//! both directions: [`decode`] for the render node and [`encode`] /
//! [`write_message`] for producers.

mod sample;
mod decoder;
mod encoder;
mod policy;

pub use sample::PoseSample;
pub use decoder::{decode, DecodeError, POSE_KEY, POSITION_KEY};
pub use encoder::{encode, write_message, EncodeError};
pub use policy::{QuaternionPolicy, PoseError};
