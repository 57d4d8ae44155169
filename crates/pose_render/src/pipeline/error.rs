//! Pipeline error taxonomy
//!
//! [`CycleError`] abandons one cycle and sends the controller back to
//! waiting. [`PipelineError`] is the only kind that ends the loop.

use thiserror::Error;

use crate::pose::{DecodeError, PoseError};
use crate::publish::PublishError;
use crate::render::RenderError;
use crate::scene::SceneError;
use crate::watch::{ReadError, WatchError};

/// Non-fatal, per-cycle failures
#[derive(Error, Debug)]
pub enum CycleError {
    /// Message file shorter than the minimum payload, assumed mid-write
    #[error("Message not ready ({size} bytes < {min})")]
    NotReady {
        /// Observed size
        size: u64,
        /// Required size
        min: u64,
    },

    /// Message file disappeared
    #[error("Message file removed")]
    Removed,

    /// Message file could not be read
    #[error("Cannot read message: {0}")]
    Read(#[source] std::io::Error),

    /// Payload failed to decode
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Decoded pose rejected by the quaternion policy
    #[error(transparent)]
    Pose(#[from] PoseError),

    /// Static geometry failed to load
    #[error(transparent)]
    AssetLoad(#[from] SceneError),

    /// Engine produced no image
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Output could not be written
    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl From<ReadError> for CycleError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::NotReady { size, min } => Self::NotReady { size, min },
            ReadError::Io(e) => Self::Read(e),
        }
    }
}

/// Fatal failures that stop the controller
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Change notifications unavailable
    #[error("Watcher failure: {0}")]
    Watcher(#[from] WatchError),

    /// Static geometry unusable at startup, so every cycle would fail
    #[error("Startup asset check failed: {0}")]
    Preflight(#[source] SceneError),
}
