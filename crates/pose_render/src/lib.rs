//! # Pose Render
//!
//! Bridges a pose telemetry producer and an offline renderer through two
//! files: a producer writes a pose message, this crate notices, rebuilds a
//! scene positioned by that pose, renders it and publishes the image for a
//! separate distribution process.
//!
//! ## Components
//!
//! - **Transform engine** ([`scene::placement`]): pose → affine placement
//! - **Decoder** ([`pose::decode`]): message bytes → [`pose::PoseSample`]
//! - **Scene builder** ([`scene::SceneBuilder`]): pose → [`scene::SceneDescription`]
//! - **Watcher** ([`watch::WatchSource`]): blocks until the message file changes
//! - **Render invoker** ([`render::invoke`]): scene → [`render::RasterImage`]
//! - **Publisher** ([`publish::ImageSink`]): image → output file
//! - **Controller** ([`pipeline::PipelineController`]): the loop tying them together
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pose_render::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NodeConfig::default();
//!     let mut pipeline = node_pipeline(&config)?;
//!     pipeline.preflight()?;
//!     pipeline.run()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod foundation;
pub mod config;
pub mod pose;
pub mod assets;
pub mod render;
pub mod scene;
pub mod watch;
pub mod publish;
pub mod pipeline;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        core::config::{Config, NodeConfig, WatcherBackend},
        foundation::cancel::StopToken,
        pipeline::{node_pipeline, CycleOutcome, PipelineController, PipelineError, PipelineState, RunSummary},
        pose::{decode, write_message, PoseSample, QuaternionPolicy},
        publish::{ImageSink, PngPublisher},
        render::{RasterImage, RenderEngine, SoftwareRenderer},
        scene::{placement, SceneBuilder, SceneDescription},
        watch::{ChangeEvent, ChangeKind, WatchSource},
    };
}
