//! Scene synthesis
//!
//! Turns a [`PoseSample`](crate::pose::PoseSample) into a complete,
//! self-contained [`SceneDescription`]. The scene is rebuilt from scratch for
//! every sample, static geometry included.

mod placement;
mod description;
mod builder;
pub mod palette;

pub use placement::{placement, rotate, sun_placement, translate, AffinePlacement, SUN_OFFSET};
pub use description::{ObjectInstance, SceneDescription};
pub use builder::{SceneAssets, SceneBuilder, SceneError};
