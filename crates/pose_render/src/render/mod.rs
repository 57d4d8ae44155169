//! Rendering
//!
//! The engine is a black box behind [`RenderEngine`]: given a fully
//! specified [`SceneDescription`](crate::scene::SceneDescription) it returns a
//! [`RasterImage`]. [`invoke`] is the single call site the pipeline uses.

pub mod mesh;
pub mod material;
pub mod camera;
pub mod lighting;
pub mod frame;
pub mod raster;
mod engine;
mod software;

pub use mesh::{Mesh, Vertex};
pub use material::{Bsdf, ColorEntity, ColorSpace, Edf, Material, Mdf};
pub use camera::PinholeCamera;
pub use lighting::{Environment, SunLight};
pub use frame::{FrameSettings, QualitySettings};
pub use raster::RasterImage;
pub use engine::{invoke, RenderEngine, RenderError};
pub use software::SoftwareRenderer;
