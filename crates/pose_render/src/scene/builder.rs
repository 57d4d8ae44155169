//! Scene builder: pose → scene description

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::assets::{ObjError, ObjLoader};
use crate::core::config::AssetConfig;
use crate::pose::PoseSample;

use super::description::{ObjectInstance, SceneDescription};
use super::palette;
use super::placement::{placement, sun_placement};

/// Scene construction errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// Static geometry could not be loaded
    #[error("Failed to load asset {path}: {source}")]
    AssetLoad {
        /// File that failed
        path: PathBuf,
        /// Underlying loader error
        #[source]
        source: ObjError,
    },
}

/// Locations of the static geometry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneAssets {
    /// Sun mesh file
    pub sun_mesh: PathBuf,
    /// Dynamic object mesh file
    pub object_mesh: PathBuf,
}

impl SceneAssets {
    /// Create from explicit paths
    pub fn new(sun_mesh: impl Into<PathBuf>, object_mesh: impl Into<PathBuf>) -> Self {
        Self {
            sun_mesh: sun_mesh.into(),
            object_mesh: object_mesh.into(),
        }
    }
}

impl From<&AssetConfig> for SceneAssets {
    fn from(config: &AssetConfig) -> Self {
        Self::new(config.sun_mesh_path(), config.object_mesh_path())
    }
}

/// Builds a fresh scene for every pose sample
///
/// Geometry is re-read from disk on every call.
// TODO: split into a one-time static build plus a per-cycle placement update
// once asset reload shows up in cycle timings.
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    assets: SceneAssets,
}

impl SceneBuilder {
    /// Create a builder reading geometry from `assets`
    pub const fn new(assets: SceneAssets) -> Self {
        Self { assets }
    }

    /// Build the scene positioned by `pose`
    pub fn build(&self, pose: &PoseSample) -> Result<SceneDescription, SceneError> {
        let sun_mesh = load(palette::SUN_OBJECT, &self.assets.sun_mesh)?;
        let object_mesh = load(palette::DYNAMIC_OBJECT, &self.assets.object_mesh)?;

        let instances = vec![
            ObjectInstance {
                name: palette::SUN_INSTANCE.to_string(),
                mesh: sun_mesh,
                placement: sun_placement(),
                material: palette::SUN_MATERIAL.to_string(),
            },
            ObjectInstance {
                name: palette::DYNAMIC_INSTANCE.to_string(),
                mesh: object_mesh,
                placement: placement(pose),
                material: palette::OBJECT_MATERIAL.to_string(),
            },
        ];

        log::trace!(
            "Built scene with {} triangles for position {:?}",
            instances.iter().map(|i| i.mesh.triangle_count()).sum::<usize>(),
            pose.position_wire()
        );

        Ok(SceneDescription {
            colors: palette::colors(),
            bsdfs: palette::bsdfs(),
            edfs: palette::edfs(),
            surface_shaders: vec![palette::SURFACE_SHADER.to_string()],
            materials: palette::materials(),
            instances,
            light: palette::sun_light(),
            environment: palette::environment(),
            camera: palette::camera(),
            frame: palette::frame(),
            quality: palette::quality(),
        })
    }
}

fn load(name: &str, path: &Path) -> Result<crate::render::Mesh, SceneError> {
    ObjLoader::load_obj(name, path).map_err(|source| SceneError::AssetLoad {
        path: path.to_path_buf(),
        source,
    })
}
