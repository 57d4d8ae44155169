//! Self-contained scene snapshot handed to a render engine

use crate::render::{
    Bsdf, ColorEntity, Edf, Environment, FrameSettings, Material, Mesh, PinholeCamera,
    QualitySettings, SunLight,
};

use super::AffinePlacement;

/// Placed mesh with a material binding
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInstance {
    /// Instance name
    pub name: String,
    /// Geometry, owned by this snapshot
    pub mesh: Mesh,
    /// Local-to-world placement
    pub placement: AffinePlacement,
    /// Name of the bound material
    pub material: String,
}

/// Everything a render engine needs to produce one image
///
/// Built in one go by [`SceneBuilder`](super::SceneBuilder) and only ever
/// read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    /// Named colors
    pub colors: Vec<ColorEntity>,
    /// Reflectance models
    pub bsdfs: Vec<Bsdf>,
    /// Emission models
    pub edfs: Vec<Edf>,
    /// Surface shader names
    pub surface_shaders: Vec<String>,
    /// Materials
    pub materials: Vec<Material>,
    /// Placed objects
    pub instances: Vec<ObjectInstance>,
    /// Sun light
    pub light: SunLight,
    /// Background environment
    pub environment: Environment,
    /// Camera
    pub camera: PinholeCamera,
    /// Output frame
    pub frame: FrameSettings,
    /// Quality configuration
    pub quality: QualitySettings,
}

impl SceneDescription {
    /// Look up a color by name
    pub fn color(&self, name: &str) -> Option<&ColorEntity> {
        self.colors.iter().find(|c| c.name == name)
    }

    /// Look up a BSDF by name
    pub fn bsdf(&self, name: &str) -> Option<&Bsdf> {
        self.bsdfs.iter().find(|b| b.name() == name)
    }

    /// Look up an EDF by name
    pub fn edf(&self, name: &str) -> Option<&Edf> {
        self.edfs.iter().find(|e| e.name == name)
    }

    /// Look up a material by name
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Look up an object instance by name
    pub fn instance(&self, name: &str) -> Option<&ObjectInstance> {
        self.instances.iter().find(|i| i.name == name)
    }
}
