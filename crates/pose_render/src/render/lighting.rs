//! Lighting system

use crate::foundation::math::Vec3;

/// Directional sun light
#[derive(Debug, Clone, PartialEq)]
pub struct SunLight {
    /// Entity name
    pub name: String,
    /// Direction the light travels, unit length
    pub direction: Vec3,
    /// Atmospheric turbidity
    pub turbidity: f64,
    /// Radiance scale
    pub radiance_multiplier: f64,
}

impl SunLight {
    /// Create a sun light travelling along `direction`
    pub fn new(name: impl Into<String>, direction: Vec3) -> Self {
        Self {
            name: name.into(),
            direction: direction.try_normalize(f64::EPSILON).unwrap_or_else(|| -Vec3::z()),
            turbidity: 0.0,
            radiance_multiplier: 1.0,
        }
    }

    /// Set turbidity
    pub fn with_turbidity(mut self, turbidity: f64) -> Self {
        self.turbidity = turbidity;
        self
    }

    /// Set the radiance multiplier
    pub fn with_radiance_multiplier(mut self, multiplier: f64) -> Self {
        self.radiance_multiplier = multiplier;
        self
    }
}

/// Constant background environment
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    /// Entity name
    pub name: String,
    /// Environment EDF name
    pub edf: String,
    /// Environment shader name
    pub shader: String,
    /// Name of the color entity used as constant radiance
    pub radiance: String,
}
