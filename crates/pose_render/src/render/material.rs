//! Material system for rendering
//!
//! Entities reference each other by name the same way an offline scene file
//! does: a material names its BSDF/EDF, which in turn name a color entity.

/// How color values are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Three sRGB-encoded components
    Srgb,
    /// Spectral samples across the visible range
    Spectral,
}

/// Named color entity
#[derive(Debug, Clone, PartialEq)]
pub struct ColorEntity {
    /// Entity name
    pub name: String,
    /// Interpretation of `values`
    pub color_space: ColorSpace,
    /// Raw component values
    pub values: Vec<f32>,
    /// Scale applied to every component
    pub multiplier: f64,
}

impl ColorEntity {
    /// sRGB color with unit multiplier
    pub fn srgb(name: impl Into<String>, rgb: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            color_space: ColorSpace::Srgb,
            values: rgb.to_vec(),
            multiplier: 1.0,
        }
    }

    /// Spectral color
    pub fn spectral(name: impl Into<String>, samples: &[f32]) -> Self {
        Self {
            name: name.into(),
            color_space: ColorSpace::Spectral,
            values: samples.to_vec(),
            multiplier: 1.0,
        }
    }

    /// Set the multiplier
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Linear RGB approximation with the multiplier left out
    ///
    /// Spectral colors collapse to a grey at their mean sample value.
    pub fn linear_rgb(&self) -> [f32; 3] {
        match self.color_space {
            ColorSpace::Srgb => {
                let mut rgb = [0.0; 3];
                for (out, v) in rgb.iter_mut().zip(&self.values) {
                    *out = srgb_to_linear(*v);
                }
                rgb
            }
            ColorSpace::Spectral => {
                if self.values.is_empty() {
                    return [0.0; 3];
                }
                let mean = self.values.iter().sum::<f32>() / self.values.len() as f32;
                [mean; 3]
            }
        }
    }
}

/// Microfacet distribution for glossy BRDFs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mdf {
    /// GGX / Trowbridge-Reitz
    Ggx,
    /// Beckmann
    Beckmann,
}

/// Reflectance models
#[derive(Debug, Clone, PartialEq)]
pub enum Bsdf {
    /// Ideal diffuse reflector
    Lambertian {
        /// Entity name
        name: String,
        /// Name of the color entity used as reflectance
        reflectance: String,
    },
    /// Microfacet glossy reflector
    Glossy {
        /// Entity name
        name: String,
        /// Scalar reflectance
        reflectance: f32,
        /// Index of refraction
        ior: f32,
        /// Surface roughness
        roughness: f32,
        /// Fresnel term weight
        fresnel_weight: f32,
        /// Microfacet distribution
        mdf: Mdf,
    },
}

impl Bsdf {
    /// Entity name
    pub fn name(&self) -> &str {
        match self {
            Self::Lambertian { name, .. } | Self::Glossy { name, .. } => name,
        }
    }
}

/// Diffuse emission
#[derive(Debug, Clone, PartialEq)]
pub struct Edf {
    /// Entity name
    pub name: String,
    /// Name of the color entity used as radiance
    pub radiance: String,
}

/// Surface material binding a BSDF and an optional EDF
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Entity name
    pub name: String,
    /// Surface shader name
    pub surface_shader: String,
    /// BSDF name
    pub bsdf: String,
    /// EDF name, present for emitters
    pub edf: Option<String>,
}

impl Material {
    /// Create a non-emissive material
    pub fn new(name: impl Into<String>, surface_shader: impl Into<String>, bsdf: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surface_shader: surface_shader.into(),
            bsdf: bsdf.into(),
            edf: None,
        }
    }

    /// Attach an EDF, turning the material into an emitter
    pub fn with_edf(mut self, edf: impl Into<String>) -> Self {
        self.edf = Some(edf.into());
        self
    }
}

/// sRGB transfer function, decode direction
pub fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.040_45 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB transfer function, encode direction
pub fn linear_to_srgb(v: f32) -> f32 {
    if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_srgb_transfer_roundtrip_endpoints() {
        assert_relative_eq!(srgb_to_linear(0.0), 0.0);
        assert_relative_eq!(srgb_to_linear(1.0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(linear_to_srgb(srgb_to_linear(0.5)), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_spectral_collapses_to_mean() {
        let color = ColorEntity::spectral("s", &[1.0, 2.0, 3.0]).with_multiplier(10.0);
        assert_eq!(color.linear_rgb(), [2.0; 3]);
        assert_eq!(color.multiplier, 10.0);
    }

    #[test]
    fn test_material_emission_flag() {
        let plain = Material::new("m", "shader", "brdf");
        assert!(plain.edf.is_none());
        assert_eq!(plain.with_edf("edf").edf.as_deref(), Some("edf"));
    }
}
