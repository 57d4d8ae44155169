//! Output frame and quality settings

use super::material::ColorSpace;

/// Output frame description
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSettings {
    /// Entity name
    pub name: String,
    /// Name of the camera rendering this frame
    pub camera: String,
    /// `(width, height)` in pixels
    pub resolution: (u32, u32),
    /// Output color space
    pub color_space: ColorSpace,
}

/// Named quality configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualitySettings {
    /// Configuration name
    pub name: String,
    /// Samples per pixel
    pub samples: u32,
}
