//! Pinhole camera
//!
//! Film dimensions and focal length share one unit, so only their ratio
//! matters. The camera looks down its local −Z axis with +Y up.

use crate::foundation::math::{Mat4, Point3};

/// Pinhole camera with a fixed world transform
#[derive(Debug, Clone, PartialEq)]
pub struct PinholeCamera {
    /// Entity name
    pub name: String,
    /// Film `(width, height)`
    pub film_dimensions: (f64, f64),
    /// Distance from pinhole to film
    pub focal_length: f64,
    /// Camera-to-world transform
    pub transform: Mat4,
}

impl PinholeCamera {
    /// Create a camera at the world origin
    pub fn new(name: impl Into<String>, film_dimensions: (f64, f64), focal_length: f64) -> Self {
        Self {
            name: name.into(),
            film_dimensions,
            focal_length,
            transform: Mat4::identity(),
        }
    }

    /// World-to-camera matrix, `None` if the transform is singular
    pub fn view_matrix(&self) -> Option<Mat4> {
        self.transform.try_inverse()
    }

    /// Project a camera-space point to normalized film coordinates in [-1, 1]
    ///
    /// Returns `None` for points at or behind the pinhole.
    pub fn project(&self, p: &Point3) -> Option<(f64, f64)> {
        let depth = -p.z;
        if depth <= 0.0 {
            return None;
        }
        let x = self.focal_length * p.x / depth / (self.film_dimensions.0 * 0.5);
        let y = self.focal_length * p.y / depth / (self.film_dimensions.1 * 0.5);
        Some((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> PinholeCamera {
        PinholeCamera::new("camera", (0.024892, 0.018669), 3.5)
    }

    #[test]
    fn test_optical_axis_projects_to_centre() {
        let (x, y) = camera().project(&Point3::new(0.0, 0.0, -3000.0)).unwrap();
        assert_relative_eq!(x, 0.0);
        assert_relative_eq!(y, 0.0);
    }

    #[test]
    fn test_film_edge_maps_to_unit() {
        let cam = camera();
        let depth = 3000.0;
        let half_width = depth * cam.film_dimensions.0 * 0.5 / cam.focal_length;
        let (x, _) = cam.project(&Point3::new(half_width, 0.0, -depth)).unwrap();
        assert_relative_eq!(x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_points_behind_camera_are_rejected() {
        assert!(camera().project(&Point3::new(0.0, 0.0, 5e5)).is_none());
        assert!(camera().project(&Point3::new(1.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_identity_view() {
        assert_eq!(camera().view_matrix(), Some(Mat4::identity()));
    }
}
