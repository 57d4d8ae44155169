//! Math utilities and types
//!
//! Provides the double-precision math types used for pose and placement work.
//! Placements span from a few world units up to the sun offset (~1.5e10), so
//! everything on the pose path is `f64`; only the rasteriser drops to `f32`.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f64>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f64>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f64>;

/// Raw (possibly non-unit) quaternion
pub type Quat = Quaternion<f64>;

/// Rotation matrix built directly from quaternion components as supplied.
///
/// Uses the `1 - 2(y² + z²)` form, so a non-unit quaternion skews the
/// matrix instead of scaling it by `|q|²`, and the zero quaternion gives the
/// identity. Callers that need a proper rotation go through
/// [`crate::pose::QuaternionPolicy`] first.
pub fn rotation_from_quaternion(q: &Quat) -> Mat4 {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);
    let (xx, yy, zz) = (x * x, y * y, z * z);
    let (xy, xz, yz) = (x * y, x * z, y * z);
    let (wx, wy, wz) = (w * x, w * y, w * z);

    Mat3::new(
        1.0 - 2.0 * (yy + zz), 2.0 * (xy - wz), 2.0 * (xz + wy),
        2.0 * (xy + wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - wx),
        2.0 * (xz - wy), 2.0 * (yz + wx), 1.0 - 2.0 * (xx + yy),
    )
    .to_homogeneous()
}

/// Pure translation matrix
pub fn translation(offset: &Vec3) -> Mat4 {
    Mat4::new_translation(offset)
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Translation column of an affine matrix
    fn translation_part(&self) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn translation_part(&self) -> Vec3 {
        Vec3::new(self.m14, self.m24, self.m34)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_identity_quaternion_gives_identity_rotation() {
        let q = Quat::new(1.0, 0.0, 0.0, 0.0);
        assert_eq!(rotation_from_quaternion(&q), Mat4::identity());
    }

    #[test]
    fn test_quarter_turn_about_z() {
        let half = std::f64::consts::FRAC_PI_4;
        let q = Quat::new(half.cos(), 0.0, 0.0, half.sin());
        let rotated = rotation_from_quaternion(&q).transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(rotated, Point3::new(0.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_unit_quaternions_match_nalgebra() {
        let q = Quat::new(0.4, -0.2, 0.7, 0.1).normalize();
        let expected = UnitQuaternion::new_unchecked(q).to_homogeneous();
        assert_relative_eq!(rotation_from_quaternion(&q), expected, epsilon = EPSILON);
    }

    #[test]
    fn test_scaled_scalar_part_is_not_a_scale() {
        let q = Quat::new(2.0, 0.0, 0.0, 0.0);
        assert_eq!(rotation_from_quaternion(&q), Mat4::identity());
    }

    #[test]
    fn test_zero_quaternion_gives_identity() {
        let q = Quat::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(rotation_from_quaternion(&q), Mat4::identity());
    }

    #[test]
    fn test_translation_part_roundtrip() {
        let offset = Vec3::new(-1.49e10, 0.0, 5e5);
        assert_eq!(translation(&offset).translation_part(), offset);
        assert_eq!(translation(&offset).fixed_view::<3, 3>(0, 0), Mat3::identity());
    }
}
