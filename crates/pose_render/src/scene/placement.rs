//! Transform engine: pose → affine placement
//!
//! `placement = Translate(position) ∘ Rotate(orientation)`, i.e. the object is
//! rotated about its own origin first and then moved into world space.

use crate::foundation::math::{self, Mat4, Mat4Ext, Point3, Quat, Vec3};
use crate::pose::PoseSample;

/// Constant world offset of the sun object
pub const SUN_OFFSET: [f64; 3] = [-1.49e10, 0.0, 5e5];

/// Rigid placement of an object instance in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffinePlacement {
    matrix: Mat4,
}

impl AffinePlacement {
    /// Wrap a 4x4 affine matrix
    pub const fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    /// Identity placement
    pub fn identity() -> Self {
        Self::from_matrix(Mat4::identity())
    }

    /// Underlying local-to-world matrix
    pub const fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// World-space translation
    pub fn translation(&self) -> Vec3 {
        self.matrix.translation_part()
    }

    /// Map a local point into world space
    pub fn apply(&self, point: &Point3) -> Point3 {
        self.matrix.transform_point(point)
    }

    /// `self ∘ inner`: apply `inner` first, then `self`
    pub fn then_after(&self, inner: &Self) -> Self {
        Self::from_matrix(self.matrix * inner.matrix)
    }
}

impl Default for AffinePlacement {
    fn default() -> Self {
        Self::identity()
    }
}

/// Pure translation
pub fn translate(offset: &Vec3) -> AffinePlacement {
    AffinePlacement::from_matrix(math::translation(offset))
}

/// Pure rotation from quaternion components as supplied
pub fn rotate(orientation: &Quat) -> AffinePlacement {
    AffinePlacement::from_matrix(math::rotation_from_quaternion(orientation))
}

/// Placement of the dynamic object for a pose sample
pub fn placement(pose: &PoseSample) -> AffinePlacement {
    translate(&pose.position).then_after(&rotate(&pose.orientation))
}

/// Constant placement of the sun object, independent of any pose
pub fn sun_placement() -> AffinePlacement {
    let [x, y, z] = SUN_OFFSET;
    translate(&Vec3::new(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat3;
    use crate::pose::QuaternionPolicy;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn linear(placement: &AffinePlacement) -> Mat3 {
        placement.matrix().fixed_view::<3, 3>(0, 0).into_owned()
    }

    fn sample_points() -> Vec<Point3> {
        vec![
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, -2.5, 7.0),
            Point3::new(1e3, 1e-3, -42.0),
        ]
    }

    fn sample_poses() -> Vec<PoseSample> {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        vec![
            PoseSample::from_wire([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, -3000.0]),
            PoseSample::from_wire([1.0, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
            PoseSample::from_wire([0.0, s, 0.0, s], [12.0, -3.0, 9.5]),
            PoseSample::from_wire([0.5, 0.5, 0.5, 0.5], [-1.0, 2.0, -300.0]),
            PoseSample::from_wire([0.1, 0.2, 0.3, 0.4], [0.0, 1.0, 0.0]),
        ]
    }

    #[test]
    fn test_composition_law() {
        for pose in sample_poses() {
            let composed = placement(&pose);
            let t = translate(&pose.position);
            let r = rotate(&pose.orientation);
            for p in sample_points() {
                assert_relative_eq!(composed.apply(&p), t.apply(&r.apply(&p)), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_identity_orientation_is_pure_translation() {
        let pose = PoseSample::from_wire([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, -3000.0]);
        let placed = placement(&pose);

        assert_eq!(linear(&placed), Mat3::identity());
        assert_eq!(placed.translation(), Vec3::new(0.0, 0.0, -3000.0));
        assert_eq!(placed.apply(&Point3::new(1.0, 2.0, 3.0)), Point3::new(1.0, 2.0, -2997.0));
    }

    #[test]
    fn test_unit_x_quaternion_is_half_turn_about_x() {
        let pose = PoseSample::from_wire([1.0, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        let placed = placement(&pose);

        assert_eq!(placed.translation(), Vec3::zeros());
        assert_relative_eq!(
            linear(&placed),
            Mat3::new(1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, -1.0),
            epsilon = 1e-15
        );
        assert_relative_eq!(
            placed.apply(&Point3::new(0.0, 1.0, 1.0)),
            Point3::new(0.0, -1.0, -1.0),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_rotation_happens_before_translation() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        // 90 degrees about +Z, then move along +X
        let pose = PoseSample::from_wire([0.0, 0.0, s, s], [10.0, 0.0, 0.0]);
        let p = placement(&pose).apply(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(10.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_placement_is_deterministic() {
        for pose in sample_poses() {
            assert_eq!(placement(&pose), placement(&pose));
        }
    }

    #[test]
    fn test_sun_placement_ignores_pose() {
        let sun = sun_placement();
        assert_eq!(linear(&sun), Mat3::identity());
        assert_eq!(sun.translation(), Vec3::new(-1.49e10, 0.0, 5e5));
    }

    #[test]
    fn test_as_is_non_unit_quaternion_is_not_scaled() {
        let pose = QuaternionPolicy::AsIs
            .apply(PoseSample::from_wire([0.0, 0.0, 0.0, 2.0], [0.0, 0.0, 0.0]), 1e-3)
            .unwrap();
        let p = placement(&pose).apply(&Point3::new(1.0, 0.0, 0.0));
        assert_eq!(p, Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_as_is_zero_quaternion_keeps_geometry_apart() {
        let pose = QuaternionPolicy::AsIs
            .apply(PoseSample::from_wire([0.0; 4], [0.0, 0.0, -3000.0]), 1e-3)
            .unwrap();
        let placed = placement(&pose);
        assert_eq!(placed.apply(&Point3::new(1.0, 1.0, 1.0)), Point3::new(1.0, 1.0, -2999.0));
        assert_ne!(placed.apply(&Point3::origin()), placed.apply(&Point3::new(1.0, 1.0, 1.0)));
    }

    proptest! {
        #[test]
        fn prop_composition_law(
            q in prop::array::uniform4(-2.0f64..2.0),
            t in prop::array::uniform3(-5e3f64..5e3),
            p in prop::array::uniform3(-10.0f64..10.0),
        ) {
            let pose = PoseSample::from_wire(q, t);
            let point = Point3::new(p[0], p[1], p[2]);

            let composed = placement(&pose).apply(&point);
            let stepwise = translate(&pose.position).apply(&rotate(&pose.orientation).apply(&point));
            prop_assert!((composed - stepwise).norm() <= 1e-9 * (1.0 + stepwise.coords.norm()));
        }

        #[test]
        fn prop_normalized_orientation_is_rigid(
            q in prop::array::uniform4(-1.0f64..1.0),
            a in prop::array::uniform3(-10.0f64..10.0),
            b in prop::array::uniform3(-10.0f64..10.0),
        ) {
            let raw = PoseSample::from_wire(q, [0.0, 0.0, -3000.0]);
            prop_assume!(raw.orientation.norm() > 1e-3);
            let pose = QuaternionPolicy::Normalize.apply(raw, 1e-3).unwrap();
            let placed = placement(&pose);

            let (a, b) = (Point3::new(a[0], a[1], a[2]), Point3::new(b[0], b[1], b[2]));
            let before = (a - b).norm();
            let after = (placed.apply(&a) - placed.apply(&b)).norm();
            prop_assert!((before - after).abs() <= 1e-9 * (1.0 + before));
        }
    }
}
