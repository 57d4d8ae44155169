//! Decoded pose sample

use crate::foundation::math::{Quat, Vec3};

/// Orientation plus position of the tracked object at one instant
///
/// Constructed fresh for every cycle and passed by value; nothing keeps a
/// sample alive between cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    /// Orientation, exactly as supplied (not necessarily unit length)
    pub orientation: Quat,
    /// Position in world units
    pub position: Vec3,
}

impl PoseSample {
    /// Create a sample from an orientation and a position
    pub const fn new(orientation: Quat, position: Vec3) -> Self {
        Self { orientation, position }
    }

    /// Identity orientation at the origin
    pub fn identity() -> Self {
        Self::new(Quat::identity(), Vec3::zeros())
    }

    /// Build from wire-order arrays
    ///
    /// `pose` is `[qx, qy, qz, qw]`: vector part at indices 0..=2, scalar at 3.
    pub fn from_wire(pose: [f64; 4], position: [f64; 3]) -> Self {
        let [qx, qy, qz, qw] = pose;
        let [x, y, z] = position;
        Self::new(Quat::new(qw, qx, qy, qz), Vec3::new(x, y, z))
    }

    /// Quaternion components in wire order `[qx, qy, qz, qw]`
    pub fn pose_wire(&self) -> [f64; 4] {
        let q = &self.orientation;
        [q.i, q.j, q.k, q.w]
    }

    /// Position components in wire order `[x, y, z]`
    pub fn position_wire(&self) -> [f64; 3] {
        [self.position.x, self.position.y, self.position.z]
    }
}

impl Default for PoseSample {
    fn default() -> Self {
        Self::identity()
    }
}
