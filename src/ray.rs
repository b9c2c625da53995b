//! Ray representation for 3D ray tracing.
//!
//! A ray is defined as r(t) = origin + t * direction, a half-line used for
//! intersection testing. Callers may probe negative `t` as well.

use crate::vec3::{Point3, Vec3};

/// Ray in 3D space defined by origin and direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point: the camera for primary rays, a surface point for bounces.
    pub origin: Point3,

    /// Direction of travel. Not required to be unit length, so `t` is measured in
    /// multiples of this vector rather than in world distance. Must be non-zero.
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray with origin and direction.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        debug_assert!(
            direction.length_squared() > 0.0,
            "ray direction must be non-zero"
        );
        Self { origin, direction }
    }

    /// Returns r(t) = origin + t * direction.
    pub fn at(&self, t: f32) -> Point3 {
        self.origin + t * self.direction
    }
}
