//! Vector aliases shared by geometry and shading.
//!
//! A single `glam::Vec3A` type serves as direction, point and linear RGB color.
//! Arithmetic, dot/cross products and lengths come from glam; this module only adds
//! the degeneracy checks the tracer needs before normalizing.

use glam::Vec3A;

/// Direction or offset in world space.
pub type Vec3 = Vec3A;

/// Position in world space.
pub type Point3 = Vec3A;

/// Linear RGB color, components nominally in [0, inf) before quantization.
pub type Color = Vec3A;

/// Per-component magnitude below which a vector counts as zero.
const NEAR_ZERO: f32 = 1e-8;

/// Squared length below which normalization is refused.
const MIN_LENGTH_SQUARED: f32 = 1e-30;

/// True if every component is close enough to zero that the vector has no usable direction.
pub fn near_zero(v: Vec3) -> bool {
    v.abs().cmplt(Vec3::splat(NEAR_ZERO)).all()
}

/// Normalize `v`, or `None` when its length is too small to divide by.
pub fn try_unit_vector(v: Vec3) -> Option<Vec3> {
    let length_squared = v.length_squared();
    if length_squared < MIN_LENGTH_SQUARED || !length_squared.is_finite() {
        return None;
    }
    Some(v / length_squared.sqrt())
}
