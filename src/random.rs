//! Random number generation for ray tracing.
//!
//! The generator is an explicit value threaded through the renderer rather than
//! ambient global state, so a render is reproducible from its seed. Sampling
//! helpers are generic over any `rand::Rng`.

use glam::Vec3A;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::vec3::{try_unit_vector, Vec3};

/// Random source used by the renderer.
pub type Sampler = ChaCha20Rng;

/// Create a sampler from a fixed seed, or from OS entropy when `seed` is `None`.
pub fn sampler(seed: Option<u64>) -> Sampler {
    match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_rng(&mut rand::rng()),
    }
}

/// Generate a random f32 in [0.0, 1.0)
pub fn random_f32<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random()
}

/// Generate a random f32 in [min, max)
pub fn random_f32_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + (max - min) * random_f32(rng)
}

/// Generate a random vector with each component in [min, max).
pub fn random_vec3_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> Vec3 {
    Vec3A::new(
        random_f32_range(rng, min, max),
        random_f32_range(rng, min, max),
        random_f32_range(rng, min, max),
    )
}

/// Rejection-sample a point inside the unit ball.
pub fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = random_vec3_range(rng, -1.0, 1.0);
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}

/// Random unit vector, uniformly distributed over the sphere.
///
/// Candidates from the unit ball too short to normalize are drawn again.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        if let Some(unit) = try_unit_vector(random_in_unit_sphere(rng)) {
            return unit;
        }
    }
}

/// Random unit vector in the hemisphere around `normal`.
pub fn random_on_hemisphere<R: Rng + ?Sized>(rng: &mut R, normal: Vec3) -> Vec3 {
    let on_unit_sphere = random_unit_vector(rng);
    if on_unit_sphere.dot(normal) > 0.0 {
        on_unit_sphere
    } else {
        -on_unit_sphere
    }
}
