//! Radiance estimation along a ray.
//!
//! Diffuse bounces are followed until the ray escapes to the sky or the bounce
//! budget runs out. Every bounce keeps half of the light.

use clap::ValueEnum;
use rand::Rng;
use serde::Deserialize;

use crate::hittable::{HitRecord, Hittable};
use crate::interval::Interval;
use crate::random;
use crate::ray::Ray;
use crate::vec3::{near_zero, Color, Vec3};

/// Fraction of incoming light re-emitted at each bounce.
pub const ALBEDO: f32 = 0.5;

/// Smallest ray parameter accepted for a hit, keeps bounced rays off the surface
/// they start on.
pub const SHADOW_EPSILON: f32 = 1e-4;

const SKY_WHITE: Color = Color::new(1.0, 1.0, 1.0);
const SKY_BLUE: Color = Color::new(0.5, 0.7, 1.0);

/// How a diffuse bounce picks its new direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScatterMode {
    /// Uniform over the hemisphere around the surface normal.
    #[default]
    Hemisphere,
    /// Normal plus a random unit vector, favouring directions near the normal.
    Lambertian,
}

impl ScatterMode {
    /// Direction of the continuation ray leaving `rec.p`.
    pub fn scatter_direction<R: Rng + ?Sized>(self, rec: &HitRecord, rng: &mut R) -> Vec3 {
        match self {
            ScatterMode::Hemisphere => random::random_on_hemisphere(rng, rec.normal),
            ScatterMode::Lambertian => {
                let direction = rec.normal + random::random_unit_vector(rng);
                // The unit vector can cancel the normal almost exactly.
                if near_zero(direction) {
                    rec.normal
                } else {
                    direction
                }
            }
        }
    }
}

/// Estimate the light arriving along `ray`, following at most `depth` segments.
///
/// A depth of zero gathers nothing and returns black.
pub fn ray_color<R: Rng + ?Sized>(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    scatter: ScatterMode,
    rng: &mut R,
) -> Color {
    let mut ray = *ray;
    let mut attenuation = Color::ONE;

    for _ in 0..depth {
        match world.hit(&ray, Interval::new(SHADOW_EPSILON, f32::INFINITY)) {
            Some(rec) => {
                let direction = scatter.scatter_direction(&rec, rng);
                ray = Ray::new(rec.p, direction);
                attenuation *= ALBEDO;
            }
            None => return attenuation * sky_color(&ray),
        }
    }

    // Bounce limit reached, no more light is gathered.
    Color::ZERO
}

/// Background seen by a ray that escapes the scene: white at the bottom, blue at the top.
pub fn sky_color(ray: &Ray) -> Color {
    let unit_direction = ray.direction.normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    (1.0 - a) * SKY_WHITE + a * SKY_BLUE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::HittableList;
    use crate::random::sampler;
    use crate::sphere::Sphere;
    use crate::vec3::Point3;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn two_sphere_world() -> HittableList {
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5)));
        world.add(Box::new(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0)));
        world
    }

    #[test]
    fn test_zero_depth_is_black() {
        let world = two_sphere_world();
        let mut rng = sampler(Some(3));
        for mode in [ScatterMode::Hemisphere, ScatterMode::Lambertian] {
            let r = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
            assert_eq!(ray_color(&r, &world, 0, mode, &mut rng), Color::ZERO);
            let up = Ray::new(Point3::ZERO, Vec3::Y);
            assert_eq!(ray_color(&up, &HittableList::new(), 0, mode, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_sky_endpoints() {
        let empty = HittableList::new();
        let mut rng = sampler(Some(4));

        let up = Ray::new(Point3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(
            ray_color(&up, &empty, 50, ScatterMode::Hemisphere, &mut rng),
            Color::new(0.5, 0.7, 1.0)
        );

        let down = Ray::new(Point3::ZERO, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(
            ray_color(&down, &empty, 50, ScatterMode::Hemisphere, &mut rng),
            Color::new(1.0, 1.0, 1.0)
        );
    }

    #[test]
    fn test_single_bounce_is_attenuated_once() {
        // A ray hitting the top of a small sphere from above bounces into the
        // open upper hemisphere and escapes after exactly one bounce.
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(Point3::new(0.0, -1.0, 0.0), 1.0)));
        let r = Ray::new(Point3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0));

        let mut rng = sampler(Some(5));
        for mode in [ScatterMode::Hemisphere, ScatterMode::Lambertian] {
            for _ in 0..200 {
                let c = ray_color(&r, &world, 50, mode, &mut rng);
                // Sky colors lie between SKY_BLUE and SKY_WHITE, halved once.
                assert!(c.max_element() <= ALBEDO * 1.0 + 1e-6);
                assert!(c.min_element() >= ALBEDO * 0.5 - 1e-6);
                assert!(c.z >= c.x);
            }
        }
    }

    /// Reports a hit one unit along every ray for its first `hits` queries, then misses.
    struct BounceCounter {
        remaining: AtomicU32,
    }

    impl BounceCounter {
        fn new(hits: u32) -> Self {
            Self {
                remaining: AtomicU32::new(hits),
            }
        }
    }

    impl Hittable for BounceCounter {
        fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord> {
            let left = self.remaining.load(Ordering::Relaxed);
            if left == 0 || !ray_t.surrounds(1.0) {
                return None;
            }
            self.remaining.store(left - 1, Ordering::Relaxed);
            let outward = -r.direction.normalize();
            Some(HitRecord::with_face_normal(r, r.at(1.0), 1.0, outward))
        }
    }

    #[test]
    fn test_each_bounce_halves_the_light() {
        let mut rng = sampler(Some(6));
        for mode in [ScatterMode::Hemisphere, ScatterMode::Lambertian] {
            for bounces in 0..6u32 {
                let world = BounceCounter::new(bounces);
                let r = Ray::new(Point3::ZERO, Vec3::new(0.2, -0.4, -1.0));
                let c = ray_color(&r, &world, bounces + 1, mode, &mut rng);

                // The escaping ray sees a sky color whose brightest channel is 1.0
                // and whose dimmest is at least 0.5.
                let bound = ALBEDO.powi(bounces as i32);
                assert!(c.max_element() <= bound + 1e-6, "{bounces} bounces: {c}");
                assert!(c.min_element() >= 0.5 * bound - 1e-6, "{bounces} bounces: {c}");
            }
        }
    }

    #[test]
    fn test_depth_limit_cuts_bouncing_path() {
        let mut rng = sampler(Some(7));
        let world = BounceCounter::new(3);
        let r = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(
            ray_color(&r, &world, 3, ScatterMode::Hemisphere, &mut rng),
            Color::ZERO
        );
    }

    #[test]
    fn test_open_scene_never_exceeds_one_bounce_bound() {
        // The camera ray hits the small sphere first, so every estimate has been
        // attenuated at least once.
        let world = two_sphere_world();
        let mut rng = sampler(Some(10));
        let r = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        for depth in 1..6u32 {
            for _ in 0..50 {
                let c = ray_color(&r, &world, depth, ScatterMode::Hemisphere, &mut rng);
                assert!(c.max_element() <= ALBEDO + 1e-6);
            }
        }
    }

    #[test]
    fn test_depth_one_hit_is_black() {
        // One segment allowed, and it hits geometry: nothing reaches the sky.
        let world = two_sphere_world();
        let mut rng = sampler(Some(8));
        let r = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(
            ray_color(&r, &world, 1, ScatterMode::Hemisphere, &mut rng),
            Color::ZERO
        );
    }

    #[test]
    fn test_lambertian_direction_is_usable() {
        let mut rng = sampler(Some(9));
        let rec = HitRecord {
            p: Point3::ZERO,
            normal: Vec3::Y,
            t: 1.0,
            front_face: true,
        };
        for _ in 0..1000 {
            let d = ScatterMode::Lambertian.scatter_direction(&rec, &mut rng);
            assert!(!near_zero(d));
            assert!(d.dot(rec.normal) >= 0.0);
        }
    }
}
