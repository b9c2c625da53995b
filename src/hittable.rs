//! Ray-object intersection.
//!
//! Defines the Hittable trait for geometric primitives, the HitRecord it produces,
//! and HittableList, the scene aggregate that picks the nearest hit.

use crate::interval::Interval;
use crate::ray::Ray;
use crate::vec3::{Point3, Vec3};

/// Ray-object intersection information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Point where the ray intersects the object
    pub p: Point3,
    /// Surface normal at the intersection point (unit vector, facing the incoming ray)
    pub normal: Vec3,
    /// Ray parameter of the intersection point
    pub t: f32,
    /// True if ray hits the front face, false if hits the back face
    pub front_face: bool,
}

impl HitRecord {
    /// Build a record from the geometric outward normal.
    ///
    /// The stored normal always points against the incident ray; `front_face`
    /// remembers which side was struck.
    pub fn with_face_normal(r: &Ray, p: Point3, t: f32, outward_normal: Vec3) -> Self {
        let front_face = r.direction.dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };
        Self {
            p,
            normal,
            t,
            front_face,
        }
    }
}

/// Anything a ray can intersect.
///
/// Implementors are read-only during rendering, hence `Sync + Send`.
pub trait Hittable: Sync + Send {
    /// Nearest intersection with `t` strictly inside `ray_t`, if any.
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord>;
}

/// Collection of objects forming a scene.
///
/// Uses linear search for intersection testing. Order of insertion never changes
/// which hit is reported, only the order members are tested in.
#[derive(Default)]
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the scene.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Number of top-level objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True if the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;

        for object in &self.objects {
            let search = match &closest {
                Some(rec) => ray_t.with_max(rec.t),
                None => ray_t,
            };
            if let Some(rec) = object.hit(r, search) {
                closest = Some(rec);
            }
        }

        closest
    }
}

impl Extend<Box<dyn Hittable>> for HittableList {
    fn extend<I: IntoIterator<Item = Box<dyn Hittable>>>(&mut self, iter: I) {
        self.objects.extend(iter);
    }
}

impl FromIterator<Box<dyn Hittable>> for HittableList {
    fn from_iter<I: IntoIterator<Item = Box<dyn Hittable>>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}
