//! Pinhole camera mapping image-plane coordinates to world-space rays.

use serde::Deserialize;

use crate::ray::Ray;
use crate::vec3::{Point3, Vec3};

/// Distance from the eye to the viewport plane.
const FOCAL_LENGTH: f32 = 1.0;

/// Camera placement and field of view.
///
/// The defaults reproduce the classic fixed camera: eye at the origin looking down
/// -Z, +Y up, 90 degree vertical field of view (viewport height 2).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Point camera is looking from (camera position)
    pub lookfrom: [f32; 3],
    /// Point camera is looking at
    pub lookat: [f32; 3],
    /// Camera-relative "up" direction vector
    pub vup: [f32; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            vfov: 90.0,
            lookfrom: [0.0, 0.0, 0.0],
            lookat: [0.0, 0.0, -1.0],
            vup: [0.0, 1.0, 0.0],
        }
    }
}

/// Camera for ray generation.
///
/// All fields are derived once in [`Camera::new`] and never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    /// Builds the viewport for an image of the given width/height ratio.
    pub fn new(settings: &CameraSettings, aspect_ratio: f32) -> Self {
        let lookfrom = Point3::from_array(settings.lookfrom);
        let lookat = Point3::from_array(settings.lookat);
        let vup = Vec3::from_array(settings.vup);

        let theta = settings.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        // Orthonormal frame: w points backwards, u right, v up.
        let w = (lookfrom - lookat).normalize();
        let u = vup.cross(w).normalize();
        let v = w.cross(u);

        let origin = lookfrom;
        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - FOCAL_LENGTH * w;

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
        }
    }

    /// Ray through the viewport point at horizontal fraction `u` and vertical fraction `v`.
    ///
    /// `(0, 0)` is the lower left corner of the viewport, `(1, 1)` the upper right.
    pub fn get_ray(&self, u: f32, v: f32) -> Ray {
        Ray::new(
            self.origin,
            self.lower_left_corner + u * self.horizontal + v * self.vertical - self.origin,
        )
    }

    /// Eye position.
    pub fn origin(&self) -> Point3 {
        self.origin
    }
}
