//! Render configuration and scene description.
//!
//! Everything has a built-in default; a TOML file may override any subset of keys
//! and command-line flags override the file. Example:
//!
//! ```toml
//! width = 400
//! aspect_ratio = "16:9"
//! samples_per_pixel = 100
//! max_depth = 50
//! scatter = "lambertian"
//! seed = 7
//!
//! [camera]
//! vfov = 90.0
//!
//! [[spheres]]
//! center = [0.0, 0.0, -1.0]
//! radius = 0.5
//! ```

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use log::{debug, info};
use serde::{de, Deserialize, Deserializer};

use crate::camera::{Camera, CameraSettings};
use crate::hittable::{Hittable, HittableList};
use crate::integrator::ScatterMode;
use crate::render::RenderSettings;
use crate::sphere::Sphere;
use crate::vec3::Point3;

/// A sphere as written in a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SphereDescription {
    /// Center in world coordinates
    pub center: [f32; 3],
    /// Must be positive
    pub radius: f32,
}

/// Full set of render parameters plus the scene.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Image width in pixels
    pub width: u32,
    /// Width over height; the image height is derived from it
    #[serde(deserialize_with = "deserialize_aspect_ratio")]
    pub aspect_ratio: f32,
    /// Number of samples per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray segments per sample
    pub max_depth: u32,
    /// Diffuse bounce direction policy
    pub scatter: ScatterMode,
    /// Fixed random seed; fresh entropy when absent
    pub seed: Option<u64>,
    /// Apply gamma 2 before quantization
    pub gamma: bool,
    /// Camera placement
    pub camera: CameraSettings,
    /// Scene contents; replaces the default scene when present
    pub spheres: Vec<SphereDescription>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 400,
            aspect_ratio: 16.0 / 9.0,
            samples_per_pixel: 100,
            max_depth: 50,
            scatter: ScatterMode::Hemisphere,
            seed: None,
            gamma: false,
            camera: CameraSettings::default(),
            spheres: vec![
                SphereDescription {
                    center: [0.0, 0.0, -1.0],
                    radius: 0.5,
                },
                // ground
                SphereDescription {
                    center: [0.0, -100.5, -1.0],
                    radius: 100.0,
                },
            ],
        }
    }
}

impl Config {
    /// Read and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let input = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&input)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Config = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations the renderer cannot handle.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.width > 0, "width must be positive");
        ensure!(
            self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0,
            "aspect ratio must be a positive number, got {}",
            self.aspect_ratio
        );
        ensure!(self.samples_per_pixel > 0, "samples_per_pixel must be positive");

        let camera = &self.camera;
        ensure!(
            camera.vfov > 0.0 && camera.vfov < 180.0,
            "camera vfov must be between 0 and 180 degrees, got {}",
            camera.vfov
        );
        let view = Point3::from_array(camera.lookat) - Point3::from_array(camera.lookfrom);
        ensure!(
            view.length_squared() > 0.0,
            "camera lookfrom and lookat must differ"
        );
        ensure!(
            view.cross(Point3::from_array(camera.vup)).length_squared() > 0.0,
            "camera vup must not be parallel to the view direction"
        );

        for (index, sphere) in self.spheres.iter().enumerate() {
            ensure!(
                sphere.radius.is_finite() && sphere.radius > 0.0,
                "sphere {} has non-positive radius {}",
                index,
                sphere.radius
            );
            ensure!(
                sphere.center.iter().all(|c| c.is_finite()),
                "sphere {} has a non-finite center",
                index
            );
        }
        Ok(())
    }

    /// Image height derived from width and aspect ratio, at least one row.
    pub fn image_height(&self) -> u32 {
        ((self.width as f32 / self.aspect_ratio) as u32).max(1)
    }

    /// Sampling parameters for the renderer.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            image_width: self.width,
            image_height: self.image_height(),
            samples_per_pixel: self.samples_per_pixel,
            max_depth: self.max_depth,
            scatter: self.scatter,
            gamma_correct: self.gamma,
        }
    }

    /// Camera matching the rendered image's proportions.
    pub fn camera(&self) -> Camera {
        Camera::new(&self.camera, self.render_settings().aspect_ratio())
    }

    /// Scene geometry.
    pub fn build_world(&self) -> HittableList {
        let world: HittableList = self
            .spheres
            .iter()
            .map(|s| {
                debug!("Sphere at {:?} radius {}", s.center, s.radius);
                Box::new(Sphere::new(Point3::from_array(s.center), s.radius)) as Box<dyn Hittable>
            })
            .collect();
        info!("Scene has {} spheres", world.len());
        world
    }
}

/// Parse an aspect ratio written either as `W:H` (e.g. `16:9`) or as a number.
pub fn parse_aspect_ratio(s: &str) -> Result<f32, String> {
    let ratio = match s.split_once(':') {
        Some((w, h)) => {
            let w: f32 = w
                .trim()
                .parse()
                .map_err(|e| format!("invalid aspect width '{}': {}", w, e))?;
            let h: f32 = h
                .trim()
                .parse()
                .map_err(|e| format!("invalid aspect height '{}': {}", h, e))?;
            w / h
        }
        None => s
            .trim()
            .parse()
            .map_err(|e| format!("invalid aspect ratio '{}': {}", s, e))?,
    };
    if ratio.is_finite() && ratio > 0.0 {
        Ok(ratio)
    } else {
        Err(format!("aspect ratio must be positive, got '{}'", s))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AspectRatioValue {
    Number(f32),
    Text(String),
}

fn deserialize_aspect_ratio<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    match AspectRatioValue::deserialize(deserializer)? {
        AspectRatioValue::Number(ratio) => Ok(ratio),
        AspectRatioValue::Text(text) => parse_aspect_ratio(&text).map_err(de::Error::custom),
    }
}
