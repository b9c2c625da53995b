//! The pixel loop: sample, average, quantize and stream every pixel.

use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rand::Rng;

use crate::camera::Camera;
use crate::hittable::Hittable;
use crate::integrator::{ray_color, ScatterMode};
use crate::output::PpmWriter;
use crate::random::random_f32;
use crate::vec3::Color;

/// Image size and sampling parameters for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Rendered image width in pixel count
    pub image_width: u32,
    /// Rendered image height in pixel count
    pub image_height: u32,
    /// Number of random samples for each pixel (for anti-aliasing)
    pub samples_per_pixel: u32,
    /// Maximum number of ray segments followed per sample
    pub max_depth: u32,
    /// Diffuse bounce direction policy
    pub scatter: ScatterMode,
    /// Square-root gamma before quantization
    pub gamma_correct: bool,
}

impl RenderSettings {
    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.image_width as f32 / self.image_height as f32
    }
}

/// Drives the camera and integrator over every pixel.
///
/// Rows are written top to bottom, pixels in a row left to right.
pub struct Renderer<'a> {
    settings: RenderSettings,
    camera: &'a Camera,
    world: &'a dyn Hittable,
    show_progress: bool,
}

impl<'a> Renderer<'a> {
    /// Renderer over a read-only camera and scene, with the progress bar enabled.
    pub fn new(settings: RenderSettings, camera: &'a Camera, world: &'a dyn Hittable) -> Self {
        Self {
            settings,
            camera,
            world,
            show_progress: true,
        }
    }

    /// Enable or disable the scanline progress bar on stderr.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Render the whole image into `out` as a PPM stream.
    pub fn render<W: Write, R: Rng + ?Sized>(&self, out: W, rng: &mut R) -> Result<W> {
        let RenderSettings {
            image_width,
            image_height,
            samples_per_pixel,
            ..
        } = self.settings;

        let mut writer = PpmWriter::new(out, self.settings.gamma_correct);
        writer
            .write_header(image_width, image_height)
            .context("failed to write image header")?;

        info!(
            "Rendering {}x{} with {} samples per pixel, max depth {}, {:?} scatter",
            image_width, image_height, samples_per_pixel, self.settings.max_depth, self.settings.scatter
        );
        let generation_start = Instant::now();
        let pb = self.progress_bar();

        for j in (0..image_height).rev() {
            pb.set_message(format!("Scanlines remaining: {}", j + 1));
            for i in 0..image_width {
                let pixel_color = self.sample_pixel(i, j, rng);
                writer
                    .write_color(pixel_color)
                    .with_context(|| format!("failed to write pixel ({i}, {j})"))?;
            }
            pb.inc(1);
        }

        pb.finish_with_message("Done");
        info!("Image generated in {:.2?}", generation_start.elapsed());

        let out = writer.finish().context("failed to flush image output")?;
        debug!("Image stream flushed");
        Ok(out)
    }

    /// Average of `samples_per_pixel` jittered estimates for pixel `(i, j)`,
    /// with `j` counted from the bottom row.
    pub fn sample_pixel<R: Rng + ?Sized>(&self, i: u32, j: u32, rng: &mut R) -> Color {
        let RenderSettings {
            image_width,
            image_height,
            samples_per_pixel,
            max_depth,
            scatter,
            ..
        } = self.settings;

        // A single row or column has no span to divide; its only pixel covers [0, 1).
        let u_span = image_width.saturating_sub(1).max(1) as f32;
        let v_span = image_height.saturating_sub(1).max(1) as f32;

        let mut pixel_color = Color::ZERO;
        for _sample in 0..samples_per_pixel {
            let u = (i as f32 + random_f32(rng)) / u_span;
            let v = (j as f32 + random_f32(rng)) / v_span;
            let r = self.camera.get_ray(u, v);
            pixel_color += ray_color(&r, self.world, max_depth, scatter, rng);
        }

        pixel_color / samples_per_pixel as f32
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(self.settings.image_height as u64);
        let style = ProgressStyle::default_bar()
            .template("{msg} {bar:40} {pos}/{len} ETA: {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraSettings;
    use crate::hittable::HittableList;
    use crate::random::sampler;
    use crate::sphere::Sphere;
    use crate::vec3::Point3;

    fn settings(width: u32, height: u32, samples: u32) -> RenderSettings {
        RenderSettings {
            image_width: width,
            image_height: height,
            samples_per_pixel: samples,
            max_depth: 50,
            scatter: ScatterMode::Hemisphere,
            gamma_correct: false,
        }
    }

    fn world() -> HittableList {
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5)));
        world.add(Box::new(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0)));
        world
    }

    fn render_to_string(settings: RenderSettings, seed: u64) -> String {
        let camera = Camera::new(&CameraSettings::default(), settings.aspect_ratio());
        let world = world();
        let renderer = Renderer::new(settings, &camera, &world).with_progress(false);
        let bytes = renderer
            .render(Vec::new(), &mut sampler(Some(seed)))
            .unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_output_format() {
        let text = render_to_string(settings(2, 1, 1), 11);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(&lines[..3], &["P3", "2 1", "255"]);
        assert_eq!(lines.len(), 5);
        for line in &lines[3..] {
            let channels: Vec<u32> = line
                .split(' ')
                .map(|c| c.parse().unwrap())
                .collect();
            assert_eq!(channels.len(), 3);
            assert!(channels.iter().all(|&c| c <= 255));
        }
    }

    #[test]
    fn test_pixel_count_matches_dimensions() {
        let text = render_to_string(settings(5, 3, 2), 12);
        assert_eq!(text.lines().count(), 3 + 5 * 3);
    }

    #[test]
    fn test_same_seed_is_byte_identical() {
        let s = RenderSettings {
            scatter: ScatterMode::Lambertian,
            ..settings(8, 6, 4)
        };
        assert_eq!(render_to_string(s, 42), render_to_string(s, 42));
        assert_eq!(
            render_to_string(settings(8, 6, 4), 42),
            render_to_string(settings(8, 6, 4), 42)
        );
    }

    #[test]
    fn test_empty_scene_top_row_is_bluer_than_bottom() {
        let camera = Camera::new(&CameraSettings::default(), 1.0);
        let empty = HittableList::new();
        let renderer = Renderer::new(settings(3, 3, 1), &camera, &empty).with_progress(false);
        let mut rng = sampler(Some(13));
        let top = renderer.sample_pixel(1, 2, &mut rng);
        let bottom = renderer.sample_pixel(1, 0, &mut rng);
        assert!(top.x < bottom.x);
        assert!((top.z - 1.0).abs() < 1e-6);
        assert!((bottom.z - 1.0).abs() < 1e-6);
    }
}
