//! skyray: a small offline ray tracer
//!
//! Renders spheres with a single diffuse reflectance under a sky gradient, using
//! Monte Carlo sampling per pixel, and streams the result as a plain-text PPM image.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod camera;
pub mod config;
pub mod hittable;
pub mod integrator;
pub mod interval;
pub mod output;
pub mod random;
pub mod ray;
pub mod render;
pub mod sphere;
pub mod vec3;
