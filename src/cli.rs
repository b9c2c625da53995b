use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use skyray::config::{parse_aspect_ratio, Config};
use skyray::integrator::ScatterMode;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments. Render parameters left unset fall back to the config file,
/// then to built-in defaults.
#[derive(Debug, Parser)]
#[command(name = "skyray")]
#[command(about = "Render diffuse spheres under a sky gradient to a PPM image")]
pub struct Args {
    /// TOML file with render parameters and scene
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output file path; the image goes to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub debug_level: LogLevel,

    /// Hide the scanline progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image aspect ratio as W:H or a number; height is derived from it
    #[arg(long, value_parser = parse_aspect_ratio)]
    pub aspect_ratio: Option<f32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples_per_pixel: Option<u32>,

    /// Maximum number of ray bounces
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Diffuse scatter direction policy
    #[arg(long, value_enum)]
    pub scatter: Option<ScatterMode>,

    /// Random seed for a reproducible image
    #[arg(long)]
    pub seed: Option<u64>,

    /// Apply gamma 2 correction before quantization
    #[arg(long)]
    pub gamma: bool,
}

impl Args {
    /// Overlay the flags that were given on top of `config`.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(aspect_ratio) = self.aspect_ratio {
            config.aspect_ratio = aspect_ratio;
        }
        if let Some(samples) = self.samples_per_pixel {
            config.samples_per_pixel = samples;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(scatter) = self.scatter {
            config.scatter = scatter;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.gamma {
            config.gamma = true;
        }
    }
}
