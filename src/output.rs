//! # Output Module
//!
//! Plain-text PPM (`P3`) emission. The header is
//!
//! ```text
//! P3
//! <width> <height>
//! 255
//! ```
//!
//! followed by one `R G B` line per pixel in row-major order. Linear colors are
//! quantized per channel:
//! - optional gamma 2 correction (square root)
//! - clamp to [0.0, 0.999]
//! - scale by 256 and truncate, giving an integer in [0, 255]

use std::io::{self, Write};

use crate::interval::Interval;
use crate::vec3::Color;

/// Largest channel value written to the stream.
pub const MAX_CHANNEL: u16 = 255;

const INTENSITY: Interval = Interval {
    min: 0.0,
    max: 0.999,
};

/// Streams pixels to any writer in PPM `P3` format.
pub struct PpmWriter<W: Write> {
    out: W,
    gamma_correct: bool,
}

impl<W: Write> PpmWriter<W> {
    /// Wrap `out`. With `gamma_correct` each channel is square-rooted before quantization.
    pub fn new(out: W, gamma_correct: bool) -> Self {
        Self { out, gamma_correct }
    }

    /// Write the three header lines.
    pub fn write_header(&mut self, width: u32, height: u32) -> io::Result<()> {
        writeln!(self.out, "P3")?;
        writeln!(self.out, "{} {}", width, height)?;
        writeln!(self.out, "{}", MAX_CHANNEL)
    }

    /// Write one pixel given its already averaged linear color.
    pub fn write_color(&mut self, pixel_color: Color) -> io::Result<()> {
        let [r, g, b] = quantize(pixel_color, self.gamma_correct);
        writeln!(self.out, "{} {} {}", r, g, b)
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Map a linear color to 8-bit channel values.
pub fn quantize(color: Color, gamma_correct: bool) -> [u8; 3] {
    color.to_array().map(|linear| {
        let value = if gamma_correct {
            linear_to_gamma(linear)
        } else {
            linear
        };
        (256.0 * INTENSITY.clamp(value)) as u8
    })
}

/// Gamma 2 transfer; non-positive and NaN inputs map to black.
fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_edges() {
        assert_eq!(quantize(Color::ZERO, false), [0, 0, 0]);
        assert_eq!(quantize(Color::ONE, false), [255, 255, 255]);
        assert_eq!(quantize(Color::new(-1.0, 7.5, 0.5), false), [0, 255, 128]);
        assert_eq!(quantize(Color::new(0.25, 0.0, 1.0), true), [128, 0, 255]);
    }

    #[test]
    fn test_nan_becomes_black() {
        assert_eq!(quantize(Color::new(f32::NAN, 0.0, 0.0), true), [0, 0, 0]);
    }

    #[test]
    fn test_stream_layout() {
        let mut writer = PpmWriter::new(Vec::new(), false);
        writer.write_header(2, 1).unwrap();
        writer.write_color(Color::new(1.0, 0.5, 0.0)).unwrap();
        writer.write_color(Color::new(0.0, 0.0, 0.0)).unwrap();
        let bytes = writer.finish().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "P3\n2 1\n255\n255 128 0\n0 0 0\n"
        );
    }
}
