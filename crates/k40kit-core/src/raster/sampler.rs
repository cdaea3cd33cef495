//! Pixel to laser-intensity reduction.
//!
//! `1.0` means full power and `0.0` means the laser stays off.

use super::bitmap::{PixelMode, RasterImage};

/// Per-mode sampling strategy, chosen once per image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelSampler<'a> {
    /// `(255 - v) / 255`
    Bilevel,
    /// Palette entry resolved, then `1 - (r + g + b) / 765`
    Palette(&'a [[u8; 3]]),
    /// `(255 - v) / 255`
    Luma,
    /// `1 - (r + g + b) / 765`
    Rgb,
    /// RGB intensity scaled by `alpha / 255`
    Rgba,
}

impl<'a> PixelSampler<'a> {
    pub fn for_image(image: &'a RasterImage) -> Self {
        match image.mode() {
            PixelMode::Bilevel => Self::Bilevel,
            PixelMode::Palette => Self::Palette(image.palette()),
            PixelMode::Luma => Self::Luma,
            PixelMode::Rgb => Self::Rgb,
            PixelMode::Rgba => Self::Rgba,
        }
    }

    /// Intensity of one pixel's raw bytes.
    ///
    /// Short slices sample as `0.0`.
    pub fn sample(&self, pixel: &[u8]) -> f64 {
        match (self, pixel) {
            (Self::Bilevel | Self::Luma, [v, ..]) => (255.0 - f64::from(*v)) / 255.0,
            (Self::Palette(palette), [index, ..]) => palette
                .get(usize::from(*index))
                .map_or(0.0, |[r, g, b]| rgb_intensity(*r, *g, *b)),
            (Self::Rgb, [r, g, b, ..]) => rgb_intensity(*r, *g, *b),
            (Self::Rgba, [r, g, b, a]) => rgb_intensity(*r, *g, *b) * (f64::from(*a) / 255.0),
            _ => 0.0,
        }
    }
}

fn rgb_intensity(r: u8, g: u8, b: u8) -> f64 {
    1.0 - (f64::from(r) + f64::from(g) + f64::from(b)) / 765.0
}
