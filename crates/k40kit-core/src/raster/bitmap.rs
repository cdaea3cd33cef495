//! Decoded raster images in the pixel modes the sampler understands.

use super::sampler::PixelSampler;
use crate::error::{RasterError, Result};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Color mode of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelMode {
    /// One byte per pixel, `0` or `255`.
    Bilevel,
    /// One byte per pixel, an index into an RGB palette.
    Palette,
    /// One byte of grayscale per pixel.
    Luma,
    Rgb,
    Rgba,
}

impl PixelMode {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Bilevel | Self::Palette | Self::Luma => 1,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

impl fmt::Display for PixelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bilevel => "1",
            Self::Palette => "P",
            Self::Luma => "L",
            Self::Rgb => "RGB",
            Self::Rgba => "RGBA",
        };
        f.write_str(name)
    }
}

/// A validated, row-major pixel buffer.
///
/// Construction checks the buffer length against the geometry and every
/// palette index against the palette, so sampling never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    mode: PixelMode,
    data: Vec<u8>,
    palette: Vec<[u8; 3]>,
}

impl RasterImage {
    /// Create an image in any mode except [`PixelMode::Palette`].
    pub fn new(width: u32, height: u32, mode: PixelMode, data: Vec<u8>) -> Result<Self> {
        if mode == PixelMode::Palette {
            return Err(RasterError::MissingPalette.into());
        }
        Self::validated(width, height, mode, data, Vec::new())
    }

    /// Create a palette-indexed image.
    pub fn with_palette(
        width: u32,
        height: u32,
        indices: Vec<u8>,
        palette: Vec<[u8; 3]>,
    ) -> Result<Self> {
        if palette.is_empty() {
            return Err(RasterError::MissingPalette.into());
        }
        if let Some(&index) = indices.iter().find(|&&i| usize::from(i) >= palette.len()) {
            return Err(RasterError::PaletteIndex {
                index,
                len: palette.len(),
            }
            .into());
        }
        Self::validated(width, height, PixelMode::Palette, indices, palette)
    }

    /// Convert a decoded image, normalizing unsupported layouts to RGBA.
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self> {
        let (width, height) = (image.width(), image.height());
        match image {
            DynamicImage::ImageLuma8(buf) => {
                Self::new(width, height, PixelMode::Luma, buf.as_raw().clone())
            }
            DynamicImage::ImageRgb8(buf) => {
                Self::new(width, height, PixelMode::Rgb, buf.as_raw().clone())
            }
            DynamicImage::ImageRgba8(buf) => {
                Self::new(width, height, PixelMode::Rgba, buf.as_raw().clone())
            }
            other => {
                tracing::debug!("Normalizing {:?} image to RGBA", other.color());
                Self::new(width, height, PixelMode::Rgba, other.to_rgba8().into_raw())
            }
        }
    }

    /// Decode an image file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let decoded = image::open(path.as_ref())?;
        Self::from_dynamic(&decoded)
    }

    fn validated(
        width: u32,
        height: u32,
        mode: PixelMode,
        data: Vec<u8>,
        palette: Vec<[u8; 3]>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyImage { width, height }.into());
        }
        let expected = width as usize * height as usize * mode.bytes_per_pixel();
        if data.len() != expected {
            return Err(RasterError::BufferSize {
                expected,
                actual: data.len(),
            }
            .into());
        }
        Ok(Self {
            width,
            height,
            mode,
            data,
            palette,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mode(&self) -> PixelMode {
        self.mode
    }

    pub fn palette(&self) -> &[[u8; 3]] {
        &self.palette
    }

    /// Raw bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.mode.bytes_per_pixel();
        let start = (y as usize * self.width as usize + x as usize) * bpp;
        self.data.get(start..start + bpp)
    }

    /// Sampling strategy for this image's mode.
    pub fn sampler(&self) -> PixelSampler<'_> {
        PixelSampler::for_image(self)
    }

    /// Laser intensity in `[0, 1]` of the pixel at `(x, y)`.
    pub fn intensity(&self, x: u32, y: u32) -> Option<f64> {
        self.pixel(x, y).map(|px| self.sampler().sample(px))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use image::{GrayAlphaImage, LumaA};

    #[test]
    fn test_rejects_bad_geometry() {
        let err = RasterImage::new(2, 2, PixelMode::Rgb, vec![0; 11]).unwrap_err();
        assert!(matches!(
            err,
            Error::Raster(RasterError::BufferSize {
                expected: 12,
                actual: 11
            })
        ));

        let err = RasterImage::new(0, 4, PixelMode::Luma, vec![]).unwrap_err();
        assert!(matches!(err, Error::Raster(RasterError::EmptyImage { .. })));
    }

    #[test]
    fn test_palette_validation() {
        assert!(matches!(
            RasterImage::new(1, 1, PixelMode::Palette, vec![0]),
            Err(Error::Raster(RasterError::MissingPalette))
        ));
        assert!(matches!(
            RasterImage::with_palette(2, 1, vec![0, 3], vec![[0, 0, 0]]),
            Err(Error::Raster(RasterError::PaletteIndex { index: 3, len: 1 }))
        ));
        let image = RasterImage::with_palette(2, 1, vec![0, 1], vec![[0, 0, 0], [9, 9, 9]]).unwrap();
        assert_eq!(image.mode(), PixelMode::Palette);
        assert_eq!(image.palette().len(), 2);
    }

    #[test]
    fn test_pixel_lookup() {
        let image = RasterImage::new(2, 2, PixelMode::Rgb, (0..12).collect()).unwrap();
        assert_eq!(image.pixel(1, 1), Some(&[9u8, 10, 11][..]));
        assert_eq!(image.pixel(2, 0), None);
    }

    #[test]
    fn test_from_dynamic_normalizes_to_rgba() {
        let buf = GrayAlphaImage::from_pixel(3, 2, LumaA([0, 255]));
        let image = RasterImage::from_dynamic(&DynamicImage::ImageLumaA8(buf)).unwrap();
        assert_eq!(image.mode(), PixelMode::Rgba);
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.intensity(0, 0), Some(1.0));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(PixelMode::Bilevel.to_string(), "1");
        assert_eq!(PixelMode::Rgba.to_string(), "RGBA");
    }
}
