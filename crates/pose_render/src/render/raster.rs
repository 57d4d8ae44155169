//! Raster image produced by a render

use image::{ImageFormat, RgbImage};
use std::io::Cursor;

/// 8-bit RGB raster
///
/// Created by a render, handed to a sink, then dropped. Nothing caches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pixels: RgbImage,
}

impl RasterImage {
    /// Wrap an existing buffer
    pub fn new(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    /// Build from raw interleaved RGB bytes, `None` if the length is wrong
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbImage::from_raw(width, height, data).map(Self::new)
    }

    /// Solid color image
    #[cfg(test)]
    pub(crate) fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self::new(RgbImage::from_pixel(width, height, image::Rgb(rgb)))
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Pixel at `(x, y)`
    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Interleaved RGB bytes
    #[cfg(test)]
    pub(crate) fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Encode as PNG
    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut out = Cursor::new(Vec::new());
        self.pixels.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }
}
