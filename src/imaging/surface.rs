//! Pixel storage behind the [`PixelSurface`] trait.
//!
//! Geometry and compositing code is written against the trait so it does
//! not care whether pixels live in an in-process bitmap ([`PixelBuffer`],
//! the production implementation) or behind some other graphics handle.
//!
//! Pixels use the inverted 7-bit alpha convention of [`Color`]: 0 is fully
//! opaque, 127 fully transparent.

use super::error::{ImageError, Result};
use super::params::Color;
use image::RgbaImage;

/// Read/write access to a width × height grid of [`Color`] pixels.
///
/// Coordinates passed to [`pixel`](Self::pixel) and
/// [`set_pixel`](Self::set_pixel) must be in bounds; callers clip first.
pub trait PixelSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn pixel(&self, x: u32, y: u32) -> Color;

    /// Store a pixel verbatim. No blending against the existing value.
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);

    /// Whether the surface stores direct color rather than palette indices.
    fn is_true_color(&self) -> bool {
        true
    }
}

/// Owned RGBA pixel grid. Width and height are always at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    true_color: bool,
}

impl PixelBuffer {
    /// Allocate a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    /// Allocate a buffer with every pixel set to `color`, written verbatim
    /// (a fully transparent fill stays fully transparent).
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self> {
        if width < 1 || height < 1 {
            return Err(ImageError::invalid_dimensions(format!(
                "image width and height must be greater than zero, got {width}x{height}"
            )));
        }
        let too_large =
            || ImageError::invalid_dimensions(format!("{width}x{height} is too large to allocate"));
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(too_large)?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| too_large())?;
        pixels.resize(len, color);
        Ok(Self {
            width,
            height,
            pixels,
            true_color: true,
        })
    }

    /// Wrap an 8-bit RGBA image (255 = opaque alpha).
    pub fn from_rgba8(img: &RgbaImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        let mut buf = Self::new(width, height)?;
        buf.load_rgba8(img);
        Ok(buf)
    }

    /// Overwrite pixels from an 8-bit RGBA image of the same size.
    pub(crate) fn load_rgba8(&mut self, img: &RgbaImage) {
        for (dst, src) in self.pixels.iter_mut().zip(img.pixels()) {
            *dst = Color::from_rgba8(src.0);
        }
    }

    /// Export as an 8-bit RGBA image (255 = opaque alpha).
    pub fn to_rgba8(&self) -> RgbaImage {
        let raw: Vec<u8> = self.pixels.iter().flat_map(|c| c.to_rgba8()).collect();
        // Length is width * height * 4 by construction.
        RgbaImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    pub(crate) fn mark_palette(&mut self) {
        self.true_color = false;
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Set every pixel to `color`, verbatim.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Bounds-checked pixel read.
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl PixelSurface for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    fn is_true_color(&self) -> bool {
        self.true_color
    }
}
