//! The [`ImageDocument`] façade.
//!
//! A document owns exactly one [`PixelBuffer`]. Operations that change the
//! size (resize, crop) build a new buffer and drop the old one; operations
//! that don't (sharpen, place, named operations) work in place. Geometry
//! comes from [`calculations`](super::calculations), blending from
//! [`compositor`](super::compositor) and byte I/O from [`codec`](super::codec).
//!
//! Mutating methods return `&mut Self` so calls chain:
//!
//! ```no_run
//! # use rasterkit::imaging::{Dimension, ImageDocument, ImageFormat, ResizeFlags};
//! # fn main() -> Result<(), rasterkit::imaging::ImageError> {
//! let (mut doc, _) = ImageDocument::from_path("photo.jpg".as_ref())?;
//! doc.resize(Dimension::Pixels(400), Dimension::Pixels(500), ResizeFlags::EXACT)?
//!     .sharpen();
//! doc.save("thumb.webp".as_ref(), None, None)?;
//! # Ok(())
//! # }
//! ```

use super::calculations::{
    calculate_crop_rect, calculate_resize_size, flip_for, resolve_offset,
};
use super::codec::{self, DecodeLimits};
use super::compositor;
use super::error::{ImageError, Result};
use super::filters;
use super::format::{ImageFormat, detect_format_from_file};
use super::native::{self, OpArg, OpValue};
use super::params::{Color, CropSpec, Dimension, EncodeOptions, ResizeFlags, ResizeSpec};
use super::surface::{PixelBuffer, PixelSurface};
use std::io::Write;
use std::path::Path;

/// Smallest valid GIF: a single fully transparent pixel.
pub const EMPTY_GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x80\x00\x00\x00\x00\x00\x00\x00\x00!\xf9\x04\x01\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;";

/// An image being transformed. `Clone` is a deep pixel copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDocument {
    buffer: PixelBuffer,
    encode_options: EncodeOptions,
}

impl ImageDocument {
    pub fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            buffer,
            encode_options: EncodeOptions::default(),
        }
    }

    /// Decode from bytes. Returns the sniffed format alongside the document.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, ImageFormat)> {
        Self::from_bytes_with_limits(bytes, &DecodeLimits::default())
    }

    pub fn from_bytes_with_limits(
        bytes: &[u8],
        limits: &DecodeLimits,
    ) -> Result<(Self, ImageFormat)> {
        let (buffer, format) = codec::decode(bytes, limits)?;
        Ok((Self::from_buffer(buffer), format))
    }

    /// Decode from a file. The format comes from the content, not the name.
    pub fn from_path(path: &Path) -> Result<(Self, ImageFormat)> {
        Self::from_path_with_limits(path, &DecodeLimits::default())
    }

    pub fn from_path_with_limits(
        path: &Path,
        limits: &DecodeLimits,
    ) -> Result<(Self, ImageFormat)> {
        if detect_format_from_file(path).is_none() {
            return Err(ImageError::UnknownImageFormat(if path.is_file() {
                format!("Unknown type of file '{}'.", path.display())
            } else {
                format!("File '{}' not found.", path.display())
            }));
        }
        let bytes = std::fs::read(path)?;
        Self::from_bytes_with_limits(&bytes, limits)
    }

    /// Blank true-color canvas. Without a fill color it is fully transparent
    /// black; with one, the color is written verbatim.
    pub fn blank(width: u32, height: u32, fill: Option<Color>) -> Result<Self> {
        let buffer = PixelBuffer::filled(width, height, fill.unwrap_or(Color::TRANSPARENT))?;
        Ok(Self::from_buffer(buffer))
    }

    /// The 1×1 transparent GIF as a document.
    pub fn empty_gif() -> Result<Self> {
        Ok(Self::from_bytes(EMPTY_GIF)?.0)
    }

    /// Replace the per-format default qualities used by `encode`/`save`.
    pub fn with_encode_options(mut self, options: EncodeOptions) -> Self {
        self.encode_options = options;
        self
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn is_true_color(&self) -> bool {
        self.buffer.is_true_color()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    /// Resize under `flags`. Negative width/height mirror the result on that
    /// axis after resampling. EXACT fills the box then center-crops to it.
    pub fn resize(
        &mut self,
        width: Dimension,
        height: Dimension,
        flags: ResizeFlags,
    ) -> Result<&mut Self> {
        if flags.contains(ResizeFlags::EXACT) {
            return self.resize_exact(width, height);
        }

        let (src_w, src_h) = (self.width(), self.height());
        let (new_w, new_h) = calculate_resize_size(src_w, src_h, width, height, flags)?;

        if (new_w, new_h) != (src_w, src_h) {
            tracing::debug!(src_w, src_h, new_w, new_h, ?flags, "resampling");
            self.buffer = filters::resample(&self.buffer, new_w, new_h)?;
        }
        if let Some(mode) = flip_for(width, height) {
            filters::flip(&mut self.buffer, mode);
        }
        Ok(self)
    }

    pub fn resize_with(&mut self, spec: &ResizeSpec) -> Result<&mut Self> {
        self.resize(spec.width, spec.height, spec.flags)
    }

    fn resize_exact(&mut self, width: Dimension, height: Dimension) -> Result<&mut Self> {
        let target_w = width.abs().resolve(i64::from(self.width()));
        let target_h = height.abs().resolve(i64::from(self.height()));
        if target_w < 1 || target_h < 1 {
            return Err(ImageError::invalid_dimensions(
                "exact resize needs both width and height",
            ));
        }
        let sign = |d: Dimension, v: i64| if d.is_negative() { -v } else { v };
        self.resize(
            Dimension::Pixels(sign(width, target_w)),
            Dimension::Pixels(sign(height, target_h)),
            ResizeFlags::FILL,
        )?;
        self.crop(
            Dimension::Percent(50.0),
            Dimension::Percent(50.0),
            Dimension::Pixels(target_w),
            Dimension::Pixels(target_h),
        )
    }

    /// Cut out a rectangle. An empty intersection is
    /// [`ImageError::InvalidDimensions`].
    pub fn crop(
        &mut self,
        left: Dimension,
        top: Dimension,
        width: Dimension,
        height: Dimension,
    ) -> Result<&mut Self> {
        let rect = calculate_crop_rect(self.width(), self.height(), left, top, width, height);
        tracing::debug!(?rect, "cropping");
        self.buffer = filters::crop(&self.buffer, rect)?;
        Ok(self)
    }

    pub fn crop_with(&mut self, spec: &CropSpec) -> Result<&mut Self> {
        self.crop(spec.left, spec.top, spec.width, spec.height)
    }

    /// Sharpen with a fixed 3×3 kernel.
    pub fn sharpen(&mut self) -> &mut Self {
        filters::sharpen(&mut self.buffer);
        self
    }

    /// Place `other` onto this image. Percentage offsets are measured
    /// against the size difference, so `("50%", "50%")` centers it.
    /// `other` is only read.
    pub fn place(
        &mut self,
        other: &ImageDocument,
        left: Dimension,
        top: Dimension,
        opacity: i32,
    ) -> Result<&mut Self> {
        let x = resolve_offset(left, self.width(), other.width());
        let y = resolve_offset(top, self.height(), other.height());
        tracing::debug!(x, y, opacity, "placing image");
        compositor::place(&mut self.buffer, &other.buffer, x, y, opacity);
        Ok(self)
    }

    /// Encode to bytes. `quality` overrides the per-format default.
    pub fn encode(&self, format: ImageFormat, quality: Option<u8>) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out, format, quality)?;
        Ok(out)
    }

    /// Encode into any writer.
    pub fn write_to<W: Write>(
        &self,
        out: &mut W,
        format: ImageFormat,
        quality: Option<u8>,
    ) -> Result<()> {
        codec::encode(&self.buffer, format, quality, &self.encode_options, out)
    }

    /// Write to `path`. Without an explicit `format` it comes from the
    /// extension (`jpg` and `jpeg` both mean JPEG).
    pub fn save(
        &self,
        path: &Path,
        quality: Option<u8>,
        format: Option<ImageFormat>,
    ) -> Result<()> {
        let format = match format {
            Some(f) => f,
            None => ImageFormat::from_path(path)?,
        };
        let bytes = self.encode(format, quality)?;
        std::fs::write(path, bytes).map_err(|e| {
            ImageError::encode(format!("cannot write '{}': {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), %format, "saved image");
        Ok(())
    }

    /// Forward to a named operation (see [`native`](super::native)).
    pub fn invoke(&mut self, name: &str, args: &[OpArg]) -> Result<OpValue> {
        native::invoke(&mut self.buffer, name, args)
    }
}
