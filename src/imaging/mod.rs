//! Image transform engine, pure Rust on top of the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Detect format** | `image::guess_format` on the header bytes |
//! | **Decode** | `image::load_from_memory_with_format` |
//! | **Resample** | `image::imageops::resize` with the `Triangle` filter |
//! | **Sharpen** | 3×3 convolution, replicate border |
//! | **Place** | straight alpha substitution with opacity remap |
//! | **Encode** | JPEG / PNG / GIF / BMP and lossless WEBP encoders from `image`, lossy WEBP from `webp` |
//!
//! The module is split into:
//! - **Format**: [`ImageFormat`] registry and content sniffing
//! - **Calculations**: Pure functions for resize and crop geometry (unit testable)
//! - **Parameters**: [`Color`], [`Dimension`], [`ResizeFlags`] and friends
//! - **Surface**: [`PixelSurface`] trait + [`PixelBuffer`]
//! - **Filters / Compositor / Codec**: the pixel work
//! - **Document**: [`ImageDocument`], the façade tying it together

mod calculations;
pub mod codec;
pub mod compositor;
pub mod document;
mod error;
pub mod filters;
pub mod format;
pub mod native;
mod params;
pub mod surface;

pub use calculations::{
    CropRect, Flip, calculate_crop_rect, calculate_resize_size, flip_for, resolve_offset,
};
pub use codec::DecodeLimits;
pub use document::{EMPTY_GIF, ImageDocument};
pub use error::{ImageError, Result};
pub use format::{ImageFormat, detect_format, detect_format_from_file};
pub use native::{OpArg, OpValue};
pub use params::{Color, CropSpec, Dimension, EncodeOptions, ResizeFlags, ResizeSpec};
pub use surface::{PixelBuffer, PixelSurface};
