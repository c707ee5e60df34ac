//! Decode and encode through the `image` crate's pure-Rust codecs.
//!
//! ## Crate mapping
//!
//! | Format | Decode | Encode |
//! |---|---|---|
//! | JPEG | `image` (zune-jpeg) | `JpegEncoder::new_with_quality`, alpha dropped |
//! | PNG | `image` (png) | `PngEncoder::new_with_quality`, zlib level 0–9 passed through |
//! | GIF | `image` (gif), decoded as palette | `ImageFormat::Gif` writer, quantized |
//! | WEBP | `image` (image-webp) | `webp` (libwebp) below quality 100, `WebPEncoder::new_lossless` at 100 |
//! | BMP | `image` (bmp) | `BmpEncoder` |
//!
//! The pure-Rust WEBP encoder in `image` is lossless only, so lossy WEBP
//! goes through libwebp. Quality 100 keeps the lossless path.

use super::error::{ImageError, Result};
use super::format::{ImageFormat, detect_format};
use super::params::EncodeOptions;
use super::surface::PixelBuffer;
use image::codecs::png::{CompressionType, FilterType as PngFilter};
use image::{DynamicImage, ImageEncoder, ImageReader};
use std::io::{Cursor, Write};

/// Which side of a codec an operation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Decode,
    Encode,
}

/// Upper bounds applied before any pixel data is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeLimits {
    /// Maximum `width * height`. `None` means unlimited.
    pub max_pixels: Option<u64>,
}

/// Fail with [`ImageError::CapabilityUnavailable`] when the codec for
/// `format` was not compiled in.
pub fn ensure_capability(format: ImageFormat, direction: Direction) -> Result<()> {
    let fmt = format.to_image_format();
    let enabled = match direction {
        Direction::Decode => fmt.reading_enabled(),
        Direction::Encode => fmt.writing_enabled(),
    };
    if enabled {
        Ok(())
    } else {
        Err(ImageError::CapabilityUnavailable(format!(
            "{format} {} support is not compiled in",
            match direction {
                Direction::Decode => "decode",
                Direction::Encode => "encode",
            }
        )))
    }
}

/// Decode bytes into a buffer. The format comes from the header, never
/// from a file name.
#[tracing::instrument(level = "debug", skip(bytes), fields(len = bytes.len()))]
pub fn decode(bytes: &[u8], limits: &DecodeLimits) -> Result<(PixelBuffer, ImageFormat)> {
    let format = detect_format(bytes)
        .ok_or_else(|| ImageError::UnknownImageFormat("Unknown type of image.".into()))?;
    ensure_capability(format, Direction::Decode)?;

    if let Some(max) = limits.max_pixels {
        let (w, h) = ImageReader::with_format(Cursor::new(bytes), format.to_image_format())
            .into_dimensions()
            .map_err(ImageError::decode)?;
        if u64::from(w) * u64::from(h) > max {
            return Err(ImageError::invalid_dimensions(format!(
                "{w}x{h} image exceeds the limit of {max} pixels"
            )));
        }
    }

    let img = image::load_from_memory_with_format(bytes, format.to_image_format())
        .map_err(ImageError::decode)?;
    let mut buf = PixelBuffer::from_rgba8(&img.to_rgba8())?;
    if format == ImageFormat::Gif {
        buf.mark_palette();
    }
    tracing::debug!(%format, width = img.width(), height = img.height(), "decoded image");
    Ok((buf, format))
}

/// Encode `buf` as `format` into `out`.
///
/// `quality` overrides the per-format default from `defaults` and is
/// clamped to the format's range (JPEG/WEBP 0–100, PNG 0–9). GIF and BMP
/// ignore it.
#[tracing::instrument(level = "debug", skip(buf, out, defaults))]
pub fn encode<W: Write>(
    buf: &PixelBuffer,
    format: ImageFormat,
    quality: Option<u8>,
    defaults: &EncodeOptions,
    out: &mut W,
) -> Result<()> {
    ensure_capability(format, Direction::Encode)?;
    let rgba = DynamicImage::ImageRgba8(buf.to_rgba8());
    let bytes = encode_dynamic(&rgba, format, quality, defaults)?;
    out.write_all(&bytes)?;
    Ok(())
}

fn encode_dynamic(
    img: &DynamicImage,
    format: ImageFormat,
    quality: Option<u8>,
    defaults: &EncodeOptions,
) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let q = quality.unwrap_or(defaults.jpeg_quality).clamp(1, 100);
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, q);
            DynamicImage::ImageRgb8(img.to_rgb8())
                .write_with_encoder(encoder)
                .map_err(ImageError::encode)?;
        }
        ImageFormat::Png => {
            let level = quality.unwrap_or(defaults.png_compression).min(9);
            let encoder = image::codecs::png::PngEncoder::new_with_quality(
                &mut bytes,
                png_compression(level),
                PngFilter::Adaptive,
            );
            img.write_with_encoder(encoder).map_err(ImageError::encode)?;
        }
        ImageFormat::Webp => {
            let q = quality.unwrap_or(defaults.webp_quality).min(100);
            if q < 100 {
                let rgba = img.to_rgba8();
                let encoded = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
                    .encode_simple(false, f32::from(q))
                    .map_err(|e| ImageError::encode(format!("webp encoding failed: {e:?}")))?;
                bytes.extend_from_slice(&encoded);
            } else {
                let encoder = image::codecs::webp::WebPEncoder::new_lossless(&mut bytes);
                img.write_with_encoder(encoder).map_err(ImageError::encode)?;
            }
        }
        ImageFormat::Bmp => {
            let mut cursor = Cursor::new(&mut bytes);
            let encoder = image::codecs::bmp::BmpEncoder::new(&mut cursor);
            let rgba = img.to_rgba8();
            encoder
                .write_image(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    image::ExtendedColorType::Rgba8,
                )
                .map_err(ImageError::encode)?;
        }
        ImageFormat::Gif => {
            img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Gif)
                .map_err(ImageError::encode)?;
        }
    }
    if bytes.is_empty() {
        return Err(ImageError::encode(format!("{format} encoder produced no output")));
    }
    Ok(bytes)
}

fn png_compression(level: u8) -> CompressionType {
    CompressionType::Level(level.min(9))
}
