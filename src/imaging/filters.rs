//! Pixel filters: resampling, convolution sharpening, mirroring, cropping.

use super::calculations::{CropRect, Flip};
use super::error::{ImageError, Result};
use super::params::Color;
use super::surface::{PixelBuffer, PixelSurface};
use image::imageops::FilterType;

/// Sharpening kernel, applied with divisor 16 and offset 0.
pub const SHARPEN_KERNEL: [[f32; 3]; 3] = [[-1.0, -1.0, -1.0], [-1.0, 24.0, -1.0], [-1.0, -1.0, -1.0]];
pub const SHARPEN_DIVISOR: f32 = 16.0;

/// Resample into a new `width` × `height` buffer with a bilinear (triangle)
/// filter. The source is left untouched.
pub fn resample(src: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
    if width < 1 || height < 1 {
        return Err(ImageError::invalid_dimensions(format!(
            "cannot resample to {width}x{height}"
        )));
    }
    if width == src.width() && height == src.height() {
        return Ok(src.clone());
    }
    // Allocate the target before resampling so an impossible size is an error.
    let mut out = PixelBuffer::new(width, height)?;
    let resized = image::imageops::resize(&src.to_rgba8(), width, height, FilterType::Triangle);
    out.load_rgba8(&resized);
    Ok(out)
}

/// Apply a 3×3 convolution in place. Border pixels sample their nearest
/// in-bounds neighbour. Alpha is preserved; color channels are truncated
/// into 0..=255.
pub fn convolve(buf: &mut PixelBuffer, kernel: &[[f32; 3]; 3], divisor: f32, offset: f32) {
    let src = buf.clone();
    let (w, h) = (i64::from(src.width()), i64::from(src.height()));

    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 3];
            for (j, row) in kernel.iter().enumerate() {
                let yv = (y - 1 + j as i64).clamp(0, h - 1) as u32;
                for (i, k) in row.iter().enumerate() {
                    let xv = (x - 1 + i as i64).clamp(0, w - 1) as u32;
                    let p = src.pixel(xv, yv);
                    acc[0] += f32::from(p.red) * k;
                    acc[1] += f32::from(p.green) * k;
                    acc[2] += f32::from(p.blue) * k;
                }
            }
            let [r, g, b] = acc.map(|v| (v / divisor + offset).clamp(0.0, 255.0) as u8);
            let alpha = src.pixel(x as u32, y as u32).alpha;
            buf.set_pixel(
                x as u32,
                y as u32,
                Color {
                    red: r,
                    green: g,
                    blue: b,
                    alpha,
                },
            );
        }
    }
}

pub fn sharpen(buf: &mut PixelBuffer) {
    convolve(buf, &SHARPEN_KERNEL, SHARPEN_DIVISOR, 0.0);
}

/// Mirror in place.
pub fn flip(buf: &mut PixelBuffer, mode: Flip) {
    let (w, h) = (buf.width() as usize, buf.height() as usize);
    let pixels = buf.pixels_mut();
    if matches!(mode, Flip::Horizontal | Flip::Both) {
        for row in pixels.chunks_exact_mut(w) {
            row.reverse();
        }
    }
    if matches!(mode, Flip::Vertical | Flip::Both) {
        for y in 0..h / 2 {
            let (top, bottom) = pixels.split_at_mut((h - 1 - y) * w);
            top[y * w..(y + 1) * w].swap_with_slice(&mut bottom[..w]);
        }
    }
}

/// Copy `rect` out of `src` into a new buffer. An empty rectangle is
/// rejected since a buffer can't have a zero extent.
pub fn crop(src: &PixelBuffer, rect: CropRect) -> Result<PixelBuffer> {
    if rect.is_empty() {
        return Err(ImageError::invalid_dimensions(format!(
            "crop rectangle {}x{} at ({}, {}) is empty",
            rect.width, rect.height, rect.x, rect.y
        )));
    }
    let mut out = PixelBuffer::new(rect.width as u32, rect.height as u32)?;
    for y in 0..out.height() {
        for x in 0..out.width() {
            let c = src.pixel(rect.x as u32 + x, rect.y as u32 + y);
            out.set_pixel(x, y, c);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                buf.set_pixel(x, y, Color::rgba((x * 10) as i32, (y * 10) as i32, 0, 0));
            }
        }
        buf
    }

    #[test]
    fn resample_changes_dimensions() {
        let src = gradient(40, 20);
        let out = resample(&src, 10, 5).unwrap();
        assert_eq!((out.width(), out.height()), (10, 5));
        // Source untouched
        assert_eq!((src.width(), src.height()), (40, 20));
    }

    #[test]
    fn resample_uniform_stays_uniform() {
        let c = Color::rgba(200, 100, 50, 0);
        let src = PixelBuffer::filled(30, 30, c).unwrap();
        let out = resample(&src, 7, 11).unwrap();
        assert!(out.pixels().iter().all(|p| *p == c));
    }

    #[test]
    fn resample_rejects_zero() {
        assert!(resample(&gradient(4, 4), 0, 4).is_err());
    }

    #[test]
    fn resample_rejects_unallocatable_size() {
        let err = resample(&gradient(4, 4), u32::MAX, u32::MAX);
        assert!(matches!(err, Err(ImageError::InvalidDimensions(_))));
    }

    #[test]
    fn sharpen_leaves_uniform_area_unchanged() {
        let c = Color::rgba(120, 60, 30, 40);
        let mut buf = PixelBuffer::filled(5, 5, c).unwrap();
        sharpen(&mut buf);
        assert!(buf.pixels().iter().all(|p| *p == c));
    }

    #[test]
    fn sharpen_boosts_isolated_peak() {
        let mut buf = PixelBuffer::filled(3, 3, Color::rgb(100, 100, 100)).unwrap();
        buf.set_pixel(1, 1, Color::rgb(110, 100, 100));
        sharpen(&mut buf);
        // center: (24*110 - 8*100) / 16 = 115
        assert_eq!(buf.pixel(1, 1).red, 115);
        // corner (0,0) samples the peak once: (24*100 - 7*100 - 110) / 16 = 99.375
        assert_eq!(buf.pixel(0, 0).red, 99);
    }

    #[test]
    fn sharpen_preserves_alpha() {
        let mut buf = gradient(4, 4);
        buf.set_pixel(2, 2, Color::rgba(5, 5, 5, 99));
        sharpen(&mut buf);
        assert_eq!(buf.pixel(2, 2).alpha, 99);
        assert_eq!(buf.pixel(0, 0).alpha, 0);
    }

    #[test]
    fn flip_horizontal() {
        let mut buf = gradient(3, 2);
        flip(&mut buf, Flip::Horizontal);
        assert_eq!(buf.pixel(0, 0).red, 20);
        assert_eq!(buf.pixel(2, 1).red, 0);
        assert_eq!(buf.pixel(0, 1).green, 10);
    }

    #[test]
    fn flip_vertical() {
        let mut buf = gradient(2, 3);
        flip(&mut buf, Flip::Vertical);
        assert_eq!(buf.pixel(0, 0).green, 20);
        assert_eq!(buf.pixel(1, 1).green, 10);
        assert_eq!(buf.pixel(1, 2).green, 0);
        assert_eq!(buf.pixel(1, 2).red, 10);
    }

    #[test]
    fn flip_both_twice_is_identity() {
        let original = gradient(5, 4);
        let mut buf = original.clone();
        flip(&mut buf, Flip::Both);
        assert_ne!(buf, original);
        flip(&mut buf, Flip::Both);
        assert_eq!(buf, original);
    }

    #[test]
    fn crop_copies_region() {
        let src = gradient(10, 10);
        let out = crop(&src, CropRect { x: 2, y: 3, width: 4, height: 5 }).unwrap();
        assert_eq!((out.width(), out.height()), (4, 5));
        assert_eq!(out.pixel(0, 0), src.pixel(2, 3));
        assert_eq!(out.pixel(3, 4), src.pixel(5, 7));
    }

    #[test]
    fn crop_empty_is_rejected() {
        let src = gradient(10, 10);
        let err = crop(&src, CropRect { x: 0, y: 0, width: 0, height: 5 });
        assert!(matches!(err, Err(ImageError::InvalidDimensions(_))));
    }
}
