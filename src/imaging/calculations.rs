//! Pure calculation functions for resize and crop geometry.
//!
//! All functions here are pure and testable without any I/O or pixels.
//! They validate their arguments, so a malformed request fails before the
//! caller allocates a buffer.

use super::error::{ImageError, Result};
use super::params::{Dimension, ResizeFlags};

/// Mirror to apply after resampling, derived from negative requested sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    Horizontal,
    Vertical,
    Both,
}

/// Crop rectangle in source coordinates.
///
/// `width`/`height` may come out zero or negative for pathological input;
/// callers treat that as an empty crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl CropRect {
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Calculate target dimensions for a resize.
///
/// Sign is ignored for sizing (see [`flip_for`] for what it means instead).
/// Percentages resolve against the matching source axis; when both axes
/// are percentages the request always stretches.
///
/// # Examples
/// ```
/// # use rasterkit::imaging::{calculate_resize_size, Dimension, ResizeFlags};
/// // Fit 800x600 into a 400px-wide box → 400x300
/// let size = calculate_resize_size(
///     800, 600, Dimension::Pixels(400), Dimension::Pixels(0), ResizeFlags::FIT,
/// ).unwrap();
/// assert_eq!(size, (400, 300));
/// ```
pub fn calculate_resize_size(
    src_w: u32,
    src_h: u32,
    req_w: Dimension,
    req_h: Dimension,
    flags: ResizeFlags,
) -> Result<(u32, u32)> {
    let mut flags = flags;
    let (src_wf, src_hf) = (f64::from(src_w), f64::from(src_h));

    let new_w = req_w.abs().resolve(i64::from(src_w));
    let new_h = req_h.abs().resolve(i64::from(src_h));
    if matches!(req_w, Dimension::Percent(_)) && matches!(req_h, Dimension::Percent(_)) {
        flags |= ResizeFlags::STRETCH;
    }

    let (w, h) = if flags.contains(ResizeFlags::STRETCH) {
        if new_w == 0 || new_h == 0 {
            return Err(ImageError::invalid_dimensions(
                "for stretching both width and height must be specified",
            ));
        }
        if flags.contains(ResizeFlags::SHRINK_ONLY) {
            (
                (src_wf * (new_w as f64 / src_wf).min(1.0)).round() as i64,
                (src_hf * (new_h as f64 / src_hf).min(1.0)).round() as i64,
            )
        } else {
            (new_w, new_h)
        }
    } else {
        if new_w == 0 && new_h == 0 {
            return Err(ImageError::invalid_dimensions(
                "at least width or height must be specified",
            ));
        }

        let mut scales = Vec::with_capacity(3);
        if new_w > 0 {
            scales.push(new_w as f64 / src_wf);
        }
        if new_h > 0 {
            scales.push(new_h as f64 / src_hf);
        }
        if flags.contains(ResizeFlags::FILL) {
            let max = scales.iter().copied().fold(f64::MIN, f64::max);
            scales = vec![max];
        }
        if flags.contains(ResizeFlags::SHRINK_ONLY) {
            scales.push(1.0);
        }

        let scale = scales.iter().copied().fold(f64::MAX, f64::min);
        ((src_wf * scale).round() as i64, (src_hf * scale).round() as i64)
    };

    Ok((clamp_extent(w), clamp_extent(h)))
}

fn clamp_extent(v: i64) -> u32 {
    v.clamp(1, i64::from(u32::MAX)) as u32
}

/// Mirror implied by the sign of the requested width/height.
pub fn flip_for(req_w: Dimension, req_h: Dimension) -> Option<Flip> {
    match (req_w.is_negative(), req_h.is_negative()) {
        (true, true) => Some(Flip::Both),
        (true, false) => Some(Flip::Horizontal),
        (false, true) => Some(Flip::Vertical),
        (false, false) => None,
    }
}

/// Calculate the crop rectangle within a `src_w` × `src_h` source.
///
/// Percentage offsets are measured against the slack (`src - crop`), so
/// `50%` centers the crop. A negative offset trims the crop by the same
/// amount and is then clamped to zero.
pub fn calculate_crop_rect(
    src_w: u32,
    src_h: u32,
    left: Dimension,
    top: Dimension,
    req_w: Dimension,
    req_h: Dimension,
) -> CropRect {
    let (src_w, src_h) = (i64::from(src_w), i64::from(src_h));

    let mut width = req_w.resolve(src_w);
    let mut height = req_h.resolve(src_h);
    let mut x = left.resolve(src_w.saturating_sub(width));
    let mut y = top.resolve(src_h.saturating_sub(height));

    if x < 0 {
        width = width.saturating_add(x);
        x = 0;
    }
    if y < 0 {
        height = height.saturating_add(y);
        y = 0;
    }

    CropRect {
        x,
        y,
        width: width.min(src_w - x),
        height: height.min(src_h - y),
    }
}

/// Resolve a placement offset: percentages are measured against the slack
/// between destination and source extents.
pub fn resolve_offset(offset: Dimension, dest_len: u32, src_len: u32) -> i64 {
    offset.resolve(i64::from(dest_len) - i64::from(src_len))
}
