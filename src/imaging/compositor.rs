//! Placing one surface onto another with a scalar opacity.
//!
//! Placement substitutes pixels: the (possibly opacity-adjusted) source
//! pixel replaces the destination pixel, alpha included. It does not blend
//! over what was there before. Only the overlap of the two surfaces is
//! written; offsets may put the source partly or wholly outside.

use super::params::{ALPHA_TRANSPARENT, Color};
use super::surface::PixelSurface;

/// Build the alpha remap table for `opacity` (0–100).
///
/// Only the opaque fraction is scaled, so a fully transparent source pixel
/// stays fully transparent at any opacity.
pub fn opacity_table(opacity: u8) -> [u8; 128] {
    let opacity = f64::from(opacity.min(100));
    let mut table = [0u8; 128];
    for (a, slot) in table.iter_mut().enumerate() {
        let max = f64::from(ALPHA_TRANSPARENT);
        *slot = (max - (max - a as f64) * opacity / 100.0).round() as u8;
    }
    table
}

/// Write `src` into `dest` with its top-left corner at (`left`, `top`).
///
/// `opacity` is clamped to 0..=100. At 0 nothing is written; at 100 pixels
/// are copied verbatim. `src` is only read.
pub fn place<D, S>(dest: &mut D, src: &S, left: i64, top: i64, opacity: i32)
where
    D: PixelSurface + ?Sized,
    S: PixelSurface + ?Sized,
{
    let opacity = opacity.clamp(0, 100) as u8;
    if opacity == 0 {
        return;
    }
    let table = (opacity < 100).then(|| opacity_table(opacity));

    let x0 = left.max(0);
    let y0 = top.max(0);
    let x1 = left.saturating_add(i64::from(src.width())).min(i64::from(dest.width()));
    let y1 = top.saturating_add(i64::from(src.height())).min(i64::from(dest.height()));
    if x0 >= x1 || y0 >= y1 {
        tracing::debug!(left, top, "placement does not overlap destination");
        return;
    }

    for y in y0..y1 {
        for x in x0..x1 {
            let mut c: Color = src.pixel((x - left) as u32, (y - top) as u32);
            if let Some(table) = &table {
                c.alpha = table[usize::from(c.alpha.min(ALPHA_TRANSPARENT))];
            }
            dest.set_pixel(x as u32, y as u32, c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::surface::PixelBuffer;
    use crate::imaging::surface::tests::RecordingSurface;

    fn pattern(w: u32, h: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                buf.set_pixel(x, y, Color::rgba((x * 7) as i32, (y * 9) as i32, 3, ((x + y) % 128) as i32));
            }
        }
        buf
    }

    #[test]
    fn opacity_table_endpoints() {
        let half = opacity_table(50);
        assert_eq!(half[0], 64); // round(127 - 127 * 0.5) = round(63.5)
        assert_eq!(half[127], 127);
        assert_eq!(opacity_table(100)[0], 0);
        assert_eq!(opacity_table(100)[77], 77);
    }

    #[test]
    fn transparent_source_stays_transparent() {
        for opacity in [1u8, 33, 50, 99] {
            assert_eq!(opacity_table(opacity)[127], 127);
        }
    }

    #[test]
    fn opacity_zero_is_noop() {
        let mut dest = pattern(10, 10);
        let before = dest.clone();
        place(&mut dest, &pattern(4, 4), 2, 2, 0);
        assert_eq!(dest, before);
        place(&mut dest, &pattern(4, 4), 2, 2, -20);
        assert_eq!(dest, before);
    }

    #[test]
    fn full_opacity_copies_verbatim() {
        let mut dest = PixelBuffer::filled(10, 10, Color::rgb(255, 255, 255)).unwrap();
        let src = pattern(3, 4);
        place(&mut dest, &src, 5, 2, 100);
        for y in 0..4 {
            for x in 0..3 {
                assert_eq!(dest.pixel(5 + x, 2 + y), src.pixel(x, y));
            }
        }
        assert_eq!(dest.pixel(4, 2), Color::rgb(255, 255, 255));
        assert_eq!(dest.pixel(8, 2), Color::rgb(255, 255, 255));
    }

    #[test]
    fn partial_opacity_remaps_alpha_only() {
        let mut dest = PixelBuffer::new(2, 2).unwrap();
        let src = PixelBuffer::filled(1, 1, Color::rgba(10, 20, 30, 0)).unwrap();
        place(&mut dest, &src, 0, 0, 50);
        assert_eq!(dest.pixel(0, 0), Color::rgba(10, 20, 30, 64));
        assert_eq!(dest.pixel(1, 1), Color::TRANSPARENT);
    }

    #[test]
    fn opacity_above_100_is_clamped() {
        let mut dest = PixelBuffer::new(2, 2).unwrap();
        let src = PixelBuffer::filled(2, 2, Color::rgba(1, 2, 3, 10)).unwrap();
        place(&mut dest, &src, 0, 0, 250);
        assert_eq!(dest.pixel(1, 1), Color::rgba(1, 2, 3, 10));
    }

    #[test]
    fn out_of_bounds_writes_only_overlap() {
        let mut dest = RecordingSurface::new(4, 4, Color::TRANSPARENT);
        let src = pattern(3, 3);
        place(&mut dest, &src, -2, 3, 100);
        let writes = dest.written();
        // Overlap is x in 0..1, y in 3..4
        assert_eq!(writes, vec![(0, 3, src.pixel(2, 0))]);
    }

    #[test]
    fn fully_outside_writes_nothing() {
        let mut dest = RecordingSurface::new(4, 4, Color::TRANSPARENT);
        place(&mut dest, &pattern(3, 3), 10, 10, 100);
        place(&mut dest, &pattern(3, 3), -3, 0, 100);
        assert!(dest.written().is_empty());
    }

    #[test]
    fn extreme_offsets_write_nothing() {
        let mut dest = RecordingSurface::new(4, 4, Color::TRANSPARENT);
        let src = pattern(3, 3);
        for (left, top) in [
            (i64::MAX, 0),
            (0, i64::MAX),
            (i64::MIN, 0),
            (0, i64::MIN),
            (i64::MAX, i64::MIN),
        ] {
            place(&mut dest, &src, left, top, 100);
            place(&mut dest, &src, left, top, 50);
        }
        assert!(dest.written().is_empty());
    }
}
