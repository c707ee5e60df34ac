//! Property-based tests for resize/crop geometry and placement.
//!
//! 1. FIT with only a width hits that width exactly and keeps the ratio.
//! 2. Feeding a FIT result back as a two-sided box for the same source
//!    stays inside that box and touches it on at least one side.
//! 3. SHRINK_ONLY never grows either side, for pixel and percent requests.
//! 4. EXACT always lands on the requested size.
//! 5. place at opacity 0 leaves the destination untouched.
//! 6. place at opacity 100 copies the source, alpha included.

use proptest::prelude::*;
use rasterkit::imaging::compositor;
use rasterkit::imaging::{
    Color, Dimension, ImageDocument, PixelBuffer, PixelSurface, ResizeFlags,
    calculate_crop_rect, calculate_resize_size,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn color() -> impl Strategy<Value = Color> {
    (0i32..=255, 0i32..=255, 0i32..=255, 0i32..=127)
        .prop_map(|(r, g, b, a)| Color::rgba(r, g, b, a))
}

fn buffer(max_side: u32) -> impl Strategy<Value = PixelBuffer> {
    (1..=max_side, 1..=max_side).prop_flat_map(|(w, h)| {
        proptest::collection::vec(color(), (w * h) as usize).prop_map(move |pixels| {
            let mut buf = PixelBuffer::new(w, h).unwrap();
            buf.pixels_mut().copy_from_slice(&pixels);
            buf
        })
    })
}

/// Pixel or percent request, including 0 (unspecified).
fn dimension() -> impl Strategy<Value = Dimension> {
    prop_oneof![
        (0i64..6000).prop_map(Dimension::Pixels),
        (0.0f64..300.0).prop_map(Dimension::Percent),
    ]
}

fn shrink_flags() -> impl Strategy<Value = ResizeFlags> {
    prop_oneof![
        Just(ResizeFlags::FIT),
        Just(ResizeFlags::FILL),
        Just(ResizeFlags::STRETCH),
    ]
    .prop_map(|f| f | ResizeFlags::SHRINK_ONLY)
}

// ═════════════════════════════════════════════════════════════════════════
// 1–3. resize geometry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fit_width_only_is_exact(src_w in 1u32..4000, src_h in 1u32..4000, req_w in 1i64..4000) {
        let (w, h) = calculate_resize_size(
            src_w, src_h, Dimension::Pixels(req_w), Dimension::Pixels(0), ResizeFlags::FIT,
        ).unwrap();
        prop_assert_eq!(i64::from(w), req_w);

        let expected = f64::from(src_h) * req_w as f64 / f64::from(src_w);
        prop_assert!(
            (f64::from(h) - expected).abs() <= 1.0,
            "height {} too far from {}", h, expected
        );
    }

    #[test]
    fn fit_result_refits_its_own_box(
        src_w in 1u32..4000, src_h in 1u32..4000,
        req_w in 0i64..4000, req_h in 0i64..4000,
    ) {
        prop_assume!(req_w > 0 || req_h > 0);
        let (w1, h1) = calculate_resize_size(
            src_w, src_h, Dimension::Pixels(req_w), Dimension::Pixels(req_h), ResizeFlags::FIT,
        ).unwrap();
        let (w2, h2) = calculate_resize_size(
            src_w, src_h, Dimension::Pixels(i64::from(w1)), Dimension::Pixels(i64::from(h1)), ResizeFlags::FIT,
        ).unwrap();
        prop_assert!(w2 <= w1 && h2 <= h1, "{}x{} left the {}x{} box", w2, h2, w1, h1);
        prop_assert!(w2 == w1 || h2 == h1, "{}x{} touches no side of {}x{}", w2, h2, w1, h1);
    }

    #[test]
    fn shrink_only_never_grows(
        src_w in 1u32..3000, src_h in 1u32..3000,
        req_w in dimension(), req_h in dimension(),
        flags in shrink_flags(),
    ) {
        if let Ok((w, h)) = calculate_resize_size(src_w, src_h, req_w, req_h, flags) {
            prop_assert!(w <= src_w, "width grew {} -> {}", src_w, w);
            prop_assert!(h <= src_h, "height grew {} -> {}", src_h, h);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. EXACT
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn exact_hits_requested_size(
        src_w in 1u32..48, src_h in 1u32..48,
        target_w in 1i64..48, target_h in 1i64..48,
    ) {
        let mut doc = ImageDocument::blank(src_w, src_h, Some(Color::rgb(10, 20, 30))).unwrap();
        doc.resize(Dimension::Pixels(target_w), Dimension::Pixels(target_h), ResizeFlags::EXACT)
            .unwrap();
        prop_assert_eq!((i64::from(doc.width()), i64::from(doc.height())), (target_w, target_h));
    }
}

#[test]
fn crop_negative_left_trims_width() {
    let rect = calculate_crop_rect(
        100,
        100,
        Dimension::Pixels(-10),
        Dimension::Pixels(0),
        Dimension::Pixels(50),
        Dimension::Pixels(50),
    );
    assert_eq!((rect.x, rect.y, rect.width, rect.height), (0, 0, 40, 50));
}

// ═════════════════════════════════════════════════════════════════════════
// 5–6. place
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn zero_opacity_is_a_no_op(
        dest in buffer(12), src in buffer(12),
        left in -16i64..16, top in -16i64..16,
    ) {
        let mut out = dest.clone();
        compositor::place(&mut out, &src, left, top, 0);
        prop_assert_eq!(out, dest);
    }

    #[test]
    fn full_opacity_copies_in_bounds(dest in buffer(16), src in buffer(8), fx in 0.0f64..=1.0, fy in 0.0f64..=1.0) {
        prop_assume!(src.width() <= dest.width() && src.height() <= dest.height());
        let left = (f64::from(dest.width() - src.width()) * fx).floor() as i64;
        let top = (f64::from(dest.height() - src.height()) * fy).floor() as i64;

        let mut out = dest.clone();
        compositor::place(&mut out, &src, left, top, 100);

        for y in 0..dest.height() {
            for x in 0..dest.width() {
                let inside = i64::from(x) >= left
                    && i64::from(x) < left + i64::from(src.width())
                    && i64::from(y) >= top
                    && i64::from(y) < top + i64::from(src.height());
                let expected = if inside {
                    src.pixel((i64::from(x) - left) as u32, (i64::from(y) - top) as u32)
                } else {
                    dest.pixel(x, y)
                };
                prop_assert_eq!(out.pixel(x, y), expected, "at ({}, {})", x, y);
            }
        }
    }
}
