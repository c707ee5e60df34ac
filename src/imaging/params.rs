//! Parameter types for image operations.
//!
//! These types describe *what* to do, not *how*. The
//! [`calculations`](super::calculations) module turns them into concrete
//! pixel geometry and the [`document`](super::document) façade applies it.
//!
//! ## Types
//!
//! - [`Color`]: one pixel value with inverted 7-bit alpha. Clamped on construction.
//! - [`Dimension`]: an absolute pixel count or a percentage of some reference length.
//! - [`ResizeFlags`]: FIT / FILL / STRETCH / SHRINK_ONLY / EXACT policy bits.
//! - [`ResizeSpec`], [`CropSpec`]: full argument sets for resize and crop.
//! - [`EncodeOptions`]: per-format default quality (JPEG 85, PNG 9, WEBP 80).

use super::error::{ImageError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alpha value for a fully transparent pixel. 0 is fully opaque.
pub const ALPHA_TRANSPARENT: u8 = 127;

/// RGBA pixel value using the inverted 7-bit alpha convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// 0 = fully opaque, 127 = fully transparent.
    pub alpha: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color {
        red: 0,
        green: 0,
        blue: 0,
        alpha: ALPHA_TRANSPARENT,
    };

    /// Opaque color. Out-of-range channels are clamped, never rejected.
    pub fn rgb(red: i32, green: i32, blue: i32) -> Self {
        Self::rgba(red, green, blue, 0)
    }

    pub fn rgba(red: i32, green: i32, blue: i32, alpha: i32) -> Self {
        Self {
            red: red.clamp(0, 255) as u8,
            green: green.clamp(0, 255) as u8,
            blue: blue.clamp(0, 255) as u8,
            alpha: alpha.clamp(0, ALPHA_TRANSPARENT as i32) as u8,
        }
    }

    /// Convert to straight 8-bit RGBA (255 = opaque).
    pub fn to_rgba8(self) -> [u8; 4] {
        let a = self.alpha.min(ALPHA_TRANSPARENT);
        [
            self.red,
            self.green,
            self.blue,
            255 - ((a << 1) + (a >> 6)),
        ]
    }

    /// Convert from straight 8-bit RGBA. Exact inverse of [`Color::to_rgba8`].
    pub fn from_rgba8(px: [u8; 4]) -> Self {
        Self {
            red: px[0],
            green: px[1],
            blue: px[2],
            alpha: ALPHA_TRANSPARENT - (px[3] >> 1),
        }
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parses `r,g,b` or `r,g,b,alpha`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<i32> = s
            .split(',')
            .map(|p| p.trim().parse::<i32>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| format!("invalid color '{s}': {e}"))?;
        match parts.as_slice() {
            [r, g, b] => Ok(Color::rgb(*r, *g, *b)),
            [r, g, b, a] => Ok(Color::rgba(*r, *g, *b, *a)),
            _ => Err(format!("invalid color '{s}': expected r,g,b[,alpha]")),
        }
    }
}

/// A length argument: absolute pixels or a percentage.
///
/// `Pixels(0)` means "unspecified" for resize requests. Negative values are
/// meaningful: for resize they request a mirror, for crop/place offsets they
/// shift the origin outside the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Pixels(i64),
    Percent(f64),
}

impl Dimension {
    pub const UNSPECIFIED: Dimension = Dimension::Pixels(0);

    /// Accepts `"120"`, `"-40"` or `"50%"`. Anything else is
    /// [`ImageError::InvalidDimensionType`].
    pub fn parse(s: &str) -> Result<Self> {
        let t = s.trim();
        if let Some(num) = t.strip_suffix('%') {
            return num
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Dimension::Percent)
                .ok_or_else(|| ImageError::InvalidDimensionType(s.to_string()));
        }
        t.parse::<i64>()
            .map(Dimension::Pixels)
            .map_err(|_| ImageError::InvalidDimensionType(s.to_string()))
    }

    pub fn is_negative(self) -> bool {
        match self {
            Dimension::Pixels(n) => n < 0,
            Dimension::Percent(p) => p < 0.0,
        }
    }

    pub fn abs(self) -> Self {
        match self {
            Dimension::Pixels(n) => Dimension::Pixels(n.saturating_abs()),
            Dimension::Percent(p) => Dimension::Percent(p.abs()),
        }
    }

    /// Resolve against a reference length: percentages become
    /// `round(reference * pct / 100)`, pixels pass through.
    pub fn resolve(self, reference: i64) -> i64 {
        match self {
            Dimension::Pixels(n) => n,
            Dimension::Percent(p) => (reference as f64 / 100.0 * p).round() as i64,
        }
    }
}

impl From<i64> for Dimension {
    fn from(n: i64) -> Self {
        Dimension::Pixels(n)
    }
}

impl From<u32> for Dimension {
    fn from(n: u32) -> Self {
        Dimension::Pixels(i64::from(n))
    }
}

impl FromStr for Dimension {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self> {
        Dimension::parse(s)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Pixels(n) => write!(f, "{n}"),
            Dimension::Percent(p) => write!(f, "{p}%"),
        }
    }
}

bitflags::bitflags! {
    /// Resize policy. The empty set is FIT.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ResizeFlags: u8 {
        const FIT         = 0b0000;
        const SHRINK_ONLY = 0b0001;
        const STRETCH     = 0b0010;
        const FILL        = 0b0100;
        const EXACT       = 0b1000;
    }
}

/// Full argument set for a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSpec {
    pub width: Dimension,
    pub height: Dimension,
    pub flags: ResizeFlags,
}

impl ResizeSpec {
    pub fn new(width: impl Into<Dimension>, height: impl Into<Dimension>) -> Self {
        Self {
            width: width.into(),
            height: height.into(),
            flags: ResizeFlags::FIT,
        }
    }

    pub fn with_flags(mut self, flags: ResizeFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Full argument set for a crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropSpec {
    pub left: Dimension,
    pub top: Dimension,
    pub width: Dimension,
    pub height: Dimension,
}

/// Default encode quality per format.
///
/// JPEG and WEBP take 0–100, PNG takes a zlib compression level 0–9.
/// GIF and BMP have no quality parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub jpeg_quality: u8,
    pub png_compression: u8,
    pub webp_quality: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 85,
            png_compression: 9,
            webp_quality: 80,
        }
    }
}
