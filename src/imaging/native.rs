//! Named pixel operations, looked up by string at runtime.
//!
//! [`ImageDocument::invoke`](super::document::ImageDocument::invoke) forwards
//! here for operations that have no dedicated method. The table is static;
//! an unknown name fails with [`ImageError::UnsupportedOperation`] and, when
//! one is close enough, the nearest known name as a suggestion.

use super::calculations::Flip;
use super::error::{ImageError, Result};
use super::filters;
use super::params::Color;
use super::surface::{PixelBuffer, PixelSurface};

/// Argument to a named operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OpArg {
    Int(i64),
    Color(Color),
    Text(String),
}

/// Result of a named operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpValue {
    Unit,
    Color(Color),
}

type OpFn = fn(&mut PixelBuffer, &[OpArg]) -> Result<OpValue>;

const OPERATIONS: &[(&str, OpFn)] = &[
    ("flip", op_flip),
    ("grayscale", op_grayscale),
    ("negate", op_negate),
    ("brightness", op_brightness),
    ("fill", op_fill),
    ("set_pixel", op_set_pixel),
    ("color_at", op_color_at),
    ("rotate180", op_rotate180),
];

/// Names of every registered operation.
pub fn operation_names() -> impl Iterator<Item = &'static str> {
    OPERATIONS.iter().map(|(name, _)| *name)
}

/// Run the operation called `name` on `buf`.
pub fn invoke(buf: &mut PixelBuffer, name: &str, args: &[OpArg]) -> Result<OpValue> {
    match OPERATIONS.iter().find(|(n, _)| *n == name) {
        Some((_, op)) => {
            tracing::debug!(name, "invoking named operation");
            op(buf, args)
        }
        None => Err(ImageError::UnsupportedOperation {
            name: name.to_string(),
            suggestion: suggest(operation_names(), name).map(str::to_string),
        }),
    }
}

/// Pick the candidate closest to `value` by weighted edit distance
/// (insert 10, replace 11, delete 10), if any is under
/// `(len / 4 + 1) * 10`.
pub fn suggest<'a>(candidates: impl IntoIterator<Item = &'a str>, value: &str) -> Option<&'a str> {
    let mut best = None;
    let mut min = (value.len() as f64 / 4.0 + 1.0) * 10.0 + 0.1;
    for item in candidates {
        if item == value {
            continue;
        }
        let dist = f64::from(weighted_levenshtein(item, value, 10, 11, 10));
        if dist < min {
            min = dist;
            best = Some(item);
        }
    }
    best
}

/// Cost of turning `from` into `to`.
fn weighted_levenshtein(from: &str, to: &str, ins: u32, rep: u32, del: u32) -> u32 {
    let a = from.as_bytes();
    let b = to.as_bytes();
    let mut prev: Vec<u32> = (0..=b.len() as u32).map(|j| j * ins).collect();
    let mut cur = vec![0u32; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        cur[0] = (i as u32 + 1) * del;
        for (j, cb) in b.iter().enumerate() {
            let replace = prev[j] + if ca == cb { 0 } else { rep };
            let insert = cur[j] + ins;
            let delete = prev[j + 1] + del;
            cur[j + 1] = replace.min(insert).min(delete);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

fn arg_int(args: &[OpArg], i: usize, op: &str) -> Result<i64> {
    match args.get(i) {
        Some(OpArg::Int(n)) => Ok(*n),
        other => Err(bad_arg(op, i, "integer", other)),
    }
}

fn arg_color(args: &[OpArg], i: usize, op: &str) -> Result<Color> {
    match args.get(i) {
        Some(OpArg::Color(c)) => Ok(*c),
        other => Err(bad_arg(op, i, "color", other)),
    }
}

fn bad_arg(op: &str, i: usize, expected: &str, got: Option<&OpArg>) -> ImageError {
    ImageError::InvalidArgument(format!(
        "{op}() argument #{i}: expected {expected}, got {got:?}"
    ))
}

fn arg_point(buf: &PixelBuffer, args: &[OpArg], op: &str) -> Result<(u32, u32)> {
    let x = arg_int(args, 0, op)?;
    let y = arg_int(args, 1, op)?;
    if x < 0 || y < 0 || x >= i64::from(buf.width()) || y >= i64::from(buf.height()) {
        return Err(ImageError::invalid_dimensions(format!(
            "{op}: ({x}, {y}) is outside {}x{}",
            buf.width(),
            buf.height()
        )));
    }
    Ok((x as u32, y as u32))
}

/// `flip("horizontal" | "vertical" | "both")`, or 1 / 2 / 3.
fn op_flip(buf: &mut PixelBuffer, args: &[OpArg]) -> Result<OpValue> {
    let mode = match args.first() {
        Some(OpArg::Text(t)) if t == "horizontal" => Flip::Horizontal,
        Some(OpArg::Text(t)) if t == "vertical" => Flip::Vertical,
        Some(OpArg::Text(t)) if t == "both" => Flip::Both,
        Some(OpArg::Int(1)) => Flip::Horizontal,
        Some(OpArg::Int(2)) => Flip::Vertical,
        Some(OpArg::Int(3)) => Flip::Both,
        other => return Err(bad_arg("flip", 0, "flip mode", other)),
    };
    filters::flip(buf, mode);
    Ok(OpValue::Unit)
}

fn op_rotate180(buf: &mut PixelBuffer, _args: &[OpArg]) -> Result<OpValue> {
    filters::flip(buf, Flip::Both);
    Ok(OpValue::Unit)
}

fn op_grayscale(buf: &mut PixelBuffer, _args: &[OpArg]) -> Result<OpValue> {
    for c in buf.pixels_mut() {
        let luma = (0.299 * f64::from(c.red) + 0.587 * f64::from(c.green) + 0.114 * f64::from(c.blue))
            .round() as u8;
        c.red = luma;
        c.green = luma;
        c.blue = luma;
    }
    Ok(OpValue::Unit)
}

fn op_negate(buf: &mut PixelBuffer, _args: &[OpArg]) -> Result<OpValue> {
    for c in buf.pixels_mut() {
        c.red = 255 - c.red;
        c.green = 255 - c.green;
        c.blue = 255 - c.blue;
    }
    Ok(OpValue::Unit)
}

/// `brightness(level)`, level clamped to -255..=255.
fn op_brightness(buf: &mut PixelBuffer, args: &[OpArg]) -> Result<OpValue> {
    let level = arg_int(args, 0, "brightness")?.clamp(-255, 255) as i32;
    for c in buf.pixels_mut() {
        *c = Color::rgba(
            i32::from(c.red) + level,
            i32::from(c.green) + level,
            i32::from(c.blue) + level,
            i32::from(c.alpha),
        );
    }
    Ok(OpValue::Unit)
}

fn op_fill(buf: &mut PixelBuffer, args: &[OpArg]) -> Result<OpValue> {
    buf.fill(arg_color(args, 0, "fill")?);
    Ok(OpValue::Unit)
}

fn op_set_pixel(buf: &mut PixelBuffer, args: &[OpArg]) -> Result<OpValue> {
    let (x, y) = arg_point(buf, args, "set_pixel")?;
    let color = arg_color(args, 2, "set_pixel")?;
    buf.set_pixel(x, y, color);
    Ok(OpValue::Unit)
}

fn op_color_at(buf: &mut PixelBuffer, args: &[OpArg]) -> Result<OpValue> {
    let (x, y) = arg_point(buf, args, "color_at")?;
    Ok(OpValue::Color(buf.pixel(x, y)))
}
