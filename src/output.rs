//! CLI output formatting for every command.
//!
//! Output leads with the thing the user asked about (a file, a batch) and
//! puts detail on indented context lines, the same shape for every command:
//!
//! ```text
//! photo.jpg
//!     Format: jpeg (image/jpeg)
//!     Size: 1200x800
//! ```
//!
//! ## Batch
//!
//! ```text
//! album/001.jpg → out/album/001.webp (400x300)
//! album/002.jpg → out/album/002.webp (300x400)
//! broken.png
//!     Error: Unknown type of image.
//!
//! Processed 2 images, 1 failed
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::batch::BatchReport;
use crate::imaging::{ImageDocument, ImageFormat};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Pluralize `noun` for `n`.
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Make `path` relative to `root` for display, if it lives under it.
fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================================
// identify
// ============================================================================

/// What `identify` reports about one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub format: ImageFormat,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub true_color: bool,
}

impl ImageInfo {
    pub fn new(path: &Path, format: ImageFormat, doc: &ImageDocument) -> Self {
        Self {
            path: path.to_path_buf(),
            format,
            mime_type: format.mime_type(),
            width: doc.width(),
            height: doc.height(),
            true_color: doc.is_true_color(),
        }
    }
}

/// Format `identify` results, one block per file.
pub fn format_identify(results: &[(PathBuf, Result<ImageInfo, String>)]) -> Vec<String> {
    let mut lines = Vec::new();
    for (path, result) in results {
        lines.push(path.display().to_string());
        match result {
            Ok(info) => {
                lines.push(format!(
                    "{}Format: {} ({})",
                    indent(1),
                    info.format,
                    info.mime_type
                ));
                lines.push(format!("{}Size: {}x{}", indent(1), info.width, info.height));
                if !info.true_color {
                    lines.push(format!("{}Palette", indent(1)));
                }
            }
            Err(e) => lines.push(format!("{}Error: {}", indent(1), e)),
        }
    }
    lines
}

pub fn print_identify(results: &[(PathBuf, Result<ImageInfo, String>)]) {
    for line in format_identify(results) {
        println!("{}", line);
    }
}

// ============================================================================
// single-file transforms
// ============================================================================

/// Format the one-line result of resize / crop / place / convert / blank.
///
/// ```text
/// photo.jpg → thumb.webp (400x300)
/// ```
pub fn format_written(source: Option<&Path>, output: &Path, doc: &ImageDocument) -> String {
    match source {
        Some(src) => format!(
            "{} \u{2192} {} ({}x{})",
            src.display(),
            output.display(),
            doc.width(),
            doc.height()
        ),
        None => format!("{} ({}x{})", output.display(), doc.width(), doc.height()),
    }
}

pub fn print_written(source: Option<&Path>, output: &Path, doc: &ImageDocument) {
    println!("{}", format_written(source, output, doc));
}

// ============================================================================
// batch
// ============================================================================

/// Format a batch report. Paths are shown relative to the input directory
/// (sources) and as given (outputs).
pub fn format_batch_report(report: &BatchReport, input_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for out in &report.outputs {
        lines.push(format!(
            "{} \u{2192} {} ({}x{})",
            display_relative(&out.source, input_root),
            out.output.display(),
            out.width,
            out.height
        ));
    }
    for failure in &report.failures {
        lines.push(display_relative(&failure.source, input_root));
        lines.push(format!("{}Error: {}", indent(1), failure.error));
    }

    lines.push(String::new());
    let mut summary = format!("Processed {}", count(report.outputs.len(), "image"));
    if !report.failures.is_empty() {
        summary.push_str(&format!(", {} failed", report.failures.len()));
    }
    lines.push(summary);
    lines
}

pub fn print_batch_report(report: &BatchReport, input_root: &Path) {
    for line in format_batch_report(report, input_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BatchFailure, BatchOutput};

    fn info(path: &str, w: u32, h: u32) -> ImageInfo {
        let doc = ImageDocument::blank(w, h, None).unwrap();
        ImageInfo::new(Path::new(path), ImageFormat::Png, &doc)
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn count_pluralizes() {
        assert_eq!(count(1, "image"), "1 image");
        assert_eq!(count(0, "image"), "0 images");
        assert_eq!(count(3, "image"), "3 images");
    }

    #[test]
    fn identify_success_block() {
        let lines = format_identify(&[(PathBuf::from("a.png"), Ok(info("a.png", 4, 3)))]);
        assert_eq!(
            lines,
            vec!["a.png", "    Format: png (image/png)", "    Size: 4x3"]
        );
    }

    #[test]
    fn identify_error_block() {
        let lines = format_identify(&[(
            PathBuf::from("x.txt"),
            Err("Unknown type of file 'x.txt'.".to_string()),
        )]);
        assert_eq!(lines[0], "x.txt");
        assert_eq!(lines[1], "    Error: Unknown type of file 'x.txt'.");
    }

    #[test]
    fn identify_info_serializes_lowercase_format() {
        let json = serde_json::to_value(info("a.png", 2, 2)).unwrap();
        assert_eq!(json["format"], "png");
        assert_eq!(json["mime_type"], "image/png");
        assert_eq!(json["width"], 2);
    }

    #[test]
    fn written_line() {
        let doc = ImageDocument::blank(40, 30, None).unwrap();
        assert_eq!(
            format_written(Some(Path::new("in.jpg")), Path::new("out.webp"), &doc),
            "in.jpg \u{2192} out.webp (40x30)"
        );
        assert_eq!(
            format_written(None, Path::new("blank.png"), &doc),
            "blank.png (40x30)"
        );
    }

    #[test]
    fn batch_report_lines() {
        let report = BatchReport {
            outputs: vec![BatchOutput {
                source: PathBuf::from("/in/album/001.jpg"),
                output: PathBuf::from("/out/album/001.webp"),
                width: 400,
                height: 300,
            }],
            failures: vec![BatchFailure {
                source: PathBuf::from("/in/broken.png"),
                error: "Unknown type of image.".to_string(),
            }],
        };
        let lines = format_batch_report(&report, Path::new("/in"));
        assert_eq!(lines[0], "album/001.jpg \u{2192} /out/album/001.webp (400x300)");
        assert_eq!(lines[1], "broken.png");
        assert_eq!(lines[2], "    Error: Unknown type of image.");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Processed 1 image, 1 failed");
    }

    #[test]
    fn batch_report_all_good() {
        let lines = format_batch_report(&BatchReport::default(), Path::new("/in"));
        assert_eq!(lines, vec!["", "Processed 0 images"]);
    }
}
