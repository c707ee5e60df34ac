//! Format registry: identifiers, extensions, MIME types and content sniffing.
//!
//! Detection always looks at the bytes, never at the file name. A `.png`
//! file holding JPEG data is reported as JPEG, and a file with no image
//! signature at all is reported as `None` rather than as an error.

use super::error::{ImageError, Result};
use serde::Serialize;
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Fewer bytes than this can't be told apart (RIFF....WEBP needs 12).
pub const MIN_HEADER_BYTES: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
    Bmp,
}

/// Registration table. `jpg` is an alias accepted only on input.
const EXTENSIONS: &[(&str, ImageFormat)] = &[
    ("jpeg", ImageFormat::Jpeg),
    ("jpg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("gif", ImageFormat::Gif),
    ("webp", ImageFormat::Webp),
    ("bmp", ImageFormat::Bmp),
];

impl ImageFormat {
    pub const ALL: [ImageFormat; 5] = [
        ImageFormat::Jpeg,
        ImageFormat::Png,
        ImageFormat::Gif,
        ImageFormat::Webp,
        ImageFormat::Bmp,
    ];

    /// Canonical lowercase extension.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
            ImageFormat::Bmp => "bmp",
        }
    }

    pub fn mime_type(self) -> String {
        format!("image/{}", self.extension())
    }

    /// Look up a format by file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Result<Self> {
        let lower = ext.to_ascii_lowercase();
        EXTENSIONS
            .iter()
            .find(|(e, _)| *e == lower)
            .map(|(_, fmt)| *fmt)
            .ok_or_else(|| ImageError::UnsupportedFormat(format!("file extension '{lower}'")))
    }

    /// Derive the output format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }

    pub(crate) fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Webp => image::ImageFormat::WebP,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
        }
    }

    fn from_image_format(fmt: image::ImageFormat) -> Option<Self> {
        match fmt {
            image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
            image::ImageFormat::Png => Some(ImageFormat::Png),
            image::ImageFormat::Gif => Some(ImageFormat::Gif),
            image::ImageFormat::WebP => Some(ImageFormat::Webp),
            image::ImageFormat::Bmp => Some(ImageFormat::Bmp),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Sniff the format from leading bytes.
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.len() < MIN_HEADER_BYTES {
        return None;
    }
    image::guess_format(bytes)
        .ok()
        .and_then(ImageFormat::from_image_format)
}

/// Sniff the format of a file's content. Missing or unreadable files
/// report `None`, same as unrecognized content.
pub fn detect_format_from_file(path: &Path) -> Option<ImageFormat> {
    let file = std::fs::File::open(path).ok()?;
    let mut header = Vec::with_capacity(64);
    file.take(64).read_to_end(&mut header).ok()?;
    detect_format(&header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_and_mime() {
        assert_eq!(ImageFormat::Jpeg.extension(), "jpeg");
        assert_eq!(ImageFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(ImageFormat::Webp.mime_type(), "image/webp");
        assert_eq!(ImageFormat::Bmp.to_string(), "bmp");
    }

    #[test]
    fn from_extension_is_case_insensitive_with_jpg_alias() {
        assert_eq!(ImageFormat::from_extension("JPG").unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("jpeg").unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("Png").unwrap(), ImageFormat::Png);
    }

    #[test]
    fn from_extension_rejects_unknown() {
        assert!(matches!(
            ImageFormat::from_extension("tiff"),
            Err(ImageError::UnsupportedFormat(_))
        ));
        assert!(ImageFormat::from_path(Path::new("/out/noext")).is_err());
    }

    #[test]
    fn detect_ignores_short_input() {
        assert_eq!(detect_format(b"GIF89a"), None);
        assert_eq!(detect_format(b""), None);
    }

    #[test]
    fn detect_known_signatures() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        assert_eq!(detect_format(png), Some(ImageFormat::Png));

        let gif = b"GIF89a\x01\x00\x01\x00\x80\x00\x00";
        assert_eq!(detect_format(gif), Some(ImageFormat::Gif));

        let webp = b"RIFF\x24\x00\x00\x00WEBPVP8 ";
        assert_eq!(detect_format(webp), Some(ImageFormat::Webp));

        let jpeg = b"\xff\xd8\xff\xe0\x00\x10JFIF\x00\x01";
        assert_eq!(detect_format(jpeg), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn detect_plain_text_is_none() {
        assert_eq!(detect_format(b"hello world, not an image"), None);
    }

    #[test]
    fn detect_from_file_uses_content_not_name() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("actually-gif.png");
        std::fs::write(&path, b"GIF89a\x01\x00\x01\x00\x80\x00\x00\x00\x00").unwrap();
        assert_eq!(detect_format_from_file(&path), Some(ImageFormat::Gif));

        let txt = tmp.path().join("empty.txt");
        std::fs::write(&txt, b"hello").unwrap();
        assert_eq!(detect_format_from_file(&txt), None);

        assert_eq!(detect_format_from_file(&tmp.path().join("missing.jpg")), None);
    }
}
