//! Target format tokens: one canonicalization step, then a closed enum.
//!
//! Every format token the caller supplies — `"JPG"`, `"jpeg"`, `"Pdf"` —
//! passes through [`TargetFormat::parse`] exactly once before any table
//! lookup. Downstream code matches on the enum, so "unsupported format"
//! is a compile-time-checked variant match plus one explicit fallback arm,
//! never a scattered string comparison.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized output-format token.
///
/// The set is the union of every format the engine can *name* (the per-category
/// catalogs in [`crate::classify::FormatCategory::targets`]); whether a given
/// variant is actually reachable from a given source is the router's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Svg,
    Pdf,
    Docx,
    Txt,
    Mp3,
    Wav,
    Flac,
    Mp4,
    Mov,
    Mkv,
    Zip,
    SevenZ,
}

impl TargetFormat {
    /// Parse a caller-supplied token, case-insensitively.
    ///
    /// `jpg` and `jpeg` canonicalize to the same variant. Returns `None` for
    /// tokens outside the catalog; the router turns that into
    /// [`crate::error::ConvertError::Unsupported`].
    pub fn parse(token: &str) -> Option<Self> {
        let t = match token.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => TargetFormat::Jpeg,
            "png" => TargetFormat::Png,
            "webp" => TargetFormat::WebP,
            "gif" => TargetFormat::Gif,
            "svg" => TargetFormat::Svg,
            "pdf" => TargetFormat::Pdf,
            "docx" => TargetFormat::Docx,
            "txt" => TargetFormat::Txt,
            "mp3" => TargetFormat::Mp3,
            "wav" => TargetFormat::Wav,
            "flac" => TargetFormat::Flac,
            "mp4" => TargetFormat::Mp4,
            "mov" => TargetFormat::Mov,
            "mkv" => TargetFormat::Mkv,
            "zip" => TargetFormat::Zip,
            "7z" => TargetFormat::SevenZ,
            _ => return None,
        };
        Some(t)
    }

    /// The canonical lower-case token, used for output filenames.
    pub fn token(&self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "jpg",
            TargetFormat::Png => "png",
            TargetFormat::WebP => "webp",
            TargetFormat::Gif => "gif",
            TargetFormat::Svg => "svg",
            TargetFormat::Pdf => "pdf",
            TargetFormat::Docx => "docx",
            TargetFormat::Txt => "txt",
            TargetFormat::Mp3 => "mp3",
            TargetFormat::Wav => "wav",
            TargetFormat::Flac => "flac",
            TargetFormat::Mp4 => "mp4",
            TargetFormat::Mov => "mov",
            TargetFormat::Mkv => "mkv",
            TargetFormat::Zip => "zip",
            TargetFormat::SevenZ => "7z",
        }
    }

    /// The MIME type reported for converted output of this format.
    pub fn mime(&self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "image/jpeg",
            TargetFormat::Png => "image/png",
            TargetFormat::WebP => "image/webp",
            TargetFormat::Gif => "image/gif",
            TargetFormat::Svg => "image/svg+xml",
            TargetFormat::Pdf => "application/pdf",
            TargetFormat::Docx => crate::classify::DOCX_MIME,
            TargetFormat::Txt => "text/plain",
            TargetFormat::Mp3 => "audio/mp3",
            TargetFormat::Wav => "audio/wav",
            TargetFormat::Flac => "audio/flac",
            TargetFormat::Mp4 => "video/mp4",
            TargetFormat::Mov => "video/quicktime",
            TargetFormat::Mkv => "video/x-matroska",
            TargetFormat::Zip => "application/zip",
            TargetFormat::SevenZ => "application/x-7z-compressed",
        }
    }

    /// The raster encoding for this target, if it is one the image encoders
    /// can produce. SVG is a vector format and has no raster encoder.
    pub fn as_raster(&self) -> Option<RasterFormat> {
        match self {
            TargetFormat::Jpeg => Some(RasterFormat::Jpeg),
            TargetFormat::Png => Some(RasterFormat::Png),
            TargetFormat::WebP => Some(RasterFormat::WebP),
            TargetFormat::Gif => Some(RasterFormat::Gif),
            _ => None,
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The raster formats the image encoders can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RasterFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
}

impl RasterFormat {
    /// The `image` crate format selector for this encoding.
    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            RasterFormat::Jpeg => image::ImageFormat::Jpeg,
            RasterFormat::Png => image::ImageFormat::Png,
            RasterFormat::WebP => image::ImageFormat::WebP,
            RasterFormat::Gif => image::ImageFormat::Gif,
        }
    }

    /// MIME type of the encoded output.
    pub fn mime(&self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "image/jpeg",
            RasterFormat::Png => "image/png",
            RasterFormat::WebP => "image/webp",
            RasterFormat::Gif => "image/gif",
        }
    }

    /// JPEG cannot encode an alpha channel; transparent sources must be
    /// flattened against an opaque background before encoding.
    pub fn requires_flatten(&self) -> bool {
        matches!(self, RasterFormat::Jpeg)
    }
}
