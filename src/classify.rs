//! Source classification: declared MIME + file name → coarse category.
//!
//! Classification is deliberately coarse and deliberately total: every input
//! maps to exactly one [`FormatCategory`], including [`FormatCategory::Unknown`]
//! for anything the engine has never heard of. Whether a *target* format is
//! reachable from that category is not decided here — that is the router's
//! job. Keeping the two concerns apart means classification can never fail
//! and never needs to know which codecs exist.
//!
//! ## Precedence
//!
//! The declared MIME and the file extension disagree often enough in the wild
//! (browsers, mail clients and shells all guess differently) that the order
//! of the checks is part of the contract. First match wins:
//!
//! 1. MIME prefix `image/`
//! 2. `.pdf` extension or the PDF MIME
//! 3. `.docx` extension or the OOXML word-processing MIME
//! 4. `.txt` extension or `text/plain`
//! 5. MIME prefix `audio/`
//! 6. MIME prefix `video/`
//! 7. `.zip` / `.7z` extension or the zip MIME
//! 8. otherwise `Unknown`

use crate::format::TargetFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The OOXML word-processing MIME type declared by most producers for `.docx`.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Coarse classification of a source file, used to select a codec family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatCategory {
    /// Raster images (`image/*`).
    Image,
    /// Paged or rich-text documents: PDF, DOCX and plain text sources.
    PageDocument,
    /// Audio containers (`audio/*`).
    Audio,
    /// Video containers (`video/*`). No codec is registered for these.
    Video,
    /// Archives (`.zip`, `.7z`). No codec is registered for these.
    Archive,
    /// Anything else.
    Unknown,
}

impl fmt::Display for FormatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatCategory::Image => "image",
            FormatCategory::PageDocument => "document",
            FormatCategory::Audio => "audio",
            FormatCategory::Video => "video",
            FormatCategory::Archive => "archive",
            FormatCategory::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl FormatCategory {
    /// The catalog of target formats offered for sources of this category.
    ///
    /// This is presentation data for callers building a format picker; the
    /// router remains the authority on which pairs actually convert.
    pub fn targets(&self) -> &'static [TargetFormat] {
        use TargetFormat::*;
        match self {
            FormatCategory::Image => &[Jpeg, Png, WebP, Gif, Svg, Pdf],
            FormatCategory::PageDocument => &[Pdf, Docx, Txt, Jpeg, Png],
            FormatCategory::Audio => &[Mp3, Wav, Flac],
            FormatCategory::Video => &[Mp4, Mov, Mkv],
            FormatCategory::Archive => &[Zip, SevenZ],
            FormatCategory::Unknown => &[],
        }
    }
}

/// Derive the lower-cased extension from a file name, without the dot.
///
/// Returns an empty string when the name has no extension.
pub fn extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// Classify a source file from its declared MIME type and file name.
///
/// Deterministic and total: the same `(declared_mime, file_name)` pair always
/// yields the same category, and no input fails.
pub fn classify(declared_mime: &str, file_name: &str) -> FormatCategory {
    let ext = extension(file_name);

    if declared_mime.starts_with("image/") {
        return FormatCategory::Image;
    }
    if ext == "pdf" || declared_mime == "application/pdf" {
        return FormatCategory::PageDocument;
    }
    if ext == "docx" || declared_mime == DOCX_MIME {
        return FormatCategory::PageDocument;
    }
    if ext == "txt" || declared_mime == "text/plain" {
        return FormatCategory::PageDocument;
    }
    if declared_mime.starts_with("audio/") {
        return FormatCategory::Audio;
    }
    if declared_mime.starts_with("video/") {
        return FormatCategory::Video;
    }
    if ext == "zip" || ext == "7z" || declared_mime == "application/zip" {
        return FormatCategory::Archive;
    }

    FormatCategory::Unknown
}
