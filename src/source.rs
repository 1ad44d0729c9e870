//! The source side of a conversion: borrowed bytes plus declared identity.
//!
//! The engine never owns the input. A [`SourceFile`] borrows the caller's
//! buffer for the duration of one conversion; nothing is cached or retained
//! afterwards. The declared MIME and name are *claims* — the codecs validate
//! them against the actual bytes and fail with a decode error when they lie.

use crate::classify;
use crate::format::TargetFormat;

/// An in-memory source file handed to the engine by a caller.
#[derive(Debug, Clone, Copy)]
pub struct SourceFile<'a> {
    /// The raw content.
    pub bytes: &'a [u8],
    /// The MIME type the caller declared for the content.
    pub declared_mime: &'a str,
    /// The original file name; used only to derive the extension and the
    /// output filename, never to locate anything on disk.
    pub name: &'a str,
}

impl<'a> SourceFile<'a> {
    pub fn new(bytes: &'a [u8], declared_mime: &'a str, name: &'a str) -> Self {
        Self {
            bytes,
            declared_mime,
            name,
        }
    }

    /// Lower-cased extension of the original name, without the dot.
    pub fn extension(&self) -> String {
        classify::extension(self.name)
    }

    /// Derive the output filename: the source stem with the extension
    /// replaced by the canonical lower-case target token.
    pub fn output_name(&self, target: TargetFormat) -> String {
        let stem = match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => self.name,
        };
        format!("{stem}.{}", target.token())
    }
}

/// Guess a declared MIME type from a file extension.
///
/// Callers that only have a path (the CLI, tests) use this to fill
/// [`SourceFile::declared_mime`] the way a browser would. Unrecognised
/// extensions fall back to `application/octet-stream`, which classifies as
/// [`crate::classify::FormatCategory::Unknown`] unless the extension says
/// otherwise.
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        "docx" => classify::DOCX_MIME,
        "txt" => "text/plain",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "zip" => "application/zip",
        "7z" => "application/x-7z-compressed",
        _ => "application/octet-stream",
    }
}
