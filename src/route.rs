//! Conversion routing: `(category, source extension, target)` → codec operation.
//!
//! The router is a pure lookup over a fixed table. It never invokes a codec
//! and never fails for any reason other than "no mapping exists" — internal
//! codec failures surface later, from the codec itself. Treat the table as a
//! versioned contract: adding a row is an API change.
//!
//! ## The table
//!
//! | Category     | Source ext | Target          | Operation              |
//! |--------------|------------|-----------------|------------------------|
//! | Image        | any        | jpg/png/webp/gif| `RasterToRaster`       |
//! | Image        | any        | pdf             | `RasterToPage`         |
//! | PageDocument | pdf        | jpg/png/webp/gif| `RasterizeFirstPage`   |
//! | PageDocument | docx       | pdf             | `SynthesizePage`       |
//! | PageDocument | docx       | txt             | `ExtractPlainText`     |
//! | Audio        | any        | wav             | `PcmToWav`             |
//! | Audio        | any        | mp3             | `PcmToMp3`             |
//!
//! Everything else — including plain-text sources, video, archives and
//! unknown inputs — is `Unsupported`.

use crate::classify::FormatCategory;
use crate::error::ConvertError;
use crate::format::{RasterFormat, TargetFormat};

/// The single codec operation selected for one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecOp {
    /// Decode a raster image and re-encode it in another raster format.
    RasterToRaster(RasterFormat),
    /// Embed a raster image as the sole page of a new PDF.
    RasterToPage,
    /// Render page one of a PDF into a raster image.
    RasterizeFirstPage(RasterFormat),
    /// Lay out DOCX content and paginate it into a new PDF.
    SynthesizePage,
    /// Extract the plain text of a DOCX.
    ExtractPlainText,
    /// Decode an audio container and rewrite it as PCM WAV.
    PcmToWav,
    /// Decode an audio container and block-encode it as MP3.
    PcmToMp3,
}

/// Select the codec operation for a conversion, or report the pair
/// unsupported.
///
/// `target` is the caller's raw token; it is canonicalized here (the
/// classifier deliberately does not validate targets). `source_ext` must
/// already be lower-cased — [`crate::source::SourceFile::extension`] does
/// this.
pub fn route(
    category: FormatCategory,
    source_ext: &str,
    target: &str,
) -> Result<CodecOp, ConvertError> {
    let unsupported = || ConvertError::unsupported(category, source_ext, target);

    let Some(format) = TargetFormat::parse(target) else {
        return Err(unsupported());
    };

    match category {
        FormatCategory::Image => {
            if format == TargetFormat::Pdf {
                return Ok(CodecOp::RasterToPage);
            }
            match format.as_raster() {
                Some(raster) => Ok(CodecOp::RasterToRaster(raster)),
                None => Err(unsupported()),
            }
        }

        FormatCategory::PageDocument => match source_ext {
            "pdf" => match format.as_raster() {
                Some(raster) => Ok(CodecOp::RasterizeFirstPage(raster)),
                None => Err(unsupported()),
            },
            "docx" => match format {
                TargetFormat::Pdf => Ok(CodecOp::SynthesizePage),
                TargetFormat::Txt => Ok(CodecOp::ExtractPlainText),
                _ => Err(unsupported()),
            },
            // Plain-text sources have no registered codec.
            _ => Err(unsupported()),
        },

        FormatCategory::Audio => match format {
            TargetFormat::Wav => Ok(CodecOp::PcmToWav),
            TargetFormat::Mp3 => Ok(CodecOp::PcmToMp3),
            _ => Err(unsupported()),
        },

        FormatCategory::Video | FormatCategory::Archive | FormatCategory::Unknown => {
            Err(unsupported())
        }
    }
}
