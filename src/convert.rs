//! The conversion pipeline: one request in, one outcome out.
//!
//! `convert` is the library's primary entry point. It is a pure function of
//! its inputs — the engine keeps no cache, no session, no cross-request
//! state of any kind — and it has exactly two outcomes: a [`Converted`]
//! buffer with its MIME type, or a single [`ConvertError`].
//!
//! ## Why spawn_blocking?
//!
//! Every codec is CPU-bound (pdfium rendering, JPEG/LAME encoding, container
//! demuxing), and pdfium in particular must not run on async worker threads.
//! The pipeline therefore moves the selected codec onto the blocking thread
//! pool and awaits the join handle; the async surface exists so callers can
//! drive conversions from async contexts without stalling their runtime.

use crate::classify::classify;
use crate::codec::{audio, pagedoc, raster, textdoc, wav};
use crate::error::ConvertError;
use crate::format::TargetFormat;
use crate::route::{route, CodecOp};
use crate::source::SourceFile;
use std::time::Instant;
use tracing::{debug, info};

/// A successful conversion outcome: the new content plus its MIME type.
#[derive(Debug, Clone)]
pub struct Converted {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Convert an in-memory source file to the requested target format.
///
/// # Arguments
/// * `source` — the bytes plus their declared MIME and name
/// * `target` — a case-insensitive format token such as `"jpg"` or `"wav"`
///
/// # Errors
/// Any variant of [`ConvertError`]; see the routing table in
/// [`crate::route`] for which conversions exist at all.
pub async fn convert(source: &SourceFile<'_>, target: &str) -> Result<Converted, ConvertError> {
    let start = Instant::now();

    let category = classify(source.declared_mime, source.name);
    let ext = source.extension();
    let op = route(category, &ext, target)?;
    debug!(
        "routing '{}' ({category}, .{ext}) → '{target}' via {op:?}",
        source.name
    );

    // The codec outlives the borrow of `source`, so it gets owned copies.
    let bytes = source.bytes.to_vec();
    let declared_mime = source.declared_mime.to_string();

    let converted = tokio::task::spawn_blocking(move || run_codec(op, &bytes, &declared_mime))
        .await
        .map_err(|e| ConvertError::Internal(format!("codec task panicked: {e}")))??;

    // A zero-byte "success" is a codec bug surfaced as a typed failure,
    // never delivered to the caller as a result.
    if converted.bytes.is_empty() {
        return Err(ConvertError::EmptyOutput);
    }

    info!(
        "converted '{}' → {} ({} bytes) in {}ms",
        source.name,
        converted.mime,
        converted.bytes.len(),
        start.elapsed().as_millis()
    );
    Ok(converted)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally; prefer [`convert`] when an
/// async runtime already exists.
pub fn convert_sync(source: &SourceFile<'_>, target: &str) -> Result<Converted, ConvertError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConvertError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(convert(source, target))
}

/// Execute the routed codec operation. Runs on the blocking pool.
fn run_codec(op: CodecOp, bytes: &[u8], declared_mime: &str) -> Result<Converted, ConvertError> {
    let converted = match op {
        CodecOp::RasterToRaster(target) => Converted {
            bytes: raster::raster_to_raster(bytes, target)?,
            mime: target.mime().to_string(),
        },
        CodecOp::RasterToPage => Converted {
            bytes: raster::raster_to_page(bytes)?,
            mime: TargetFormat::Pdf.mime().to_string(),
        },
        CodecOp::RasterizeFirstPage(target) => Converted {
            bytes: pagedoc::rasterize_first_page(bytes, target)?,
            mime: target.mime().to_string(),
        },
        CodecOp::SynthesizePage => Converted {
            bytes: pagedoc::synthesize_page(bytes)?,
            mime: TargetFormat::Pdf.mime().to_string(),
        },
        CodecOp::ExtractPlainText => Converted {
            bytes: textdoc::extract_plain_text(bytes)?,
            mime: TargetFormat::Txt.mime().to_string(),
        },
        CodecOp::PcmToWav => {
            let pcm = audio::decode(bytes, declared_mime)?;
            Converted {
                bytes: wav::write_wav(&pcm),
                mime: TargetFormat::Wav.mime().to_string(),
            }
        }
        CodecOp::PcmToMp3 => {
            let pcm = audio::decode(bytes, declared_mime)?;
            Converted {
                bytes: audio::to_mp3(&pcm)?,
                mime: TargetFormat::Mp3.mime().to_string(),
            }
        }
    };
    Ok(converted)
}
