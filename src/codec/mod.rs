//! The codecs: one submodule per conversion family.
//!
//! Each submodule implements exactly one family of transformations over raw
//! byte buffers. Keeping them separate makes each independently testable and
//! keeps the dependency graph flat: no codec calls another, and the router is
//! the only place that knows which operation belongs to which module.
//!
//! ## Data Flow
//!
//! ```text
//! route ──▶ raster     raster↔raster, raster→PDF page
//!       ──▶ pagedoc    PDF page 1 → raster, DOCX → paginated PDF
//!       ──▶ textdoc    DOCX → plain text
//!       ──▶ audio      container → PCM → WAV / MP3
//! ```
//!
//! `richtext` is a shared leaf parser (DOCX → block list), not a codec;
//! `wav` holds the byte-exact RIFF/WAVE writer driven by `audio`.
//!
//! All codecs are synchronous and CPU-bound; the pipeline runs them on the
//! blocking thread pool.

pub mod audio;
pub mod pagedoc;
pub mod raster;
pub mod richtext;
pub mod textdoc;
pub mod wav;

use crate::error::ConvertError;
use pdfium_render::prelude::*;

/// Bind to the pdfium shared library.
///
/// Tries a library next to the executable first, then the system search
/// path. Binding is cheap and scoped to a single conversion, so no binding
/// is cached across calls.
pub(crate) fn bind_pdfium() -> Result<Pdfium, ConvertError> {
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| {
            ConvertError::render(format!(
                "pdfium library unavailable: {e:?}\n\
                 Install libpdfium or place the shared library next to the executable."
            ))
        })
}
