//! # morphit
//!
//! Convert files between content formats entirely in memory — raster images,
//! PDF, DOCX, plain text and audio containers. Bytes in, bytes + MIME out.
//!
//! ## Why in-memory?
//!
//! The engine is built for callers that already hold the file as a buffer
//! (upload handlers, clipboard paste, message attachments). There is no
//! filesystem in the conversion path, no temp files, no persisted state:
//! every conversion is a single request → outcome round trip, and nothing
//! survives it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! bytes + declared MIME + name + target token
//!  │
//!  ├─ 1. Classify  declared MIME + extension → coarse category
//!  ├─ 2. Route     (category, source ext, target) → one codec op, or Unsupported
//!  ├─ 3. Codec     raster / pagedoc / textdoc / audio (CPU-bound, spawn_blocking)
//!  └─ 4. Outcome   Converted { bytes, mime }  —or—  one typed ConvertError
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use morphit::{convert, SourceFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bytes = std::fs::read("holiday.png")?;
//!     let source = SourceFile::new(&bytes, "image/png", "holiday.png");
//!
//!     let output = convert(&source, "jpg").await?;
//!     assert_eq!(output.mime, "image/jpeg");
//!     std::fs::write(source.output_name(morphit::TargetFormat::Jpeg), output.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## What converts to what
//!
//! | Source          | Targets                         |
//! |-----------------|---------------------------------|
//! | raster image    | jpg, png, webp, gif, pdf        |
//! | PDF             | jpg, png, webp, gif (page 1)    |
//! | DOCX            | pdf, txt                        |
//! | audio container | wav, mp3                        |
//!
//! Everything else returns [`ConvertError::Unsupported`] with the attempted
//! triple. PDF rasterisation renders page one only, by design.
//!
//! The PDF paths need the pdfium shared library at runtime (next to the
//! executable or on the system search path). All other paths are
//! self-contained.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod classify;
pub mod codec;
pub mod convert;
pub mod error;
pub mod format;
pub mod policy;
pub mod route;
pub mod session;
pub mod source;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use classify::{classify, FormatCategory};
pub use convert::{convert, convert_sync, Converted};
pub use error::ConvertError;
pub use format::{RasterFormat, TargetFormat};
pub use route::{route, CodecOp};
pub use session::{ConvertSession, SessionState};
pub use source::SourceFile;
