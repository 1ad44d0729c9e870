//! Error types for the morphit conversion engine.
//!
//! One error enum covers the whole pipeline because a conversion has exactly
//! one observable outcome: converted bytes or a single typed failure. There
//! are no partial results — a codec either produces a complete output buffer
//! or the attempt fails with one of the variants below.
//!
//! The variants mirror the stages of a conversion:
//!
//! * [`ConvertError::Unsupported`] — the routing table has no codec for the
//!   requested (category, source extension, target) triple. Always
//!   recoverable; the caller simply picked a pair the engine does not map.
//! * [`ConvertError::Decode`] — the source bytes do not parse as the format
//!   they claim to be.
//! * [`ConvertError::Render`] — decode succeeded but layout or rasterisation
//!   failed.
//! * [`ConvertError::Encode`] — output serialisation failed.
//! * [`ConvertError::EmptyOutput`] — a codec reported success with zero
//!   bytes; the pipeline treats this as a failure, never a success.

use crate::classify::FormatCategory;
use thiserror::Error;

/// All errors returned by the morphit conversion engine.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The router found no codec mapping for this conversion.
    ///
    /// Carries the attempted triple verbatim so callers can surface exactly
    /// what was asked for.
    #[error(
        "no conversion registered for {category} source '.{source_ext}' → '{target}'\n\
         Run with --list-targets to see the supported outputs for this file."
    )]
    Unsupported {
        category: FormatCategory,
        source_ext: String,
        target: String,
    },

    /// The source bytes could not be decoded as the claimed format.
    #[error("failed to decode source: {detail}")]
    Decode { detail: String },

    /// Layout or rasterisation failed after the source decoded successfully.
    #[error("rendering failed: {detail}")]
    Render { detail: String },

    /// Output serialisation failed.
    #[error("output encoding failed: {detail}")]
    Encode { detail: String },

    /// A codec reported success but produced no bytes.
    #[error("conversion produced an empty output buffer")]
    EmptyOutput,

    /// A second conversion was started while one is already in flight.
    ///
    /// Only returned by [`crate::session::ConvertSession`]; the pipeline
    /// itself is a pure function and does not track in-flight state.
    #[error("a conversion is already in flight; wait for it to finish before starting another")]
    SessionBusy,

    /// Unexpected internal error (blocking-task panic, invariant violation).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// Shorthand for [`ConvertError::Decode`].
    pub fn decode(detail: impl Into<String>) -> Self {
        ConvertError::Decode {
            detail: detail.into(),
        }
    }

    /// Shorthand for [`ConvertError::Render`].
    pub fn render(detail: impl Into<String>) -> Self {
        ConvertError::Render {
            detail: detail.into(),
        }
    }

    /// Shorthand for [`ConvertError::Encode`].
    pub fn encode(detail: impl Into<String>) -> Self {
        ConvertError::Encode {
            detail: detail.into(),
        }
    }

    /// Shorthand for [`ConvertError::Unsupported`].
    pub fn unsupported(category: FormatCategory, source_ext: &str, target: &str) -> Self {
        ConvertError::Unsupported {
            category,
            source_ext: source_ext.to_string(),
            target: target.to_string(),
        }
    }
}
