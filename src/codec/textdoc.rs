//! Plain-text extraction from rich-text documents.

use crate::codec::richtext;
use crate::error::ConvertError;
use tracing::debug;

/// Extract the textual content of a DOCX, discarding all structure.
///
/// Paragraph boundaries become newlines; everything else (styles, tables,
/// embedded media) is dropped. The result is returned as UTF-8 bytes ready
/// to serve as a `text/plain` payload.
///
/// # Errors
/// [`ConvertError::Decode`] when the source does not parse as a DOCX.
pub fn extract_plain_text(bytes: &[u8]) -> Result<Vec<u8>, ConvertError> {
    let blocks = richtext::read_blocks(bytes)?;

    let mut text = String::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        text.push_str(&block.text);
    }

    debug!("extracted {} chars from {} blocks", text.len(), blocks.len());
    Ok(text.into_bytes())
}
