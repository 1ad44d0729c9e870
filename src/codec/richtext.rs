//! DOCX reading: OOXML word-processing bytes → simplified block list.
//!
//! A `.docx` file is a zip archive whose main part, `word/document.xml`,
//! holds the body as a flat sequence of `<w:p>` paragraphs. This parser
//! streams that XML once and reduces it to the only structure the engine
//! needs: ordered blocks of text, each either a heading (with level) or a
//! plain paragraph. Runs, fonts, tables, images and every other OOXML
//! construct are deliberately ignored — the synthesis path lays blocks out
//! itself and the extraction path wants characters only.
//!
//! Namespace prefixes vary between producers (`w:`, `w14:`, none), so all
//! element matching uses local names.

use crate::error::ConvertError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;

/// The kind of a document block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// A heading with its outline level (1–6).
    Heading(u8),
    /// A body paragraph.
    Paragraph,
}

/// One paragraph-level block of document content.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

/// Read a DOCX byte buffer into its ordered block list.
///
/// # Errors
/// [`ConvertError::Decode`] when the bytes are not a zip archive, the
/// archive has no `word/document.xml` part, or the XML is malformed.
pub fn read_blocks(bytes: &[u8]) -> Result<Vec<Block>, ConvertError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| ConvertError::decode(format!("not a DOCX (zip open failed): {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ConvertError::decode(format!("not a DOCX (no document part): {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ConvertError::decode(format!("document part unreadable: {e}")))?;

    parse_document_xml(&xml)
}

/// Map a `w:pStyle` value like `Heading2` to a block kind.
fn kind_for_style(style: &str) -> BlockKind {
    if let Some(level) = style.strip_prefix("Heading") {
        if let Ok(level) = level.parse::<u8>() {
            return BlockKind::Heading(level.clamp(1, 6));
        }
    }
    // `Title` is produced by Word for the document title style.
    if style == "Title" {
        return BlockKind::Heading(1);
    }
    BlockKind::Paragraph
}

fn parse_document_xml(xml: &str) -> Result<Vec<Block>, ConvertError> {
    let mut reader = Reader::from_str(xml);

    let mut blocks = Vec::new();
    let mut kind = BlockKind::Paragraph;
    let mut text = String::new();
    let mut in_paragraph = false;
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    in_paragraph = true;
                    kind = BlockKind::Paragraph;
                    text.clear();
                }
                b"t" => in_text_run = true,
                b"br" => {
                    if in_paragraph {
                        text.push('\n');
                    }
                }
                _ => {}
            },

            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"pStyle" => {
                    if let Ok(Some(attr)) = e.try_get_attribute("w:val") {
                        if let Ok(style) = attr.unescape_value() {
                            kind = kind_for_style(&style);
                        }
                    }
                }
                b"br" => {
                    if in_paragraph {
                        text.push('\n');
                    }
                }
                b"tab" => {
                    if in_paragraph {
                        text.push('\t');
                    }
                }
                _ => {}
            },

            Ok(Event::Text(ref t)) => {
                if in_text_run {
                    let chars = t
                        .unescape()
                        .map_err(|e| ConvertError::decode(format!("bad XML text: {e}")))?;
                    text.push_str(&chars);
                }
            }

            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    if in_paragraph {
                        blocks.push(Block {
                            kind,
                            text: std::mem::take(&mut text),
                        });
                    }
                    in_paragraph = false;
                }
                _ => {}
            },

            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ConvertError::decode(format!("malformed document XML: {e}")));
            }
        }
    }

    Ok(blocks)
}
