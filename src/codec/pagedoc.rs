//! Paged-document conversion: PDF → raster, and DOCX → paginated PDF.
//!
//! ## Why page one only?
//!
//! Rasterisation renders ONLY the first page of the source PDF, regardless
//! of page count. This is a documented scope limit of the engine, not a bug:
//! the output of a PDF→image conversion is a single raster, and page one is
//! the page that represents the document.
//!
//! ## How synthesis works
//!
//! DOCX content is reduced to a block list, flowed at a fixed logical width
//! of [`SYNTH_LAYOUT_WIDTH`] units (a line wrapper needs a concrete viewport
//! before any page can be cut), then paginated onto A4 pages at
//! [`SYNTH_PAGE_MARGIN`]-point margins with the whole layout scaled by
//! [`SYNTH_PAGE_SCALE`] so the 800-unit column fits the printable width.
//! Layout and pagination are pure functions over plain structs; pdfium only
//! enters at the very end to materialise the placed lines as text objects.

use crate::codec::raster;
use crate::codec::richtext::{self, Block, BlockKind};
use crate::error::ConvertError;
use crate::format::RasterFormat;
use crate::policy::{
    A4_HEIGHT_PTS, A4_WIDTH_PTS, PAGE_RENDER_SCALE, SYNTH_LAYOUT_WIDTH, SYNTH_PAGE_MARGIN,
    SYNTH_PAGE_SCALE,
};
use pdfium_render::prelude::*;
use tracing::{debug, info};

/// Render page one of a PDF into the requested raster format.
///
/// The rendering viewport is the page's intrinsic point size scaled by the
/// fixed [`PAGE_RENDER_SCALE`] factor; the canvas matches the viewport's
/// pixel dimensions exactly.
///
/// # Errors
/// [`ConvertError::Decode`] when the bytes do not parse as a PDF;
/// [`ConvertError::Render`] when page rendering fails.
pub fn rasterize_first_page(bytes: &[u8], target: RasterFormat) -> Result<Vec<u8>, ConvertError> {
    let pdfium = crate::codec::bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| ConvertError::decode(format!("not a readable PDF: {e:?}")))?;

    let pages = document.pages();
    info!("PDF loaded: {} pages, rendering page 1 only", pages.len());

    let page = pages
        .get(0)
        .map_err(|e| ConvertError::render(format!("document has no first page: {e:?}")))?;

    let render_config = PdfRenderConfig::new().scale_page_by_factor(PAGE_RENDER_SCALE);
    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| ConvertError::render(format!("page rasterisation failed: {e:?}")))?;

    let image = bitmap.as_image();
    debug!("rendered page 1 → {}x{} px", image.width(), image.height());

    raster::encode_canvas(&image, target)
}

// ── Synthesis layout ─────────────────────────────────────────────────────

/// Font sizes, in layout units, per block kind.
fn font_size(kind: BlockKind) -> f32 {
    match kind {
        BlockKind::Heading(1) => 24.0,
        BlockKind::Heading(2) => 20.0,
        BlockKind::Heading(_) => 16.0,
        BlockKind::Paragraph => 12.0,
    }
}

/// Average glyph advance as a fraction of the font size.
///
/// The layout has no font metrics to consult; Helvetica's average advance
/// is close enough to half an em for line wrapping, and wrapping a little
/// early only moves a word to the next line.
const GLYPH_ADVANCE_EM: f32 = 0.5;

/// Vertical distance between consecutive baselines, as a multiple of size.
const LINE_LEADING: f32 = 1.4;

/// One wrapped line in layout-unit space.
#[derive(Debug, Clone, PartialEq)]
struct FlowedLine {
    text: String,
    size: f32,
}

impl FlowedLine {
    fn leading(&self) -> f32 {
        self.size * LINE_LEADING
    }
}

/// Greedy word-wrap of the block list at the fixed layout width.
fn flow_blocks(blocks: &[Block]) -> Vec<FlowedLine> {
    let mut lines = Vec::new();

    for block in blocks {
        let size = font_size(block.kind);
        let max_chars = (SYNTH_LAYOUT_WIDTH / (size * GLYPH_ADVANCE_EM)).max(1.0) as usize;

        // Explicit breaks inside a block wrap independently.
        for segment in block.text.split('\n') {
            if segment.trim().is_empty() {
                // An empty paragraph still consumes vertical space.
                lines.push(FlowedLine {
                    text: String::new(),
                    size,
                });
                continue;
            }

            let mut current = String::new();
            for word in segment.split_whitespace() {
                let candidate_len = if current.is_empty() {
                    word.chars().count()
                } else {
                    current.chars().count() + 1 + word.chars().count()
                };

                if candidate_len > max_chars && !current.is_empty() {
                    lines.push(FlowedLine {
                        text: std::mem::take(&mut current),
                        size,
                    });
                }
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            }
            if !current.is_empty() {
                lines.push(FlowedLine {
                    text: current,
                    size,
                });
            }
        }
    }

    lines
}

/// A line placed on a page, in PDF point space (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
struct PlacedLine {
    text: String,
    size: f32,
    x: f32,
    y: f32,
}

/// Cut the flowed lines into A4 pages.
///
/// The layout-unit column is scaled by [`SYNTH_PAGE_SCALE`] and placed at
/// the page margin; a new page starts whenever the next baseline would
/// cross the bottom margin.
fn paginate(lines: &[FlowedLine]) -> Vec<Vec<PlacedLine>> {
    let usable_height = A4_HEIGHT_PTS - 2.0 * SYNTH_PAGE_MARGIN;

    let mut pages: Vec<Vec<PlacedLine>> = Vec::new();
    let mut current: Vec<PlacedLine> = Vec::new();
    let mut cursor = 0.0f32;

    for line in lines {
        let leading = line.leading() * SYNTH_PAGE_SCALE;
        if cursor + leading > usable_height && !current.is_empty() {
            pages.push(std::mem::take(&mut current));
            cursor = 0.0;
        }
        cursor += leading;

        if !line.text.is_empty() {
            current.push(PlacedLine {
                text: line.text.clone(),
                size: line.size * SYNTH_PAGE_SCALE,
                x: SYNTH_PAGE_MARGIN,
                // Convert the top-down cursor into bottom-up PDF coordinates.
                y: A4_HEIGHT_PTS - SYNTH_PAGE_MARGIN - cursor,
            });
        }
    }
    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }

    pages
}

/// Convert DOCX content into a paginated PDF.
///
/// # Errors
/// [`ConvertError::Decode`] when the source does not parse as a DOCX;
/// [`ConvertError::Render`] when page or text-object creation fails;
/// [`ConvertError::Encode`] when PDF serialisation fails.
pub fn synthesize_page(bytes: &[u8]) -> Result<Vec<u8>, ConvertError> {
    let blocks = richtext::read_blocks(bytes)?;
    let lines = flow_blocks(&blocks);
    let pages = paginate(&lines);
    info!(
        "synthesizing {} blocks → {} lines → {} pages",
        blocks.len(),
        lines.len(),
        pages.len()
    );

    let pdfium = crate::codec::bind_pdfium()?;
    let mut document = pdfium
        .create_new_pdf()
        .map_err(|e| ConvertError::render(format!("could not create PDF: {e:?}")))?;
    let font = document.fonts_mut().helvetica();

    for placed in &pages {
        let mut page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::Custom(
                PdfPoints::new(A4_WIDTH_PTS),
                PdfPoints::new(A4_HEIGHT_PTS),
            ))
            .map_err(|e| ConvertError::render(format!("could not create page: {e:?}")))?;

        for line in placed {
            let mut object =
                PdfPageTextObject::new(&document, &line.text, font, PdfPoints::new(line.size))
                    .map_err(|e| ConvertError::render(format!("text object failed: {e:?}")))?;
            object
                .translate(PdfPoints::new(line.x), PdfPoints::new(line.y))
                .map_err(|e| ConvertError::render(format!("text placement failed: {e:?}")))?;
            page.objects_mut()
                .add_text_object(object)
                .map_err(|e| ConvertError::render(format!("text insertion failed: {e:?}")))?;
        }
    }

    document
        .save_to_bytes()
        .map_err(|e| ConvertError::encode(format!("PDF serialisation failed: {e:?}")))
}
