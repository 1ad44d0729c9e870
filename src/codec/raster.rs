//! Raster image conversion: raster↔raster and raster→single-page PDF.
//!
//! ## Why flatten against white?
//!
//! JPEG has no alpha channel. Encoding an RGBA source without compositing
//! first leaves the transparent regions' RGB values undefined — most
//! decoders show them as black fringing. Compositing source-over onto an
//! opaque white canvas before encoding gives transparent pixels a defined,
//! predictable colour. Formats that keep alpha (PNG, WebP, GIF) composite
//! onto a fully transparent canvas instead, which is a no-op for the pixels
//! but keeps both paths shaped the same.

use crate::error::ConvertError;
use crate::format::RasterFormat;
use crate::policy::JPEG_QUALITY;
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, Rgba, RgbaImage};
use pdfium_render::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// Decode source bytes and re-encode them in another raster format.
///
/// The output canvas always has the source's exact pixel dimensions; no
/// scaling or cropping happens here.
pub fn raster_to_raster(bytes: &[u8], target: RasterFormat) -> Result<Vec<u8>, ConvertError> {
    let source = image::load_from_memory(bytes)
        .map_err(|e| ConvertError::decode(format!("not a decodable image: {e}")))?;
    debug!(
        "decoded image: {}x{} px → re-encode as {}",
        source.width(),
        source.height(),
        target.mime()
    );
    encode_canvas(&source, target)
}

/// Composite a decoded image onto a fresh canvas and encode it.
///
/// Shared by the raster↔raster path and the PDF rasterizer: both end with
/// "pixels in, encoded bytes out" and both need the JPEG flattening rule.
pub(crate) fn encode_canvas(
    source: &DynamicImage,
    target: RasterFormat,
) -> Result<Vec<u8>, ConvertError> {
    let (width, height) = (source.width(), source.height());

    let mut canvas = if target.requires_flatten() {
        RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
    } else {
        RgbaImage::new(width, height)
    };
    imageops::overlay(&mut canvas, &source.to_rgba8(), 0, 0);

    let mut out = Vec::new();
    match target {
        RasterFormat::Jpeg => {
            // Alpha is already flattened; drop the channel for the encoder.
            let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))
                .map_err(|e| ConvertError::encode(format!("JPEG encode failed: {e}")))?;
        }
        other => {
            DynamicImage::ImageRgba8(canvas)
                .write_to(&mut Cursor::new(&mut out), other.image_format())
                .map_err(|e| {
                    ConvertError::encode(format!("{} encode failed: {e}", other.mime()))
                })?;
        }
    }

    if out.is_empty() {
        return Err(ConvertError::EmptyOutput);
    }
    Ok(out)
}

/// Embed a raster image as the sole page of a new single-page PDF.
///
/// The page is sized exactly to the image's pixel dimensions — landscape
/// when the image is wider than tall, portrait otherwise — with the image
/// placed at the origin spanning the full page. No margins, no scaling.
pub fn raster_to_page(bytes: &[u8]) -> Result<Vec<u8>, ConvertError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| ConvertError::decode(format!("not a decodable image: {e}")))?;

    let width = image.width() as f32;
    let height = image.height() as f32;
    let orientation = if width > height {
        "landscape"
    } else {
        "portrait"
    };
    debug!("embedding {}x{} px image on a {orientation} page", width, height);

    let pdfium = crate::codec::bind_pdfium()?;
    let mut document = pdfium
        .create_new_pdf()
        .map_err(|e| ConvertError::render(format!("could not create PDF: {e:?}")))?;

    let mut page = document
        .pages_mut()
        .create_page_at_end(PdfPagePaperSize::Custom(
            PdfPoints::new(width),
            PdfPoints::new(height),
        ))
        .map_err(|e| ConvertError::render(format!("could not create page: {e:?}")))?;

    let object = PdfPageImageObject::new_with_width(&document, &image, PdfPoints::new(width))
        .map_err(|e| ConvertError::render(format!("could not embed image: {e:?}")))?;
    page.objects_mut()
        .add_image_object(object)
        .map_err(|e| ConvertError::render(format!("could not place image: {e:?}")))?;

    document
        .save_to_bytes()
        .map_err(|e| ConvertError::encode(format!("PDF serialisation failed: {e:?}")))
}
