//! End-to-end tests for the morphit conversion engine.
//!
//! Everything here drives the public pipeline with synthetic in-memory
//! sources — generated PNGs, WAVs and DOCX archives — so no fixture files
//! are needed. Conversions that touch PDF input or output require the
//! pdfium shared library at runtime; those tests skip themselves with a
//! `SKIP` line when the library is not present, the same way network-bound
//! suites gate on missing credentials.

use image::{DynamicImage, Rgba, RgbaImage};
use morphit::codec::audio::PcmAudio;
use morphit::codec::wav;
use morphit::{convert, ConvertError, SourceFile};
use std::io::Cursor;
use std::io::Write;

// ── Fixture builders ─────────────────────────────────────────────────────────

/// PNG-encode an RGBA image.
fn png_bytes(img: RgbaImage) -> Vec<u8> {
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .expect("png encode");
    out
}

/// A 100×50 solid blue PNG with a fully transparent left half.
fn half_transparent_png() -> Vec<u8> {
    let mut img = RgbaImage::from_pixel(100, 50, Rgba([20, 60, 200, 255]));
    for y in 0..50 {
        for x in 0..50 {
            img.put_pixel(x, y, Rgba([0, 0, 0, 0]));
        }
    }
    png_bytes(img)
}

/// A WAV file containing `seconds` of a mono 440 Hz sine at 44.1 kHz.
fn sine_wav(seconds: f32) -> Vec<u8> {
    let sample_rate = 44_100u32;
    let frames = (seconds * sample_rate as f32) as usize;
    let channel: Vec<f32> = (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (t * 440.0 * 2.0 * std::f32::consts::PI).sin() * 0.6
        })
        .collect();
    wav::write_wav(&PcmAudio {
        channels: vec![channel],
        sample_rate,
    })
}

/// A minimal DOCX whose document part contains the given body XML.
fn docx_bytes(body: &str) -> Vec<u8> {
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{body}</w:body>
</w:document>"#
    );
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .expect("zip entry");
    writer.write_all(xml.as_bytes()).expect("zip write");
    writer.finish().expect("zip finish").into_inner()
}

/// An empty (but valid) zip archive.
fn zip_bytes() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("readme.txt", zip::write::SimpleFileOptions::default())
        .expect("zip entry");
    writer.write_all(b"contents").expect("zip write");
    writer.finish().expect("zip finish").into_inner()
}

/// Skip (return from the test) when the outcome shows pdfium is missing.
macro_rules! skip_unless_pdfium {
    ($result:expr) => {
        match $result {
            Err(ConvertError::Render { ref detail }) if detail.contains("pdfium") => {
                println!("SKIP — pdfium shared library not available");
                return;
            }
            other => other,
        }
    };
}

// ── Image conversions ────────────────────────────────────────────────────────

#[tokio::test]
async fn png_to_jpg_preserves_dimensions_and_flattens_to_white() {
    let png = half_transparent_png();
    let source = SourceFile::new(&png, "image/png", "photo.png");

    let output = convert(&source, "jpg").await.expect("png → jpg");
    assert_eq!(output.mime, "image/jpeg");
    assert!(!output.bytes.is_empty());

    let decoded = image::load_from_memory(&output.bytes).expect("output decodes");
    assert_eq!((decoded.width(), decoded.height()), (100, 50));

    // The transparent half must flatten to white, never black.
    let rgb = decoded.to_rgb8();
    let p = rgb.get_pixel(10, 25);
    assert!(
        p[0] > 200 && p[1] > 200 && p[2] > 200,
        "transparent region came back {p:?}, expected white"
    );
    // The opaque half keeps its colour.
    let q = rgb.get_pixel(75, 25);
    assert!(q[2] > 120, "opaque region lost its blue: {q:?}");
}

#[tokio::test]
async fn png_to_webp_and_gif_round_trip() {
    let png = png_bytes(RgbaImage::from_pixel(16, 16, Rgba([255, 128, 0, 255])));
    let source = SourceFile::new(&png, "image/png", "tile.png");

    for (target, mime) in [("webp", "image/webp"), ("gif", "image/gif")] {
        let output = convert(&source, target).await.expect(target);
        assert_eq!(output.mime, mime);
        let round = image::load_from_memory(&output.bytes).expect("output decodes");
        assert_eq!((round.width(), round.height()), (16, 16));
    }
}

#[tokio::test]
async fn target_token_is_case_insensitive() {
    let png = png_bytes(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255])));
    let source = SourceFile::new(&png, "image/png", "t.png");

    let output = convert(&source, "JPEG").await.expect("JPEG token");
    assert_eq!(output.mime, "image/jpeg");
}

#[tokio::test]
async fn corrupt_image_fails_with_decode_error() {
    let source = SourceFile::new(b"these are not pixels", "image/png", "broken.png");
    let err = convert(&source, "jpg").await.unwrap_err();
    assert!(matches!(err, ConvertError::Decode { .. }));
}

// ── PDF conversions (need pdfium at runtime) ─────────────────────────────────

#[tokio::test]
async fn image_to_pdf_and_back_to_png() {
    let png = png_bytes(RgbaImage::from_pixel(120, 80, Rgba([200, 30, 30, 255])));
    let source = SourceFile::new(&png, "image/png", "wide.png");

    let pdf = skip_unless_pdfium!(convert(&source, "pdf").await).expect("png → pdf");
    assert_eq!(pdf.mime, "application/pdf");
    assert_eq!(&pdf.bytes[..4], b"%PDF");

    // Round-trip: rasterize page one of the PDF we just produced.
    let pdf_source = SourceFile::new(&pdf.bytes, "application/pdf", "wide.pdf");
    let back = skip_unless_pdfium!(convert(&pdf_source, "png").await).expect("pdf → png");
    assert_eq!(back.mime, "image/png");

    let decoded = image::load_from_memory(&back.bytes).expect("output decodes");
    // 1.5× viewport over a 120×80-point page, allowing a pixel of rounding.
    assert!(
        (decoded.width() as i64 - 180).abs() <= 1 && (decoded.height() as i64 - 120).abs() <= 1,
        "unexpected viewport: {}x{}",
        decoded.width(),
        decoded.height()
    );
}

#[tokio::test]
async fn docx_to_pdf_renders_only_page_one_when_rasterized() {
    // Enough paragraphs to paginate onto several pages.
    let body: String = (0..400)
        .map(|i| format!("<w:p><w:r><w:t>Paragraph number {i} with enough words to occupy a full line of the page.</w:t></w:r></w:p>"))
        .collect();
    let docx = docx_bytes(&body);
    let source = SourceFile::new(
        &docx,
        morphit::classify::DOCX_MIME,
        "long.docx",
    );

    let pdf = skip_unless_pdfium!(convert(&source, "pdf").await).expect("docx → pdf");
    assert_eq!(pdf.mime, "application/pdf");
    assert_eq!(&pdf.bytes[..4], b"%PDF");

    // Rasterizing the multi-page result yields exactly one A4 page image.
    let pdf_source = SourceFile::new(&pdf.bytes, "application/pdf", "long.pdf");
    let page = skip_unless_pdfium!(convert(&pdf_source, "jpg").await).expect("pdf → jpg");
    let decoded = image::load_from_memory(&page.bytes).expect("output decodes");

    // One A4 page at 1.5×: ~893×1263 px. A taller image would mean more
    // than one page leaked into the render.
    assert!(decoded.height() < 1400, "got {} px tall", decoded.height());
    let ratio = decoded.height() as f32 / decoded.width() as f32;
    assert!((ratio - 1.414).abs() < 0.02, "not A4-shaped: ratio {ratio}");
}

// ── DOCX text extraction ─────────────────────────────────────────────────────

#[tokio::test]
async fn docx_to_txt_extracts_characters_without_markup() {
    let docx = docx_bytes(
        r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Quarterly Report</w:t></w:r></w:p>
           <w:p><w:r><w:t>Revenue grew by </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>12%</w:t></w:r></w:p>"#,
    );
    let source = SourceFile::new(&docx, morphit::classify::DOCX_MIME, "report.docx");

    let output = convert(&source, "txt").await.expect("docx → txt");
    assert_eq!(output.mime, "text/plain");

    let text = String::from_utf8(output.bytes).expect("utf-8");
    assert_eq!(text, "Quarterly Report\nRevenue grew by 12%");
    assert!(!text.contains('<'), "markup leaked into extraction");
}

#[tokio::test]
async fn corrupt_docx_fails_with_decode_error() {
    let source = SourceFile::new(b"not a zip archive", morphit::classify::DOCX_MIME, "x.docx");
    let err = convert(&source, "txt").await.unwrap_err();
    assert!(matches!(err, ConvertError::Decode { .. }));
}

// ── Audio conversions ────────────────────────────────────────────────────────

#[tokio::test]
async fn two_second_wav_to_mp3() {
    let wav_bytes = sine_wav(2.0);
    let source = SourceFile::new(&wav_bytes, "audio/wav", "tone.wav");

    let output = convert(&source, "mp3").await.expect("wav → mp3");
    assert_eq!(output.mime, "audio/mp3");
    assert!(!output.bytes.is_empty());
    // MP3 frame sync at the start of the stream.
    assert_eq!(output.bytes[0], 0xFF);
    assert_eq!(output.bytes[1] & 0xE0, 0xE0);
}

#[tokio::test]
async fn mp3_back_to_wav_has_an_exact_riff_header() {
    let wav_in = sine_wav(0.5);
    let source = SourceFile::new(&wav_in, "audio/wav", "tone.wav");
    let mp3 = convert(&source, "mp3").await.expect("wav → mp3");

    let mp3_source = SourceFile::new(&mp3.bytes, "audio/mpeg", "tone.mp3");
    let output = convert(&mp3_source, "wav").await.expect("mp3 → wav");
    assert_eq!(output.mime, "audio/wav");

    let bytes = &output.bytes;
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WAVE");
    assert_eq!(&bytes[12..16], b"fmt ");
    assert_eq!(&bytes[36..40], b"data");
    // RIFF length field matches the buffer exactly.
    let riff_len = u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize;
    assert_eq!(riff_len, bytes.len() - 8);
}

#[tokio::test]
async fn audio_to_flac_is_unsupported() {
    let wav_bytes = sine_wav(0.1);
    let source = SourceFile::new(&wav_bytes, "audio/wav", "tone.wav");
    let err = convert(&source, "flac").await.unwrap_err();
    assert!(matches!(err, ConvertError::Unsupported { .. }));
}

#[tokio::test]
async fn garbage_audio_fails_with_decode_error() {
    let source = SourceFile::new(b"silence, probably", "audio/mpeg", "x.mp3");
    let err = convert(&source, "wav").await.unwrap_err();
    assert!(matches!(err, ConvertError::Decode { .. }));
}

// ── Routing totality ─────────────────────────────────────────────────────────

#[tokio::test]
async fn zip_source_is_unsupported_for_every_target() {
    let archive = zip_bytes();
    let source = SourceFile::new(&archive, "application/zip", "backup.zip");

    for target in ["jpg", "png", "pdf", "txt", "wav", "mp3", "7z", "nonsense"] {
        let err = convert(&source, target).await.unwrap_err();
        assert!(
            matches!(err, ConvertError::Unsupported { .. }),
            "zip → {target} must be Unsupported"
        );
    }
}

#[tokio::test]
async fn plain_text_source_is_unsupported() {
    let source = SourceFile::new(b"just some notes", "text/plain", "notes.txt");
    let err = convert(&source, "pdf").await.unwrap_err();
    assert!(matches!(err, ConvertError::Unsupported { .. }));
}

#[tokio::test]
async fn video_source_is_unsupported() {
    let source = SourceFile::new(b"\x00\x00\x00\x18ftypmp42", "video/mp4", "clip.mp4");
    let err = convert(&source, "mp3").await.unwrap_err();
    assert!(matches!(err, ConvertError::Unsupported { .. }));
}

// ── Output naming ────────────────────────────────────────────────────────────

#[test]
fn output_name_lowercases_the_target_token() {
    use morphit::TargetFormat;
    let source = SourceFile::new(b"", "image/png", "Holiday Photo.PNG");
    assert_eq!(
        source.output_name(TargetFormat::Jpeg),
        "Holiday Photo.jpg"
    );
}
