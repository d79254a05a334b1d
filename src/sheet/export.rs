//! PDF export of a composed page.
//!
//! The page raster is embedded as a single full-bleed image XObject. The
//! PDF page size is derived from the raster size and the export DPI, so a
//! 2480 x 3508 canvas at 300 DPI yields an A4 page.

use bytes::Bytes;
use image::RgbImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, XObjectTransform,
};
use tracing::debug;

use crate::error::PipelineError;
use crate::tile::encode_png;

/// Default export resolution.
pub const DEFAULT_DPI: f32 = 300.0;

/// Document title written into the PDF metadata.
const DOCUMENT_TITLE: &str = "Passport Sheet";

const MM_PER_INCH: f32 = 25.4;

/// Convert a pixel length at `dpi` to millimetres.
#[inline]
pub fn px_to_mm(px: u32, dpi: f32) -> f32 {
    px as f32 / dpi * MM_PER_INCH
}

/// Render a page canvas into a one-page PDF.
pub fn export_pdf(canvas: &RgbImage, dpi: f32) -> Result<Bytes, PipelineError> {
    let png = encode_png(canvas)?;

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let raw = RawImage::decode_from_bytes(&png, &mut warnings)
        .map_err(|e| PipelineError::Export(e.to_string()))?;

    let mut doc = PdfDocument::new(DOCUMENT_TITLE);
    let image_id = doc.add_image(&raw);

    // PDF origin is bottom-left; the image covers the whole page so
    // translating to (0, 0) keeps the top-left layout intact.
    let ops = vec![Op::UseXobject {
        id: image_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(0.0)),
            translate_y: Some(Pt(0.0)),
            dpi: Some(dpi),
            scale_x: None,
            scale_y: None,
            rotate: None,
        },
    }];

    let page = PdfPage::new(
        Mm(px_to_mm(canvas.width(), dpi)),
        Mm(px_to_mm(canvas.height(), dpi)),
        ops,
    );

    doc.with_pages(vec![page]);
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

    debug!(
        bytes = bytes.len(),
        warnings = warnings.len(),
        dpi = dpi,
        "Exported sheet PDF"
    );

    Ok(Bytes::from(bytes))
}

// =============================================================================
// Tests
// =============================================================================
