//! Sheet pipeline orchestrating the providers and the renderer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          SheetPipeline                            │
//! │                                                                   │
//! │  1. remove_background ──▶ 2. flatten + PNG ──▶ 3. upload          │
//! │        (remover)             (blocking)          (store)          │
//! │                                                    │              │
//! │  6. export PDF ◀── 5. tile + compose ◀── 4. fetch enhanced        │
//! │     (blocking)        (blocking)          (store, falls back to   │
//! │                                            the flattened photo)   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every stage returns a `Result`; the first error ends the request. The
//! enhanced fetch is the exception: when it fails the sheet is built from
//! the background-removed photo instead.

use std::sync::Arc;

use bytes::Bytes;
use image::{DynamicImage, RgbImage};
use tracing::{debug, info, warn};

use crate::error::PipelineError;
use crate::layout::{LayoutParameters, PagePlan};
use crate::provider::{BackgroundRemover, ImageStore, StoredImage};
use crate::sheet::{blank_page, compose_page, export_pdf, DEFAULT_DPI};
use crate::tile::{decode_image, encode_png, flatten, prepare_tile};

// =============================================================================
// Request / Output
// =============================================================================

/// One sheet request.
#[derive(Debug, Clone)]
pub struct SheetRequest {
    /// Raw bytes of the uploaded photo
    pub image: Bytes,

    /// Number of copies to place
    pub copies: u32,
}

impl SheetRequest {
    /// Create a new sheet request.
    pub fn new(image: impl Into<Bytes>, copies: u32) -> Self {
        Self {
            image: image.into(),
            copies,
        }
    }
}

/// A rendered sheet.
#[derive(Debug, Clone)]
pub struct SheetOutput {
    /// The PDF document
    pub pdf: Bytes,

    /// Copies asked for
    pub requested: u32,

    /// Copies that fit on the page
    pub placed: u32,

    /// Whether the enhanced rendition was used
    pub enhanced: bool,
}

// =============================================================================
// Rendering
// =============================================================================

/// Build the tile, compose the page and export it.
///
/// This is the provider-free tail of the pipeline, also used by the
/// offline `render` command. When no copy fits the tile is never built and
/// the sheet is a blank page.
pub fn render_sheet(
    source: &DynamicImage,
    params: &LayoutParameters,
    dpi: f32,
) -> Result<(Bytes, PagePlan), PipelineError> {
    let page = if params.requested_copies == 0 || params.capacity() == 0 {
        debug!(
            requested = params.requested_copies,
            capacity = params.capacity(),
            "No copies to place, skipping tile preparation"
        );
        blank_page(params)
    } else {
        let tile = prepare_tile(source, params);
        debug!(
            width = tile.width(),
            height = tile.height(),
            "Prepared tile"
        );
        compose_page(&tile, params)
    };

    let (canvas, plan) = page.into_parts();
    let pdf = export_pdf(&canvas, dpi)?;

    Ok((pdf, plan))
}

// =============================================================================
// Pipeline
// =============================================================================

/// Turns an uploaded photo into a printable sheet.
///
/// # Type Parameters
///
/// * `R` - background-removal provider
/// * `S` - storage and enhancement provider
///
/// # Example
///
/// ```ignore
/// use passport_sheet::pipeline::{SheetPipeline, SheetRequest};
/// use passport_sheet::provider::{CloudinaryClient, RemoveBgClient};
///
/// let pipeline = SheetPipeline::new(RemoveBgClient::new(key), CloudinaryClient::new(creds));
/// let output = pipeline.process(SheetRequest::new(photo, 6)).await?;
/// println!("placed {} of {}", output.placed, output.requested);
/// ```
pub struct SheetPipeline<R: BackgroundRemover, S: ImageStore> {
    remover: Arc<R>,
    store: Arc<S>,
    layout: LayoutParameters,
    dpi: f32,
}

impl<R: BackgroundRemover, S: ImageStore> SheetPipeline<R, S> {
    /// Create a pipeline with the default layout and 300 DPI export.
    pub fn new(remover: R, store: S) -> Self {
        Self {
            remover: Arc::new(remover),
            store: Arc::new(store),
            layout: LayoutParameters::default(),
            dpi: DEFAULT_DPI,
        }
    }

    /// Use a different page layout. Its copy count is the default for
    /// requests that do not specify one.
    pub fn with_layout(mut self, layout: LayoutParameters) -> Self {
        self.layout = layout;
        self
    }

    /// Use a different export resolution.
    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    /// The configured layout.
    pub fn layout(&self) -> &LayoutParameters {
        &self.layout
    }

    /// The configured export resolution.
    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    /// Run the full pipeline for one request.
    #[tracing::instrument(
        name = "sheet",
        skip_all,
        fields(input_bytes = request.image.len(), copies = request.copies)
    )]
    pub async fn process(&self, request: SheetRequest) -> Result<SheetOutput, PipelineError> {
        if request.image.is_empty() {
            return Err(PipelineError::MissingInput);
        }

        let params = self.layout.with_copies(request.copies);

        let cutout = self.remove_background(request.image).await?;
        let (flattened, png) = self.flatten_for_upload(cutout).await?;
        let stored = self.upload(png).await?;
        let (source, enhanced) = self.fetch_enhanced(&stored, flattened).await;

        let dpi = self.dpi;
        let (pdf, plan) =
            tokio::task::spawn_blocking(move || render_sheet(&source, &params, dpi)).await??;

        info!(
            requested = plan.requested,
            placed = plan.placed(),
            enhanced = enhanced,
            pdf_bytes = pdf.len(),
            "Sheet rendered"
        );
        if !plan.is_complete() {
            warn!(
                dropped = plan.dropped(),
                "Requested copies exceed page capacity; extra copies dropped"
            );
        }

        Ok(SheetOutput {
            pdf,
            requested: plan.requested,
            placed: plan.placed(),
            enhanced,
        })
    }

    async fn remove_background(&self, image: Bytes) -> Result<Bytes, PipelineError> {
        debug!(bytes = image.len(), "Removing background");
        let cutout = self.remover.remove_background(image).await?;
        debug!(bytes = cutout.len(), "Background removed");
        Ok(cutout)
    }

    async fn flatten_for_upload(&self, cutout: Bytes) -> Result<(RgbImage, Bytes), PipelineError> {
        let (flattened, png) = tokio::task::spawn_blocking(move || {
            let decoded = decode_image(&cutout)?;
            debug!(
                width = decoded.width(),
                height = decoded.height(),
                color = ?decoded.color(),
                "Decoded background-removed image"
            );
            let flattened = flatten(&decoded);
            let png = encode_png(&flattened)?;
            Ok::<_, PipelineError>((flattened, png))
        })
        .await??;

        Ok((flattened, png))
    }

    async fn upload(&self, png: Bytes) -> Result<StoredImage, PipelineError> {
        debug!(bytes = png.len(), "Uploading flattened image");
        let stored = self.store.upload(png).await?;
        debug!(public_id = %stored.public_id, url = %stored.secure_url, "Uploaded");
        Ok(stored)
    }

    /// Fetch and decode the enhanced rendition, or fall back to `original`.
    async fn fetch_enhanced(
        &self,
        stored: &StoredImage,
        original: RgbImage,
    ) -> (DynamicImage, bool) {
        let bytes = match self.store.fetch_enhanced(stored).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Enhancement unavailable, using original image");
                return (DynamicImage::ImageRgb8(original), false);
            }
        };

        let decoded = tokio::task::spawn_blocking(move || decode_image(&bytes)).await;
        match decoded {
            Ok(Ok(image)) => {
                debug!(
                    width = image.width(),
                    height = image.height(),
                    "Enhanced image downloaded"
                );
                (image, true)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Enhanced image unreadable, using original image");
                (DynamicImage::ImageRgb8(original), false)
            }
            Err(e) => {
                warn!(error = %e, "Enhanced image decode task failed, using original image");
                (DynamicImage::ImageRgb8(original), false)
            }
        }
    }
}

impl<R: BackgroundRemover, S: ImageStore> Clone for SheetPipeline<R, S> {
    fn clone(&self) -> Self {
        Self {
            remover: Arc::clone(&self.remover),
            store: Arc::clone(&self.store),
            layout: self.layout,
            dpi: self.dpi,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
