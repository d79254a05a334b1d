//! HTTP request handlers for the passport sheet API.
//!
//! # Endpoints
//!
//! - `GET /` - Upload form
//! - `POST /process` - Build a sheet from an uploaded photo
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, HeaderName, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::{PipelineError, RemovalError};
use crate::pipeline::{SheetOutput, SheetPipeline, SheetRequest};
use crate::provider::{BackgroundRemover, ImageStore};

use super::index::generate_index_html;

/// Multipart field holding the photo.
pub const IMAGE_FIELD: &str = "image";

/// Multipart field holding the number of copies.
pub const COPIES_FIELD: &str = "copies";

/// File name offered for the downloaded sheet.
pub const SHEET_FILENAME: &str = "passport-sheet.pdf";

const X_COPIES_REQUESTED: HeaderName = HeaderName::from_static("x-copies-requested");
const X_COPIES_PLACED: HeaderName = HeaderName::from_static("x-copies-placed");
const X_ENHANCED: HeaderName = HeaderName::from_static("x-enhanced");

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the sheet pipeline.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<R: BackgroundRemover, S: ImageStore> {
    /// The pipeline that renders sheets
    pub pipeline: Arc<SheetPipeline<R, S>>,
}

impl<R: BackgroundRemover, S: ImageStore> AppState<R, S> {
    /// Create a new application state with the given pipeline.
    pub fn new(pipeline: SheetPipeline<R, S>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Copies placed when a request does not say.
    pub fn default_copies(&self) -> u32 {
        self.pipeline.layout().requested_copies
    }
}

impl<R: BackgroundRemover, S: ImageStore> Clone for AppState<R, S> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier; for provider rejections, the provider's code
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Status code and error identifier for a pipeline error.
pub fn error_status(err: &PipelineError) -> (StatusCode, String) {
    match err {
        PipelineError::MissingInput => (StatusCode::BAD_REQUEST, "missing_input".to_string()),
        PipelineError::InvalidCopies { .. } => {
            (StatusCode::BAD_REQUEST, "invalid_copies".to_string())
        }
        PipelineError::InvalidForm { .. } => (StatusCode::BAD_REQUEST, "invalid_form".to_string()),
        PipelineError::Removal(RemovalError::Provider { code }) => (StatusCode::GONE, code.clone()),
        PipelineError::Removal(RemovalError::Failed { .. }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "bg_removal_failed".to_string(),
        ),
        PipelineError::Upload(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "upload_failed".to_string(),
        ),
        PipelineError::Image(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "image_error".to_string(),
        ),
        PipelineError::Export(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "export_failed".to_string(),
        ),
        PipelineError::Task(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error".to_string(),
        ),
    }
}

/// Convert PipelineError to HTTP response.
///
/// 5xx errors are logged at ERROR level, provider rejections at WARN and
/// other client errors at DEBUG.
impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let (status, error_type) = error_status(&self);
        let message = self.to_string();

        if status.is_server_error() {
            error!(
                error_type = %error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else if status == StatusCode::GONE {
            warn!(
                error_type = %error_type,
                status = status.as_u16(),
                "Provider rejected image: {}",
                message
            );
        } else {
            debug!(
                error_type = %error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Form Parsing
// =============================================================================

/// Parse the `copies` form value.
///
/// A blank value means "use the default". Counts beyond `u32::MAX` saturate;
/// the layout truncates them to page capacity like any other large request.
pub fn parse_copies(value: &str, default: u32) -> Result<u32, PipelineError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }

    let invalid = || PipelineError::InvalidCopies {
        value: value.to_string(),
    };

    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    match trimmed.parse::<u64>() {
        Ok(copies) => Ok(u32::try_from(copies).unwrap_or(u32::MAX)),
        // All digits but wider than u64
        Err(_) => Ok(u32::MAX),
    }
}

/// Read the image and copies fields from a multipart body.
async fn read_sheet_form(
    mut multipart: Multipart,
    default_copies: u32,
) -> Result<SheetRequest, PipelineError> {
    let mut image: Option<Bytes> = None;
    let mut copies = default_copies;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PipelineError::InvalidForm {
            message: e.body_text(),
        })?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            IMAGE_FIELD => {
                debug!(filename = ?field.file_name(), "Received image field");
                let bytes = field.bytes().await.map_err(|e| PipelineError::InvalidForm {
                    message: e.body_text(),
                })?;
                image = Some(bytes);
            }
            COPIES_FIELD => {
                let text = field.text().await.map_err(|e| PipelineError::InvalidForm {
                    message: e.body_text(),
                })?;
                copies = parse_copies(&text, default_copies)?;
            }
            _ => {}
        }
    }

    match image {
        Some(bytes) if !bytes.is_empty() => Ok(SheetRequest::new(bytes, copies)),
        _ => Err(PipelineError::MissingInput),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle sheet requests.
///
/// # Endpoint
///
/// `POST /process`
///
/// # Form Fields
///
/// - `image`: the photo (required)
/// - `copies`: number of copies (optional, default from configuration)
///
/// # Response
///
/// - `200 OK`: PDF attachment `passport-sheet.pdf`
/// - `400 Bad Request`: No image, malformed form, or invalid copies
/// - `410 Gone`: Background-removal provider rejected the image; the
///   `error` field carries the provider's code
/// - `500 Internal Server Error`: Provider or processing failure
///
/// # Headers
///
/// - `Content-Type: application/pdf`
/// - `Content-Disposition: attachment; filename="passport-sheet.pdf"`
/// - `X-Copies-Requested`, `X-Copies-Placed`: copy counts
/// - `X-Enhanced: true|false`
pub async fn process_handler<R, S>(
    State(state): State<AppState<R, S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, PipelineError>
where
    R: BackgroundRemover + 'static,
    S: ImageStore + 'static,
{
    let multipart = multipart.map_err(|rejection| {
        debug!(reason = %rejection.body_text(), "Request is not a multipart upload");
        PipelineError::MissingInput
    })?;

    let request = read_sheet_form(multipart, state.default_copies()).await?;
    let output = state.pipeline.process(request).await?;

    Ok(sheet_response(output))
}

fn sheet_response(output: SheetOutput) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", SHEET_FILENAME),
            ),
            (X_COPIES_REQUESTED, output.requested.to_string()),
            (X_COPIES_PLACED, output.placed.to_string()),
            (X_ENHANCED, output.enhanced.to_string()),
        ],
        output.pdf,
    )
        .into_response()
}

/// Serve the upload form.
///
/// # Endpoint
///
/// `GET /`
pub async fn index_handler<R, S>(State(state): State<AppState<R, S>>) -> Html<String>
where
    R: BackgroundRemover + 'static,
    S: ImageStore + 'static,
{
    Html(generate_index_html(state.default_copies()))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
