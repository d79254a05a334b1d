use thiserror::Error;

/// Errors reported by the background-removal provider.
#[derive(Debug, Clone, Error)]
pub enum RemovalError {
    /// The provider rejected the image with a structured error code
    /// (should map to HTTP 410)
    #[error("Background removal rejected: {code}")]
    Provider { code: String },

    /// Any other non-success outcome (transport failure, unparseable body)
    #[error("Background removal failed: {message}")]
    Failed {
        status: Option<u16>,
        message: String,
    },
}

impl RemovalError {
    /// Code used when the provider lists an error without a `code` field.
    pub const UNKNOWN_CODE: &'static str = "unknown_error";
}

/// Errors from the storage provider's upload API.
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    /// The upload completed but the response carried no usable reference URL
    #[error("Upload returned no reference URL")]
    MissingReference,

    /// The provider answered with a non-success status
    #[error("Upload rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Network or connection error
    #[error("Upload request failed: {0}")]
    Request(String),
}

/// Errors while fetching the enhanced asset.
///
/// These never reach the client: the pipeline falls back to the
/// un-enhanced image.
#[derive(Debug, Clone, Error)]
pub enum EnhanceError {
    /// Network or connection error
    #[error("Enhancement request failed: {0}")]
    Request(String),

    /// The delivery endpoint answered with a non-success status
    #[error("Enhancement returned status {0}")]
    Status(u16),
}

/// Errors decoding or encoding raster images.
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    /// Bytes could not be decoded as a supported image format
    #[error("Failed to decode image: {message}")]
    Decode { message: String },

    /// Pixels could not be encoded
    #[error("Failed to encode image: {message}")]
    Encode { message: String },
}

/// Errors that abort a sheet request.
///
/// Every variant short-circuits the pipeline; no partial sheet is returned.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// No image was supplied with the request (should map to HTTP 400)
    #[error("No image uploaded")]
    MissingInput,

    /// The `copies` field is not a non-negative integer (should map to HTTP 400)
    #[error("Invalid copies value: {value:?}")]
    InvalidCopies { value: String },

    /// The multipart body could not be read (should map to HTTP 400)
    #[error("Malformed form data: {message}")]
    InvalidForm { message: String },

    /// Background removal failed
    #[error(transparent)]
    Removal(#[from] RemovalError),

    /// Upload to storage failed
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Image decoding or encoding failed
    #[error(transparent)]
    Image(#[from] ImageError),

    /// PDF export failed
    #[error("Failed to export sheet: {0}")]
    Export(String),

    /// A blocking worker task panicked or was cancelled
    #[error("Worker task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        PipelineError::Task(err.to_string())
    }
}
