//! Router configuration for the passport sheet service.
//!
//! This module defines the HTTP routes and applies middleware for body
//! limits, CORS and request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /          - Upload form
//! /process   - Sheet endpoint (multipart POST)
//! /health    - Health check
//! ```
//!
//! # Example
//!
//! ```ignore
//! use passport_sheet::pipeline::SheetPipeline;
//! use passport_sheet::server::routes::{create_router, RouterConfig};
//!
//! let pipeline = SheetPipeline::new(remover, store);
//! let config = RouterConfig::new()
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(pipeline, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, index_handler, process_handler, AppState};
use crate::pipeline::SheetPipeline;
use crate::provider::{BackgroundRemover, ImageStore};

/// Default maximum request body size (25 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Maximum accepted request body in bytes
    pub max_upload_bytes: usize,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Uploads up to 25 MiB are accepted
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Set the maximum request body size in bytes.
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// # Arguments
///
/// * `pipeline` - The sheet pipeline serving `/process`
/// * `config` - Router configuration
pub fn create_router<R, S>(pipeline: SheetPipeline<R, S>, config: RouterConfig) -> Router
where
    R: BackgroundRemover + 'static,
    S: ImageStore + 'static,
{
    let app_state = AppState::new(pipeline);
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/", get(index_handler::<R, S>))
        .route("/process", post(process_handler::<R, S>))
        .route("/health", get(health_handler))
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .expose_headers([
            HeaderName::from_static("content-disposition"),
            HeaderName::from_static("x-copies-requested"),
            HeaderName::from_static("x-copies-placed"),
            HeaderName::from_static("x-enhanced"),
        ])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
