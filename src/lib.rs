//! # Passport Sheet
//!
//! Turns a single portrait into a printable A4 sheet of passport photos.
//!
//! The uploaded photo has its background removed by an external provider,
//! is stored and enhanced by a second provider, and is then resized,
//! framed and tiled onto a 300 DPI page delivered as a PDF.
//!
//! ## Features
//!
//! - **Deterministic layout**: row-major flow with margins, gaps and row
//!   spacing; copies that do not fit are dropped, never spilled to a second page
//! - **Provider seams**: background removal and storage sit behind traits so
//!   they can be mocked
//! - **Graceful enhancement**: if the enhanced rendition cannot be fetched,
//!   the sheet is built from the background-removed photo
//! - **Offline commands**: `render` and `plan` work without any provider
//!
//! ## Architecture
//!
//! - [`layout`] - Page geometry and placement planning
//! - [`tile`] - Flattening, resizing and framing of the photo
//! - [`sheet`] - Page composition and PDF export
//! - [`provider`] - remove.bg and Cloudinary clients
//! - [`pipeline`] - End-to-end request processing
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use passport_sheet::{create_router, CloudinaryClient, CloudinaryCredentials};
//! use passport_sheet::{RemoveBgClient, RouterConfig, SheetPipeline};
//!
//! #[tokio::main]
//! async fn main() {
//!     let remover = RemoveBgClient::new("remove-bg-key");
//!     let store = CloudinaryClient::new(CloudinaryCredentials {
//!         cloud_name: "demo".to_string(),
//!         api_key: "key".to_string(),
//!         api_secret: "secret".to_string(),
//!     });
//!
//!     let router = create_router(SheetPipeline::new(remover, store), RouterConfig::new());
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod provider;
pub mod server;
pub mod sheet;
pub mod tile;

// Re-export commonly used types
pub use config::{Cli, Command, LayoutArgs, PlanConfig, RenderConfig, ServeConfig};
pub use error::{EnhanceError, ImageError, PipelineError, RemovalError, UploadError};
pub use layout::{plan_page, LayoutParameters, PagePlan, Placement};
pub use pipeline::{render_sheet, SheetOutput, SheetPipeline, SheetRequest};
pub use provider::{
    BackgroundRemover, CloudinaryClient, CloudinaryCredentials, ImageStore, RemoveBgClient,
    StoredImage,
};
pub use server::{create_router, AppState, ErrorResponse, HealthResponse, RouterConfig};
pub use sheet::{compose_page, export_pdf, Page};
pub use tile::{prepare_tile, Tile};
