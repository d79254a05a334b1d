//! HTTP server layer for the passport sheet service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │              POST /process (multipart: image, copies)           │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    index    │  │        routes           │  │
//! │  │ (requests)  │  │ (form page) │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod index;
pub mod routes;

pub use handlers::{
    error_status, health_handler, index_handler, parse_copies, process_handler, AppState,
    ErrorResponse, HealthResponse, COPIES_FIELD, IMAGE_FIELD, SHEET_FILENAME,
};
pub use routes::{create_router, RouterConfig, DEFAULT_MAX_UPLOAD_BYTES};
