//! External image providers.
//!
//! The pipeline talks to two collaborators through traits so the HTTP
//! clients can be swapped for in-memory mocks in tests:
//!
//! ```text
//!                 ┌──────────────────────┐
//!                 │    SheetPipeline     │
//!                 └──────────┬───────────┘
//!              ┌─────────────┴─────────────┐
//!              ▼                           ▼
//! ┌──────────────────────┐    ┌──────────────────────────┐
//! │  BackgroundRemover   │    │        ImageStore        │
//! │  (RemoveBgClient)    │    │  (CloudinaryClient)      │
//! │                      │    │  upload + enhanced fetch │
//! └──────────────────────┘    └──────────────────────────┘
//! ```

mod cloudinary;
mod remove_bg;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{EnhanceError, RemovalError, UploadError};

pub use cloudinary::{
    sign_params, CloudinaryClient, CloudinaryCredentials, DEFAULT_CLOUDINARY_API_URL,
    DEFAULT_CLOUDINARY_DELIVERY_URL, ENHANCE_TRANSFORMATION,
};
pub use remove_bg::{parse_error_response, RemoveBgClient, DEFAULT_REMOVE_BG_URL};

/// A reference to an image held by the storage provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// HTTPS URL of the stored original
    pub secure_url: String,

    /// Provider identifier used to request transformations
    pub public_id: String,
}

/// Removes the background from a photo.
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    /// Return the photo with its background removed, usually as a PNG with
    /// an alpha channel.
    async fn remove_background(&self, image: Bytes) -> Result<Bytes, RemovalError>;
}

/// Stores images and serves enhanced renditions of them.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Upload image bytes and return a reference to the stored asset.
    async fn upload(&self, image: Bytes) -> Result<StoredImage, UploadError>;

    /// Download the enhanced rendition of a stored asset.
    async fn fetch_enhanced(&self, stored: &StoredImage) -> Result<Bytes, EnhanceError>;
}
