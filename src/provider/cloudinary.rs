//! Cloudinary storage and enhancement client.
//!
//! Uploads go through the signed upload API. Enhancement is a delivery-URL
//! transformation on the stored asset: generative restore, automatic
//! quality, automatic format.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::debug;

use super::{ImageStore, StoredImage};
use crate::error::{EnhanceError, UploadError};

/// Default Cloudinary API base URL.
pub const DEFAULT_CLOUDINARY_API_URL: &str = "https://api.cloudinary.com/v1_1";

/// Default Cloudinary delivery base URL.
pub const DEFAULT_CLOUDINARY_DELIVERY_URL: &str = "https://res.cloudinary.com";

/// Transformation chain applied to fetch the enhanced photo.
pub const ENHANCE_TRANSFORMATION: &str = "e_gen_restore/q_auto/f_auto";

/// Formats we can decode, offered so `f_auto` does not pick AVIF.
const ACCEPTED_FORMATS: &str = "image/png,image/jpeg,image/webp";

/// Account credentials for the Cloudinary API.
#[derive(Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// HTTP client for Cloudinary upload and delivery.
#[derive(Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    credentials: CloudinaryCredentials,
    api_base: String,
    delivery_base: String,
}

impl CloudinaryClient {
    /// Create a client for the public Cloudinary endpoints.
    pub fn new(credentials: CloudinaryCredentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
            api_base: DEFAULT_CLOUDINARY_API_URL.to_string(),
            delivery_base: DEFAULT_CLOUDINARY_DELIVERY_URL.to_string(),
        }
    }

    /// Override the API base URL (upload endpoint).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Override the delivery base URL (transformed assets).
    pub fn with_delivery_base(mut self, base: impl Into<String>) -> Self {
        self.delivery_base = base.into();
        self
    }

    /// Share an existing HTTP client.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// URL of the signed upload endpoint.
    pub fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.api_base.trim_end_matches('/'),
            self.credentials.cloud_name
        )
    }

    /// Delivery URL of the enhanced rendition of `public_id`.
    pub fn enhanced_url(&self, public_id: &str) -> String {
        format!(
            "{}/{}/image/upload/{}/{}",
            self.delivery_base.trim_end_matches('/'),
            self.credentials.cloud_name,
            ENHANCE_TRANSFORMATION,
            public_id
        )
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    public_id: Option<String>,
}

#[async_trait]
impl ImageStore for CloudinaryClient {
    async fn upload(&self, image: Bytes) -> Result<StoredImage, UploadError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
            .to_string();
        let signature = sign_params(
            &[("timestamp", timestamp.as_str())],
            &self.credentials.api_secret,
        );

        let file = Part::bytes(image.to_vec())
            .file_name("photo.png")
            .mime_str("image/png")
            .map_err(|e| UploadError::Request(e.to_string()))?;

        let form = Form::new()
            .part("file", file)
            .text("api_key", self.credentials.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);

        let response = self
            .http
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        match (body.secure_url, body.public_id) {
            (Some(secure_url), Some(public_id))
                if !secure_url.is_empty() && !public_id.is_empty() =>
            {
                debug!(public_id = %public_id, "Uploaded to Cloudinary");
                Ok(StoredImage {
                    secure_url,
                    public_id,
                })
            }
            _ => Err(UploadError::MissingReference),
        }
    }

    async fn fetch_enhanced(&self, stored: &StoredImage) -> Result<Bytes, EnhanceError> {
        let url = self.enhanced_url(&stored.public_id);
        debug!(url = %url, "Fetching enhanced image");

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, ACCEPTED_FORMATS)
            .send()
            .await
            .map_err(|e| EnhanceError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnhanceError::Status(status.as_u16()));
        }

        response
            .bytes()
            .await
            .map_err(|e| EnhanceError::Request(e.to_string()))
    }
}

/// Compute a Cloudinary API signature.
///
/// Parameters are sorted by name, serialized as `k=v` pairs joined with `&`,
/// suffixed with the API secret and hashed with SHA-1.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

// =============================================================================
// Tests
// =============================================================================
