//! remove.bg background-removal client.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::BackgroundRemover;
use crate::error::RemovalError;

/// Default remove.bg API endpoint.
pub const DEFAULT_REMOVE_BG_URL: &str = "https://api.remove.bg/v1.0/removebg";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Longest provider body quoted in an error message.
const MAX_ERROR_BODY: usize = 512;

/// HTTP client for the remove.bg API.
#[derive(Clone)]
pub struct RemoveBgClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl RemoveBgClient {
    /// Create a client for the public remove.bg endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: DEFAULT_REMOVE_BG_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Point the client at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Share an existing HTTP client.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BackgroundRemover for RemoveBgClient {
    async fn remove_background(&self, image: Bytes) -> Result<Bytes, RemovalError> {
        let form = Form::new()
            .part("image_file", Part::bytes(image.to_vec()).file_name("image"))
            .text("size", "auto");

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .multipart(form)
            .send()
            .await
            .map_err(|e| RemovalError::Failed {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| RemovalError::Failed {
            status: Some(status.as_u16()),
            message: e.to_string(),
        })?;

        debug!(status = status.as_u16(), bytes = body.len(), "remove.bg responded");

        if status == StatusCode::OK {
            Ok(body)
        } else {
            Err(parse_error_response(status.as_u16(), &body))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    code: Option<String>,
}

/// Classify a non-200 remove.bg response.
///
/// A body of the form `{"errors": [{"code": "..."}, ...]}` yields
/// [`RemovalError::Provider`] with the first code; an entry without a code
/// yields [`RemovalError::UNKNOWN_CODE`]. Anything else, including an empty
/// error list, is [`RemovalError::Failed`].
pub fn parse_error_response(status: u16, body: &[u8]) -> RemovalError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => match parsed.errors.into_iter().next() {
            Some(first) => RemovalError::Provider {
                code: first
                    .code
                    .unwrap_or_else(|| RemovalError::UNKNOWN_CODE.to_string()),
            },
            None => RemovalError::Failed {
                status: Some(status),
                message: "provider returned no error details".to_string(),
            },
        },
        Err(_) => {
            let text = String::from_utf8_lossy(body);
            RemovalError::Failed {
                status: Some(status),
                message: text.chars().take(MAX_ERROR_BODY).collect(),
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
