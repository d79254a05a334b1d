//! Test utilities for integration tests.
//!
//! This module provides mock provider implementations and helpers for
//! building test images and multipart bodies.

use async_trait::async_trait;
use bytes::Bytes;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use passport_sheet::error::{EnhanceError, RemovalError, UploadError};
use passport_sheet::provider::{BackgroundRemover, ImageStore, StoredImage};

// =============================================================================
// Mock Background Remover
// =============================================================================

/// A background remover that returns canned output and counts calls.
#[derive(Clone)]
pub struct MockRemover {
    output: Result<Bytes, RemovalError>,
    call_count: Arc<AtomicUsize>,
}

impl MockRemover {
    /// Succeed with a transparent-background portrait.
    pub fn new() -> Self {
        Self::with_output(create_cutout_png(60, 80))
    }

    /// Succeed with the given bytes.
    pub fn with_output(output: Vec<u8>) -> Self {
        Self {
            output: Ok(Bytes::from(output)),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail every call with the given error.
    pub fn failing(error: RemovalError) -> Self {
        Self {
            output: Err(error),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackgroundRemover for MockRemover {
    async fn remove_background(&self, _image: Bytes) -> Result<Bytes, RemovalError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.output.clone()
    }
}

// =============================================================================
// Mock Image Store
// =============================================================================

/// An image store that records uploads and serves a canned enhancement.
#[derive(Clone)]
pub struct MockStore {
    upload_result: Result<StoredImage, UploadError>,
    enhanced: Result<Bytes, EnhanceError>,
    upload_count: Arc<AtomicUsize>,
    fetch_count: Arc<AtomicUsize>,
    last_upload: Arc<std::sync::Mutex<Option<Bytes>>>,
}

impl MockStore {
    /// Succeed on upload and serve an opaque enhanced portrait.
    pub fn new() -> Self {
        Self {
            upload_result: Ok(StoredImage {
                secure_url: "https://res.example.com/demo/image/upload/v1/abc.png".to_string(),
                public_id: "abc".to_string(),
            }),
            enhanced: Ok(Bytes::from(create_opaque_png(60, 80, [200, 180, 160, 255]))),
            upload_count: Arc::new(AtomicUsize::new(0)),
            fetch_count: Arc::new(AtomicUsize::new(0)),
            last_upload: Arc::new(std::sync::Mutex::new(None)),
        }
    }

    /// Fail uploads with the given error.
    pub fn with_upload_error(mut self, error: UploadError) -> Self {
        self.upload_result = Err(error);
        self
    }

    /// Fail enhancement fetches with the given error.
    pub fn with_enhance_error(mut self, error: EnhanceError) -> Self {
        self.enhanced = Err(error);
        self
    }

    /// Serve these bytes as the enhanced rendition.
    pub fn with_enhanced_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.enhanced = Ok(Bytes::from(bytes));
        self
    }

    pub fn upload_count(&self) -> usize {
        self.upload_count.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Bytes of the most recent upload.
    pub fn last_upload(&self) -> Option<Bytes> {
        self.last_upload.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for MockStore {
    async fn upload(&self, image: Bytes) -> Result<StoredImage, UploadError> {
        self.upload_count.fetch_add(1, Ordering::SeqCst);
        *self.last_upload.lock().unwrap() = Some(image);
        self.upload_result.clone()
    }

    async fn fetch_enhanced(&self, _stored: &StoredImage) -> Result<Bytes, EnhanceError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.enhanced.clone()
    }
}

// =============================================================================
// Image Helpers
// =============================================================================

fn encode_png(image: &RgbaImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// A PNG with a transparent background and an opaque subject in the middle.
pub fn create_cutout_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        let inside = x > width / 4 && x < width * 3 / 4 && y > height / 4 && y < height * 3 / 4;
        if inside {
            Rgba([120, 90, 60, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    encode_png(&image)
}

/// A PNG filled with one color.
pub fn create_opaque_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    encode_png(&RgbaImage::from_pixel(width, height, Rgba(color)))
}

/// Check that bytes look like a PDF document.
pub fn is_valid_pdf(data: &[u8]) -> bool {
    data.starts_with(b"%PDF") && data.windows(5).any(|w| w == b"%%EOF")
}

// =============================================================================
// Multipart Helpers
// =============================================================================

pub const BOUNDARY: &str = "passport-sheet-test-boundary";

/// Builds a `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file field.
    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, filename, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Add a text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    /// Finish the body.
    pub fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.body
    }

    /// Content-Type header value for this body.
    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={}", BOUNDARY)
    }
}
