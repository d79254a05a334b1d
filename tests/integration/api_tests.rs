//! API integration tests for sheet rendering and error handling.
//!
//! Tests verify:
//! - Successful sheet rendering with PDF headers
//! - Error cases (missing image, invalid copies, provider failures)
//! - Index form and health endpoints

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use passport_sheet::error::{RemovalError, UploadError};
use passport_sheet::layout::LayoutParameters;
use passport_sheet::{create_router, RouterConfig, SheetPipeline};

use super::test_utils::{is_valid_pdf, MockRemover, MockStore, MultipartBody};

/// A small page holding 3 columns and 2 rows.
fn small_layout() -> LayoutParameters {
    LayoutParameters {
        tile_width: 24,
        tile_height: 30,
        border_width: 1,
        vertical_spacing: 4,
        margin_x: 2,
        margin_y: 2,
        horizontal_gap: 3,
        page_width: 100,
        page_height: 80,
        requested_copies: 4,
    }
}

fn test_router(remover: MockRemover, store: MockStore) -> Router {
    let pipeline = SheetPipeline::new(remover, store).with_layout(small_layout());
    create_router(pipeline, RouterConfig::new().with_tracing(false))
}

fn process_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/process")
        .header("content-type", MultipartBody::content_type())
        .body(Body::from(body))
        .unwrap()
}

async fn error_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

// =============================================================================
// Successful Rendering
// =============================================================================

#[tokio::test]
async fn test_process_returns_pdf() {
    let remover = MockRemover::new();
    let store = MockStore::new();
    let router = test_router(remover.clone(), store.clone());

    let body = MultipartBody::new()
        .file("image", "me.jpg", "image/jpeg", b"raw upload bytes")
        .text("copies", "5")
        .build();

    let response = router.oneshot(process_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/pdf"
    );
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"passport-sheet.pdf\""
    );
    assert_eq!(response.headers().get("x-copies-requested").unwrap(), "5");
    assert_eq!(response.headers().get("x-copies-placed").unwrap(), "5");
    assert_eq!(response.headers().get("x-enhanced").unwrap(), "true");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(is_valid_pdf(&body), "Response should be a PDF document");

    assert_eq!(remover.call_count(), 1);
    assert_eq!(store.upload_count(), 1);
    assert_eq!(store.fetch_count(), 1);
}

#[tokio::test]
async fn test_process_uses_default_copies() {
    let router = test_router(MockRemover::new(), MockStore::new());

    let body = MultipartBody::new()
        .file("image", "me.png", "image/png", b"raw upload bytes")
        .build();

    let response = router.oneshot(process_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-copies-requested").unwrap(), "4");
    assert_eq!(response.headers().get("x-copies-placed").unwrap(), "4");
}

#[tokio::test]
async fn test_process_blank_copies_uses_default() {
    let router = test_router(MockRemover::new(), MockStore::new());

    let body = MultipartBody::new()
        .text("copies", "")
        .file("image", "me.png", "image/png", b"raw upload bytes")
        .build();

    let response = router.oneshot(process_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-copies-requested").unwrap(), "4");
}

#[tokio::test]
async fn test_process_truncates_to_capacity() {
    let router = test_router(MockRemover::new(), MockStore::new());

    let body = MultipartBody::new()
        .file("image", "me.png", "image/png", b"raw upload bytes")
        .text("copies", "40")
        .build();

    let response = router.oneshot(process_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-copies-requested").unwrap(), "40");
    assert_eq!(response.headers().get("x-copies-placed").unwrap(), "6");
}

#[tokio::test]
async fn test_process_huge_copies_truncates_to_capacity() {
    let router = test_router(MockRemover::new(), MockStore::new());

    let body = MultipartBody::new()
        .file("image", "me.png", "image/png", b"raw upload bytes")
        .text("copies", "99999999999")
        .build();

    let response = router.oneshot(process_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-copies-requested").unwrap(),
        "4294967295"
    );
    assert_eq!(response.headers().get("x-copies-placed").unwrap(), "6");
}

#[tokio::test]
async fn test_process_zero_copies_returns_blank_sheet() {
    let router = test_router(MockRemover::new(), MockStore::new());

    let body = MultipartBody::new()
        .file("image", "me.png", "image/png", b"raw upload bytes")
        .text("copies", "0")
        .build();

    let response = router.oneshot(process_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-copies-placed").unwrap(), "0");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(is_valid_pdf(&body));
}

// =============================================================================
// Client Errors
// =============================================================================

#[tokio::test]
async fn test_process_missing_image() {
    let remover = MockRemover::new();
    let router = test_router(remover.clone(), MockStore::new());

    let body = MultipartBody::new().text("copies", "6").build();
    let response = router.oneshot(process_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = error_body(response).await;
    assert_eq!(error["error"], "missing_input");
    assert_eq!(error["status"], 400);

    // No provider was contacted
    assert_eq!(remover.call_count(), 0);
}

#[tokio::test]
async fn test_process_empty_image() {
    let router = test_router(MockRemover::new(), MockStore::new());

    let body = MultipartBody::new()
        .file("image", "empty.png", "image/png", b"")
        .build();
    let response = router.oneshot(process_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await["error"], "missing_input");
}

#[tokio::test]
async fn test_process_not_multipart() {
    let router = test_router(MockRemover::new(), MockStore::new());

    let request = Request::builder()
        .method("POST")
        .uri("/process")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await["error"], "missing_input");
}

#[tokio::test]
async fn test_process_invalid_copies() {
    let remover = MockRemover::new();
    let router = test_router(remover.clone(), MockStore::new());

    for value in ["many", "-1", "2.5"] {
        let body = MultipartBody::new()
            .text("copies", value)
            .file("image", "me.png", "image/png", b"raw upload bytes")
            .build();
        let response = router
            .clone()
            .oneshot(process_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "copies={}", value);
        assert_eq!(error_body(response).await["error"], "invalid_copies");
    }

    assert_eq!(remover.call_count(), 0);
}

// =============================================================================
// Provider Errors
// =============================================================================

#[tokio::test]
async fn test_process_provider_rejection_returns_gone() {
    let store = MockStore::new();
    let remover = MockRemover::failing(RemovalError::Provider {
        code: "unknown_foreground".to_string(),
    });
    let router = test_router(remover, store.clone());

    let body = MultipartBody::new()
        .file("image", "me.png", "image/png", b"raw upload bytes")
        .build();
    let response = router.oneshot(process_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::GONE);
    let error = error_body(response).await;
    assert_eq!(error["error"], "unknown_foreground");
    assert_eq!(error["status"], 410);

    // The pipeline stopped before the upload
    assert_eq!(store.upload_count(), 0);
}

#[tokio::test]
async fn test_process_removal_failure_returns_500() {
    let remover = MockRemover::failing(RemovalError::Failed {
        status: Some(502),
        message: "bad gateway".to_string(),
    });
    let router = test_router(remover, MockStore::new());

    let body = MultipartBody::new()
        .file("image", "me.png", "image/png", b"raw upload bytes")
        .build();
    let response = router.oneshot(process_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_body(response).await["error"], "bg_removal_failed");
}

#[tokio::test]
async fn test_process_upload_without_reference_returns_500() {
    let store = MockStore::new().with_upload_error(UploadError::MissingReference);
    let router = test_router(MockRemover::new(), store.clone());

    let body = MultipartBody::new()
        .file("image", "me.png", "image/png", b"raw upload bytes")
        .build();
    let response = router.oneshot(process_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_body(response).await["error"], "upload_failed");
    assert_eq!(store.fetch_count(), 0);
}

#[tokio::test]
async fn test_process_undecodable_cutout_returns_500() {
    let remover = MockRemover::with_output(b"definitely not an image".to_vec());
    let store = MockStore::new();
    let router = test_router(remover, store.clone());

    let body = MultipartBody::new()
        .file("image", "me.png", "image/png", b"raw upload bytes")
        .build();
    let response = router.oneshot(process_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_body(response).await["error"], "image_error");
    assert_eq!(store.upload_count(), 0);
}

// =============================================================================
// Other Endpoints
// =============================================================================

#[tokio::test]
async fn test_index_serves_form() {
    let router = test_router(MockRemover::new(), MockStore::new());

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/html"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains(r#"action="/process""#));
    assert!(html.contains(r#"value="4""#));
}

#[tokio::test]
async fn test_health() {
    let router = test_router(MockRemover::new(), MockStore::new());

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = error_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_process_rejects_get() {
    let router = test_router(MockRemover::new(), MockStore::new());

    let request = Request::builder()
        .uri("/process")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_process_rejects_oversized_upload() {
    let pipeline = SheetPipeline::new(MockRemover::new(), MockStore::new())
        .with_layout(small_layout());
    let router = create_router(
        pipeline,
        RouterConfig::new()
            .with_tracing(false)
            .with_max_upload_bytes(1024),
    );

    let body = MultipartBody::new()
        .file("image", "big.png", "image/png", &vec![7u8; 4096])
        .build();
    let response = router.oneshot(process_request(body)).await.unwrap();

    assert!(
        response.status().is_client_error(),
        "Oversized upload should be rejected, got {}",
        response.status()
    );
}
