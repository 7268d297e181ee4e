//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use share_target::{
    api::create_router,
    manifest::ShareMethod,
    models::ErrorResponse,
    storage::{MemoryRepository, ShareRecord, ShareRepository, StorageError},
    AppState,
};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> (Router, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::new());
    let state = AppState::new(repository.clone(), ShareMethod::Get);
    (create_router(state), repository)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_to_error(body: Body) -> ErrorResponse {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn share_request(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/share")
        .header("content-type", "application/json")
        .header("origin", "https://blog.example")
        .body(Body::from(body))
        .unwrap()
}

struct FailingRepository;

#[async_trait]
impl ShareRepository for FailingRepository {
    async fn put(&self, _: ShareRecord) -> Result<(), StorageError> {
        Err(StorageError("ResourceNotFoundException: table missing".to_string()))
    }

    async fn list(&self, _: &str) -> Result<Vec<ShareRecord>, StorageError> {
        Ok(Vec::new())
    }
}

// == Share Endpoint Tests ==

#[tokio::test]
async fn test_share_success_echoes_url() {
    let (app, repository) = create_test_app();

    let response = app
        .oneshot(share_request(
            r#"{"url":"https://x.example/post","title":"A post","text":"worth reading"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Article shared successfully");
    assert_eq!(json["url"], "https://x.example/post");

    let records = repository.list("anonymous").await.unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.user_id, "anonymous");
    assert_eq!(record.url, "https://x.example/post");
    assert_eq!(record.title, "A post");
    assert_eq!(record.text, "worth reading");
    assert_eq!(record.status, "pending");
    assert_eq!(record.timestamp, record.created_at);
}

#[tokio::test]
async fn test_share_defaults_title_and_text() {
    let (app, repository) = create_test_app();

    let response = app
        .oneshot(share_request(r#"{"url":"https://x.example"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let records = repository.list("anonymous").await.unwrap();
    assert_eq!(records[0].title, "");
    assert_eq!(records[0].text, "");
}

#[tokio::test]
async fn test_share_missing_url() {
    let (app, repository) = create_test_app();

    let response = app
        .oneshot(share_request(r#"{"title":"no link"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_to_error(response.into_body()).await;
    assert_eq!(body, ErrorResponse::new("invalidInput", "URL is required"));
    assert_eq!(repository.len().await, 0);
}

#[tokio::test]
async fn test_share_non_string_url() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(share_request(r#"{"url":42}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_to_error(response.into_body()).await;
    assert_eq!(body.error.message, "URL is required");
}

#[tokio::test]
async fn test_share_invalid_json() {
    let (app, _) = create_test_app();

    let response = app.oneshot(share_request("{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_to_error(response.into_body()).await;
    assert_eq!(
        body,
        ErrorResponse::new("invalidInput", "Invalid JSON in request body")
    );
}

#[tokio::test]
async fn test_share_empty_body() {
    let (app, _) = create_test_app();

    let response = app.oneshot(share_request("")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_to_error(response.into_body()).await;
    assert_eq!(body.error.message, "Request body is missing");
}

#[tokio::test]
async fn test_share_database_error() {
    let app = create_router(AppState::new(Arc::new(FailingRepository), ShareMethod::Get));

    let response = app
        .oneshot(share_request(r#"{"url":"https://x.example"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_to_error(response.into_body()).await;
    assert_eq!(body.error.kind, "databaseError");
    assert!(body.error.message.contains("table missing"));
}

#[tokio::test]
async fn test_share_error_carries_cors_headers() {
    let (app, _) = create_test_app();

    let response = app.oneshot(share_request("{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

// == Manifest Tests ==

#[tokio::test]
async fn test_manifest_declares_share_target() {
    let app = create_router(AppState::new(
        Arc::new(MemoryRepository::new()),
        ShareMethod::Post,
    ));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/manifest.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["share_target"]["action"], "/share-target");
    assert_eq!(json["share_target"]["method"], "POST");
    assert_eq!(json["icons"][0]["src"], "/icon-192x192.png");
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
