//! API Handlers
//!
//! HTTP request handlers for each endpoint.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use tracing::{error, info};

use crate::error::{ApiError, Result};
use crate::manifest::{ShareMethod, WebManifest};
use crate::models::{HealthResponse, ShareRequest, ShareResponse};
use crate::storage::{MemoryRepository, ShareRecord, ShareRepository};
use crate::worker::ServiceWorker;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where shares are written
    pub repository: Arc<dyn ShareRepository>,
    /// Served at /manifest.json
    pub manifest: Arc<WebManifest>,
    /// Gateway worker, if an upstream is configured
    pub worker: Option<Arc<ServiceWorker>>,
}

impl AppState {
    /// Creates a new AppState over the given repository.
    ///
    /// The binary passes a [`MemoryRepository`], so shares only live as long
    /// as the process. A durable store plugs in through [`ShareRepository`].
    pub fn new(repository: Arc<dyn ShareRepository>, share_method: ShareMethod) -> Self {
        Self {
            repository,
            manifest: Arc::new(WebManifest::new(share_method)),
            worker: None,
        }
    }

    /// In-memory state, as used by tests and local runs.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryRepository::new()), ShareMethod::Get)
    }

    pub fn with_worker(mut self, worker: Arc<ServiceWorker>) -> Self {
        self.worker = Some(worker);
        self
    }
}

/// Handler for POST /api/share
///
/// Validates the body and writes one record. No retry on write failure.
pub async fn share_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ShareResponse>> {
    let event = ShareRequest::parse(&body)?.validate()?;
    let record = ShareRecord::from_event(&event, Utc::now());

    state.repository.put(record).await.map_err(|err| {
        error!("Database error: {}", err);
        ApiError::DatabaseError(err.to_string())
    })?;

    info!(url = %event.url, "Article shared");
    Ok(Json(ShareResponse::new(event.url)))
}

/// Handler for GET /manifest.json
pub async fn manifest_handler(State(state): State<AppState>) -> Json<WebManifest> {
    Json(state.manifest.as_ref().clone())
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
