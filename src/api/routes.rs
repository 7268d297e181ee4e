//! API Routes
//!
//! Configures the Axum router with the share target endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::gateway::gateway_handler;
use super::handlers::{health_handler, manifest_handler, share_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: any origin, any method, any header, preflight included
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/share", post(share_handler))
        .route("/manifest.json", get(manifest_handler))
        .route("/health", get(health_handler))
        .fallback(gateway_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
