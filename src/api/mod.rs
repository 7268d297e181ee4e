//! API Module
//!
//! HTTP handlers and routing for the share target.
//!
//! # Endpoints
//! - `POST /api/share` - Store a shared URL
//! - `GET /manifest.json` - Web app manifest with the share target
//! - `GET /health` - Health check endpoint
//! - anything else - the worker gateway, when an upstream is configured

pub mod gateway;
pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
