//! Request and Response models for the share target
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies, plus the
//! share payload that flows between the worker, the pages and the endpoint.

pub mod requests;
pub mod responses;
pub mod share;

// Re-export commonly used types
pub use requests::ShareRequest;
pub use responses::{ErrorBody, ErrorResponse, HealthResponse, ShareResponse};
pub use share::{ShareEvent, ShareParams};
