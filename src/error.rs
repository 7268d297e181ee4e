//! Error types for the share target
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Api Error Enum ==
/// Errors surfaced by the storage endpoint.
///
/// Serialized as `{"error": {"type": ..., "message": ...}}`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or malformed request body
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The underlying write failed
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl ApiError {
    /// Wire name of the error variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "invalidInput",
            ApiError::DatabaseError(_) => "databaseError",
        }
    }

    /// Human readable message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            ApiError::InvalidInput(msg) | ApiError::DatabaseError(msg) => msg,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::new(self.kind(), self.message());
        (self.status(), Json(body)).into_response()
    }
}

// == Network Error ==
/// A fetch that never produced a response (offline, DNS, refused, ...).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Network error: {0}")]
pub struct NetworkError(pub String);

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        NetworkError(err.to_string())
    }
}

// == Client Error ==
/// Failures seen by callers of the storage endpoint.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The endpoint answered with a non-2xx status
    #[error("API status code: {0}")]
    Status(u16),

    /// No response at all
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The endpoint answered 2xx with a body we could not read
    #[error("Malformed response: {0}")]
    Decode(String),
}

// == Cache Error ==
/// Failures while populating the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A shell asset could not be fetched during install
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: NetworkError,
    },

    /// A shell asset answered with a non-200 status during install
    #[error("Bad status {status} for {url}")]
    BadStatus { url: String, status: u16 },
}

// == Result Type Alias ==
/// Convenience Result type for the storage endpoint.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_400() {
        let err = ApiError::InvalidInput("URL is required".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "invalidInput");
        assert_eq!(err.message(), "URL is required");
    }

    #[test]
    fn test_database_error_maps_to_500() {
        let err = ApiError::DatabaseError("disk on fire".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind(), "databaseError");
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::InvalidInput("URL is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, ErrorResponse::new("invalidInput", "URL is required"));
    }

    #[test]
    fn test_client_status_display() {
        assert_eq!(ClientError::Status(502).to_string(), "API status code: 502");
    }
}
