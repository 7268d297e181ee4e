//! Request DTOs for the share target
//!
//! Defines the structure of incoming HTTP request bodies.

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::models::ShareEvent;

/// Request body for `POST /api/share`.
///
/// The body is validated by hand instead of through `Json<T>` so that a
/// missing or non-string `url` maps to `invalidInput` rather than the
/// extractor's own rejection.
#[derive(Debug, Clone)]
pub struct ShareRequest {
    fields: Map<String, Value>,
}

impl ShareRequest {
    /// Parses a raw request body.
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        if body.is_empty() {
            return Err(ApiError::InvalidInput(
                "Request body is missing".to_string(),
            ));
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Ok(Self { fields }),
            // Valid JSON that is not an object has no `url` member.
            Ok(_) => Err(ApiError::InvalidInput("URL is required".to_string())),
            Err(_) => Err(ApiError::InvalidInput(
                "Invalid JSON in request body".to_string(),
            )),
        }
    }

    /// Validates the request data
    ///
    /// `url` must be a non-empty string. `title` and `text` are kept only
    /// when they are strings.
    pub fn validate(self) -> Result<ShareEvent, ApiError> {
        let url = match self.fields.get("url") {
            Some(Value::String(url)) if !url.is_empty() => url.clone(),
            _ => return Err(ApiError::InvalidInput("URL is required".to_string())),
        };

        Ok(ShareEvent {
            url,
            title: string_field(&self.fields, "title"),
            text: string_field(&self.fields, "text"),
        })
    }
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
}
