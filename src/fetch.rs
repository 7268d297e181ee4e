//! Fetch primitives
//!
//! Request/response values passed between the interceptor, the cache and the
//! network, plus the [`Network`] seam the worker fetches through.

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use url::Url;

use crate::error::NetworkError;

// == Request Mode ==
/// How the browser issued the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    /// A top-level page navigation
    Navigate,
    SameOrigin,
    #[default]
    NoCors,
    Cors,
}

impl RequestMode {
    /// Parses a `Sec-Fetch-Mode` header value.
    pub fn from_header(value: &str) -> Self {
        match value {
            "navigate" => RequestMode::Navigate,
            "same-origin" => RequestMode::SameOrigin,
            "cors" => RequestMode::Cors,
            _ => RequestMode::NoCors,
        }
    }
}

// == Destination ==
/// What the response will be used as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    Document,
    Image,
    Script,
    Style,
    Font,
    Manifest,
    #[default]
    Empty,
    Other,
}

impl Destination {
    /// Parses a `Sec-Fetch-Dest` header value.
    pub fn from_header(value: &str) -> Self {
        match value {
            "document" => Destination::Document,
            "image" => Destination::Image,
            "script" => Destination::Script,
            "style" => Destination::Style,
            "font" => Destination::Font,
            "manifest" => Destination::Manifest,
            "empty" | "" => Destination::Empty,
            _ => Destination::Other,
        }
    }
}

const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".svg"];

// == Fetch Request ==
/// A request seen by the worker.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub url: Url,
    pub mode: RequestMode,
    pub destination: Destination,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub referrer: Option<Url>,
}

impl FetchRequest {
    /// A plain subresource GET.
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            mode: RequestMode::NoCors,
            destination: Destination::Empty,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            referrer: None,
        }
    }

    /// A top-level GET navigation.
    pub fn navigate(url: Url) -> Self {
        Self {
            mode: RequestMode::Navigate,
            destination: Destination::Document,
            ..Self::get(url)
        }
    }

    /// A form submission navigation with an urlencoded body.
    pub fn post_form(url: Url, body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        Self {
            method: Method::POST,
            headers,
            body: body.into(),
            ..Self::navigate(url)
        }
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    pub fn with_referrer(mut self, referrer: Url) -> Self {
        self.referrer = Some(referrer);
        self
    }

    pub fn is_navigate(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    /// Cache key: the full request URL.
    pub fn cache_key(&self) -> &str {
        self.url.as_str()
    }

    /// True for image destinations and image-looking paths.
    pub fn is_image(&self) -> bool {
        if self.destination == Destination::Image {
            return true;
        }
        let path = self.url.path().to_ascii_lowercase();
        IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
    }
}

// == Response Kind ==
/// Where a response came from, as far as caching is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin response with readable body
    Basic,
    /// Cross-origin response allowed by CORS
    Cors,
    /// Cross-origin response without CORS
    Opaque,
    /// Network error placeholder
    Error,
}

// == Fetch Response ==
/// A fully buffered response.
///
/// The body is a `Bytes` handle, so cloning to keep one copy for the cache
/// and hand another to the caller does not copy the payload.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub kind: ResponseKind,
}

impl FetchResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            kind: ResponseKind::Basic,
        }
    }

    /// A `text/plain` response.
    pub fn text(status: StatusCode, body: &'static str) -> Self {
        Self::new(status, body).with_header(header::CONTENT_TYPE, "text/plain")
    }

    /// A redirect without body.
    pub fn redirect(status: StatusCode, location: &str) -> Self {
        let mut response = Self::new(status, Bytes::new());
        if let Ok(value) = HeaderValue::from_str(location) {
            response.headers.insert(header::LOCATION, value);
        }
        response
    }

    /// Synthesized answer for an asset that is neither cached nor reachable.
    pub fn network_error() -> Self {
        Self::text(StatusCode::SERVICE_UNAVAILABLE, "Network error occurred")
    }

    pub fn with_header(mut self, name: header::HeaderName, value: &'static str) -> Self {
        self.headers.insert(name, HeaderValue::from_static(value));
        self
    }

    pub fn with_kind(mut self, kind: ResponseKind) -> Self {
        self.kind = kind;
        self
    }

    /// Only direct same-origin 200 responses are worth caching.
    pub fn is_cacheable(&self) -> bool {
        self.status == StatusCode::OK && self.kind == ResponseKind::Basic
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

impl IntoResponse for FetchResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

// == Network ==
/// Anything that can turn a request into a response.
#[async_trait]
pub trait Network: Send + Sync {
    /// Performs the request. An `Err` means no response was received at all;
    /// HTTP error statuses are `Ok`.
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, NetworkError>;
}
