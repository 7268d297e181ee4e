//! Worker gateway
//!
//! Everything the router does not match itself is handed to the service
//! worker as an intercepted fetch, as a browser would.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::handlers::AppState;
use crate::fetch::{Destination, FetchRequest, RequestMode};

/// Largest request body forwarded to the worker.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Fallback handler: routes the request through the worker.
pub async fn gateway_handler(State(state): State<AppState>, request: Request) -> Response {
    let Some(worker) = state.worker.clone() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match to_fetch_request(worker.config().scope.clone(), request).await {
        Ok(fetch) => worker.handle_fetch(fetch).await.into_response(),
        Err(status) => status.into_response(),
    }
}

/// Rebuilds what the browser would have handed the worker.
pub async fn to_fetch_request(
    scope: url::Url,
    request: Request<Body>,
) -> Result<FetchRequest, StatusCode> {
    let (parts, body) = request.into_parts();

    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = scope.join(path).map_err(|_| StatusCode::BAD_REQUEST)?;

    let body = to_bytes(body, MAX_BODY_BYTES).await.map_err(|err| {
        warn!("Rejected gateway body: {}", err);
        StatusCode::PAYLOAD_TOO_LARGE
    })?;

    let referrer = header_str(&parts.headers, header::REFERER).and_then(|r| r.parse().ok());

    Ok(FetchRequest {
        mode: request_mode(&parts.method, &parts.headers),
        destination: header_str(&parts.headers, "sec-fetch-dest")
            .map(Destination::from_header)
            .unwrap_or_default(),
        method: parts.method,
        url,
        headers: parts.headers,
        body,
        referrer,
    })
}

/// `Sec-Fetch-Mode` when sent; otherwise an HTML-accepting GET is taken as a
/// navigation.
fn request_mode(method: &Method, headers: &HeaderMap) -> RequestMode {
    if let Some(mode) = header_str(headers, "sec-fetch-mode") {
        return RequestMode::from_header(mode);
    }

    let wants_html = header_str(headers, header::ACCEPT)
        .map(|accept| accept.contains("text/html"))
        .unwrap_or(false);
    if *method == Method::GET && wants_html {
        RequestMode::Navigate
    } else {
        RequestMode::NoCors
    }
}

fn header_str<K: header::AsHeaderName>(headers: &HeaderMap, name: K) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
