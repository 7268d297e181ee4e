//! Network access for the worker.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use reqwest::{redirect, Client};
use url::{Position, Url};

use crate::error::NetworkError;
use crate::fetch::{FetchRequest, FetchResponse, Network, ResponseKind};

/// Fetches through `reqwest`, mapping the worker's scope onto an upstream
/// origin.
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    client: Client,
    scope: Url,
    upstream: Url,
}

impl HttpNetwork {
    pub fn new(scope: Url, upstream: Url) -> Result<Self, NetworkError> {
        // Redirects go back to the browser untouched.
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            scope,
            upstream,
        })
    }

    /// Where `url` lives upstream. Requests outside the scope are fetched as is.
    fn target(&self, url: &Url) -> Result<Url, NetworkError> {
        if !self.in_scope(url) {
            return Ok(url.clone());
        }
        self.upstream
            .join(&url[Position::BeforePath..])
            .map_err(|e| NetworkError(e.to_string()))
    }

    fn in_scope(&self, url: &Url) -> bool {
        url.origin() == self.scope.origin()
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, NetworkError> {
        let target = self.target(&request.url)?;
        let kind = if self.in_scope(&request.url) {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        };

        let mut headers = request.headers;
        headers.remove(header::HOST);
        headers.remove(header::CONTENT_LENGTH);

        let response = self
            .client
            .request(request.method, target)
            .headers(headers)
            .body(request.body)
            .send()
            .await?;

        let status = response.status();
        let headers = strip_hop_by_hop(response.headers().clone());
        let body = response.bytes().await?;

        Ok(FetchResponse {
            status,
            headers,
            body,
            kind,
        })
    }
}

fn strip_hop_by_hop(mut headers: HeaderMap) -> HeaderMap {
    for name in [
        header::CONNECTION,
        header::TRANSFER_ENCODING,
        header::CONTENT_LENGTH,
        header::UPGRADE,
    ] {
        headers.remove(name);
    }
    headers
}
