//! Storage endpoint client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::{ClientError, NetworkError};
use crate::models::{ShareEvent, ShareResponse};
use crate::worker::SHARE_API_PATH;

/// Anything that can store a share.
#[async_trait]
pub trait ShareApi: Send + Sync {
    /// Sends `event` once. Non-2xx answers are errors; there is no retry.
    async fn share(&self, event: &ShareEvent) -> Result<ShareResponse, ClientError>;
}

/// [`ShareApi`] over HTTP: `POST /api/share` with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpShareApi {
    client: Client,
    endpoint: Url,
}

impl HttpShareApi {
    /// Targets `<base>/api/share`. `timeout` of `None` waits for as long as
    /// the connection stays open.
    pub fn new(base: &Url, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(NetworkError::from)?;
        let endpoint = base
            .join(SHARE_API_PATH)
            .map_err(|e| ClientError::Network(NetworkError(e.to_string())))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ShareApi for HttpShareApi {
    async fn share(&self, event: &ShareEvent) -> Result<ShareResponse, ClientError> {
        debug!(endpoint = %self.endpoint, url = %event.url, "sending share");

        // `.json()` sets `Content-Type: application/json`.
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(event)
            .send()
            .await
            .map_err(NetworkError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        response
            .json::<ShareResponse>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}
