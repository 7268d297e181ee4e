//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use url::Url;

use crate::manifest::ShareMethod;

/// Cache generation tag used when `CACHE_VERSION` is not set.
pub const DEFAULT_CACHE_VERSION: &str = "blog-share-target-v1";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// URL browsers reach this server at; the worker's scope
    pub public_url: Url,
    /// Base URL the storage endpoint is reachable at
    pub api_base_url: Url,
    /// Origin the gateway proxies to; the gateway is disabled when unset
    pub upstream_url: Option<Url>,
    /// Name of the current cache generation
    pub cache_version: String,
    /// Share method declared in the manifest
    pub share_method: ShareMethod,
    /// Timeout in seconds for page-initiated share calls, None = wait forever
    pub share_timeout: Option<u64>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PUBLIC_URL` - Public base URL (default: http://127.0.0.1:<port>/)
    /// - `API_BASE_URL` - Storage endpoint base (default: `PUBLIC_URL`)
    /// - `UPSTREAM_URL` - Origin for the gateway (default: unset)
    /// - `CACHE_VERSION` - Cache generation tag (default: blog-share-target-v1)
    /// - `SHARE_METHOD` - GET or POST (default: GET)
    /// - `SHARE_TIMEOUT` - Share call timeout in seconds (default: unset)
    pub fn from_env() -> Self {
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);
        let public_url = env_url("PUBLIC_URL").unwrap_or_else(|| local_url(server_port));

        Self {
            server_port,
            api_base_url: env_url("API_BASE_URL").unwrap_or_else(|| public_url.clone()),
            public_url,
            upstream_url: env_url("UPSTREAM_URL"),
            cache_version: env::var("CACHE_VERSION")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_CACHE_VERSION.to_string()),
            share_method: env::var("SHARE_METHOD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(ShareMethod::Get),
            share_timeout: env::var("SHARE_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            public_url: local_url(3000),
            api_base_url: local_url(3000),
            upstream_url: None,
            cache_version: DEFAULT_CACHE_VERSION.to_string(),
            share_method: ShareMethod::Get,
            share_timeout: None,
        }
    }
}

fn env_url(name: &str) -> Option<Url> {
    env::var(name).ok().and_then(|v| Url::parse(&v).ok())
}

fn local_url(port: u16) -> Url {
    Url::parse(&format!("http://127.0.0.1:{}/", port)).expect("loopback URL is valid")
}
