//! Worker routes and cache generation.

use url::Url;

use crate::cache::{FALLBACK_ICON, SHELL_DOCUMENT};

/// POST target declared in the manifest.
pub const SHARE_TARGET_PATH: &str = "/share-target";
/// GET target declared in the manifest; the landing page stores the share itself.
pub const SHARED_PATH: &str = "/shared";
/// Where a POST share is redirected.
pub const SUCCESS_PATH: &str = "/share-success";
/// Storage endpoint path.
pub const SHARE_API_PATH: &str = "/api/share";

/// Everything the interceptor needs to classify and answer requests.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Origin (and base path) the worker controls
    pub scope: Url,
    /// Current cache generation
    pub cache_name: String,
    pub share_target_path: String,
    pub shared_path: String,
    pub success_path: String,
}

impl WorkerConfig {
    pub fn new(scope: Url, cache_name: impl Into<String>) -> Self {
        Self {
            scope,
            cache_name: cache_name.into(),
            share_target_path: SHARE_TARGET_PATH.to_string(),
            shared_path: SHARED_PATH.to_string(),
            success_path: SUCCESS_PATH.to_string(),
        }
    }

    /// Resolves an origin-relative path (`/index.html`) on the scope's origin,
    /// e.g. for cache keys. A base path in the scope is not kept.
    pub fn resolve(&self, path: &str) -> Url {
        self.scope.join(path).unwrap_or_else(|_| self.scope.clone())
    }

    pub fn shell_document(&self) -> Url {
        self.resolve(SHELL_DOCUMENT)
    }

    pub fn fallback_icon(&self) -> Url {
        self.resolve(FALLBACK_ICON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_against_scope() {
        let config = WorkerConfig::new(Url::parse("https://app.example/").unwrap(), "v1");
        assert_eq!(config.shell_document().as_str(), "https://app.example/index.html");
        assert_eq!(config.fallback_icon().as_str(), "https://app.example/icon-192x192.png");
    }

    #[test]
    fn test_resolve_is_origin_relative() {
        let config = WorkerConfig::new(Url::parse("https://h.example/app/").unwrap(), "v1");
        assert_eq!(config.shell_document().as_str(), "https://h.example/index.html");
        assert_eq!(config.resolve("/").as_str(), "https://h.example/");
    }
}
