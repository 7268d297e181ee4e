//! Cache Store Module
//!
//! Named caches of buffered responses keyed by request URL.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::StatusCode;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::CacheError;
use crate::fetch::{FetchRequest, FetchResponse, Network};

// == Cache ==
/// A single named cache.
///
/// Cheap to clone; all clones share the same entries.
#[derive(Debug, Clone)]
pub struct Cache {
    /// Cache name (the version tag)
    name: Arc<str>,
    /// URL -> response
    entries: Arc<RwLock<HashMap<String, FetchResponse>>>,
}

impl Cache {
    // == Constructor ==
    fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Match ==
    /// Returns a copy of the response stored for `url`.
    pub async fn match_url(&self, url: &str) -> Option<FetchResponse> {
        self.entries.read().await.get(url).cloned()
    }

    // == Put ==
    /// Stores `response` under `url`, replacing any previous entry.
    ///
    /// Concurrent puts of the same key are a benign race: the last writer wins
    /// and both writers hold equivalent content.
    pub async fn put(&self, url: impl Into<String>, response: FetchResponse) {
        let url = url.into();
        debug!(cache = %self.name, %url, "cache put");
        self.entries.write().await.insert(url, response);
    }

    // == Delete ==
    /// Removes the entry for `url`. Returns whether one existed.
    pub async fn delete(&self, url: &str) -> bool {
        self.entries.write().await.remove(url).is_some()
    }

    // == Add All ==
    /// Fetches every request and stores the responses.
    ///
    /// Nothing is stored unless every fetch succeeds with status 200.
    pub async fn add_all<N>(&self, requests: Vec<FetchRequest>, network: &N) -> Result<(), CacheError>
    where
        N: Network + ?Sized,
    {
        let mut fetched = Vec::with_capacity(requests.len());

        for request in requests {
            let key = request.cache_key().to_string();
            let response = network
                .fetch(request)
                .await
                .map_err(|source| CacheError::Fetch {
                    url: key.clone(),
                    source,
                })?;

            if response.status != StatusCode::OK {
                return Err(CacheError::BadStatus {
                    url: key,
                    status: response.status.as_u16(),
                });
            }
            fetched.push((key, response));
        }

        let mut entries = self.entries.write().await;
        entries.extend(fetched);
        Ok(())
    }

    // == Keys ==
    /// Returns the cached URLs, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    // == Length ==
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

// == Cache Storage ==
/// All caches of one origin.
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    caches: Arc<RwLock<HashMap<String, Cache>>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    // == Open ==
    /// Returns the cache called `name`, creating it on first use.
    pub async fn open(&self, name: &str) -> Cache {
        if let Some(cache) = self.caches.read().await.get(name) {
            return cache.clone();
        }

        self.caches
            .write()
            .await
            .entry(name.to_string())
            .or_insert_with(|| Cache::new(name))
            .clone()
    }

    // == Has ==
    pub async fn has(&self, name: &str) -> bool {
        self.caches.read().await.contains_key(name)
    }

    // == Delete ==
    /// Drops the whole cache `name`. Returns whether it existed.
    pub async fn delete(&self, name: &str) -> bool {
        self.caches.write().await.remove(name).is_some()
    }

    // == Keys ==
    /// Names of all caches, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut names: Vec<String> = self.caches.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    // == Match Any ==
    /// Looks `url` up in every cache, in name order.
    pub async fn match_any(&self, url: &str) -> Option<FetchResponse> {
        let caches: Vec<Cache> = {
            let guard = self.caches.read().await;
            let mut caches: Vec<Cache> = guard.values().cloned().collect();
            caches.sort_by(|a, b| a.name().cmp(b.name()));
            caches
        };

        for cache in caches {
            if let Some(response) = cache.match_url(url).await {
                return Some(response);
            }
        }
        None
    }

    // == Retain ==
    /// Deletes every cache except `current`. Returns the deleted names.
    pub async fn retain_only(&self, current: &str) -> Vec<String> {
        let mut deleted = Vec::new();
        for name in self.keys().await {
            if name != current && self.delete(&name).await {
                deleted.push(name);
            }
        }
        deleted
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use async_trait::async_trait;
    use url::Url;

    struct StaticNetwork {
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl Network for StaticNetwork {
        async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, NetworkError> {
            if self.fail_on == Some(request.url.path()) {
                return Err(NetworkError("offline".to_string()));
            }
            Ok(FetchResponse::new(StatusCode::OK, request.url.path().to_string()))
        }
    }

    fn get(path: &str) -> FetchRequest {
        FetchRequest::get(Url::parse("https://app.example").unwrap().join(path).unwrap())
    }

    #[tokio::test]
    async fn test_open_returns_shared_handle() {
        let storage = CacheStorage::new();
        let a = storage.open("v1").await;
        a.put("https://app.example/x", FetchResponse::new(StatusCode::OK, "x"))
            .await;

        let b = storage.open("v1").await;
        assert!(b.match_url("https://app.example/x").await.is_some());
        assert_eq!(storage.keys().await, vec!["v1".to_string()]);
    }

    #[tokio::test]
    async fn test_match_miss() {
        let storage = CacheStorage::new();
        let cache = storage.open("v1").await;
        assert!(cache.match_url("https://app.example/nope").await.is_none());
        assert!(storage.match_any("https://app.example/nope").await.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let storage = CacheStorage::new();
        let cache = storage.open("v1").await;

        cache.put("k", FetchResponse::new(StatusCode::OK, "one")).await;
        cache.put("k", FetchResponse::new(StatusCode::OK, "two")).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(&cache.match_url("k").await.unwrap().body[..], b"two");
    }

    #[tokio::test]
    async fn test_delete_cache() {
        let storage = CacheStorage::new();
        storage.open("v1").await;

        assert!(storage.delete("v1").await);
        assert!(!storage.delete("v1").await);
        assert!(!storage.has("v1").await);
    }

    #[tokio::test]
    async fn test_retain_only_current_generation() {
        let storage = CacheStorage::new();
        storage.open("v1").await;
        storage.open("v2").await;

        let deleted = storage.retain_only("v2").await;

        assert_eq!(deleted, vec!["v1".to_string()]);
        assert_eq!(storage.keys().await, vec!["v2".to_string()]);
    }

    #[tokio::test]
    async fn test_add_all_success() {
        let storage = CacheStorage::new();
        let cache = storage.open("v1").await;
        let network = StaticNetwork { fail_on: None };

        cache
            .add_all(vec![get("/"), get("/index.html")], &network)
            .await
            .unwrap();

        assert_eq!(
            cache.keys().await,
            vec![
                "https://app.example/".to_string(),
                "https://app.example/index.html".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_add_all_is_all_or_nothing() {
        let storage = CacheStorage::new();
        let cache = storage.open("v1").await;
        let network = StaticNetwork {
            fail_on: Some("/manifest.json"),
        };

        let result = cache
            .add_all(vec![get("/"), get("/manifest.json")], &network)
            .await;

        assert!(matches!(result, Err(CacheError::Fetch { .. })));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_match_any_searches_all_caches() {
        let storage = CacheStorage::new();
        storage
            .open("old")
            .await
            .put("k", FetchResponse::new(StatusCode::OK, "old"))
            .await;

        assert!(storage.match_any("k").await.is_some());
    }
}
