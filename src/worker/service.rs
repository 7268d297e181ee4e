//! Service worker host
//!
//! Carries out the effects planned by [`super::lanes`] against the cache,
//! the network, the open pages and the storage endpoint.

use std::sync::Arc;

use axum::http::Method;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::lanes::{self, Lane};
use super::{ClientMessage, Clients, Effect, Responder, Task, WorkerConfig};
use crate::cache::{CacheStorage, SHELL_ASSETS};
use crate::client::ShareApi;
use crate::error::CacheError;
use crate::fetch::{FetchRequest, FetchResponse, Network};
use crate::tasks::PendingTasks;

// == Worker State ==
/// Lifecycle of one worker version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    /// Installed and waiting for the previous version to go away
    Installed,
    Activating,
    Activated,
    /// Failed install
    Redundant,
}

// == Service Worker ==
pub struct ServiceWorker {
    config: WorkerConfig,
    caches: CacheStorage,
    clients: Clients,
    network: Arc<dyn Network>,
    api: Arc<dyn ShareApi>,
    pending: PendingTasks,
    state: RwLock<WorkerState>,
}

impl ServiceWorker {
    pub fn new(
        config: WorkerConfig,
        caches: CacheStorage,
        clients: Clients,
        network: Arc<dyn Network>,
        api: Arc<dyn ShareApi>,
    ) -> Self {
        Self {
            config,
            caches,
            clients,
            network,
            api,
            pending: PendingTasks::new(),
            state: RwLock::new(WorkerState::Parsed),
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn caches(&self) -> &CacheStorage {
        &self.caches
    }

    pub fn clients(&self) -> &Clients {
        &self.clients
    }

    /// Background work registered through wait-until.
    pub fn pending(&self) -> &PendingTasks {
        &self.pending
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    async fn set_state(&self, state: WorkerState) {
        debug!(?state, "worker state");
        *self.state.write().await = state;
    }

    // == Install ==
    /// Pre-populates the current cache with the shell assets.
    ///
    /// On failure nothing is cached and the worker becomes redundant.
    pub async fn install(&self) -> Result<(), CacheError> {
        self.set_state(WorkerState::Installing).await;

        let cache = self.caches.open(&self.config.cache_name).await;
        let requests = SHELL_ASSETS
            .iter()
            .map(|path| FetchRequest::get(self.config.resolve(path)))
            .collect();

        match cache.add_all(requests, self.network.as_ref()).await {
            Ok(()) => {
                info!(cache = %self.config.cache_name, "Worker installed");
                self.set_state(WorkerState::Installed).await;
                Ok(())
            }
            Err(err) => {
                error!("Worker install failed: {}", err);
                self.set_state(WorkerState::Redundant).await;
                Err(err)
            }
        }
    }

    // == Activate ==
    /// Drops every other cache generation and claims all open pages.
    ///
    /// Returns the names of the deleted caches.
    pub async fn activate(&self) -> Vec<String> {
        self.set_state(WorkerState::Activating).await;

        let deleted = self.caches.retain_only(&self.config.cache_name).await;
        for name in &deleted {
            info!("Deleted old cache {}", name);
        }

        let claimed = self.clients.claim().await;
        debug!(claimed, "claimed clients");

        self.set_state(WorkerState::Activated).await;
        deleted
    }

    // == Message ==
    /// Handles a message posted by a page.
    pub async fn handle_message(&self, message: &ClientMessage) {
        for effect in lanes::plan_message(message) {
            if effect == Effect::SkipWaiting {
                self.skip_waiting().await;
            }
        }
    }

    /// Activates a waiting worker right away.
    pub async fn skip_waiting(&self) {
        if self.state().await == WorkerState::Installed {
            self.activate().await;
        }
    }

    // == Fetch ==
    /// Answers one intercepted request. Never fails: every error path ends in
    /// a response.
    pub async fn handle_fetch(&self, request: FetchRequest) -> FetchResponse {
        let (lane, effects) = lanes::plan(&request, &self.config);
        debug!(?lane, url = %request.url, "fetch");
        if lane == Lane::SharePost || lane == Lane::ShareNavigation {
            info!(?lane, url = %request.url, "Share request detected");
        }

        self.perform(request, effects).await
    }

    /// Carries out `effects` for `request`.
    pub async fn perform(&self, request: FetchRequest, effects: Vec<Effect>) -> FetchResponse {
        let mut responder = None;

        for effect in effects {
            match effect {
                Effect::PostMessage(message) => {
                    self.clients.post_all(&message).await;
                }
                Effect::WaitUntil(task) => self.wait_until(task).await,
                Effect::RespondWith(r) => responder = Some(r),
                Effect::SkipWaiting => self.skip_waiting().await,
            }
        }

        match responder {
            Some(Responder::Redirect { status, location }) => {
                FetchResponse::redirect(status, &location)
            }
            Some(Responder::NetworkOrShell) => self.network_or_shell(request).await,
            Some(Responder::CacheFirst) => self.cache_first(request).await,
            // Not intercepted: straight to the network. Offline still gets
            // the shell so the landing page can render.
            None => self.network_or_shell(request).await,
        }
    }

    async fn wait_until(&self, task: Task) {
        match task {
            Task::StoreShare(event) => {
                let api = self.api.clone();
                self.pending
                    .spawn(async move {
                        match api.share(&event).await {
                            Ok(_) => info!(url = %event.url, "Background share stored"),
                            Err(err) => warn!(url = %event.url, "Background share failed: {}", err),
                        }
                    })
                    .await;
            }
        }
    }

    async fn network_or_shell(&self, request: FetchRequest) -> FetchResponse {
        match self.network.fetch(request).await {
            Ok(response) => response,
            Err(err) => {
                debug!("navigation offline: {}", err);
                self.caches
                    .match_any(self.config.shell_document().as_str())
                    .await
                    .unwrap_or_else(FetchResponse::network_error)
            }
        }
    }

    async fn cache_first(&self, request: FetchRequest) -> FetchResponse {
        // Only GET requests are matched against or stored in the cache.
        if request.method != Method::GET {
            let method = request.method.clone();
            return self.network.fetch(request).await.unwrap_or_else(|err| {
                debug!(%method, "request offline: {}", err);
                FetchResponse::network_error()
            });
        }

        let key = request.cache_key().to_string();
        if let Some(cached) = self.caches.match_any(&key).await {
            return cached;
        }

        let is_image = request.is_image();
        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_cacheable() {
                    let cache = self.caches.open(&self.config.cache_name).await;
                    cache.put(key, response.clone()).await;
                }
                response
            }
            Err(err) => {
                debug!(%key, "asset offline: {}", err);
                if is_image {
                    if let Some(icon) = self
                        .caches
                        .match_any(self.config.fallback_icon().as_str())
                        .await
                    {
                        return icon;
                    }
                }
                FetchResponse::network_error()
            }
        }
    }
}
