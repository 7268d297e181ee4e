//! Share Target server
//!
//! Serves the storage endpoint and the manifest, and routes everything else
//! through the service worker when an upstream is configured.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use share_target::cache::CacheStorage;
use share_target::client::HttpShareApi;
use share_target::storage::MemoryRepository;
use share_target::worker::{Clients, HttpNetwork, ServiceWorker, WorkerConfig};
use share_target::{create_router, AppState, Config};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Install and activate the worker if an upstream is set
/// 4. Serve until SIGINT/SIGTERM, then finish pending background shares
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "share_target=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Share Target server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, public_url={}, cache={}, share_method={:?}",
        config.server_port, config.public_url, config.cache_version, config.share_method
    );

    let mut state = AppState::new(Arc::new(MemoryRepository::new()), config.share_method);

    let worker = match &config.upstream_url {
        Some(upstream) => {
            let worker = Arc::new(build_worker(&config, upstream.clone())?);
            if let Err(err) = worker.install().await {
                error!("Serving without a worker: {}", err);
                None
            } else {
                worker.activate().await;
                state = state.with_worker(worker.clone());
                Some(worker)
            }
        }
        None => None,
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(worker) = worker {
        let finished = worker.pending().drain().await;
        info!("Finished {} pending background shares", finished);
    }

    info!("Server shutdown complete");
    Ok(())
}

fn build_worker(config: &Config, upstream: url::Url) -> anyhow::Result<ServiceWorker> {
    let network = HttpNetwork::new(config.public_url.clone(), upstream)?;
    let api = HttpShareApi::new(
        &config.api_base_url,
        config.share_timeout.map(Duration::from_secs),
    )?;

    Ok(ServiceWorker::new(
        WorkerConfig::new(config.public_url.clone(), config.cache_version.clone()),
        CacheStorage::new(),
        Clients::new(),
        Arc::new(network),
        Arc::new(api),
    ))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
