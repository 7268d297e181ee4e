//! Wait-until registry
//!
//! Tracks spawned background work so the host can wait for it before
//! tearing the worker down.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Set of in-flight background tasks.
#[derive(Debug, Clone, Default)]
pub struct PendingTasks {
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl PendingTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `task` and keeps its handle until it is reaped.
    pub async fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().await;
        // Reap whatever already finished so the set does not grow unbounded.
        while let Some(result) = tasks.try_join_next() {
            log_join(result);
        }
        tasks.spawn(task);
    }

    /// Number of tasks not yet reaped.
    pub async fn len(&self) -> usize {
        self.tasks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.lock().await.is_empty()
    }

    /// Waits for every registered task. Returns how many were awaited.
    pub async fn drain(&self) -> usize {
        let mut tasks = self.tasks.lock().await;
        let mut drained = 0;

        while let Some(result) = tasks.join_next().await {
            log_join(result);
            drained += 1;
        }

        if drained > 0 {
            info!("Drained {} background tasks", drained);
        }
        drained
    }
}

fn log_join(result: Result<(), tokio::task::JoinError>) {
    if let Err(err) = result {
        warn!("Background task failed: {}", err);
    }
}
