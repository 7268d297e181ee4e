//! Client Notifier
//!
//! Delivers messages from the worker to every open page of the app,
//! controlled or not. Delivery is fire-and-forget: a page that is not
//! listening at send time never sees the message.

use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use super::ClientMessage;

pub type ClientId = u64;

#[derive(Debug)]
struct ClientEntry {
    id: ClientId,
    controlled: bool,
    sender: mpsc::UnboundedSender<ClientMessage>,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: ClientId,
    entries: Vec<ClientEntry>,
}

impl Registry {
    fn prune(&mut self) {
        self.entries.retain(|entry| !entry.sender.is_closed());
    }
}

/// The page end of a client connection.
///
/// Dropping it closes the page; the registry forgets it on the next sweep.
#[derive(Debug)]
pub struct PageChannel {
    id: ClientId,
    receiver: mpsc::UnboundedReceiver<ClientMessage>,
}

impl PageChannel {
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Waits for the next message. `None` once the registry is gone.
    pub async fn recv(&mut self) -> Option<ClientMessage> {
        self.receiver.recv().await
    }

    /// Returns a message if one is already queued.
    pub fn try_recv(&mut self) -> Option<ClientMessage> {
        self.receiver.try_recv().ok()
    }
}

/// Registry of open pages.
#[derive(Debug, Clone, Default)]
pub struct Clients {
    inner: Arc<RwLock<Registry>>,
}

impl Clients {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a page. `controlled` is whether the current worker already
    /// serves it.
    pub async fn connect(&self, controlled: bool) -> PageChannel {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut registry = self.inner.write().await;
        registry.prune();

        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(ClientEntry {
            id,
            controlled,
            sender,
        });

        PageChannel { id, receiver }
    }

    /// Ids of the open pages.
    pub async fn match_all(&self, include_uncontrolled: bool) -> Vec<ClientId> {
        self.inner
            .read()
            .await
            .entries
            .iter()
            .filter(|entry| !entry.sender.is_closed())
            .filter(|entry| include_uncontrolled || entry.controlled)
            .map(|entry| entry.id)
            .collect()
    }

    /// Sends `message` once to every open page, including uncontrolled ones.
    ///
    /// Returns how many pages it was handed to.
    pub async fn post_all(&self, message: &ClientMessage) -> usize {
        let mut registry = self.inner.write().await;
        registry.prune();

        let delivered = registry
            .entries
            .iter()
            .filter(|entry| entry.sender.send(message.clone()).is_ok())
            .count();

        debug!(delivered, "posted message to clients");
        delivered
    }

    /// Takes control of every open page. Returns how many changed hands.
    pub async fn claim(&self) -> usize {
        let mut registry = self.inner.write().await;
        registry.prune();

        let mut claimed = 0;
        for entry in registry.entries.iter_mut().filter(|e| !e.controlled) {
            entry.controlled = true;
            claimed += 1;
        }
        claimed
    }

    pub async fn is_controlled(&self, id: ClientId) -> Option<bool> {
        self.inner
            .read()
            .await
            .entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.controlled)
    }
}
