//! Worker Module
//!
//! The service worker behind the share target: request interception,
//! offline caching and page notification.
//!
//! Each event is handled in two steps. [`lanes::plan`] turns a request into a
//! list of [`Effect`]s without touching anything; [`ServiceWorker`] then
//! carries them out. No state survives between events except what lives in
//! the [`crate::cache::CacheStorage`] or has been posted to a page.

mod config;
mod effects;
pub mod lanes;
mod message;
mod network;
mod notifier;
mod service;

pub use config::{WorkerConfig, SHARED_PATH, SHARE_API_PATH, SHARE_TARGET_PATH, SUCCESS_PATH};
pub use effects::{responder, Effect, Responder, Task};
pub use lanes::{plan, Lane};
pub use message::{ClientMessage, DebugInfo};
pub use network::HttpNetwork;
pub use notifier::{ClientId, Clients, PageChannel};
pub use service::{ServiceWorker, WorkerState};
