//! Share Target - receive shared links from the OS share sheet
//!
//! A storage endpoint for shared URLs, an offline-capable service worker
//! that intercepts share submissions, and the page logic that confirms them.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod models;
pub mod storage;
pub mod tasks;
pub mod worker;

pub use api::{create_router, AppState};
pub use config::Config;
pub use worker::ServiceWorker;
