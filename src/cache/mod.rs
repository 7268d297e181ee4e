//! Cache Module
//!
//! Versioned response caches shared by every worker instance and page of one
//! origin. A cache generation is replaced wholesale when its version tag
//! changes; entries are never evicted individually.

mod store;


// Re-export public types
pub use store::{Cache, CacheStorage};

// == Public Constants ==
/// Shell assets pre-populated at install time.
pub const SHELL_ASSETS: [&str; 5] = [
    "/",
    "/index.html",
    "/manifest.json",
    "/icon-192x192.png",
    "/icon-512x512.png",
];

/// Document served for navigations while offline.
pub const SHELL_DOCUMENT: &str = "/index.html";

/// Substitute for images that are neither cached nor reachable.
pub const FALLBACK_ICON: &str = "/icon-192x192.png";
