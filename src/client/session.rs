//! Per-tab session storage and the share flag kept in it.

use std::collections::HashMap;
use std::sync::RwLock;

/// Session key of the share flag.
pub const SHARE_FLAG_KEY: &str = "shareInProgress";

/// A per-tab string store, like `sessionStorage`.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// [`SessionStore`] kept in memory.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.write() {
            values.remove(key);
        }
    }
}

/// "A share is in progress in this tab."
pub struct ShareFlag<'a> {
    store: &'a dyn SessionStore,
}

impl<'a> ShareFlag<'a> {
    pub fn new(store: &'a dyn SessionStore) -> Self {
        Self { store }
    }

    pub fn is_set(&self) -> bool {
        self.store.get(SHARE_FLAG_KEY).as_deref() == Some("true")
    }

    pub fn set(&self) {
        self.store.set(SHARE_FLAG_KEY, "true");
    }

    pub fn clear(&self) {
        self.store.remove(SHARE_FLAG_KEY);
    }
}
