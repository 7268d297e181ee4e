//! Share Storage Module
//!
//! Persistence seam behind the storage endpoint. One [`ShareRecord`] is
//! written per accepted share.

mod memory;
mod record;

pub use memory::MemoryRepository;
pub use record::{ShareRecord, ANONYMOUS_USER, STATUS_PENDING};

use async_trait::async_trait;

/// Error raised by a repository write.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StorageError(pub String);

/// A store for share records.
#[async_trait]
pub trait ShareRepository: Send + Sync {
    /// Writes one record. Writing the same (user, timestamp) key again overwrites it.
    async fn put(&self, record: ShareRecord) -> Result<(), StorageError>;

    /// Returns all records of `user_id`, oldest first.
    async fn list(&self, user_id: &str) -> Result<Vec<ShareRecord>, StorageError>;
}
