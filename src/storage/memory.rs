//! In-memory share repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ShareRecord, ShareRepository, StorageError};

/// Records kept in a map ordered by (user, timestamp), like the table's
/// partition and sort key.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    records: RwLock<BTreeMap<(String, String), ShareRecord>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl ShareRepository for MemoryRepository {
    async fn put(&self, record: ShareRecord) -> Result<(), StorageError> {
        let key = (record.user_id.clone(), record.timestamp.clone());
        self.records.write().await.insert(key, record);
        Ok(())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<ShareRecord>, StorageError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|((user, _), _)| user == user_id)
            .map(|(_, record)| record.clone())
            .collect())
    }
}
