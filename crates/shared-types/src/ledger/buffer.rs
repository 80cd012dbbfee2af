//! Per-invocation write buffer.

use super::{CompositeKey, LedgerStore, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Read-your-writes view over a [`LedgerStore`] that holds every write
/// until [`commit`](Self::commit).
///
/// Exclusively owned by one invocation. Dropping it discards all writes.
pub struct BufferedLedger<'a> {
    store: &'a dyn LedgerStore,
    writes: BTreeMap<String, Vec<u8>>,
}

impl<'a> BufferedLedger<'a> {
    /// Start an empty buffer over `store`.
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self {
            store,
            writes: BTreeMap::new(),
        }
    }

    /// Read bytes, preferring this invocation's pending writes.
    pub async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(pending) = self.writes.get(key) {
            return Ok(Some(pending.clone()));
        }
        self.store.get_state(key).await
    }

    /// Buffer a write.
    pub fn put_state(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.writes.insert(key.into(), value);
    }

    /// Read and decode a JSON object.
    pub async fn get_object<T: DeserializeOwned>(
        &self,
        key: &CompositeKey,
    ) -> Result<Option<T>, StoreError> {
        match self.get_state(key.as_str()).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| StoreError::Serialization {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Encode and buffer a JSON object.
    pub fn put_object<T: Serialize>(
        &mut self,
        key: &CompositeKey,
        value: &T,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value).map_err(|e| StoreError::Serialization {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.put_state(key.as_str(), bytes);
        Ok(())
    }

    /// Number of pending writes.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Flush every pending write to the store as one batch.
    ///
    /// On error the store holds none of the writes.
    pub async fn commit(self) -> Result<usize, StoreError> {
        let count = self.writes.len();
        if count > 0 {
            self.store.apply_batch(self.writes).await?;
        }
        debug!(writes = count, "Write buffer committed");
        Ok(count)
    }

    /// Drop every pending write.
    pub fn discard(self) -> usize {
        let count = self.writes.len();
        debug!(writes = count, "Write buffer discarded");
        count
    }
}
