//! In-memory ledger for tests and the local runtime.
//! A production deployment plugs the hosting runtime's world state in instead.

use super::{LedgerStore, StoreError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Committed state held in a sorted map.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed keys.
    pub fn len(&self) -> usize {
        self.state.read().len()
    }

    /// Whether nothing was committed yet.
    pub fn is_empty(&self) -> bool {
        self.state.read().is_empty()
    }

    /// Copy of the committed state.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.state.read().clone()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.state.read().get(key).cloned())
    }

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.state.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn apply_batch(&self, writes: BTreeMap<String, Vec<u8>>) -> Result<(), StoreError> {
        let mut state = self.state.write();
        state.extend(writes);
        Ok(())
    }
}
