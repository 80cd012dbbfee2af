//! # Ledger Port
//!
//! Narrow interface to the external key-value ledger, plus the core-owned
//! per-invocation write buffer.
//!
//! ## Commit Protocol
//!
//! Every invocation reads through a [`BufferedLedger`]. Writes never reach
//! the store until [`BufferedLedger::commit`] is called, which the dispatcher
//! does if and only if the wrapped result is a success. The commit hands the
//! whole write set to [`LedgerStore::apply_batch`], so a failing store leaves
//! no partial effects. Dropping the buffer discards every pending write.

mod buffer;
mod memory;

pub use buffer::BufferedLedger;
pub use memory::InMemoryLedger;

use crate::errors::ChainError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from ledger access.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Backend unavailable or failed.
    #[error("ledger backend error: {0}")]
    Backend(String),

    /// Stored bytes could not be (de)serialized.
    #[error("ledger serialization error at {key}: {reason}")]
    Serialization { key: String, reason: String },
}

impl From<StoreError> for ChainError {
    fn from(err: StoreError) -> Self {
        ChainError::internal(err.to_string())
    }
}

// =============================================================================
// COMPOSITE KEY
// =============================================================================

/// Ledger key built from typed fields joined by `\u0000`.
///
/// Renders as `\u0000{type}\u0000{attr1}\u0000{attr2}\u0000...`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompositeKey(String);

impl CompositeKey {
    /// Field separator.
    pub const SEPARATOR: char = '\u{0}';

    /// Build a key from an object type and its attributes.
    pub fn new(object_type: &str, attributes: &[&str]) -> Self {
        let mut key = String::with_capacity(
            2 + object_type.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>(),
        );
        key.push(Self::SEPARATOR);
        key.push_str(object_type);
        key.push(Self::SEPARATOR);
        for attribute in attributes {
            key.push_str(attribute);
            key.push(Self::SEPARATOR);
        }
        Self(key)
    }

    /// Rendered key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.replace(Self::SEPARATOR, "|"))
    }
}

// =============================================================================
// STORE PORT
// =============================================================================

/// The external ledger storage engine.
///
/// The hosting runtime serializes invocations; implementations only need to
/// present a consistent snapshot of committed state to one invocation.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Read committed bytes at `key`.
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Durably write bytes at `key`.
    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Apply every write or none of them.
    async fn apply_batch(&self, writes: BTreeMap<String, Vec<u8>>) -> Result<(), StoreError>;
}
