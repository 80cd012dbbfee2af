//! # Shared Types Crate
//!
//! Data model, error kinds, request envelope and ledger port shared by every
//! Keystone subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **One Failure Shape**: Subsystem errors convert into [`ChainError`]; a
//!   [`ChainResponse`] is the only thing that leaves an invocation.
//! - **Buffered Writes**: Ledger writes go through [`BufferedLedger`] and are
//!   only durable after an explicit commit.

pub mod encoding;
pub mod entities;
pub mod envelope;
pub mod errors;
pub mod ledger;
pub mod response;

pub use entities::*;
pub use envelope::{canonical_payload, SignatureEntry, SignatureForm, SigningEnvelope};
pub use errors::*;
pub use ledger::{BufferedLedger, CompositeKey, InMemoryLedger, LedgerStore, StoreError};
pub use response::{ChainResponse, ResponseStatus};
