//! # Registry Errors

use kc_01_signature_engine::SignatureError;
use shared_types::{ChainError, ErrorKind, StoreError};
use thiserror::Error;

/// Errors raised by registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Request content is invalid.
    #[error("{0}")]
    Validation(String),

    /// A supplied public key could not be parsed.
    #[error("{0}")]
    InvalidKey(#[from] SignatureError),

    /// An active profile or key bundle already occupies the target.
    #[error("{0}")]
    ProfileExists(String),

    /// No key bundle or profile where one was expected.
    #[error("{0}")]
    NotFound(String),

    /// Stored state is inconsistent with the registry model.
    #[error("corrupted registry state: {0}")]
    Corrupted(String),

    /// Ledger access failed.
    #[error("ledger error: {0}")]
    Store(#[from] StoreError),
}

impl RegistryError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<RegistryError> for ChainError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Validation(message) => ChainError::validation(message),
            RegistryError::InvalidKey(inner) => ChainError::new(ErrorKind::InvalidKey, inner.to_string()),
            RegistryError::ProfileExists(message) => ChainError::new(ErrorKind::ProfileExists, message),
            RegistryError::NotFound(message) => ChainError::new(ErrorKind::PkNotFound, message),
            RegistryError::Corrupted(_) => ChainError::internal(err.to_string()),
            RegistryError::Store(inner) => inner.into(),
        }
    }
}
