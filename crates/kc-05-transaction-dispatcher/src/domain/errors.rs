//! # Dispatch Errors
//!
//! Failures raised by the pipeline itself. Failures of the resolver,
//! policy and handlers arrive as [`ChainError`] already.

use shared_types::{ChainError, ErrorKind, StoreError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Method {0} is not implemented")]
    UnknownMethod(String),

    /// The idempotency key was already recorded.
    #[error("Transaction with uniqueKey {0} was already submitted")]
    Replayed(String),

    /// The method mandates an idempotency key but the request has none.
    #[error("Method {0} requires a uniqueKey")]
    MissingUniqueKey(String),

    #[error("Transaction expired at {expires_at} (now {now})")]
    Expired { expires_at: i64, now: i64 },

    #[error("Transaction expiration {expires_at} is more than one year ahead of {now}")]
    ExpirationTooFar { expires_at: i64, now: i64 },

    /// A handler received a payload parsed for another method.
    #[error("Payload type does not match method {0}")]
    PayloadMismatch(String),

    /// A handler needs a signature-resolved caller but has none.
    #[error("Method {0} requires a signed caller")]
    IdentityRequired(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DispatchError> for ChainError {
    fn from(err: DispatchError) -> Self {
        let message = err.to_string();
        match err {
            DispatchError::UnknownMethod(_) => ChainError::new(ErrorKind::NotImplemented, message),
            DispatchError::Replayed(_) => ChainError::new(ErrorKind::Conflict, message),
            DispatchError::MissingUniqueKey(_) | DispatchError::PayloadMismatch(_) => {
                ChainError::internal(message)
            }
            DispatchError::Expired { .. } => ChainError::new(ErrorKind::TransactionExpired, message),
            DispatchError::ExpirationTooFar { .. } => {
                ChainError::new(ErrorKind::TransactionExpirationTooFar, message)
            }
            DispatchError::IdentityRequired(_) => {
                ChainError::new(ErrorKind::MissingSignature, message)
            }
            DispatchError::Store(inner) => inner.into(),
        }
    }
}
