//! # Signature Errors
//!
//! Error types for signature recovery, verification and key parsing.

use shared_types::{ChainError, ErrorKind, KeyCurve, SigningScheme};
use thiserror::Error;

/// Errors that can occur in the signature engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature format is invalid (wrong length, invalid encoding)
    #[error("Invalid signature format")]
    InvalidFormat,

    /// Signature has high S value (EIP-2 malleability protection)
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Invalid recovery ID (v must be 0, 1, 27, or 28)
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// Failed to recover public key from signature
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// Recovery requested for a scheme that does not support it
    #[error("Signing scheme {0} is not recoverable")]
    NotRecoverable(SigningScheme),

    /// Public key bytes are not a valid point
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Public key lives on a different curve than the scheme expects
    #[error("Public key curve {curve:?} does not match signing scheme {scheme}")]
    CurveMismatch {
        scheme: SigningScheme,
        curve: KeyCurve,
    },
}

impl From<SignatureError> for ChainError {
    fn from(err: SignatureError) -> Self {
        let kind = match &err {
            SignatureError::InvalidPublicKey(_) | SignatureError::CurveMismatch { .. } => {
                ErrorKind::InvalidKey
            }
            SignatureError::NotRecoverable(_) => ErrorKind::MissingSigner,
            SignatureError::InvalidFormat
            | SignatureError::MalleableSignature
            | SignatureError::InvalidRecoveryId(_)
            | SignatureError::RecoveryFailed => ErrorKind::PkInvalidSignature,
        };
        ChainError::new(kind, err.to_string())
    }
}
