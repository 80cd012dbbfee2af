//! # Error Types
//!
//! The wire-facing failure model shared by every subsystem.
//!
//! Every failure carries a machine-readable [`ErrorKind`] (a fixed upper-case
//! key), a human-readable message, a coarse [`ErrorClass`] and an optional
//! structured payload. Subsystem crates keep their own `thiserror` enums and
//! convert into [`ChainError`] at their boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ERROR CLASS
// =============================================================================

/// Coarse numeric class of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Malformed or semantically invalid request.
    Validation,
    /// Caller could not be authenticated.
    Unauthorized,
    /// Caller is authenticated but not allowed.
    Forbidden,
    /// Referenced object does not exist.
    NotFound,
    /// Request conflicts with existing state.
    Conflict,
    /// Defect or backend failure on the server side.
    ServerError,
    /// Legacy or unsupported path.
    NotImplemented,
}

impl ErrorClass {
    /// HTTP-like numeric code for the class.
    pub fn code(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::ServerError => 500,
            Self::NotImplemented => 501,
        }
    }
}

// =============================================================================
// ERROR KIND
// =============================================================================

/// Machine-readable failure kind. Each variant maps to exactly one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ValidationFailed,
    ProfileExists,
    PkNotFound,
    PkMismatch,
    PkInvalidSignature,
    InvalidKey,
    UserNotRegistered,
    RedundantSignerPublicKey,
    RedundantSignerAddress,
    MissingSigner,
    MissingSignature,
    DuplicateSignerPublicKey,
    SignerAliasMismatch,
    MissingRole,
    OrganizationNotAllowed,
    ChaincodeNotAllowed,
    Unauthorized,
    Conflict,
    TransactionExpired,
    TransactionExpirationTooFar,
    NotImplemented,
    Internal,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 22] = [
        Self::ValidationFailed,
        Self::ProfileExists,
        Self::PkNotFound,
        Self::PkMismatch,
        Self::PkInvalidSignature,
        Self::InvalidKey,
        Self::UserNotRegistered,
        Self::RedundantSignerPublicKey,
        Self::RedundantSignerAddress,
        Self::MissingSigner,
        Self::MissingSignature,
        Self::DuplicateSignerPublicKey,
        Self::SignerAliasMismatch,
        Self::MissingRole,
        Self::OrganizationNotAllowed,
        Self::ChaincodeNotAllowed,
        Self::Unauthorized,
        Self::Conflict,
        Self::TransactionExpired,
        Self::TransactionExpirationTooFar,
        Self::NotImplemented,
        Self::Internal,
    ];

    /// Fixed upper-case key.
    pub fn key(self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::ProfileExists => "PROFILE_EXISTS",
            Self::PkNotFound => "PK_NOT_FOUND",
            Self::PkMismatch => "PK_MISMATCH",
            Self::PkInvalidSignature => "PK_INVALID_SIGNATURE",
            Self::InvalidKey => "INVALID_KEY",
            Self::UserNotRegistered => "USER_NOT_REGISTERED",
            Self::RedundantSignerPublicKey => "REDUNDANT_SIGNER_PUBLIC_KEY",
            Self::RedundantSignerAddress => "REDUNDANT_SIGNER_ADDRESS",
            Self::MissingSigner => "MISSING_SIGNER",
            Self::MissingSignature => "MISSING_SIGNATURE",
            Self::DuplicateSignerPublicKey => "DUPLICATE_SIGNER_PUBLIC_KEY",
            Self::SignerAliasMismatch => "SIGNER_ALIAS_MISMATCH",
            Self::MissingRole => "MISSING_ROLE",
            Self::OrganizationNotAllowed => "ORGANIZATION_NOT_ALLOWED",
            Self::ChaincodeNotAllowed => "CHAINCODE_NOT_ALLOWED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Conflict => "CONFLICT",
            Self::TransactionExpired => "TRANSACTION_EXPIRED",
            Self::TransactionExpirationTooFar => "TRANSACTION_EXPIRATION_TOO_FAR",
            Self::NotImplemented => "NOT_IMPLEMENTED",
            Self::Internal => "INTERNAL",
        }
    }

    /// Coarse class of this kind.
    pub fn class(self) -> ErrorClass {
        match self {
            Self::ValidationFailed
            | Self::InvalidKey
            | Self::RedundantSignerPublicKey
            | Self::RedundantSignerAddress
            | Self::MissingSigner
            | Self::TransactionExpired
            | Self::TransactionExpirationTooFar => ErrorClass::Validation,
            Self::UserNotRegistered
            | Self::MissingSignature
            | Self::DuplicateSignerPublicKey
            | Self::SignerAliasMismatch
            | Self::Unauthorized => ErrorClass::Unauthorized,
            Self::PkMismatch
            | Self::PkInvalidSignature
            | Self::MissingRole
            | Self::OrganizationNotAllowed
            | Self::ChaincodeNotAllowed => ErrorClass::Forbidden,
            Self::PkNotFound => ErrorClass::NotFound,
            Self::ProfileExists | Self::Conflict => ErrorClass::Conflict,
            Self::Internal => ErrorClass::ServerError,
            Self::NotImplemented => ErrorClass::NotImplemented,
        }
    }

    /// Parse a key back into a kind.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.key() == key)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for ErrorKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Self::from_key(&key)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown error key: {key}")))
    }
}

// =============================================================================
// CHAIN ERROR
// =============================================================================

/// A terminal failure of an invocation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct ChainError {
    /// Machine-readable kind.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Optional diagnostics.
    pub payload: Option<serde_json::Value>,
}

impl ChainError {
    /// Create an error without payload.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            payload: None,
        }
    }

    /// Attach a diagnostic payload.
    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Shorthand for `VALIDATION_FAILED`.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationFailed, message)
    }

    /// Shorthand for `INTERNAL`.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// The fixed key of this error's kind.
    pub fn key(&self) -> &'static str {
        self.kind.key()
    }

    /// Numeric class code.
    pub fn code(&self) -> u16 {
        self.kind.class().code()
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        Self::validation(format!("Invalid request payload: {err}"))
    }
}

// =============================================================================
// TESTS
// =============================================================================
