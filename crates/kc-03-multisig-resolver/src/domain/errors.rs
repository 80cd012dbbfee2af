//! # Resolution Errors

use kc_01_signature_engine::SignatureError;
use kc_02_identity_registry::RegistryError;
use shared_types::{ChainAddress, ChainError, ErrorKind, SigningScheme, StoreError, UserAlias};
use thiserror::Error;

/// Why a request's signatures could not be resolved to one identity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No signature provided")]
    MissingSignature,

    #[error("signerPublicKey must not be provided for {0} signing; the key is recovered from the signature")]
    RedundantSignerPublicKey(SigningScheme),

    #[error("signerAddress must not be provided for {0} signing; the key is recovered from the signature")]
    RedundantSignerAddress(SigningScheme),

    #[error("signerPublicKey or signerAddress is required for {0} signing")]
    MissingSigner(SigningScheme),

    #[error("Signature is neither hex nor base64")]
    UndecodableSignature,

    #[error("Invalid signer key: {0}")]
    InvalidKey(SignatureError),

    #[error("Public key not found for address {0}")]
    PublicKeyNotFound(ChainAddress),

    #[error("Signer public key does not match signer address {0}")]
    AddressMismatch(ChainAddress),

    #[error("Signing scheme {requested} does not match the {registered} scheme registered for {alias}")]
    SchemeMismatch {
        alias: UserAlias,
        requested: SigningScheme,
        registered: SigningScheme,
    },

    #[error("Could not recover signer: {0}")]
    Unrecoverable(SignatureError),

    #[error("Duplicate signer public key {0}")]
    DuplicateSigner(String),

    #[error("Signatures belong to different users: {first} and {second}")]
    AliasMismatch { first: UserAlias, second: UserAlias },

    #[error("User is not registered")]
    UserNotRegistered,

    #[error("Invalid signature for address {0}")]
    InvalidSignature(ChainAddress),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl From<StoreError> for ResolveError {
    fn from(err: StoreError) -> Self {
        Self::Registry(RegistryError::Store(err))
    }
}

impl ResolveError {
    /// Wire error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingSignature => ErrorKind::MissingSignature,
            Self::RedundantSignerPublicKey(_) => ErrorKind::RedundantSignerPublicKey,
            Self::RedundantSignerAddress(_) => ErrorKind::RedundantSignerAddress,
            Self::MissingSigner(_) => ErrorKind::MissingSigner,
            Self::UndecodableSignature => ErrorKind::ValidationFailed,
            Self::InvalidKey(_) => ErrorKind::InvalidKey,
            Self::PublicKeyNotFound(_) => ErrorKind::PkNotFound,
            Self::AddressMismatch(_) | Self::SchemeMismatch { .. } => ErrorKind::PkMismatch,
            Self::Unrecoverable(_) | Self::InvalidSignature(_) => ErrorKind::PkInvalidSignature,
            Self::DuplicateSigner(_) => ErrorKind::DuplicateSignerPublicKey,
            Self::AliasMismatch { .. } => ErrorKind::SignerAliasMismatch,
            Self::UserNotRegistered => ErrorKind::UserNotRegistered,
            Self::Registry(inner) => ChainError::from(inner.clone()).kind,
        }
    }
}

impl From<ResolveError> for ChainError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Registry(inner) => inner.into(),
            other => ChainError::new(other.kind(), other.to_string()),
        }
    }
}
