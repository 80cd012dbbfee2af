//! # Inbound Ports (Driving Ports / API)
//!
//! The scheme-polymorphic API consumed by the resolver and the contract.

use crate::domain::errors::SignatureError;
use crate::domain::keys::PublicKey;
use shared_types::{ChainAddress, SigningScheme};

/// Primary Signature Engine API.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait SignatureEngineApi: Send + Sync {
    /// Recover the signer key from a signature.
    ///
    /// Only defined for recoverable schemes; other schemes fail with
    /// [`SignatureError::NotRecoverable`]. Deterministic.
    fn recover(
        &self,
        scheme: SigningScheme,
        payload: &[u8],
        signature: &[u8],
    ) -> Result<PublicKey, SignatureError>;

    /// Verify a signature against a known key.
    ///
    /// Returns `Err` only when the key does not belong to the scheme's curve;
    /// a bad signature is `Ok(false)`.
    fn verify(
        &self,
        scheme: SigningScheme,
        payload: &[u8],
        signature: &[u8],
        public_key: &PublicKey,
    ) -> Result<bool, SignatureError>;

    /// Parse an encoded public key for the scheme's curve.
    fn parse_public_key(
        &self,
        scheme: SigningScheme,
        encoded: &str,
    ) -> Result<PublicKey, SignatureError>;

    /// Scheme-specific address of a key.
    fn address_of(&self, public_key: &PublicKey) -> ChainAddress;
}
