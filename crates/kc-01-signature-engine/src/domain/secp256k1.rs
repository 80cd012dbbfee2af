//! # secp256k1 Schemes (regular and DER)
//!
//! Pure domain logic for the two secp256k1 signature encodings.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: regular signatures with high S are rejected
//! - **DER**: high S is normalized before verification; the encoding is not recoverable
//! - Both encodings sign `keccak256(canonical payload)`
//! - Uses k256 crate for cryptographic operations

use super::errors::SignatureError;
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};
use shared_types::ChainAddress;

/// Length of a regular signature: r (32) || s (32) || v (1).
pub const REGULAR_SIGNATURE_LEN: usize = 65;

// =============================================================================
// HASHING & ADDRESSES
// =============================================================================

/// Keccak256 hash function.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Derive the Ethereum-style address of a public key: lowercase hex of the
/// last 20 bytes of keccak256 over the uncompressed key without its 0x04 prefix.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> ChainAddress {
    let pubkey_bytes = public_key.to_encoded_point(false);
    let hash = keccak256(&pubkey_bytes.as_bytes()[1..]);
    shared_types::encoding::to_hex(&hash[12..])
}

/// Parse a SEC1 public key (compressed or uncompressed).
pub fn parse_public_key(bytes: &[u8]) -> Result<VerifyingKey, SignatureError> {
    if bytes.len() != 33 && bytes.len() != 65 {
        return Err(SignatureError::InvalidPublicKey(format!(
            "secp256k1 key must be 33 or 65 bytes, got {}",
            bytes.len()
        )));
    }
    VerifyingKey::from_sec1_bytes(bytes)
        .map_err(|_| SignatureError::InvalidPublicKey("not a secp256k1 point".to_string()))
}

// =============================================================================
// REGULAR (RECOVERABLE)
// =============================================================================

/// Recover the signer key from a regular `r || s || v` signature.
pub fn recover_regular(payload: &[u8], signature: &[u8]) -> Result<VerifyingKey, SignatureError> {
    if signature.len() != REGULAR_SIGNATURE_LEN {
        return Err(SignatureError::InvalidFormat);
    }

    let recovery_id = parse_recovery_id(signature[64])?;
    let sig = Signature::from_slice(&signature[..64]).map_err(|_| SignatureError::InvalidFormat)?;

    // normalize_s() returns Some only for high-S input
    if sig.normalize_s().is_some() {
        return Err(SignatureError::MalleableSignature);
    }

    VerifyingKey::recover_from_prehash(&keccak256(payload), &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)
}

/// Verify a regular signature against a known key.
pub fn verify_regular(payload: &[u8], signature: &[u8], public_key: &VerifyingKey) -> bool {
    matches!(recover_regular(payload, signature), Ok(recovered) if recovered == *public_key)
}

/// Parse recovery ID from v value.
///
/// Valid v values: 0, 1, 27, 28
fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };

    RecoveryId::try_from(id).map_err(|_| SignatureError::InvalidRecoveryId(v))
}

// =============================================================================
// DER (NON-RECOVERABLE)
// =============================================================================

/// Verify a DER-encoded signature against a known key.
pub fn verify_der(payload: &[u8], signature: &[u8], public_key: &VerifyingKey) -> bool {
    let Ok(sig) = Signature::from_der(signature) else {
        return false;
    };
    let sig = sig.normalize_s().unwrap_or(sig);
    public_key.verify_prehash(&keccak256(payload), &sig).is_ok()
}

// =============================================================================
// UNIT TESTS
// =============================================================================
