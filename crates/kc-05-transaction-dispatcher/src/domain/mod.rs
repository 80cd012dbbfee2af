//! Domain layer: invocation context, dispatch errors, replay guard and
//! expiration rules.

pub mod context;
pub mod errors;
pub mod expiration;
pub mod replay;

use shared_types::encoding::decode_bytes;
use shared_types::SigningScheme;

/// Scheme for a bare key: 32 bytes is ed25519 (TON), anything else is
/// treated as secp256k1.
pub fn infer_key_scheme(public_key: &str) -> SigningScheme {
    match decode_bytes(public_key) {
        Some(bytes) if bytes.len() == 32 => SigningScheme::Ton,
        _ => SigningScheme::Regular,
    }
}
