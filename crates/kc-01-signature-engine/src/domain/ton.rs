//! # TON Scheme (ed25519)
//!
//! ed25519 signatures over the raw canonical payload, plus the user-friendly
//! TON address form derived from a key.

use super::errors::SignatureError;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};
use shared_types::ChainAddress;

/// Tag byte of a bounceable user-friendly address.
const BOUNCEABLE_TAG: u8 = 0x11;
/// Basechain workchain id.
const BASECHAIN: u8 = 0x00;

/// Parse a raw 32-byte ed25519 public key.
pub fn parse_public_key(bytes: &[u8]) -> Result<VerifyingKey, SignatureError> {
    let raw: [u8; 32] = bytes.try_into().map_err(|_| {
        SignatureError::InvalidPublicKey(format!(
            "ed25519 key must be 32 bytes, got {}",
            bytes.len()
        ))
    })?;
    VerifyingKey::from_bytes(&raw)
        .map_err(|_| SignatureError::InvalidPublicKey("not an ed25519 point".to_string()))
}

/// Verify an ed25519 signature over the payload bytes.
pub fn verify_ton(payload: &[u8], signature: &[u8], public_key: &VerifyingKey) -> bool {
    let Ok(sig) = Signature::from_slice(signature) else {
        return false;
    };
    public_key.verify(payload, &sig).is_ok()
}

/// User-friendly address: url-safe base64 of
/// `tag || workchain || sha256(key) || crc16(tag..hash)`.
pub fn ton_address(public_key: &VerifyingKey) -> ChainAddress {
    let mut raw = Vec::with_capacity(36);
    raw.push(BOUNCEABLE_TAG);
    raw.push(BASECHAIN);
    raw.extend_from_slice(&Sha256::digest(public_key.as_bytes()));
    let crc = crc16_xmodem(&raw);
    raw.extend_from_slice(&crc.to_be_bytes());
    shared_types::encoding::to_base64_url(&raw)
}

/// CRC-16/XMODEM (poly 0x1021, init 0).
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for byte in data {
        crc ^= u16::from(*byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}
