//! Byte-string encodings accepted on the wire.
//!
//! Signatures and public keys arrive as hex (optionally `0x`-prefixed) or as
//! standard base64. Keys are stored as base64.

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;

/// Decode a hex or base64 string. Hex wins when the input is valid hex.
pub fn decode_bytes(input: &str) -> Option<Vec<u8>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if hex_part.len() % 2 == 0 && hex_part.bytes().all(|b| b.is_ascii_hexdigit()) {
        return hex::decode(hex_part).ok();
    }

    STANDARD.decode(trimmed).ok()
}

/// Standard base64.
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// URL-safe base64 (with padding).
pub fn to_base64_url(bytes: &[u8]) -> String {
    URL_SAFE.encode(bytes)
}

/// Lowercase hex without prefix.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
