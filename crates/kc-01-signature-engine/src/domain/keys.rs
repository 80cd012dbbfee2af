//! # Public Keys
//!
//! Curve-tagged public key with a single normalized string form. Every key
//! stored in a bundle or compared across requests goes through
//! [`PublicKey::normalized`], so equal points always compare equal no matter
//! how the client encoded them.

use super::errors::SignatureError;
use super::{secp256k1, ton};
use shared_types::encoding::{decode_bytes, to_base64};
use shared_types::{ChainAddress, KeyCurve};

/// A parsed public key.
#[derive(Debug, Clone, Copy)]
pub enum PublicKey {
    Secp256k1(k256::ecdsa::VerifyingKey),
    Ed25519(ed25519_dalek::VerifyingKey),
}

impl PublicKey {
    /// Parse a hex or base64 key for the given curve.
    pub fn parse(curve: KeyCurve, encoded: &str) -> Result<Self, SignatureError> {
        let bytes = decode_bytes(encoded).ok_or_else(|| {
            SignatureError::InvalidPublicKey("key is neither hex nor base64".to_string())
        })?;
        Self::from_bytes(curve, &bytes)
    }

    /// Parse raw key bytes for the given curve.
    pub fn from_bytes(curve: KeyCurve, bytes: &[u8]) -> Result<Self, SignatureError> {
        match curve {
            KeyCurve::Secp256k1 => secp256k1::parse_public_key(bytes).map(Self::Secp256k1),
            KeyCurve::Ed25519 => ton::parse_public_key(bytes).map(Self::Ed25519),
        }
    }

    /// Curve of this key.
    pub fn curve(&self) -> KeyCurve {
        match self {
            Self::Secp256k1(_) => KeyCurve::Secp256k1,
            Self::Ed25519(_) => KeyCurve::Ed25519,
        }
    }

    /// Canonical bytes: compressed SEC1 for secp256k1, raw 32 bytes for ed25519.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Secp256k1(key) => key.to_encoded_point(true).as_bytes().to_vec(),
            Self::Ed25519(key) => key.as_bytes().to_vec(),
        }
    }

    /// Storage form (base64 of the canonical bytes).
    pub fn normalized(&self) -> String {
        to_base64(&self.to_bytes())
    }

    /// Scheme-specific address.
    pub fn address(&self) -> ChainAddress {
        match self {
            Self::Secp256k1(key) => secp256k1::address_from_pubkey(key),
            Self::Ed25519(key) => ton::ton_address(key),
        }
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.curve() == other.curve() && self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PublicKey {}
