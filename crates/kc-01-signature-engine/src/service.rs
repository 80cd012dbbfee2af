//! # Signature Engine Service
//!
//! Implements [`SignatureEngineApi`] with a single dispatch point over
//! [`SigningScheme`]. Adding a scheme is a local, exhaustive-match change here.

use crate::domain::errors::SignatureError;
use crate::domain::keys::PublicKey;
use crate::domain::{secp256k1, ton};
use crate::ports::inbound::SignatureEngineApi;
use shared_types::{ChainAddress, SigningScheme};
use tracing::debug;

/// Stateless signature engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureEngine;

impl SignatureEngine {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureEngineApi for SignatureEngine {
    fn recover(
        &self,
        scheme: SigningScheme,
        payload: &[u8],
        signature: &[u8],
    ) -> Result<PublicKey, SignatureError> {
        match scheme {
            SigningScheme::Regular => {
                secp256k1::recover_regular(payload, signature).map(PublicKey::Secp256k1)
            }
            SigningScheme::Der | SigningScheme::Ton => Err(SignatureError::NotRecoverable(scheme)),
        }
    }

    fn verify(
        &self,
        scheme: SigningScheme,
        payload: &[u8],
        signature: &[u8],
        public_key: &PublicKey,
    ) -> Result<bool, SignatureError> {
        let valid = match (scheme, public_key) {
            (SigningScheme::Regular, PublicKey::Secp256k1(key)) => {
                secp256k1::verify_regular(payload, signature, key)
            }
            (SigningScheme::Der, PublicKey::Secp256k1(key)) => {
                secp256k1::verify_der(payload, signature, key)
            }
            (SigningScheme::Ton, PublicKey::Ed25519(key)) => ton::verify_ton(payload, signature, key),
            (scheme, key) => {
                return Err(SignatureError::CurveMismatch {
                    scheme,
                    curve: key.curve(),
                })
            }
        };

        if !valid {
            debug!(%scheme, "signature did not verify");
        }
        Ok(valid)
    }

    fn parse_public_key(
        &self,
        scheme: SigningScheme,
        encoded: &str,
    ) -> Result<PublicKey, SignatureError> {
        PublicKey::parse(scheme.curve(), encoded)
    }

    fn address_of(&self, public_key: &PublicKey) -> ChainAddress {
        public_key.address()
    }
}
