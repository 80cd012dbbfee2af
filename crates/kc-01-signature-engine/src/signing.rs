//! # Client-Side Signing
//!
//! Produces signatures in exactly the wire encodings the engine verifies:
//!
//! | Scheme | Bytes | Encoding |
//! |--------|-------|----------|
//! | Regular | `r \|\| s \|\| v`, `v` in {27, 28}, low S | hex |
//! | DER | ASN.1 DER, low S | base64 |
//! | TON | 64-byte ed25519 | base64 |
//!
//! Used by the runtime for local tooling and by tests across the workspace.

use crate::domain::errors::SignatureError;
use crate::domain::keys::PublicKey;
use crate::domain::secp256k1::keccak256;
use ed25519_dalek::Signer;
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature};
use rand::RngCore;
use serde_json::Value;
use shared_types::encoding::{to_base64, to_hex};
use shared_types::{canonical_payload, SignatureEntry, SigningScheme};

/// Which explicit signer reference to embed next to a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerReference {
    None,
    PublicKey,
    Address,
}

/// A private key held by a client.
#[derive(Clone)]
pub enum ClientKey {
    Secp256k1(k256::ecdsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
}

impl ClientKey {
    /// Fresh random secp256k1 key.
    pub fn generate_secp256k1() -> Self {
        Self::Secp256k1(k256::ecdsa::SigningKey::random(&mut rand::thread_rng()))
    }

    /// Fresh random ed25519 key.
    pub fn generate_ed25519() -> Self {
        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);
        Self::Ed25519(ed25519_dalek::SigningKey::from_bytes(&seed))
    }

    /// Fresh key on the curve of `scheme`.
    pub fn generate_for(scheme: SigningScheme) -> Self {
        match scheme {
            SigningScheme::Regular | SigningScheme::Der => Self::generate_secp256k1(),
            SigningScheme::Ton => Self::generate_ed25519(),
        }
    }

    /// Public half.
    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::Secp256k1(key) => PublicKey::Secp256k1(*key.verifying_key()),
            Self::Ed25519(key) => PublicKey::Ed25519(key.verifying_key()),
        }
    }

    /// Canonical public key bytes (compressed for secp256k1).
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key().to_bytes()
    }

    /// Sign raw payload bytes.
    pub fn sign_bytes(&self, scheme: SigningScheme, payload: &[u8]) -> Result<Vec<u8>, SignatureError> {
        match (scheme, self) {
            (SigningScheme::Regular, Self::Secp256k1(key)) => {
                let (sig, recovery_id) = key
                    .sign_prehash_recoverable(&keccak256(payload))
                    .map_err(|_| SignatureError::InvalidFormat)?;
                let (sig, recovery_id) = match sig.normalize_s() {
                    Some(low) => (
                        low,
                        RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
                    ),
                    None => (sig, recovery_id),
                };
                let mut bytes = sig.to_bytes().to_vec();
                bytes.push(27 + recovery_id.to_byte());
                Ok(bytes)
            }
            (SigningScheme::Der, Self::Secp256k1(key)) => {
                let sig = PrehashSigner::<Signature>::sign_prehash(key, &keccak256(payload))
                    .map_err(|_| SignatureError::InvalidFormat)?;
                let sig = sig.normalize_s().unwrap_or(sig);
                Ok(sig.to_der().as_bytes().to_vec())
            }
            (SigningScheme::Ton, Self::Ed25519(key)) => Ok(key.sign(payload).to_bytes().to_vec()),
            (scheme, key) => Err(SignatureError::CurveMismatch {
                scheme,
                curve: key.public_key().curve(),
            }),
        }
    }

    /// Sign the canonical payload of a request and encode the signature.
    pub fn sign_request(&self, scheme: SigningScheme, request: &Value) -> Result<String, SignatureError> {
        let bytes = self.sign_bytes(scheme, &canonical_payload(request))?;
        Ok(encode_signature(scheme, &bytes))
    }

    /// Build a multi-signature entry for a request.
    pub fn signature_entry(
        &self,
        scheme: SigningScheme,
        request: &Value,
        reference: SignerReference,
    ) -> Result<SignatureEntry, SignatureError> {
        let mut entry = SignatureEntry::bare(self.sign_request(scheme, request)?);
        match reference {
            SignerReference::None => {}
            SignerReference::PublicKey => entry.signer_public_key = Some(self.public_key().normalized()),
            SignerReference::Address => entry.signer_address = Some(self.public_key().address()),
        }
        Ok(entry)
    }

    /// Sign a request in single-signature form.
    ///
    /// The signer reference is part of the canonical payload, so it is
    /// inserted before signing.
    pub fn sign_single(
        &self,
        scheme: SigningScheme,
        mut request: Value,
        reference: SignerReference,
    ) -> Result<Value, SignatureError> {
        if let Value::Object(map) = &mut request {
            match reference {
                SignerReference::None => {}
                SignerReference::PublicKey => {
                    map.insert("signerPublicKey".into(), self.public_key().normalized().into());
                }
                SignerReference::Address => {
                    map.insert("signerAddress".into(), self.public_key().address().into());
                }
            }
        }
        let signature = self.sign_request(scheme, &request)?;
        if let Value::Object(map) = &mut request {
            map.insert("signature".into(), signature.into());
        }
        Ok(request)
    }
}

/// Wire encoding of signature bytes for a scheme.
pub fn encode_signature(scheme: SigningScheme, bytes: &[u8]) -> String {
    match scheme {
        SigningScheme::Regular => to_hex(bytes),
        SigningScheme::Der | SigningScheme::Ton => to_base64(bytes),
    }
}

impl std::fmt::Debug for ClientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print secret material
        f.debug_tuple("ClientKey")
            .field(&self.public_key().normalized())
            .finish()
    }
}
