//! # Request Envelope
//!
//! The signing-related fields every request may carry, and the canonical
//! payload that is signed by clients and re-derived for verification.
//!
//! ## Wire Fields
//!
//! | Field | Form |
//! |-------|------|
//! | `signature` | single-signature form |
//! | `signerPublicKey` / `signerAddress` | single-signature form only |
//! | `signatures: [{signature, signerPublicKey?, signerAddress?}]` | multi-signature form |
//! | `signing` | scheme, defaults to the account's registered scheme |
//! | `uniqueKey` | idempotency key |
//! | `transactionExpiresAt` | epoch millis |
//!
//! `signature` and `signatures` are mutually exclusive.

use crate::entities::SigningScheme;
use crate::errors::ChainError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields excluded from the canonical payload.
pub const UNSIGNED_FIELDS: [&str; 3] = ["signature", "signatures", "trace"];

/// One signature of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureEntry {
    /// Encoded signature bytes.
    pub signature: String,
    /// Explicit signer key reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_public_key: Option<String>,
    /// Explicit signer address reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
}

impl SignatureEntry {
    /// Entry with no signer reference.
    pub fn bare(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            signer_public_key: None,
            signer_address: None,
        }
    }

    /// Whether any explicit signer reference is present.
    pub fn has_signer_reference(&self) -> bool {
        self.signer_public_key.is_some() || self.signer_address.is_some()
    }
}

/// How a request is signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureForm {
    /// No signature at all.
    Unsigned,
    /// Exactly one entry (`signature` field).
    Single(SignatureEntry),
    /// Ordered entries (`signatures` field).
    Multi(Vec<SignatureEntry>),
}

impl SignatureForm {
    /// Entries in request order.
    pub fn entries(&self) -> &[SignatureEntry] {
        match self {
            Self::Unsigned => &[],
            Self::Single(entry) => std::slice::from_ref(entry),
            Self::Multi(entries) => entries,
        }
    }

    /// Whether any signature is present.
    pub fn is_signed(&self) -> bool {
        !matches!(self, Self::Unsigned)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnvelope {
    signature: Option<String>,
    signatures: Option<Vec<SignatureEntry>>,
    signer_public_key: Option<String>,
    signer_address: Option<String>,
    signing: Option<SigningScheme>,
    unique_key: Option<String>,
    transaction_expires_at: Option<i64>,
}

/// Parsed signing envelope of a request.
#[derive(Debug, Clone, PartialEq)]
pub struct SigningEnvelope {
    /// Signature entries.
    pub form: SignatureForm,
    /// Declared scheme, if any.
    pub signing: Option<SigningScheme>,
    /// Idempotency key.
    pub unique_key: Option<String>,
    /// Expiration timestamp in epoch millis.
    pub transaction_expires_at: Option<i64>,
    /// Bytes that were signed.
    pub canonical_payload: Vec<u8>,
}

impl SigningEnvelope {
    /// Parse and shape-check the envelope of a request object.
    pub fn parse(request: &Value) -> Result<Self, ChainError> {
        if !request.is_object() {
            return Err(ChainError::validation("Request must be a JSON object"));
        }

        let raw: RawEnvelope = serde_json::from_value(request.clone())?;

        let form = match (raw.signature, raw.signatures) {
            (Some(_), Some(_)) => {
                return Err(ChainError::validation(
                    "Request cannot contain both signature and signatures",
                ))
            }
            (Some(signature), None) => SignatureForm::Single(SignatureEntry {
                signature,
                signer_public_key: raw.signer_public_key,
                signer_address: raw.signer_address,
            }),
            (None, Some(entries)) => {
                if raw.signer_public_key.is_some() || raw.signer_address.is_some() {
                    return Err(ChainError::validation(
                        "signerPublicKey and signerAddress belong inside signatures entries",
                    ));
                }
                if entries.is_empty() {
                    return Err(ChainError::validation("signatures must not be empty"));
                }
                SignatureForm::Multi(entries)
            }
            (None, None) => {
                if raw.signer_public_key.is_some() || raw.signer_address.is_some() {
                    return Err(ChainError::validation(
                        "Signer reference provided without a signature",
                    ));
                }
                SignatureForm::Unsigned
            }
        };

        if matches!(raw.unique_key.as_deref(), Some(k) if k.trim().is_empty()) {
            return Err(ChainError::validation("uniqueKey must not be empty"));
        }

        Ok(Self {
            form,
            signing: raw.signing,
            unique_key: raw.unique_key,
            transaction_expires_at: raw.transaction_expires_at,
            canonical_payload: canonical_payload(request),
        })
    }
}

// =============================================================================
// CANONICAL PAYLOAD
// =============================================================================

/// Canonical bytes of a request: signature fields removed, keys sorted
/// recursively, compact JSON.
pub fn canonical_payload(request: &Value) -> Vec<u8> {
    let stripped = match request {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| !UNSIGNED_FIELDS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    };
    // Serializing a `Value` cannot fail.
    serde_json::to_vec(&sorted(&stripped)).unwrap_or_default()
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::new();
            for key in keys {
                out.insert(key.clone(), sorted(&map[key]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
