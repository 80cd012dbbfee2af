//! # Signer Resolution
//!
//! Turns the signature entries of a request into one registered identity.
//!
//! ## Algorithm
//!
//! 1. Pick the scheme: the declared `signing`, else the registered scheme of
//!    the first referenced signer, else regular.
//! 2. Resolve each entry to a key and an address. Recoverable signatures must
//!    not carry a signer reference; non-recoverable ones must.
//! 3. Look up each address. Unregistered entries are not verified.
//! 4. Reconcile in this order: duplicate keys, mixed aliases, nothing
//!    registered, any registered entry with a bad signature.
//!
//! An invalid signature behind an unregistered signer therefore reports
//! `USER_NOT_REGISTERED`; the failing branch is not revealed for accounts
//! that do not exist.

use crate::domain::entities::{ResolvedIdentity, ResolvedSigner};
use crate::domain::errors::ResolveError;
use kc_01_signature_engine::{PublicKey, SignatureEngine, SignatureEngineApi};
use kc_02_identity_registry::IdentityRegistry;
use shared_types::encoding::decode_bytes;
use shared_types::{
    BufferedLedger, ChainAddress, KeyCurve, PublicKeyBundle, SignatureEntry, SigningEnvelope,
    SigningScheme, UserAlias, UserProfile,
};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Outcome of resolving one entry.
enum Resolution {
    /// No active profile behind the signer.
    Unregistered { public_key: Option<String> },
    Registered(RegisteredEntry),
}

struct RegisteredEntry {
    profile: UserProfile,
    alias: UserAlias,
    address: ChainAddress,
    public_key: String,
    valid: bool,
}

impl Resolution {
    fn public_key(&self) -> Option<&String> {
        match self {
            Self::Unregistered { public_key } => public_key.as_ref(),
            Self::Registered(entry) => Some(&entry.public_key),
        }
    }
}

/// Resolves signature entries against the identity registry.
pub struct SignerResolver<'r, E: SignatureEngineApi = SignatureEngine> {
    registry: &'r IdentityRegistry<E>,
}

impl<'r, E: SignatureEngineApi> SignerResolver<'r, E> {
    pub fn new(registry: &'r IdentityRegistry<E>) -> Self {
        Self { registry }
    }

    fn engine(&self) -> &E {
        self.registry.engine()
    }

    /// Resolve a signed request to a single identity.
    pub async fn resolve(
        &self,
        ledger: &BufferedLedger<'_>,
        envelope: &SigningEnvelope,
    ) -> Result<ResolvedIdentity, ResolveError> {
        let entries = envelope.form.entries();
        if entries.is_empty() {
            return Err(ResolveError::MissingSignature);
        }

        let scheme = self.effective_scheme(ledger, envelope).await?;
        let mut resolutions = Vec::with_capacity(entries.len());
        for entry in entries {
            let resolution = self
                .resolve_entry(ledger, scheme, &envelope.canonical_payload, entry)
                .await?;
            resolutions.push(resolution);
        }

        let mut seen = HashSet::new();
        for key in resolutions.iter().filter_map(Resolution::public_key) {
            if !seen.insert(key) {
                return Err(ResolveError::DuplicateSigner(key.clone()));
            }
        }

        let registered: Vec<RegisteredEntry> = resolutions
            .into_iter()
            .filter_map(|r| match r {
                Resolution::Registered(entry) => Some(entry),
                Resolution::Unregistered { .. } => None,
            })
            .collect();

        let Some(first) = registered.first() else {
            debug!(entries = entries.len(), "No entry resolved to a registered profile");
            return Err(ResolveError::UserNotRegistered);
        };
        if let Some(other) = registered.iter().find(|e| e.alias != first.alias) {
            return Err(ResolveError::AliasMismatch {
                first: first.alias.clone(),
                second: other.alias.clone(),
            });
        }
        if let Some(bad) = registered.iter().find(|e| !e.valid) {
            warn!(address = %bad.address, %scheme, "Invalid signature from registered signer");
            return Err(ResolveError::InvalidSignature(bad.address.clone()));
        }

        let alias = first.alias.clone();
        let profile = first.profile.clone();
        let signers = registered
            .into_iter()
            .map(|e| ResolvedSigner {
                address: e.address,
                public_key: e.public_key,
            })
            .collect::<Vec<_>>();

        debug!(%alias, signers = signers.len(), %scheme, "Signers resolved");
        Ok(ResolvedIdentity {
            alias,
            profile,
            signing: scheme,
            signers,
            entry_count: entries.len(),
        })
    }

    // =========================================================================
    // SCHEME SELECTION
    // =========================================================================

    async fn effective_scheme(
        &self,
        ledger: &BufferedLedger<'_>,
        envelope: &SigningEnvelope,
    ) -> Result<SigningScheme, ResolveError> {
        if let Some(declared) = envelope.signing {
            return Ok(declared);
        }

        let mut referenced = false;
        for entry in envelope.form.entries() {
            if let Some(address) = &entry.signer_address {
                referenced = true;
                if let Some((_, bundle)) = self.account_at(ledger, &normalize_address(address)).await? {
                    return Ok(bundle.signing);
                }
            }
            if let Some(encoded) = &entry.signer_public_key {
                let key = parse_any_curve(encoded)?;
                if let Some((_, bundle)) = self.account_at(ledger, &self.engine().address_of(&key)).await? {
                    return Ok(bundle.signing);
                }
                return Ok(match key.curve() {
                    KeyCurve::Secp256k1 => SigningScheme::Der,
                    KeyCurve::Ed25519 => SigningScheme::Ton,
                });
            }
        }

        Ok(if referenced {
            SigningScheme::Der
        } else {
            SigningScheme::Regular
        })
    }

    // =========================================================================
    // PER-ENTRY RESOLUTION
    // =========================================================================

    async fn resolve_entry(
        &self,
        ledger: &BufferedLedger<'_>,
        scheme: SigningScheme,
        payload: &[u8],
        entry: &SignatureEntry,
    ) -> Result<Resolution, ResolveError> {
        if scheme.is_recoverable() {
            if entry.signer_public_key.is_some() {
                return Err(ResolveError::RedundantSignerPublicKey(scheme));
            }
            if entry.signer_address.is_some() {
                return Err(ResolveError::RedundantSignerAddress(scheme));
            }
            let signature = decode_signature(entry)?;
            let key = self
                .engine()
                .recover(scheme, payload, &signature)
                .map_err(ResolveError::Unrecoverable)?;
            // A recovered key is valid for this payload by construction.
            return self.registered_or_not(ledger, scheme, key, |_| true).await;
        }

        if !entry.has_signer_reference() {
            return Err(ResolveError::MissingSigner(scheme));
        }
        // Undecodable signatures are judged as invalid after the signer checks.
        let signature = decode_signature(entry).ok();
        let key = match (&entry.signer_public_key, &entry.signer_address) {
            (None, None) => return Err(ResolveError::MissingSigner(scheme)),
            (Some(encoded), claimed) => {
                let key = self
                    .engine()
                    .parse_public_key(scheme, encoded)
                    .map_err(ResolveError::InvalidKey)?;
                if let Some(claimed) = claimed {
                    let claimed = normalize_address(claimed);
                    if claimed != self.engine().address_of(&key) {
                        return Err(ResolveError::AddressMismatch(claimed));
                    }
                }
                key
            }
            (None, Some(address)) => {
                let address = normalize_address(address);
                let Some((profile, bundle)) = self.account_at(ledger, &address).await? else {
                    return Ok(Resolution::Unregistered { public_key: None });
                };
                self.key_in_bundle(&profile, &bundle, &address, scheme)?
            }
        };

        let engine = self.engine();
        self.registered_or_not(ledger, scheme, key, |key| {
            let Some(signature) = signature.as_deref() else {
                debug!("Signature is neither hex nor base64");
                return false;
            };
            match engine.verify(scheme, payload, signature, key) {
                Ok(valid) => valid,
                Err(err) => {
                    debug!(%err, "Key does not fit signing scheme");
                    false
                }
            }
        })
        .await
    }

    /// Look up the key's profile and, if registered, check it against the
    /// alias's bundle and verify.
    async fn registered_or_not(
        &self,
        ledger: &BufferedLedger<'_>,
        scheme: SigningScheme,
        key: PublicKey,
        verify: impl FnOnce(&PublicKey) -> bool,
    ) -> Result<Resolution, ResolveError> {
        let address = self.engine().address_of(&key);
        let public_key = key.normalized();

        let Some((profile, bundle)) = self.account_at(ledger, &address).await? else {
            return Ok(Resolution::Unregistered {
                public_key: Some(public_key),
            });
        };
        self.key_in_bundle(&profile, &bundle, &address, scheme)?;

        let alias = profile
            .alias
            .clone()
            .ok_or_else(|| ResolveError::PublicKeyNotFound(address.clone()))?;
        Ok(Resolution::Registered(RegisteredEntry {
            valid: verify(&key),
            profile,
            alias,
            address,
            public_key,
        }))
    }

    /// Registered key behind `address`, checked against the request scheme.
    fn key_in_bundle(
        &self,
        profile: &UserProfile,
        bundle: &PublicKeyBundle,
        address: &str,
        scheme: SigningScheme,
    ) -> Result<PublicKey, ResolveError> {
        if bundle.signing.curve() != scheme.curve() {
            return Err(ResolveError::SchemeMismatch {
                alias: profile.alias.clone().unwrap_or_else(|| UserAlias::new("")),
                requested: scheme,
                registered: bundle.signing,
            });
        }
        bundle
            .public_keys
            .iter()
            .filter_map(|stored| self.engine().parse_public_key(bundle.signing, stored).ok())
            .find(|key| self.engine().address_of(key) == address)
            .ok_or_else(|| ResolveError::PublicKeyNotFound(address.to_string()))
    }

    /// Active profile at an address together with its alias's bundle.
    async fn account_at(
        &self,
        ledger: &BufferedLedger<'_>,
        address: &str,
    ) -> Result<Option<(UserProfile, PublicKeyBundle)>, ResolveError> {
        let Some(profile) = self.registry.lookup_profile(ledger, address).await? else {
            return Ok(None);
        };
        let Some(alias) = profile.alias.clone().filter(|_| profile.is_active()) else {
            return Ok(None);
        };
        let bundle = self
            .registry
            .lookup_key_bundle(ledger, &alias)
            .await?
            .ok_or_else(|| ResolveError::PublicKeyNotFound(address.to_string()))?;
        Ok(Some((profile, bundle)))
    }
}

fn decode_signature(entry: &SignatureEntry) -> Result<Vec<u8>, ResolveError> {
    decode_bytes(&entry.signature).ok_or(ResolveError::UndecodableSignature)
}

/// Hex addresses compare lowercase without `0x`; other forms are exact.
fn normalize_address(address: &str) -> ChainAddress {
    let trimmed = address.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        hex.to_ascii_lowercase()
    } else {
        trimmed.to_string()
    }
}

/// Parse a key whose curve is implied by its length.
fn parse_any_curve(encoded: &str) -> Result<PublicKey, ResolveError> {
    let bytes = decode_bytes(encoded).ok_or_else(|| {
        ResolveError::InvalidKey(kc_01_signature_engine::SignatureError::InvalidPublicKey(
            "key is neither hex nor base64".to_string(),
        ))
    })?;
    let curve = if bytes.len() == 32 {
        KeyCurve::Ed25519
    } else {
        KeyCurve::Secp256k1
    };
    PublicKey::from_bytes(curve, &bytes).map_err(ResolveError::InvalidKey)
}
