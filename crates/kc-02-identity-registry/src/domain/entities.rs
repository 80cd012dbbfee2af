//! # Registry Entities
//!
//! Inputs and outputs of registry operations, plus the ledger key layout.

use serde::{Deserialize, Serialize};
use shared_types::{ChainAddress, CompositeKey, SigningScheme, UserAlias};
use std::collections::BTreeSet;

/// Object type of address-keyed profiles.
pub const PROFILE_OBJECT_TYPE: &str = "GCUP";
/// Object type of alias-keyed key bundles.
pub const KEY_BUNDLE_OBJECT_TYPE: &str = "GCPK";

/// `\0GCUP\0{address}\0`
pub fn profile_key(address: &str) -> CompositeKey {
    CompositeKey::new(PROFILE_OBJECT_TYPE, &[address])
}

/// `\0GCPK\0{alias}\0`
pub fn key_bundle_key(alias: &UserAlias) -> CompositeKey {
    CompositeKey::new(KEY_BUNDLE_OBJECT_TYPE, &[alias.as_str()])
}

/// A new account to register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub alias: UserAlias,
    pub signing: SigningScheme,
    /// Encoded (hex or base64) public keys, in bundle order.
    pub public_keys: Vec<String>,
    /// Defaults to the number of keys.
    pub signature_quorum: Option<u32>,
    /// Defaults to the regular user roles.
    pub roles: Option<BTreeSet<String>>,
}

impl Registration {
    /// Single-key registration with default roles and quorum.
    pub fn single(alias: UserAlias, signing: SigningScheme, public_key: impl Into<String>) -> Self {
        Self {
            alias,
            signing,
            public_keys: vec![public_key.into()],
            signature_quorum: None,
            roles: None,
        }
    }
}

/// Outcome of a successful registration or account mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub alias: UserAlias,
    pub signing: SigningScheme,
    /// Normalized keys, in bundle order.
    pub public_keys: Vec<String>,
    /// Address of each key, same order.
    pub addresses: Vec<ChainAddress>,
    pub roles: BTreeSet<String>,
    pub signature_quorum: u32,
}
