//! # Domain Entities
//!
//! Core data structures of the identity model: aliases, signing schemes,
//! address-keyed user profiles and alias-keyed public key bundles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Scheme-specific address derived from a public key.
pub type ChainAddress = String;

/// Address written into a profile when its key is rotated away.
pub const ZERO_ADDRESS: &str = "0000000000000000000000000000000000000000";

// =============================================================================
// ROLES
// =============================================================================

/// Well-known role names.
pub mod roles {
    use std::collections::BTreeSet;

    /// Read-only access.
    pub const EVALUATE: &str = "EVALUATE";
    /// Write access.
    pub const SUBMIT: &str = "SUBMIT";
    /// May curate other users (role updates).
    pub const CURATOR: &str = "CURATOR";
    /// May register new users.
    pub const REGISTRAR: &str = "REGISTRAR";

    /// Roles granted to every newly registered user.
    pub fn default_user_roles() -> BTreeSet<String> {
        [EVALUATE, SUBMIT].iter().map(|r| (*r).to_string()).collect()
    }

    /// Roles granted to anonymous callers.
    pub fn anonymous_roles() -> BTreeSet<String> {
        std::iter::once(EVALUATE.to_string()).collect()
    }

    /// Roles granted to the bootstrapped admin.
    pub fn admin_roles() -> BTreeSet<String> {
        [EVALUATE, SUBMIT, CURATOR, REGISTRAR]
            .iter()
            .map(|r| (*r).to_string())
            .collect()
    }
}

// =============================================================================
// ALIAS
// =============================================================================

/// Prefix of aliases registered through `RegisterUser`.
pub const CLIENT_PREFIX: &str = "client|";
/// Prefix of aliases derived from a secp256k1 address.
pub const ETH_PREFIX: &str = "eth|";
/// Prefix of aliases derived from a TON address.
pub const TON_PREFIX: &str = "ton|";
/// Prefix of inter-chaincode service identities.
pub const SERVICE_PREFIX: &str = "service|";

/// Category of an alias, decided by its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasKind {
    Client,
    Eth,
    Ton,
    Service,
    Unknown,
}

/// Stable logical identity of an account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserAlias(String);

impl UserAlias {
    /// Wrap a raw alias string.
    pub fn new(alias: impl Into<String>) -> Self {
        Self(alias.into())
    }

    /// `client|{name}`
    pub fn client(name: &str) -> Self {
        Self(format!("{CLIENT_PREFIX}{name}"))
    }

    /// `eth|{address}`
    pub fn eth(address: &str) -> Self {
        Self(format!("{ETH_PREFIX}{address}"))
    }

    /// `ton|{address}`
    pub fn ton(address: &str) -> Self {
        Self(format!("{TON_PREFIX}{address}"))
    }

    /// `service|{chaincode}`
    pub fn service(chaincode: &str) -> Self {
        Self(format!("{SERVICE_PREFIX}{chaincode}"))
    }

    /// Raw string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Category by prefix.
    pub fn kind(&self) -> AliasKind {
        if self.0.starts_with(CLIENT_PREFIX) {
            AliasKind::Client
        } else if self.0.starts_with(ETH_PREFIX) {
            AliasKind::Eth
        } else if self.0.starts_with(TON_PREFIX) {
            AliasKind::Ton
        } else if self.0.starts_with(SERVICE_PREFIX) {
            AliasKind::Service
        } else {
            AliasKind::Unknown
        }
    }
}

impl fmt::Display for UserAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// SIGNING SCHEMES
// =============================================================================

/// Curve a public key lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCurve {
    Secp256k1,
    Ed25519,
}

/// Signature scheme of a request or an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SigningScheme {
    /// Recoverable secp256k1 (`r || s || v`).
    #[default]
    #[serde(rename = "REGULAR", alias = "ETH")]
    Regular,
    /// Non-recoverable, DER-encoded secp256k1.
    #[serde(rename = "DER")]
    Der,
    /// ed25519 as used by the TON identity system.
    #[serde(rename = "TON")]
    Ton,
}

impl SigningScheme {
    /// Whether the public key can be derived from the signature alone.
    pub fn is_recoverable(self) -> bool {
        matches!(self, Self::Regular)
    }

    /// Curve used by the scheme.
    pub fn curve(self) -> KeyCurve {
        match self {
            Self::Regular | Self::Der => KeyCurve::Secp256k1,
            Self::Ton => KeyCurve::Ed25519,
        }
    }
}

impl fmt::Display for SigningScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Regular => "REGULAR",
            Self::Der => "DER",
            Self::Ton => "TON",
        })
    }
}

// =============================================================================
// PROFILE & KEY BUNDLE
// =============================================================================

/// Per-address profile.
///
/// Every profile of one alias carries the same roles and quorum; they are
/// always written together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Owning alias; `None` once the key behind this address was rotated away.
    pub alias: Option<UserAlias>,
    /// Address this profile is stored under; zeroed on invalidation.
    pub address: ChainAddress,
    /// Role names.
    pub roles: BTreeSet<String>,
    /// Minimum number of distinct signers for account-level actions.
    pub signature_quorum: u32,
}

impl UserProfile {
    /// Create an active profile.
    pub fn new(
        alias: UserAlias,
        address: ChainAddress,
        roles: BTreeSet<String>,
        signature_quorum: u32,
    ) -> Self {
        Self {
            alias: Some(alias),
            address,
            roles,
            signature_quorum,
        }
    }

    /// An invalidated profile can never authenticate and does not block
    /// a later registration at the same address.
    pub fn is_active(&self) -> bool {
        self.alias.is_some() && self.address != ZERO_ADDRESS
    }

    /// Invalidated copy: no alias, no roles, zeroed address.
    #[must_use]
    pub fn invalidated(&self) -> Self {
        Self {
            alias: None,
            address: ZERO_ADDRESS.to_string(),
            roles: BTreeSet::new(),
            signature_quorum: self.signature_quorum,
        }
    }
}

/// Per-alias ordered list of registered public keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyBundle {
    /// Scheme the account was registered with.
    pub signing: SigningScheme,
    /// Normalized public keys (1..N).
    pub public_keys: Vec<String>,
}

impl PublicKeyBundle {
    /// Position of a normalized key.
    pub fn position(&self, public_key: &str) -> Option<usize> {
        self.public_keys.iter().position(|k| k == public_key)
    }

    /// Whether the bundle holds the key.
    pub fn contains(&self, public_key: &str) -> bool {
        self.position(public_key).is_some()
    }
}
