//! # Method Policies
//!
//! A [`PolicyDecl`] is what a contract author declares next to a handler.
//! [`PolicyDecl::resolve`] applies the [`AuthConfig`] and validates the result
//! once, at contract build time, producing an immutable [`MethodPolicy`].
//!
//! ## Build-Time Rules
//!
//! - `allowed_orgs` and `allowed_roles` are mutually exclusive
//! - Submit methods must require a signature or declare `allowed_orgs`
//! - A declared quorum is at least 1

use crate::config::AuthConfig;
use crate::errors::DefinitionError;
use shared_types::roles;
use std::collections::BTreeSet;

/// Whether a method writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Submit,
    Evaluate,
}

/// How many signatures a method accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureArity {
    /// Any number of entries; the account quorum applies.
    #[default]
    Quorum,
    /// Exactly one entry; the account quorum is not applied.
    ExactlyOne,
}

/// Access shortcut resolved against the [`AuthConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Access {
    #[default]
    Default,
    RegistrarOnly,
    CuratorOnly,
}

fn to_set<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

// =============================================================================
// DECLARATION
// =============================================================================

/// Policy as declared by a contract author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecl {
    kind: MethodKind,
    access: Access,
    allowed_orgs: Option<BTreeSet<String>>,
    allowed_roles: Option<BTreeSet<String>>,
    allowed_origin_chaincodes: Option<BTreeSet<String>>,
    quorum: Option<u32>,
    require_signature: bool,
    requires_unique_key: bool,
    arity: SignatureArity,
}

impl PolicyDecl {
    fn new(kind: MethodKind) -> Self {
        Self {
            kind,
            access: Access::Default,
            allowed_orgs: None,
            allowed_roles: None,
            allowed_origin_chaincodes: None,
            quorum: None,
            require_signature: false,
            requires_unique_key: false,
            arity: SignatureArity::Quorum,
        }
    }

    /// Write method.
    pub fn submit() -> Self {
        Self::new(MethodKind::Submit)
    }

    /// Read-only method.
    pub fn evaluate() -> Self {
        Self::new(MethodKind::Evaluate)
    }

    /// Restrict to registrar organizations, or the `REGISTRAR` role under RBAC.
    pub fn registrar_only(mut self) -> Self {
        self.access = Access::RegistrarOnly;
        self
    }

    /// Restrict to the curator organization, or the `CURATOR` role under RBAC.
    pub fn curator_only(mut self) -> Self {
        self.access = Access::CuratorOnly;
        self
    }

    pub fn allowed_orgs<I, S>(mut self, orgs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_orgs = Some(to_set(orgs));
        self
    }

    pub fn allowed_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_roles = Some(to_set(roles));
        self
    }

    /// Chaincodes allowed to call this method as a service identity.
    pub fn allowed_origin_chaincodes<I, S>(mut self, chaincodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origin_chaincodes = Some(to_set(chaincodes));
        self
    }

    /// Minimum number of signers, on top of the account's own quorum.
    pub fn quorum(mut self, quorum: u32) -> Self {
        self.quorum = Some(quorum);
        self
    }

    pub fn require_signature(mut self) -> Self {
        self.require_signature = true;
        self
    }

    /// The request must carry a `uniqueKey`.
    pub fn unique_key(mut self) -> Self {
        self.requires_unique_key = true;
        self
    }

    /// Accept exactly one signature entry and skip the account quorum.
    pub fn exactly_one_signature(mut self) -> Self {
        self.arity = SignatureArity::ExactlyOne;
        self.require_signature = true;
        self
    }

    /// Apply the configuration and validate.
    pub fn resolve(self, method: &str, config: &AuthConfig) -> Result<MethodPolicy, DefinitionError> {
        let mut allowed_orgs = self.allowed_orgs;
        let mut allowed_roles = self.allowed_roles;
        let mut require_signature = self.require_signature;

        match (self.access, config.use_rbac) {
            (Access::RegistrarOnly, false) => {
                allowed_orgs.get_or_insert_with(|| config.registrar_orgs.clone());
            }
            (Access::CuratorOnly, false) => {
                allowed_orgs.get_or_insert_with(|| to_set([config.curator_org.clone()]));
            }
            (Access::RegistrarOnly, true) => {
                allowed_roles.get_or_insert_with(|| to_set([roles::REGISTRAR]));
                require_signature = true;
            }
            (Access::CuratorOnly, true) => {
                allowed_roles.get_or_insert_with(|| to_set([roles::CURATOR]));
                require_signature = true;
            }
            (Access::Default, true) if allowed_orgs.is_none() && allowed_roles.is_none() => {
                allowed_roles = Some(to_set([match self.kind {
                    MethodKind::Submit => roles::SUBMIT,
                    MethodKind::Evaluate => roles::EVALUATE,
                }]));
            }
            (Access::Default, _) => {}
        }

        let policy = MethodPolicy {
            method: method.to_string(),
            kind: self.kind,
            allowed_orgs,
            allowed_roles,
            allowed_origin_chaincodes: self.allowed_origin_chaincodes,
            quorum: self.quorum,
            require_signature,
            requires_unique_key: self.requires_unique_key,
            arity: self.arity,
        };
        policy.validate()?;
        Ok(policy)
    }
}

// =============================================================================
// RESOLVED POLICY
// =============================================================================

/// Immutable, validated policy of one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPolicy {
    method: String,
    kind: MethodKind,
    allowed_orgs: Option<BTreeSet<String>>,
    allowed_roles: Option<BTreeSet<String>>,
    allowed_origin_chaincodes: Option<BTreeSet<String>>,
    quorum: Option<u32>,
    require_signature: bool,
    requires_unique_key: bool,
    arity: SignatureArity,
}

impl MethodPolicy {
    fn validate(&self) -> Result<(), DefinitionError> {
        let method = || self.method.clone();

        if self.allowed_orgs.is_some() && self.allowed_roles.is_some() {
            return Err(DefinitionError::OrgsAndRoles { method: method() });
        }
        if self.kind == MethodKind::Submit && !self.require_signature && self.allowed_orgs.is_none()
        {
            return Err(DefinitionError::UnprotectedSubmit { method: method() });
        }
        if self.quorum == Some(0) {
            return Err(DefinitionError::ZeroQuorum { method: method() });
        }
        if self.arity == SignatureArity::ExactlyOne
            && (!self.require_signature || self.quorum.is_some())
        {
            return Err(DefinitionError::InvalidArity { method: method() });
        }
        Ok(())
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    pub fn allowed_orgs(&self) -> Option<&BTreeSet<String>> {
        self.allowed_orgs.as_ref()
    }

    pub fn allowed_roles(&self) -> Option<&BTreeSet<String>> {
        self.allowed_roles.as_ref()
    }

    pub fn allowed_origin_chaincodes(&self) -> Option<&BTreeSet<String>> {
        self.allowed_origin_chaincodes.as_ref()
    }

    pub fn quorum(&self) -> Option<u32> {
        self.quorum
    }

    pub fn require_signature(&self) -> bool {
        self.require_signature
    }

    pub fn requires_unique_key(&self) -> bool {
        self.requires_unique_key
    }

    pub fn arity(&self) -> SignatureArity {
        self.arity
    }

    /// Whether callers without any signature may pass.
    pub fn allows_anonymous(&self) -> bool {
        !self.require_signature && self.allowed_orgs.is_none()
    }
}
