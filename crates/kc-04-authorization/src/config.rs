//! Authorization configuration from environment variables.

use shared_types::UserAlias;
use std::collections::BTreeSet;
use std::env;

/// Default curator organization.
pub const DEFAULT_CURATOR_ORG: &str = "CuratorOrg";
/// Default alias of the bootstrapped admin.
pub const DEFAULT_ADMIN_ALIAS: &str = "client|admin";

/// Process-wide authorization settings, built once at start-up and passed
/// by reference to the contract builder and dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Organization allowed to curate users.
    pub curator_org: String,

    /// Organizations allowed to register users.
    pub registrar_orgs: BTreeSet<String>,

    /// Role-based (`true`) instead of organization-based evaluation.
    pub use_rbac: bool,

    /// Admin key registered at start-up, if any.
    pub dev_admin_public_key: Option<String>,

    /// Alias for the bootstrapped admin.
    pub dev_admin_alias: UserAlias,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            curator_org: DEFAULT_CURATOR_ORG.to_string(),
            registrar_orgs: [DEFAULT_CURATOR_ORG.to_string()].into(),
            use_rbac: false,
            dev_admin_public_key: None,
            dev_admin_alias: UserAlias::new(DEFAULT_ADMIN_ALIAS),
        }
    }
}

impl AuthConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CURATOR_ORG_MSP`: Curator organization (default: CuratorOrg)
    /// - `REGISTRAR_ORG_MSPS`: Comma-separated registrar organizations (default: the curator org)
    /// - `USE_RBAC`: Role-based authorization (default: false)
    /// - `DEV_ADMIN_PUBLIC_KEY`: Admin key to bootstrap (default: unset)
    /// - `DEV_ADMIN_ALIAS`: Admin alias (default: client|admin)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let curator_org = lookup("CURATOR_ORG_MSP")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CURATOR_ORG.to_string());

        let mut registrar_orgs: BTreeSet<String> = lookup("REGISTRAR_ORG_MSPS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|org| !org.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if registrar_orgs.is_empty() {
            registrar_orgs.insert(curator_org.clone());
        }

        Self {
            curator_org,
            registrar_orgs,
            use_rbac: lookup("USE_RBAC")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            dev_admin_public_key: lookup("DEV_ADMIN_PUBLIC_KEY").filter(|v| !v.trim().is_empty()),
            dev_admin_alias: lookup("DEV_ADMIN_ALIAS")
                .filter(|v| !v.trim().is_empty())
                .map(UserAlias::new)
                .unwrap_or_else(|| UserAlias::new(DEFAULT_ADMIN_ALIAS)),
        }
    }

    /// Organization-based configuration with explicit orgs.
    pub fn with_orgs(curator_org: &str, registrar_orgs: &[&str]) -> Self {
        Self {
            curator_org: curator_org.to_string(),
            registrar_orgs: registrar_orgs.iter().map(|o| (*o).to_string()).collect(),
            ..Self::default()
        }
    }

    /// Role-based configuration.
    pub fn rbac() -> Self {
        Self {
            use_rbac: true,
            ..Self::default()
        }
    }
}
