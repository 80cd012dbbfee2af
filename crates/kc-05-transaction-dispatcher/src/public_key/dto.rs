//! Request payloads of the public-key contract.
//!
//! Envelope fields (`signature`, `signing`, `uniqueKey`, ...) sit next to
//! these fields on the same request object and are ignored here.

use crate::contract::handler::Validate;
use serde::Deserialize;
use shared_types::{ChainError, SigningScheme, UserAlias, CLIENT_PREFIX};
use std::collections::BTreeSet;

fn non_blank(field: &str, value: &str) -> Result<(), ChainError> {
    if value.trim().is_empty() {
        return Err(ChainError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// `RegisterUser`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserDto {
    /// `client|{name}`
    pub user: UserAlias,
    #[serde(default)]
    pub public_key: Option<String>,
    /// Multi-key accounts.
    #[serde(default)]
    pub public_keys: Option<Vec<String>>,
    /// Scheme of the registered keys. Inferred from the key length when absent.
    #[serde(default)]
    pub key_scheme: Option<SigningScheme>,
    #[serde(default)]
    pub signature_quorum: Option<u32>,
}

impl RegisterUserDto {
    /// Keys in bundle order.
    pub fn keys(&self) -> Vec<String> {
        match (&self.public_key, &self.public_keys) {
            (Some(key), _) => vec![key.clone()],
            (None, Some(keys)) => keys.clone(),
            (None, None) => Vec::new(),
        }
    }
}

impl Validate for RegisterUserDto {
    fn validate(&self) -> Result<(), ChainError> {
        if !self.user.as_str().starts_with(CLIENT_PREFIX) {
            return Err(ChainError::validation(format!(
                "User alias must start with {CLIENT_PREFIX}"
            )));
        }
        match (&self.public_key, &self.public_keys) {
            (Some(_), Some(_)) => Err(ChainError::validation(
                "Provide either publicKey or publicKeys, not both",
            )),
            (None, None) => Err(ChainError::validation("publicKey or publicKeys is required")),
            (None, Some(keys)) if keys.is_empty() => {
                Err(ChainError::validation("publicKeys must not be empty"))
            }
            _ => Ok(()),
        }
    }
}

/// `RegisterEthUser`, `RegisterTonUser`, `UpdatePublicKey`, `AddSigner`,
/// `RemoveSigner`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyDto {
    pub public_key: String,
}

impl Validate for PublicKeyDto {
    fn validate(&self) -> Result<(), ChainError> {
        non_blank("publicKey", &self.public_key)
    }
}

/// `GetPublicKey`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPublicKeyDto {
    /// Defaults to the signed caller.
    #[serde(default)]
    pub user: Option<UserAlias>,
}

impl Validate for GetPublicKeyDto {}

/// `UpdateUserRoles`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRolesDto {
    pub user: UserAlias,
    pub roles: BTreeSet<String>,
}

impl Validate for UpdateUserRolesDto {
    fn validate(&self) -> Result<(), ChainError> {
        non_blank("user", self.user.as_str())?;
        if self.roles.is_empty() {
            return Err(ChainError::validation("roles must not be empty"));
        }
        self.roles.iter().try_for_each(|role| non_blank("role", role))
    }
}

/// `UpdateSignatureQuorum`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuorumDto {
    pub signature_quorum: u32,
}

impl Validate for UpdateQuorumDto {
    fn validate(&self) -> Result<(), ChainError> {
        if self.signature_quorum == 0 {
            return Err(ChainError::validation("Signature quorum must be at least 1"));
        }
        Ok(())
    }
}

/// Methods without payload fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmptyDto {}

impl Validate for EmptyDto {}
