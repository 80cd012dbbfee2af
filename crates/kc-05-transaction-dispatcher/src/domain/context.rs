//! # Invocation Context
//!
//! [`InvocationContext`] is what the hosting runtime knows about a call
//! before the request is opened. [`ChainContext`] is what a handler sees
//! once identity and authorization are settled.

use crate::domain::errors::DispatchError;
use chrono::Utc;
use kc_02_identity_registry::IdentityRegistry;
use kc_03_multisig_resolver::ResolvedIdentity;
use kc_04_authorization::{AuthConfig, Caller};
use serde::{Deserialize, Serialize};
use shared_types::{BufferedLedger, UserAlias};
use uuid::Uuid;

/// Transport-level facts about one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationContext {
    pub tx_id: String,
    /// Organization (MSP id) of the submitting client.
    pub caller_msp: String,
    /// Transport identity of the submitting client.
    pub caller_id: String,
    /// Set when another chaincode is the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_chaincode: Option<String>,
    /// Transaction timestamp in epoch millis.
    pub tx_timestamp_ms: i64,
}

impl InvocationContext {
    /// Fresh context with a random transaction id, stamped now.
    pub fn new(caller_msp: impl Into<String>, caller_id: impl Into<String>) -> Self {
        Self {
            tx_id: Uuid::new_v4().to_string(),
            caller_msp: caller_msp.into(),
            caller_id: caller_id.into(),
            origin_chaincode: None,
            tx_timestamp_ms: Utc::now().timestamp_millis(),
        }
    }

    /// Mark the call as coming from another chaincode.
    #[must_use]
    pub fn from_chaincode(mut self, chaincode: impl Into<String>) -> Self {
        self.origin_chaincode = Some(chaincode.into());
        self
    }

    #[must_use]
    pub fn at(mut self, tx_timestamp_ms: i64) -> Self {
        self.tx_timestamp_ms = tx_timestamp_ms;
        self
    }
}

/// Everything a handler may use while executing.
///
/// Writes through `ledger` are buffered and only reach the store when the
/// whole invocation succeeds.
pub struct ChainContext<'a, 'l> {
    pub invocation: &'a InvocationContext,
    pub caller: &'a Caller,
    /// Present whenever the request was signed.
    pub identity: Option<&'a ResolvedIdentity>,
    pub ledger: &'a mut BufferedLedger<'l>,
    pub registry: &'a IdentityRegistry,
    pub config: &'a AuthConfig,
    pub(crate) method: &'a str,
}

impl<'a, 'l> ChainContext<'a, 'l> {
    /// Alias of the caller, resolved or anonymous.
    pub fn alias(&self) -> &'a UserAlias {
        &self.caller.alias
    }

    /// Method being executed.
    pub fn method(&self) -> &'a str {
        self.method
    }

    /// Signature-resolved identity, or `MISSING_SIGNATURE`.
    pub fn identity(&self) -> Result<&'a ResolvedIdentity, DispatchError> {
        self.identity
            .ok_or_else(|| DispatchError::IdentityRequired(self.method.to_string()))
    }
}
