//! # Policy Evaluation
//!
//! Evaluates a resolved [`MethodPolicy`] against a [`Caller`]:
//!
//! 1. Service callers: chaincode allow-list only
//! 2. Anonymous callers: only on methods without signature or org requirements
//! 3. Signed callers: quorum, then organizations, then roles

use crate::errors::AuthorizationError;
use crate::policy::{MethodPolicy, SignatureArity};
use shared_types::{roles, ChainAddress, UserAlias};
use std::collections::BTreeSet;
use tracing::debug;

/// How the caller was identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerKind {
    /// Another chaincode invoking this one.
    Service { chaincode: String },
    /// No signature on the request.
    Anonymous,
    /// Signature-resolved user.
    Signed {
        signature_quorum: u32,
        signed_by: BTreeSet<ChainAddress>,
    },
}

/// Identity evaluated against method policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub alias: UserAlias,
    /// Organization (MSP id) of the transport-level caller.
    pub msp: String,
    pub roles: BTreeSet<String>,
    pub kind: CallerKind,
}

impl Caller {
    /// Inter-chaincode caller `service|{chaincode}`.
    pub fn service(chaincode: &str, msp: impl Into<String>) -> Self {
        Self {
            alias: UserAlias::service(chaincode),
            msp: msp.into(),
            roles: BTreeSet::new(),
            kind: CallerKind::Service {
                chaincode: chaincode.to_string(),
            },
        }
    }

    /// Anonymous caller `client|{caller_id}` with read-only access.
    pub fn anonymous(caller_id: &str, msp: impl Into<String>) -> Self {
        Self {
            alias: UserAlias::client(caller_id),
            msp: msp.into(),
            roles: roles::anonymous_roles(),
            kind: CallerKind::Anonymous,
        }
    }

    /// Signature-resolved caller.
    pub fn signed(
        alias: UserAlias,
        msp: impl Into<String>,
        roles: BTreeSet<String>,
        signature_quorum: u32,
        signed_by: BTreeSet<ChainAddress>,
    ) -> Self {
        Self {
            alias,
            msp: msp.into(),
            roles,
            kind: CallerKind::Signed {
                signature_quorum,
                signed_by,
            },
        }
    }
}

/// Reject multi-entry requests on single-signature methods.
///
/// Runs before signatures are resolved, so the outcome does not depend on
/// whether the entries are individually valid.
pub fn check_signature_shape(
    policy: &MethodPolicy,
    entry_count: usize,
) -> Result<(), AuthorizationError> {
    if policy.arity() == SignatureArity::ExactlyOne && entry_count > 1 {
        return Err(AuthorizationError::ExactlyOneSignature {
            method: policy.method().to_string(),
        });
    }
    Ok(())
}

/// Evaluate a method policy for a caller.
pub fn authorize(caller: &Caller, policy: &MethodPolicy) -> Result<(), AuthorizationError> {
    let method = policy.method();

    match &caller.kind {
        CallerKind::Service { chaincode } => {
            let allowed = policy
                .allowed_origin_chaincodes()
                .is_some_and(|set| set.contains(chaincode));
            if !allowed {
                return Err(AuthorizationError::ChaincodeNotAllowed {
                    method: method.to_string(),
                    chaincode: chaincode.clone(),
                });
            }
            debug!(method, %chaincode, "Service caller authorized");
            return Ok(());
        }
        CallerKind::Anonymous => {
            if !policy.allows_anonymous() {
                return Err(AuthorizationError::MissingSignature {
                    method: method.to_string(),
                });
            }
        }
        CallerKind::Signed {
            signature_quorum,
            signed_by,
        } => {
            let required: u32 = match policy.arity() {
                SignatureArity::ExactlyOne => 1,
                SignatureArity::Quorum => (*signature_quorum).max(policy.quorum().unwrap_or(1)),
            };
            let required = required as usize;
            if signed_by.len() < required {
                return Err(AuthorizationError::InsufficientSignatures {
                    got: signed_by.len(),
                    required,
                });
            }
        }
    }

    if let Some(orgs) = policy.allowed_orgs() {
        if !orgs.contains(&caller.msp) {
            return Err(AuthorizationError::OrganizationNotAllowed {
                method: method.to_string(),
                org: caller.msp.clone(),
            });
        }
    }

    if let Some(required) = policy.allowed_roles() {
        if required.is_disjoint(&caller.roles) {
            return Err(AuthorizationError::MissingRole {
                method: method.to_string(),
                required: required.clone(),
                held: caller.roles.clone(),
            });
        }
    }

    debug!(method, alias = %caller.alias, "Caller authorized");
    Ok(())
}
