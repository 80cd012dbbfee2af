//! # Error Types
//!
//! Build-time policy misconfiguration and runtime authorization failures.

use serde_json::json;
use shared_types::{ChainError, ErrorKind};
use std::collections::BTreeSet;
use thiserror::Error;

// =============================================================================
// DEFINITION ERRORS (build time, fatal)
// =============================================================================

/// A method policy that must never reach runtime.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// `allowed_orgs` and `allowed_roles` are mutually exclusive.
    #[error("method {method}: allowedOrgs and allowedRoles cannot both be set")]
    OrgsAndRoles { method: String },

    /// Write methods must require a signature or restrict organizations.
    #[error("method {method}: submit methods must require a signature or declare allowedOrgs")]
    UnprotectedSubmit { method: String },

    #[error("method {method}: quorum must be at least 1")]
    ZeroQuorum { method: String },

    #[error("method {method}: single-signature methods must require a signature and cannot declare a quorum")]
    InvalidArity { method: String },

    #[error("method {method} is registered twice")]
    DuplicateMethod { method: String },
}

// =============================================================================
// AUTHORIZATION ERRORS (per call)
// =============================================================================

/// Why a caller may not invoke a method.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Chaincode {chaincode} is not allowed to call {method}")]
    ChaincodeNotAllowed { method: String, chaincode: String },

    #[error("Method {method} requires a signature")]
    MissingSignature { method: String },

    #[error("{method} requires exactly 1 signature")]
    ExactlyOneSignature { method: String },

    #[error("Insufficient signatures: got {got}, required {required}.")]
    InsufficientSignatures { got: usize, required: usize },

    #[error("Organization {org} is not allowed to call {method}")]
    OrganizationNotAllowed { method: String, org: String },

    #[error("Missing role for {method}: required one of {required:?}, but caller has {held:?}")]
    MissingRole {
        method: String,
        required: BTreeSet<String>,
        held: BTreeSet<String>,
    },
}

impl From<AuthorizationError> for ChainError {
    fn from(err: AuthorizationError) -> Self {
        let message = err.to_string();
        match err {
            AuthorizationError::ChaincodeNotAllowed { .. } => {
                ChainError::new(ErrorKind::ChaincodeNotAllowed, message)
            }
            AuthorizationError::MissingSignature { .. } => {
                ChainError::new(ErrorKind::MissingSignature, message)
            }
            AuthorizationError::ExactlyOneSignature { .. } => ChainError::validation(message),
            AuthorizationError::InsufficientSignatures { .. } => {
                ChainError::new(ErrorKind::Unauthorized, message)
            }
            AuthorizationError::OrganizationNotAllowed { .. } => {
                ChainError::new(ErrorKind::OrganizationNotAllowed, message)
            }
            AuthorizationError::MissingRole { required, held, .. } => {
                ChainError::new(ErrorKind::MissingRole, message)
                    .with_payload(json!({"requiredRoles": required, "userRoles": held}))
            }
        }
    }
}
