//! # Multi-Signature Resolver (KC-03)
//!
//! Resolves the one or many signature entries of a request to a single
//! registered alias and the set of addresses that validly co-signed.
//!
//! The resolver only identifies signers. Whether enough of them signed is
//! decided by the authorization policy.

pub mod domain;
pub mod service;

pub use domain::entities::{ResolvedIdentity, ResolvedSigner};
pub use domain::errors::ResolveError;
pub use service::SignerResolver;
