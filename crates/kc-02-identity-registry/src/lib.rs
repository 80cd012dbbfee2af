//! # Identity Registry (KC-02)
//!
//! Ledger-backed identity model: per-address profiles and per-alias key
//! bundles, with registration, lookup, key rotation, signer management and
//! role/quorum updates.
//!
//! ## Storage Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `\0GCUP\0{address}\0` | [`UserProfile`](shared_types::UserProfile) |
//! | `\0GCPK\0{alias}\0` | [`PublicKeyBundle`](shared_types::PublicKeyBundle) |

pub mod domain;
pub mod service;

pub use domain::entities::{
    key_bundle_key, profile_key, AccountView, Registration, KEY_BUNDLE_OBJECT_TYPE,
    PROFILE_OBJECT_TYPE,
};
pub use domain::errors::RegistryError;
pub use service::IdentityRegistry;
