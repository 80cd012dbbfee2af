//! # Signature Engine (KC-01)
//!
//! Recovers and verifies signatures for the three signing schemes and derives
//! scheme-specific addresses from public keys.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure cryptographic logic, no I/O
//! - **Ports Layer** (`ports/`): The `SignatureEngineApi` trait
//! - **Service Layer** (`service.rs`): Single dispatch point over `SigningScheme`
//! - **Signing** (`signing.rs`): Client-side counterpart producing wire signatures
//!
//! ## Schemes
//!
//! | Scheme | Curve | Recoverable | Signed bytes |
//! |--------|-------|-------------|--------------|
//! | Regular | secp256k1 | yes | `keccak256(canonical)` |
//! | DER | secp256k1 | no | `keccak256(canonical)` |
//! | TON | ed25519 | no | `canonical` |
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: Regular signatures with high S values are rejected

pub mod domain;
pub mod ports;
pub mod service;
pub mod signing;

// Re-export public API
pub use domain::errors::SignatureError;
pub use domain::keys::PublicKey;
pub use domain::secp256k1::keccak256;
pub use ports::inbound::SignatureEngineApi;
pub use service::SignatureEngine;
pub use signing::{encode_signature, ClientKey, SignerReference};
