//! # Keystone Chaincode Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Signature engine throughput
//! └── src/
//!     ├── fixtures.rs   # Dispatcher harness, key and request helpers
//!     └── integration/  # End-to-end flows through the dispatcher
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p kc-tests
//!
//! # By flow
//! cargo test -p kc-tests integration::registration::
//! cargo test -p kc-tests integration::multisig::
//!
//! # Benchmarks
//! cargo bench -p kc-tests
//! ```

pub mod fixtures;
pub mod integration;
