//! Domain layer: pure cryptographic logic, no ledger access.

pub mod errors;
pub mod keys;
pub mod secp256k1;
pub mod ton;
