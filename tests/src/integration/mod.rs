//! # Integration Flows
//!
//! Every flow drives the dispatcher end to end: parse, identify, authorize,
//! replay and expiration guards, handler, then commit or discard.

pub mod atomicity;
pub mod multisig;
pub mod registration;
pub mod replay;
pub mod rotation;
pub mod signatures;
