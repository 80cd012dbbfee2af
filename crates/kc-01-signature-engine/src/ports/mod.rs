//! Ports layer: the API this subsystem offers.

pub mod inbound;
