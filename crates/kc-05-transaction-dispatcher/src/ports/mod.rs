//! Ports (API) for the transaction dispatcher.

pub mod inbound;

pub use inbound::DispatcherApi;
