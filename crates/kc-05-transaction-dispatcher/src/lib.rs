//! # Transaction Dispatcher (KC-05)
//!
//! Ties the signature engine, identity registry, signer resolver and
//! authorization policy into one all-or-nothing invocation.
//!
//! ## Pipeline
//!
//! ```text
//! request -> parse -> identify -> authorize -> replay/expiration -> execute -> wrap
//!                                                                          |
//!                                             commit on Success, discard on Error
//! ```
//!
//! ## Contracts
//!
//! Handlers implement [`ChainMethod`] and are registered with a
//! [`PolicyDecl`](kc_04_authorization::PolicyDecl) through
//! [`ContractBuilder`]. [`public_key_contract`] builds the identity methods
//! every chaincode exposes.
//!
//! ## Usage Example
//!
//! ```ignore
//! let config = AuthConfig::from_env();
//! let contract = public_key_contract(&config)?;
//! let dispatcher = Dispatcher::new(contract, config, Arc::new(InMemoryLedger::new()));
//! dispatcher.bootstrap_admin().await?;
//!
//! let response = dispatcher
//!     .invoke(&InvocationContext::new("CuratorOrg", "admin"), "GetContractVersion", &json!({}))
//!     .await;
//! ```

pub mod contract;
pub mod domain;
pub mod ports;
pub mod public_key;
pub mod service;

pub use contract::handler::{ChainMethod, MethodHandler, ParsedPayload, Validate};
pub use contract::{Contract, ContractBuilder, MethodEntry};
pub use domain::context::{ChainContext, InvocationContext};
pub use domain::errors::DispatchError;
pub use domain::expiration::{check_expiration, MAX_EXPIRATION_AHEAD_MS};
pub use domain::infer_key_scheme;
pub use domain::replay::{claim_unique_key, unique_tx_key, ReplayRecord, UNIQUE_TX_OBJECT_TYPE};
pub use ports::inbound::DispatcherApi;
pub use public_key::{public_key_contract, with_public_key_methods, PUBLIC_KEY_CONTRACT};
pub use service::{Dispatcher, DispatcherStats};
