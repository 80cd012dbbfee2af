//! # Chaincode Runtime Library
//!
//! Wires the public-key contract, the dispatcher and an in-memory ledger into
//! a line-oriented host. The `main.rs` binary feeds it stdin.
//!
//! ## Line Format
//!
//! ```json
//! {"method": "GetPublicKey", "payload": {...}, "callerMsp": "Org1MSP",
//!  "callerId": "x509::user", "originChaincode": null, "txTimestampMs": null}
//! ```
//!
//! Every line produces exactly one wrapped response, including lines that
//! are not valid invocations.

use anyhow::{Context, Result};
use kc_04_authorization::AuthConfig;
use kc_05_transaction_dispatcher::{public_key_contract, Dispatcher, DispatcherStats, InvocationContext};
use serde::Deserialize;
use serde_json::Value;
use shared_types::{ChainError, ChainResponse, InMemoryLedger};
use std::sync::Arc;
use tracing::{debug, info};

/// One invocation as read from the input stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationLine {
    pub method: String,
    #[serde(default = "empty_object")]
    pub payload: Value,
    pub caller_msp: String,
    pub caller_id: String,
    #[serde(default)]
    pub origin_chaincode: Option<String>,
    /// Host transaction time; defaults to the wall clock.
    #[serde(default)]
    pub tx_timestamp_ms: Option<i64>,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

impl InvocationLine {
    fn context(&self) -> InvocationContext {
        let mut ctx = match &self.origin_chaincode {
            Some(chaincode) => {
                InvocationContext::new(&self.caller_msp, &self.caller_id).from_chaincode(chaincode)
            }
            None => InvocationContext::new(&self.caller_msp, &self.caller_id),
        };
        if let Some(ts) = self.tx_timestamp_ms {
            ctx = ctx.at(ts);
        }
        ctx
    }
}

/// The runtime hosting one contract over one ledger.
pub struct ChaincodeRuntime {
    dispatcher: Dispatcher<InMemoryLedger>,
}

impl ChaincodeRuntime {
    /// Build the contract and bootstrap the admin if one is configured.
    pub async fn start(config: AuthConfig) -> Result<Self> {
        info!("===========================================");
        info!("  Keystone Chaincode Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let contract = public_key_contract(&config).context("Failed to build contract")?;
        let dispatcher = Dispatcher::new(contract, config, Arc::new(InMemoryLedger::new()));

        dispatcher
            .bootstrap_admin()
            .await
            .map_err(|err| anyhow::anyhow!("{}: {}", err.key(), err.message))
            .context("Failed to bootstrap admin")?;

        info!(
            contract = dispatcher.contract().name(),
            methods = dispatcher.contract().len(),
            rbac = dispatcher.config().use_rbac,
            "Runtime ready"
        );
        debug!(
            methods = ?dispatcher.contract().method_names().collect::<Vec<_>>(),
            "Contract methods"
        );
        Ok(Self { dispatcher })
    }

    /// Dispatch one input line.
    pub async fn handle_line(&self, line: &str) -> ChainResponse {
        let invocation: InvocationLine = match serde_json::from_str(line) {
            Ok(invocation) => invocation,
            Err(err) => {
                debug!(%err, "Rejected input line");
                return ChainResponse::error(ChainError::validation(format!(
                    "Invalid invocation line: {err}"
                )));
            }
        };

        self.dispatcher
            .invoke(&invocation.context(), &invocation.method, &invocation.payload)
            .await
    }

    /// Dispatch one line and serialize the response.
    pub async fn handle_line_json(&self, line: &str) -> Result<String> {
        let response = self.handle_line(line).await;
        serde_json::to_string(&response).context("Failed to serialize response")
    }

    pub fn stats(&self) -> DispatcherStats {
        self.dispatcher.stats()
    }

    pub fn dispatcher(&self) -> &Dispatcher<InMemoryLedger> {
        &self.dispatcher
    }
}
