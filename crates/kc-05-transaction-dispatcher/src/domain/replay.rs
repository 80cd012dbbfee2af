//! # Replay Guard
//!
//! A request carrying `uniqueKey` claims the record at `\0UNTX\0{uniqueKey}\0`.
//! The claim is a buffered write, so it becomes durable together with the
//! rest of a successful invocation and not at all on failure.

use crate::domain::context::InvocationContext;
use crate::domain::errors::DispatchError;
use kc_04_authorization::MethodPolicy;
use serde::{Deserialize, Serialize};
use shared_types::{BufferedLedger, CompositeKey};
use tracing::{debug, warn};

/// Object type of replay records.
pub const UNIQUE_TX_OBJECT_TYPE: &str = "UNTX";

pub fn unique_tx_key(unique_key: &str) -> CompositeKey {
    CompositeKey::new(UNIQUE_TX_OBJECT_TYPE, &[unique_key])
}

/// Write-once record of an accepted idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayRecord {
    pub unique_key: String,
    pub tx_id: String,
    pub method: String,
    pub recorded_at_ms: i64,
}

/// Reject a known `uniqueKey`, record a new one.
pub async fn claim_unique_key(
    ledger: &mut BufferedLedger<'_>,
    policy: &MethodPolicy,
    unique_key: Option<&str>,
    invocation: &InvocationContext,
) -> Result<(), DispatchError> {
    let Some(unique_key) = unique_key else {
        if policy.requires_unique_key() {
            return Err(DispatchError::MissingUniqueKey(policy.method().to_string()));
        }
        return Ok(());
    };

    let key = unique_tx_key(unique_key);
    if ledger.get_state(key.as_str()).await?.is_some() {
        warn!(unique_key, method = policy.method(), "Replayed uniqueKey rejected");
        return Err(DispatchError::Replayed(unique_key.to_string()));
    }

    let record = ReplayRecord {
        unique_key: unique_key.to_string(),
        tx_id: invocation.tx_id.clone(),
        method: policy.method().to_string(),
        recorded_at_ms: invocation.tx_timestamp_ms,
    };
    ledger.put_object(&key, &record)?;
    debug!(unique_key, "uniqueKey claimed");
    Ok(())
}
