//! # Inbound Port
//!
//! What the hosting runtime calls.

use crate::domain::context::InvocationContext;
use async_trait::async_trait;
use serde_json::Value;
use shared_types::{ChainError, ChainResponse};

/// Entry point of the hosting runtime.
#[async_trait]
pub trait DispatcherApi: Send + Sync {
    /// Run one invocation end to end. Never fails: every failure is a
    /// wrapped `Error` response with all writes discarded.
    async fn invoke(
        &self,
        invocation: &InvocationContext,
        method: &str,
        request: &Value,
    ) -> ChainResponse;

    /// Register the configured admin key, if any. Returns whether anything
    /// was written.
    async fn bootstrap_admin(&self) -> Result<bool, ChainError>;
}
