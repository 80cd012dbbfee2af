//! # Transaction Dispatcher Service
//!
//! Runs the per-invocation pipeline:
//!
//! | Step | Failure |
//! |------|---------|
//! | Look up method | `NOT_IMPLEMENTED` |
//! | Parse envelope and payload | `VALIDATION_FAILED` |
//! | Resolve identity | resolver error kinds |
//! | Authorize | policy error kinds |
//! | Replay guard, then expiration | `CONFLICT`, `TRANSACTION_EXPIRED`, ... |
//! | Execute handler | handler error |
//!
//! Writes of every step are buffered and committed only on success.

use crate::contract::{Contract, MethodEntry};
use crate::domain::context::{ChainContext, InvocationContext};
use crate::domain::errors::DispatchError;
use crate::domain::expiration::check_expiration;
use crate::domain::infer_key_scheme;
use crate::domain::replay::claim_unique_key;
use crate::ports::inbound::DispatcherApi;
use async_trait::async_trait;
use kc_02_identity_registry::IdentityRegistry;
use kc_03_multisig_resolver::{ResolveError, ResolvedIdentity, SignerResolver};
use kc_04_authorization::{authorize, check_signature_shape, AuthConfig, Caller, MethodPolicy};
use parking_lot::RwLock;
use serde_json::Value;
use shared_types::{
    BufferedLedger, ChainError, ChainResponse, ErrorKind, LedgerStore, SigningEnvelope,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Dispatcher statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatcherStats {
    /// Total invocations.
    pub invocations: u64,
    /// Invocations that ended in `Success`.
    pub successes: u64,
    /// Invocations that ended in `Error`.
    pub failures: u64,
    /// Writes flushed to the store.
    pub committed_writes: u64,
    /// Writes dropped with a failed invocation.
    pub discarded_writes: u64,
    /// Average pipeline time in microseconds.
    pub avg_duration_us: u64,
}

/// The transaction dispatcher.
///
/// Owns the contract table, the identity registry and the configuration;
/// borrows nothing per call except the invocation itself.
pub struct Dispatcher<S: LedgerStore> {
    contract: Contract,
    registry: IdentityRegistry,
    config: AuthConfig,
    store: Arc<S>,
    stats: RwLock<DispatcherStats>,
}

impl<S: LedgerStore + 'static> Dispatcher<S> {
    pub fn new(contract: Contract, config: AuthConfig, store: Arc<S>) -> Self {
        Self {
            contract,
            registry: IdentityRegistry::default(),
            config,
            store,
            stats: RwLock::new(DispatcherStats::default()),
        }
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn stats(&self) -> DispatcherStats {
        self.stats.read().clone()
    }

    /// Run one invocation and wrap its outcome.
    #[instrument(name = "invoke", skip(self, invocation, request), fields(tx_id = %invocation.tx_id))]
    pub async fn invoke(
        &self,
        invocation: &InvocationContext,
        method: &str,
        request: &Value,
    ) -> ChainResponse {
        let start = Instant::now();
        let mut ledger = BufferedLedger::new(self.store.as_ref());

        let outcome = self.run(invocation, method, request, &mut ledger).await;

        let (result, committed, discarded) = match outcome {
            Ok(data) => {
                let pending = ledger.pending_writes();
                match ledger.commit().await {
                    Ok(writes) => (Ok(data), writes, 0),
                    Err(e) => (Err(ChainError::from(e)), 0, pending),
                }
            }
            Err(err) => {
                let writes = ledger.discard();
                (Err(err), 0, writes)
            }
        };

        let elapsed = start.elapsed();
        self.record(method, &result, committed, discarded, elapsed.as_micros());
        kc_telemetry::record_invocation(
            method,
            if result.is_ok() { "Success" } else { "Error" },
            elapsed.as_secs_f64(),
        );

        match &result {
            Ok(_) => info!(writes = committed, "Invocation succeeded"),
            Err(err) => {
                kc_telemetry::record_failure(err.key());
                warn!(error_key = err.key(), message = %err.message, discarded, "Invocation failed");
            }
        }

        ChainResponse::from(result)
    }

    /// Register the configured admin, if any, and commit.
    pub async fn bootstrap_admin(&self) -> Result<bool, ChainError> {
        let Some(public_key) = self.config.dev_admin_public_key.as_deref() else {
            return Ok(false);
        };

        let signing = infer_key_scheme(public_key);
        let alias = &self.config.dev_admin_alias;
        let mut ledger = BufferedLedger::new(self.store.as_ref());
        let written = self
            .registry
            .ensure_admin(&mut ledger, alias, signing, public_key)
            .await?;
        ledger.commit().await?;

        if written {
            info!(%alias, %signing, "Admin bootstrapped");
        }
        Ok(written)
    }

    // =========================================================================
    // PIPELINE
    // =========================================================================

    async fn run(
        &self,
        invocation: &InvocationContext,
        method: &str,
        request: &Value,
        ledger: &mut BufferedLedger<'_>,
    ) -> Result<Value, ChainError> {
        let entry: &MethodEntry = self
            .contract
            .method(method)
            .ok_or_else(|| DispatchError::UnknownMethod(method.to_string()))?;
        let policy = entry.policy();

        let envelope = SigningEnvelope::parse(request)?;
        let payload = entry.handler().parse(request)?;

        let (caller, identity) = self.identify(invocation, policy, &envelope, ledger).await?;
        authorize(&caller, policy)?;

        claim_unique_key(ledger, policy, envelope.unique_key.as_deref(), invocation).await?;
        check_expiration(envelope.transaction_expires_at, invocation.tx_timestamp_ms)?;

        debug!(alias = %caller.alias, "Executing handler");
        let mut ctx = ChainContext {
            invocation,
            caller: &caller,
            identity: identity.as_ref(),
            ledger,
            registry: &self.registry,
            config: &self.config,
            method,
        };
        entry.handler().call(&mut ctx, payload).await
    }

    /// Service identity, signature-resolved identity, or anonymous.
    async fn identify(
        &self,
        invocation: &InvocationContext,
        policy: &MethodPolicy,
        envelope: &SigningEnvelope,
        ledger: &BufferedLedger<'_>,
    ) -> Result<(Caller, Option<ResolvedIdentity>), ChainError> {
        if let Some(chaincode) = invocation.origin_chaincode.as_deref() {
            return Ok((Caller::service(chaincode, invocation.caller_msp.clone()), None));
        }

        if !policy.require_signature() && !envelope.form.is_signed() {
            let caller = Caller::anonymous(&invocation.caller_id, invocation.caller_msp.clone());
            return Ok((caller, None));
        }

        check_signature_shape(policy, envelope.form.entries().len())?;
        let identity = SignerResolver::new(&self.registry)
            .resolve(ledger, envelope)
            .await
            .map_err(|err| {
                if err.kind() == ErrorKind::PkInvalidSignature {
                    record_signature_failure(envelope, &err);
                }
                err
            })?;

        let caller = Caller::signed(
            identity.alias.clone(),
            invocation.caller_msp.clone(),
            identity.profile.roles.clone(),
            identity.profile.signature_quorum,
            identity.signed_by(),
        );
        Ok((caller, Some(identity)))
    }

    fn record(
        &self,
        method: &str,
        result: &Result<Value, ChainError>,
        committed: usize,
        discarded: usize,
        elapsed_us: u128,
    ) {
        let mut stats = self.stats.write();
        stats.invocations += 1;
        if result.is_ok() {
            stats.successes += 1;
        } else {
            stats.failures += 1;
        }
        stats.committed_writes += committed as u64;
        stats.discarded_writes += discarded as u64;

        let total = stats.invocations;
        let elapsed_us = u64::try_from(elapsed_us).unwrap_or(u64::MAX);
        let avg = i128::from(stats.avg_duration_us);
        let avg = avg + (i128::from(elapsed_us) - avg) / i128::from(total);
        stats.avg_duration_us = u64::try_from(avg).unwrap_or(u64::MAX);
        debug!(method, invocations = total, "Stats updated");
    }
}

#[async_trait]
impl<S: LedgerStore + 'static> DispatcherApi for Dispatcher<S> {
    async fn invoke(
        &self,
        invocation: &InvocationContext,
        method: &str,
        request: &Value,
    ) -> ChainResponse {
        Dispatcher::invoke(self, invocation, method, request).await
    }

    async fn bootstrap_admin(&self) -> Result<bool, ChainError> {
        Dispatcher::bootstrap_admin(self).await
    }
}

fn record_signature_failure(envelope: &SigningEnvelope, err: &ResolveError) {
    let scheme = envelope
        .signing
        .map(|s| s.to_string())
        .unwrap_or_else(|| "UNDECLARED".to_string());
    debug!(%scheme, error = %err, "Signature rejected");
    kc_telemetry::record_signature_failure(&scheme);
}
