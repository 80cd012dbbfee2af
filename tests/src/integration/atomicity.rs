//! # Commit Atomicity
//!
//! A contract that extends the public-key methods with handlers that write
//! and then optionally fail. Nothing a failed invocation wrote may survive.

use async_trait::async_trait;
use kc_02_identity_registry::Registration;
use kc_05_transaction_dispatcher::{ChainContext, ChainMethod, Validate};
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::{ChainError, SigningScheme, UserAlias};

#[derive(Debug, Deserialize)]
pub struct StampDto {
    pub label: String,
    #[serde(default)]
    pub fail: bool,
}

impl Validate for StampDto {}

/// Writes two state entries, then fails when asked to.
pub struct Stamp;

#[async_trait]
impl ChainMethod for Stamp {
    type Dto = StampDto;

    async fn execute(&self, ctx: &mut ChainContext<'_, '_>, dto: StampDto) -> Result<Value, ChainError> {
        let owner = ctx.alias().to_string();
        ctx.ledger.put_state(format!("stamp:{}", dto.label), owner.clone().into_bytes());
        ctx.ledger.put_state(format!("owner:{owner}"), dto.label.clone().into_bytes());
        if dto.fail {
            return Err(ChainError::validation("stamp rejected"));
        }
        Ok(json!({"label": dto.label}))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollDto {
    pub name: String,
    pub public_key: String,
}

impl Validate for EnrollDto {}

/// Registers an account through the registry, then always fails.
pub struct EnrollThenFail;

#[async_trait]
impl ChainMethod for EnrollThenFail {
    type Dto = EnrollDto;

    async fn execute(&self, ctx: &mut ChainContext<'_, '_>, dto: EnrollDto) -> Result<Value, ChainError> {
        let registration =
            Registration::single(UserAlias::client(&dto.name), SigningScheme::Regular, dto.public_key);
        ctx.registry.register(ctx.ledger, registration).await?;
        Err(ChainError::internal("enrollment aborted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use kc_01_signature_engine::ClientKey;
    use kc_04_authorization::PolicyDecl;
    use kc_05_transaction_dispatcher::{with_public_key_methods, ContractBuilder};
    use shared_types::ErrorKind;
    use std::collections::BTreeSet;

    async fn harness() -> Harness {
        Harness::with_contract(|config| {
            with_public_key_methods(ContractBuilder::new("StampContract", config))
                .method("Stamp", PolicyDecl::submit().require_signature(), Stamp)
                .method("Enroll", PolicyDecl::submit().curator_only(), EnrollThenFail)
                .build()
        })
        .await
    }

    #[tokio::test]
    async fn test_failed_handler_leaves_no_trace() {
        let harness = harness().await;
        let key = ClientKey::generate_secp256k1();
        harness.registered("stamper", &[key.clone()], None).await;
        let before = harness.store().snapshot();

        let request = sign(&key, json!({"label": "a", "fail": true, "uniqueKey": "stamp-a"}));
        let response = harness.invoke("Stamp", request).await;
        assert_eq!(kind(&response), ErrorKind::ValidationFailed);
        assert_eq!(harness.store().snapshot(), before);
    }

    #[tokio::test]
    async fn test_successful_handler_writes_exactly_its_entries() {
        let harness = harness().await;
        let key = ClientKey::generate_secp256k1();
        harness.registered("stamper", &[key.clone()], None).await;
        let before = harness.store().snapshot();

        let request = sign(&key, json!({"label": "b"}));
        assert!(harness.invoke("Stamp", request).await.is_success());

        let after = harness.store().snapshot();
        let added: BTreeSet<_> = after
            .keys()
            .filter(|k| !before.contains_key(*k))
            .cloned()
            .collect();
        assert_eq!(
            added,
            BTreeSet::from(["owner:client|stamper".to_string(), "stamp:b".to_string()])
        );
        assert_eq!(after["stamp:b"], b"client|stamper".to_vec());
        assert!(before.iter().all(|(k, v)| after.get(k) == Some(v)));
    }

    #[tokio::test]
    async fn test_registry_writes_roll_back_with_handler() {
        let harness = harness().await;
        let enrolled = ClientKey::generate_secp256k1();
        let before = harness.store().snapshot();

        let request = sign(
            &harness.admin,
            json!({"name": "ghost", "publicKey": enrolled.public_key().normalized()}),
        );
        let response = harness.invoke_as_curator("Enroll", request).await;
        assert_eq!(kind(&response), ErrorKind::Internal);
        assert_eq!(harness.store().snapshot(), before);

        let response = harness.invoke("GetMyProfile", sign(&enrolled, json!({}))).await;
        assert_eq!(kind(&response), ErrorKind::UserNotRegistered);
    }

    #[tokio::test]
    async fn test_dispatcher_counts_discarded_writes() {
        let harness = harness().await;
        let key = ClientKey::generate_secp256k1();
        harness.registered("counter", &[key.clone()], None).await;
        let committed_before = harness.dispatcher.stats().committed_writes;

        let failing = sign(&key, json!({"label": "c", "fail": true}));
        harness.invoke("Stamp", failing).await;
        let passing = sign(&key, json!({"label": "d"}));
        harness.invoke("Stamp", passing).await;

        let stats = harness.dispatcher.stats();
        assert_eq!(stats.discarded_writes, 2);
        assert_eq!(stats.committed_writes, committed_before + 2);
    }
}
