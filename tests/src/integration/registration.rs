//! # Registration Flows
//!
//! `RegisterUser` with N keys and quorum Q, rejection cases, and the
//! address-derived registrations for Ethereum and TON keys.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use kc_01_signature_engine::ClientKey;
    use serde_json::json;
    use shared_types::{roles, ErrorKind, UserAlias};

    #[tokio::test]
    async fn test_n_keys_yield_n_profiles_and_one_bundle() {
        let harness = Harness::new().await;
        let signers = keys(3);
        let alias = harness.registered("treasury", &signers, Some(2)).await;

        let ledger = harness.ledger();
        let registry = harness.dispatcher.registry();
        for key in &signers {
            let address = key.public_key().address();
            let profile = registry
                .lookup_profile(&ledger, &address)
                .await
                .unwrap()
                .expect("profile per key");
            assert_eq!(profile.alias.as_ref(), Some(&alias));
            assert_eq!(profile.address, address);
            assert_eq!(profile.signature_quorum, 2);
            assert_eq!(profile.roles, roles::default_user_roles());
        }

        let bundle = registry
            .lookup_key_bundle(&ledger, &alias)
            .await
            .unwrap()
            .expect("one key bundle");
        assert_eq!(bundle.public_keys.len(), 3);
        assert_eq!(bundle.signing, REGULAR);
    }

    #[tokio::test]
    async fn test_quorum_defaults_to_key_count() {
        let harness = Harness::new().await;
        let response = harness.register("pair", &keys(2), None).await;
        assert_eq!(response.data.unwrap()["signatureQuorum"], 2);
    }

    #[tokio::test]
    async fn test_quorum_above_key_count_writes_nothing() {
        let harness = Harness::new().await;
        let before = harness.store().snapshot();

        let response = harness.register("greedy", &keys(2), Some(3)).await;
        assert_eq!(kind(&response), ErrorKind::ValidationFailed);
        assert_eq!(
            response.message.as_deref(),
            Some("Signature quorum cannot exceed number of public keys")
        );
        assert_eq!(harness.store().snapshot(), before);
    }

    #[tokio::test]
    async fn test_duplicate_keys_write_nothing() {
        let harness = Harness::new().await;
        let before = harness.store().snapshot();
        let key = ClientKey::generate_secp256k1();

        let response = harness.register("twice", &[key.clone(), key], None).await;
        assert_eq!(kind(&response), ErrorKind::ValidationFailed);
        assert_eq!(response.message.as_deref(), Some("Found duplicate public keys"));
        assert_eq!(harness.store().snapshot(), before);
    }

    #[tokio::test]
    async fn test_taken_alias_and_taken_key() {
        let harness = Harness::new().await;
        let key = ClientKey::generate_secp256k1();
        harness.registered("first", &[key.clone()], None).await;

        let same_alias = harness.register("first", &keys(1), None).await;
        assert_eq!(kind(&same_alias), ErrorKind::ProfileExists);

        let same_key = harness.register("second", &[key], None).await;
        assert_eq!(kind(&same_key), ErrorKind::ProfileExists);
    }

    #[tokio::test]
    async fn test_register_eth_and_ton_users() {
        let harness = Harness::new().await;

        let eth = ClientKey::generate_secp256k1();
        let request = sign(&harness.admin, json!({"publicKey": eth.public_key().normalized()}));
        let response = harness.invoke_as_curator("RegisterEthUser", request).await;
        assert_eq!(
            response.data.unwrap()["alias"],
            json!(UserAlias::eth(&eth.public_key().address()))
        );

        let ton = ClientKey::generate_ed25519();
        let request = sign(&harness.admin, json!({"publicKey": ton.public_key().normalized()}));
        let response = harness.invoke_as_curator("RegisterTonUser", request).await;
        let data = response.data.unwrap();
        assert_eq!(data["alias"], json!(UserAlias::ton(&ton.public_key().address())));
        assert_eq!(data["signing"], "TON");
    }

    #[tokio::test]
    async fn test_registration_requires_registrar() {
        let harness = Harness::new().await;
        let outsider = ClientKey::generate_secp256k1();
        harness.registered("outsider", &[outsider.clone()], None).await;

        let request = sign(
            &outsider,
            json!({"user": "client|sneaky", "publicKey": outsider.public_key().normalized()}),
        );
        let response = harness.invoke("RegisterUser", request).await;
        assert_eq!(kind(&response), ErrorKind::OrganizationNotAllowed);
    }
}
