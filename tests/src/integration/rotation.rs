//! # Key Management Flows
//!
//! `UpdatePublicKey` accepts exactly one signature and rotates only the
//! signing key. `AddSigner` and `RemoveSigner` grow and shrink a bundle.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use kc_01_signature_engine::ClientKey;
    use serde_json::json;
    use shared_types::ErrorKind;

    #[tokio::test]
    async fn test_update_public_key_rejects_two_signatures() {
        let harness = Harness::new().await;
        let signers = keys(2);
        harness.registered("rotating", &signers, Some(2)).await;
        let fresh = ClientKey::generate_secp256k1();

        let request = sign_all(
            &[&signers[0], &signers[1]],
            json!({"publicKey": fresh.public_key().normalized(), "uniqueKey": "rot-two"}),
        );
        let response = harness.invoke("UpdatePublicKey", request).await;
        assert_eq!(kind(&response), ErrorKind::ValidationFailed);
        assert!(response.message.unwrap().contains("exactly 1 signature"));
    }

    #[tokio::test]
    async fn test_update_public_key_rotates_only_the_signer() {
        let harness = Harness::new().await;
        let signers = keys(2);
        let alias = harness.registered("rotating", &signers, Some(2)).await;
        let fresh = ClientKey::generate_secp256k1();

        let request = sign(
            &signers[1],
            json!({"publicKey": fresh.public_key().normalized(), "uniqueKey": "rot-one"}),
        );
        let response = harness.invoke("UpdatePublicKey", request).await;
        assert!(response.is_success(), "{response:?}");

        let ledger = harness.ledger();
        let registry = harness.dispatcher.registry();
        let untouched = registry
            .lookup_profile(&ledger, &signers[0].public_key().address())
            .await
            .unwrap()
            .unwrap();
        assert!(untouched.is_active());
        assert_eq!(untouched.alias.as_ref(), Some(&alias));

        let retired = registry
            .lookup_profile(&ledger, &signers[1].public_key().address())
            .await
            .unwrap()
            .unwrap();
        assert!(!retired.is_active());

        let bundle = registry.lookup_key_bundle(&ledger, &alias).await.unwrap().unwrap();
        assert_eq!(
            bundle.public_keys,
            vec![signers[0].public_key().normalized(), fresh.public_key().normalized()]
        );

        let old = sign(&signers[1], json!({"op": "x"}));
        assert_eq!(
            kind(&harness.invoke("GetMyProfile", old).await),
            ErrorKind::UserNotRegistered
        );
        // The account quorum of 2 survives the rotation.
        let fresh_alone = harness
            .invoke("GetMyProfile", sign(&fresh, json!({"op": "x"})))
            .await;
        assert_eq!(kind(&fresh_alone), ErrorKind::Unauthorized);
        assert_eq!(
            fresh_alone.message.as_deref(),
            Some("Insufficient signatures: got 1, required 2.")
        );
        let both = sign_all(&[&signers[0], &fresh], json!({"op": "x"}));
        let response = harness.invoke("GetMyProfile", both).await;
        assert!(response.is_success(), "{response:?}");
    }

    #[tokio::test]
    async fn test_update_public_key_needs_unique_key() {
        let harness = Harness::new().await;
        let key = ClientKey::generate_secp256k1();
        harness.registered("careless", &[key.clone()], None).await;

        let request = sign(&key, json!({"publicKey": keys(1)[0].public_key().normalized()}));
        let response = harness.invoke("UpdatePublicKey", request).await;
        assert_eq!(kind(&response), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_add_then_remove_signer() {
        let harness = Harness::new().await;
        let original = ClientKey::generate_secp256k1();
        let added = ClientKey::generate_secp256k1();
        let alias = harness.registered("team", &[original.clone()], None).await;

        let request = sign(&original, json!({"publicKey": added.public_key().normalized()}));
        let response = harness.invoke("AddSigner", request).await;
        assert_eq!(response.data.unwrap()["publicKeys"].as_array().unwrap().len(), 2);

        let from_added = harness.invoke("VerifySignature", sign(&added, json!({}))).await;
        assert_eq!(from_added.data.unwrap()["alias"], json!(alias));

        let request = sign(&added, json!({"publicKey": original.public_key().normalized()}));
        assert!(harness.invoke("RemoveSigner", request).await.is_success());

        let from_removed = harness.invoke("VerifySignature", sign(&original, json!({}))).await;
        assert_eq!(kind(&from_removed), ErrorKind::UserNotRegistered);

        let request = sign(&added, json!({"publicKey": added.public_key().normalized()}));
        let response = harness.invoke("RemoveSigner", request).await;
        assert_eq!(kind(&response), ErrorKind::ValidationFailed);
    }
}
