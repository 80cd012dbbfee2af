//! # Single-Signature Flows
//!
//! Recovered identities on recoverable schemes, explicit references on
//! non-recoverable ones, and anonymous reads.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use kc_01_signature_engine::{ClientKey, SignatureEngine, SignatureEngineApi, SignerReference};
    use serde_json::{json, Value};
    use shared_types::encoding::decode_bytes;
    use shared_types::{canonical_payload, ErrorKind, SigningScheme};

    #[tokio::test]
    async fn test_resolved_address_is_recovered_address() {
        let harness = Harness::new().await;
        let key = ClientKey::generate_secp256k1();
        harness.registered("recovered", &[key.clone()], None).await;

        for op in ["a", "b", "c"] {
            let request = sign(&key, json!({"op": op}));
            let signature = decode_bytes(request["signature"].as_str().unwrap()).unwrap();
            let engine = SignatureEngine::default();
            let recovered = engine
                .recover(REGULAR, &canonical_payload(&request), &signature)
                .unwrap();

            let response = harness.invoke("VerifySignature", request).await;
            assert_eq!(
                response.data.unwrap()["signedBy"],
                json!([engine.address_of(&recovered)])
            );
        }
    }

    #[tokio::test]
    async fn test_reference_with_recoverable_signature_is_redundant() {
        let harness = Harness::new().await;
        let key = ClientKey::generate_secp256k1();
        harness.registered("redundant", &[key.clone()], None).await;

        let with_key = key
            .sign_single(REGULAR, json!({"op": 1}), SignerReference::PublicKey)
            .unwrap();
        let response = harness.invoke("VerifySignature", with_key.clone()).await;
        assert_eq!(kind(&response), ErrorKind::RedundantSignerPublicKey);

        let with_address = key
            .sign_single(REGULAR, json!({"op": 1}), SignerReference::Address)
            .unwrap();
        let response = harness.invoke("VerifySignature", with_address).await;
        assert_eq!(kind(&response), ErrorKind::RedundantSignerAddress);

        let mut tampered = with_key;
        tampered["op"] = json!(2);
        let response = harness.invoke("VerifySignature", tampered).await;
        assert_eq!(kind(&response), ErrorKind::RedundantSignerPublicKey);
    }

    #[tokio::test]
    async fn test_ton_needs_reference_and_valid_signature() {
        let harness = Harness::new().await;
        let key = ClientKey::generate_ed25519();
        let request = sign(&harness.admin, json!({"publicKey": key.public_key().normalized()}));
        assert!(harness.invoke_as_curator("RegisterTonUser", request).await.is_success());

        let bare = key
            .sign_single(SigningScheme::Ton, json!({"signing": "TON"}), SignerReference::None)
            .unwrap();
        assert_eq!(
            kind(&harness.invoke("VerifySignature", bare).await),
            ErrorKind::MissingSigner
        );

        let signed = key
            .sign_single(SigningScheme::Ton, json!({"signing": "TON"}), SignerReference::Address)
            .unwrap();
        assert!(harness.invoke("VerifySignature", signed.clone()).await.is_success());

        let mut forged = signed;
        forged["extra"] = json!(true);
        assert_eq!(
            kind(&harness.invoke("VerifySignature", forged).await),
            ErrorKind::PkInvalidSignature
        );
    }

    #[tokio::test]
    async fn test_unregistered_signer() {
        let harness = Harness::new().await;
        let request = sign(&ClientKey::generate_secp256k1(), json!({}));
        let response = harness.invoke("GetMyProfile", request).await;
        assert_eq!(kind(&response), ErrorKind::UserNotRegistered);
    }

    #[tokio::test]
    async fn test_anonymous_read() {
        let harness = Harness::new().await;
        let key = ClientKey::generate_secp256k1();
        let alias = harness.registered("public", &[key.clone()], None).await;

        let response = harness.invoke("GetPublicKey", json!({"user": alias})).await;
        let data: Value = response.data.unwrap();
        assert_eq!(data["publicKey"], json!(key.public_key().normalized()));

        let response = harness.invoke("GetMyProfile", json!({})).await;
        assert_eq!(kind(&response), ErrorKind::MissingSignature);
    }
}
