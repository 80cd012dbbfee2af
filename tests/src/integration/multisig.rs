//! # Multi-Signature Flows
//!
//! Duplicate signers, alias mismatches and quorum thresholds for requests
//! carrying a `signatures` array.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use kc_01_signature_engine::{ClientKey, SignerReference};
    use serde_json::{json, Value};
    use shared_types::{ErrorKind, SigningScheme};

    const DER: SigningScheme = SigningScheme::Der;

    /// DER entries with an explicit public key reference.
    fn der_entries(body: &Value, signers: &[&ClientKey]) -> Value {
        let mut request = body.clone();
        let entries: Vec<_> = signers
            .iter()
            .map(|k| k.signature_entry(DER, body, SignerReference::PublicKey).unwrap())
            .collect();
        request["signatures"] = json!(entries);
        request
    }

    async fn register_der(harness: &Harness, name: &str, signers: &[ClientKey], quorum: u32) {
        let mut request = registration_request(name, signers, Some(quorum));
        request["keyScheme"] = json!("DER");
        let response = harness.register_request(request).await;
        assert!(response.is_success(), "{response:?}");
    }

    #[tokio::test]
    async fn test_duplicate_signer_public_key() {
        let harness = Harness::new().await;
        let signers = keys(2);
        harness.registered("dup", &signers, Some(2)).await;

        let request = sign_all(&[&signers[0], &signers[0]], json!({"op": "x"}));
        let response = harness.invoke("VerifySignature", request).await;
        assert_eq!(kind(&response), ErrorKind::DuplicateSignerPublicKey);
    }

    #[tokio::test]
    async fn test_duplicate_signer_regardless_of_validity() {
        let harness = Harness::new().await;
        let signers = keys(2);
        register_der(&harness, "dup-der", &signers, 2).await;

        let body = json!({"signing": "DER", "op": "x"});
        let mut request = der_entries(&body, &[&signers[0], &signers[0]]);
        // second entry still references the first key but carries another signature
        let foreign = der_entries(&body, &[&signers[1]]);
        request["signatures"][1]["signature"] = foreign["signatures"][0]["signature"].clone();

        let response = harness.invoke("VerifySignature", request.clone()).await;
        assert_eq!(kind(&response), ErrorKind::DuplicateSignerPublicKey);

        // A signature that does not even decode is still a duplicate signer.
        request["signatures"][1]["signature"] = json!("!!not-a-signature!!");
        let response = harness.invoke("VerifySignature", request).await;
        assert_eq!(kind(&response), ErrorKind::DuplicateSignerPublicKey);
    }

    #[tokio::test]
    async fn test_signers_of_different_accounts() {
        let harness = Harness::new().await;
        let alice = ClientKey::generate_secp256k1();
        let bob = ClientKey::generate_secp256k1();
        harness.registered("alice", &[alice.clone()], None).await;
        harness.registered("bob", &[bob.clone()], None).await;

        let request = sign_all(&[&alice, &bob], json!({"op": "x"}));
        let response = harness.invoke("VerifySignature", request).await;
        assert_eq!(kind(&response), ErrorKind::SignerAliasMismatch);
    }

    #[tokio::test]
    async fn test_alias_mismatch_regardless_of_validity() {
        let harness = Harness::new().await;
        let alice = ClientKey::generate_secp256k1();
        let bob = ClientKey::generate_secp256k1();
        register_der(&harness, "alice-der", &[alice.clone()], 1).await;
        register_der(&harness, "bob-der", &[bob.clone()], 1).await;

        let body = json!({"signing": "DER", "op": "x"});
        let mut request = der_entries(&body, &[&alice, &bob]);
        request["signatures"][1]["signature"] = request["signatures"][0]["signature"].clone();

        let response = harness.invoke("VerifySignature", request).await;
        assert_eq!(kind(&response), ErrorKind::SignerAliasMismatch);
    }

    #[tokio::test]
    async fn test_quorum_is_monotonic() {
        let harness = Harness::new().await;
        let signers = keys(3);
        let alias = harness.registered("vault", &signers, Some(2)).await;

        let both = sign_all(&[&signers[0], &signers[1]], json!({"op": "pay"}));
        let response = harness.invoke("VerifySignature", both).await;
        let data = response.data.unwrap();
        assert_eq!(data["alias"], json!(alias));
        assert_eq!(data["signedBy"].as_array().unwrap().len(), 2);

        let one = sign_all(&[&signers[0]], json!({"op": "pay"}));
        let response = harness.invoke("VerifySignature", one).await;
        assert_eq!(kind(&response), ErrorKind::Unauthorized);
        assert_eq!(
            response.message.as_deref(),
            Some("Insufficient signatures: got 1, required 2.")
        );

        let single = sign(&signers[2], json!({"op": "pay"}));
        let response = harness.invoke("VerifySignature", single).await;
        assert_eq!(kind(&response), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_unregistered_entries_do_not_count_toward_quorum() {
        let harness = Harness::new().await;
        let signers = keys(2);
        harness.registered("pair", &signers, Some(2)).await;
        let stranger = ClientKey::generate_secp256k1();

        let request = sign_all(&[&signers[0], &stranger], json!({"op": "x"}));
        let response = harness.invoke("VerifySignature", request).await;
        assert_eq!(
            response.message.as_deref(),
            Some("Insufficient signatures: got 1, required 2.")
        );
    }

    #[tokio::test]
    async fn test_raising_quorum_requires_more_signers() {
        let harness = Harness::new().await;
        let signers = keys(2);
        harness.registered("growing", &signers, Some(1)).await;

        let request = sign(&signers[0], json!({"signatureQuorum": 2}));
        let response = harness.invoke("UpdateSignatureQuorum", request).await;
        assert_eq!(response.data.unwrap()["signatureQuorum"], 2);

        let alone = sign(&signers[0], json!({"op": "x"}));
        assert_eq!(
            kind(&harness.invoke("VerifySignature", alone).await),
            ErrorKind::Unauthorized
        );

        let request = sign(&signers[0], json!({"signatureQuorum": 3}));
        let response = harness.invoke("UpdateSignatureQuorum", request).await;
        assert_eq!(kind(&response), ErrorKind::Unauthorized);

        let request = sign_all(&[&signers[0], &signers[1]], json!({"signatureQuorum": 3}));
        let response = harness.invoke("UpdateSignatureQuorum", request).await;
        assert_eq!(kind(&response), ErrorKind::ValidationFailed);
    }
}
