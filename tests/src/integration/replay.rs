//! # Replay and Expiration Flows

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use kc_01_signature_engine::ClientKey;
    use serde_json::{json, Value};
    use shared_types::ErrorKind;

    const HOUR_MS: i64 = 60 * 60 * 1000;
    const YEAR_MS: i64 = 365 * 24 * HOUR_MS;

    fn roles_request(harness: &Harness, user: &Value, roles: &[&str], unique_key: &str) -> Value {
        sign(
            &harness.admin,
            json!({"user": user, "roles": roles, "uniqueKey": unique_key}),
        )
    }

    #[tokio::test]
    async fn test_second_use_of_unique_key_conflicts() {
        let harness = Harness::new().await;
        let alias = json!(harness.registered("reader", &keys(1), None).await);

        let first = roles_request(&harness, &alias, &["EVALUATE"], "roles-1");
        assert!(harness.invoke_as_curator("UpdateUserRoles", first).await.is_success());

        let second = roles_request(&harness, &alias, &["EVALUATE", "SUBMIT", "CURATOR"], "roles-1");
        let response = harness.invoke_as_curator("UpdateUserRoles", second).await;
        assert_eq!(kind(&response), ErrorKind::Conflict);

        let response = harness.invoke("GetPublicKey", json!({"user": alias})).await;
        assert!(response.is_success());

        let third = roles_request(&harness, &alias, &["EVALUATE", "SUBMIT"], "roles-2");
        let response = harness.invoke_as_curator("UpdateUserRoles", third).await;
        assert_eq!(response.data.unwrap()["roles"], json!(["EVALUATE", "SUBMIT"]));
    }

    #[tokio::test]
    async fn test_failed_attempt_does_not_burn_unique_key() {
        let harness = Harness::new().await;
        let key = ClientKey::generate_secp256k1();
        harness.registered("retry", &[key.clone()], None).await;

        let bad = sign(&key, json!({"publicKey": "not-a-key", "uniqueKey": "rot"}));
        let response = harness.invoke("UpdatePublicKey", bad).await;
        assert_eq!(kind(&response), ErrorKind::InvalidKey);

        let fresh = ClientKey::generate_secp256k1();
        let good = sign(&key, json!({"publicKey": fresh.public_key().normalized(), "uniqueKey": "rot"}));
        assert!(harness.invoke("UpdatePublicKey", good).await.is_success());

        let again = sign(&fresh, json!({"publicKey": keys(1)[0].public_key().normalized(), "uniqueKey": "rot"}));
        assert_eq!(
            kind(&harness.invoke("UpdatePublicKey", again).await),
            ErrorKind::Conflict
        );
    }

    #[tokio::test]
    async fn test_expiration_window() {
        let harness = Harness::new().await;
        let key = ClientKey::generate_secp256k1();
        harness.registered("timed", &[key.clone()], None).await;

        let cases = [
            (Some(NOW_MS - HOUR_MS), Some(ErrorKind::TransactionExpired)),
            (Some(NOW_MS), Some(ErrorKind::TransactionExpired)),
            (Some(NOW_MS + 2 * YEAR_MS), Some(ErrorKind::TransactionExpirationTooFar)),
            (Some(NOW_MS + HOUR_MS), None),
            (None, None),
        ];
        for (expires_at, expected) in cases {
            let mut body = json!({});
            if let Some(at) = expires_at {
                body["transactionExpiresAt"] = json!(at);
            }
            let response = harness.invoke("GetMyProfile", sign(&key, body)).await;
            assert_eq!(response.error_key, expected, "expiresAt={expires_at:?}");
        }
    }
}
