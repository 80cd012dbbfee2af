//! # Test Fixtures
//!
//! A dispatcher over an in-memory ledger with a bootstrapped admin, plus
//! helpers to register accounts and sign requests the way clients do.

use kc_01_signature_engine::{ClientKey, SignerReference};
use kc_04_authorization::AuthConfig;
use kc_05_transaction_dispatcher::{public_key_contract, Contract, Dispatcher, InvocationContext};
use serde_json::{json, Value};
use shared_types::{
    BufferedLedger, ChainResponse, ErrorKind, InMemoryLedger, SigningScheme, UserAlias,
};
use std::sync::Arc;

pub const REGULAR: SigningScheme = SigningScheme::Regular;
pub const CURATOR_ORG: &str = "CuratorOrg";
pub const USER_ORG: &str = "UserOrg";

/// Fixed transaction time so expiration checks are deterministic.
pub const NOW_MS: i64 = 1_750_000_000_000;

/// Dispatcher plus the admin key that may register users.
pub struct Harness {
    pub dispatcher: Dispatcher<InMemoryLedger>,
    pub admin: ClientKey,
}

impl Harness {
    /// Harness over the public-key contract.
    pub async fn new() -> Self {
        Self::with_contract(public_key_contract).await
    }

    /// Harness over any contract built from the config.
    pub async fn with_contract<F, E>(build: F) -> Self
    where
        F: FnOnce(&AuthConfig) -> Result<Contract, E>,
        E: std::fmt::Debug,
    {
        let admin = ClientKey::generate_secp256k1();
        let config = AuthConfig {
            dev_admin_public_key: Some(admin.public_key().normalized()),
            ..AuthConfig::default()
        };
        let contract = build(&config).unwrap();
        let dispatcher = Dispatcher::new(contract, config, Arc::new(InMemoryLedger::new()));
        assert!(dispatcher.bootstrap_admin().await.unwrap());
        Self { dispatcher, admin }
    }

    pub fn store(&self) -> &InMemoryLedger {
        self.dispatcher.store()
    }

    /// Invoke as a plain user organization member.
    pub async fn invoke(&self, method: &str, request: Value) -> ChainResponse {
        let ctx = InvocationContext::new(USER_ORG, "x509::user").at(NOW_MS);
        self.dispatcher.invoke(&ctx, method, &request).await
    }

    /// Invoke as the curator organization.
    pub async fn invoke_as_curator(&self, method: &str, request: Value) -> ChainResponse {
        let ctx = InvocationContext::new(CURATOR_ORG, "x509::admin").at(NOW_MS);
        self.dispatcher.invoke(&ctx, method, &request).await
    }

    /// `RegisterUser` signed by the admin.
    pub async fn register(&self, name: &str, keys: &[ClientKey], quorum: Option<u32>) -> ChainResponse {
        self.register_request(registration_request(name, keys, quorum)).await
    }

    /// Sign a prepared `RegisterUser` payload as the admin and submit it.
    pub async fn register_request(&self, request: Value) -> ChainResponse {
        let request = sign(&self.admin, request);
        self.invoke_as_curator("RegisterUser", request).await
    }

    /// Register and assert success.
    pub async fn registered(&self, name: &str, keys: &[ClientKey], quorum: Option<u32>) -> UserAlias {
        let response = self.register(name, keys, quorum).await;
        assert!(response.is_success(), "registration failed: {response:?}");
        UserAlias::client(name)
    }

    /// Fresh read-only view of committed state.
    pub fn ledger(&self) -> BufferedLedger<'_> {
        BufferedLedger::new(self.store())
    }
}

/// `RegisterUser` payload for `client|{name}`.
pub fn registration_request(name: &str, keys: &[ClientKey], quorum: Option<u32>) -> Value {
    let mut request = json!({
        "user": UserAlias::client(name),
        "publicKeys": keys.iter().map(|k| k.public_key().normalized()).collect::<Vec<_>>(),
    });
    if let Some(quorum) = quorum {
        request["signatureQuorum"] = json!(quorum);
    }
    request
}

pub fn keys(n: usize) -> Vec<ClientKey> {
    (0..n).map(|_| ClientKey::generate_secp256k1()).collect()
}

/// Single-signature request, signer recovered from the signature.
pub fn sign(key: &ClientKey, request: Value) -> Value {
    key.sign_single(REGULAR, request, SignerReference::None).unwrap()
}

/// Multi-signature request, one entry per key, in order.
pub fn sign_all(signers: &[&ClientKey], mut request: Value) -> Value {
    let entries: Vec<_> = signers
        .iter()
        .map(|key| {
            key.signature_entry(REGULAR, &request, SignerReference::None)
                .unwrap()
        })
        .collect();
    request["signatures"] = json!(entries);
    request
}

/// Error kind of a failed response.
pub fn kind(response: &ChainResponse) -> ErrorKind {
    response
        .error_key
        .unwrap_or_else(|| panic!("expected an error response, got {response:?}"))
}
