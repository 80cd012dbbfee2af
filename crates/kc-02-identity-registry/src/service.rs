//! # Identity Registry Service
//!
//! Stores one [`UserProfile`] per derived address and one [`PublicKeyBundle`]
//! per alias. Every operation reads and writes through the caller's
//! [`BufferedLedger`], so nothing becomes durable unless the surrounding
//! invocation commits.
//!
//! ## Invariants
//!
//! - All active profiles of one alias carry the same roles and quorum; they
//!   are always rewritten together.
//! - `1 <= signature_quorum <= bundle.public_keys.len()`.
//! - An address never resolves to two different aliases. Rotated-away
//!   addresses hold an invalidated profile that no longer blocks reuse.

use crate::domain::entities::{key_bundle_key, profile_key, AccountView, Registration};
use crate::domain::errors::RegistryError;
use kc_01_signature_engine::{PublicKey, SignatureEngine, SignatureEngineApi};
use shared_types::{
    roles, AliasKind, BufferedLedger, ChainAddress, KeyCurve, PublicKeyBundle, SigningScheme,
    UserAlias, UserProfile, CLIENT_PREFIX,
};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

/// Current state of a registered account.
#[derive(Debug, Clone)]
struct Account {
    bundle: PublicKeyBundle,
    addresses: Vec<ChainAddress>,
    profile: UserProfile,
}

impl Account {
    fn view(&self, alias: &UserAlias) -> AccountView {
        AccountView {
            alias: alias.clone(),
            signing: self.bundle.signing,
            public_keys: self.bundle.public_keys.clone(),
            addresses: self.addresses.clone(),
            roles: self.profile.roles.clone(),
            signature_quorum: self.profile.signature_quorum,
        }
    }
}

/// Identity registry over a signature engine.
#[derive(Debug, Clone, Default)]
pub struct IdentityRegistry<E: SignatureEngineApi = SignatureEngine> {
    engine: E,
}

impl<E: SignatureEngineApi> IdentityRegistry<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Engine used for key parsing and address derivation.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    // =========================================================================
    // LOOKUPS
    // =========================================================================

    /// Profile stored at an address, active or not.
    pub async fn lookup_profile(
        &self,
        ledger: &BufferedLedger<'_>,
        address: &str,
    ) -> Result<Option<UserProfile>, RegistryError> {
        Ok(ledger.get_object(&profile_key(address)).await?)
    }

    /// Key bundle of an alias.
    pub async fn lookup_key_bundle(
        &self,
        ledger: &BufferedLedger<'_>,
        alias: &UserAlias,
    ) -> Result<Option<PublicKeyBundle>, RegistryError> {
        Ok(ledger.get_object(&key_bundle_key(alias)).await?)
    }

    /// Full view of a registered account.
    pub async fn account(
        &self,
        ledger: &BufferedLedger<'_>,
        alias: &UserAlias,
    ) -> Result<AccountView, RegistryError> {
        Ok(self.load_account(ledger, alias).await?.view(alias))
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Register a new account.
    ///
    /// Writes one profile per key address and one key bundle, all in the
    /// caller's buffer. Nothing is written on failure.
    pub async fn register(
        &self,
        ledger: &mut BufferedLedger<'_>,
        registration: Registration,
    ) -> Result<AccountView, RegistryError> {
        let Registration {
            alias,
            signing,
            public_keys,
            signature_quorum,
            roles,
        } = registration;

        if public_keys.is_empty() {
            return Err(RegistryError::validation("At least one public key is required"));
        }

        let keys = public_keys
            .iter()
            .map(|encoded| self.engine.parse_public_key(signing, encoded))
            .collect::<Result<Vec<PublicKey>, _>>()?;
        let normalized: Vec<String> = keys.iter().map(PublicKey::normalized).collect();

        let unique: HashSet<&String> = normalized.iter().collect();
        if unique.len() != normalized.len() {
            return Err(RegistryError::validation("Found duplicate public keys"));
        }

        let key_count = u32::try_from(keys.len())
            .map_err(|_| RegistryError::validation("Too many public keys"))?;
        let quorum = signature_quorum.unwrap_or(key_count);
        check_quorum(quorum, key_count)?;

        let addresses: Vec<ChainAddress> = keys.iter().map(|k| self.engine.address_of(k)).collect();
        check_alias_format(&alias, signing, &addresses)?;

        if self.lookup_key_bundle(ledger, &alias).await?.is_some() {
            return Err(RegistryError::ProfileExists(format!(
                "Profile already exists for alias {alias}"
            )));
        }
        for address in &addresses {
            self.ensure_address_free(ledger, address).await?;
        }

        let roles = roles.unwrap_or_else(roles::default_user_roles);
        let bundle = PublicKeyBundle {
            signing,
            public_keys: normalized,
        };
        self.write_profiles(ledger, &alias, &addresses, &roles, quorum)?;
        ledger.put_object(&key_bundle_key(&alias), &bundle)?;

        info!(%alias, keys = addresses.len(), quorum, %signing, "User registered");

        Ok(AccountView {
            alias,
            signing,
            public_keys: bundle.public_keys,
            addresses,
            roles,
            signature_quorum: quorum,
        })
    }

    /// Register the bootstrap admin unless an account with that alias exists.
    ///
    /// Returns whether anything was written.
    pub async fn ensure_admin(
        &self,
        ledger: &mut BufferedLedger<'_>,
        alias: &UserAlias,
        signing: SigningScheme,
        public_key: &str,
    ) -> Result<bool, RegistryError> {
        if self.lookup_key_bundle(ledger, alias).await?.is_some() {
            debug!(%alias, "Admin already registered");
            return Ok(false);
        }

        let registration = Registration {
            alias: alias.clone(),
            signing,
            public_keys: vec![public_key.to_string()],
            signature_quorum: Some(1),
            roles: Some(roles::admin_roles()),
        };
        self.register(ledger, registration).await?;
        Ok(true)
    }

    // =========================================================================
    // KEY ROTATION & SIGNERS
    // =========================================================================

    /// Replace one key of an alias in place.
    ///
    /// The old address keeps an invalidated profile; the new address gets a
    /// fresh profile cloned from the alias's roles and quorum.
    pub async fn rotate_key(
        &self,
        ledger: &mut BufferedLedger<'_>,
        alias: &UserAlias,
        old_public_key: &str,
        new_public_key: &str,
    ) -> Result<AccountView, RegistryError> {
        let mut account = self.load_account(ledger, alias).await?;
        let signing = account.bundle.signing;

        let old_key = self.engine.parse_public_key(signing, old_public_key)?;
        let new_key = self.engine.parse_public_key(signing, new_public_key)?;

        let position = account
            .bundle
            .position(&old_key.normalized())
            .ok_or_else(|| {
                RegistryError::NotFound(format!("Public key is not registered for {alias}"))
            })?;
        if account.bundle.contains(&new_key.normalized()) {
            return Err(RegistryError::validation(
                "New public key is already registered for this user",
            ));
        }

        let old_address = account.addresses[position].clone();
        let new_address = self.engine.address_of(&new_key);
        self.ensure_address_free(ledger, &new_address).await?;

        let old_profile = self
            .lookup_profile(ledger, &old_address)
            .await?
            .ok_or_else(|| RegistryError::Corrupted(format!("missing profile at {old_address}")))?;
        ledger.put_object(&profile_key(&old_address), &old_profile.invalidated())?;

        let fresh = UserProfile::new(
            alias.clone(),
            new_address.clone(),
            account.profile.roles.clone(),
            account.profile.signature_quorum,
        );
        ledger.put_object(&profile_key(&new_address), &fresh)?;

        account.bundle.public_keys[position] = new_key.normalized();
        account.addresses[position] = new_address.clone();
        ledger.put_object(&key_bundle_key(alias), &account.bundle)?;

        info!(%alias, %old_address, %new_address, "Public key rotated");
        Ok(account.view(alias))
    }

    /// Append a key to an alias's bundle.
    pub async fn add_signer(
        &self,
        ledger: &mut BufferedLedger<'_>,
        alias: &UserAlias,
        public_key: &str,
    ) -> Result<AccountView, RegistryError> {
        let mut account = self.load_account(ledger, alias).await?;
        let key = self.engine.parse_public_key(account.bundle.signing, public_key)?;

        if account.bundle.contains(&key.normalized()) {
            return Err(RegistryError::validation("Found duplicate public keys"));
        }
        let address = self.engine.address_of(&key);
        self.ensure_address_free(ledger, &address).await?;

        let profile = UserProfile::new(
            alias.clone(),
            address.clone(),
            account.profile.roles.clone(),
            account.profile.signature_quorum,
        );
        ledger.put_object(&profile_key(&address), &profile)?;

        account.bundle.public_keys.push(key.normalized());
        account.addresses.push(address.clone());
        ledger.put_object(&key_bundle_key(alias), &account.bundle)?;

        info!(%alias, %address, keys = account.addresses.len(), "Signer added");
        Ok(account.view(alias))
    }

    /// Remove a key from an alias's bundle and invalidate its profile.
    pub async fn remove_signer(
        &self,
        ledger: &mut BufferedLedger<'_>,
        alias: &UserAlias,
        public_key: &str,
    ) -> Result<AccountView, RegistryError> {
        let mut account = self.load_account(ledger, alias).await?;
        let key = self.engine.parse_public_key(account.bundle.signing, public_key)?;

        let position = account
            .bundle
            .position(&key.normalized())
            .ok_or_else(|| {
                RegistryError::NotFound(format!("Public key is not registered for {alias}"))
            })?;
        if account.bundle.public_keys.len() == 1 {
            return Err(RegistryError::validation("Cannot remove the last public key"));
        }
        let remaining = u32::try_from(account.bundle.public_keys.len() - 1)
            .map_err(|_| RegistryError::validation("Too many public keys"))?;
        check_quorum(account.profile.signature_quorum, remaining)?;

        let address = account.addresses.remove(position);
        account.bundle.public_keys.remove(position);
        if let Some(profile) = self.lookup_profile(ledger, &address).await? {
            ledger.put_object(&profile_key(&address), &profile.invalidated())?;
        }
        ledger.put_object(&key_bundle_key(alias), &account.bundle)?;

        if account.profile.address == address {
            account.profile.address = account.addresses[0].clone();
        }

        info!(%alias, %address, keys = account.addresses.len(), "Signer removed");
        Ok(account.view(alias))
    }

    // =========================================================================
    // ROLE & QUORUM UPDATES
    // =========================================================================

    /// Replace the roles of every profile of an alias.
    pub async fn update_roles(
        &self,
        ledger: &mut BufferedLedger<'_>,
        alias: &UserAlias,
        roles: BTreeSet<String>,
    ) -> Result<AccountView, RegistryError> {
        let mut account = self.load_account(ledger, alias).await?;
        self.write_profiles(
            ledger,
            alias,
            &account.addresses,
            &roles,
            account.profile.signature_quorum,
        )?;
        account.profile.roles = roles;

        info!(%alias, roles = ?account.profile.roles, "Roles updated");
        Ok(account.view(alias))
    }

    /// Change the signature quorum of every profile of an alias.
    pub async fn update_quorum(
        &self,
        ledger: &mut BufferedLedger<'_>,
        alias: &UserAlias,
        quorum: u32,
    ) -> Result<AccountView, RegistryError> {
        let mut account = self.load_account(ledger, alias).await?;
        let key_count = u32::try_from(account.bundle.public_keys.len())
            .map_err(|_| RegistryError::validation("Too many public keys"))?;
        check_quorum(quorum, key_count)?;

        self.write_profiles(ledger, alias, &account.addresses, &account.profile.roles, quorum)?;
        account.profile.signature_quorum = quorum;

        info!(%alias, quorum, "Signature quorum updated");
        Ok(account.view(alias))
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    async fn load_account(
        &self,
        ledger: &BufferedLedger<'_>,
        alias: &UserAlias,
    ) -> Result<Account, RegistryError> {
        let bundle = self.lookup_key_bundle(ledger, alias).await?.ok_or_else(|| {
            RegistryError::NotFound(format!("No public keys registered for {alias}"))
        })?;

        let addresses = bundle
            .public_keys
            .iter()
            .map(|stored| {
                self.engine
                    .parse_public_key(bundle.signing, stored)
                    .map(|key| self.engine.address_of(&key))
                    .map_err(|e| RegistryError::Corrupted(format!("stored key of {alias}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut profile = None;
        for address in &addresses {
            if let Some(found) = self.lookup_profile(ledger, address).await? {
                if found.is_active() && found.alias.as_ref() == Some(alias) {
                    profile = Some(found);
                    break;
                }
            }
        }
        let profile = profile
            .ok_or_else(|| RegistryError::Corrupted(format!("no active profile for {alias}")))?;

        Ok(Account {
            bundle,
            addresses,
            profile,
        })
    }

    async fn ensure_address_free(
        &self,
        ledger: &BufferedLedger<'_>,
        address: &str,
    ) -> Result<(), RegistryError> {
        match self.lookup_profile(ledger, address).await? {
            Some(existing) if existing.is_active() => Err(RegistryError::ProfileExists(format!(
                "Profile already exists for address {address}"
            ))),
            _ => Ok(()),
        }
    }

    fn write_profiles(
        &self,
        ledger: &mut BufferedLedger<'_>,
        alias: &UserAlias,
        addresses: &[ChainAddress],
        roles: &BTreeSet<String>,
        quorum: u32,
    ) -> Result<(), RegistryError> {
        for address in addresses {
            let profile = UserProfile::new(alias.clone(), address.clone(), roles.clone(), quorum);
            ledger.put_object(&profile_key(address), &profile)?;
        }
        Ok(())
    }
}

fn check_quorum(quorum: u32, key_count: u32) -> Result<(), RegistryError> {
    if quorum == 0 {
        return Err(RegistryError::validation("Signature quorum must be at least 1"));
    }
    if quorum > key_count {
        return Err(RegistryError::validation(
            "Signature quorum cannot exceed number of public keys",
        ));
    }
    Ok(())
}

/// `client|` aliases need a name; `eth|` and `ton|` aliases must be derived
/// from their single key on the matching curve.
fn check_alias_format(
    alias: &UserAlias,
    signing: SigningScheme,
    addresses: &[ChainAddress],
) -> Result<(), RegistryError> {
    let derived_from = |curve: KeyCurve, expected: fn(&str) -> UserAlias| {
        signing.curve() == curve
            && addresses.len() == 1
            && expected(&addresses[0]) == *alias
    };

    let valid = match alias.kind() {
        AliasKind::Client => alias.as_str().len() > CLIENT_PREFIX.len(),
        AliasKind::Eth => derived_from(KeyCurve::Secp256k1, UserAlias::eth),
        AliasKind::Ton => derived_from(KeyCurve::Ed25519, UserAlias::ton),
        AliasKind::Service | AliasKind::Unknown => false,
    };

    if valid {
        Ok(())
    } else {
        Err(RegistryError::validation(format!(
            "Invalid alias '{alias}' for {signing} signing: expected client|<name>, \
             or eth|/ton| followed by the address of the single key"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kc_01_signature_engine::ClientKey;
    use shared_types::{InMemoryLedger, ZERO_ADDRESS};

    fn registry() -> IdentityRegistry {
        IdentityRegistry::default()
    }

    fn keys(n: usize) -> Vec<ClientKey> {
        (0..n).map(|_| ClientKey::generate_secp256k1()).collect()
    }

    fn registration(alias: &str, keys: &[ClientKey], quorum: Option<u32>) -> Registration {
        Registration {
            alias: UserAlias::client(alias),
            signing: SigningScheme::Regular,
            public_keys: keys.iter().map(|k| k.public_key().normalized()).collect(),
            signature_quorum: quorum,
            roles: None,
        }
    }

    #[tokio::test]
    async fn test_register_multi_key_account() {
        let store = InMemoryLedger::new();
        let mut ledger = BufferedLedger::new(&store);
        let signers = keys(3);

        let view = registry()
            .register(&mut ledger, registration("multi", &signers, Some(2)))
            .await
            .unwrap();

        assert_eq!(view.addresses.len(), 3);
        assert_eq!(view.signature_quorum, 2);
        // 3 profiles + 1 bundle
        assert_eq!(ledger.pending_writes(), 4);

        for key in &signers {
            let profile = registry()
                .lookup_profile(&ledger, &key.public_key().address())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(profile.alias, Some(UserAlias::client("multi")));
            assert_eq!(profile.signature_quorum, 2);
            assert_eq!(profile.roles, roles::default_user_roles());
        }
    }

    #[tokio::test]
    async fn test_register_defaults_quorum_to_key_count() {
        let store = InMemoryLedger::new();
        let mut ledger = BufferedLedger::new(&store);
        let view = registry()
            .register(&mut ledger, registration("q", &keys(2), None))
            .await
            .unwrap();
        assert_eq!(view.signature_quorum, 2);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_large_quorum() {
        let store = InMemoryLedger::new();
        let mut ledger = BufferedLedger::new(&store);
        let key = ClientKey::generate_secp256k1();

        let err = registry()
            .register(&mut ledger, registration("dup", &[key.clone(), key], None))
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::validation("Found duplicate public keys"));

        let err = registry()
            .register(&mut ledger, registration("big", &keys(2), Some(3)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::validation("Signature quorum cannot exceed number of public keys")
        );
        assert_eq!(ledger.pending_writes(), 0);
    }

    #[tokio::test]
    async fn test_register_rejects_taken_alias_and_address() {
        let store = InMemoryLedger::new();
        let mut ledger = BufferedLedger::new(&store);
        let signers = keys(1);
        registry()
            .register(&mut ledger, registration("taken", &signers, None))
            .await
            .unwrap();

        let err = registry()
            .register(&mut ledger, registration("taken", &keys(1), None))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::ProfileExists(_)));

        let err = registry()
            .register(&mut ledger, registration("other", &signers, None))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::ProfileExists(_)));
    }

    #[tokio::test]
    async fn test_alias_format_checks() {
        let store = InMemoryLedger::new();
        let mut ledger = BufferedLedger::new(&store);
        let key = ClientKey::generate_secp256k1();
        let address = key.public_key().address();

        let bad = Registration::single(UserAlias::new("bob"), SigningScheme::Regular, key.public_key().normalized());
        assert!(matches!(
            registry().register(&mut ledger, bad).await,
            Err(RegistryError::Validation(_))
        ));

        let wrong_eth = Registration::single(UserAlias::eth("abc"), SigningScheme::Regular, key.public_key().normalized());
        assert!(registry().register(&mut ledger, wrong_eth).await.is_err());

        let eth = Registration::single(UserAlias::eth(&address), SigningScheme::Regular, key.public_key().normalized());
        assert!(registry().register(&mut ledger, eth).await.is_ok());

        let ton_key = ClientKey::generate_ed25519();
        let ton = Registration::single(
            UserAlias::ton(&ton_key.public_key().address()),
            SigningScheme::Ton,
            ton_key.public_key().normalized(),
        );
        assert!(registry().register(&mut ledger, ton).await.is_ok());
    }

    #[tokio::test]
    async fn test_rotate_key_invalidates_old_profile() {
        let store = InMemoryLedger::new();
        let mut ledger = BufferedLedger::new(&store);
        let signers = keys(2);
        let alias = UserAlias::client("rot");
        registry()
            .register(&mut ledger, registration("rot", &signers, Some(2)))
            .await
            .unwrap();

        let fresh = ClientKey::generate_secp256k1();
        let view = registry()
            .rotate_key(
                &mut ledger,
                &alias,
                &signers[0].public_key().normalized(),
                &fresh.public_key().normalized(),
            )
            .await
            .unwrap();

        // position preserved
        assert_eq!(view.public_keys[0], fresh.public_key().normalized());
        assert_eq!(view.public_keys[1], signers[1].public_key().normalized());

        let old = registry()
            .lookup_profile(&ledger, &signers[0].public_key().address())
            .await
            .unwrap()
            .unwrap();
        assert!(!old.is_active());
        assert_eq!(old.address, ZERO_ADDRESS);

        let new = registry()
            .lookup_profile(&ledger, &fresh.public_key().address())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(new.alias, Some(alias.clone()));
        assert_eq!(new.signature_quorum, 2);

        // untouched second key
        let other = registry()
            .lookup_profile(&ledger, &signers[1].public_key().address())
            .await
            .unwrap()
            .unwrap();
        assert!(other.is_active());

        // the freed address can be registered again by someone else
        let reuse = Registration::single(
            UserAlias::client("reuse"),
            SigningScheme::Regular,
            signers[0].public_key().normalized(),
        );
        assert!(registry().register(&mut ledger, reuse).await.is_ok());
    }

    #[tokio::test]
    async fn test_rotate_key_rejects_unknown_old_key() {
        let store = InMemoryLedger::new();
        let mut ledger = BufferedLedger::new(&store);
        let alias = UserAlias::client("rot");
        registry()
            .register(&mut ledger, registration("rot", &keys(1), None))
            .await
            .unwrap();

        let err = registry()
            .rotate_key(
                &mut ledger,
                &alias,
                &ClientKey::generate_secp256k1().public_key().normalized(),
                &ClientKey::generate_secp256k1().public_key().normalized(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_roles_and_quorum_touch_every_profile() {
        let store = InMemoryLedger::new();
        let mut ledger = BufferedLedger::new(&store);
        let signers = keys(3);
        let alias = UserAlias::client("acct");
        registry()
            .register(&mut ledger, registration("acct", &signers, Some(1)))
            .await
            .unwrap();

        let roles: BTreeSet<String> = [roles::CURATOR.to_string()].into();
        registry().update_roles(&mut ledger, &alias, roles.clone()).await.unwrap();
        registry().update_quorum(&mut ledger, &alias, 3).await.unwrap();

        for key in &signers {
            let profile = registry()
                .lookup_profile(&ledger, &key.public_key().address())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(profile.roles, roles);
            assert_eq!(profile.signature_quorum, 3);
        }

        assert!(registry().update_quorum(&mut ledger, &alias, 4).await.is_err());
        assert!(registry().update_quorum(&mut ledger, &alias, 0).await.is_err());
    }

    #[tokio::test]
    async fn test_add_and_remove_signer() {
        let store = InMemoryLedger::new();
        let mut ledger = BufferedLedger::new(&store);
        let signers = keys(1);
        let alias = UserAlias::client("grow");
        registry()
            .register(&mut ledger, registration("grow", &signers, None))
            .await
            .unwrap();

        let extra = ClientKey::generate_secp256k1();
        let view = registry()
            .add_signer(&mut ledger, &alias, &extra.public_key().normalized())
            .await
            .unwrap();
        assert_eq!(view.public_keys.len(), 2);

        let err = registry()
            .add_signer(&mut ledger, &alias, &extra.public_key().normalized())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Validation(_)));

        let view = registry()
            .remove_signer(&mut ledger, &alias, &signers[0].public_key().normalized())
            .await
            .unwrap();
        assert_eq!(view.public_keys, vec![extra.public_key().normalized()]);

        let err = registry()
            .remove_signer(&mut ledger, &alias, &extra.public_key().normalized())
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::validation("Cannot remove the last public key"));
    }

    #[tokio::test]
    async fn test_remove_signer_respects_quorum() {
        let store = InMemoryLedger::new();
        let mut ledger = BufferedLedger::new(&store);
        let signers = keys(2);
        let alias = UserAlias::client("strict");
        registry()
            .register(&mut ledger, registration("strict", &signers, Some(2)))
            .await
            .unwrap();

        let err = registry()
            .remove_signer(&mut ledger, &alias, &signers[1].public_key().normalized())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::validation("Signature quorum cannot exceed number of public keys")
        );
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let store = InMemoryLedger::new();
        let mut ledger = BufferedLedger::new(&store);
        let admin = ClientKey::generate_secp256k1();
        let alias = UserAlias::client("admin");
        let encoded = admin.public_key().normalized();

        assert!(registry()
            .ensure_admin(&mut ledger, &alias, SigningScheme::Regular, &encoded)
            .await
            .unwrap());
        assert!(!registry()
            .ensure_admin(&mut ledger, &alias, SigningScheme::Regular, &encoded)
            .await
            .unwrap());

        let view = registry().account(&ledger, &alias).await.unwrap();
        assert_eq!(view.roles, roles::admin_roles());
        assert_eq!(view.signature_quorum, 1);
    }
}
