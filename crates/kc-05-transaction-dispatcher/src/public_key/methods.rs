//! Handlers of the public-key contract.

use super::dto::{
    EmptyDto, GetPublicKeyDto, PublicKeyDto, RegisterUserDto, UpdateQuorumDto,
    UpdateUserRolesDto,
};
use crate::contract::handler::ChainMethod;
use crate::domain::context::ChainContext;
use crate::domain::infer_key_scheme;
use async_trait::async_trait;
use kc_01_signature_engine::SignatureEngineApi;
use kc_02_identity_registry::Registration;
use serde::Serialize;
use serde_json::{json, Value};
use shared_types::{ChainError, SigningScheme, UserAlias};

fn to_data<T: Serialize>(value: &T) -> Result<Value, ChainError> {
    serde_json::to_value(value).map_err(|e| ChainError::internal(e.to_string()))
}

// =============================================================================
// REGISTRATION
// =============================================================================

pub struct RegisterUser;

#[async_trait]
impl ChainMethod for RegisterUser {
    type Dto = RegisterUserDto;

    async fn execute(
        &self,
        ctx: &mut ChainContext<'_, '_>,
        dto: RegisterUserDto,
    ) -> Result<Value, ChainError> {
        let public_keys = dto.keys();
        let signing = match (dto.key_scheme, public_keys.first()) {
            (Some(scheme), _) => scheme,
            (None, Some(first)) => infer_key_scheme(first),
            (None, None) => SigningScheme::default(),
        };
        let registration = Registration {
            alias: dto.user,
            signing,
            public_keys,
            signature_quorum: dto.signature_quorum,
            roles: None,
        };
        let view = ctx.registry.register(ctx.ledger, registration).await?;
        to_data(&view)
    }
}

/// Registers `eth|{address}` from a secp256k1 key.
pub struct RegisterEthUser;

#[async_trait]
impl ChainMethod for RegisterEthUser {
    type Dto = PublicKeyDto;

    async fn execute(
        &self,
        ctx: &mut ChainContext<'_, '_>,
        dto: PublicKeyDto,
    ) -> Result<Value, ChainError> {
        let engine = ctx.registry.engine();
        let key = engine.parse_public_key(SigningScheme::Regular, &dto.public_key)?;
        let alias = UserAlias::eth(&engine.address_of(&key));
        let registration = Registration::single(alias, SigningScheme::Regular, dto.public_key);
        let view = ctx.registry.register(ctx.ledger, registration).await?;
        to_data(&view)
    }
}

/// Registers `ton|{address}` from an ed25519 key.
pub struct RegisterTonUser;

#[async_trait]
impl ChainMethod for RegisterTonUser {
    type Dto = PublicKeyDto;

    async fn execute(
        &self,
        ctx: &mut ChainContext<'_, '_>,
        dto: PublicKeyDto,
    ) -> Result<Value, ChainError> {
        let engine = ctx.registry.engine();
        let key = engine.parse_public_key(SigningScheme::Ton, &dto.public_key)?;
        let alias = UserAlias::ton(&engine.address_of(&key));
        let registration = Registration::single(alias, SigningScheme::Ton, dto.public_key);
        let view = ctx.registry.register(ctx.ledger, registration).await?;
        to_data(&view)
    }
}

// =============================================================================
// KEY MANAGEMENT
// =============================================================================

/// Replaces the key that signed the request.
pub struct UpdatePublicKey;

#[async_trait]
impl ChainMethod for UpdatePublicKey {
    type Dto = PublicKeyDto;

    async fn execute(
        &self,
        ctx: &mut ChainContext<'_, '_>,
        dto: PublicKeyDto,
    ) -> Result<Value, ChainError> {
        let identity = ctx.identity()?;
        let signer = identity
            .signers
            .first()
            .ok_or_else(|| ChainError::internal("resolved identity without signers"))?;
        let view = ctx
            .registry
            .rotate_key(ctx.ledger, &identity.alias, &signer.public_key, &dto.public_key)
            .await?;
        to_data(&view)
    }
}

pub struct AddSigner;

#[async_trait]
impl ChainMethod for AddSigner {
    type Dto = PublicKeyDto;

    async fn execute(
        &self,
        ctx: &mut ChainContext<'_, '_>,
        dto: PublicKeyDto,
    ) -> Result<Value, ChainError> {
        let alias = &ctx.identity()?.alias;
        let view = ctx
            .registry
            .add_signer(ctx.ledger, alias, &dto.public_key)
            .await?;
        to_data(&view)
    }
}

pub struct RemoveSigner;

#[async_trait]
impl ChainMethod for RemoveSigner {
    type Dto = PublicKeyDto;

    async fn execute(
        &self,
        ctx: &mut ChainContext<'_, '_>,
        dto: PublicKeyDto,
    ) -> Result<Value, ChainError> {
        let alias = &ctx.identity()?.alias;
        let view = ctx
            .registry
            .remove_signer(ctx.ledger, alias, &dto.public_key)
            .await?;
        to_data(&view)
    }
}

// =============================================================================
// ROLES & QUORUM
// =============================================================================

pub struct UpdateUserRoles;

#[async_trait]
impl ChainMethod for UpdateUserRoles {
    type Dto = UpdateUserRolesDto;

    async fn execute(
        &self,
        ctx: &mut ChainContext<'_, '_>,
        dto: UpdateUserRolesDto,
    ) -> Result<Value, ChainError> {
        let view = ctx
            .registry
            .update_roles(ctx.ledger, &dto.user, dto.roles)
            .await?;
        to_data(&view)
    }
}

pub struct UpdateSignatureQuorum;

#[async_trait]
impl ChainMethod for UpdateSignatureQuorum {
    type Dto = UpdateQuorumDto;

    async fn execute(
        &self,
        ctx: &mut ChainContext<'_, '_>,
        dto: UpdateQuorumDto,
    ) -> Result<Value, ChainError> {
        let alias = &ctx.identity()?.alias;
        let view = ctx
            .registry
            .update_quorum(ctx.ledger, alias, dto.signature_quorum)
            .await?;
        to_data(&view)
    }
}

// =============================================================================
// QUERIES
// =============================================================================

pub struct GetPublicKey;

#[async_trait]
impl ChainMethod for GetPublicKey {
    type Dto = GetPublicKeyDto;

    async fn execute(
        &self,
        ctx: &mut ChainContext<'_, '_>,
        dto: GetPublicKeyDto,
    ) -> Result<Value, ChainError> {
        let alias = match (dto.user, ctx.identity) {
            (Some(user), _) => user,
            (None, Some(identity)) => identity.alias.clone(),
            (None, None) => return Err(ChainError::validation("user is required")),
        };
        let view = ctx.registry.account(ctx.ledger, &alias).await?;
        Ok(json!({
            "alias": view.alias,
            "publicKey": view.public_keys.first(),
            "publicKeys": view.public_keys,
            "signing": view.signing,
        }))
    }
}

pub struct GetMyProfile;

#[async_trait]
impl ChainMethod for GetMyProfile {
    type Dto = EmptyDto;

    async fn execute(&self, ctx: &mut ChainContext<'_, '_>, _dto: EmptyDto) -> Result<Value, ChainError> {
        let alias = &ctx.identity()?.alias;
        let view = ctx.registry.account(ctx.ledger, alias).await?;
        to_data(&view)
    }
}

/// Succeeds for any request that passes identity resolution and policy.
pub struct VerifySignature;

#[async_trait]
impl ChainMethod for VerifySignature {
    type Dto = EmptyDto;

    async fn execute(&self, ctx: &mut ChainContext<'_, '_>, _dto: EmptyDto) -> Result<Value, ChainError> {
        let identity = ctx.identity()?;
        Ok(json!({
            "alias": identity.alias,
            "signing": identity.signing,
            "signedBy": identity.signed_by(),
        }))
    }
}

pub struct GetContractVersion;

#[async_trait]
impl ChainMethod for GetContractVersion {
    type Dto = EmptyDto;

    async fn execute(&self, _ctx: &mut ChainContext<'_, '_>, _dto: EmptyDto) -> Result<Value, ChainError> {
        Ok(json!(env!("CARGO_PKG_VERSION")))
    }
}
