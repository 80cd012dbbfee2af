//! # Public-Key Contract
//!
//! The identity methods every chaincode exposes.
//!
//! | Method | Kind | Policy |
//! |--------|------|--------|
//! | `RegisterUser`, `RegisterEthUser`, `RegisterTonUser` | submit | registrar only |
//! | `UpdatePublicKey` | submit | exactly one signature, `uniqueKey` |
//! | `UpdateUserRoles` | submit | curator only, `uniqueKey` |
//! | `UpdateSignatureQuorum`, `AddSigner`, `RemoveSigner` | submit | signed, account quorum |
//! | `GetPublicKey`, `GetContractVersion` | evaluate | public |
//! | `GetMyProfile`, `VerifySignature` | evaluate | signed |

pub mod dto;
pub mod methods;

use crate::contract::{Contract, ContractBuilder};
use kc_04_authorization::{AuthConfig, DefinitionError, PolicyDecl};
use methods::*;

/// Name of the standalone public-key contract.
pub const PUBLIC_KEY_CONTRACT: &str = "PublicKeyContract";

/// Add the public-key methods to a contract under construction.
pub fn with_public_key_methods(builder: ContractBuilder<'_>) -> ContractBuilder<'_> {
    builder
        .method("RegisterUser", PolicyDecl::submit().registrar_only(), RegisterUser)
        .method("RegisterEthUser", PolicyDecl::submit().registrar_only(), RegisterEthUser)
        .method("RegisterTonUser", PolicyDecl::submit().registrar_only(), RegisterTonUser)
        .method(
            "UpdatePublicKey",
            PolicyDecl::submit().exactly_one_signature().unique_key(),
            UpdatePublicKey,
        )
        .method(
            "UpdateUserRoles",
            PolicyDecl::submit().curator_only().unique_key(),
            UpdateUserRoles,
        )
        .method(
            "UpdateSignatureQuorum",
            PolicyDecl::submit().require_signature(),
            UpdateSignatureQuorum,
        )
        .method("AddSigner", PolicyDecl::submit().require_signature(), AddSigner)
        .method("RemoveSigner", PolicyDecl::submit().require_signature(), RemoveSigner)
        .method("GetPublicKey", PolicyDecl::evaluate(), GetPublicKey)
        .method("GetMyProfile", PolicyDecl::evaluate().require_signature(), GetMyProfile)
        .method(
            "VerifySignature",
            PolicyDecl::evaluate().require_signature(),
            VerifySignature,
        )
        .method("GetContractVersion", PolicyDecl::evaluate(), GetContractVersion)
}

/// The public-key contract on its own.
pub fn public_key_contract(config: &AuthConfig) -> Result<Contract, DefinitionError> {
    with_public_key_methods(ContractBuilder::new(PUBLIC_KEY_CONTRACT, config)).build()
}
