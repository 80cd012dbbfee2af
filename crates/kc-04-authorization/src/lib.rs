//! # Authorization Policy (KC-04)
//!
//! Organization allow-lists, role allow-lists, inter-chaincode service calls
//! and signature quorum, evaluated against a resolved caller.
//!
//! ## Modes
//!
//! | `USE_RBAC` | Registrar methods | Curator methods | Other methods |
//! |------------|-------------------|-----------------|---------------|
//! | `false` | registrar orgs | curator org | as declared |
//! | `true` | `REGISTRAR` role + signature | `CURATOR` role + signature | `SUBMIT` / `EVALUATE` role |

pub mod authorize;
pub mod config;
pub mod errors;
pub mod policy;

pub use authorize::{authorize, check_signature_shape, Caller, CallerKind};
pub use config::AuthConfig;
pub use errors::{AuthorizationError, DefinitionError};
pub use policy::{MethodKind, MethodPolicy, PolicyDecl, SignatureArity};
