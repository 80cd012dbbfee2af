//! # Contract Definition
//!
//! A [`Contract`] is the immutable table `method name -> (policy, handler)`.
//! Every policy is resolved against the [`AuthConfig`] and validated once,
//! in [`ContractBuilder::build`]; a contract that builds can never hit a
//! policy definition error at call time.

pub mod handler;

use handler::MethodHandler;
use kc_04_authorization::{AuthConfig, DefinitionError, MethodPolicy, PolicyDecl};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Policy and handler of one method.
#[derive(Clone)]
pub struct MethodEntry {
    policy: MethodPolicy,
    handler: Arc<dyn MethodHandler>,
}

impl MethodEntry {
    pub fn policy(&self) -> &MethodPolicy {
        &self.policy
    }

    pub fn handler(&self) -> &dyn MethodHandler {
        self.handler.as_ref()
    }
}

impl std::fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodEntry")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Immutable method table.
#[derive(Debug, Clone)]
pub struct Contract {
    name: String,
    methods: BTreeMap<String, MethodEntry>,
}

impl Contract {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self, name: &str) -> Option<&MethodEntry> {
        self.methods.get(name)
    }

    /// Method names in sorted order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Collects method declarations, then validates them all at once.
pub struct ContractBuilder<'c> {
    name: String,
    config: &'c AuthConfig,
    declarations: Vec<(String, PolicyDecl, Arc<dyn MethodHandler>)>,
}

impl<'c> ContractBuilder<'c> {
    pub fn new(name: impl Into<String>, config: &'c AuthConfig) -> Self {
        Self {
            name: name.into(),
            config,
            declarations: Vec::new(),
        }
    }

    /// Declare a method.
    #[must_use]
    pub fn method(
        mut self,
        name: impl Into<String>,
        policy: PolicyDecl,
        handler: impl MethodHandler + 'static,
    ) -> Self {
        let handler: Arc<dyn MethodHandler> = Arc::new(handler);
        self.declarations.push((name.into(), policy, handler));
        self
    }

    /// Resolve and validate every policy.
    pub fn build(self) -> Result<Contract, DefinitionError> {
        let mut methods = BTreeMap::new();
        for (name, decl, handler) in self.declarations {
            if methods.contains_key(&name) {
                return Err(DefinitionError::DuplicateMethod { method: name });
            }
            let policy = decl.resolve(&name, self.config)?;
            methods.insert(name, MethodEntry { policy, handler });
        }

        info!(
            contract = %self.name,
            methods = methods.len(),
            rbac = self.config.use_rbac,
            "Contract built"
        );
        Ok(Contract {
            name: self.name,
            methods,
        })
    }
}
