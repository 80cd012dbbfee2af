//! # Method Handlers
//!
//! Contract authors implement [`ChainMethod`] with a typed payload. The
//! blanket impl turns every `ChainMethod` into an object-safe
//! [`MethodHandler`] so that methods with different payload types share one
//! table.
//!
//! Parsing happens before identity resolution, execution after
//! authorization; the parsed payload travels between the two as
//! [`ParsedPayload`].

use crate::domain::context::ChainContext;
use crate::domain::errors::DispatchError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared_types::ChainError;
use std::any::Any;

/// Semantic payload checks run after deserialization.
pub trait Validate {
    fn validate(&self) -> Result<(), ChainError> {
        Ok(())
    }
}

/// A contract method with a typed payload.
#[async_trait]
pub trait ChainMethod: Send + Sync + 'static {
    type Dto: DeserializeOwned + Validate + Send + 'static;

    async fn execute(
        &self,
        ctx: &mut ChainContext<'_, '_>,
        dto: Self::Dto,
    ) -> Result<Value, ChainError>;
}

/// Payload after parsing, before execution.
pub type ParsedPayload = Box<dyn Any + Send>;

/// Object-safe view of a [`ChainMethod`].
#[async_trait]
pub trait MethodHandler: Send + Sync {
    /// Deserialize and validate the request. Failures are `VALIDATION_FAILED`.
    fn parse(&self, request: &Value) -> Result<ParsedPayload, ChainError>;

    /// Execute with a payload produced by [`parse`](Self::parse).
    async fn call(
        &self,
        ctx: &mut ChainContext<'_, '_>,
        payload: ParsedPayload,
    ) -> Result<Value, ChainError>;
}

#[async_trait]
impl<M: ChainMethod> MethodHandler for M {
    fn parse(&self, request: &Value) -> Result<ParsedPayload, ChainError> {
        let dto: M::Dto = serde_json::from_value(request.clone())?;
        dto.validate()?;
        Ok(Box::new(dto))
    }

    async fn call(
        &self,
        ctx: &mut ChainContext<'_, '_>,
        payload: ParsedPayload,
    ) -> Result<Value, ChainError> {
        let dto = payload
            .downcast::<M::Dto>()
            .map_err(|_| DispatchError::PayloadMismatch(ctx.method().to_string()))?;
        self.execute(ctx, *dto).await
    }
}
