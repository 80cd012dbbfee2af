//! # Wrapped Response
//!
//! Every invocation ends in exactly one of two shapes:
//!
//! - `{"Status": 1, "Data": ...}`
//! - `{"Status": 0, "ErrorCode": 403, "ErrorKey": "MISSING_ROLE", "Message": "...", "ErrorPayload": ...}`

use crate::errors::{ChainError, ErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Terminal status of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ResponseStatus {
    Error,
    Success,
}

impl From<ResponseStatus> for u8 {
    fn from(status: ResponseStatus) -> Self {
        match status {
            ResponseStatus::Error => 0,
            ResponseStatus::Success => 1,
        }
    }
}

impl TryFrom<u8> for ResponseStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        match value {
            0 => Ok(ResponseStatus::Error),
            1 => Ok(ResponseStatus::Success),
            other => Err(format!("invalid response status: {other}")),
        }
    }
}

/// Wrapped result of an invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChainResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_key: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_payload: Option<Value>,
}

impl ChainResponse {
    /// Successful result.
    pub fn success(data: Value) -> Self {
        Self {
            status: ResponseStatus::Success,
            data: Some(data),
            error_code: None,
            error_key: None,
            message: None,
            error_payload: None,
        }
    }

    /// Failed result.
    pub fn error(err: ChainError) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: None,
            error_code: Some(err.code()),
            error_key: Some(err.kind),
            message: Some(err.message),
            error_payload: err.payload,
        }
    }

    /// Whether this is a success.
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// Error key, if failed.
    pub fn error_key(&self) -> Option<&'static str> {
        self.error_key.map(ErrorKind::key)
    }
}

impl From<Result<Value, ChainError>> for ChainResponse {
    fn from(result: Result<Value, ChainError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::error(err),
        }
    }
}
