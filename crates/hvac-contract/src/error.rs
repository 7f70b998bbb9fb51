//! Error types for contract invocations.

use hvac_state::StateError;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;

/// Errors that fail a single invocation.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Incorrect number of arguments. Expecting {expected}")]
    ArgumentCount { expected: usize, got: usize },

    #[error("malformed numeric argument for {field}: {value:?}")]
    MalformedNumber {
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("invalid function name: {0}")]
    UnknownFunction(String),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StateError),
}

/// Coarse error category carried on error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ArgumentCount,
    MalformedNumericArgument,
    UnknownFunction,
    Serialization,
    StoreAccess,
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContractError::ArgumentCount { .. } => ErrorKind::ArgumentCount,
            ContractError::MalformedNumber { .. } => ErrorKind::MalformedNumericArgument,
            ContractError::UnknownFunction(_) => ErrorKind::UnknownFunction,
            ContractError::Serialize(_) => ErrorKind::Serialization,
            ContractError::Store(_) => ErrorKind::StoreAccess,
        }
    }
}
