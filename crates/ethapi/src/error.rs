//! Error types

use serde_json::Value;
use thiserror::Error;

/// Error returned by every binding operation
#[derive(Debug, Error)]
pub enum EthApiError {
    /// Transport/network error, passed through from the transport unchanged
    #[error("Transport error: {0}")]
    Transport(String),

    /// Error object returned by the node
    #[error("{message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
        /// Optional additional data
        data: Option<Value>,
    },

    /// Result did not have the shape the method declares
    #[error("Decode error: {0}")]
    Decode(String),

    /// Malformed hex quantity
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Request parameters could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Method is not supported by this binding
    #[error("Unsupported method: {0}")]
    Unsupported(String),
}

impl EthApiError {
    /// Returns true if the node answered with an error object
    pub fn is_rpc(&self) -> bool {
        matches!(self, EthApiError::Rpc { .. })
    }

    /// The JSON-RPC error code, if this is an RPC error
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            EthApiError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EthApiError {
    fn from(e: serde_json::Error) -> Self {
        EthApiError::Serialization(e.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, EthApiError>;
