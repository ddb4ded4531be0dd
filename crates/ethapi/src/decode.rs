//! Result decoding
//!
//! Turns the dynamic `result` of a response into the type a method
//! declares. Shape mismatches become [`EthApiError::Decode`] naming the
//! method, never a panic.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{EthApiError, Result};
use crate::quantity;

/// Decode `value` into any deserializable type
pub fn decode_result<T: DeserializeOwned>(method: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        tracing::warn!(%method, "unexpected result shape: {}", e);
        EthApiError::Decode(format!("{}: {}", method, e))
    })
}

/// Decode a string result
pub fn decode_string(method: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(unexpected(method, "a string", &other)),
    }
}

/// Decode a boolean result
pub fn decode_bool(method: &str, value: Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(unexpected(method, "a boolean", &other)),
    }
}

/// Decode a hex quantity result into an `i64`
pub fn decode_quantity(method: &str, value: Value) -> Result<i64> {
    match value {
        Value::String(s) => quantity::parse_quantity(&s),
        other => Err(unexpected(method, "a quantity string", &other)),
    }
}

fn unexpected(method: &str, expected: &str, got: &Value) -> EthApiError {
    tracing::warn!(%method, "unexpected result shape: {}", got);
    EthApiError::Decode(format!("{}: expected {}, got {}", method, expected, kind(got)))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
