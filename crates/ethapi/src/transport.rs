//! Transport layer for RPC communication

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{EthApiError, Result};

/// Error object of a JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    /// Error code
    pub code: i64,
    /// Error message
    pub message: String,
    /// Optional additional data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Body of a JSON-RPC response
///
/// `result` is only meaningful when `error` is absent. A missing `result`
/// is `None`; an explicit `null` is `Some(Value::Null)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Result value
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,
    /// Error object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    /// Successful response carrying `result`
    pub fn success(result: Value) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    /// Error response
    pub fn error(code: i64, message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(RpcErrorObject {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Take the result, or fail with the node's error object
    ///
    /// A response with neither field is a `Decode` error.
    pub fn into_result(self) -> Result<Value> {
        match (self.error, self.result) {
            (Some(error), _) => Err(EthApiError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            }),
            (None, Some(result)) => Ok(result),
            (None, None) => Err(EthApiError::Decode(
                "response has neither result nor error".to_string(),
            )),
        }
    }
}

// Only called when the key is present, so `null` stays `Some(Value::Null)`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Transport trait for RPC communication (object-safe)
///
/// Implementations own the wire: envelope, ids, timeouts. A response that
/// carries an error object is still `Ok`; only failures to obtain a
/// response are `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request with positional params
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<RpcResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<RpcResponse> {
        (**self).call(method, params).await
    }
}

/// Canned outcome for one method in [`MockTransport`]
#[derive(Debug, Clone)]
enum MockReply {
    Response(RpcResponse),
    TransportError(String),
}

/// Mock transport for testing
///
/// Answers from per-method canned replies, falling back to defaults for
/// common methods, and records every call it receives.
#[derive(Clone)]
pub struct MockTransport {
    replies: Arc<Mutex<HashMap<String, MockReply>>>,
    defaults: Arc<HashMap<String, Value>>,
    calls: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        let mut defaults = HashMap::new();

        defaults.insert("eth_protocolVersion".to_string(), Value::String("0x41".to_string()));
        defaults.insert("eth_syncing".to_string(), Value::Bool(false));
        defaults.insert(
            "eth_coinbase".to_string(),
            Value::String("0x407d73d8a49eeb85d32cf465507dd71d507100c1".to_string()),
        );
        defaults.insert("eth_mining".to_string(), Value::Bool(false));
        defaults.insert("eth_hashrate".to_string(), Value::String("0x0".to_string()));
        defaults.insert("eth_gasPrice".to_string(), Value::String("0x3b9aca00".to_string())); // 1 gwei
        defaults.insert("eth_accounts".to_string(), Value::Array(vec![]));
        defaults.insert("eth_blockNumber".to_string(), Value::String("0x100".to_string())); // Block 256
        defaults.insert("eth_getBalance".to_string(), Value::String("0xde0b6b3a7640000".to_string())); // 1 ETH
        defaults.insert("eth_getTransactionCount".to_string(), Value::String("0x0".to_string()));
        defaults.insert("eth_estimateGas".to_string(), Value::String("0x5208".to_string())); // 21000
        defaults.insert(
            "eth_sendRawTransaction".to_string(),
            Value::String(
                "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b".to_string(),
            ),
        );
        defaults.insert("eth_call".to_string(), Value::String("0x".to_string()));
        defaults.insert("eth_getCode".to_string(), Value::String("0x".to_string()));

        Self {
            replies: Arc::new(Mutex::new(HashMap::new())),
            defaults: Arc::new(defaults),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer `method` with a successful result
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (only possible if another thread panicked while holding the lock).
    pub fn set_response(&self, method: &str, result: Value) {
        self.set_reply(method, MockReply::Response(RpcResponse::success(result)));
    }

    /// Answer `method` with a JSON-RPC error object
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_error(&self, method: &str, code: i64, message: &str) {
        self.set_reply(method, MockReply::Response(RpcResponse::error(code, message)));
    }

    /// Fail `method` before any response is produced
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_transport_error(&self, method: &str, message: &str) {
        self.set_reply(method, MockReply::TransportError(message.to_string()));
    }

    fn set_reply(&self, method: &str, reply: MockReply) {
        // A poisoned lock means a test thread already panicked.
        self.replies
            .lock()
            .expect("MockTransport mutex poisoned")
            .insert(method.to_string(), reply);
    }

    /// Clear custom replies
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn clear_responses(&self) {
        self.replies
            .lock()
            .expect("MockTransport mutex poisoned")
            .clear();
    }

    /// Calls received so far, in order
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls
            .lock()
            .expect("MockTransport mutex poisoned")
            .clone()
    }

    /// Params of the most recent call to `method`
    pub fn last_params(&self, method: &str) -> Option<Vec<Value>> {
        self.calls()
            .into_iter()
            .rev()
            .find(|(m, _)| m == method)
            .map(|(_, params)| params)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<RpcResponse> {
        self.calls
            .lock()
            .map_err(|_| EthApiError::Transport("MockTransport mutex poisoned".to_string()))?
            .push((method.to_string(), params));

        // Check custom replies first
        let custom = self
            .replies
            .lock()
            .map_err(|_| EthApiError::Transport("MockTransport mutex poisoned".to_string()))?
            .get(method)
            .cloned();

        match custom {
            Some(MockReply::Response(response)) => return Ok(response),
            Some(MockReply::TransportError(message)) => {
                return Err(EthApiError::Transport(message))
            }
            None => {}
        }

        // Fall back to defaults
        if let Some(result) = self.defaults.get(method) {
            return Ok(RpcResponse::success(result.clone()));
        }

        Ok(RpcResponse::error(
            -32601,
            format!("the method {} does not exist/is not available", method),
        ))
    }
}

/// Configuration for [`HttpTransport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Node endpoint URL
    pub url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Bearer token sent as `Authorization` header
    #[serde(default)]
    pub bearer_token: Option<String>,
}

/// Default request timeout
pub fn default_timeout_ms() -> u64 {
    30_000
}

impl HttpConfig {
    /// Config for `url` with default timeout and no auth
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            timeout_ms: default_timeout_ms(),
            bearer_token: None,
        }
    }
}

/// HTTP transport for real RPC communication
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    bearer_token: Option<String>,
    request_id: std::sync::atomic::AtomicU64,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport with default settings
    pub fn new(url: &str) -> Result<Self> {
        Self::from_config(&HttpConfig::new(url))
    }

    /// Create a new HTTP transport from config
    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| EthApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            bearer_token: config.bearer_token.clone(),
            request_id: std::sync::atomic::AtomicU64::new(1),
        })
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_id(&self) -> u64 {
        self.request_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<RpcResponse> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": self.next_id(),
            "method": method,
            "params": params,
        });

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| EthApiError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EthApiError::Transport(e.to_string()))?;

        let parsed = serde_json::from_str::<RpcResponse>(&body);

        // Some proxies pair 4xx/5xx with a JSON-RPC error body; keep it.
        if !status.is_success() {
            return match parsed {
                Ok(parsed) if parsed.error.is_some() => Ok(parsed),
                _ => Err(EthApiError::Transport(format!("HTTP {}: {}", status, body))),
            };
        }

        parsed.map_err(|e| {
            tracing::warn!(%method, "failed to parse rpc response: {}", body);
            EthApiError::Transport(format!("invalid JSON-RPC response: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_default_responses() {
        let transport = MockTransport::new();

        let response = transport.call("eth_blockNumber", vec![]).await.unwrap();
        assert_eq!(response.result, Some(Value::String("0x100".to_string())));
        assert!(response.error.is_none());

        let response = transport.call("eth_gasPrice", vec![]).await.unwrap();
        assert_eq!(response.result, Some(Value::String("0x3b9aca00".to_string())));
    }

    #[tokio::test]
    async fn test_mock_transport_custom_response() {
        let transport = MockTransport::new();
        transport.set_response("eth_blockNumber", Value::String("0x5".to_string()));

        let response = transport.call("eth_blockNumber", vec![]).await.unwrap();
        assert_eq!(response.result, Some(Value::String("0x5".to_string())));

        transport.clear_responses();
        let response = transport.call("eth_blockNumber", vec![]).await.unwrap();
        assert_eq!(response.result, Some(Value::String("0x100".to_string())));
    }

    #[tokio::test]
    async fn test_mock_transport_unknown_method() {
        let transport = MockTransport::new();
        let response = transport.call("unknown_method", vec![]).await.unwrap();
        assert_eq!(response.error.as_ref().map(|e| e.code), Some(-32601));
        assert!(response.into_result().is_err());
    }

    #[tokio::test]
    async fn test_mock_transport_records_calls() {
        let transport = MockTransport::new();
        transport
            .call("eth_getBalance", vec![Value::from("0xabc"), Value::from("latest")])
            .await
            .unwrap();

        assert_eq!(transport.calls().len(), 1);
        assert_eq!(
            transport.last_params("eth_getBalance").unwrap(),
            vec![Value::from("0xabc"), Value::from("latest")]
        );
        assert!(transport.last_params("eth_call").is_none());
    }

    #[tokio::test]
    async fn test_mock_transport_error() {
        let transport = MockTransport::new();
        transport.set_transport_error("eth_blockNumber", "connection reset");
        let err = transport.call("eth_blockNumber", vec![]).await.unwrap_err();
        assert!(matches!(err, EthApiError::Transport(ref m) if m == "connection reset"));
    }

    #[test]
    fn test_response_into_result() {
        let ok = RpcResponse::success(Value::Bool(true));
        assert_eq!(ok.into_result().unwrap(), Value::Bool(true));

        let err = RpcResponse::error(-32000, "x").into_result().unwrap_err();
        assert_eq!(err.to_string(), "x");
        assert_eq!(err.rpc_code(), Some(-32000));
    }

    #[test]
    fn test_response_parses_wire_shapes() {
        let ok: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x4"}"#).unwrap();
        assert_eq!(ok.result, Some(Value::String("0x4".to_string())));

        let null: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert_eq!(null.result, Some(Value::Null));
        assert_eq!(null.clone().into_result().unwrap(), Value::Null);
        assert!(null.error.is_none());

        let err: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"x","data":"0x08c3"}}"#,
        )
        .unwrap();
        let err = err.error.unwrap();
        assert_eq!(err.code, -32000);
        assert_eq!(err.message, "x");
        assert_eq!(err.data, Some(Value::String("0x08c3".to_string())));
    }

    #[test]
    fn test_response_without_result_or_error_is_decode_error() {
        let empty: RpcResponse = serde_json::from_str(r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert!(empty.result.is_none());
        assert!(empty.error.is_none());

        let err = empty.into_result().unwrap_err();
        assert!(matches!(err, EthApiError::Decode(_)));
        assert!(!err.is_rpc());
    }

    #[test]
    fn test_http_config_defaults() {
        let config: HttpConfig = serde_json::from_str(r#"{"url":"http://localhost:8545"}"#).unwrap();
        assert_eq!(config.timeout_ms, 30_000);
        assert!(config.bearer_token.is_none());
        assert_eq!(config, HttpConfig::new("http://localhost:8545"));
    }
}
