//! HTTP transport tests against a one-shot local server

#![cfg(feature = "http")]

use ethapi::{EthApiError, EthClient, HttpConfig, HttpTransport, Transport};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Captured request: lowercased head and raw body
struct Captured {
    head: String,
    body: String,
}

impl Captured {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Serve exactly one request with `status` and `body`, returning what was received
async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let captured = read_request(&mut socket).await;

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        captured
    });

    (url, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before request was complete");
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = find_header_end(&buf) else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .map(|v| v.trim().parse::<usize>().unwrap())
            .unwrap_or(0);

        let body_start = header_end + 4;
        if buf.len() >= body_start + content_length {
            let body = String::from_utf8_lossy(&buf[body_start..body_start + content_length]);
            return Captured {
                head,
                body: body.into_owned(),
            };
        }
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

#[tokio::test]
async fn test_request_envelope() {
    let (url, server) =
        serve_once("200 OK", r#"{"jsonrpc":"2.0","id":1,"result":"0x4"}"#.to_string()).await;
    let client = EthClient::http(&url).unwrap();

    assert_eq!(client.block_number().await.unwrap(), 4);

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("post / http/1.1"));
    assert!(captured.head.contains("content-type: application/json"));

    let request = captured.json();
    assert_eq!(request["jsonrpc"], "2.0");
    assert_eq!(request["method"], "eth_blockNumber");
    assert_eq!(request["params"], json!([]));
    assert!(request["id"].is_u64());
}

#[tokio::test]
async fn test_request_params_are_positional() {
    let (url, server) =
        serve_once("200 OK", r#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#.to_string()).await;
    let client = EthClient::http(&url).unwrap();

    let nonce = client
        .get_transaction_count("0xabc", ethapi::BlockId::Number(16))
        .await
        .unwrap();
    assert_eq!(nonce, 1);

    let request = server.await.unwrap().json();
    assert_eq!(request["method"], "eth_getTransactionCount");
    assert_eq!(request["params"], json!(["0xabc", "0x10"]));
}

#[tokio::test]
async fn test_rpc_error_body() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"header not found"}}"#
            .to_string(),
    )
    .await;
    let client = EthClient::http(&url).unwrap();

    let err = client.get_balance("0xabc", ethapi::BlockId::Latest).await.unwrap_err();
    assert_eq!(err.to_string(), "header not found");
    assert_eq!(err.rpc_code(), Some(-32000));
    server.await.unwrap();
}

#[tokio::test]
async fn test_rpc_error_body_on_http_error_status() {
    let (url, server) = serve_once(
        "500 Internal Server Error",
        r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32603,"message":"internal"}}"#.to_string(),
    )
    .await;
    let client = EthClient::http(&url).unwrap();

    let err = client.coinbase().await.unwrap_err();
    assert!(err.is_rpc());
    assert_eq!(err.to_string(), "internal");
    server.await.unwrap();
}

#[tokio::test]
async fn test_http_error_status_without_rpc_body() {
    let (url, server) = serve_once("503 Service Unavailable", "upstream down".to_string()).await;
    let client = EthClient::http(&url).unwrap();

    let err = client.block_number().await.unwrap_err();
    match err {
        EthApiError::Transport(message) => {
            assert!(message.contains("503"));
            assert!(message.contains("upstream down"));
        }
        other => panic!("Expected Transport error, got {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_malformed_body_is_transport_error() {
    let (url, server) = serve_once("200 OK", "not json".to_string()).await;
    let client = EthClient::http(&url).unwrap();

    assert!(matches!(
        client.block_number().await,
        Err(EthApiError::Transport(_))
    ));
    server.await.unwrap();
}

#[tokio::test]
async fn test_null_result_is_none() {
    let (url, server) =
        serve_once("200 OK", r#"{"jsonrpc":"2.0","id":1,"result":null}"#.to_string()).await;
    let client = EthClient::http(&url).unwrap();

    let receipt = client.get_transaction_receipt("0x01").await.unwrap();
    assert!(receipt.is_none());
    server.await.unwrap();
}

#[tokio::test]
async fn test_missing_result_is_not_none() {
    let body = r#"{"jsonrpc":"2.0","id":1}"#;

    let (url, server) = serve_once("200 OK", body.to_string()).await;
    let client = EthClient::http(&url).unwrap();
    assert!(matches!(
        client.get_transaction_receipt("0xabc").await,
        Err(EthApiError::Decode(_))
    ));
    server.await.unwrap();

    let (url, server) = serve_once("200 OK", body.to_string()).await;
    let client = EthClient::http(&url).unwrap();
    assert!(matches!(
        client.get_block_by_hash("0xabc", false).await,
        Err(EthApiError::Decode(_))
    ));
    server.await.unwrap();
}

#[tokio::test]
async fn test_bearer_token_header() {
    let (url, server) =
        serve_once("200 OK", r#"{"jsonrpc":"2.0","id":1,"result":true}"#.to_string()).await;
    let config = HttpConfig {
        bearer_token: Some("s3cret".to_string()),
        ..HttpConfig::new(&url)
    };
    let transport = HttpTransport::from_config(&config).unwrap();
    assert_eq!(transport.url(), url);

    let response = transport.call("eth_mining", vec![]).await.unwrap();
    assert_eq!(response.result, Some(json!(true)));

    let captured = server.await.unwrap();
    assert!(captured.head.contains("authorization: bearer s3cret"));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = EthClient::http(&url).unwrap();
    let err = client.block_number().await.unwrap_err();
    assert!(matches!(err, EthApiError::Transport(_)));
    assert!(!err.is_rpc());
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    // Accept and hold the connection without answering
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
        drop(socket);
    });

    let config = HttpConfig {
        timeout_ms: 200,
        ..HttpConfig::new(&url)
    };
    let client = EthClient::from_config(&config).unwrap();
    let err = client.block_number().await.unwrap_err();
    assert!(matches!(err, EthApiError::Transport(_)));
    server.abort();
}
