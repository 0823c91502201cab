//! Shared utilities for integration testing.

use serde_json::{json, Value};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One request as seen by the mock endpoint.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    /// Header block, lowercased.
    pub headers: String,
    pub body: Value,
}

#[allow(dead_code)]
impl RecordedRequest {
    pub fn method(&self) -> &str {
        self.body["method"].as_str().unwrap_or_default()
    }

    pub fn params(&self) -> &Value {
        &self.body["params"]
    }

    pub fn address(&self) -> &str {
        self.body["params"][0].as_str().unwrap_or_default()
    }
}

/// What the mock endpoint should answer.
#[allow(dead_code)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

#[allow(dead_code)]
impl MockReply {
    pub fn result(result: Value) -> Self {
        Self::json(json!({"jsonrpc": "2.0", "id": "mock", "result": result}))
    }

    pub fn error(code: i64, message: &str) -> Self {
        Self::json(json!({
            "jsonrpc": "2.0",
            "id": "mock",
            "error": {"code": code, "message": message}
        }))
    }

    pub fn json(body: Value) -> Self {
        Self::raw(200, body.to_string())
    }

    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A running mock JSON-RPC endpoint.
#[allow(dead_code)]
pub struct MockRpc {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl MockRpc {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Start a programmable JSON-RPC endpoint on an ephemeral port.
///
/// The handler sees each request body and picks status, body and delay.
pub async fn start_rpc_backend<F, Fut>(handler: F) -> MockRpc
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MockReply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let handler = handler.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        recorded.lock().unwrap().push(request.clone());

                        let reply = handler(request.body).await;
                        if !reply.delay.is_zero() {
                            tokio::time::sleep(reply.delay).await;
                        }

                        let status_text = match reply.status {
                            200 => "200 OK",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            reply.body.len(),
                            reply.body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockRpc { addr, requests }
}

/// Start an endpoint that answers each method with a fixed reply.
#[allow(dead_code)]
pub async fn start_method_backend(balance: Value, history: Value) -> MockRpc {
    let balance = Arc::new(balance);
    let history = Arc::new(history);
    start_rpc_backend(move |body| {
        let balance = balance.clone();
        let history = history.clone();
        async move {
            match body["method"].as_str() {
                Some("getBalance") => MockReply::json((*balance).clone()),
                Some("getSignaturesForAddress") => MockReply::json((*history).clone()),
                _ => MockReply::error(-32601, "Method not found"),
            }
        }
    })
    .await
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// `n` signature entries, most recent first.
#[allow(dead_code)]
pub fn signatures(n: usize) -> Value {
    let entries: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "signature": format!("sig{}", i),
                "slot": 1000 - i as u64,
                "err": null,
                "memo": null,
                "blockTime": 1_700_000_000 - i as i64,
                "confirmationStatus": "finalized"
            })
        })
        .collect();
    Value::Array(entries)
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = serde_json::from_slice(&buf[header_end..]).unwrap_or(Value::Null);
    Some(RecordedRequest { headers, body })
}

/// Success envelope around `result`.
#[allow(dead_code)]
pub fn ok(result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": "mock", "result": result})
}

/// Error envelope.
#[allow(dead_code)]
pub fn rpc_error(code: i64, message: &str) -> Value {
    json!({"jsonrpc": "2.0", "id": "mock", "error": {"code": code, "message": message}})
}
