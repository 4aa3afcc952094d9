//! Scripted JSON-RPC node for integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What the mock node answers to one request.
#[allow(dead_code)]
pub enum Reply {
    /// `200 OK` with a JSON body.
    Json(Value),
    /// Any status with a raw body.
    Status(u16, String),
    /// Never answer.
    Hang,
}

/// One request as the node saw it.
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    /// Request line and headers, lowercased.
    pub head: String,
    pub body: Value,
}

#[allow(dead_code)]
impl RecordedRequest {
    pub fn method(&self) -> &str {
        self.body["method"].as_str().unwrap_or_default()
    }
}

pub struct MockNode {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl MockNode {
    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a node on an ephemeral port. `handler` picks the reply for each
/// parsed request body.
pub async fn start_mock_node<F>(handler: F) -> MockNode
where
    F: Fn(&Value) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let requests = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        serve(socket, handler.as_ref(), &recorded).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockNode { url, requests }
}

async fn serve<F>(mut socket: TcpStream, handler: &F, recorded: &Mutex<Vec<RecordedRequest>>)
where
    F: Fn(&Value) -> Reply,
{
    let Some((head, body)) = read_request(&mut socket).await else {
        return;
    };
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let reply = handler(&body);
    recorded
        .lock()
        .unwrap()
        .push(RecordedRequest { head, body });

    let (status, body) = match reply {
        Reply::Json(value) => (200, value.to_string()),
        Reply::Status(status, body) => (status, body),
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            return;
        }
    };

    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Read one HTTP request: the lowercased head and the body.
async fn read_request(socket: &mut TcpStream) -> Option<(String, Vec<u8>)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some((head, buf[head_end..].to_vec()))
}

// =============================================================================
// Canned node answers
// =============================================================================

/// Block hash of `[9u8; 32]`, base58.
#[allow(dead_code)]
pub const BLOCK_HASH: &str = "cGfHiC6Kgg3FpFZvgwGcswsCRtp4aBP2fzuXRQPizuN";

/// `view_access_key` result with the given nonce.
#[allow(dead_code)]
pub fn access_key_result(nonce: u64) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": "dontcare",
        "result": {
            "nonce": nonce,
            "permission": "FullAccess",
            "block_height": 123,
            "block_hash": BLOCK_HASH
        }
    })
}

/// `broadcast_tx_commit` result whose first receipt succeeded.
#[allow(dead_code)]
pub fn broadcast_success() -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": "dontcare",
        "result": {
            "status": { "SuccessValue": "" },
            "transaction": { "hash": BLOCK_HASH },
            "transaction_outcome": { "id": BLOCK_HASH, "outcome": { "logs": [] } },
            "receipts_outcome": [
                { "id": BLOCK_HASH, "outcome": { "logs": ["submitted"], "status": { "SuccessValue": "" } } }
            ]
        }
    })
}

/// `broadcast_tx_commit` result whose first receipt failed.
#[allow(dead_code)]
pub fn broadcast_failure(failure: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": "dontcare",
        "result": {
            "status": { "Failure": failure.clone() },
            "receipts_outcome": [
                { "outcome": { "logs": [], "status": { "Failure": failure } } }
            ]
        }
    })
}

/// Answer `query` with `nonce` and `broadcast_tx_commit` with `broadcast`.
#[allow(dead_code)]
pub fn node(nonce: u64, broadcast: Value) -> impl Fn(&Value) -> Reply + Send + Sync + 'static {
    move |request| match request["method"].as_str() {
        Some("query") => Reply::Json(access_key_result(nonce)),
        Some("broadcast_tx_commit") => Reply::Json(broadcast.clone()),
        _ => Reply::Status(404, "unknown method".to_string()),
    }
}

/// Install a test subscriber once so `RUST_LOG` shows crate logs.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
