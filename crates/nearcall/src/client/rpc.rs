//! Low-level JSON-RPC client for NEAR.
//!
//! Every call is a single HTTP POST. Nothing is retried: a failed call
//! surfaces immediately and the caller decides whether to run again.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::config::NetworkConfig;
use super::nonce::{NonceFuture, NonceSource, ResolvedNonce};
use super::outcome::{BroadcastOutcome, interpret_broadcast, rpc_error_from_value};
use crate::error::{EncodingError, Error};
use crate::types::{AccessKeyView, AccountId, PublicKey};

const ACCEPT_VALUE: &str = "application/json, */*;q=0.5";

/// JSON-RPC request structure.
#[derive(Serialize)]
struct JsonRpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: &'static str,
    method: &'a str,
    params: P,
}

/// JSON-RPC response structure.
#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Low-level JSON-RPC client for NEAR.
#[derive(Clone, Debug)]
pub struct RpcClient {
    url: String,
    client: reqwest::Client,
    timeout: Duration,
    max_response_bytes: usize,
}

impl RpcClient {
    /// Create a client for `url` with the default timeout and size limit.
    pub fn new(url: impl Into<String>) -> Result<Self, Error> {
        Self::from_config(&NetworkConfig::custom("custom", url))
    }

    /// Create a client from a network configuration.
    pub fn from_config(config: &NetworkConfig) -> Result<Self, Error> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: config.rpc_url().to_string(),
            client,
            timeout: config.timeout(),
            max_response_bytes: config.max_response_bytes(),
        })
    }

    /// Get the RPC URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Make a raw RPC call and return the `result` member.
    pub async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<R, Error> {
        let body = self.post(method, params).await?;

        let response: JsonRpcResponse = serde_json::from_slice(&body)
            .map_err(|e| Error::network(format!("Invalid JSON response: {}", e), None))?;

        if let Some(error) = response.error.filter(|e| !e.is_null()) {
            return Err(Error::Rpc(rpc_error_from_value(error)));
        }

        let result = response
            .result
            .ok_or_else(|| Error::network("Invalid response: missing result", None))?;

        serde_json::from_value(result)
            .map_err(|e| Error::network(format!("Invalid response: {}", e), None))
    }

    /// Query the nonce of an access key at final finality.
    ///
    /// An absent nonce reads as zero. An `error` reported inside the
    /// result fails with [`Error::AccessKey`].
    pub async fn view_access_key(
        &self,
        account_id: &AccountId,
        public_key: &PublicKey,
    ) -> Result<ResolvedNonce, Error> {
        let params = serde_json::json!({
            "request_type": "view_access_key",
            "finality": "final",
            "account_id": account_id.to_string(),
            "public_key": public_key.to_string(),
        });

        let view: AccessKeyView = self.call("query", params).await?;

        if let Some(message) = view.error.clone() {
            return Err(Error::AccessKey {
                account_id: account_id.clone(),
                public_key: public_key.clone(),
                message,
            });
        }

        let block_hash = view
            .block_hash
            .ok_or_else(|| Error::network("Invalid response: missing block_hash", None))?;

        let resolved = ResolvedNonce {
            nonce: view.nonce_or_zero(),
            block_hash,
        };
        tracing::debug!(
            account_id = %account_id,
            nonce = resolved.nonce,
            block_hash = %resolved.block_hash,
            "Resolved access key nonce"
        );
        Ok(resolved)
    }

    /// Broadcast signed transaction bytes and wait for execution.
    ///
    /// The response goes through [`interpret_broadcast`], so an on-chain
    /// failure comes back as [`Error::ExecutionFailure`].
    pub async fn broadcast_tx_commit(&self, signed_tx: &[u8]) -> Result<BroadcastOutcome, Error> {
        let params = serde_json::json!([STANDARD.encode(signed_tx)]);
        let body = self.post("broadcast_tx_commit", params).await?;
        let outcome = interpret_broadcast(&body)?;

        match outcome.transaction_hash() {
            Some(hash) => tracing::info!(tx_hash = %hash, "Transaction executed"),
            None => tracing::info!("Transaction executed"),
        }
        Ok(outcome)
    }

    /// POST one request and return the response body.
    async fn post(&self, method: &str, params: serde_json::Value) -> Result<Vec<u8>, Error> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: "dontcare",
            method,
            params,
        };
        let payload = serde_json::to_vec(&request)
            .map_err(|e| EncodingError::Serialize(e.to_string()))?;

        tracing::debug!(method, url = %self.url, bytes = payload.len(), "Sending RPC request");

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, ACCEPT_VALUE)
            .body(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = self.read_body(response).await.unwrap_or_default();
            // Nodes also report handler errors (e.g. TIMEOUT_ERROR on 408)
            // as a JSON-RPC envelope under a non-2xx status.
            if let Some(error) = envelope_error(&body) {
                tracing::debug!(method, status = status.as_u16(), "RPC error under HTTP error status");
                return Err(Error::Rpc(rpc_error_from_value(error)));
            }
            return Err(Error::network(
                format!("HTTP {}: {}", status, String::from_utf8_lossy(&body)),
                Some(status.as_u16()),
            ));
        }

        let body = self.read_body(response).await?;
        tracing::debug!(method, bytes = body.len(), "Received RPC response");
        Ok(body)
    }

    /// Read the body, failing once it grows past the size limit.
    async fn read_body(&self, mut response: reqwest::Response) -> Result<Vec<u8>, Error> {
        let limit = self.max_response_bytes;
        let too_large = || {
            Error::network(
                format!("Response body exceeds limit of {} bytes", limit),
                None,
            )
        };

        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.transport_error(e))?
        {
            if body.len() + chunk.len() > limit {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.timeout)
        } else {
            Error::network(e.to_string(), e.status().map(|s| s.as_u16()))
        }
    }
}

/// The non-null `error` member of a JSON-RPC envelope, if `body` is one.
fn envelope_error(body: &[u8]) -> Option<serde_json::Value> {
    let mut envelope: serde_json::Value = serde_json::from_slice(body).ok()?;
    envelope
        .as_object_mut()?
        .remove("error")
        .filter(|e| !e.is_null())
}

impl NonceSource for RpcClient {
    fn resolve_nonce<'a>(
        &'a self,
        account_id: &'a AccountId,
        public_key: &'a PublicKey,
    ) -> NonceFuture<'a> {
        Box::pin(self.view_access_key(account_id, public_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: "dontcare",
            method: "broadcast_tx_commit",
            params: serde_json::json!(["AAEC"]),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": "dontcare",
                "method": "broadcast_tx_commit",
                "params": ["AAEC"]
            })
        );
    }

    #[test]
    fn test_envelope_error() {
        let body = br#"{"jsonrpc":"2.0","id":"dontcare","error":{"name":"HANDLER_ERROR","code":-32000}}"#;
        assert_eq!(
            envelope_error(body).unwrap()["name"],
            serde_json::json!("HANDLER_ERROR")
        );
        assert!(envelope_error(br#"{"error":null,"result":{}}"#).is_none());
        assert!(envelope_error(b"internal").is_none());
        assert!(envelope_error(b"[1,2]").is_none());
        assert!(envelope_error(b"").is_none());
    }

    #[test]
    fn test_new_rejects_bad_url() {
        assert!(matches!(
            RpcClient::new("rpc.mainnet.near.org"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let config = NetworkConfig::testnet().with_timeout(Duration::from_secs(3));
        let client = RpcClient::from_config(&config).unwrap();
        assert_eq!(client.url(), "https://rpc.testnet.near.org");
        assert_eq!(client.timeout, Duration::from_secs(3));
        assert_eq!(client.max_response_bytes, 4 * 1024 * 1024);
    }
}
