//! Error types for nearcall.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) - Main error type, returned by every terminal operation
//!   - [`EncodingError`] - Canonical encoding width/format violations
//!   - [`RpcError`] - Error object reported by the RPC node
//!   - [`ParseAccountIdError`] - Invalid account ID format
//!   - [`ParseKeyError`] - Invalid key format
//!   - [`ParseHashError`] - Invalid base58 hash
//!
//! None of these are retried internally. A caller that wants to retry re-runs
//! the whole pipeline, which resolves a fresh nonce:
//!
//! ```rust,no_run
//! use nearcall::Error;
//!
//! fn should_rerun(err: &Error) -> bool {
//!     err.is_nonce_related() || matches!(err, Error::Timeout(_) | Error::Network { .. })
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::types::{AccountId, PublicKey};

/// Error parsing an account ID.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAccountIdError {
    #[error("Account ID is empty")]
    Empty,

    #[error("Account ID '{0}' is too long (max 64 characters)")]
    TooLong(String),

    #[error("Account ID '{0}' is too short (min 2 characters)")]
    TooShort(String),

    #[error("Account ID '{0}' contains invalid character '{1}'")]
    InvalidChar(String, char),

    #[error("Account ID '{0}' has invalid format")]
    InvalidFormat(String),
}

/// Error parsing a public or secret key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("Invalid key format: expected 'ed25519:...'")]
    InvalidFormat,

    #[error("Unknown key type: '{0}'")]
    UnknownKeyType(String),

    #[error("Invalid base58 encoding: {0}")]
    InvalidBase58(String),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid curve point: key bytes do not represent a valid point on the curve")]
    InvalidCurvePoint,

    #[error("Key pair mismatch: public half does not belong to the secret seed")]
    KeyPairMismatch,
}

/// Error parsing a crypto hash.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseHashError {
    #[error("Invalid base58 encoding: {0}")]
    InvalidBase58(String),

    #[error("Invalid hash length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Canonical encoding failure.
///
/// Width violations are reported, never truncated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Value '{value}' does not fit in {bits} bits")]
    WidthOverflow { value: String, bits: u32 },

    #[error("Invalid decimal integer: '{0}'")]
    InvalidInteger(String),

    #[error("Serialization failed: {0}")]
    Serialize(String),

    #[error("Deserialization failed: {0}")]
    Deserialize(String),

    #[error("{0} trailing bytes after decoded value")]
    TrailingBytes(usize),
}

// ============================================================================
// RPC Errors
// ============================================================================

/// Structured cause of a node-reported error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorCause {
    pub name: String,
    #[serde(default)]
    pub info: Option<serde_json::Value>,
}

/// A JSON-RPC error object reported by the node.
///
/// NEAR nodes report `{name, cause: {name, info}, code, message, data}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cause: Option<ErrorCause>,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    /// The structured cause name, e.g. `"INVALID_TRANSACTION"`.
    pub fn cause_name(&self) -> Option<&str> {
        self.cause.as_ref().map(|c| c.name.as_str())
    }

    /// Extract the `InvalidNonce` details if the node rejected the nonce.
    ///
    /// Returns `(tx_nonce, ak_nonce)`.
    pub fn invalid_nonce(&self) -> Option<(u64, u64)> {
        self.data
            .as_ref()
            .and_then(extract_invalid_nonce)
            .or_else(|| {
                self.cause
                    .as_ref()
                    .and_then(|c| c.info.as_ref())
                    .and_then(extract_invalid_nonce)
            })
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (code: {}): {}",
            self.name.as_deref().unwrap_or("RPC_ERROR"),
            self.cause_name().unwrap_or("UNKNOWN_CAUSE"),
            self.code,
            self.message
        )
    }
}

impl std::error::Error for RpcError {}

/// Navigate `TxExecutionError.InvalidTxError.InvalidNonce`.
fn extract_invalid_nonce(data: &serde_json::Value) -> Option<(u64, u64)> {
    let invalid_tx_error = data
        .get("TxExecutionError")
        .and_then(|e| e.get("InvalidTxError"))
        .or_else(|| data.get("InvalidTxError"))?;
    let invalid_nonce = invalid_tx_error.get("InvalidNonce")?;

    let tx_nonce = invalid_nonce.get("tx_nonce")?.as_u64()?;
    let ak_nonce = invalid_nonce.get("ak_nonce")?.as_u64()?;

    Some((tx_nonce, ak_nonce))
}

// ============================================================================
// Main Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum Error {
    // ─── Builder ───
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─── Signer resolution ───
    #[error("Private key not available for {0}")]
    KeyUnavailable(AccountId),

    #[error("No key material found for signer '{0}'")]
    SignerNotFound(String),

    #[error("Malformed key material for '{account_id}': {reason}")]
    MalformedKeyMaterial { account_id: String, reason: String },

    // ─── Nonce / block hash query ───
    #[error("Nonce resolution failed: {0}")]
    NonceResolution(#[source] Box<Error>),

    #[error("Access key {public_key} of {account_id} rejected: {message}")]
    AccessKey {
        account_id: AccountId,
        public_key: PublicKey,
        message: String,
    },

    // ─── Encoding ───
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    // ─── RPC ───
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Transaction execution failed: {0}")]
    ExecutionFailure(serde_json::Value),

    // ─── Connectivity ───
    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    // ─── Configuration ───
    #[error("Invalid configuration: {0}")]
    Config(String),

    // ─── Parsing ───
    #[error(transparent)]
    ParseAccountId(#[from] ParseAccountIdError),

    #[error(transparent)]
    ParseKey(#[from] ParseKeyError),

    #[error(transparent)]
    ParseHash(#[from] ParseHashError),
}

impl Error {
    /// Create a network error.
    pub fn network(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Error::Network {
            message: message.into(),
            status_code,
        }
    }

    /// Returns true if a re-run with a freshly resolved nonce may succeed.
    pub fn is_nonce_related(&self) -> bool {
        match self {
            Error::NonceResolution(_) => true,
            Error::Rpc(rpc) => rpc.invalid_nonce().is_some(),
            _ => false,
        }
    }

    /// The on-chain failure fragment, if this is an execution failure.
    pub fn execution_failure(&self) -> Option<&serde_json::Value> {
        match self {
            Error::ExecutionFailure(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_account_id_error_display() {
        assert_eq!(
            ParseAccountIdError::Empty.to_string(),
            "Account ID is empty"
        );
        assert_eq!(
            ParseAccountIdError::InvalidChar("test@acc".to_string(), '@').to_string(),
            "Account ID 'test@acc' contains invalid character '@'"
        );
    }

    #[test]
    fn test_encoding_error_display() {
        assert_eq!(
            EncodingError::WidthOverflow {
                value: "340282366920938463463374607431768211456".to_string(),
                bits: 128
            }
            .to_string(),
            "Value '340282366920938463463374607431768211456' does not fit in 128 bits"
        );
        assert_eq!(
            EncodingError::TrailingBytes(3).to_string(),
            "3 trailing bytes after decoded value"
        );
    }

    #[test]
    fn test_rpc_error_from_node_json() {
        let err: RpcError = serde_json::from_value(json!({
            "name": "HANDLER_ERROR",
            "cause": { "name": "INVALID_TRANSACTION", "info": {} },
            "code": -32000,
            "message": "Server error",
            "data": {
                "TxExecutionError": {
                    "InvalidTxError": {
                        "InvalidNonce": { "ak_nonce": 10, "tx_nonce": 7 }
                    }
                }
            }
        }))
        .unwrap();

        assert_eq!(err.cause_name(), Some("INVALID_TRANSACTION"));
        assert_eq!(err.invalid_nonce(), Some((7, 10)));
        assert_eq!(
            err.to_string(),
            "HANDLER_ERROR INVALID_TRANSACTION (code: -32000): Server error"
        );
        assert!(Error::Rpc(err).is_nonce_related());
    }

    #[test]
    fn test_rpc_error_without_nonce_details() {
        let err: RpcError = serde_json::from_value(json!({
            "code": -32700,
            "message": "Parse error"
        }))
        .unwrap();

        assert_eq!(err.cause_name(), None);
        assert_eq!(err.invalid_nonce(), None);
        assert!(!Error::Rpc(err).is_nonce_related());
    }

    #[test]
    fn test_execution_failure_accessor() {
        let err = Error::ExecutionFailure(json!({"ActionError": {"index": 0}}));
        assert_eq!(
            err.execution_failure(),
            Some(&json!({"ActionError": {"index": 0}}))
        );
        assert!(Error::Timeout(Duration::from_secs(10))
            .execution_failure()
            .is_none());
    }

    #[test]
    fn test_nonce_resolution_is_nonce_related() {
        let err = Error::NonceResolution(Box::new(Error::network("connection refused", None)));
        assert!(err.is_nonce_related());
        assert_eq!(
            err.to_string(),
            "Nonce resolution failed: Network error: connection refused"
        );
    }
}
