//! Broadcast response interpretation.
//!
//! A `broadcast_tx_commit` answer can fail in two places. The node can
//! reject the request outright (a JSON-RPC `error`), or accept it and
//! report that execution failed on chain. The second case arrives as a
//! transport-level success, with the failure tucked inside the first
//! receipt outcome:
//!
//! ```json
//! {"result": {"receipts_outcome": [{"outcome": {"status": {"Failure": {...}}}}]}}
//! ```
//!
//! [`interpret_broadcast`] turns both into errors and everything else into
//! a [`BroadcastOutcome`].

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;

use crate::error::{Error, RpcError};
use crate::types::CryptoHash;

/// A broadcast the node accepted and executed without a receipt failure.
#[derive(Clone, Debug, PartialEq)]
pub struct BroadcastOutcome {
    raw: Vec<u8>,
    result: Value,
}

impl BroadcastOutcome {
    /// The response body exactly as received.
    pub fn raw_body(&self) -> &[u8] {
        &self.raw
    }

    /// The parsed `result` member, `Null` if the node sent none.
    pub fn result(&self) -> &Value {
        &self.result
    }

    /// The transaction hash, when the node reports it.
    pub fn transaction_hash(&self) -> Option<CryptoHash> {
        self.result
            .pointer("/transaction/hash")
            .or_else(|| self.result.pointer("/transaction_outcome/id"))
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// The decoded `SuccessValue` of the final status, if any.
    pub fn success_value(&self) -> Option<Vec<u8>> {
        self.result
            .pointer("/status/SuccessValue")
            .and_then(Value::as_str)
            .and_then(|s| STANDARD.decode(s).ok())
    }

    /// Logs of the transaction and every receipt, in outcome order.
    pub fn logs(&self) -> Vec<String> {
        let transaction = self.result.pointer("/transaction_outcome/outcome/logs");
        let receipts = self
            .result
            .get("receipts_outcome")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|r| r.pointer("/outcome/logs"));

        transaction
            .into_iter()
            .chain(receipts)
            .filter_map(Value::as_array)
            .flatten()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect()
    }
}

/// Classify a `broadcast_tx_commit` response body.
///
/// 1. A body that is not a JSON object fails with [`Error::Network`].
/// 2. A non-null top-level `error` fails with [`Error::Rpc`], before any
///    receipt is looked at.
/// 3. A non-empty `Failure` in the first receipt outcome fails with
///    [`Error::ExecutionFailure`] carrying that fragment.
/// 4. Anything else succeeds.
pub fn interpret_broadcast(body: &[u8]) -> Result<BroadcastOutcome, Error> {
    let parsed: Value = serde_json::from_slice(body)
        .map_err(|e| Error::network(format!("Invalid JSON response: {}", e), None))?;
    let Value::Object(mut envelope) = parsed else {
        return Err(Error::network(
            "Invalid response: expected a JSON object",
            None,
        ));
    };

    if let Some(error) = envelope.remove("error").filter(|e| !e.is_null()) {
        return Err(Error::Rpc(rpc_error_from_value(error)));
    }

    let result = envelope.remove("result").unwrap_or(Value::Null);

    if let Some(failure) = first_receipt_failure(&result) {
        tracing::warn!(failure = %failure, "Transaction execution failed");
        return Err(Error::ExecutionFailure(failure.clone()));
    }

    Ok(BroadcastOutcome {
        raw: body.to_vec(),
        result,
    })
}

/// Parse a JSON-RPC error object. Shapes the node never documented keep
/// their text in `message`.
pub(crate) fn rpc_error_from_value(error: Value) -> RpcError {
    match serde_json::from_value::<RpcError>(error.clone()) {
        Ok(rpc_error) => rpc_error,
        Err(_) => RpcError {
            name: None,
            cause: None,
            code: 0,
            message: match &error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
            data: Some(error),
        },
    }
}

fn first_receipt_failure(result: &Value) -> Option<&Value> {
    let failure = result.pointer("/receipts_outcome/0/outcome/status/Failure")?;
    let empty = match failure {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    (!empty).then_some(failure)
}
