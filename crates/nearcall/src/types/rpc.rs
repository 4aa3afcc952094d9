//! RPC response types.

use serde::Deserialize;

use super::CryptoHash;

/// Access key information from the `view_access_key` query.
///
/// Only the fields the signing pipeline needs are modeled. A node that
/// cannot find the key answers with a `result` carrying `error` instead of
/// a JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccessKeyView {
    /// Current nonce of the key. Absent means the key was never used.
    #[serde(default)]
    pub nonce: Option<u64>,
    /// Hash of the block the query was answered at.
    #[serde(default)]
    pub block_hash: Option<CryptoHash>,
    /// Block height of the query.
    #[serde(default)]
    pub block_height: Option<u64>,
    /// Query-level error reported inside `result`.
    #[serde(default)]
    pub error: Option<String>,
}

impl AccessKeyView {
    /// The nonce, treating an absent value as zero.
    pub fn nonce_or_zero(&self) -> u64 {
        self.nonce.unwrap_or(0)
    }
}
