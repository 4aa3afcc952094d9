//! Nonce and block hash resolution.
//!
//! Signing needs the access key's current nonce and a recent block hash.
//! [`RpcClient`](super::RpcClient) asks the node; [`FixedNonce`] answers
//! from values the caller already has, for offline signing.
//!
//! Every resolution reads the chain (or the fixed values) afresh. Nothing is
//! cached, so two pipelines signing with the same key at the same time can
//! pick the same nonce. Callers that send concurrently must serialize per
//! key, or re-run after [`Error::is_nonce_related`] reports a rejection.

use std::future::Future;
use std::pin::Pin;

use crate::error::Error;
use crate::types::{AccountId, CryptoHash, PublicKey};

/// Boxed future returned by [`NonceSource::resolve_nonce`].
pub type NonceFuture<'a> = Pin<Box<dyn Future<Output = Result<ResolvedNonce, Error>> + Send + 'a>>;

/// The access key's current nonce and the block hash it was read at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedNonce {
    /// Last nonce used by the key. The next transaction uses `nonce + 1`.
    pub nonce: u64,
    /// Recent block hash to anchor the transaction.
    pub block_hash: CryptoHash,
}

/// Resolves `(nonce, block_hash)` for an access key.
pub trait NonceSource: Send + Sync {
    /// Look up the current nonce of `public_key` on `account_id`.
    fn resolve_nonce<'a>(
        &'a self,
        account_id: &'a AccountId,
        public_key: &'a PublicKey,
    ) -> NonceFuture<'a>;
}

impl<T: NonceSource + ?Sized> NonceSource for &T {
    fn resolve_nonce<'a>(
        &'a self,
        account_id: &'a AccountId,
        public_key: &'a PublicKey,
    ) -> NonceFuture<'a> {
        (**self).resolve_nonce(account_id, public_key)
    }
}

/// A [`NonceSource`] that always answers with the same values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedNonce(pub ResolvedNonce);

impl FixedNonce {
    /// Answer with `nonce` and `block_hash`.
    pub fn new(nonce: u64, block_hash: CryptoHash) -> Self {
        Self(ResolvedNonce { nonce, block_hash })
    }
}

impl NonceSource for FixedNonce {
    fn resolve_nonce<'a>(
        &'a self,
        _account_id: &'a AccountId,
        _public_key: &'a PublicKey,
    ) -> NonceFuture<'a> {
        let resolved = self.0;
        Box::pin(async move { Ok(resolved) })
    }
}
