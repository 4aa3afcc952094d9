//! The main Near client.

use crate::error::Error;
use crate::types::Gas;

use super::config::NetworkConfig;
use super::draft::TransactionDraft;
use super::outcome::BroadcastOutcome;
use super::rpc::RpcClient;
use super::signer::SignerProvider;

/// Entry point tying a [`NetworkConfig`] to an [`RpcClient`].
///
/// # Example
///
/// ```rust,no_run
/// use nearcall::{FileSigner, Near, NetworkConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), nearcall::Error> {
///     let near = Near::new(NetworkConfig::testnet())?;
///     let signer = FileSigner::new("testnet")?;
///
///     let outcome = near
///         .call(&signer, "alice.testnet", "counter.testnet", "increment", b"{}".to_vec())
///         .await?;
///     println!("{:?}", outcome.transaction_hash());
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Near {
    config: NetworkConfig,
    rpc: RpcClient,
}

impl Near {
    /// Create a client. The configuration is validated first.
    pub fn new(config: NetworkConfig) -> Result<Self, Error> {
        let rpc = RpcClient::from_config(&config)?;
        Ok(Self { config, rpc })
    }

    /// Client for mainnet.
    pub fn mainnet() -> Result<Self, Error> {
        Self::new(NetworkConfig::mainnet())
    }

    /// Client for testnet.
    pub fn testnet() -> Result<Self, Error> {
        Self::new(NetworkConfig::testnet())
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// The underlying RPC client.
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Start a draft for `signer_id`, with keys from `provider`.
    pub fn draft<P>(
        &self,
        provider: &P,
        signer_id: impl AsRef<str>,
        receiver_id: impl AsRef<str>,
    ) -> TransactionDraft
    where
        P: SignerProvider + ?Sized,
    {
        TransactionDraft::new(signer_id, receiver_id, provider)
    }

    /// Sign `draft` with a nonce from the node, broadcast it, and interpret
    /// the response.
    pub async fn send(&self, draft: TransactionDraft) -> Result<BroadcastOutcome, Error> {
        draft.send(&self.rpc).await
    }

    /// Call `method` on `receiver_id` as `signer_id`.
    ///
    /// Gas and deposit come from the configuration: unset gas means
    /// [`Gas::MAX`], unset deposit means zero.
    pub async fn call<P>(
        &self,
        provider: &P,
        signer_id: impl AsRef<str>,
        receiver_id: impl AsRef<str>,
        method_name: impl Into<String>,
        args: Vec<u8>,
    ) -> Result<BroadcastOutcome, Error>
    where
        P: SignerProvider + ?Sized,
    {
        let draft = self.draft(provider, signer_id, receiver_id).add_function_call(
            method_name,
            Some(args),
            self.config.gas().unwrap_or(Gas::ZERO),
            self.config.deposit(),
        );
        self.send(draft).await
    }
}
