//! Client module: building, signing and broadcasting transactions.
//!
//! - [`Near`] - Entry point bundling a configuration and an RPC client
//! - [`NetworkConfig`] - Network name, RPC URL, timeouts and call defaults
//! - [`TransactionDraft`] - Transaction builder and signing pipeline
//! - [`RpcClient`] - Low-level JSON-RPC client, single attempt per call
//! - [`interpret_broadcast`] - Classifies a broadcast response
//!
//! # Signers
//!
//! | Provider | Use Case |
//! |----------|----------|
//! | [`InMemorySigner`] | Keys already in memory |
//! | [`ReadOnlySigner`] | Building drafts without signing |
//! | [`FileSigner`] | Load from `~/.near-credentials` (near-cli compatible) |
//!
//! # Nonces
//!
//! | Source | Use Case |
//! |--------|----------|
//! | [`RpcClient`] | Query the access key from the node |
//! | [`FixedNonce`] | Offline signing with known values |

mod config;
mod draft;
mod near;
mod nonce;
mod outcome;
mod rpc;
mod signer;

pub use config::{DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_TIMEOUT, NetworkConfig, RPC_URL_TEMPLATE};
pub use draft::TransactionDraft;
pub use near::Near;
pub use nonce::{FixedNonce, NonceFuture, NonceSource, ResolvedNonce};
pub use outcome::{BroadcastOutcome, interpret_broadcast};
pub use rpc::RpcClient;
pub use signer::{FileSigner, InMemorySigner, ReadOnlySigner, SignerKeys, SignerProvider};
