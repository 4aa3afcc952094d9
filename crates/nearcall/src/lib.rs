//! Build, sign and broadcast NEAR function-call transactions.
//!
//! **nearcall** takes a signer, a receiver and a method call, resolves the
//! access key nonce from the node, signs the canonical (Borsh) encoding of
//! the transaction and submits it with `broadcast_tx_commit`. The response
//! is then checked twice: once for a JSON-RPC error and once for an
//! execution failure hidden inside an otherwise successful answer.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use nearcall::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), nearcall::Error> {
//!     let near = Near::new(NetworkConfig::mainnet())?;
//!     let signer = FileSigner::new("mainnet")?;
//!
//!     let outcome = near
//!         .call(&signer, "alice.near", "aurora", "submit", b"testing".to_vec())
//!         .await?;
//!     println!("{:?}", outcome.transaction_hash());
//!     Ok(())
//! }
//! ```
//!
//! # Offline Signing
//!
//! The pipeline only needs a [`NonceSource`]. With [`FixedNonce`] no
//! network is involved:
//!
//! ```
//! use nearcall::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), nearcall::Error> {
//! let signer = InMemorySigner::from_secret_key(
//!     "alice.near".parse()?,
//!     SecretKey::ed25519_from_bytes([1u8; 32]),
//! );
//!
//! let bytes = TransactionDraft::new("alice.near", "aurora", &signer)
//!     .add_function_call("submit", Some(b"testing".to_vec()), Gas::ZERO, None)
//!     .sign_bytes(&FixedNonce::new(41, CryptoHash::ZERO))
//!     .await?;
//! assert!(!bytes.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # Core Types
//!
//! - [`AccountId`] - Validated NEAR account identifier
//! - [`NearToken`] - NEAR token amount with yoctoNEAR precision
//! - [`Gas`] - Gas units for function calls
//! - [`PublicKey`], [`SecretKey`], [`Signature`] - Ed25519 keys and signatures
//! - [`CryptoHash`] - 32-byte SHA-256 hash
//! - [`Action`], [`Transaction`], [`SignedTransaction`] - The wire model
//!
//! # Errors
//!
//! Nothing is retried internally. See [`Error::is_nonce_related`] for the
//! case where running the pipeline again can help.

pub mod client;
pub mod codec;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{EncodingError, Error, RpcError};
pub use types::*;

// Re-export client types
pub use client::{
    BroadcastOutcome, FileSigner, FixedNonce, InMemorySigner, Near, NetworkConfig, NonceSource,
    ReadOnlySigner, ResolvedNonce, RpcClient, SignerKeys, SignerProvider, TransactionDraft,
    interpret_broadcast,
};
