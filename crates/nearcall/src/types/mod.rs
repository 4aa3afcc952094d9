//! Core types for NEAR transactions.
//!
//! Every type that takes part in a transaction implements Borsh directly,
//! so its canonical encoding is defined next to the type.

mod account;
mod action;
mod hash;
mod key;
mod rpc;
mod transaction;
mod units;

pub use account::AccountId;
pub use action::{
    Action, AddKeyAction, CreateAccountAction, DeleteAccountAction, DeleteKeyAction,
    DeployContractAction, FunctionCallAction, StakeAction, TransferAction,
};
pub use hash::CryptoHash;
pub use key::{KeyType, PublicKey, SecretKey, Signature};
pub use rpc::AccessKeyView;
pub use transaction::{SignedTransaction, Transaction};
pub use units::{Gas, NearToken};
