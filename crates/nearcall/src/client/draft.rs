//! Transaction draft and the signing pipeline.
//!
//! A [`TransactionDraft`] collects the signer, the receiver and an ordered
//! list of actions. The first thing that goes wrong poisons it: later
//! additions are ignored and [`sign`](TransactionDraft::sign) hands back
//! that first error.
//!
//! # Example
//!
//! ```rust,no_run
//! use nearcall::{CryptoHash, FixedNonce, Gas, InMemorySigner, TransactionDraft};
//!
//! # async fn example() -> Result<(), nearcall::Error> {
//! let signer = InMemorySigner::new("alice.near", "ed25519:...")?;
//!
//! let signed = TransactionDraft::new("alice.near", "aurora", &signer)
//!     .add_function_call("submit", Some(b"testing".to_vec()), Gas::ZERO, None)
//!     .sign(&FixedNonce::new(41, CryptoHash::ZERO))
//!     .await?;
//!
//! assert_eq!(signed.transaction().nonce, 42);
//! # Ok(())
//! # }
//! ```

use super::nonce::NonceSource;
use super::outcome::BroadcastOutcome;
use super::rpc::RpcClient;
use super::signer::{SignerKeys, SignerProvider};
use crate::error::{EncodingError, Error};
use crate::types::{AccountId, Action, Gas, NearToken, PublicKey, SignedTransaction, Transaction};

/// An unsigned transaction under construction.
#[derive(Debug)]
pub struct TransactionDraft {
    actions: Vec<Action>,
    state: DraftState,
}

#[derive(Debug)]
enum DraftState {
    Ready(Parties),
    Poisoned(Error),
}

#[derive(Debug)]
struct Parties {
    signer_id: AccountId,
    receiver_id: AccountId,
    keys: SignerKeys,
}

impl TransactionDraft {
    /// Start a draft from `signer_id` to `receiver_id`.
    ///
    /// Both ids are validated and the signer's keys are looked up right
    /// away. A failure poisons the draft instead of returning early.
    pub fn new<P>(signer_id: impl AsRef<str>, receiver_id: impl AsRef<str>, provider: &P) -> Self
    where
        P: SignerProvider + ?Sized,
    {
        let state = match Self::resolve_parties(signer_id.as_ref(), receiver_id.as_ref(), provider)
        {
            Ok(parties) => DraftState::Ready(parties),
            Err(e) => DraftState::Poisoned(e),
        };
        Self {
            actions: Vec::new(),
            state,
        }
    }

    fn resolve_parties<P>(signer_id: &str, receiver_id: &str, provider: &P) -> Result<Parties, Error>
    where
        P: SignerProvider + ?Sized,
    {
        let signer_id: AccountId = signer_id
            .parse()
            .map_err(|e| Error::InvalidArgument(format!("signer: {}", e)))?;
        let receiver_id: AccountId = receiver_id
            .parse()
            .map_err(|e| Error::InvalidArgument(format!("receiver: {}", e)))?;
        let keys = provider.resolve(&signer_id)?;

        Ok(Parties {
            signer_id,
            receiver_id,
            keys,
        })
    }

    /// Append a function call.
    ///
    /// `Gas::ZERO` selects [`Gas::MAX`], a missing deposit is zero and
    /// missing args are empty. An empty method name poisons the draft.
    pub fn add_function_call(
        mut self,
        method_name: impl Into<String>,
        args: Option<Vec<u8>>,
        gas: Gas,
        deposit: Option<NearToken>,
    ) -> Self {
        if self.is_poisoned() {
            return self;
        }

        let method_name = method_name.into();
        if method_name.is_empty() {
            self.poison(Error::InvalidArgument(
                "method name must not be empty".to_string(),
            ));
            return self;
        }

        let gas = if gas.is_zero() { Gas::MAX } else { gas };
        self.actions.push(Action::function_call(
            method_name,
            args.unwrap_or_default(),
            gas,
            deposit.unwrap_or(NearToken::ZERO),
        ));
        self
    }

    /// Append a prebuilt action.
    pub fn add_action(mut self, action: Action) -> Self {
        if !self.is_poisoned() {
            self.actions.push(action);
        }
        self
    }

    /// The error that poisoned the draft, if any.
    pub fn error(&self) -> Option<&Error> {
        match &self.state {
            DraftState::Ready(_) => None,
            DraftState::Poisoned(e) => Some(e),
        }
    }

    /// Returns true once the draft has failed.
    pub fn is_poisoned(&self) -> bool {
        matches!(self.state, DraftState::Poisoned(_))
    }

    /// Actions added so far, in order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn signer_id(&self) -> Option<&AccountId> {
        self.parties().map(|p| &p.signer_id)
    }

    pub fn receiver_id(&self) -> Option<&AccountId> {
        self.parties().map(|p| &p.receiver_id)
    }

    /// The public key the transaction will carry.
    pub fn public_key(&self) -> Option<&PublicKey> {
        self.parties().map(|p| &p.keys.public_key)
    }

    fn parties(&self) -> Option<&Parties> {
        match &self.state {
            DraftState::Ready(parties) => Some(parties),
            DraftState::Poisoned(_) => None,
        }
    }

    fn poison(&mut self, error: Error) {
        tracing::debug!(error = %error, "Transaction draft poisoned");
        self.state = DraftState::Poisoned(error);
    }

    /// Resolve the nonce, then encode, hash and sign the transaction.
    ///
    /// The transaction nonce is the resolved nonce plus one. Resolution
    /// failures other than [`Error::AccessKey`] are wrapped in
    /// [`Error::NonceResolution`].
    pub async fn sign<N>(self, nonces: &N) -> Result<SignedTransaction, Error>
    where
        N: NonceSource + ?Sized,
    {
        let parties = match self.state {
            DraftState::Ready(parties) => parties,
            DraftState::Poisoned(e) => return Err(e),
        };
        let Parties {
            signer_id,
            receiver_id,
            keys,
        } = parties;

        let secret_key = keys
            .secret_key
            .ok_or_else(|| Error::KeyUnavailable(signer_id.clone()))?;

        let resolved = nonces
            .resolve_nonce(&signer_id, &keys.public_key)
            .await
            .map_err(|e| match e {
                Error::AccessKey { .. } | Error::NonceResolution(_) => e,
                other => Error::NonceResolution(Box::new(other)),
            })?;

        let nonce = resolved.nonce.checked_add(1).ok_or_else(|| {
            Error::NonceResolution(Box::new(
                EncodingError::WidthOverflow {
                    value: (u128::from(resolved.nonce) + 1).to_string(),
                    bits: 64,
                }
                .into(),
            ))
        })?;

        let tx = Transaction::new(
            signer_id,
            keys.public_key,
            nonce,
            receiver_id,
            resolved.block_hash,
            self.actions,
        );

        let digest = tx.get_hash()?;
        tracing::debug!(
            signer_id = %tx.signer_id,
            receiver_id = %tx.receiver_id,
            nonce,
            actions = tx.actions.len(),
            digest = %digest,
            "Signing transaction"
        );

        Ok(tx.sign(&secret_key)?)
    }

    /// Like [`sign`](Self::sign), returning the canonical signed bytes.
    pub async fn sign_bytes<N>(self, nonces: &N) -> Result<Vec<u8>, Error>
    where
        N: NonceSource + ?Sized,
    {
        let signed = self.sign(nonces).await?;
        Ok(signed.to_bytes()?)
    }

    /// Sign with a nonce from `rpc`, broadcast, and interpret the response.
    pub async fn send(self, rpc: &RpcClient) -> Result<BroadcastOutcome, Error> {
        let bytes = self.sign_bytes(rpc).await?;
        rpc.broadcast_tx_commit(&bytes).await
    }
}
