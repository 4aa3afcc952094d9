//! Transaction types.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use borsh::{BorshDeserialize, BorshSerialize};

use super::{AccountId, Action, CryptoHash, PublicKey, SecretKey, Signature};
use crate::codec;
use crate::error::EncodingError;

/// An unsigned transaction.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Transaction {
    /// The account that signs and pays for the transaction.
    pub signer_id: AccountId,
    /// The public key of the signer.
    pub public_key: PublicKey,
    /// Nonce for replay protection (must be greater than the access key's nonce).
    pub nonce: u64,
    /// The account that receives the transaction.
    pub receiver_id: AccountId,
    /// A recent block hash for transaction validity.
    pub block_hash: CryptoHash,
    /// The actions to execute, in order.
    pub actions: Vec<Action>,
}

impl Transaction {
    /// Create a new transaction.
    pub fn new(
        signer_id: AccountId,
        public_key: PublicKey,
        nonce: u64,
        receiver_id: AccountId,
        block_hash: CryptoHash,
        actions: Vec<Action>,
    ) -> Self {
        Self {
            signer_id,
            public_key,
            nonce,
            receiver_id,
            block_hash,
            actions,
        }
    }

    /// Canonical bytes of the unsigned transaction.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        codec::encode(self)
    }

    /// SHA-256 of the canonical bytes. This is the transaction hash and
    /// the message that gets signed.
    pub fn get_hash(&self) -> Result<CryptoHash, EncodingError> {
        Ok(CryptoHash::hash(&self.to_bytes()?))
    }

    /// Sign this transaction with a secret key.
    ///
    /// The 32-byte digest is the Ed25519 message.
    pub fn sign(self, signer: &SecretKey) -> Result<SignedTransaction, EncodingError> {
        let hash = self.get_hash()?;
        let signature = signer.sign(hash.as_bytes());
        Ok(SignedTransaction {
            transaction: self,
            signature,
        })
    }
}

/// A signed transaction ready to be sent.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SignedTransaction {
    transaction: Transaction,
    signature: Signature,
}

impl SignedTransaction {
    /// The transaction that was signed.
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// The signature over the transaction digest.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Get the hash of the signed transaction (transaction hash).
    pub fn get_hash(&self) -> Result<CryptoHash, EncodingError> {
        self.transaction.get_hash()
    }

    /// Check the signature against the transaction's public key.
    pub fn verify(&self) -> bool {
        self.get_hash()
            .map(|hash| {
                self.signature
                    .verify(hash.as_bytes(), &self.transaction.public_key)
            })
            .unwrap_or(false)
    }

    /// Serialize to bytes for RPC submission.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        codec::encode(self)
    }

    /// Serialize to base64 for RPC submission.
    pub fn to_base64(&self) -> Result<String, EncodingError> {
        Ok(STANDARD.encode(self.to_bytes()?))
    }

    /// Deserialize from bytes produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        codec::decode(bytes)
    }

    /// Deserialize from base64.
    pub fn from_base64(s: &str) -> Result<Self, EncodingError> {
        let bytes = STANDARD
            .decode(s)
            .map_err(|e| EncodingError::Deserialize(format!("Invalid base64: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}
