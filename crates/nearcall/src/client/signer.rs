//! Signer providers.
//!
//! A [`SignerProvider`] hands out the key pair of a named account on demand.
//! The private half is optional: a provider may only know the public key,
//! in which case building a draft succeeds but signing fails with
//! [`Error::KeyUnavailable`].
//!
//! # Implementations
//!
//! - [`InMemorySigner`] - Keys held in memory
//! - [`ReadOnlySigner`] - Public keys only
//! - [`FileSigner`] - Keys loaded from near-cli credential files
//!
//! # Example
//!
//! ```rust
//! use nearcall::{InMemorySigner, SignerProvider};
//!
//! # fn example() -> Result<(), nearcall::Error> {
//! let signer = InMemorySigner::new(
//!     "alice.near",
//!     "ed25519:2AXDGYSE4f2sz7tvMMzyHvUfcoJmxudvdhBcmiUSo6iuCXagjUCKEQF21awZnUGxmwD4m9vGXuC3qieHXJQHAcT",
//! )?;
//!
//! let keys = signer.resolve(&"alice.near".parse()?)?;
//! assert!(keys.secret_key.is_some());
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::error::Error;
use crate::types::{AccountId, PublicKey, SecretKey};

// ============================================================================
// SignerProvider Trait
// ============================================================================

/// The key pair of one account, as returned by a [`SignerProvider`].
#[derive(Clone, Debug)]
pub struct SignerKeys {
    /// The public key the transaction is signed with.
    pub public_key: PublicKey,
    /// The matching private key, if the provider holds it.
    pub secret_key: Option<SecretKey>,
}

impl SignerKeys {
    /// Keys with a private half. The public key is derived.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        Self {
            public_key: secret_key.public_key(),
            secret_key: Some(secret_key),
        }
    }

    /// Keys without a private half.
    pub fn public_only(public_key: PublicKey) -> Self {
        Self {
            public_key,
            secret_key: None,
        }
    }
}

/// Supplies key material for named accounts.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use nearcall::{AccountId, Error, SecretKey, SignerKeys, SignerProvider};
///
/// struct Vault { key: SecretKey }
///
/// impl SignerProvider for Vault {
///     fn resolve(&self, _account_id: &AccountId) -> Result<SignerKeys, Error> {
///         Ok(SignerKeys::from_secret_key(self.key.clone()))
///     }
/// }
/// ```
pub trait SignerProvider: Send + Sync {
    /// Look up the key pair for `account_id`.
    ///
    /// Fails with [`Error::SignerNotFound`] when the provider knows nothing
    /// about the account and [`Error::MalformedKeyMaterial`] when what it
    /// found cannot be used.
    fn resolve(&self, account_id: &AccountId) -> Result<SignerKeys, Error>;
}

impl<T: SignerProvider + ?Sized> SignerProvider for &T {
    fn resolve(&self, account_id: &AccountId) -> Result<SignerKeys, Error> {
        (**self).resolve(account_id)
    }
}

impl<T: SignerProvider + ?Sized> SignerProvider for Arc<T> {
    fn resolve(&self, account_id: &AccountId) -> Result<SignerKeys, Error> {
        (**self).resolve(account_id)
    }
}

// ============================================================================
// InMemorySigner
// ============================================================================

/// Secret keys held in memory, one per account.
#[derive(Clone, Default)]
pub struct InMemorySigner {
    keys: HashMap<AccountId, SecretKey>,
}

impl InMemorySigner {
    /// Create a signer for one account from an `ed25519:...` secret key.
    pub fn new(account_id: impl AsRef<str>, secret_key: impl AsRef<str>) -> Result<Self, Error> {
        let account_id: AccountId = account_id.as_ref().parse()?;
        let secret_key: SecretKey = secret_key.as_ref().parse()?;
        Ok(Self::from_secret_key(account_id, secret_key))
    }

    /// Create a signer for one account from an already parsed key.
    pub fn from_secret_key(account_id: AccountId, secret_key: SecretKey) -> Self {
        let mut keys = HashMap::new();
        keys.insert(account_id, secret_key);
        Self { keys }
    }

    /// Add or replace the key of an account.
    pub fn with_key(mut self, account_id: AccountId, secret_key: SecretKey) -> Self {
        self.keys.insert(account_id, secret_key);
        self
    }

    /// The public key registered for an account.
    pub fn public_key(&self, account_id: &AccountId) -> Option<PublicKey> {
        self.keys.get(account_id).map(SecretKey::public_key)
    }
}

impl std::fmt::Debug for InMemorySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySigner")
            .field("accounts", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SignerProvider for InMemorySigner {
    fn resolve(&self, account_id: &AccountId) -> Result<SignerKeys, Error> {
        self.keys
            .get(account_id)
            .cloned()
            .map(SignerKeys::from_secret_key)
            .ok_or_else(|| Error::SignerNotFound(account_id.to_string()))
    }
}

// ============================================================================
// ReadOnlySigner
// ============================================================================

/// Knows public keys only. Drafts build, signing fails with
/// [`Error::KeyUnavailable`].
#[derive(Clone, Debug, Default)]
pub struct ReadOnlySigner {
    keys: HashMap<AccountId, PublicKey>,
}

impl ReadOnlySigner {
    /// Create a provider for one account.
    pub fn new(account_id: AccountId, public_key: PublicKey) -> Self {
        let mut keys = HashMap::new();
        keys.insert(account_id, public_key);
        Self { keys }
    }

    /// Add or replace the public key of an account.
    pub fn with_key(mut self, account_id: AccountId, public_key: PublicKey) -> Self {
        self.keys.insert(account_id, public_key);
        self
    }
}

impl SignerProvider for ReadOnlySigner {
    fn resolve(&self, account_id: &AccountId) -> Result<SignerKeys, Error> {
        self.keys
            .get(account_id)
            .cloned()
            .map(SignerKeys::public_only)
            .ok_or_else(|| Error::SignerNotFound(account_id.to_string()))
    }
}

// ============================================================================
// FileSigner
// ============================================================================

/// Loads keys from `{root}/{network}/{account}.json`.
///
/// Compatible with credentials created by near-cli and near-cli-rs. The
/// default root is `~/.near-credentials`. Files are read on every
/// [`resolve`](SignerProvider::resolve), so keys rotated on disk are picked
/// up without rebuilding the provider.
///
/// # Example
///
/// ```rust,no_run
/// use nearcall::{FileSigner, SignerProvider};
///
/// // Reads ~/.near-credentials/testnet/alice.testnet.json
/// let signer = FileSigner::new("testnet").unwrap();
/// let keys = signer.resolve(&"alice.testnet".parse().unwrap()).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct FileSigner {
    root: PathBuf,
    network: String,
}

/// Credential file format compatible with near-cli.
#[derive(Deserialize)]
struct CredentialFile {
    #[serde(default)]
    account_id: Option<String>,
    #[serde(default)]
    public_key: Option<String>,
    #[serde(default, alias = "secret_key")]
    private_key: Option<String>,
}

impl FileSigner {
    /// Use the standard credentials directory under the home directory.
    #[cfg(feature = "file-signer")]
    pub fn new(network: impl Into<String>) -> Result<Self, Error> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;
        Ok(Self::with_root(home.join(".near-credentials"), network))
    }

    /// Use a custom credentials root.
    pub fn with_root(root: impl Into<PathBuf>, network: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            network: network.into(),
        }
    }

    /// The credentials directory for this network.
    pub fn network_dir(&self) -> PathBuf {
        self.root.join(&self.network)
    }

    /// The credential file of an account.
    pub fn path_for(&self, account_id: &AccountId) -> PathBuf {
        self.network_dir().join(format!("{}.json", account_id))
    }

    fn load(path: &Path, account_id: &AccountId) -> Result<SignerKeys, Error> {
        let malformed = |reason: String| Error::MalformedKeyMaterial {
            account_id: account_id.to_string(),
            reason,
        };

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::SignerNotFound(account_id.to_string()));
            }
            Err(e) => {
                return Err(malformed(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let cred: CredentialFile = serde_json::from_str(&content)
            .map_err(|e| malformed(format!("failed to parse {}: {}", path.display(), e)))?;

        if let Some(file_account) = &cred.account_id {
            if file_account != account_id.as_str() {
                return Err(malformed(format!("file belongs to '{}'", file_account)));
            }
        }

        let public_key = cred
            .public_key
            .as_deref()
            .map(str::parse::<PublicKey>)
            .transpose()
            .map_err(|e| malformed(format!("public_key: {}", e)))?;

        let secret_key = cred
            .private_key
            .as_deref()
            .map(str::parse::<SecretKey>)
            .transpose()
            .map_err(|e| malformed(format!("private_key: {}", e)))?;

        match (public_key, secret_key) {
            (Some(public_key), Some(secret_key)) => {
                if secret_key.public_key() != public_key {
                    return Err(malformed(
                        "public_key does not match private_key".to_string(),
                    ));
                }
                Ok(SignerKeys::from_secret_key(secret_key))
            }
            (None, Some(secret_key)) => Ok(SignerKeys::from_secret_key(secret_key)),
            (Some(public_key), None) => Ok(SignerKeys::public_only(public_key)),
            (None, None) => Err(malformed("no key in credential file".to_string())),
        }
    }
}

impl SignerProvider for FileSigner {
    fn resolve(&self, account_id: &AccountId) -> Result<SignerKeys, Error> {
        let path = self.path_for(account_id);
        tracing::debug!(path = %path.display(), "Loading credentials");
        Self::load(&path, account_id)
    }
}
