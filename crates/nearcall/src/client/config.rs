//! Network configuration.

use std::time::Duration;

use crate::error::Error;
use crate::types::{Gas, NearToken};

/// RPC URL template. `%` is replaced by the network name.
pub const RPC_URL_TEMPLATE: &str = "https://rpc.%.near.org";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default cap on the size of an RPC response body (4 MiB).
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

/// Where and how to talk to a NEAR network.
///
/// Built once, then read-only. The `with_*` methods return a modified copy.
///
/// ```
/// use std::time::Duration;
/// use nearcall::{Gas, NetworkConfig};
///
/// let config = NetworkConfig::testnet()
///     .with_timeout(Duration::from_secs(30))
///     .with_gas(Gas::from_tgas(100));
///
/// assert_eq!(config.rpc_url(), "https://rpc.testnet.near.org");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    network: String,
    rpc_url: String,
    timeout: Duration,
    max_response_bytes: usize,
    gas: Option<Gas>,
    deposit: Option<NearToken>,
}

impl NetworkConfig {
    /// Mainnet, using the public RPC endpoint.
    pub fn mainnet() -> Self {
        Self::from_template("mainnet", RPC_URL_TEMPLATE)
    }

    /// Testnet, using the public RPC endpoint.
    pub fn testnet() -> Self {
        Self::from_template("testnet", RPC_URL_TEMPLATE)
    }

    /// Any network with an explicit RPC URL.
    pub fn custom(network: impl Into<String>, rpc_url: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            rpc_url: rpc_url.into(),
            timeout: DEFAULT_TIMEOUT,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            gas: None,
            deposit: None,
        }
    }

    /// Any network, with every `%` in `template` replaced by its name.
    pub fn from_template(network: impl Into<String>, template: &str) -> Self {
        let network = network.into();
        let rpc_url = template.replace('%', &network);
        Self::custom(network, rpc_url)
    }

    /// Read the configuration from environment variables.
    ///
    /// - `NEAR_NETWORK` (optional): a network name or an `http(s)` RPC URL.
    ///   Defaults to `"mainnet"`.
    /// - `NEAR_RPC_URL` (optional): overrides the RPC URL.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let network = lookup("NEAR_NETWORK").filter(|n| !n.trim().is_empty());
        let config = match network.as_deref() {
            None => Self::mainnet(),
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                Self::custom("custom", url)
            }
            Some(name) => Self::from_template(name, RPC_URL_TEMPLATE),
        };

        match lookup("NEAR_RPC_URL").filter(|u| !u.trim().is_empty()) {
            Some(url) => config.with_rpc_url(url),
            None => config,
        }
    }

    /// Use a different RPC URL.
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    /// Per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Largest response body accepted, in bytes.
    pub fn with_max_response_bytes(mut self, max: usize) -> Self {
        self.max_response_bytes = max;
        self
    }

    /// Gas attached by [`Near::call`](crate::Near::call).
    pub fn with_gas(mut self, gas: Gas) -> Self {
        self.gas = Some(gas);
        self
    }

    /// Deposit attached by [`Near::call`](crate::Near::call).
    pub fn with_deposit(mut self, deposit: NearToken) -> Self {
        self.deposit = Some(deposit);
        self
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_response_bytes(&self) -> usize {
        self.max_response_bytes
    }

    /// Gas override, if any. Unset means [`Gas::MAX`].
    pub fn gas(&self) -> Option<Gas> {
        self.gas
    }

    /// Deposit override, if any. Unset means zero.
    pub fn deposit(&self) -> Option<NearToken> {
        self.deposit
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), Error> {
        if self.network.trim().is_empty() {
            return Err(Error::Config("network name is empty".to_string()));
        }
        if self.rpc_url.trim().is_empty() {
            return Err(Error::Config("RPC URL is empty".to_string()));
        }
        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "RPC URL '{}' must use http or https",
                self.rpc_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be non-zero".to_string()));
        }
        if self.max_response_bytes == 0 {
            return Err(Error::Config(
                "response size limit must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}
