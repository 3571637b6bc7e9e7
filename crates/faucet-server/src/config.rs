//! Configuration management for the faucet server.
//!
//! Sources are layered, later ones win: built-in defaults, an optional TOML
//! file, `FAUCET__SECTION__KEY` environment variables, and finally the
//! `WALLET_PRIVATE_KEY` / `RPC_URL` variables used by earlier deployments.

use alloy::primitives::{utils::parse_ether, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the hot wallet's private key.
pub const PRIVATE_KEY_ENV: &str = "WALLET_PRIVATE_KEY";

/// Environment variable holding the JSON-RPC endpoint.
pub const RPC_URL_ENV: &str = "RPC_URL";

/// Configuration for the faucet server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaucetConfig {
    /// HTTP server configuration
    pub http: HttpConfig,

    /// Chain access and signing credential
    pub ethereum: EthereumConfig,

    /// What a single request sends
    pub transfer: TransferConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Port to bind to
    pub port: u16,

    /// Address to bind to
    pub bind_address: String,
}

/// Ethereum blockchain configuration.
///
/// Both the endpoint and the key may be absent: the server still starts and
/// every funding request then fails with a configuration error.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EthereumConfig {
    /// JSON-RPC endpoint URL
    pub rpc_url: Option<String>,

    /// Private key for the faucet wallet (hex, with or without 0x)
    pub private_key: Option<String>,

    /// Upper bound on the submission round trip, in seconds
    pub rpc_timeout_secs: u64,
}

/// Transfer parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Amount sent per request, in whole tokens ("0.1")
    pub amount: String,

    /// Symbol shown in the confirmation message
    pub token_symbol: String,

    /// Gas limit for the value transfer
    pub gas_limit: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 3030,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

impl Default for EthereumConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            private_key: None,
            rpc_timeout_secs: 30,
        }
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            amount: "0.1".to_string(),
            token_symbol: "0G".to_string(),
            gas_limit: 21_000,
        }
    }
}

impl fmt::Debug for EthereumConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EthereumConfig")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("rpc_timeout_secs", &self.rpc_timeout_secs)
            .finish()
    }
}

impl EthereumConfig {
    /// Whether both the credential and the endpoint are present
    pub fn is_configured(&self) -> bool {
        non_empty(&self.private_key).is_some() && non_empty(&self.rpc_url).is_some()
    }

    pub fn private_key(&self) -> Option<&str> {
        non_empty(&self.private_key)
    }

    pub fn rpc_url(&self) -> Option<&str> {
        non_empty(&self.rpc_url)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }
}

impl TransferConfig {
    /// Transfer amount converted to wei
    pub fn amount_wei(&self) -> anyhow::Result<U256> {
        parse_ether(&self.amount)
            .map_err(|e| anyhow::anyhow!("Invalid transfer amount '{}': {}", self.amount, e))
    }

    /// Human readable confirmation returned on success
    pub fn success_message(&self) -> String {
        format!("Successfully sent {} {}", self.amount, self.token_symbol)
    }
}

impl FaucetConfig {
    /// Load configuration from an optional TOML file and the process environment
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, std::env::vars().collect())
    }

    /// Load configuration using `env` in place of the process environment
    pub fn load_with_env<P: AsRef<Path>>(
        path: P,
        env: config::Map<String, String>,
    ) -> Result<Self, config::ConfigError> {
        let private_key = env.get(PRIVATE_KEY_ENV).cloned();
        let rpc_url = env.get(RPC_URL_ENV).cloned();

        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("FAUCET")
                    .separator("__")
                    .source(Some(env)),
            )
            .set_override_option("ethereum.private_key", private_key)?
            .set_override_option("ethereum.rpc_url", rpc_url)?
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// Validate the configuration.
    ///
    /// A missing key or endpoint is not an error here, see
    /// [`EthereumConfig::is_configured`].
    pub fn validate(&self) -> anyhow::Result<()> {
        let amount = self.transfer.amount_wei()?;
        if amount.is_zero() {
            return Err(anyhow::anyhow!("Transfer amount must be positive"));
        }

        if self.transfer.gas_limit == 0 {
            return Err(anyhow::anyhow!("Gas limit must be greater than 0"));
        }

        if self.ethereum.rpc_timeout_secs == 0 {
            return Err(anyhow::anyhow!("RPC timeout must be greater than 0"));
        }

        if let Some(rpc_url) = self.ethereum.rpc_url() {
            url::Url::parse(rpc_url)
                .map_err(|e| anyhow::anyhow!("Invalid RPC URL '{}': {}", rpc_url, e))?;
        }

        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
