//! Ethereum blockchain integration for the faucet server.
//!
//! The [`Dispatcher`] trait is the seam between the HTTP layer and the chain;
//! [`EthDispatcher`] is the `alloy`-backed implementation.

use crate::config::{EthereumConfig, TransferConfig};
use crate::error::{FaucetError, FaucetResult};
use alloy::{
    network::EthereumWallet,
    primitives::{Address, TxHash, U256},
    providers::{Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

/// A transfer the node accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub tx_hash: TxHash,
    pub recipient: Address,
    pub amount: U256,
}

/// Sends the faucet amount to a recipient.
///
/// Every call is a single best-effort attempt: no retries, and no
/// de-duplication, so two calls for the same address make two transfers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Submit one transfer to `recipient` and return once the node accepted it
    async fn dispatch(&self, recipient: Address) -> FaucetResult<TransferReceipt>;

    /// Address funds are sent from, when the credential is usable
    fn faucet_address(&self) -> Option<Address>;
}

/// Dispatcher signing with a local private key and submitting over HTTP JSON-RPC
pub struct EthDispatcher {
    config: EthereumConfig,
    amount: U256,
    gas_limit: u64,
}

impl std::fmt::Debug for EthDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthDispatcher")
            .field("config", &self.config)
            .field("amount", &self.amount)
            .field("gas_limit", &self.gas_limit)
            .finish()
    }
}

impl EthDispatcher {
    /// Create a dispatcher. No network access happens here.
    pub fn new(config: EthereumConfig, transfer: &TransferConfig) -> FaucetResult<Self> {
        let amount = transfer
            .amount_wei()
            .map_err(|e| FaucetError::Configuration(e.to_string()))?;

        Ok(Self {
            config,
            amount,
            gas_limit: transfer.gas_limit,
        })
    }

    /// Amount sent per transfer, in wei
    pub fn amount(&self) -> U256 {
        self.amount
    }

    fn rpc_timeout(&self) -> Duration {
        self.config.rpc_timeout()
    }

    fn signer(&self) -> FaucetResult<PrivateKeySigner> {
        let private_key = self
            .config
            .private_key()
            .ok_or_else(|| FaucetError::Configuration("signing credential is not set".to_string()))?;
        let private_key = private_key.strip_prefix("0x").unwrap_or(private_key);

        // The parse error may echo key material.
        PrivateKeySigner::from_str(private_key)
            .map_err(|_| FaucetError::Configuration("signing credential is invalid".to_string()))
    }

    fn endpoint(&self) -> FaucetResult<Url> {
        let rpc_url = self
            .config
            .rpc_url()
            .ok_or_else(|| FaucetError::Configuration("RPC URL is not set".to_string()))?;

        Url::parse(rpc_url)
            .map_err(|e| FaucetError::Configuration(format!("invalid RPC URL: {}", e)))
    }
}

#[async_trait]
impl Dispatcher for EthDispatcher {
    async fn dispatch(&self, recipient: Address) -> FaucetResult<TransferReceipt> {
        // Both checks run before any provider exists, so a misconfigured
        // faucet never talks to the network.
        let signer = self.signer()?;
        let url = self.endpoint()?;
        let faucet_address = signer.address();

        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

        let tx_request = TransactionRequest::default()
            .from(faucet_address)
            .to(recipient)
            .value(self.amount)
            .gas_limit(self.gas_limit);

        debug!(
            "Submitting transfer from {} to {} (value: {} wei, gas limit: {})",
            faucet_address, recipient, self.amount, self.gas_limit
        );

        let pending_tx = timeout(self.rpc_timeout(), provider.send_transaction(tx_request))
            .await
            .map_err(|_| {
                warn!("Transfer to {} timed out", recipient);
                FaucetError::Transfer(format!(
                    "RPC request timed out after {}s",
                    self.rpc_timeout().as_secs()
                ))
            })?
            .map_err(|e| {
                warn!("Failed to send transaction to {}: {}", recipient, e);
                FaucetError::Transfer(e.to_string())
            })?;

        let tx_hash = *pending_tx.tx_hash();

        info!("Transaction sent: {} (to: {}, amount: {} wei)", tx_hash, recipient, self.amount);

        Ok(TransferReceipt {
            tx_hash,
            recipient,
            amount: self.amount,
        })
    }

    fn faucet_address(&self) -> Option<Address> {
        if self.endpoint().is_err() {
            return None;
        }
        self.signer().ok().map(|signer| signer.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::any;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // First well-known development key
    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_KEY_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const RECIPIENT: &str = "0x742d35Cc6634C0532925a3b8D404cB8b3d3A5d3a";

    fn recipient() -> Address {
        Address::from_str(RECIPIENT).unwrap()
    }

    fn ethereum_config(rpc_url: Option<String>, private_key: Option<&str>) -> EthereumConfig {
        EthereumConfig {
            rpc_url,
            private_key: private_key.map(str::to_string),
            rpc_timeout_secs: 5,
        }
    }

    fn dispatcher(config: EthereumConfig) -> EthDispatcher {
        EthDispatcher::new(config, &TransferConfig::default()).unwrap()
    }

    /// A node that must never be contacted
    async fn silent_node() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_amount_is_a_tenth_of_a_token() {
        let dispatcher = dispatcher(EthereumConfig::default());
        assert_eq!(dispatcher.amount(), U256::from(10u64.pow(17)));
    }

    #[test]
    fn test_invalid_amount_is_rejected() {
        let transfer = TransferConfig {
            amount: "lots".to_string(),
            ..TransferConfig::default()
        };
        assert!(EthDispatcher::new(EthereumConfig::default(), &transfer).is_err());
    }

    #[tokio::test]
    async fn test_missing_private_key_never_contacts_node() {
        let server = silent_node().await;
        let dispatcher = dispatcher(ethereum_config(Some(server.uri()), None));

        let result = dispatcher.dispatch(recipient()).await;

        assert!(matches!(result, Err(FaucetError::Configuration(_))));
        server.verify().await;
    }

    #[tokio::test]
    async fn test_missing_rpc_url_fails_before_network() {
        let dispatcher = dispatcher(ethereum_config(None, Some(TEST_KEY)));

        let result = dispatcher.dispatch(recipient()).await;

        match result {
            Err(FaucetError::Configuration(message)) => assert!(message.contains("RPC URL")),
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_private_key_is_configuration_error() {
        let server = silent_node().await;
        let dispatcher = dispatcher(ethereum_config(Some(server.uri()), Some("not-a-key")));

        let result = dispatcher.dispatch(recipient()).await;

        match result {
            Err(FaucetError::Configuration(message)) => assert!(!message.contains("not-a-key")),
            other => panic!("expected configuration error, got {:?}", other),
        }
        server.verify().await;
    }

    #[tokio::test]
    async fn test_node_failure_is_transfer_error() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500).set_body_string("node exploded"))
            .mount(&server)
            .await;

        let dispatcher = dispatcher(ethereum_config(Some(server.uri()), Some(TEST_KEY)));
        let result = dispatcher.dispatch(recipient()).await;

        assert!(matches!(result, Err(FaucetError::Transfer(_))));
    }

    #[tokio::test]
    async fn test_slow_node_times_out() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
            .mount(&server)
            .await;

        let mut config = ethereum_config(Some(server.uri()), Some(TEST_KEY));
        config.rpc_timeout_secs = 1;
        let dispatcher = dispatcher(config);

        match dispatcher.dispatch(recipient()).await {
            Err(FaucetError::Transfer(message)) => assert!(message.contains("timed out")),
            other => panic!("expected transfer error, got {:?}", other),
        }
    }

    #[test]
    fn test_faucet_address_from_key() {
        let expected = Address::from_str(TEST_KEY_ADDRESS).unwrap();

        let with_prefix = format!("0x{}", TEST_KEY);
        let configured = dispatcher(ethereum_config(
            Some("http://localhost:8545".to_string()),
            Some(&with_prefix),
        ));
        assert_eq!(configured.faucet_address(), Some(expected));

        let without_endpoint = dispatcher(ethereum_config(None, Some(TEST_KEY)));
        assert_eq!(without_endpoint.faucet_address(), None);

        let without_key = dispatcher(ethereum_config(Some("http://localhost:8545".to_string()), None));
        assert_eq!(without_key.faucet_address(), None);
    }

    #[test]
    fn test_debug_hides_private_key() {
        let configured = dispatcher(ethereum_config(
            Some("http://localhost:8545".to_string()),
            Some(TEST_KEY),
        ));
        assert!(!format!("{:?}", configured).contains(TEST_KEY));
    }
}
