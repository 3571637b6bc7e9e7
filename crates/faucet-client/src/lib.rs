//! Faucet Client
//!
//! Library side of the `faucet-client` CLI: submits an address to a faucet
//! server and turns the answer into an [`Outcome`].

use faucet_core::{parse_address, AddressError, FaucetRequest, FaucetResponse, FAUCET_PATH};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Where a locally started faucet server listens
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3030";

/// Block explorer used for transaction links
pub const DEFAULT_EXPLORER_URL: &str = "https://explorer.0g.network";

/// Shown when the server refuses a request without saying why
pub const FALLBACK_ERROR: &str = "token transfer failed";

#[derive(Error, Debug)]
pub enum ClientError {
    /// The address was refused locally; nothing was sent
    #[error("{0}")]
    InvalidAddress(#[from] AddressError),

    /// The HTTP client itself could not be built
    #[error("could not set up the HTTP client: {0}")]
    Setup(String),

    /// The server could not be reached or answered with something unreadable
    #[error("could not reach the faucet: {0}")]
    Unreachable(String),
}

/// Result of a request the server answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Funded {
        message: String,
        tx_hash: String,
        explorer_link: String,
    },
    Rejected {
        status: u16,
        error: String,
    },
}

/// Link to a transaction on the block explorer
pub fn explorer_link(explorer_url: &str, tx_hash: &str) -> String {
    format!("{}/tx/{}", explorer_url.trim_end_matches('/'), tx_hash)
}

/// HTTP client for the faucet endpoint
#[derive(Debug, Clone)]
pub struct FaucetClient {
    http_client: Client,
    endpoint: String,
    explorer_url: String,
}

impl FaucetClient {
    pub fn new(server_url: &str, explorer_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}{}", server_url.trim_end_matches('/'), FAUCET_PATH),
            explorer_url: explorer_url.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Ask the faucet to fund `address`.
    ///
    /// The address is checked with the same rule the server applies, so an
    /// obviously bad address never leaves the machine.
    pub async fn request_funds(&self, address: &str) -> Result<Outcome, ClientError> {
        parse_address(address)?;

        debug!("Posting {} to {}", address, self.endpoint);

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&FaucetRequest::new(address))
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body: FaucetResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Unreachable(format!("unreadable response ({}): {}", status, e)))?;

        debug!("Faucet answered {} with {:?}", status, body);

        match (status.is_success() && body.success, body.tx_hash) {
            (true, Some(tx_hash)) => Ok(Outcome::Funded {
                message: body.message.unwrap_or_default(),
                explorer_link: explorer_link(&self.explorer_url, &tx_hash),
                tx_hash,
            }),
            _ => Ok(Outcome::Rejected {
                status: status.as_u16(),
                error: body.error.unwrap_or_else(|| FALLBACK_ERROR.to_string()),
            }),
        }
    }
}
