//! Faucet Server - sends test-network tokens to a requested address
//!
//! This crate provides an HTTP server that implements faucet logic:
//! 1. A caller posts an EVM address to `POST /api/faucet`
//! 2. The server checks the address shape (`0x` + 40 hex digits)
//! 3. A fixed amount (0.1 of the native token by default) is sent from the
//!    hot wallet and the transaction hash is returned
//!
//! There is no rate limiting: repeated requests each trigger a transfer.

pub mod config;
pub mod error;
pub mod eth;
pub mod http;

pub use config::FaucetConfig;
pub use error::{FaucetError, FaucetResult};
pub use eth::{Dispatcher, EthDispatcher, TransferReceipt};
