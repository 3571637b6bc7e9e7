//! # Faucet Core
//!
//! Shared building blocks for the test-network faucet.
//!
//! ## Components
//!
//! ### Address validation ([`address`])
//!
//! The single syntactic rule every recipient must satisfy: a `0x` prefix
//! followed by exactly 40 hex digits. Both the server and the client apply it,
//! so a request the client would refuse is also refused by the server.
//!
//! ### Wire protocol ([`api`])
//!
//! JSON bodies exchanged on `POST /api/faucet`:
//! - [`FaucetRequest`] carries the recipient address
//! - [`FaucetResponse`] carries either the transaction hash or an error
//!
//! ## Example
//!
//! ```rust
//! use faucet_core::{address::is_valid_address, FaucetResponse};
//!
//! assert!(is_valid_address("0x742d35Cc6634C0532925a3b8D404cB8b3d3A5d3a"));
//! assert!(!is_valid_address("0xabc"));
//!
//! let ok = FaucetResponse::funded("Successfully sent 0.1 0G", "0x01");
//! assert!(ok.success);
//! ```

pub mod address;
pub mod api;

pub use address::{is_valid_address, parse_address, AddressError};
pub use api::{FaucetRequest, FaucetResponse, FAUCET_PATH};
