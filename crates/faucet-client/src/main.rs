//! Faucet Client
//!
//! A CLI tool for requesting test tokens from a faucet server.

use anyhow::Result;
use clap::Parser;
use faucet_client::{ClientError, FaucetClient, Outcome, DEFAULT_EXPLORER_URL, DEFAULT_SERVER_URL};
use std::time::Duration;
use tracing::error;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to fund (0x followed by 40 hex digits)
    address: String,

    /// Base URL of the faucet server
    #[arg(long, env = "FAUCET_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Block explorer used to build the transaction link
    #[arg(long, env = "FAUCET_EXPLORER_URL", default_value = DEFAULT_EXPLORER_URL)]
    explorer: String,

    /// Timeout for the whole request in seconds
    #[arg(long, default_value = "60")]
    timeout_secs: u64,

    /// Enable debug logging
    #[arg(short = 'd', long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(log_level.parse()?)
                .add_directive("hyper=warn".parse()?),
        )
        .init();

    let client = FaucetClient::new(
        &args.server,
        &args.explorer,
        Duration::from_secs(args.timeout_secs),
    )?;

    match client.request_funds(&args.address).await {
        Ok(Outcome::Funded {
            message,
            tx_hash,
            explorer_link,
        }) => {
            println!("{}", message);
            println!("Transaction: {}", tx_hash);
            println!("Explorer:    {}", explorer_link);
            Ok(())
        }
        Ok(Outcome::Rejected { status, error }) => {
            error!("Faucet refused the request ({}): {}", status, error);
            eprintln!("Error: {}", error);
            std::process::exit(1);
        }
        Err(ClientError::InvalidAddress(e)) => {
            eprintln!("Error: {}. Enter an EVM address starting with 0x.", e);
            std::process::exit(1);
        }
        Err(e @ ClientError::Setup(_)) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        Err(e @ ClientError::Unreachable(_)) => {
            error!("{}", e);
            eprintln!("Error: could not reach the faucet at {}. Try again later.", args.server);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::try_parse_from([
            "faucet-client",
            "0x742d35Cc6634C0532925a3b8D404cB8b3d3A5d3a",
        ])
        .unwrap();

        assert_eq!(args.address, "0x742d35Cc6634C0532925a3b8D404cB8b3d3A5d3a");
        assert_eq!(args.timeout_secs, 60);
        assert!(!args.debug);
    }

    #[test]
    fn test_args_parsing_full() {
        let args = Args::try_parse_from([
            "faucet-client",
            "0x742d35Cc6634C0532925a3b8D404cB8b3d3A5d3a",
            "--server", "http://faucet.internal:8080",
            "--explorer", "https://example.org",
            "--timeout-secs", "5",
            "--debug",
        ])
        .unwrap();

        assert_eq!(args.server, "http://faucet.internal:8080");
        assert_eq!(args.explorer, "https://example.org");
        assert_eq!(args.timeout_secs, 5);
        assert!(args.debug);
    }

    #[test]
    fn test_address_is_required() {
        assert!(Args::try_parse_from(["faucet-client"]).is_err());
    }
}
