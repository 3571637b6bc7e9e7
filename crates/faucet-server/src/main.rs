//! Main entry point for the faucet server.

use anyhow::Result;
use clap::{Arg, Command};
use faucet_server::{config::FaucetConfig, http::start_server};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_CONFIG_PATH: &str = "faucet-config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Parse command line arguments
    let matches = Command::new("faucet-server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Test-network faucet - sends a fixed amount of tokens to a requested address")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to an optional TOML configuration file")
                .default_value(DEFAULT_CONFIG_PATH),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .help("Generate a default configuration file and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_PATH);

    if matches.get_flag("generate-config") {
        return generate_config(config_path);
    }

    info!("Starting faucet server v{}", env!("CARGO_PKG_VERSION"));
    info!("Loading configuration from: {} (if present) and environment", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    info!("Server will bind to: {}:{}", config.http.bind_address, config.http.port);
    match config.ethereum.rpc_url() {
        Some(rpc_url) => info!("Ethereum RPC: {}", rpc_url),
        None => warn!("Ethereum RPC URL is not set"),
    }
    if config.ethereum.private_key().is_none() {
        warn!("Wallet private key is not set");
    }

    if let Err(e) = start_server(&config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Load configuration from the file (if present) and the environment
fn load_config(path: &str) -> Result<FaucetConfig> {
    FaucetConfig::load(path).map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))
}

/// Generate a default configuration file
fn generate_config(path: &str) -> Result<()> {
    let config = FaucetConfig::default();

    config.save_to_file(path)?;

    println!("Generated default configuration file: {}", path);
    println!();
    println!("Before running the server, provide the wallet and the node:");
    println!("1. Set WALLET_PRIVATE_KEY (or ethereum.private_key in the file)");
    println!("2. Set RPC_URL (or ethereum.rpc_url in the file)");
    println!("3. Adjust the transfer section if the amount or symbol differ");
    println!();
    println!("Example usage after configuration:");
    println!("  cargo run --bin faucet-server -- --config {}", path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_load_config() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let temp_path = temp_dir.path().join("generated.toml");
        let temp_path = temp_path.to_str().unwrap();

        generate_config(temp_path)?;

        let config = FaucetConfig::load_with_env(temp_path, Default::default())?;

        assert_eq!(config.http.port, 3030);
        assert_eq!(config.transfer.amount, "0.1");
        assert!(!config.ethereum.is_configured());
        assert!(config.validate().is_ok());

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_config_uses_defaults() -> Result<()> {
        let config = FaucetConfig::load_with_env("nonexistent-file.toml", Default::default())?;
        assert_eq!(config.http.port, 3030);
        Ok(())
    }

    #[test]
    fn test_load_broken_config() -> Result<()> {
        let temp_file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        std::fs::write(temp_file.path(), "[http\nport = ")?;

        let result = load_config(temp_file.path().to_str().unwrap());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to parse config"));

        Ok(())
    }
}
