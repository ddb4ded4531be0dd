//! # ethapi-cli
//!
//! Command-line interface for Ethereum `eth_*` JSON-RPC.
//!
//! ## Usage
//!
//! ```bash
//! # Account commands
//! ethapi account list
//! ethapi account balance 0x407d73d8a49eeb85d32cf465507dd71d507100c1
//! ethapi account nonce 0x407d... --block pending
//!
//! # Transaction commands
//! ethapi tx send --from 0x... --to 0x... --value 1000
//! ethapi tx call --to 0x... --data 0x70a08231
//! ethapi tx receipt 0x...
//!
//! # Query commands
//! ethapi query block latest --full
//! ethapi query syncing
//! ethapi query gas-price
//! ethapi query raw eth_getBalance '["0x407d...", "latest"]'
//!
//! # Offline, against the built-in mock node
//! ethapi --rpc-url mock query block-number
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// Ethereum JSON-RPC CLI
#[derive(Parser, Debug)]
#[command(name = "ethapi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// RPC endpoint URL ("mock" for the built-in mock node)
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Account state
    #[command(subcommand)]
    Account(commands::account::AccountCommand),
    /// Transaction operations
    #[command(subcommand)]
    Tx(commands::tx::TxCommand),
    /// Query node and chain state
    #[command(subcommand)]
    Query(commands::query::QueryCommand),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set RPC URL
        #[arg(long)]
        set_rpc: Option<String>,
        /// Set request timeout in milliseconds
        #[arg(long)]
        set_timeout: Option<u64>,
        /// Set the default block for state queries
        #[arg(long)]
        set_block: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let json_layer = cli
        .log_json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!cli.log_json).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(json_layer)
        .with(text_layer)
        .with(filter)
        .init();

    // Load config
    let mut config = Config::load();

    // Override RPC URL if provided
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc_url = rpc_url;
    }
    tracing::debug!(rpc_url = %config.rpc_url, "using endpoint");

    let result = match cli.command {
        Commands::Account(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Tx(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Query(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Config {
            show,
            set_rpc,
            set_timeout,
            set_block,
        } => handle_config(&mut config, show, set_rpc, set_timeout, set_block, cli.json),
    };

    if let Err(e) = result {
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn handle_config(
    config: &mut Config,
    show: bool,
    set_rpc: Option<String>,
    set_timeout: Option<u64>,
    set_block: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(rpc) = set_rpc {
        config.rpc_url = rpc;
        modified = true;
    }

    if let Some(timeout_ms) = set_timeout {
        config.timeout_ms = timeout_ms;
        modified = true;
    }

    if let Some(block) = set_block {
        config::parse_block(&block)?;
        config.block = block;
        modified = true;
    }

    if modified {
        config.save()?;
        Output::new(json)
            .field("status", "saved")
            .message("Configuration saved")
            .print();
    } else if show {
        Output::new(json)
            .field("rpc_url", &config.rpc_url)
            .field_i64("timeout_ms", i64::try_from(config.timeout_ms).unwrap_or(i64::MAX))
            .field("block", &config.block)
            .message(&format!(
                "RPC URL: {}\nTimeout: {} ms\nDefault Block: {}",
                config.rpc_url, config.timeout_ms, config.block
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-rpc/--set-timeout/--set-block to modify")
            .print();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["ethapi", "query", "block-number"]);
        assert!(!cli.json);
        assert!(cli.rpc_url.is_none());
        assert_eq!(cli.log_level, "warn");
        assert!(!cli.log_json);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "ethapi",
            "account",
            "balance",
            "0xabc",
            "--json",
            "--rpc-url",
            "http://node:8545",
        ]);
        assert!(cli.json);
        assert_eq!(cli.rpc_url.as_deref(), Some("http://node:8545"));
    }

    #[test]
    fn test_tx_get_requires_hash_or_index() {
        assert!(Cli::try_parse_from(["ethapi", "tx", "get"]).is_err());
        assert!(Cli::try_parse_from(["ethapi", "tx", "get", "0x01"]).is_ok());
        assert!(Cli::try_parse_from(["ethapi", "tx", "get", "--block", "5", "--index", "0"]).is_ok());
        assert!(Cli::try_parse_from(["ethapi", "tx", "get", "--block-hash", "0x01"]).is_err());
    }

    #[test]
    fn test_block_hash_conflicts_with_number() {
        assert!(Cli::try_parse_from(["ethapi", "query", "block", "5", "--hash", "0x01"]).is_err());
    }
}
