//! Account state commands

use clap::Subcommand;

use crate::config::{block_or_default, Config};
use crate::output::{format_ether, Output};
use crate::CliError;

/// Account subcommands
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// List accounts owned by the node
    List,
    /// Get balance of an address
    Balance {
        /// Address to query
        address: String,
        /// Block number or tag (defaults to config)
        #[arg(short, long)]
        block: Option<String>,
    },
    /// Get the transaction count (nonce) of an address
    Nonce {
        /// Address to query
        address: String,
        /// Block number or tag (defaults to config)
        #[arg(short, long)]
        block: Option<String>,
    },
    /// Get the code deployed at an address
    Code {
        /// Contract address
        address: String,
        /// Block number or tag (defaults to config)
        #[arg(short, long)]
        block: Option<String>,
    },
    /// Read a storage slot
    Storage {
        /// Contract address
        address: String,
        /// Slot position (hex quantity)
        position: String,
        /// Block number or tag (defaults to config)
        #[arg(short, long)]
        block: Option<String>,
    },
    /// Sign data with an unlocked node account
    Sign {
        /// Signing address
        address: String,
        /// Data to sign (hex)
        data: String,
    },
}

impl AccountCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            AccountCommand::List => list_accounts(config, json).await,
            AccountCommand::Balance { address, block } => {
                get_balance(config, &address, block, json).await
            }
            AccountCommand::Nonce { address, block } => {
                get_nonce(config, &address, block, json).await
            }
            AccountCommand::Code { address, block } => get_code(config, &address, block, json).await,
            AccountCommand::Storage {
                address,
                position,
                block,
            } => get_storage(config, &address, &position, block, json).await,
            AccountCommand::Sign { address, data } => sign(config, &address, &data, json).await,
        }
    }
}

async fn list_accounts(config: &Config, json: bool) -> Result<(), CliError> {
    let client = config.client()?;
    let accounts = client.accounts().await?;

    let mut message = format!("Found {} accounts", accounts.len());
    for account in &accounts {
        message.push_str(&format!("\n  {}", account));
    }

    Output::new(json)
        .field_json("accounts", &accounts)?
        .field_i64("count", accounts.len() as i64)
        .message(&message)
        .print();

    Ok(())
}

async fn get_balance(
    config: &Config,
    address: &str,
    block: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let block = block_or_default(block, config)?;
    let client = config.client()?;
    let balance = client.get_balance(address, block).await?;

    // Quantities decode non-negative
    let eth = format_ether(u128::try_from(balance).unwrap_or_default());

    Output::new(json)
        .field("address", address)
        .field("block", &block.to_string())
        .field_i64("balance_wei", balance)
        .field("balance_eth", &eth)
        .message(&format!("Balance: {} ETH ({} wei)", eth, balance))
        .print();

    Ok(())
}

async fn get_nonce(
    config: &Config,
    address: &str,
    block: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let block = block_or_default(block, config)?;
    let client = config.client()?;
    let nonce = client.get_transaction_count(address, block).await?;

    Output::new(json)
        .field("address", address)
        .field_i64("nonce", nonce)
        .message(&format!("Nonce: {}", nonce))
        .print();

    Ok(())
}

async fn get_code(
    config: &Config,
    address: &str,
    block: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let block = block_or_default(block, config)?;
    let client = config.client()?;
    let code = client.get_code(address, block).await?;

    let message = if code == "0x" {
        format!("No code at {}", address)
    } else {
        code.clone()
    };

    Output::new(json)
        .field("address", address)
        .field("code", &code)
        .message(&message)
        .print();

    Ok(())
}

async fn get_storage(
    config: &Config,
    address: &str,
    position: &str,
    block: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let block = block_or_default(block, config)?;
    let client = config.client()?;
    let value = client.get_storage_at(address, position, block).await?;

    Output::new(json)
        .field("address", address)
        .field("position", position)
        .field("value", &value)
        .message(&value)
        .print();

    Ok(())
}

async fn sign(config: &Config, address: &str, data: &str, json: bool) -> Result<(), CliError> {
    let client = config.client()?;
    let signature = client.sign(address, data).await?;

    Output::new(json)
        .field("address", address)
        .field("signature", &signature)
        .message(&format!("Signature: {}", signature))
        .print();

    Ok(())
}
