//! Transaction commands

use clap::{Args, Subcommand};
use ethapi::TransactionRequest;

use super::print_lookup;
use crate::config::{block_or_default, Config};
use crate::{output::Output, CliError};

/// Transaction object fields shared by send, call and estimate-gas
#[derive(Debug, Args)]
pub struct TxArgs {
    /// Sender address
    #[arg(long)]
    from: Option<String>,
    /// Recipient address (omit for contract creation)
    #[arg(long)]
    to: Option<String>,
    /// Gas limit
    #[arg(long)]
    gas: Option<i64>,
    /// Gas price in wei
    #[arg(long)]
    gas_price: Option<i64>,
    /// Value in wei
    #[arg(long)]
    value: Option<u128>,
    /// Call data or init code (hex)
    #[arg(long)]
    data: Option<String>,
    /// Sender nonce
    #[arg(long)]
    nonce: Option<i64>,
}

impl From<TxArgs> for TransactionRequest {
    fn from(args: TxArgs) -> Self {
        TransactionRequest {
            from: args.from,
            to: args.to,
            gas: args.gas,
            gas_price: args.gas_price,
            value: args.value,
            data: args.data,
            nonce: args.nonce,
        }
    }
}

/// Transaction subcommands
#[derive(Debug, Subcommand)]
pub enum TxCommand {
    /// Have the node sign and send a transaction
    Send {
        #[command(flatten)]
        tx: TxArgs,
    },
    /// Send a signed, encoded transaction
    SendRaw {
        /// Signed transaction data (hex)
        data: String,
    },
    /// Execute a call without creating a transaction
    Call {
        #[command(flatten)]
        tx: TxArgs,
        /// Block number or tag (defaults to config)
        #[arg(short, long)]
        block: Option<String>,
    },
    /// Estimate the gas a transaction would use
    EstimateGas {
        #[command(flatten)]
        tx: TxArgs,
        /// Block number or tag (defaults to config)
        #[arg(short, long)]
        block: Option<String>,
    },
    /// Look up a transaction by hash, or by block and index
    Get {
        /// Transaction hash
        #[arg(required_unless_present = "index")]
        hash: Option<String>,
        /// Block hash containing the transaction
        #[arg(long, requires = "index", conflicts_with_all = ["hash", "block"])]
        block_hash: Option<String>,
        /// Block number or tag containing the transaction
        #[arg(long, requires = "index", conflicts_with = "hash")]
        block: Option<String>,
        /// Position in the block
        #[arg(long)]
        index: Option<u64>,
    },
    /// Get a transaction receipt
    Receipt {
        /// Transaction hash
        hash: String,
    },
}

impl TxCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            TxCommand::Send { tx } => send(config, tx.into(), json).await,
            TxCommand::SendRaw { data } => send_raw(config, &data, json).await,
            TxCommand::Call { tx, block } => call(config, tx.into(), block, json).await,
            TxCommand::EstimateGas { tx, block } => {
                estimate_gas(config, tx.into(), block, json).await
            }
            TxCommand::Get {
                hash,
                block_hash,
                block,
                index,
            } => get_transaction(config, hash, block_hash, block, index, json).await,
            TxCommand::Receipt { hash } => get_receipt(config, &hash, json).await,
        }
    }
}

async fn send(config: &Config, tx: TransactionRequest, json: bool) -> Result<(), CliError> {
    let client = config.client()?;
    let hash = client.send_transaction(&tx).await?;

    Output::new(json)
        .field("tx_hash", &hash)
        .message(&format!("Transaction sent: {}", hash))
        .print();

    Ok(())
}

async fn send_raw(config: &Config, data: &str, json: bool) -> Result<(), CliError> {
    let client = config.client()?;
    let hash = client.send_raw_transaction(data).await?;

    Output::new(json)
        .field("tx_hash", &hash)
        .message(&format!("Transaction sent: {}", hash))
        .print();

    Ok(())
}

async fn call(
    config: &Config,
    tx: TransactionRequest,
    block: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let block = block_or_default(block, config)?;
    let client = config.client()?;
    let result = client.call(&tx, block).await?;

    Output::new(json)
        .field("result", &result)
        .message(&result)
        .print();

    Ok(())
}

async fn estimate_gas(
    config: &Config,
    tx: TransactionRequest,
    block: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let block = block_or_default(block, config)?;
    let client = config.client()?;
    let gas = client.estimate_gas(&tx, block).await?;

    Output::new(json)
        .field_i64("gas", gas)
        .message(&format!("Estimated gas: {}", gas))
        .print();

    Ok(())
}

async fn get_transaction(
    config: &Config,
    hash: Option<String>,
    block_hash: Option<String>,
    block: Option<String>,
    index: Option<u64>,
    json: bool,
) -> Result<(), CliError> {
    let client = config.client()?;

    let tx = match (hash, index) {
        (Some(hash), _) => client.get_transaction_by_hash(&hash).await?,
        (None, Some(index)) => match block_hash {
            Some(block_hash) => {
                client
                    .get_transaction_by_block_hash_and_index(&block_hash, index)
                    .await?
            }
            None => {
                let block = block_or_default(block, config)?;
                client
                    .get_transaction_by_block_number_and_index(block, index)
                    .await?
            }
        },
        (None, None) => {
            return Err(CliError::InvalidInput(
                "a transaction hash or --index is required".to_string(),
            ))
        }
    };

    print_lookup(json, "transaction", tx, "Transaction")
}

async fn get_receipt(config: &Config, hash: &str, json: bool) -> Result<(), CliError> {
    let client = config.client()?;
    let receipt = client.get_transaction_receipt(hash).await?;

    if let Some(receipt) = &receipt {
        tracing::debug!(status = ?receipt.succeeded(), "receipt found");
    }
    print_lookup(json, "receipt", receipt, "Receipt")
}
