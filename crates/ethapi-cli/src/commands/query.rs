//! Query commands

use clap::Subcommand;
use ethapi::{BlockId, EthClient, SyncStatus};
use serde_json::Value;

use super::print_lookup;
use crate::config::{block_or_default, Config};
use crate::{output::Output, CliError};

/// Query subcommands
#[derive(Debug, Subcommand)]
pub enum QueryCommand {
    /// Query the protocol version
    ProtocolVersion,
    /// Query sync status
    Syncing,
    /// Query the coinbase address
    Coinbase,
    /// Query whether the node is mining
    Mining,
    /// Query the mining hashrate
    Hashrate,
    /// Query current gas price
    GasPrice,
    /// Query current block number
    BlockNumber,
    /// Query block information
    Block {
        /// Block number or tag (defaults to config)
        block: Option<String>,
        /// Look up by block hash instead
        #[arg(long, conflicts_with = "block")]
        hash: Option<String>,
        /// Include full transaction objects
        #[arg(long)]
        full: bool,
    },
    /// Count the transactions in a block
    BlockTxCount {
        /// Block number or tag (defaults to config)
        block: Option<String>,
        /// Look up by block hash instead
        #[arg(long, conflicts_with = "block")]
        hash: Option<String>,
    },
    /// Count the uncles of a block
    UncleCount {
        /// Block number or tag (defaults to config)
        block: Option<String>,
        /// Look up by block hash instead
        #[arg(long, conflicts_with = "block")]
        hash: Option<String>,
    },
    /// Query an uncle of a block
    Uncle {
        /// Uncle position
        index: u64,
        /// Block number or tag (defaults to config)
        #[arg(short, long)]
        block: Option<String>,
        /// Look up by block hash instead
        #[arg(long, conflicts_with = "block")]
        hash: Option<String>,
    },
    /// List compilers available on the node
    Compilers,
    /// Install a new-block filter
    NewBlockFilter,
    /// Install a pending-transaction filter
    NewPendingTxFilter,
    /// Fetch the current proof-of-work package
    Work,
    /// Submit a proof-of-work solution
    SubmitWork {
        /// Nonce found (8 bytes, hex)
        nonce: String,
        /// Header pow-hash (hex)
        pow_hash: String,
        /// Mix digest (hex)
        mix_digest: String,
    },
    /// Report an external miner's hashrate
    SubmitHashrate {
        /// Hashrate (hex quantity)
        hashrate: String,
        /// Client id (hex)
        id: String,
    },
    /// Send any supported eth_* method with raw JSON params
    Raw {
        /// Method name
        method: String,
        /// Params as a JSON array
        #[arg(default_value = "[]")]
        params: String,
    },
}

impl QueryCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let client = config.client()?;

        match self {
            QueryCommand::ProtocolVersion => query_protocol_version(&client, json).await,
            QueryCommand::Syncing => query_syncing(&client, json).await,
            QueryCommand::Coinbase => query_coinbase(&client, json).await,
            QueryCommand::Mining => query_mining(&client, json).await,
            QueryCommand::Hashrate => query_hashrate(&client, json).await,
            QueryCommand::GasPrice => query_gas_price(&client, json).await,
            QueryCommand::BlockNumber => query_block_number(&client, json).await,
            QueryCommand::Block { block, hash, full } => {
                query_block(&client, config, block, hash, full, json).await
            }
            QueryCommand::BlockTxCount { block, hash } => {
                query_block_tx_count(&client, config, block, hash, json).await
            }
            QueryCommand::UncleCount { block, hash } => {
                query_uncle_count(&client, config, block, hash, json).await
            }
            QueryCommand::Uncle { index, block, hash } => {
                query_uncle(&client, config, index, block, hash, json).await
            }
            QueryCommand::Compilers => query_compilers(&client, json).await,
            QueryCommand::NewBlockFilter => {
                let id = client.new_block_filter().await?;
                print_filter(&id, json);
                Ok(())
            }
            QueryCommand::NewPendingTxFilter => {
                let id = client.new_pending_transaction_filter().await?;
                print_filter(&id, json);
                Ok(())
            }
            QueryCommand::Work => query_work(&client, json).await,
            QueryCommand::SubmitWork {
                nonce,
                pow_hash,
                mix_digest,
            } => {
                let accepted = client.submit_work(&nonce, &pow_hash, &mix_digest).await?;
                print_accepted(accepted, json);
                Ok(())
            }
            QueryCommand::SubmitHashrate { hashrate, id } => {
                let accepted = client.submit_hashrate(&hashrate, &id).await?;
                print_accepted(accepted, json);
                Ok(())
            }
            QueryCommand::Raw { method, params } => query_raw(&client, &method, &params, json).await,
        }
    }
}

async fn query_protocol_version(client: &EthClient, json: bool) -> Result<(), CliError> {
    let version = client.protocol_version().await?;

    Output::new(json)
        .field("protocol_version", &version)
        .message(&format!("Protocol Version: {}", version))
        .print();

    Ok(())
}

async fn query_syncing(client: &EthClient, json: bool) -> Result<(), CliError> {
    let status = client.syncing().await?;

    let message = match &status {
        SyncStatus::NotSyncing => "Not syncing".to_string(),
        SyncStatus::Syncing(p) => format!(
            "Syncing: block {} of {} (started at {})",
            p.current_block, p.highest_block, p.starting_block
        ),
    };

    Output::new(json)
        .field_bool("syncing", status.is_syncing())
        .field_json("progress", &status.progress())?
        .message(&message)
        .print();

    Ok(())
}

async fn query_coinbase(client: &EthClient, json: bool) -> Result<(), CliError> {
    let coinbase = client.coinbase().await?;

    Output::new(json)
        .field("coinbase", &coinbase)
        .message(&format!("Coinbase: {}", coinbase))
        .print();

    Ok(())
}

async fn query_mining(client: &EthClient, json: bool) -> Result<(), CliError> {
    let mining = client.mining().await?;

    Output::new(json)
        .field_bool("mining", mining)
        .message(&format!("Mining: {}", mining))
        .print();

    Ok(())
}

async fn query_hashrate(client: &EthClient, json: bool) -> Result<(), CliError> {
    let hashrate = client.hashrate().await?;

    Output::new(json)
        .field_i64("hashrate", hashrate)
        .message(&format!("Hashrate: {} H/s", hashrate))
        .print();

    Ok(())
}

async fn query_gas_price(client: &EthClient, json: bool) -> Result<(), CliError> {
    let gas_price = client.gas_price().await?;

    let gwei = gas_price / 1_000_000_000;

    Output::new(json)
        .field_i64("gas_price_wei", gas_price)
        .field_i64("gas_price_gwei", gwei)
        .message(&format!("Gas Price: {} gwei ({} wei)", gwei, gas_price))
        .print();

    Ok(())
}

async fn query_block_number(client: &EthClient, json: bool) -> Result<(), CliError> {
    let block_number = client.block_number().await?;

    Output::new(json)
        .field_i64("block_number", block_number)
        .message(&format!("Block Number: {}", block_number))
        .print();

    Ok(())
}

async fn query_block(
    client: &EthClient,
    config: &Config,
    block: Option<String>,
    hash: Option<String>,
    full: bool,
    json: bool,
) -> Result<(), CliError> {
    let block = match hash {
        Some(hash) => client.get_block_by_hash(&hash, full).await?,
        None => {
            let id = block_or_default(block, config)?;
            client.get_block_by_number(id, full).await?
        }
    };

    print_lookup(json, "block", block, "Block")
}

async fn query_block_tx_count(
    client: &EthClient,
    config: &Config,
    block: Option<String>,
    hash: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let (label, count) = match hash {
        Some(hash) => {
            let count = client.get_block_transaction_count_by_hash(&hash).await?;
            (hash, count)
        }
        None => {
            let id = block_or_default(block, config)?;
            let count = client.get_block_transaction_count_by_number(id).await?;
            (id.to_string(), count)
        }
    };

    Output::new(json)
        .field("block", &label)
        .field_i64("transaction_count", count)
        .message(&format!("Transactions in {}: {}", label, count))
        .print();

    Ok(())
}

async fn query_uncle_count(
    client: &EthClient,
    config: &Config,
    block: Option<String>,
    hash: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let (label, count) = match hash {
        Some(hash) => {
            let count = client.get_uncle_count_by_block_hash(&hash).await?;
            (hash, count)
        }
        None => {
            let id = block_or_default(block, config)?;
            let count = client.get_uncle_count_by_block_number(id).await?;
            (id.to_string(), count)
        }
    };

    Output::new(json)
        .field("block", &label)
        .field_i64("uncle_count", count)
        .message(&format!("Uncles in {}: {}", label, count))
        .print();

    Ok(())
}

async fn query_uncle(
    client: &EthClient,
    config: &Config,
    index: u64,
    block: Option<String>,
    hash: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let uncle = match hash {
        Some(hash) => client.get_uncle_by_block_hash_and_index(&hash, index).await?,
        None => {
            let id: BlockId = block_or_default(block, config)?;
            client.get_uncle_by_block_number_and_index(id, index).await?
        }
    };

    print_lookup(json, "uncle", uncle, "Uncle")
}

async fn query_compilers(client: &EthClient, json: bool) -> Result<(), CliError> {
    let compilers = client.get_compilers().await?;

    let message = if compilers.is_empty() {
        "No compilers available".to_string()
    } else {
        format!("Compilers: {}", compilers.join(", "))
    };

    Output::new(json)
        .field_json("compilers", &compilers)?
        .message(&message)
        .print();

    Ok(())
}

async fn query_work(client: &EthClient, json: bool) -> Result<(), CliError> {
    let work = client.get_work().await?;

    Output::new(json)
        .field("pow_hash", &work.pow_hash)
        .field("seed_hash", &work.seed_hash)
        .field("boundary", &work.boundary)
        .message(&format!(
            "PoW Hash: {}\nSeed Hash: {}\nBoundary: {}",
            work.pow_hash, work.seed_hash, work.boundary
        ))
        .print();

    Ok(())
}

async fn query_raw(
    client: &EthClient,
    method: &str,
    params: &str,
    json: bool,
) -> Result<(), CliError> {
    let params: Vec<Value> = serde_json::from_str(params)
        .map_err(|e| CliError::InvalidInput(format!("params must be a JSON array: {}", e)))?;

    let result = client.request_raw(method, params).await?;
    let pretty = serde_json::to_string_pretty(&result)?;

    Output::new(json)
        .field("method", method)
        .field_value("result", result)
        .message(&pretty)
        .print();

    Ok(())
}

fn print_filter(id: &str, json: bool) {
    Output::new(json)
        .field("filter_id", id)
        .message(&format!("Filter installed: {}", id))
        .print();
}

fn print_accepted(accepted: bool, json: bool) {
    Output::new(json)
        .field_bool("accepted", accepted)
        .message(if accepted { "Accepted" } else { "Rejected" })
        .print();
}
