//! Request and result types
//!
//! Addresses, hashes and data blobs stay `0x`-prefixed strings; they are
//! forwarded to the node as given and returned as the node sent them.
//! Numeric fields are decoded from quantities.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::EthApiError;
use crate::quantity::{self, hex_i64, hex_i64_opt, hex_u128, hex_u128_opt};

/// Block identifier: a number or one of the node's tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockId {
    /// Block number
    Number(u64),
    /// Latest block
    #[default]
    Latest,
    /// Pending block (includes pending transactions)
    Pending,
    /// Earliest block (genesis)
    Earliest,
    /// Safe block
    Safe,
    /// Finalized block
    Finalized,
}

impl Serialize for BlockId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Number(n) => f.write_str(&quantity::format_quantity(u128::from(*n))),
            BlockId::Latest => f.write_str("latest"),
            BlockId::Pending => f.write_str("pending"),
            BlockId::Earliest => f.write_str("earliest"),
            BlockId::Safe => f.write_str("safe"),
            BlockId::Finalized => f.write_str("finalized"),
        }
    }
}

impl FromStr for BlockId {
    type Err = EthApiError;

    /// Accepts a tag, a `0x` quantity, or a decimal number
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "latest" => Ok(BlockId::Latest),
            "pending" => Ok(BlockId::Pending),
            "earliest" => Ok(BlockId::Earliest),
            "safe" => Ok(BlockId::Safe),
            "finalized" => Ok(BlockId::Finalized),
            lower if lower.starts_with("0x") => {
                let n = quantity::parse_big_quantity(lower)?;
                u64::try_from(n)
                    .map(BlockId::Number)
                    .map_err(|_| EthApiError::InvalidQuantity(format!("{s}: out of range")))
            }
            lower => lower
                .parse::<u64>()
                .map(BlockId::Number)
                .map_err(|_| EthApiError::InvalidQuantity(format!("invalid block id: {s}"))),
        }
    }
}

impl From<u64> for BlockId {
    fn from(n: u64) -> Self {
        BlockId::Number(n)
    }
}

// ==================== Sync Status ====================

/// Result of `eth_syncing`
///
/// The node answers `false` when idle and a progress object while syncing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// Node is not syncing
    NotSyncing,
    /// Node is syncing
    Syncing(SyncProgress),
}

impl SyncStatus {
    /// Returns true while the node is syncing
    pub fn is_syncing(&self) -> bool {
        matches!(self, SyncStatus::Syncing(_))
    }

    /// Progress fields, if syncing
    pub fn progress(&self) -> Option<&SyncProgress> {
        match self {
            SyncStatus::Syncing(progress) => Some(progress),
            SyncStatus::NotSyncing => None,
        }
    }
}

impl<'de> Deserialize<'de> for SyncStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Variant order matters: the boolean shape is tried first.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Progress(SyncProgress),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Flag(false) => Ok(SyncStatus::NotSyncing),
            Repr::Flag(true) => Err(de::Error::custom(
                "expected false or a sync progress object, got true",
            )),
            Repr::Progress(progress) => Ok(SyncStatus::Syncing(progress)),
        }
    }
}

impl Serialize for SyncStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            SyncStatus::NotSyncing => serializer.serialize_bool(false),
            SyncStatus::Syncing(progress) => progress.serialize(serializer),
        }
    }
}

/// Sync progress reported by a syncing node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgress {
    /// Block at which the sync started
    #[serde(with = "hex_i64")]
    pub starting_block: i64,
    /// Current block
    #[serde(with = "hex_i64")]
    pub current_block: i64,
    /// Estimated highest block
    #[serde(with = "hex_i64")]
    pub highest_block: i64,
    /// State entries downloaded (fast sync only)
    #[serde(default, with = "hex_i64_opt", skip_serializing_if = "Option::is_none")]
    pub pulled_states: Option<i64>,
    /// State entries known (fast sync only)
    #[serde(default, with = "hex_i64_opt", skip_serializing_if = "Option::is_none")]
    pub known_states: Option<i64>,
}

// ==================== Requests ====================

/// Transaction object for `eth_sendTransaction`, `eth_call` and
/// `eth_estimateGas`. Unset fields are omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Sender address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Recipient address (absent for contract creation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Gas limit
    #[serde(skip_serializing_if = "Option::is_none", with = "hex_i64_opt")]
    pub gas: Option<i64>,
    /// Gas price in wei
    #[serde(skip_serializing_if = "Option::is_none", with = "hex_i64_opt")]
    pub gas_price: Option<i64>,
    /// Value in wei
    #[serde(skip_serializing_if = "Option::is_none", with = "hex_u128_opt")]
    pub value: Option<u128>,
    /// Call data or contract init code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Sender nonce
    #[serde(skip_serializing_if = "Option::is_none", with = "hex_i64_opt")]
    pub nonce: Option<i64>,
}

// ==================== Blocks ====================

/// Block object returned by the block and uncle lookups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Block number, null for a pending block
    #[serde(default, with = "hex_i64_opt")]
    pub number: Option<i64>,
    /// Block hash, null for a pending block
    #[serde(default)]
    pub hash: Option<String>,
    /// Parent block hash
    pub parent_hash: String,
    /// Proof-of-work nonce, null for a pending block
    #[serde(default)]
    pub nonce: Option<String>,
    /// Hash of the uncles list
    #[serde(default)]
    pub sha3_uncles: String,
    /// Bloom filter of the block's logs
    #[serde(default)]
    pub logs_bloom: Option<String>,
    /// Root of the transaction trie
    #[serde(default)]
    pub transactions_root: String,
    /// Root of the final state trie
    #[serde(default)]
    pub state_root: String,
    /// Root of the receipts trie
    #[serde(default)]
    pub receipts_root: String,
    /// Beneficiary of the mining reward
    #[serde(default)]
    pub miner: String,
    /// Difficulty of this block
    #[serde(default, with = "hex_u128_opt")]
    pub difficulty: Option<u128>,
    /// Total difficulty of the chain up to this block
    #[serde(default, with = "hex_u128_opt")]
    pub total_difficulty: Option<u128>,
    /// Extra data field
    #[serde(default)]
    pub extra_data: String,
    /// Block size in bytes
    #[serde(default, with = "hex_i64_opt")]
    pub size: Option<i64>,
    /// Maximum gas allowed in this block
    #[serde(with = "hex_i64")]
    pub gas_limit: i64,
    /// Total gas used by all transactions
    #[serde(with = "hex_i64")]
    pub gas_used: i64,
    /// Unix timestamp of collation
    #[serde(with = "hex_i64")]
    pub timestamp: i64,
    /// EIP-1559 base fee
    #[serde(default, with = "hex_u128_opt")]
    pub base_fee_per_gas: Option<u128>,
    /// Mix digest of the proof-of-work seal
    #[serde(default)]
    pub mix_hash: Option<String>,
    /// Transaction hashes or full objects, depending on the request flag
    #[serde(default)]
    pub transactions: BlockTransactions,
    /// Uncle hashes
    #[serde(default)]
    pub uncles: Vec<String>,
}

/// Transactions of a block
///
/// Lookups with `full_transactions = false` yield hashes, `true` yields
/// transaction objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockTransactions {
    /// Transaction hashes
    Hashes(Vec<String>),
    /// Full transaction objects
    Full(Vec<Transaction>),
}

impl Default for BlockTransactions {
    fn default() -> Self {
        BlockTransactions::Hashes(Vec::new())
    }
}

impl BlockTransactions {
    /// Number of transactions
    pub fn len(&self) -> usize {
        match self {
            BlockTransactions::Hashes(hashes) => hashes.len(),
            BlockTransactions::Full(txs) => txs.len(),
        }
    }

    /// Returns true if the block has no transactions
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transaction hashes, whichever shape was returned
    pub fn hashes(&self) -> Vec<&str> {
        match self {
            BlockTransactions::Hashes(hashes) => hashes.iter().map(String::as_str).collect(),
            BlockTransactions::Full(txs) => txs.iter().map(|tx| tx.hash.as_str()).collect(),
        }
    }

    /// Full transaction objects, if they were requested
    pub fn as_full(&self) -> Option<&[Transaction]> {
        match self {
            BlockTransactions::Full(txs) => Some(txs),
            BlockTransactions::Hashes(_) => None,
        }
    }
}

// ==================== Transactions ====================

/// Transaction object returned by the node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction hash
    pub hash: String,
    /// Sender nonce
    #[serde(with = "hex_i64")]
    pub nonce: i64,
    /// Containing block hash, null while pending
    #[serde(default)]
    pub block_hash: Option<String>,
    /// Containing block number, null while pending
    #[serde(default, with = "hex_i64_opt")]
    pub block_number: Option<i64>,
    /// Position in the block, null while pending
    #[serde(default, with = "hex_i64_opt")]
    pub transaction_index: Option<i64>,
    /// Sender address
    pub from: String,
    /// Recipient address, null for contract creation
    #[serde(default)]
    pub to: Option<String>,
    /// Value in wei
    #[serde(with = "hex_u128")]
    pub value: u128,
    /// Gas price in wei
    #[serde(default, with = "hex_u128_opt")]
    pub gas_price: Option<u128>,
    /// Gas limit
    #[serde(with = "hex_i64")]
    pub gas: i64,
    /// Call data
    #[serde(default)]
    pub input: String,
    /// Typed transaction envelope (EIP-2718)
    #[serde(default, rename = "type", with = "hex_i64_opt")]
    pub transaction_type: Option<i64>,
    /// EIP-1559 fee cap in wei
    #[serde(default, with = "hex_u128_opt")]
    pub max_fee_per_gas: Option<u128>,
    /// EIP-1559 tip cap in wei
    #[serde(default, with = "hex_u128_opt")]
    pub max_priority_fee_per_gas: Option<u128>,
    /// Chain id the transaction was signed for
    #[serde(default, with = "hex_i64_opt")]
    pub chain_id: Option<i64>,
    /// Signature recovery id
    #[serde(default)]
    pub v: Option<String>,
    /// Signature `r`
    #[serde(default)]
    pub r: Option<String>,
    /// Signature `s`
    #[serde(default)]
    pub s: Option<String>,
}

/// Receipt of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Transaction hash
    pub transaction_hash: String,
    /// Position in the block
    #[serde(with = "hex_i64")]
    pub transaction_index: i64,
    /// Containing block hash
    pub block_hash: String,
    /// Containing block number
    #[serde(with = "hex_i64")]
    pub block_number: i64,
    /// Sender address
    #[serde(default)]
    pub from: Option<String>,
    /// Recipient address, null for contract creation
    #[serde(default)]
    pub to: Option<String>,
    /// Gas used by this and all preceding transactions in the block
    #[serde(with = "hex_i64")]
    pub cumulative_gas_used: i64,
    /// Gas used by this transaction alone
    #[serde(with = "hex_i64")]
    pub gas_used: i64,
    /// Address of the created contract, if any
    #[serde(default)]
    pub contract_address: Option<String>,
    /// Logs emitted by the transaction
    #[serde(default)]
    pub logs: Vec<Log>,
    /// Bloom filter of the logs
    #[serde(default)]
    pub logs_bloom: String,
    /// `1` on success, `0` on failure (post-Byzantium)
    #[serde(default, with = "hex_i64_opt")]
    pub status: Option<i64>,
    /// Intermediate state root (pre-Byzantium)
    #[serde(default)]
    pub root: Option<String>,
    /// Price per gas actually paid, in wei
    #[serde(default, with = "hex_u128_opt")]
    pub effective_gas_price: Option<u128>,
}

impl TransactionReceipt {
    /// Whether the transaction succeeded; `None` for pre-Byzantium receipts
    pub fn succeeded(&self) -> Option<bool> {
        self.status.map(|status| status == 1)
    }
}

/// Log entry emitted by a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// Emitting contract address
    pub address: String,
    /// Indexed event topics
    #[serde(default)]
    pub topics: Vec<String>,
    /// Non-indexed event data
    #[serde(default)]
    pub data: String,
    /// Containing block number, null while pending
    #[serde(default, with = "hex_i64_opt")]
    pub block_number: Option<i64>,
    /// Containing block hash, null while pending
    #[serde(default)]
    pub block_hash: Option<String>,
    /// Emitting transaction hash, null while pending
    #[serde(default)]
    pub transaction_hash: Option<String>,
    /// Position of the transaction in the block
    #[serde(default, with = "hex_i64_opt")]
    pub transaction_index: Option<i64>,
    /// Position of the log in the block
    #[serde(default, with = "hex_i64_opt")]
    pub log_index: Option<i64>,
    /// True when the log was removed by a chain reorganization
    #[serde(default)]
    pub removed: bool,
}

// ==================== Mining ====================

/// Proof-of-work package returned by `eth_getWork`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Vec<String>")]
pub struct WorkPackage {
    /// Current block header pow-hash
    pub pow_hash: String,
    /// Seed hash used for the DAG
    pub seed_hash: String,
    /// Boundary condition ("target"), 2^256 / difficulty
    pub boundary: String,
}

impl TryFrom<Vec<String>> for WorkPackage {
    type Error = String;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        let mut parts = parts.into_iter();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(pow_hash), Some(seed_hash), Some(boundary)) => Ok(Self {
                pow_hash,
                seed_hash,
                boundary,
            }),
            _ => Err("expected at least 3 work package entries".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_id_serialize() {
        assert_eq!(
            serde_json::to_string(&BlockId::Latest).unwrap(),
            "\"latest\""
        );
        assert_eq!(
            serde_json::to_string(&BlockId::Number(100)).unwrap(),
            "\"0x64\""
        );
        assert_eq!(
            serde_json::to_string(&BlockId::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&BlockId::Number(0)).unwrap(),
            "\"0x0\""
        );
    }

    #[test]
    fn test_block_id_from_str() {
        assert_eq!("latest".parse::<BlockId>().unwrap(), BlockId::Latest);
        assert_eq!("Finalized".parse::<BlockId>().unwrap(), BlockId::Finalized);
        assert_eq!("0x64".parse::<BlockId>().unwrap(), BlockId::Number(100));
        assert_eq!("100".parse::<BlockId>().unwrap(), BlockId::Number(100));
        assert!("newest".parse::<BlockId>().is_err());
        assert!("0x".parse::<BlockId>().is_err());
    }

    #[test]
    fn test_sync_status_not_syncing() {
        let status: SyncStatus = serde_json::from_value(json!(false)).unwrap();
        assert_eq!(status, SyncStatus::NotSyncing);
        assert!(!status.is_syncing());
        assert!(status.progress().is_none());
    }

    #[test]
    fn test_sync_status_syncing() {
        let status: SyncStatus = serde_json::from_value(json!({
            "startingBlock": "0x0",
            "currentBlock": "0x1",
            "highestBlock": "0xa"
        }))
        .unwrap();
        let progress = status.progress().unwrap();
        assert_eq!(progress.starting_block, 0);
        assert_eq!(progress.current_block, 1);
        assert_eq!(progress.highest_block, 10);
        assert_eq!(progress.pulled_states, None);
    }

    #[test]
    fn test_sync_status_rejects_other_shapes() {
        assert!(serde_json::from_value::<SyncStatus>(json!(true)).is_err());
        assert!(serde_json::from_value::<SyncStatus>(json!("0x1")).is_err());
        assert!(serde_json::from_value::<SyncStatus>(json!({"currentBlock": "0x1"})).is_err());
    }

    #[test]
    fn test_sync_status_serialize() {
        assert_eq!(
            serde_json::to_value(SyncStatus::NotSyncing).unwrap(),
            json!(false)
        );
        let syncing = SyncStatus::Syncing(SyncProgress {
            starting_block: 0,
            current_block: 1,
            highest_block: 10,
            pulled_states: None,
            known_states: None,
        });
        assert_eq!(
            serde_json::to_value(syncing).unwrap(),
            json!({"startingBlock": "0x0", "currentBlock": "0x1", "highestBlock": "0xa"})
        );
    }

    #[test]
    fn test_transaction_request_omits_unset_fields() {
        let tx = TransactionRequest {
            from: Some("0xb60e8dd61c5d32be8058bb8eb970870f07233155".to_string()),
            to: Some("0xd46e8dd67c5d32be8058bb8eb970870f07244567".to_string()),
            gas: Some(30400),
            value: Some(2_441_406_250),
            ..Default::default()
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(
            json,
            json!({
                "from": "0xb60e8dd61c5d32be8058bb8eb970870f07233155",
                "to": "0xd46e8dd67c5d32be8058bb8eb970870f07244567",
                "gas": "0x76c0",
                "value": "0x9184e72a"
            })
        );
    }

    #[test]
    fn test_transaction_request_empty() {
        let json = serde_json::to_value(TransactionRequest::default()).unwrap();
        assert_eq!(json, json!({}));
    }

    #[test]
    fn test_work_package_from_array() {
        let work: WorkPackage = serde_json::from_value(json!([
            "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
            "0x5eed00000000000000000000000000005eed0000000000000000000000000000",
            "0xd1ff1c01710000000000000000000000d1ff1c01710000000000000000000000"
        ]))
        .unwrap();
        assert!(work.pow_hash.starts_with("0x1234"));
        assert!(work.seed_hash.starts_with("0x5eed"));
        assert!(work.boundary.starts_with("0xd1ff"));

        assert!(serde_json::from_value::<WorkPackage>(json!(["0x1", "0x2"])).is_err());
    }

    #[test]
    fn test_receipt_status() {
        let receipt: TransactionReceipt = serde_json::from_value(json!({
            "transactionHash": "0xb903239f8543d04b5dc1ba6579132b143087c68db1b2168786408fcbce568238",
            "transactionIndex": "0x1",
            "blockHash": "0xc6ef2fc5426d6ad6fd9e2a26abeab0aa2411b7ab17f30a99d3cb96aed1d1055b",
            "blockNumber": "0xb",
            "cumulativeGasUsed": "0x33bc",
            "gasUsed": "0x4dc",
            "contractAddress": null,
            "logs": [],
            "status": "0x1"
        }))
        .unwrap();
        assert_eq!(receipt.block_number, 11);
        assert_eq!(receipt.cumulative_gas_used, 13244);
        assert_eq!(receipt.succeeded(), Some(true));
        assert!(receipt.contract_address.is_none());
    }
}
