//! `eth_*` method names

/// Current protocol version
pub const PROTOCOL_VERSION: &str = "eth_protocolVersion";
/// Sync status, or `false`
pub const SYNCING: &str = "eth_syncing";
/// Coinbase address
pub const COINBASE: &str = "eth_coinbase";
/// Whether the node is mining
pub const MINING: &str = "eth_mining";
/// Hashes per second while mining
pub const HASHRATE: &str = "eth_hashrate";
/// Current gas price in wei
pub const GAS_PRICE: &str = "eth_gasPrice";
/// Addresses owned by the node
pub const ACCOUNTS: &str = "eth_accounts";
/// Most recent block number
pub const BLOCK_NUMBER: &str = "eth_blockNumber";
/// Balance of an address
pub const GET_BALANCE: &str = "eth_getBalance";
/// Value of a storage slot
pub const GET_STORAGE_AT: &str = "eth_getStorageAt";
/// Transactions sent from an address
pub const GET_TRANSACTION_COUNT: &str = "eth_getTransactionCount";
/// Transaction count of a block, by hash
pub const GET_BLOCK_TRANSACTION_COUNT_BY_HASH: &str = "eth_getBlockTransactionCountByHash";
/// Transaction count of a block, by number
pub const GET_BLOCK_TRANSACTION_COUNT_BY_NUMBER: &str = "eth_getBlockTransactionCountByNumber";
/// Uncle count of a block, by hash
pub const GET_UNCLE_COUNT_BY_BLOCK_HASH: &str = "eth_getUncleCountByBlockHash";
/// Uncle count of a block, by number
pub const GET_UNCLE_COUNT_BY_BLOCK_NUMBER: &str = "eth_getUncleCountByBlockNumber";
/// Code at an address
pub const GET_CODE: &str = "eth_getCode";
/// Sign data with a node-held key
pub const SIGN: &str = "eth_sign";
/// Sign and send a transaction
pub const SEND_TRANSACTION: &str = "eth_sendTransaction";
/// Send a signed transaction
pub const SEND_RAW_TRANSACTION: &str = "eth_sendRawTransaction";
/// Execute a call without a transaction
pub const CALL: &str = "eth_call";
/// Estimate gas for a transaction
pub const ESTIMATE_GAS: &str = "eth_estimateGas";
/// Block by hash
pub const GET_BLOCK_BY_HASH: &str = "eth_getBlockByHash";
/// Block by number or tag
pub const GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";
/// Transaction by hash
pub const GET_TRANSACTION_BY_HASH: &str = "eth_getTransactionByHash";
/// Transaction by block hash and position
pub const GET_TRANSACTION_BY_BLOCK_HASH_AND_INDEX: &str = "eth_getTransactionByBlockHashAndIndex";
/// Transaction by block number and position
pub const GET_TRANSACTION_BY_BLOCK_NUMBER_AND_INDEX: &str =
    "eth_getTransactionByBlockNumberAndIndex";
/// Receipt of a mined transaction
pub const GET_TRANSACTION_RECEIPT: &str = "eth_getTransactionReceipt";
/// Uncle by block hash and position
pub const GET_UNCLE_BY_BLOCK_HASH_AND_INDEX: &str = "eth_getUncleByBlockHashAndIndex";
/// Uncle by block number and position
pub const GET_UNCLE_BY_BLOCK_NUMBER_AND_INDEX: &str = "eth_getUncleByBlockNumberAndIndex";
/// Compilers available on the node
pub const GET_COMPILERS: &str = "eth_getCompilers";
/// Install a new-block filter
pub const NEW_BLOCK_FILTER: &str = "eth_newBlockFilter";
/// Install a pending-transaction filter
pub const NEW_PENDING_TRANSACTION_FILTER: &str = "eth_newPendingTransactionFilter";
/// Current proof-of-work package
pub const GET_WORK: &str = "eth_getWork";
/// Submit a proof-of-work solution
pub const SUBMIT_WORK: &str = "eth_submitWork";
/// Report an external miner's hashrate
pub const SUBMIT_HASHRATE: &str = "eth_submitHashrate";

/// Methods this binding refuses to send.
///
/// Log filters and subscriptions need a polling or streaming layer the
/// binding does not have; the compile endpoints were removed from clients.
pub const UNSUPPORTED: &[&str] = &[
    "eth_newFilter",
    "eth_uninstallFilter",
    "eth_getFilterChanges",
    "eth_getFilterLogs",
    "eth_getLogs",
    "eth_subscribe",
    "eth_unsubscribe",
    "eth_compileLLL",
    "eth_compileSolidity",
    "eth_compileSerpent",
];

/// Returns false for methods listed in [`UNSUPPORTED`]
pub fn is_supported(method: &str) -> bool {
    !UNSUPPORTED.contains(&method)
}
