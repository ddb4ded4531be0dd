//! EthClient - typed `eth_*` bindings

use serde::Serialize;
use serde_json::Value;

use crate::decode::{decode_bool, decode_quantity, decode_result, decode_string};
use crate::error::{EthApiError, Result};
use crate::methods;
use crate::quantity::format_quantity;
use crate::transport::{MockTransport, Transport};
use crate::types::{Block, BlockId, SyncStatus, Transaction, TransactionReceipt, TransactionRequest, WorkPackage};

#[cfg(feature = "http")]
use crate::transport::{HttpConfig, HttpTransport};

/// Ethereum JSON-RPC client
///
/// Holds nothing but its transport, so it can be shared across tasks.
pub struct EthClient {
    transport: Box<dyn Transport>,
}

impl EthClient {
    /// Create a new client with HTTP transport
    #[cfg(feature = "http")]
    pub fn http(url: &str) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(url)?))
    }

    /// Create a new client with HTTP transport from config
    #[cfg(feature = "http")]
    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::from_config(config)?))
    }

    /// Create a new client with mock transport (for testing)
    pub fn new_mock() -> Self {
        Self::with_transport(MockTransport::new())
    }

    /// Create a client with a custom transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    /// Send a request and unwrap the result, failing on an error object
    async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        tracing::debug!(%method, params = params.len(), "rpc request");

        let response = self.transport.call(method, params).await?;
        response.into_result().inspect_err(|e| {
            if let EthApiError::Rpc { code, message, .. } = e {
                tracing::debug!(%method, code, %message, "rpc error");
            }
        })
    }

    /// Send any supported method with raw params and return the raw result
    pub async fn request_raw(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        if !methods::is_supported(method) {
            return Err(EthApiError::Unsupported(method.to_string()));
        }
        self.request(method, params).await
    }

    // ==================== Node Info ====================

    /// Current Ethereum protocol version
    pub async fn protocol_version(&self) -> Result<String> {
        let result = self.request(methods::PROTOCOL_VERSION, vec![]).await?;
        decode_string(methods::PROTOCOL_VERSION, result)
    }

    /// Sync status: [`SyncStatus::NotSyncing`] or progress
    pub async fn syncing(&self) -> Result<SyncStatus> {
        let result = self.request(methods::SYNCING, vec![]).await?;
        decode_result(methods::SYNCING, result)
    }

    /// Coinbase address
    pub async fn coinbase(&self) -> Result<String> {
        let result = self.request(methods::COINBASE, vec![]).await?;
        decode_string(methods::COINBASE, result)
    }

    /// Whether the node is mining
    pub async fn mining(&self) -> Result<bool> {
        let result = self.request(methods::MINING, vec![]).await?;
        decode_bool(methods::MINING, result)
    }

    /// Hashes per second the node is mining with
    pub async fn hashrate(&self) -> Result<i64> {
        let result = self.request(methods::HASHRATE, vec![]).await?;
        decode_quantity(methods::HASHRATE, result)
    }

    /// Current gas price in wei
    pub async fn gas_price(&self) -> Result<i64> {
        let result = self.request(methods::GAS_PRICE, vec![]).await?;
        decode_quantity(methods::GAS_PRICE, result)
    }

    /// Addresses owned by the node
    pub async fn accounts(&self) -> Result<Vec<String>> {
        let result = self.request(methods::ACCOUNTS, vec![]).await?;
        decode_result(methods::ACCOUNTS, result)
    }

    /// Number of the most recent block
    pub async fn block_number(&self) -> Result<i64> {
        let result = self.request(methods::BLOCK_NUMBER, vec![]).await?;
        decode_quantity(methods::BLOCK_NUMBER, result)
    }

    // ==================== Account State ====================

    /// Balance of `address` in wei
    pub async fn get_balance(&self, address: &str, block: BlockId) -> Result<i64> {
        let params = vec![Value::from(address), param(block)?];
        let result = self.request(methods::GET_BALANCE, params).await?;
        decode_quantity(methods::GET_BALANCE, result)
    }

    /// Value of the storage slot at `position`
    pub async fn get_storage_at(
        &self,
        address: &str,
        position: &str,
        block: BlockId,
    ) -> Result<String> {
        let params = vec![Value::from(address), Value::from(position), param(block)?];
        let result = self.request(methods::GET_STORAGE_AT, params).await?;
        decode_string(methods::GET_STORAGE_AT, result)
    }

    /// Number of transactions sent from `address` (its nonce)
    pub async fn get_transaction_count(&self, address: &str, block: BlockId) -> Result<i64> {
        let params = vec![Value::from(address), param(block)?];
        let result = self.request(methods::GET_TRANSACTION_COUNT, params).await?;
        decode_quantity(methods::GET_TRANSACTION_COUNT, result)
    }

    /// Code at `address`
    pub async fn get_code(&self, address: &str, block: BlockId) -> Result<String> {
        let params = vec![Value::from(address), param(block)?];
        let result = self.request(methods::GET_CODE, params).await?;
        decode_string(methods::GET_CODE, result)
    }

    // ==================== Block Counts ====================

    /// Number of transactions in the block with `block_hash`
    pub async fn get_block_transaction_count_by_hash(&self, block_hash: &str) -> Result<i64> {
        let result = self
            .request(methods::GET_BLOCK_TRANSACTION_COUNT_BY_HASH, vec![Value::from(block_hash)])
            .await?;
        decode_quantity(methods::GET_BLOCK_TRANSACTION_COUNT_BY_HASH, result)
    }

    /// Number of transactions in `block`
    pub async fn get_block_transaction_count_by_number(&self, block: BlockId) -> Result<i64> {
        let result = self
            .request(methods::GET_BLOCK_TRANSACTION_COUNT_BY_NUMBER, vec![param(block)?])
            .await?;
        decode_quantity(methods::GET_BLOCK_TRANSACTION_COUNT_BY_NUMBER, result)
    }

    /// Number of uncles in the block with `block_hash`
    pub async fn get_uncle_count_by_block_hash(&self, block_hash: &str) -> Result<i64> {
        let result = self
            .request(methods::GET_UNCLE_COUNT_BY_BLOCK_HASH, vec![Value::from(block_hash)])
            .await?;
        decode_quantity(methods::GET_UNCLE_COUNT_BY_BLOCK_HASH, result)
    }

    /// Number of uncles in `block`
    pub async fn get_uncle_count_by_block_number(&self, block: BlockId) -> Result<i64> {
        let result = self
            .request(methods::GET_UNCLE_COUNT_BY_BLOCK_NUMBER, vec![param(block)?])
            .await?;
        decode_quantity(methods::GET_UNCLE_COUNT_BY_BLOCK_NUMBER, result)
    }

    // ==================== Signing & Submission ====================

    /// Sign `data` with the key of `address` (must be unlocked on the node)
    pub async fn sign(&self, address: &str, data: &str) -> Result<String> {
        let params = vec![Value::from(address), Value::from(data)];
        let result = self.request(methods::SIGN, params).await?;
        decode_string(methods::SIGN, result)
    }

    /// Have the node sign and send `tx`; returns the transaction hash
    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String> {
        let result = self
            .request(methods::SEND_TRANSACTION, vec![param(tx)?])
            .await?;
        decode_string(methods::SEND_TRANSACTION, result)
    }

    /// Send a signed, encoded transaction; returns the transaction hash
    pub async fn send_raw_transaction(&self, data: &str) -> Result<String> {
        let result = self
            .request(methods::SEND_RAW_TRANSACTION, vec![Value::from(data)])
            .await?;
        decode_string(methods::SEND_RAW_TRANSACTION, result)
    }

    // ==================== Call & Estimation ====================

    /// Execute a message call without creating a transaction
    pub async fn call(&self, tx: &TransactionRequest, block: BlockId) -> Result<String> {
        let result = self
            .request(methods::CALL, vec![param(tx)?, param(block)?])
            .await?;
        decode_string(methods::CALL, result)
    }

    /// Estimate the gas `tx` would use
    pub async fn estimate_gas(&self, tx: &TransactionRequest, block: BlockId) -> Result<i64> {
        let result = self
            .request(methods::ESTIMATE_GAS, vec![param(tx)?, param(block)?])
            .await?;
        decode_quantity(methods::ESTIMATE_GAS, result)
    }

    // ==================== Block Queries ====================

    /// Block with `block_hash`; `None` if the node does not know it
    pub async fn get_block_by_hash(
        &self,
        block_hash: &str,
        full_transactions: bool,
    ) -> Result<Option<Block>> {
        let params = vec![Value::from(block_hash), Value::Bool(full_transactions)];
        let result = self.request(methods::GET_BLOCK_BY_HASH, params).await?;
        decode_result(methods::GET_BLOCK_BY_HASH, result)
    }

    /// Block at `block`; `None` if it does not exist yet
    pub async fn get_block_by_number(
        &self,
        block: BlockId,
        full_transactions: bool,
    ) -> Result<Option<Block>> {
        let params = vec![param(block)?, Value::Bool(full_transactions)];
        let result = self.request(methods::GET_BLOCK_BY_NUMBER, params).await?;
        decode_result(methods::GET_BLOCK_BY_NUMBER, result)
    }

    /// Uncle at `index` of the block with `block_hash`
    pub async fn get_uncle_by_block_hash_and_index(
        &self,
        block_hash: &str,
        index: u64,
    ) -> Result<Option<Block>> {
        let params = vec![Value::from(block_hash), index_param(index)];
        let result = self
            .request(methods::GET_UNCLE_BY_BLOCK_HASH_AND_INDEX, params)
            .await?;
        decode_result(methods::GET_UNCLE_BY_BLOCK_HASH_AND_INDEX, result)
    }

    /// Uncle at `index` of `block`
    pub async fn get_uncle_by_block_number_and_index(
        &self,
        block: BlockId,
        index: u64,
    ) -> Result<Option<Block>> {
        let params = vec![param(block)?, index_param(index)];
        let result = self
            .request(methods::GET_UNCLE_BY_BLOCK_NUMBER_AND_INDEX, params)
            .await?;
        decode_result(methods::GET_UNCLE_BY_BLOCK_NUMBER_AND_INDEX, result)
    }

    // ==================== Transaction Queries ====================

    /// Transaction with `tx_hash`
    pub async fn get_transaction_by_hash(&self, tx_hash: &str) -> Result<Option<Transaction>> {
        let result = self
            .request(methods::GET_TRANSACTION_BY_HASH, vec![Value::from(tx_hash)])
            .await?;
        decode_result(methods::GET_TRANSACTION_BY_HASH, result)
    }

    /// Transaction at `index` of the block with `block_hash`
    pub async fn get_transaction_by_block_hash_and_index(
        &self,
        block_hash: &str,
        index: u64,
    ) -> Result<Option<Transaction>> {
        let params = vec![Value::from(block_hash), index_param(index)];
        let result = self
            .request(methods::GET_TRANSACTION_BY_BLOCK_HASH_AND_INDEX, params)
            .await?;
        decode_result(methods::GET_TRANSACTION_BY_BLOCK_HASH_AND_INDEX, result)
    }

    /// Transaction at `index` of `block`
    pub async fn get_transaction_by_block_number_and_index(
        &self,
        block: BlockId,
        index: u64,
    ) -> Result<Option<Transaction>> {
        let params = vec![param(block)?, index_param(index)];
        let result = self
            .request(methods::GET_TRANSACTION_BY_BLOCK_NUMBER_AND_INDEX, params)
            .await?;
        decode_result(methods::GET_TRANSACTION_BY_BLOCK_NUMBER_AND_INDEX, result)
    }

    /// Receipt of `tx_hash`; `None` while the transaction is pending
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: &str,
    ) -> Result<Option<TransactionReceipt>> {
        let result = self
            .request(methods::GET_TRANSACTION_RECEIPT, vec![Value::from(tx_hash)])
            .await?;
        decode_result(methods::GET_TRANSACTION_RECEIPT, result)
    }

    // ==================== Compilers & Filters ====================

    /// Compilers available on the node
    pub async fn get_compilers(&self) -> Result<Vec<String>> {
        let result = self.request(methods::GET_COMPILERS, vec![]).await?;
        decode_result(methods::GET_COMPILERS, result)
    }

    /// Install a new-block filter; returns the filter id
    pub async fn new_block_filter(&self) -> Result<String> {
        let result = self.request(methods::NEW_BLOCK_FILTER, vec![]).await?;
        decode_string(methods::NEW_BLOCK_FILTER, result)
    }

    /// Install a pending-transaction filter; returns the filter id
    pub async fn new_pending_transaction_filter(&self) -> Result<String> {
        let result = self
            .request(methods::NEW_PENDING_TRANSACTION_FILTER, vec![])
            .await?;
        decode_string(methods::NEW_PENDING_TRANSACTION_FILTER, result)
    }

    // ==================== Mining ====================

    /// Current proof-of-work package
    pub async fn get_work(&self) -> Result<WorkPackage> {
        let result = self.request(methods::GET_WORK, vec![]).await?;
        decode_result(methods::GET_WORK, result)
    }

    /// Submit a proof-of-work solution; true if it was accepted
    pub async fn submit_work(&self, nonce: &str, pow_hash: &str, mix_digest: &str) -> Result<bool> {
        let params = vec![Value::from(nonce), Value::from(pow_hash), Value::from(mix_digest)];
        let result = self.request(methods::SUBMIT_WORK, params).await?;
        decode_bool(methods::SUBMIT_WORK, result)
    }

    /// Report an external miner's hashrate under client `id`
    pub async fn submit_hashrate(&self, hashrate: &str, id: &str) -> Result<bool> {
        let params = vec![Value::from(hashrate), Value::from(id)];
        let result = self.request(methods::SUBMIT_HASHRATE, params).await?;
        decode_bool(methods::SUBMIT_HASHRATE, result)
    }
}

// ==================== Helper Functions ====================

fn param<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn index_param(index: u64) -> Value {
    Value::String(format_quantity(u128::from(index)))
}
