//! # ethapi
//!
//! Typed Rust bindings for Ethereum's `eth_*` JSON-RPC methods.
//!
//! Every method builds its positional params, sends them through a
//! [`Transport`], and decodes the result into a typed value. An error
//! object from the node becomes [`EthApiError::Rpc`]; a result of the
//! wrong shape becomes [`EthApiError::Decode`].
//!
//! ## Features
//!
//! - **EthClient**: one async method per supported `eth_*` call
//! - **Transport**: pluggable wire; `HttpTransport` (feature `http`) and `MockTransport`
//! - **quantity**: strict `0x` hex quantity codec
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ethapi::{BlockId, EthClient, SyncStatus};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EthClient::http("http://localhost:8545")?;
//!
//!     let head = client.block_number().await?;
//!     println!("Head: {}", head);
//!
//!     match client.syncing().await? {
//!         SyncStatus::NotSyncing => println!("in sync"),
//!         SyncStatus::Syncing(p) => println!("{}/{}", p.current_block, p.highest_block),
//!     }
//!
//!     let balance = client
//!         .get_balance("0x407d73d8a49eeb85d32cf465507dd71d507100c1", BlockId::Latest)
//!         .await?;
//!     println!("Balance: {} wei", balance);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Testing Against a Mock
//!
//! ```rust
//! use ethapi::{EthClient, MockTransport};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let transport = MockTransport::new();
//! transport.set_response("eth_blockNumber", json!("0x4"));
//! transport.set_error("eth_coinbase", -32000, "no coinbase");
//!
//! let client = EthClient::with_transport(transport);
//! assert_eq!(client.block_number().await.unwrap(), 4);
//! assert_eq!(client.coinbase().await.unwrap_err().to_string(), "no coinbase");
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
pub mod decode;
mod error;
pub mod methods;
pub mod quantity;
mod transport;
pub mod types;

// Re-export main types
pub use client::EthClient;
pub use error::{EthApiError, Result};
pub use transport::{HttpConfig, MockTransport, RpcErrorObject, RpcResponse};

/// Re-export Transport trait for custom implementations
pub use transport::Transport;

#[cfg(feature = "http")]
pub use transport::HttpTransport;

pub use quantity::{format_quantity, parse_big_quantity, parse_quantity};
pub use types::{
    Block, BlockId, BlockTransactions, Log, SyncProgress, SyncStatus, Transaction,
    TransactionReceipt, TransactionRequest, WorkPackage,
};
