//! CLI configuration management

use ethapi::{BlockId, EthClient, HttpConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::CliError;

/// Endpoint name that selects the in-process mock node
pub const MOCK_ENDPOINT: &str = "mock";

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint URL
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Default block for state queries
    #[serde(default = "default_block")]
    pub block: String,
    /// Bearer token for authenticated endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

fn default_rpc_url() -> String {
    "http://localhost:8545".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_block() -> String {
    "latest".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            timeout_ms: default_timeout_ms(),
            block: default_block(),
            bearer_token: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".ethapi"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from file or return default
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| {
                if path.exists() {
                    std::fs::read_to_string(&path).ok()
                } else {
                    None
                }
            })
            .and_then(|content| match toml::from_str(&content) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!("ignoring unreadable config file: {}", e);
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<(), CliError> {
        let path = Self::config_path()
            .ok_or_else(|| CliError::Config("Cannot determine config path".to_string()))?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))?;

        std::fs::write(&path, content)?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Block to use when a command does not name one
    pub fn default_block(&self) -> Result<BlockId, CliError> {
        parse_block(&self.block)
    }

    /// Build a client for the configured endpoint
    pub fn client(&self) -> Result<EthClient, CliError> {
        if self.rpc_url == MOCK_ENDPOINT {
            return Ok(EthClient::new_mock());
        }
        let http = HttpConfig {
            url: self.rpc_url.clone(),
            timeout_ms: self.timeout_ms,
            bearer_token: self.bearer_token.clone(),
        };
        Ok(EthClient::from_config(&http)?)
    }
}

/// Parse a block argument: tag, `0x` quantity, or decimal number
pub fn parse_block(block: &str) -> Result<BlockId, CliError> {
    block
        .parse()
        .map_err(|_| CliError::InvalidInput(format!("invalid block: {}", block)))
}

/// Resolve an optional block argument against the config default
pub fn block_or_default(block: Option<String>, config: &Config) -> Result<BlockId, CliError> {
    match block {
        Some(block) => parse_block(&block),
        None => config.default_block(),
    }
}
