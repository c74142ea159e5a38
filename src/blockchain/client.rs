//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint
//! - Query chain state (chain id, block number, balances)
//! - Handle timeouts and network errors gracefully
//! - Provide health check for blockchain connectivity

use std::time::{Duration, Instant};

use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
use crate::blockchain::units::{parse_address, wei_to_ether};
use crate::observability::metrics;

/// Blockchain RPC client wrapper.
///
/// Constructed once at startup and shared read-only across requests.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: DynProvider,
    /// Configuration.
    config: BlockchainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// Fails only on an unparseable RPC URL. When `chain_id` is configured the
    /// endpoint is checked once; a mismatch or an unreachable endpoint is
    /// logged and tolerated.
    pub async fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);

        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        let client = Self {
            provider,
            config: config.clone(),
            timeout_duration,
        };

        if let Some(expected) = config.chain_id {
            match client.verify_chain_id(expected).await {
                Ok(()) => {
                    tracing::info!(chain_id = expected, "Blockchain client initialized");
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Blockchain client initialized but chain verification failed"
                    );
                    // Don't fail initialization - allow graceful degradation
                }
            }
        } else {
            tracing::info!("Blockchain client initialized");
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches `expected`.
    pub async fn verify_chain_id(&self, expected: u64) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != expected {
            return Err(BlockchainError::ChainMismatch {
                expected,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        match timeout(self.timeout_duration, self.provider.get_chain_id()).await {
            Ok(Ok(id)) => Ok(ChainId(id)),
            Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        match timeout(self.timeout_duration, self.provider.get_block_number()).await {
            Ok(Ok(number)) => Ok(number),
            Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// Get the balance of an address in wei.
    pub async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        let started = Instant::now();
        let result = match timeout(self.timeout_duration, self.provider.get_balance(address)).await {
            Ok(Ok(balance)) => Ok(balance),
            Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.config.rpc_timeout_secs)),
        };

        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::record_upstream("rpc", outcome, started);
        result
    }

    /// Balance of a hex address, rendered in ether.
    pub async fn get_ether_balance(&self, address: &str) -> BlockchainResult<String> {
        let address = parse_address(address)?;
        let wei = self.get_balance(address).await?;
        tracing::debug!(address = %address, wei = %wei, "Fetched balance");
        Ok(wei_to_ether(wei))
    }

    /// Check if the blockchain is reachable and healthy.
    ///
    /// Returns true if we can query the block number.
    pub async fn is_healthy(&self) -> bool {
        self.get_block_number().await.is_ok()
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The RPC URL usually embeds an API key.
        f.debug_struct("BlockchainClient")
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish_non_exhaustive()
    }
}
