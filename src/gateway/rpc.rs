//! JSON-RPC client with timeout and failover handling.
//!
//! # Responsibilities
//! - Connect to the primary and failover JSON-RPC endpoints
//! - Query chain state (block number, nonce, gas price, receipts, logs)
//! - Execute read calls and broadcast signed transactions
//! - Handle timeouts and network errors gracefully

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, Log, TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::GatewayConfig;
use crate::gateway::types::{ChainId, GatewayError, GatewayResult};
use crate::observability::metrics;

/// JSON-RPC client wrapper with failover support.
///
/// When constructed with a signer, transaction submission signs locally
/// before broadcasting; without one the client is read-only.
#[derive(Clone)]
pub struct RpcClient {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Configuration.
    config: GatewayConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl RpcClient {
    /// Create a new RPC client, optionally attaching a signing key.
    pub async fn new(config: GatewayConfig, signer: Option<PrivateKeySigner>) -> GatewayResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let connect = |url: url::Url| -> Arc<dyn Provider + Send + Sync> {
            match &signer {
                Some(signer) => Arc::new(
                    ProviderBuilder::new()
                        .wallet(EthereumWallet::from(signer.clone()))
                        .connect_http(url),
                ),
                None => Arc::new(ProviderBuilder::new().connect_http(url)),
            }
        };

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            GatewayError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(connect(primary_url));

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(connect(url));
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            config: config.clone(),
            timeout_duration,
        };

        // Verify chain ID matches configuration
        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "RPC client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "RPC client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> GatewayResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(GatewayError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> GatewayResult<ChainId> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(self.all_failed("get chain id"))
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> GatewayResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_block_number();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(self.all_failed("get block number"))
    }

    /// Get the transaction count (nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> GatewayResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_count(address);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(self.all_failed("get transaction count"))
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> GatewayResult<u128> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_gas_price();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(self.all_failed("get gas price"))
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> GatewayResult<Option<TransactionReceipt>> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_receipt(tx_hash);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(self.all_failed("get receipt"))
    }

    /// Fetch logs matching a filter.
    pub async fn get_logs(&self, filter: &Filter) -> GatewayResult<Vec<Log>> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_logs(filter);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(self.all_failed("get logs"))
    }

    /// Execute a read-only call against the latest block.
    pub async fn call(&self, tx: &TransactionRequest) -> GatewayResult<Bytes> {
        let mut last_error = String::new();
        let mut timed_out = false;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.call(tx.clone());
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    timed_out = false;
                    last_error = e.to_string();
                    tracing::warn!(provider_idx = i, error = %e, "RPC error");
                }
                Err(_) => {
                    timed_out = true;
                    tracing::warn!(provider_idx = i, "RPC timeout");
                }
            }
        }
        metrics::record_rpc_error("call");
        if timed_out {
            return Err(GatewayError::Timeout(self.config.rpc_timeout_secs));
        }
        Err(GatewayError::Rpc(format!(
            "All RPC providers failed to call: {}",
            last_error
        )))
    }

    /// Sign and broadcast a transaction, returning its hash.
    ///
    /// Requires the client to have been built with a signer; the providers'
    /// wallet filler signs before broadcast.
    pub async fn send_transaction(&self, tx: TransactionRequest) -> GatewayResult<TxHash> {
        let mut last_error = String::new();
        let mut timed_out = false;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.send_transaction(tx.clone());
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(pending)) => return Ok(*pending.tx_hash()),
                Ok(Err(e)) => {
                    timed_out = false;
                    last_error = e.to_string();
                    tracing::warn!(provider_idx = i, error = %e, "RPC error");
                }
                Err(_) => {
                    timed_out = true;
                    tracing::warn!(provider_idx = i, "RPC timeout");
                }
            }
        }
        metrics::record_rpc_error("send_transaction");
        if timed_out {
            return Err(GatewayError::Timeout(self.config.rpc_timeout_secs));
        }
        Err(GatewayError::Rpc(format!(
            "All RPC providers failed to send transaction: {}",
            last_error
        )))
    }

    /// Get the configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Get the number of confirmation blocks required.
    pub fn confirmation_blocks(&self) -> u32 {
        self.config.confirmation_blocks
    }

    fn all_failed(&self, what: &str) -> GatewayError {
        metrics::record_rpc_error(what);
        GatewayError::Rpc(format!("All RPC providers failed to {}", what))
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
