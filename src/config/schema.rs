//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the sponsorship client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Contract gateway connection settings.
    pub gateway: GatewayConfig,

    /// Fixed payment attached to every sponsorship.
    pub payment: PaymentConfig,
}

/// Contract gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 59141 for Linea Sepolia, 31337 for local Anvil).
    pub chain_id: u64,

    /// Address of the deployed sponsorship contract.
    pub contract_address: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required for finality.
    pub confirmation_blocks: u32,

    /// Polling interval for the live event feed, in milliseconds.
    pub poll_interval_ms: u64,

    /// Gas price multiplier (1.0 = estimated, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 59141,
            contract_address: "0xa4992B503da9eB548CeEc3DE25EB4aCFC7f12141".to_string(),
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            poll_interval_ms: 4000,
            gas_price_multiplier: 1.2,
            max_gas_price_gwei: 500,
        }
    }
}

/// Fixed payment configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// Amount of native token sent with every sponsorship, in ether
    /// (decimal string, e.g. "0.001").
    pub amount_eth: String,

    /// Fixed gas limit attached to the submission transaction.
    pub gas_limit: u64,

    /// Maximum time to wait for transaction confirmation, in seconds.
    pub confirmation_timeout_secs: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            amount_eth: "0.001".to_string(),
            gas_limit: 300_000,
            confirmation_timeout_secs: 180,
        }
    }
}
