//! Gateway-specific types and error definitions.

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur while talking to the contract gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within the configured window.
    #[error("Transaction not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Malformed gateway record or event payload.
    #[error("Malformed gateway record: {0}")]
    Decode(String),

    /// Gateway cannot serve the request (e.g., no signer attached).
    #[error("Gateway not available: {0}")]
    NotAvailable(String),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Terminal outcome of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxOutcome {
    /// Mined with the required confirmation depth.
    Confirmed { block_number: u64 },
    /// Mined but reverted.
    Reverted { reason: String },
}

/// One recorded support action, decoded from the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sponsorship {
    /// Payer address.
    pub address: Address,
    /// Block timestamp, converted from Unix seconds.
    pub timestamp: DateTime<Utc>,
    /// Supporter's message.
    pub message: String,
    /// Supporter's display name.
    pub name: String,
}
