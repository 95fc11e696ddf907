//! Wallet provider subsystem.
//!
//! # Data Flow
//! ```text
//! Environment variable (private key)
//!     → provider.rs (key loading, authorization)
//!     → gateway (signer for transaction submission)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data

pub mod provider;

pub use provider::{EnvKeyProvider, PRIVATE_KEY_ENV_VAR};

use alloy::primitives::Address;
use thiserror::Error;

/// Errors that can occur while talking to the wallet provider.
#[derive(Debug, Error)]
pub enum WalletError {
    /// No key source is available at all.
    #[error("No wallet provider available")]
    NoProvider,

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Key(String),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// The two operations of an injected wallet's account API.
///
/// `accounts` mirrors `eth_accounts`: report already-authorized accounts
/// without prompting. `request_accounts` mirrors `eth_requestAccounts`:
/// actively authorize. Both return the active account first.
pub trait WalletProvider {
    fn accounts(&self) -> impl std::future::Future<Output = WalletResult<Vec<Address>>> + Send;

    fn request_accounts(
        &self,
    ) -> impl std::future::Future<Output = WalletResult<Vec<Address>>> + Send;
}
