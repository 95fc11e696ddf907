//! Wallet provider backed by an environment variable.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use std::sync::Mutex;

use crate::wallet::{WalletError, WalletProvider, WalletResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "EDUBREW_PRIVATE_KEY";

/// Key provider that plays the role of an injected wallet.
///
/// `accounts` answers from the already-unlocked key without touching the
/// environment; `request_accounts` performs the authorization step by
/// reading and parsing the key.
#[derive(Debug)]
pub struct EnvKeyProvider {
    env_var: String,
    unlocked: Mutex<Option<PrivateKeySigner>>,
}

impl EnvKeyProvider {
    pub fn new() -> Self {
        Self::with_var(PRIVATE_KEY_ENV_VAR)
    }

    /// Use a non-default environment variable (tests).
    pub fn with_var(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
            unlocked: Mutex::new(None),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<PrivateKeySigner>> {
        match self.unlocked.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// The unlocked signer, if authorization has happened.
    pub fn signer(&self) -> Option<PrivateKeySigner> {
        self.lock().clone()
    }

    fn parse_key(&self, private_key_hex: &str) -> WalletResult<PrivateKeySigner> {
        // Strip 0x prefix if present
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        key_hex
            .parse()
            .map_err(|e| WalletError::Key(format!("Invalid private key format: {}", e)))
    }
}

impl Default for EnvKeyProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletProvider for EnvKeyProvider {
    async fn accounts(&self) -> WalletResult<Vec<Address>> {
        Ok(self.lock().iter().map(|signer| signer.address()).collect())
    }

    async fn request_accounts(&self) -> WalletResult<Vec<Address>> {
        if let Some(signer) = self.signer() {
            return Ok(vec![signer.address()]);
        }

        let private_key = std::env::var(&self.env_var).map_err(|_| WalletError::NoProvider)?;
        let signer = self.parse_key(&private_key)?;

        tracing::info!(address = %signer.address(), "Wallet unlocked");

        let address = signer.address();
        *self.lock() = Some(signer);
        Ok(vec![address])
    }
}
