//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that addresses, URLs, and amounts actually parse
//! - Validate value ranges (timeouts > 0, gas limit covers intrinsic cost)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::utils::parse_ether;
use alloy::primitives::Address;

use crate::config::schema::ClientConfig;

/// A single semantic configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. "gateway.rpc_url").
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn push_error(errors: &mut Vec<ValidationError>, field: &str, message: impl Into<String>) {
    errors.push(ValidationError {
        field: field.to_string(),
        message: message.into(),
    });
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.gateway.rpc_url.parse::<url::Url>() {
        push_error(&mut errors, "gateway.rpc_url", format!("invalid URL: {}", e));
    }
    for (i, failover) in config.gateway.failover_urls.iter().enumerate() {
        if let Err(e) = failover.parse::<url::Url>() {
            push_error(
                &mut errors,
                &format!("gateway.failover_urls[{}]", i),
                format!("invalid URL: {}", e),
            );
        }
    }
    if let Err(e) = config.gateway.contract_address.parse::<Address>() {
        push_error(
            &mut errors,
            "gateway.contract_address",
            format!("invalid address: {}", e),
        );
    }
    if config.gateway.chain_id == 0 {
        push_error(&mut errors, "gateway.chain_id", "must be non-zero");
    }
    if config.gateway.rpc_timeout_secs == 0 {
        push_error(&mut errors, "gateway.rpc_timeout_secs", "must be greater than zero");
    }
    if config.gateway.poll_interval_ms == 0 {
        push_error(&mut errors, "gateway.poll_interval_ms", "must be greater than zero");
    }
    if config.gateway.gas_price_multiplier < 1.0 {
        push_error(
            &mut errors,
            "gateway.gas_price_multiplier",
            "must be at least 1.0",
        );
    }

    if let Err(e) = parse_ether(&config.payment.amount_eth) {
        push_error(
            &mut errors,
            "payment.amount_eth",
            format!("invalid ether amount: {}", e),
        );
    }
    // 21000 is the intrinsic cost of any transaction; a contract call needs more.
    if config.payment.gas_limit < 21_000 {
        push_error(&mut errors, "payment.gas_limit", "below intrinsic transaction cost");
    }
    if config.payment.confirmation_timeout_secs == 0 {
        push_error(
            &mut errors,
            "payment.confirmation_timeout_secs",
            "must be greater than zero",
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
