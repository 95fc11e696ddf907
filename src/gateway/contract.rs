//! Contract gateway: submission and historical reads.
//!
//! # Responsibilities
//! - Encode and dispatch the payable `submitSponsorship` call with the
//!   fixed payment amount and gas limit
//! - Monitor confirmations for dispatched transactions
//! - Read and decode the full historical record via `getSponsorships`
//! - Hand out live event feeds

use alloy::network::TransactionBuilder;
use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::config::{ClientConfig, PaymentConfig};
use crate::gateway::abi::{getSponsorshipsCall, submitSponsorshipCall};
use crate::gateway::rpc::RpcClient;
use crate::gateway::subscriber::EventFeed;
use crate::gateway::types::{GatewayError, GatewayResult, Sponsorship, TxOutcome};
use crate::gateway::SponsorshipGateway;
use crate::observability::metrics;

/// Client for the deployed sponsorship contract.
#[derive(Debug, Clone)]
pub struct ContractGateway {
    rpc: RpcClient,
    contract: Address,
    payment: PaymentConfig,
    amount_wei: U256,
    sender: Option<Address>,
}

impl ContractGateway {
    /// Connect to the gateway, optionally attaching a signing key for
    /// submissions. Without a signer the gateway is read-only.
    pub async fn connect(
        config: &ClientConfig,
        signer: Option<PrivateKeySigner>,
    ) -> GatewayResult<Self> {
        let contract: Address = config.gateway.contract_address.parse().map_err(|e| {
            GatewayError::NotAvailable(format!(
                "Invalid contract address '{}': {}",
                config.gateway.contract_address, e
            ))
        })?;

        let amount_wei = parse_ether(&config.payment.amount_eth).map_err(|e| {
            GatewayError::NotAvailable(format!(
                "Invalid payment amount '{}': {}",
                config.payment.amount_eth, e
            ))
        })?;

        let sender = signer.as_ref().map(|s| s.address());
        let rpc = RpcClient::new(config.gateway.clone(), signer).await?;

        tracing::info!(
            contract = %contract,
            amount_eth = %config.payment.amount_eth,
            read_only = sender.is_none(),
            "Contract gateway connected"
        );

        Ok(Self {
            rpc,
            contract,
            payment: config.payment.clone(),
            amount_wei,
            sender,
        })
    }

    /// The contract address this gateway talks to.
    pub fn contract_address(&self) -> Address {
        self.contract
    }

    async fn build_submission(&self, name: &str, message: &str) -> GatewayResult<TransactionRequest> {
        let sender = self.sender.ok_or_else(|| {
            GatewayError::NotAvailable("no wallet connected; authorize an account first".to_string())
        })?;

        // Sync nonce from chain; the client holds no local nonce state.
        let nonce = self.rpc.get_transaction_count(sender).await?;

        let gas_price = self.rpc.get_gas_price().await?;
        let gas_price_gwei = gas_price / 1_000_000_000;

        let config = self.rpc.config();
        if gas_price_gwei > config.max_gas_price_gwei as u128 {
            return Err(GatewayError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei: config.max_gas_price_gwei,
            });
        }

        let adjusted_gas_price = (gas_price as f64 * config.gas_price_multiplier) as u128;

        let calldata = submitSponsorshipCall {
            name: name.to_string(),
            message: message.to_string(),
        }
        .abi_encode();

        Ok(TransactionRequest::default()
            .with_to(self.contract)
            .with_value(self.amount_wei)
            .with_input(Bytes::from(calldata))
            .with_nonce(nonce)
            .with_gas_price(adjusted_gas_price)
            .with_chain_id(config.chain_id)
            .with_gas_limit(self.payment.gas_limit))
    }
}

impl SponsorshipGateway for ContractGateway {
    /// Encode, sign, and broadcast one sponsorship. Returns as soon as the
    /// transaction is in flight.
    async fn dispatch_sponsorship(&self, name: &str, message: &str) -> GatewayResult<TxHash> {
        let tx = self.build_submission(name, message).await?;
        let tx_hash = self.rpc.send_transaction(tx).await?;

        metrics::record_submission();
        tracing::info!(tx_hash = %tx_hash, "Sponsorship dispatched");

        Ok(tx_hash)
    }

    /// Wait until the transaction reaches the configured confirmation depth
    /// or the confirmation window elapses.
    async fn await_confirmation(&self, tx_hash: TxHash) -> GatewayResult<TxOutcome> {
        let required_confirmations = self.rpc.confirmation_blocks();
        let timeout_duration = Duration::from_secs(self.payment.confirmation_timeout_secs);
        let poll_interval = Duration::from_secs(2);

        let result = timeout(timeout_duration, async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.rpc.get_transaction_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Ok(TxOutcome::Reverted {
                        reason: "execution reverted".to_string(),
                    });
                }

                let current_block = self.rpc.get_block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);
                let confirmations = current_block.saturating_sub(tx_block) as u32;

                if confirmations >= required_confirmations {
                    return Ok(TxOutcome::Confirmed {
                        block_number: tx_block,
                    });
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = confirmations,
                    required = required_confirmations,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(GatewayError::ConfirmationTimeout(
                self.payment.confirmation_timeout_secs,
            )),
        }
    }

    /// Read the full historical record, preserving gateway order.
    async fn sponsorships(&self) -> GatewayResult<Vec<Sponsorship>> {
        let calldata = getSponsorshipsCall {}.abi_encode();
        let tx = TransactionRequest::default()
            .with_to(self.contract)
            .with_input(Bytes::from(calldata));

        let bytes = self.rpc.call(&tx).await?;

        let records = getSponsorshipsCall::abi_decode_returns(&bytes)
            .map_err(|e| GatewayError::Decode(format!("getSponsorships return: {}", e)))?;

        records.into_iter().map(Sponsorship::try_from).collect()
    }

    /// Start a live feed of `NewSponsorship` events.
    ///
    /// The feed's task holds its own clone of the RPC client, created in
    /// this call, so detaching it never touches another mount's state.
    async fn subscribe(&self) -> GatewayResult<EventFeed> {
        let config = self.rpc.config();
        Ok(EventFeed::spawn(
            self.rpc.clone(),
            self.contract,
            Duration::from_millis(config.poll_interval_ms),
            config.confirmation_blocks,
        ))
    }
}
