//! Contract gateway subsystem.
//!
//! # Data Flow
//! ```text
//! Config (RPC URLs, contract address, payment)
//!     → rpc.rs (JSON-RPC connection with timeouts and failover)
//!     → abi.rs (fixed ABI, record/event decoding)
//!     → contract.rs (submit, confirm, read history)
//!     → subscriber.rs (live NewSponsorship feed)
//! ```
//!
//! # Constraints
//! - All RPC calls have configurable timeouts
//! - The gateway is read-only unless built with a signer
//! - Decode failures are terminal to the operation, never to the client

pub mod abi;
pub mod contract;
pub mod rpc;
pub mod subscriber;
pub mod types;

pub use contract::ContractGateway;
pub use rpc::RpcClient;
pub use subscriber::EventFeed;
pub use types::{ChainId, GatewayError, GatewayResult, Sponsorship, TxOutcome};

use alloy::primitives::TxHash;
use std::future::Future;

/// The fixed surface of the deployed sponsorship contract.
///
/// The view talks to the gateway only through this trait so tests can swap
/// in an in-process implementation.
pub trait SponsorshipGateway {
    /// Broadcast one sponsorship; resolves once the transaction is in flight.
    fn dispatch_sponsorship(
        &self,
        name: &str,
        message: &str,
    ) -> impl Future<Output = GatewayResult<TxHash>> + Send;

    /// Wait for a dispatched transaction's terminal outcome.
    fn await_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = GatewayResult<TxOutcome>> + Send;

    /// Fetch the full historical record, in gateway order.
    fn sponsorships(&self) -> impl Future<Output = GatewayResult<Vec<Sponsorship>>> + Send;

    /// Attach a live feed of newly recorded sponsorships.
    fn subscribe(&self) -> impl Future<Output = GatewayResult<EventFeed>> + Send;
}
