//! Live sponsorship event feed.
//!
//! # Responsibilities
//! - Poll the contract for `NewSponsorship` logs over confirmed block ranges
//! - Decode payloads and deliver them in arrival order
//! - Stop cleanly when the feed is detached or dropped
//!
//! The polling task owns its own clone of the RPC client, so a feed created
//! during one mount cycle never depends on state from another.

use alloy::primitives::Address;
use alloy::rpc::types::Filter;
use alloy::sol_types::SolEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::gateway::abi::NewSponsorship;
use crate::gateway::rpc::RpcClient;
use crate::gateway::types::{GatewayResult, Sponsorship};
use crate::observability::metrics;

/// Channel depth for undelivered live events.
const FEED_BUFFER: usize = 64;

/// Handle to an active event subscription.
///
/// Exactly one polling task backs each feed. Dropping the feed (or calling
/// [`EventFeed::detach`]) aborts the task, which is what guarantees that an
/// unmounted view leaves no listener behind.
#[derive(Debug)]
pub struct EventFeed {
    rx: mpsc::Receiver<Sponsorship>,
    task: Option<JoinHandle<()>>,
}

impl EventFeed {
    /// Spawn the polling task and return its feed.
    pub(crate) fn spawn(
        rpc: RpcClient,
        contract: Address,
        poll_interval: Duration,
        confirmations: u32,
    ) -> Self {
        let (tx, rx) = mpsc::channel(FEED_BUFFER);
        let task = tokio::spawn(run_feed(rpc, contract, poll_interval, confirmations, tx));
        Self {
            rx,
            task: Some(task),
        }
    }

    /// Build a feed from a raw channel, with no backing task (tests/mocks).
    pub fn from_channel(rx: mpsc::Receiver<Sponsorship>) -> Self {
        Self { rx, task: None }
    }

    /// Wait for the next live sponsorship.
    ///
    /// Returns `None` once the backing task has stopped and the channel is
    /// drained.
    pub async fn next(&mut self) -> Option<Sponsorship> {
        self.rx.recv().await
    }

    /// Take any already-delivered sponsorship without waiting.
    pub fn try_next(&mut self) -> Option<Sponsorship> {
        self.rx.try_recv().ok()
    }

    /// Detach the subscription, stopping the polling task.
    pub fn detach(mut self) {
        self.abort_task();
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Event feed detached");
        }
    }
}

impl Drop for EventFeed {
    fn drop(&mut self) {
        self.abort_task();
    }
}

async fn run_feed(
    rpc: RpcClient,
    contract: Address,
    poll_interval: Duration,
    confirmations: u32,
    tx: mpsc::Sender<Sponsorship>,
) {
    tracing::info!(contract = %contract, "Starting sponsorship event feed");

    // Start at the head observed now; history is the loader's job.
    let mut last_block = loop {
        match rpc.get_block_number().await {
            Ok(block) => break block,
            Err(e) => {
                tracing::warn!(error = %e, "Event feed waiting for reachable RPC");
                sleep(poll_interval).await;
            }
        }
    };

    loop {
        sleep(poll_interval).await;

        match poll_range(&rpc, contract, last_block, confirmations, &tx).await {
            Ok(Some(new_last)) => last_block = new_last,
            Ok(None) => {}
            Err(Delivery::ReceiverGone) => {
                tracing::debug!("Event feed receiver gone, stopping");
                return;
            }
            Err(Delivery::Rpc(e)) => {
                tracing::error!(error = %e, "Error polling sponsorship events");
            }
        }
    }
}

enum Delivery {
    ReceiverGone,
    Rpc(String),
}

async fn poll_range(
    rpc: &RpcClient,
    contract: Address,
    last_block: u64,
    confirmations: u32,
    tx: &mpsc::Sender<Sponsorship>,
) -> Result<Option<u64>, Delivery> {
    let current_block = rpc
        .get_block_number()
        .await
        .map_err(|e| Delivery::Rpc(e.to_string()))?;

    // Only read ranges deep enough to be considered final.
    let target_block = current_block.saturating_sub(confirmations as u64);
    if target_block <= last_block {
        return Ok(None);
    }

    let filter = Filter::new()
        .address(contract)
        .from_block(last_block + 1)
        .to_block(target_block)
        .event(NewSponsorship::SIGNATURE);

    let logs = rpc
        .get_logs(&filter)
        .await
        .map_err(|e| Delivery::Rpc(e.to_string()))?;

    for log in logs {
        let decoded = match log.log_decode::<NewSponsorship>() {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable sponsorship log");
                continue;
            }
        };

        let sponsorship: GatewayResult<Sponsorship> = decoded.inner.data.try_into();
        match sponsorship {
            Ok(sponsorship) => {
                metrics::record_live_event();
                if tx.send(sponsorship).await.is_err() {
                    return Err(Delivery::ReceiverGone);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed sponsorship event");
            }
        }
    }

    Ok(Some(target_block))
}
