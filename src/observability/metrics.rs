//! Metrics collection.
//!
//! # Metrics
//! - `sponsorships_submitted_total` (counter): transactions dispatched
//! - `sponsorship_events_total` (counter): live events received
//! - `rpc_errors_total` (counter): exhausted RPC attempts, by operation

use metrics::counter;

/// Record one dispatched sponsorship transaction.
pub fn record_submission() {
    counter!("sponsorships_submitted_total").increment(1);
}

/// Record one live sponsorship event delivered by the feed.
pub fn record_live_event() {
    counter!("sponsorship_events_total").increment(1);
}

/// Record an RPC operation that failed on every provider.
pub fn record_rpc_error(operation: &str) {
    counter!("rpc_errors_total", "operation" => operation.to_string()).increment(1);
}
