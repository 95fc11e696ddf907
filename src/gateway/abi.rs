//! Fixed contract ABI and record decoding.

use alloy::primitives::U256;
use alloy::sol;
use chrono::{DateTime, Utc};

use crate::gateway::types::{GatewayError, GatewayResult, Sponsorship};

sol! {
    /// One sponsorship as stored by the contract.
    #[derive(Debug)]
    struct SponsorshipRecord {
        address from;
        uint256 timestamp;
        string message;
        string name;
    }

    function submitSponsorship(string name, string message) payable;

    function getSponsorships() returns (SponsorshipRecord[] records);

    /// Emitted when a sponsorship is recorded.
    #[derive(Debug)]
    event NewSponsorship(address indexed from, uint256 timestamp, string message, string name);
}

/// Convert an on-chain Unix-seconds timestamp to a date-time.
pub fn timestamp_from_unix(raw: U256) -> GatewayResult<DateTime<Utc>> {
    let secs: i64 = raw
        .try_into()
        .map_err(|_| GatewayError::Decode(format!("timestamp {} out of range", raw)))?;
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| GatewayError::Decode(format!("timestamp {} out of range", raw)))
}

impl TryFrom<SponsorshipRecord> for Sponsorship {
    type Error = GatewayError;

    fn try_from(record: SponsorshipRecord) -> GatewayResult<Self> {
        Ok(Self {
            address: record.from,
            timestamp: timestamp_from_unix(record.timestamp)?,
            message: record.message,
            name: record.name,
        })
    }
}

impl TryFrom<NewSponsorship> for Sponsorship {
    type Error = GatewayError;

    fn try_from(event: NewSponsorship) -> GatewayResult<Self> {
        Ok(Self {
            address: event.from,
            timestamp: timestamp_from_unix(event.timestamp)?,
            message: event.message,
            name: event.name,
        })
    }
}
