//! Oracle value objects.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::pricer::Pricer;
use crate::domain::shared::Timestamp;

/// Where an asset's price comes from. The two variants are mutually exclusive.
#[derive(Debug, Clone)]
pub enum PriceSource {
    /// Constant price (8 decimals) that never changes and is always final.
    Stable(U256),
    /// Price reported by a pricer.
    Delegated(Arc<dyn Pricer>),
}

/// How a pricer establishes the price it pushes for an expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionMode {
    /// Chosen from a round feed; the round must be the first at or after expiry.
    RoundAdjacency,
    /// Taken as-is for the timestamp once the locking period is over.
    TimestampWindow,
}

impl fmt::Display for SubmissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RoundAdjacency => "round_adjacency",
            Self::TimestampWindow => "timestamp_window",
        })
    }
}

/// How a stored expiry price got into the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "mode")]
pub enum PriceOrigin {
    /// Submitted by the asset's pricer.
    Submitted(SubmissionMode),
    /// Imported by the owner during migration.
    Migrated,
}

/// A stored expiry price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryPriceRecord {
    /// Price, 8 decimals.
    pub price: U256,
    /// When it was stored.
    pub submitted_at: Timestamp,
    /// Origin of the price.
    pub origin: PriceOrigin,
    /// Whether the disputer has overridden it.
    pub disputed: bool,
}

impl ExpiryPriceRecord {
    /// Whether the record is final regardless of elapsed time.
    #[must_use]
    pub const fn is_final_by_origin(&self) -> bool {
        self.disputed || matches!(self.origin, PriceOrigin::Migrated)
    }
}

/// Lifecycle state of the price of an asset at a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryPriceState {
    /// Nothing stored; the locking period is still running.
    Pending,
    /// Nothing stored; submissions are accepted.
    Unset,
    /// Stored; the dispute window is open.
    Unfinalized,
    /// Stored and immutable.
    Finalized,
}

/// Expiry price with its finality flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryPrice {
    /// Price, 8 decimals.
    pub price: U256,
    /// Whether the dispute period is over.
    pub is_finalized: bool,
}

/// A historical price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundData {
    /// Price, 8 decimals.
    pub price: U256,
    /// Observation time.
    pub timestamp: Timestamp,
}
