//! Pricer and round feed ports.
//!
//! A pricer reports the live price of one asset and pushes expiry prices into
//! the oracle under its own address. Round feeds are the aggregator-style data
//! sources that round-adjacency pricers read from.

use std::fmt;

use alloy_primitives::{Address, I256, U256};

use super::errors::PricerError;
use super::reader::PriceReader;
use super::value_objects::{RoundData, SubmissionMode};
use crate::domain::shared::Timestamp;

/// Delegate that prices one asset.
pub trait Pricer: Send + Sync + fmt::Debug {
    /// Address the oracle recognizes as this pricer.
    fn address(&self) -> Address;

    /// Asset priced.
    fn asset(&self) -> Address;

    /// How this pricer chooses expiry prices.
    fn submission_mode(&self) -> SubmissionMode;

    /// Live price, 8 decimals.
    fn get_price(&self, oracle: &dyn PriceReader) -> Result<U256, PricerError>;

    /// Price observed at a past round.
    fn historical_price(&self, round_id: u64, now: Timestamp) -> Result<RoundData, PricerError>;
}

/// One answer of a round feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundAnswer {
    /// Round identifier.
    pub round_id: u64,
    /// Reported answer in feed decimals; may be negative.
    pub answer: I256,
    /// When the round was updated.
    pub updated_at: Timestamp,
}

/// Aggregator-style source of rounds.
pub trait RoundFeed: Send + Sync + fmt::Debug {
    /// Decimals of answers.
    fn decimals(&self) -> u8;

    /// Most recent round, if any.
    fn latest_round(&self) -> Option<RoundAnswer>;

    /// A specific round, if it has data.
    fn round(&self, round_id: u64) -> Option<RoundAnswer>;

    /// Nearest round with data whose id is below `round_id`.
    fn previous_round(&self, round_id: u64) -> Option<RoundAnswer>;
}
