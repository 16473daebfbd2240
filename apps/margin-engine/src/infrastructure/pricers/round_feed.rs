//! Round-feed pricer and an in-memory round feed.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use alloy_primitives::{Address, I256, U256};
use tracing::{debug, info, warn};

use super::scale_to_base;
use crate::domain::oracle::{
    OracleError, PriceOracle, PriceReader, Pricer, PricerError, RoundAnswer, RoundData, RoundFeed,
    SubmissionMode,
};
use crate::domain::shared::Timestamp;

/// Pricer backed by an aggregator-style round feed.
///
/// The bot may submit any round at or after the expiry. With open submission,
/// anyone may submit, but only the first round at or after the expiry.
#[derive(Debug, Clone)]
pub struct RoundFeedPricer {
    address: Address,
    asset: Address,
    bot: Address,
    feed: Arc<dyn RoundFeed>,
    open_submission: bool,
}

impl RoundFeedPricer {
    /// Create a pricer for `asset` reading `feed`.
    #[must_use]
    pub fn new(address: Address, asset: Address, bot: Address, feed: Arc<dyn RoundFeed>) -> Self {
        Self {
            address,
            asset,
            bot,
            feed,
            open_submission: false,
        }
    }

    /// Allow anyone to submit the first round after expiry.
    #[must_use]
    pub fn with_open_submission(mut self, open: bool) -> Self {
        self.open_submission = open;
        self
    }

    /// Trusted submitter.
    #[must_use]
    pub const fn bot(&self) -> Address {
        self.bot
    }

    fn scaled_answer(&self, round: &RoundAnswer) -> Result<U256, PricerError> {
        if round.answer.is_negative() {
            return Err(PricerError::NegativePrice {
                round_id: round.round_id,
            });
        }
        Ok(scale_to_base(round.answer.into_raw(), self.feed.decimals())?)
    }

    fn round(&self, round_id: u64) -> Result<RoundAnswer, PricerError> {
        self.feed
            .round(round_id)
            .ok_or(PricerError::NoRoundData { round_id })
    }

    /// Check that the nearest earlier round with data is at or before `expiry`.
    fn ensure_first_after_expiry(&self, round_id: u64, expiry: Timestamp) -> Result<(), PricerError> {
        let previous = self
            .feed
            .previous_round(round_id)
            .ok_or(PricerError::NoPreviousRound { round_id })?;
        if previous.updated_at > expiry {
            return Err(PricerError::PreviousRoundNotLastBeforeExpiry {
                round_id: previous.round_id,
                round_timestamp: previous.updated_at,
                expiry,
            });
        }
        Ok(())
    }

    /// Push the price of `round_id` into the oracle as the price at `expiry`.
    pub fn set_expiry_price_in_oracle(
        &self,
        oracle: &mut PriceOracle,
        caller: Address,
        expiry: Timestamp,
        round_id: u64,
        now: Timestamp,
    ) -> Result<(), OracleError> {
        let is_bot = caller == self.bot;
        if !is_bot && !self.open_submission {
            warn!(caller = %caller, asset = %self.asset, "Rejected round submission");
            return Err(PricerError::Unauthorized { caller }.into());
        }

        let round = self.round(round_id)?;
        if round.updated_at < expiry {
            return Err(PricerError::RoundNotFirstAfterExpiry {
                round_id,
                round_timestamp: round.updated_at,
                expiry,
            }
            .into());
        }
        if !is_bot {
            self.ensure_first_after_expiry(round_id, expiry)?;
        }

        let price = self.scaled_answer(&round)?;
        oracle.set_expiry_price(self.address, self.asset, expiry, price, now)?;
        info!(
            asset = %self.asset,
            expiry = %expiry,
            round_id,
            price = %price,
            "Round price pushed to oracle"
        );
        Ok(())
    }
}

impl Pricer for RoundFeedPricer {
    fn address(&self) -> Address {
        self.address
    }

    fn asset(&self) -> Address {
        self.asset
    }

    fn submission_mode(&self) -> SubmissionMode {
        SubmissionMode::RoundAdjacency
    }

    fn get_price(&self, _oracle: &dyn PriceReader) -> Result<U256, PricerError> {
        let round = self.feed.latest_round().ok_or(PricerError::NoRounds)?;
        self.scaled_answer(&round)
    }

    fn historical_price(&self, round_id: u64, _now: Timestamp) -> Result<RoundData, PricerError> {
        let round = self.round(round_id)?;
        Ok(RoundData {
            price: self.scaled_answer(&round)?,
            timestamp: round.updated_at,
        })
    }
}

/// Round feed kept in memory.
#[derive(Debug)]
pub struct InMemoryRoundFeed {
    decimals: u8,
    rounds: RwLock<BTreeMap<u64, RoundAnswer>>,
}

impl InMemoryRoundFeed {
    /// Create an empty feed reporting answers with `decimals`.
    #[must_use]
    pub fn new(decimals: u8) -> Self {
        Self {
            decimals,
            rounds: RwLock::new(BTreeMap::new()),
        }
    }

    /// Append a round after the latest one and return its id (first id is 1).
    pub fn push_round(&self, answer: I256, updated_at: Timestamp) -> u64 {
        let mut rounds = self.rounds.write().unwrap_or_else(PoisonError::into_inner);
        let round_id = rounds.keys().next_back().map_or(1, |last| last + 1);
        rounds.insert(
            round_id,
            RoundAnswer {
                round_id,
                answer,
                updated_at,
            },
        );
        debug!(round_id, answer = %answer, updated_at = %updated_at, "Round pushed");
        round_id
    }

    /// Set a round at an explicit id, leaving gaps where ids are skipped.
    pub fn set_round(&self, round_id: u64, answer: I256, updated_at: Timestamp) {
        self.rounds
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                round_id,
                RoundAnswer {
                    round_id,
                    answer,
                    updated_at,
                },
            );
    }
}

impl RoundFeed for InMemoryRoundFeed {
    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn latest_round(&self) -> Option<RoundAnswer> {
        self.rounds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .next_back()
            .copied()
    }

    fn round(&self, round_id: u64) -> Option<RoundAnswer> {
        self.rounds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&round_id)
            .copied()
    }

    fn previous_round(&self, round_id: u64) -> Option<RoundAnswer> {
        self.rounds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .range(..round_id)
            .next_back()
            .map(|(_, round)| *round)
    }
}
