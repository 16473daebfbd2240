//! Pricer fed by a trusted bot.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use alloy_primitives::{Address, U256};
use tracing::{info, warn};

use crate::domain::oracle::{
    OracleError, PriceOracle, PriceReader, Pricer, PricerError, RoundData, SubmissionMode,
};
use crate::domain::shared::Timestamp;

/// Pricer whose prices are submitted by a bot.
///
/// Submitted prices are kept by timestamp; historical lookups treat the round
/// id as a unix timestamp. The live price is the latest submitted one.
#[derive(Debug)]
pub struct ManualPricer {
    address: Address,
    asset: Address,
    bot: Address,
    history: RwLock<BTreeMap<Timestamp, U256>>,
}

impl ManualPricer {
    /// Create a pricer for `asset` fed by `bot`.
    #[must_use]
    pub fn new(address: Address, asset: Address, bot: Address) -> Self {
        Self {
            address,
            asset,
            bot,
            history: RwLock::new(BTreeMap::new()),
        }
    }

    /// Trusted submitter.
    #[must_use]
    pub const fn bot(&self) -> Address {
        self.bot
    }

    /// Push `price` (8 decimals) into the oracle as the price at `expiry`.
    pub fn set_expiry_price_in_oracle(
        &self,
        oracle: &mut PriceOracle,
        caller: Address,
        expiry: Timestamp,
        price: U256,
        now: Timestamp,
    ) -> Result<(), OracleError> {
        if caller != self.bot {
            warn!(caller = %caller, asset = %self.asset, "Rejected manual price submission");
            return Err(PricerError::Unauthorized { caller }.into());
        }
        oracle.set_expiry_price(self.address, self.asset, expiry, price, now)?;
        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(expiry, price);
        info!(asset = %self.asset, expiry = %expiry, price = %price, "Manual price pushed to oracle");
        Ok(())
    }
}

impl Pricer for ManualPricer {
    fn address(&self) -> Address {
        self.address
    }

    fn asset(&self) -> Address {
        self.asset
    }

    fn submission_mode(&self) -> SubmissionMode {
        SubmissionMode::TimestampWindow
    }

    fn get_price(&self, _oracle: &dyn PriceReader) -> Result<U256, PricerError> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .next_back()
            .copied()
            .ok_or(PricerError::NoPriceSubmitted)
    }

    fn historical_price(&self, round_id: u64, _now: Timestamp) -> Result<RoundData, PricerError> {
        let timestamp = Timestamp::from_unix(round_id);
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&timestamp)
            .map(|&price| RoundData { price, timestamp })
            .ok_or(PricerError::HistoricalPriceUnavailable { round_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const EXPIRY: Timestamp = Timestamp::from_unix(1_700_000_000);

    fn owner() -> Address {
        Address::repeat_byte(0xa0)
    }

    fn bot() -> Address {
        Address::repeat_byte(0xb0)
    }

    fn asset() -> Address {
        Address::repeat_byte(0x03)
    }

    fn setup() -> (PriceOracle, Arc<ManualPricer>) {
        let pricer = Arc::new(ManualPricer::new(Address::repeat_byte(0x52), asset(), bot()));
        let mut oracle = PriceOracle::new(owner());
        oracle
            .set_asset_pricer(owner(), asset(), pricer.clone())
            .unwrap();
        (oracle, pricer)
    }

    #[test]
    fn no_price_before_first_submission() {
        let (oracle, _) = setup();
        assert_eq!(
            oracle.get_price(asset()),
            Err(OracleError::Pricer(PricerError::NoPriceSubmitted))
        );
    }

    #[test]
    fn bot_submission_updates_live_and_historical_price() {
        let (mut oracle, pricer) = setup();
        let now = EXPIRY.plus_seconds(1);
        pricer
            .set_expiry_price_in_oracle(&mut oracle, bot(), EXPIRY, U256::from(123u64), now)
            .unwrap();

        assert_eq!(oracle.get_price(asset()), Ok(U256::from(123u64)));
        assert_eq!(
            oracle.get_round_data(asset(), EXPIRY.unix_seconds(), now),
            Ok(RoundData {
                price: U256::from(123u64),
                timestamp: EXPIRY
            })
        );
        assert_eq!(
            oracle.get_expiry_price(asset(), EXPIRY, now).unwrap().price,
            U256::from(123u64)
        );
        assert_eq!(
            pricer.historical_price(1, now),
            Err(PricerError::HistoricalPriceUnavailable { round_id: 1 })
        );
    }

    #[test]
    fn only_bot_submits() {
        let (mut oracle, pricer) = setup();
        let stranger = Address::repeat_byte(0xcc);
        assert_eq!(
            pricer.set_expiry_price_in_oracle(
                &mut oracle,
                stranger,
                EXPIRY,
                U256::from(1u64),
                EXPIRY.plus_seconds(1)
            ),
            Err(OracleError::Pricer(PricerError::Unauthorized { caller: stranger }))
        );
    }

    #[test]
    fn rejected_oracle_write_leaves_history_untouched() {
        let (mut oracle, pricer) = setup();
        assert_eq!(
            pricer.set_expiry_price_in_oracle(&mut oracle, bot(), EXPIRY, U256::from(1u64), EXPIRY),
            Err(OracleError::LockingPeriodNotOver {
                asset: asset(),
                expiry: EXPIRY
            })
        );
        assert_eq!(pricer.get_price(&oracle), Err(PricerError::NoPriceSubmitted));
    }
}
