//! Pricer for assets pegged at one unit of account.

use alloy_primitives::{Address, U256};
use tracing::info;

use crate::domain::oracle::{
    OracleError, PriceOracle, PriceReader, Pricer, PricerError, RoundData, SubmissionMode,
};
use crate::domain::shared::Timestamp;

/// Price reported by [`StablePricer`]: 1.0 with 8 decimals.
pub const STABLE_PRICE: u64 = 100_000_000;

/// Pricer that always reports [`STABLE_PRICE`]. Anyone may push it.
#[derive(Debug, Clone, Copy)]
pub struct StablePricer {
    address: Address,
    asset: Address,
}

impl StablePricer {
    /// Create a pricer for `asset`.
    #[must_use]
    pub const fn new(address: Address, asset: Address) -> Self {
        Self { address, asset }
    }

    /// Push the stable price into the oracle as the price at `expiry`.
    pub fn set_expiry_price_in_oracle(
        &self,
        oracle: &mut PriceOracle,
        expiry: Timestamp,
        now: Timestamp,
    ) -> Result<(), OracleError> {
        oracle.set_expiry_price(self.address, self.asset, expiry, U256::from(STABLE_PRICE), now)?;
        info!(asset = %self.asset, expiry = %expiry, "Stable price pushed to oracle");
        Ok(())
    }
}

impl Pricer for StablePricer {
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
        Ok(U256::from(STABLE_PRICE))
    }

    fn historical_price(&self, _round_id: u64, now: Timestamp) -> Result<RoundData, PricerError> {
        Ok(RoundData {
            price: U256::from(STABLE_PRICE),
            timestamp: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::oracle::ExpiryPriceState;
    use std::sync::Arc;

    #[test]
    fn pushes_one_dollar() {
        let owner = Address::repeat_byte(0xa0);
        let usdc = Address::repeat_byte(0x02);
        let pricer = StablePricer::new(Address::repeat_byte(0x54), usdc);
        let mut oracle = PriceOracle::new(owner);
        oracle
            .set_asset_pricer(owner, usdc, Arc::new(pricer))
            .unwrap();
        oracle
            .set_dispute_period(owner, pricer.address(), 10)
            .unwrap();

        let expiry = Timestamp::from_unix(1_000);
        let now = expiry.plus_seconds(1);
        assert_eq!(oracle.get_price(usdc), Ok(U256::from(STABLE_PRICE)));
        pricer
            .set_expiry_price_in_oracle(&mut oracle, expiry, now)
            .unwrap();
        assert_eq!(
            oracle.expiry_price_state(usdc, expiry, now),
            ExpiryPriceState::Unfinalized
        );
        assert_eq!(
            oracle.expiry_price_state(usdc, expiry, now.plus_seconds(11)),
            ExpiryPriceState::Finalized
        );
        assert_eq!(
            oracle.get_round_data(usdc, 9, now),
            Ok(RoundData {
                price: U256::from(STABLE_PRICE),
                timestamp: now
            })
        );
    }
}
