//! Pricer for wrapped, yield-bearing assets priced off their underlying.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use alloy_primitives::{Address, U256};
use tracing::info;

use crate::domain::fixed_point::{MathError, pow10};
use crate::domain::oracle::{
    OracleError, PriceOracle, PriceReader, Pricer, PricerError, RoundData, SubmissionMode,
};
use crate::domain::shared::Timestamp;

/// Source of the wrapper-to-underlying exchange rate.
pub trait ExchangeRateSource: Send + Sync + fmt::Debug {
    /// Underlying units per wrapper unit, scaled by `10^rate_decimals()`.
    fn exchange_rate(&self) -> Result<U256, PricerError>;

    /// Decimals of the exchange rate.
    fn rate_decimals(&self) -> u8;
}

/// Exchange rate held in memory and updated explicitly.
#[derive(Debug)]
pub struct FixedExchangeRate {
    rate: RwLock<U256>,
    decimals: u8,
}

impl FixedExchangeRate {
    /// Create a rate source.
    #[must_use]
    pub fn new(rate: U256, decimals: u8) -> Self {
        Self {
            rate: RwLock::new(rate),
            decimals,
        }
    }

    /// Replace the rate.
    pub fn set_rate(&self, rate: U256) {
        *self.rate.write().unwrap_or_else(PoisonError::into_inner) = rate;
    }
}

impl ExchangeRateSource for FixedExchangeRate {
    fn exchange_rate(&self) -> Result<U256, PricerError> {
        Ok(*self.rate.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn rate_decimals(&self) -> u8 {
        self.decimals
    }
}

/// Pricer computing `underlying price * rate / 10^rate_decimals`.
///
/// Anyone may push the expiry price once the underlying's expiry price exists.
#[derive(Debug, Clone)]
pub struct DerivedPricer {
    address: Address,
    asset: Address,
    underlying: Address,
    rate: Arc<dyn ExchangeRateSource>,
}

impl DerivedPricer {
    /// Create a pricer for `asset` wrapping `underlying`.
    #[must_use]
    pub fn new(
        address: Address,
        asset: Address,
        underlying: Address,
        rate: Arc<dyn ExchangeRateSource>,
    ) -> Self {
        Self {
            address,
            asset,
            underlying,
            rate,
        }
    }

    /// Underlying asset.
    #[must_use]
    pub const fn underlying(&self) -> Address {
        self.underlying
    }

    fn derive(&self, underlying_price: U256) -> Result<U256, PricerError> {
        let rate = self.rate.exchange_rate()?;
        if rate.is_zero() {
            return Err(PricerError::InvalidExchangeRate);
        }
        let gross = underlying_price
            .checked_mul(rate)
            .ok_or(MathError::Overflow { operation: "derive" })?;
        Ok(gross / pow10(self.rate.rate_decimals())?)
    }

    /// Derive the price at `expiry` from the underlying's stored expiry price
    /// and push it into the oracle.
    pub fn set_expiry_price_in_oracle(
        &self,
        oracle: &mut PriceOracle,
        expiry: Timestamp,
        now: Timestamp,
    ) -> Result<(), OracleError> {
        let underlying_price = match oracle.get_expiry_price(self.underlying, expiry, now) {
            Ok(price) if !price.price.is_zero() => price.price,
            Ok(_) | Err(OracleError::ExpiryPriceNotSet { .. }) => {
                return Err(PricerError::UnderlyingPriceNotSet {
                    asset: self.underlying,
                    expiry,
                }
                .into());
            }
            Err(e) => return Err(e),
        };
        let price = self.derive(underlying_price)?;
        oracle.set_expiry_price(self.address, self.asset, expiry, price, now)?;
        info!(
            asset = %self.asset,
            underlying = %self.underlying,
            expiry = %expiry,
            price = %price,
            "Derived price pushed to oracle"
        );
        Ok(())
    }
}

impl Pricer for DerivedPricer {
    fn address(&self) -> Address {
        self.address
    }

    fn asset(&self) -> Address {
        self.asset
    }

    fn submission_mode(&self) -> SubmissionMode {
        SubmissionMode::TimestampWindow
    }

    fn get_price(&self, oracle: &dyn PriceReader) -> Result<U256, PricerError> {
        let underlying_price =
            oracle
                .price(self.underlying)
                .map_err(|e| PricerError::UnderlyingPriceUnavailable {
                    asset: self.underlying,
                    reason: e.to_string(),
                })?;
        self.derive(underlying_price)
    }

    fn historical_price(&self, round_id: u64, _now: Timestamp) -> Result<RoundData, PricerError> {
        Err(PricerError::HistoricalPriceUnavailable { round_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPIRY: Timestamp = Timestamp::from_unix(1_700_000_000);

    fn owner() -> Address {
        Address::repeat_byte(0xa0)
    }

    fn usdc() -> Address {
        Address::repeat_byte(0x02)
    }

    fn yvusdc() -> Address {
        Address::repeat_byte(0x04)
    }

    fn price(n: u64) -> U256 {
        U256::from(n) * U256::from(100_000_000u64)
    }

    /// Rate of 1.05 with 6 decimals.
    fn rate() -> Arc<FixedExchangeRate> {
        Arc::new(FixedExchangeRate::new(U256::from(1_050_000u64), 6))
    }

    fn setup(rate: Arc<FixedExchangeRate>) -> (PriceOracle, DerivedPricer) {
        let pricer = DerivedPricer::new(Address::repeat_byte(0x53), yvusdc(), usdc(), rate);
        let mut oracle = PriceOracle::new(owner());
        oracle.set_stable_price(owner(), usdc(), price(1)).unwrap();
        oracle
            .set_asset_pricer(owner(), yvusdc(), Arc::new(pricer.clone()))
            .unwrap();
        (oracle, pricer)
    }

    #[test]
    fn live_price_scales_underlying() {
        let (oracle, _) = setup(rate());
        assert_eq!(oracle.get_price(yvusdc()), Ok(U256::from(105_000_000u64)));
    }

    #[test]
    fn zero_rate_is_invalid() {
        let rate = rate();
        let (oracle, _) = setup(rate.clone());
        rate.set_rate(U256::ZERO);
        assert_eq!(
            oracle.get_price(yvusdc()),
            Err(OracleError::Pricer(PricerError::InvalidExchangeRate))
        );
    }

    #[test]
    fn missing_underlying_live_price() {
        let pricer = DerivedPricer::new(Address::repeat_byte(0x53), yvusdc(), usdc(), rate());
        let oracle = PriceOracle::new(owner());
        assert_eq!(
            pricer.get_price(&oracle),
            Err(PricerError::UnderlyingPriceUnavailable {
                asset: usdc(),
                reason: OracleError::NoPricerConfigured { asset: usdc() }.to_string()
            })
        );
    }

    #[test]
    fn anyone_pushes_expiry_price_from_underlying() {
        let (mut oracle, pricer) = setup(rate());
        let now = EXPIRY.plus_seconds(1);
        pricer
            .set_expiry_price_in_oracle(&mut oracle, EXPIRY, now)
            .unwrap();
        assert_eq!(
            oracle.get_expiry_price(yvusdc(), EXPIRY, now).unwrap().price,
            U256::from(105_000_000u64)
        );
    }

    #[test]
    fn underlying_expiry_price_must_exist() {
        let weth = Address::repeat_byte(0x01);
        let pricer = DerivedPricer::new(Address::repeat_byte(0x53), yvusdc(), weth, rate());
        let mut oracle = PriceOracle::new(owner());
        oracle
            .set_asset_pricer(owner(), yvusdc(), Arc::new(pricer.clone()))
            .unwrap();
        assert_eq!(
            pricer.set_expiry_price_in_oracle(&mut oracle, EXPIRY, EXPIRY.plus_seconds(1)),
            Err(OracleError::Pricer(PricerError::UnderlyingPriceNotSet {
                asset: weth,
                expiry: EXPIRY
            }))
        );
    }

    #[test]
    fn no_historical_prices() {
        let pricer = DerivedPricer::new(Address::repeat_byte(0x53), yvusdc(), usdc(), rate());
        assert_eq!(
            pricer.historical_price(3, EXPIRY),
            Err(PricerError::HistoricalPriceUnavailable { round_id: 3 })
        );
    }
}
