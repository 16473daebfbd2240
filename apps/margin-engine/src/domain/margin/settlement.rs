//! Settlement of expired options.

use alloy_primitives::U256;
use tracing::debug;

use super::calculator::MarginCalculator;
use super::errors::MarginError;
use crate::domain::fixed_point::{BASE_DECIMALS, FixedPointInt, MathError, pow10};
use crate::domain::oracle::PriceReader;
use crate::domain::shared::Timestamp;
use crate::domain::vault::Otoken;

impl MarginCalculator {
    /// Cash value of one expired option in strike units, from finalized
    /// expiry prices.
    pub(crate) fn expired_cash_value(
        &self,
        oracle: &dyn PriceReader,
        otoken: &Otoken,
        now: Timestamp,
    ) -> Result<FixedPointInt, MarginError> {
        let strike = FixedPointInt::from_scaled_uint(otoken.strike_price, BASE_DECIMALS)?;
        let underlying_in_strike = self.convert_on_expiry_price(
            oracle,
            FixedPointInt::ONE,
            otoken.underlying.address,
            otoken.strike.address,
            otoken.expiry,
            now,
        )?;
        let intrinsic = if otoken.is_put {
            strike.checked_sub(underlying_in_strike)?
        } else {
            underlying_in_strike.checked_sub(strike)?
        };
        Ok(intrinsic.max(FixedPointInt::ZERO))
    }

    /// Collateral (native decimals, rounded down) paid per whole option at
    /// expiry.
    pub fn get_expired_payout_rate(
        &self,
        oracle: &dyn PriceReader,
        otoken: &Otoken,
        now: Timestamp,
    ) -> Result<U256, MarginError> {
        if !otoken.is_expired(now) {
            return Err(MarginError::OtokenNotExpired {
                otoken: otoken.address,
                expiry: otoken.expiry,
            });
        }
        let cash = self.expired_cash_value(oracle, otoken, now)?;
        let in_collateral = self.convert_on_expiry_price(
            oracle,
            cash,
            otoken.strike.address,
            otoken.collateral.address,
            otoken.expiry,
            now,
        )?;
        let rate = in_collateral.to_scaled_uint(otoken.collateral.decimals, true)?;
        debug!(otoken = %otoken.address, cash_value = %cash, rate = %rate, "Payout rate computed");
        Ok(rate)
    }

    /// Collateral paid for redeeming `amount` (8 decimals) expired options.
    pub fn get_payout(
        &self,
        oracle: &dyn PriceReader,
        otoken: &Otoken,
        amount: U256,
        now: Timestamp,
    ) -> Result<U256, MarginError> {
        let rate = self.get_expired_payout_rate(oracle, otoken, now)?;
        let gross = rate
            .checked_mul(amount)
            .ok_or(MathError::Overflow { operation: "payout" })?;
        Ok(gross / pow10(BASE_DECIMALS)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::Asset;
    use crate::infrastructure::oracle::MockOracle;
    use alloy_primitives::Address;

    const EXPIRY: Timestamp = Timestamp::from_unix(1_700_000_000);

    fn weth() -> Asset {
        Asset::new(Address::repeat_byte(0x01), 18)
    }

    fn usdc() -> Asset {
        Asset::new(Address::repeat_byte(0x02), 6)
    }

    fn price(n: u64) -> U256 {
        U256::from(n) * U256::from(100_000_000u64)
    }

    fn put(strike: u64) -> Otoken {
        Otoken::put(
            Address::repeat_byte(0x10),
            weth(),
            usdc(),
            usdc(),
            price(strike),
            EXPIRY,
        )
    }

    fn call(strike: u64) -> Otoken {
        Otoken::call(
            Address::repeat_byte(0x20),
            weth(),
            usdc(),
            weth(),
            price(strike),
            EXPIRY,
        )
    }

    fn oracle(underlying_price: u64, finalized: bool) -> MockOracle {
        let oracle = MockOracle::new();
        oracle.set_expiry_price(weth().address, EXPIRY, price(underlying_price), finalized);
        oracle.set_expiry_price(usdc().address, EXPIRY, price(1), true);
        oracle
    }

    fn calc() -> MarginCalculator {
        MarginCalculator::new(Address::repeat_byte(0xa0))
    }

    #[test]
    fn itm_put_pays_intrinsic_value() {
        let oracle = oracle(150, true);
        let now = EXPIRY.plus_seconds(1);
        assert_eq!(
            calc().get_expired_payout_rate(&oracle, &put(200), now),
            Ok(U256::from(50_000_000u64))
        );
        assert_eq!(
            calc().get_payout(&oracle, &put(200), price(2), now),
            Ok(U256::from(100_000_000u64))
        );
    }

    #[test]
    fn otm_put_pays_nothing() {
        let oracle = oracle(250, true);
        assert_eq!(
            calc().get_expired_payout_rate(&oracle, &put(200), EXPIRY),
            Ok(U256::ZERO)
        );
    }

    #[test]
    fn itm_call_pays_in_underlying() {
        // (250 - 200) / 250 = 0.2 weth
        let oracle = oracle(250, true);
        assert_eq!(
            calc().get_expired_payout_rate(&oracle, &call(200), EXPIRY),
            Ok(U256::from(200_000_000_000_000_000u64))
        );
    }

    #[test]
    fn payout_rounds_down() {
        let oracle = oracle(150, true);
        // 1e-8 options of a 50 USDC payout is 5e-7 USDC
        assert_eq!(
            calc().get_payout(&oracle, &put(200), U256::from(1u64), EXPIRY),
            Ok(U256::ZERO)
        );
    }

    #[test]
    fn requires_expiry() {
        let oracle = oracle(150, true);
        let before = Timestamp::from_unix(EXPIRY.unix_seconds() - 1);
        assert_eq!(
            calc().get_expired_payout_rate(&oracle, &put(200), before),
            Err(MarginError::OtokenNotExpired {
                otoken: put(200).address,
                expiry: EXPIRY
            })
        );
    }

    #[test]
    fn requires_finalized_prices() {
        let unfinalized = oracle(150, false);
        assert_eq!(
            calc().get_expired_payout_rate(&unfinalized, &put(200), EXPIRY),
            Err(MarginError::ExpiryPriceNotFinalized {
                asset: weth().address,
                expiry: EXPIRY
            })
        );

        let missing = MockOracle::new();
        assert_eq!(
            calc().get_expired_payout_rate(&missing, &put(200), EXPIRY),
            Err(MarginError::ExpiryPriceNotFinalized {
                asset: weth().address,
                expiry: EXPIRY
            })
        );
    }
}
