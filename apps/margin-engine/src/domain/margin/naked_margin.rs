//! Naked margin requirement.

use alloy_primitives::U256;
use tracing::debug;

use super::calculator::MarginCalculator;
use super::errors::MarginError;
use super::product::ProductKey;
use crate::domain::fixed_point::{BASE_DECIMALS, FixedPointInt, MathError};
use crate::domain::shared::Timestamp;

/// Inputs of the naked margin formula, all in the 18-decimal domain.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NakedMarginInputs {
    pub(crate) is_put: bool,
    pub(crate) collateralized_by_underlying: bool,
    pub(crate) short_amount: FixedPointInt,
    pub(crate) strike_price: FixedPointInt,
    pub(crate) underlying_price: FixedPointInt,
    pub(crate) spot_shock: FixedPointInt,
    pub(crate) upper_bound: FixedPointInt,
}

/// Required margin in collateral units (as fixed point).
///
/// Puts are quoted in the strike asset and calls in the underlying unless the
/// collateral says otherwise; the cross-collateralized cases carry an extra
/// `(1 + shock)` factor.
pub(crate) fn naked_margin(inputs: &NakedMarginInputs) -> Result<FixedPointInt, MathError> {
    let NakedMarginInputs {
        is_put,
        collateralized_by_underlying,
        short_amount,
        strike_price: strike,
        underlying_price: spot,
        spot_shock: shock,
        upper_bound,
    } = *inputs;

    let (a, b, cross) = match (is_put, collateralized_by_underlying) {
        (true, false) => {
            let shocked = shock.checked_mul(spot)?;
            (
                strike.min(shocked),
                strike.checked_sub(shocked)?.max(FixedPointInt::ZERO),
                false,
            )
        }
        (true, true) => {
            let ratio = strike.checked_div(spot)?;
            (
                ratio.min(shock),
                ratio.checked_sub(shock)?.max(FixedPointInt::ZERO),
                true,
            )
        }
        (false, true) => {
            let ratio = strike.checked_mul(shock)?.checked_div(spot)?;
            (
                FixedPointInt::ONE.min(ratio),
                FixedPointInt::ONE
                    .checked_sub(ratio)?
                    .max(FixedPointInt::ZERO),
                false,
            )
        }
        (false, false) => {
            let shocked = strike.checked_mul(shock)?;
            (
                spot.min(shocked),
                spot.checked_sub(shocked)?.max(FixedPointInt::ZERO),
                true,
            )
        }
    };

    let per_option = upper_bound.checked_mul(a)?.checked_add(b)?;
    let per_option = if cross {
        FixedPointInt::ONE.checked_add(shock)?.checked_mul(per_option)?
    } else {
        per_option
    };
    per_option.checked_mul(short_amount)
}

impl MarginCalculator {
    /// Collateral (in `collateral_decimals` units, rounded up) a naked short
    /// of `short_amount` options needs at `underlying_price`.
    ///
    /// Amounts and prices carry 8 decimals.
    #[allow(clippy::too_many_arguments)]
    pub fn get_naked_margin_required(
        &self,
        product: ProductKey,
        short_amount: U256,
        strike_price: U256,
        underlying_price: U256,
        expiry: Timestamp,
        collateral_decimals: u8,
        now: Timestamp,
    ) -> Result<U256, MarginError> {
        let margin = self.naked_margin_value(
            product,
            FixedPointInt::from_scaled_uint(short_amount, BASE_DECIMALS)?,
            FixedPointInt::from_scaled_uint(strike_price, BASE_DECIMALS)?,
            FixedPointInt::from_scaled_uint(underlying_price, BASE_DECIMALS)?,
            expiry,
            now,
        )?;
        Ok(margin.to_scaled_uint(collateral_decimals, false)?)
    }

    pub(crate) fn naked_margin_value(
        &self,
        product: ProductKey,
        short_amount: FixedPointInt,
        strike_price: FixedPointInt,
        underlying_price: FixedPointInt,
        expiry: Timestamp,
        now: Timestamp,
    ) -> Result<FixedPointInt, MarginError> {
        let upper_bound = self.find_upper_bound_value(product, expiry, now)?;
        let spot_shock = self.spot_shock_value(product)?;
        let margin = naked_margin(&NakedMarginInputs {
            is_put: product.is_put,
            collateralized_by_underlying: product.is_collateralized_by_underlying(),
            short_amount,
            strike_price,
            underlying_price,
            spot_shock,
            upper_bound,
        })?;
        debug!(
            product = %product,
            short_amount = %short_amount,
            strike_price = %strike_price,
            underlying_price = %underlying_price,
            upper_bound = %upper_bound,
            spot_shock = %spot_shock,
            margin = %margin,
            "Naked margin computed"
        );
        Ok(margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use proptest::prelude::*;
    use test_case::test_case;

    const DAY: u64 = 86_400;
    const NOW: Timestamp = Timestamp::from_unix(1_700_000_000);

    fn owner() -> Address {
        Address::repeat_byte(0xa0)
    }

    fn weth() -> Address {
        Address::repeat_byte(0x01)
    }

    fn usdc() -> Address {
        Address::repeat_byte(0x02)
    }

    /// `n / 10_000` with 27 decimals.
    fn bps(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(23u64))
    }

    fn price(n: u64) -> U256 {
        U256::from(n) * U256::from(100_000_000u64)
    }

    fn calculator(product: ProductKey, upper_bound_bps: u64) -> MarginCalculator {
        let mut calc = MarginCalculator::new(owner());
        calc.set_upper_bound_values(owner(), product, &[DAY, 7 * DAY], &[bps(upper_bound_bps), bps(5000)])
            .unwrap();
        calc.set_spot_shock(owner(), product, bps(7500)).unwrap();
        calc
    }

    #[test_case(true, usdc(), 200, 300, 2370, 6, 47_400_000 ; "put with strike collateral, otm")]
    #[test_case(true, usdc(), 100, 150, 1678, 6, 16_780_000 ; "put with strike collateral, deep otm")]
    #[test_case(false, weth(), 2500, 1800, 1678, 18, 167_800_000_000_000_000 ; "call with underlying collateral, otm")]
    #[test_case(false, weth(), 1500, 2000, 1678, 18, 531_887_500_000_000_000 ; "call with underlying collateral, itm")]
    #[test_case(true, weth(), 150, 100, 2000, 18, 1_575_000_000_000_000_000 ; "put with underlying collateral")]
    #[test_case(false, usdc(), 2500, 1800, 1678, 6, 528_570_000 ; "call with strike collateral")]
    fn naked_margin_required(
        is_put: bool,
        collateral: Address,
        strike: u64,
        spot: u64,
        upper_bound_bps: u64,
        decimals: u8,
        expected: u64,
    ) {
        let product = ProductKey::new(weth(), usdc(), collateral, is_put);
        let calc = calculator(product, upper_bound_bps);
        let required = calc
            .get_naked_margin_required(
                product,
                U256::from(100_000_000u64),
                price(strike),
                price(spot),
                NOW.plus_seconds(DAY / 2),
                decimals,
                NOW,
            )
            .unwrap();
        assert_eq!(required, U256::from(expected));
    }

    #[test]
    fn itm_put_adds_intrinsic_value() {
        // K = 200, S = 200: a = 150, b = 50
        let product = ProductKey::new(weth(), usdc(), usdc(), true);
        let calc = calculator(product, 1000);
        let required = calc
            .get_naked_margin_required(
                product,
                U256::from(200_000_000u64),
                price(200),
                price(200),
                NOW.plus_seconds(DAY),
                6,
                NOW,
            )
            .unwrap();
        assert_eq!(required, U256::from(130_000_000u64));
    }

    #[test]
    fn rounds_up_to_collateral_decimals() {
        let product = ProductKey::new(weth(), usdc(), usdc(), true);
        let calc = calculator(product, 2370);
        // 1e-8 options of a 200 strike put need 4.74e-7 USDC
        let required = calc
            .get_naked_margin_required(
                product,
                U256::from(1u64),
                price(200),
                price(300),
                NOW.plus_seconds(DAY),
                6,
                NOW,
            )
            .unwrap();
        assert_eq!(required, U256::from(1u64));
    }

    #[test]
    fn bucket_is_chosen_by_time_left() {
        let product = ProductKey::new(weth(), usdc(), usdc(), true);
        let calc = calculator(product, 2370);
        let required = calc
            .get_naked_margin_required(
                product,
                U256::from(100_000_000u64),
                price(200),
                price(300),
                NOW.plus_seconds(3 * DAY),
                6,
                NOW,
            )
            .unwrap();
        assert_eq!(required, U256::from(100_000_000u64));
    }

    #[test]
    fn missing_configuration() {
        let product = ProductKey::new(weth(), usdc(), usdc(), true);
        let mut calc = MarginCalculator::new(owner());
        let required = |calc: &MarginCalculator, expiry: Timestamp| {
            calc.get_naked_margin_required(
                product,
                U256::from(1u64),
                price(200),
                price(300),
                expiry,
                6,
                NOW,
            )
        };

        assert_eq!(
            required(&calc, NOW.plus_seconds(DAY)),
            Err(MarginError::NoExpiryValues { product })
        );

        calc.set_upper_bound_values(owner(), product, &[DAY], &[bps(1000)])
            .unwrap();
        assert_eq!(
            required(&calc, NOW.plus_seconds(DAY)),
            Err(MarginError::SpotShockNotSet { product })
        );
        assert_eq!(
            required(&calc, NOW.plus_seconds(2 * DAY)),
            Err(MarginError::NoUpperBoundValue {
                product,
                time_to_expiry: 2 * DAY
            })
        );
        assert_eq!(
            required(&calc, Timestamp::from_unix(NOW.unix_seconds() - 1)),
            Err(MarginError::OptionExpired {
                expiry: Timestamp::from_unix(NOW.unix_seconds() - 1)
            })
        );
    }

    proptest! {
        #[test]
        fn margin_grows_with_short_amount(
            short in 1u64..1_000_000_000_000,
            extra in 1u64..1_000_000_000_000,
            strike in 1u64..100_000,
            spot in 1u64..100_000,
            is_put: bool,
        ) {
            let product = ProductKey::new(weth(), usdc(), usdc(), is_put);
            let calc = calculator(product, 1678);
            let quote = |amount: u64| {
                calc.get_naked_margin_required(
                    product,
                    U256::from(amount),
                    price(strike),
                    price(spot),
                    NOW.plus_seconds(DAY),
                    6,
                    NOW,
                )
                .unwrap()
            };
            prop_assert!(quote(short) <= quote(short + extra));
        }
    }
}
