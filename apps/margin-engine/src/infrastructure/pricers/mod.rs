//! Pricer Adapters
//!
//! Implementations of the `Pricer` port. Each pricer pushes expiry prices into
//! the `PriceOracle` under its own address, so the oracle's locking and
//! dispute rules apply to all of them.

pub mod derived;
pub mod manual;
pub mod round_feed;
pub mod stable;

pub use derived::{DerivedPricer, ExchangeRateSource, FixedExchangeRate};
pub use manual::ManualPricer;
pub use round_feed::{InMemoryRoundFeed, RoundFeedPricer};
pub use stable::StablePricer;

use alloy_primitives::U256;

use crate::domain::fixed_point::{BASE_DECIMALS, MathError, pow10};

/// Rescale a price from `decimals` to the oracle's 8 decimals, truncating.
pub(crate) fn scale_to_base(price: U256, decimals: u8) -> Result<U256, MathError> {
    if decimals >= BASE_DECIMALS {
        Ok(price / pow10(decimals - BASE_DECIMALS)?)
    } else {
        price
            .checked_mul(pow10(BASE_DECIMALS - decimals)?)
            .ok_or(MathError::Overflow {
                operation: "scale_to_base",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(8, 123_456_789, 123_456_789 ; "same decimals")]
    #[test_case(18, 1_500_000_000_000_000_000, 150_000_000 ; "down from 18")]
    #[test_case(6, 1_500_000, 150_000_000 ; "up from 6")]
    #[test_case(10, 199, 1 ; "truncates")]
    fn scales_to_eight_decimals(decimals: u8, price: u64, expected: u64) {
        assert_eq!(
            scale_to_base(U256::from(price), decimals),
            Ok(U256::from(expected))
        );
    }
}
