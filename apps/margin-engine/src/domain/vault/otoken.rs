//! Option token value object.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{Asset, Timestamp};

/// An option token.
///
/// Amounts of an otoken and its strike price carry 8 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Otoken {
    /// Token address (identity).
    pub address: Address,
    /// Asset the option is written on.
    pub underlying: Asset,
    /// Asset the strike price is denominated in.
    pub strike: Asset,
    /// Asset backing short positions.
    pub collateral: Asset,
    /// Strike price, 8 decimals.
    pub strike_price: U256,
    /// Expiry.
    pub expiry: Timestamp,
    /// Put (true) or call (false).
    pub is_put: bool,
}

impl Otoken {
    /// Create a put.
    #[must_use]
    pub const fn put(
        address: Address,
        underlying: Asset,
        strike: Asset,
        collateral: Asset,
        strike_price: U256,
        expiry: Timestamp,
    ) -> Self {
        Self {
            address,
            underlying,
            strike,
            collateral,
            strike_price,
            expiry,
            is_put: true,
        }
    }

    /// Create a call.
    #[must_use]
    pub const fn call(
        address: Address,
        underlying: Asset,
        strike: Asset,
        collateral: Asset,
        strike_price: U256,
        expiry: Timestamp,
    ) -> Self {
        Self {
            address,
            underlying,
            strike,
            collateral,
            strike_price,
            expiry,
            is_put: false,
        }
    }

    /// Whether the option has reached expiry at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expiry
    }

    /// Whether short positions are backed by the underlying asset itself.
    #[must_use]
    pub fn is_collateralized_by_underlying(&self) -> bool {
        self.collateral.address == self.underlying.address
    }
}

impl fmt::Display for Otoken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} strike={} expiry={}",
            self.address,
            if self.is_put { "PUT" } else { "CALL" },
            self.strike_price,
            self.expiry
        )
    }
}
