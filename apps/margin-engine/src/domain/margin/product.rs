//! Product identity and per-product margin parameters.

use std::collections::BTreeMap;
use std::fmt;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::domain::vault::Otoken;

/// The unit of margin configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductKey {
    /// Underlying asset.
    pub underlying: Address,
    /// Strike asset.
    pub strike: Address,
    /// Collateral asset.
    pub collateral: Address,
    /// Put (true) or call (false).
    pub is_put: bool,
}

impl ProductKey {
    /// Create a product key.
    #[must_use]
    pub const fn new(underlying: Address, strike: Address, collateral: Address, is_put: bool) -> Self {
        Self {
            underlying,
            strike,
            collateral,
            is_put,
        }
    }

    /// Whether the collateral is the underlying asset.
    #[must_use]
    pub fn is_collateralized_by_underlying(&self) -> bool {
        self.collateral == self.underlying
    }
}

impl From<&Otoken> for ProductKey {
    fn from(otoken: &Otoken) -> Self {
        Self::new(
            otoken.underlying.address,
            otoken.strike.address,
            otoken.collateral.address,
            otoken.is_put,
        )
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.underlying,
            self.strike,
            self.collateral,
            if self.is_put { "PUT" } else { "CALL" }
        )
    }
}

/// Stored parameters of one product, all 27 decimals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ProductParams {
    /// Zero when unset.
    pub(crate) spot_shock: U256,
    /// Time to expiry (seconds) to upper bound value.
    pub(crate) upper_bounds: BTreeMap<u64, U256>,
}

impl ProductParams {
    pub(crate) fn last_time_to_expiry(&self) -> Option<u64> {
        self.upper_bounds.keys().next_back().copied()
    }
}
