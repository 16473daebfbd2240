//! Margin calculator configuration: products, dust and oracle deviation.

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::margin::ProductKey;

/// Margin calculator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarginConfig {
    /// Discount on the liquidation auction starting price, as a fraction of spot.
    #[serde(default)]
    pub oracle_deviation: Decimal,
    /// Minimum collateral of naked vaults, per collateral asset.
    #[serde(default)]
    pub collateral_dust: Vec<CollateralDustConfig>,
    /// Margined products.
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

/// Dust of one collateral asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollateralDustConfig {
    /// Collateral asset.
    pub asset: Address,
    /// Decimals of the asset.
    pub decimals: u8,
    /// Dust in whole units.
    pub amount: Decimal,
}

/// One product and its parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Underlying asset.
    pub underlying: Address,
    /// Strike asset.
    pub strike: Address,
    /// Collateral asset.
    pub collateral: Address,
    /// Put (true) or call (false).
    pub is_put: bool,
    /// Spot shock as a fraction.
    pub spot_shock: Decimal,
    /// Upper bound values by time to expiry, ascending.
    #[serde(default)]
    pub upper_bounds: Vec<UpperBoundConfig>,
}

impl ProductConfig {
    /// Key of the product.
    #[must_use]
    pub const fn key(&self) -> ProductKey {
        ProductKey::new(self.underlying, self.strike, self.collateral, self.is_put)
    }
}

/// Upper bound value of one time-to-expiry bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpperBoundConfig {
    /// Bucket end in seconds before expiry.
    pub time_to_expiry_secs: u64,
    /// Maximum option price as a fraction of notional.
    pub value: Decimal,
}
