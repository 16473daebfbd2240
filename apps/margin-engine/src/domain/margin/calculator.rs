//! Margin calculator: product configuration and shared conversions.
//!
//! The calculation services live in sibling modules as further `impl` blocks
//! on [`MarginCalculator`].

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use tracing::info;

use super::errors::MarginError;
use super::product::{ProductKey, ProductParams};
use crate::domain::fixed_point::{CONFIG_DECIMALS, FixedPointInt, BASE_DECIMALS};
use crate::domain::oracle::PriceReader;
use crate::domain::shared::{Ownership, Timestamp};

/// Margin calculator with its owner-managed configuration.
#[derive(Debug, Clone)]
pub struct MarginCalculator {
    ownership: Ownership,
    products: HashMap<ProductKey, ProductParams>,
    collateral_dust: HashMap<Address, U256>,
    oracle_deviation: U256,
}

impl MarginCalculator {
    /// Create an unconfigured calculator owned by `owner`.
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self {
            ownership: Ownership::new(owner),
            products: HashMap::new(),
            collateral_dust: HashMap::new(),
            oracle_deviation: U256::ZERO,
        }
    }

    /// Current owner.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.ownership.owner()
    }

    /// Transfer ownership.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), MarginError> {
        Ok(self.ownership.transfer(caller, new_owner)?)
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Set the dust (collateral native units) of a collateral asset.
    pub fn set_collateral_dust(
        &mut self,
        caller: Address,
        asset: Address,
        dust: U256,
    ) -> Result<(), MarginError> {
        self.ownership.ensure_owner(caller)?;
        if dust.is_zero() {
            return Err(MarginError::InvalidDustAmount { asset });
        }
        info!(asset = %asset, dust = %dust, "Collateral dust set");
        self.collateral_dust.insert(asset, dust);
        Ok(())
    }

    /// Append time-to-expiry buckets with their upper bound values (27 decimals).
    ///
    /// The batch is validated as a whole before anything is stored.
    pub fn set_upper_bound_values(
        &mut self,
        caller: Address,
        product: ProductKey,
        times_to_expiry: &[u64],
        values: &[U256],
    ) -> Result<(), MarginError> {
        self.ownership.ensure_owner(caller)?;
        let Some(&first) = times_to_expiry.first() else {
            return Err(MarginError::InvalidTimesToExpiry);
        };
        if times_to_expiry.len() != values.len() {
            return Err(MarginError::InvalidValuesArray {
                times: times_to_expiry.len(),
                values: values.len(),
            });
        }
        if let Some(last) = self
            .products
            .get(&product)
            .and_then(ProductParams::last_time_to_expiry)
        {
            if first <= last {
                return Err(MarginError::ExpiryArrayNotInOrder { first, last });
            }
        }
        if times_to_expiry.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(MarginError::TimesNotInOrder);
        }
        if let Some((time_to_expiry, _)) = times_to_expiry
            .iter()
            .zip(values)
            .find(|(_, value)| value.is_zero())
        {
            return Err(MarginError::ZeroUpperBoundValue {
                time_to_expiry: *time_to_expiry,
            });
        }

        let params = self.products.entry(product).or_default();
        params
            .upper_bounds
            .extend(times_to_expiry.iter().copied().zip(values.iter().copied()));
        info!(product = %product, count = times_to_expiry.len(), "Upper bound values set");
        Ok(())
    }

    /// Append a single time-to-expiry bucket.
    pub fn set_product_time_to_expiry(
        &mut self,
        caller: Address,
        product: ProductKey,
        time_to_expiry: u64,
        value: U256,
    ) -> Result<(), MarginError> {
        self.set_upper_bound_values(caller, product, &[time_to_expiry], &[value])
    }

    /// Replace the value of an existing bucket.
    pub fn update_upper_bound_value(
        &mut self,
        caller: Address,
        product: ProductKey,
        time_to_expiry: u64,
        value: U256,
    ) -> Result<(), MarginError> {
        self.ownership.ensure_owner(caller)?;
        if value.is_zero() {
            return Err(MarginError::InvalidUpperBoundValue);
        }
        let slot = self
            .products
            .get_mut(&product)
            .and_then(|params| params.upper_bounds.get_mut(&time_to_expiry))
            .ok_or(MarginError::UpperBoundValueNotFound { time_to_expiry })?;
        *slot = value;
        info!(product = %product, time_to_expiry, value = %value, "Upper bound value updated");
        Ok(())
    }

    /// Set the spot shock (27 decimals) of a product.
    pub fn set_spot_shock(
        &mut self,
        caller: Address,
        product: ProductKey,
        value: U256,
    ) -> Result<(), MarginError> {
        self.ownership.ensure_owner(caller)?;
        if value.is_zero() {
            return Err(MarginError::InvalidSpotShock);
        }
        self.products.entry(product).or_default().spot_shock = value;
        info!(product = %product, spot_shock = %value, "Spot shock set");
        Ok(())
    }

    /// Set the oracle deviation (27 decimals) used by liquidation auctions.
    pub fn set_oracle_deviation(&mut self, caller: Address, value: U256) -> Result<(), MarginError> {
        self.ownership.ensure_owner(caller)?;
        info!(oracle_deviation = %value, "Oracle deviation set");
        self.oracle_deviation = value;
        Ok(())
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Bucket times of a product, ascending.
    #[must_use]
    pub fn times_to_expiry(&self, product: ProductKey) -> Vec<u64> {
        self.products
            .get(&product)
            .map(|params| params.upper_bounds.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Upper bound value of a bucket (zero if absent).
    #[must_use]
    pub fn max_price(&self, product: ProductKey, time_to_expiry: u64) -> U256 {
        self.products
            .get(&product)
            .and_then(|params| params.upper_bounds.get(&time_to_expiry).copied())
            .unwrap_or(U256::ZERO)
    }

    /// Spot shock of a product (zero if unset).
    #[must_use]
    pub fn spot_shock(&self, product: ProductKey) -> U256 {
        self.products
            .get(&product)
            .map_or(U256::ZERO, |params| params.spot_shock)
    }

    /// Dust of a collateral asset (zero if unset).
    #[must_use]
    pub fn collateral_dust(&self, asset: Address) -> U256 {
        self.collateral_dust.get(&asset).copied().unwrap_or(U256::ZERO)
    }

    /// Oracle deviation.
    #[must_use]
    pub const fn oracle_deviation(&self) -> U256 {
        self.oracle_deviation
    }

    /// Upper bound value of the first bucket covering the time left until `expiry`.
    pub fn find_upper_bound_value(
        &self,
        product: ProductKey,
        expiry: Timestamp,
        now: Timestamp,
    ) -> Result<FixedPointInt, MarginError> {
        let params = self
            .products
            .get(&product)
            .filter(|params| !params.upper_bounds.is_empty())
            .ok_or(MarginError::NoExpiryValues { product })?;
        let time_to_expiry = now
            .seconds_until(expiry)
            .filter(|&secs| secs > 0)
            .ok_or(MarginError::OptionExpired { expiry })?;
        let (_, value) = params
            .upper_bounds
            .range(time_to_expiry..)
            .next()
            .ok_or(MarginError::NoUpperBoundValue {
                product,
                time_to_expiry,
            })?;
        Ok(FixedPointInt::from_scaled_uint(*value, CONFIG_DECIMALS)?)
    }

    pub(crate) fn spot_shock_value(&self, product: ProductKey) -> Result<FixedPointInt, MarginError> {
        let value = self.spot_shock(product);
        if value.is_zero() {
            return Err(MarginError::SpotShockNotSet { product });
        }
        Ok(FixedPointInt::from_scaled_uint(value, CONFIG_DECIMALS)?)
    }

    pub(crate) fn oracle_deviation_value(&self) -> Result<FixedPointInt, MarginError> {
        Ok(FixedPointInt::from_scaled_uint(
            self.oracle_deviation,
            CONFIG_DECIMALS,
        )?)
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    /// Convert `amount` of `from` into `to` at live prices.
    pub(crate) fn convert_on_live_price(
        &self,
        oracle: &dyn PriceReader,
        amount: FixedPointInt,
        from: Address,
        to: Address,
    ) -> Result<FixedPointInt, MarginError> {
        if from == to {
            return Ok(amount);
        }
        let from_price = FixedPointInt::from_scaled_uint(oracle.price(from)?, BASE_DECIMALS)?;
        let to_price = FixedPointInt::from_scaled_uint(oracle.price(to)?, BASE_DECIMALS)?;
        Ok(amount.checked_mul(from_price)?.checked_div(to_price)?)
    }

    /// Convert `amount` of `from` into `to` at finalized expiry prices.
    pub(crate) fn convert_on_expiry_price(
        &self,
        oracle: &dyn PriceReader,
        amount: FixedPointInt,
        from: Address,
        to: Address,
        expiry: Timestamp,
        now: Timestamp,
    ) -> Result<FixedPointInt, MarginError> {
        if from == to {
            return Ok(amount);
        }
        let from_price = finalized_expiry_price(oracle, from, expiry, now)?;
        let to_price = finalized_expiry_price(oracle, to, expiry, now)?;
        Ok(amount.checked_mul(from_price)?.checked_div(to_price)?)
    }
}

/// Finalized expiry price of `asset` as fixed point.
fn finalized_expiry_price(
    oracle: &dyn PriceReader,
    asset: Address,
    expiry: Timestamp,
    now: Timestamp,
) -> Result<FixedPointInt, MarginError> {
    let not_finalized = MarginError::ExpiryPriceNotFinalized { asset, expiry };
    let price = match oracle.expiry_price(asset, expiry, now) {
        Ok(price) if price.is_finalized => price.price,
        Ok(_) | Err(crate::domain::oracle::OracleError::ExpiryPriceNotSet { .. }) => {
            return Err(not_finalized);
        }
        Err(e) => return Err(e.into()),
    };
    Ok(FixedPointInt::from_scaled_uint(price, BASE_DECIMALS)?)
}
