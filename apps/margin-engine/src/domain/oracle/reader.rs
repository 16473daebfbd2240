//! Read-side oracle port used by the margin calculator and derived pricers.

use alloy_primitives::{Address, U256};

use super::errors::OracleError;
use super::value_objects::{ExpiryPrice, RoundData};
use crate::domain::shared::Timestamp;

/// Read access to prices.
pub trait PriceReader {
    /// Live price of `asset`, 8 decimals.
    fn price(&self, asset: Address) -> Result<U256, OracleError>;

    /// Stored price of `asset` at `expiry` with its finality at `now`.
    fn expiry_price(
        &self,
        asset: Address,
        expiry: Timestamp,
        now: Timestamp,
    ) -> Result<ExpiryPrice, OracleError>;

    /// Historical price of `asset` at `round_id`.
    fn round_data(
        &self,
        asset: Address,
        round_id: u64,
        now: Timestamp,
    ) -> Result<RoundData, OracleError>;
}
