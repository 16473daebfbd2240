//! Naked margin quote DTOs

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::margin::ProductKey;
use crate::domain::shared::Timestamp;

/// Request for the collateral a naked short needs.
///
/// Amounts and prices are human-facing decimals; they are scaled to 8
/// decimals before any math.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NakedMarginQuoteRequest {
    /// Underlying asset.
    pub underlying: Address,
    /// Strike asset.
    pub strike: Address,
    /// Collateral asset.
    pub collateral: Address,
    /// Put (true) or call (false).
    pub is_put: bool,
    /// Decimals of the collateral asset.
    pub collateral_decimals: u8,
    /// Number of options sold.
    pub short_amount: Decimal,
    /// Strike price.
    pub strike_price: Decimal,
    /// Underlying price to margin at.
    pub underlying_price: Decimal,
    /// Option expiry.
    pub expiry: Timestamp,
    /// Evaluation time; defaults to the wall clock.
    #[serde(default)]
    pub now: Option<Timestamp>,
}

impl NakedMarginQuoteRequest {
    /// Product the request is margined under.
    #[must_use]
    pub const fn product(&self) -> ProductKey {
        ProductKey::new(self.underlying, self.strike, self.collateral, self.is_put)
    }
}

/// Naked margin quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginQuoteDto {
    /// Product quoted.
    pub product: ProductKey,
    /// Number of options sold.
    pub short_amount: Decimal,
    /// Required collateral in whole collateral units, rounded up at the
    /// collateral's precision.
    pub required_margin: Decimal,
    /// Seconds left until expiry at evaluation time.
    pub time_to_expiry_secs: u64,
    /// Evaluation time.
    pub evaluated_at: Timestamp,
}
