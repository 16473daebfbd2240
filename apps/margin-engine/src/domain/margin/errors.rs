//! Margin calculator errors.

use alloy_primitives::{Address, U256};
use thiserror::Error;

use super::product::ProductKey;
use crate::domain::fixed_point::MathError;
use crate::domain::oracle::OracleError;
use crate::domain::shared::{AccessError, ErrorCategory, Timestamp};
use crate::domain::vault::{PositionKind, VaultType};

/// Errors raised by the margin calculator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarginError {
    /// Owner-only operation called by someone else.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Fixed-point math failed.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Oracle lookup failed.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    // ---- configuration ----
    /// Dust must be positive.
    #[error("Invalid collateral dust for {asset}: must be greater than zero")]
    InvalidDustAmount {
        /// Collateral asset.
        asset: Address,
    },

    /// Empty times-to-expiry batch.
    #[error("Invalid times to expiry array: must not be empty")]
    InvalidTimesToExpiry,

    /// Batch arrays have different lengths.
    #[error("Invalid values array: {times} times to expiry for {values} values")]
    InvalidValuesArray {
        /// Number of times.
        times: usize,
        /// Number of values.
        values: usize,
    },

    /// Batch is not strictly increasing.
    #[error("Times to expiry should be in strictly increasing order")]
    TimesNotInOrder,

    /// Batch does not start after the product's last bucket.
    #[error("Expiry array is not in order: {first} is not after existing {last}")]
    ExpiryArrayNotInOrder {
        /// First time in the batch.
        first: u64,
        /// Last existing time.
        last: u64,
    },

    /// Upper bound values must be positive.
    #[error("No expiry upper bound value found for time to expiry {time_to_expiry}")]
    ZeroUpperBoundValue {
        /// Bucket time.
        time_to_expiry: u64,
    },

    /// Replacement upper bound value must be positive.
    #[error("Invalid upper bound value: must be greater than zero")]
    InvalidUpperBoundValue,

    /// Bucket to update does not exist.
    #[error("Upper bound value not found for time to expiry {time_to_expiry}")]
    UpperBoundValueNotFound {
        /// Bucket time.
        time_to_expiry: u64,
    },

    /// Spot shock must be positive.
    #[error("Invalid spot shock value: must be greater than zero")]
    InvalidSpotShock,

    /// Product has no time-to-expiry buckets.
    #[error("Product {product} has no expiry values")]
    NoExpiryValues {
        /// Product.
        product: ProductKey,
    },

    /// No bucket covers the remaining time.
    #[error("Product {product} has no upper bound value for time to expiry {time_to_expiry}")]
    NoUpperBoundValue {
        /// Product.
        product: ProductKey,
        /// Remaining time in seconds.
        time_to_expiry: u64,
    },

    /// Product has no spot shock.
    #[error("Product {product} has no spot shock value")]
    SpotShockNotSet {
        /// Product.
        product: ProductKey,
    },

    /// Only naked margin vaults can be liquidated.
    #[error("Invalid vault type to liquidate: {vault_type:?}")]
    InvalidVaultType {
        /// Type supplied.
        vault_type: VaultType,
    },

    // ---- temporal ----
    /// Naked margin is only defined before expiry.
    #[error("Option expired at {expiry}")]
    OptionExpired {
        /// Expiry.
        expiry: Timestamp,
    },

    /// Payout requested before expiry.
    #[error("Otoken {otoken} has not expired yet (expiry {expiry})")]
    OtokenNotExpired {
        /// Otoken address.
        otoken: Address,
        /// Expiry.
        expiry: Timestamp,
    },

    /// Expiry price missing or still disputable.
    #[error("Price of {asset} at expiry {expiry} is not finalized yet")]
    ExpiryPriceNotFinalized {
        /// Asset.
        asset: Address,
        /// Expiry.
        expiry: Timestamp,
    },

    /// Expired short positions cannot be liquidated.
    #[error("Cannot liquidate expired short otoken {otoken}")]
    ShortOtokenExpired {
        /// Otoken address.
        otoken: Address,
    },

    /// Auction round is not after the vault's latest update.
    #[error("Auction round at {round_timestamp} is not after vault update at {latest_update}")]
    AuctionTooEarly {
        /// Round timestamp.
        round_timestamp: Timestamp,
        /// Vault latest update.
        latest_update: Timestamp,
    },

    // ---- vault state ----
    /// More than one slot of a kind.
    #[error("Too many {kind} assets in the vault: {count}")]
    TooManyAssets {
        /// Slot kind.
        kind: PositionKind,
        /// Number of slots.
        count: usize,
    },

    /// Long cannot offset the short.
    #[error("Long otoken {long} is not marginable against short otoken {short}")]
    LongNotMarginable {
        /// Long otoken address.
        long: Address,
        /// Short otoken address.
        short: Address,
    },

    /// Collateral asset differs from the option's collateral.
    #[error("Collateral asset {collateral} is not marginable for otoken {otoken}")]
    CollateralNotMarginable {
        /// Vault collateral.
        collateral: Address,
        /// Otoken address.
        otoken: Address,
    },

    /// Naked margin vaults hold no longs.
    #[error("Naked margin vault cannot have a long otoken")]
    NakedVaultHasLong,

    /// Naked vault collateral must exceed the dust.
    #[error("Naked margin vault collateral {amount} must be greater than dust {dust}")]
    CollateralBelowDust {
        /// Collateral held.
        amount: U256,
        /// Dust for the collateral asset.
        dust: U256,
    },
}

impl MarginError {
    /// Error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Access(e) => e.category(),
            Self::Math(e) => e.category(),
            Self::Oracle(e) => e.category(),
            Self::InvalidDustAmount { .. }
            | Self::InvalidTimesToExpiry
            | Self::InvalidValuesArray { .. }
            | Self::TimesNotInOrder
            | Self::ExpiryArrayNotInOrder { .. }
            | Self::ZeroUpperBoundValue { .. }
            | Self::InvalidUpperBoundValue
            | Self::UpperBoundValueNotFound { .. }
            | Self::InvalidSpotShock
            | Self::NoExpiryValues { .. }
            | Self::NoUpperBoundValue { .. }
            | Self::SpotShockNotSet { .. }
            | Self::InvalidVaultType { .. } => ErrorCategory::Configuration,
            Self::OptionExpired { .. }
            | Self::OtokenNotExpired { .. }
            | Self::ExpiryPriceNotFinalized { .. }
            | Self::ShortOtokenExpired { .. }
            | Self::AuctionTooEarly { .. } => ErrorCategory::Temporal,
            Self::TooManyAssets { .. }
            | Self::LongNotMarginable { .. }
            | Self::CollateralNotMarginable { .. }
            | Self::NakedVaultHasLong
            | Self::CollateralBelowDust { .. } => ErrorCategory::State,
        }
    }
}
