//! Oracle and pricer errors.

use alloy_primitives::Address;
use thiserror::Error;

use crate::domain::fixed_point::MathError;
use crate::domain::shared::{AccessError, ErrorCategory, Timestamp};

/// Errors raised by the price oracle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// Owner-only operation called by someone else.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Caller may not submit a price for this asset.
    #[error("Caller {caller} is not authorized to set the expiry price of {asset}")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
        /// Asset being priced.
        asset: Address,
    },

    /// Caller is not the disputer.
    #[error("Caller {caller} is not the disputer")]
    NotDisputer {
        /// The rejected caller.
        caller: Address,
    },

    /// Pricer handle reports the zero address.
    #[error("Cannot set the zero address as pricer for {asset}")]
    ZeroPricerAddress {
        /// Asset being configured.
        asset: Address,
    },

    /// Asset already has a stable price, so it cannot get a pricer.
    #[error("Asset {asset} has a stable price")]
    StablePriceConfigured {
        /// Asset being configured.
        asset: Address,
    },

    /// Asset already has a pricer, so it cannot get a stable price.
    #[error("Asset {asset} has a pricer")]
    PricerConfigured {
        /// Asset being configured.
        asset: Address,
    },

    /// Stable prices must be positive.
    #[error("Stable price for {asset} must be greater than zero")]
    InvalidStablePrice {
        /// Asset being configured.
        asset: Address,
    },

    /// Asset has neither a pricer nor a stable price.
    #[error("No pricer or stable price configured for {asset}")]
    NoPricerConfigured {
        /// Asset queried.
        asset: Address,
    },

    /// Submission attempted before the locking period elapsed.
    #[error("Locking period for {asset} at {expiry} is not over")]
    LockingPeriodNotOver {
        /// Asset.
        asset: Address,
        /// Expiry timestamp.
        expiry: Timestamp,
    },

    /// A price is already stored and its dispute period is running.
    #[error("Price for {asset} at {expiry} already submitted; dispute period started")]
    PriceAlreadySubmitted {
        /// Asset.
        asset: Address,
        /// Expiry timestamp.
        expiry: Timestamp,
    },

    /// A price is already stored and final.
    #[error("Price for {asset} at {expiry} is finalized")]
    PriceFinalized {
        /// Asset.
        asset: Address,
        /// Expiry timestamp.
        expiry: Timestamp,
    },

    /// Dispute attempted after the window closed or after a prior dispute.
    #[error("Dispute period for {asset} at {expiry} is over")]
    DisputeWindowClosed {
        /// Asset.
        asset: Address,
        /// Expiry timestamp.
        expiry: Timestamp,
    },

    /// Dispute attempted on a price that was never submitted.
    #[error("No price to dispute for {asset} at {expiry}")]
    PriceToDisputeNotFound {
        /// Asset.
        asset: Address,
        /// Expiry timestamp.
        expiry: Timestamp,
    },

    /// No price stored for this asset and expiry.
    #[error("Expiry price for {asset} at {expiry} is not set")]
    ExpiryPriceNotSet {
        /// Asset.
        asset: Address,
        /// Expiry timestamp.
        expiry: Timestamp,
    },

    /// Migration was permanently closed.
    #[error("Migration has ended")]
    MigrationEnded,

    /// Migration arrays have different lengths.
    #[error("Invalid migration data: {timestamps} timestamps for {prices} prices")]
    MigrationDataMismatch {
        /// Number of timestamps.
        timestamps: usize,
        /// Number of prices.
        prices: usize,
    },

    /// Delegated pricer failed.
    #[error(transparent)]
    Pricer(#[from] PricerError),
}

impl OracleError {
    /// Error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Access(e) => e.category(),
            Self::Unauthorized { .. }
            | Self::NotDisputer { .. }
            | Self::ZeroPricerAddress { .. }
            | Self::StablePriceConfigured { .. }
            | Self::PricerConfigured { .. }
            | Self::InvalidStablePrice { .. }
            | Self::NoPricerConfigured { .. }
            | Self::MigrationDataMismatch { .. } => ErrorCategory::Configuration,
            Self::LockingPeriodNotOver { .. }
            | Self::PriceFinalized { .. }
            | Self::DisputeWindowClosed { .. } => ErrorCategory::Temporal,
            Self::PriceAlreadySubmitted { .. }
            | Self::PriceToDisputeNotFound { .. }
            | Self::ExpiryPriceNotSet { .. }
            | Self::MigrationEnded => ErrorCategory::State,
            Self::Pricer(e) => e.category(),
        }
    }
}

/// Errors raised by pricer adapters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricerError {
    /// Caller may not submit through this pricer.
    #[error("Caller {caller} is not authorized to submit through this pricer")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// Feed reported a negative answer.
    #[error("Round {round_id} reported a negative price")]
    NegativePrice {
        /// Round identifier.
        round_id: u64,
    },

    /// Feed has no data for the round.
    #[error("No data for round {round_id}")]
    NoRoundData {
        /// Round identifier.
        round_id: u64,
    },

    /// Feed has never reported.
    #[error("Feed has no rounds")]
    NoRounds,

    /// Submitted round is earlier than the expiry.
    #[error("Round {round_id} at {round_timestamp} is not at or after expiry {expiry}")]
    RoundNotFirstAfterExpiry {
        /// Round identifier.
        round_id: u64,
        /// Round timestamp.
        round_timestamp: Timestamp,
        /// Expiry timestamp.
        expiry: Timestamp,
    },

    /// An earlier round is already at or after the expiry.
    #[error("Previous round {round_id} at {round_timestamp} is not before expiry {expiry}")]
    PreviousRoundNotLastBeforeExpiry {
        /// Previous round identifier.
        round_id: u64,
        /// Previous round timestamp.
        round_timestamp: Timestamp,
        /// Expiry timestamp.
        expiry: Timestamp,
    },

    /// No earlier round with data exists.
    #[error("No round with data before round {round_id}")]
    NoPreviousRound {
        /// Submitted round identifier.
        round_id: u64,
    },

    /// Manual pricer has not received any price yet.
    #[error("No price has been submitted")]
    NoPriceSubmitted,

    /// Live price of the underlying could not be read.
    #[error("Price of underlying {asset} unavailable: {reason}")]
    UnderlyingPriceUnavailable {
        /// Underlying asset.
        asset: Address,
        /// Cause.
        reason: String,
    },

    /// Expiry price of the underlying has not been set.
    #[error("Expiry price of underlying {asset} at {expiry} is not set")]
    UnderlyingPriceNotSet {
        /// Underlying asset.
        asset: Address,
        /// Expiry timestamp.
        expiry: Timestamp,
    },

    /// Exchange rate source returned zero.
    #[error("Exchange rate is zero")]
    InvalidExchangeRate,

    /// Pricer does not keep historical prices.
    #[error("Historical prices are not available for round {round_id}")]
    HistoricalPriceUnavailable {
        /// Requested round.
        round_id: u64,
    },

    /// Price scaling failed.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl PricerError {
    /// Error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized { .. } | Self::InvalidExchangeRate => ErrorCategory::Configuration,
            Self::RoundNotFirstAfterExpiry { .. }
            | Self::PreviousRoundNotLastBeforeExpiry { .. } => ErrorCategory::Temporal,
            Self::NegativePrice { .. }
            | Self::NoRoundData { .. }
            | Self::NoRounds
            | Self::NoPreviousRound { .. }
            | Self::NoPriceSubmitted
            | Self::UnderlyingPriceUnavailable { .. }
            | Self::UnderlyingPriceNotSet { .. }
            | Self::HistoricalPriceUnavailable { .. } => ErrorCategory::State,
            Self::Math(e) => e.category(),
        }
    }
}
