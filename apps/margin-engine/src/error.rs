//! Crate-wide error for the margin engine.
//!
//! Wraps the error of every bounded context and maps it to a stable reason
//! code for the JSON boundary.
//!
//! | Code | Usage |
//! |------|-------|
//! | `INVALID_CONFIG` | Configuration file unreadable or invalid |
//! | `UNAUTHORIZED` | Caller lacks the role for a privileged operation |
//! | `INVALID_PARAMETER` | Rejected parameter or missing product setup |
//! | `PRICE_UNAVAILABLE` | No price source or no price for the request |
//! | `OUTSIDE_TIME_WINDOW` | Operation attempted outside its time window |
//! | `INVALID_STATE` | Operation not valid for the current state |
//! | `INVALID_VAULT` | Vault does not satisfy margin rules |
//! | `ARITHMETIC_ERROR` | Overflow, division by zero, out-of-range conversion |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::fixed_point::MathError;
use crate::domain::margin::MarginError;
use crate::domain::oracle::{OracleError, PricerError};
use crate::domain::shared::{AccessError, ErrorCategory};
use crate::domain::vault::VaultError;

/// Error codes for the margin engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Configuration file unreadable or invalid.
    InvalidConfig,
    /// Caller lacks the required role.
    Unauthorized,
    /// Rejected parameter or missing product setup.
    InvalidParameter,
    /// No price source or no price for the request.
    PriceUnavailable,
    /// Operation attempted outside its permitted time window.
    OutsideTimeWindow,
    /// Operation not valid for the current state.
    InvalidState,
    /// Vault does not satisfy margin rules.
    InvalidVault,
    /// Arithmetic failure.
    ArithmeticError,
}

impl ErrorCode {
    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidParameter => "INVALID_PARAMETER",
            Self::PriceUnavailable => "PRICE_UNAVAILABLE",
            Self::OutsideTimeWindow => "OUTSIDE_TIME_WINDOW",
            Self::InvalidState => "INVALID_STATE",
            Self::InvalidVault => "INVALID_VAULT",
            Self::ArithmeticError => "ARITHMETIC_ERROR",
        }
    }

    const fn from_category(category: ErrorCategory) -> Self {
        match category {
            ErrorCategory::Configuration => Self::InvalidParameter,
            ErrorCategory::Arithmetic => Self::ArithmeticError,
            ErrorCategory::Temporal => Self::OutsideTimeWindow,
            ErrorCategory::State => Self::InvalidState,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Any failure of the margin engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Ownership failure.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Fixed-point failure.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Oracle failure.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// Pricer failure.
    #[error(transparent)]
    Pricer(#[from] PricerError),

    /// Vault bookkeeping failure.
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// Margin calculator failure.
    #[error(transparent)]
    Margin(#[from] MarginError),
}

impl EngineError {
    /// Stable reason code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Config(_) => ErrorCode::InvalidConfig,
            Self::Access(_) => ErrorCode::Unauthorized,
            Self::Math(_) => ErrorCode::ArithmeticError,
            Self::Oracle(e) => oracle_code(e),
            Self::Pricer(e) => pricer_code(e),
            Self::Vault(e) => ErrorCode::from_category(e.category()),
            Self::Margin(e) => margin_code(e),
        }
    }
}

const fn oracle_code(error: &OracleError) -> ErrorCode {
    match error {
        OracleError::Access(_) | OracleError::Unauthorized { .. } | OracleError::NotDisputer { .. } => {
            ErrorCode::Unauthorized
        }
        OracleError::NoPricerConfigured { .. } | OracleError::ExpiryPriceNotSet { .. } => {
            ErrorCode::PriceUnavailable
        }
        OracleError::Pricer(e) => pricer_code(e),
        other => ErrorCode::from_category(other.category()),
    }
}

const fn pricer_code(error: &PricerError) -> ErrorCode {
    match error {
        PricerError::Unauthorized { .. } => ErrorCode::Unauthorized,
        PricerError::Math(_) => ErrorCode::ArithmeticError,
        PricerError::NoRoundData { .. }
        | PricerError::NoRounds
        | PricerError::NoPriceSubmitted
        | PricerError::UnderlyingPriceUnavailable { .. }
        | PricerError::UnderlyingPriceNotSet { .. }
        | PricerError::HistoricalPriceUnavailable { .. } => ErrorCode::PriceUnavailable,
        other => ErrorCode::from_category(other.category()),
    }
}

const fn margin_code(error: &MarginError) -> ErrorCode {
    match error {
        MarginError::Access(_) => ErrorCode::Unauthorized,
        MarginError::Math(_) => ErrorCode::ArithmeticError,
        MarginError::Oracle(e) => oracle_code(e),
        MarginError::TooManyAssets { .. }
        | MarginError::LongNotMarginable { .. }
        | MarginError::CollateralNotMarginable { .. }
        | MarginError::NakedVaultHasLong
        | MarginError::CollateralBelowDust { .. } => ErrorCode::InvalidVault,
        other => ErrorCode::from_category(other.category()),
    }
}
