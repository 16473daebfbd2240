// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::unreadable_literal
    )
)]

//! Margin Engine - Options Margin and Pricing Core
//!
//! Deterministic margin accounting for collateralized options vaults.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic with no I/O
//!   - `fixed_point`: 18-decimal signed fixed-point math and signed/unsigned conversion
//!   - `oracle`: Expiry price oracle with locking, dispute and migration
//!   - `vault`: Option tokens and slot-based vault accounting
//!   - `margin`: Naked/spread margin, liquidation auction pricing, settlement payouts
//!
//! - **Application**: Use cases and orchestration
//!   - `dto`: Request/response types for the JSON boundary
//!   - `use_cases`: `QuoteNakedMargin`, `AssessVault`
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `pricers`: Round feed, manual, derived and stable pricers
//!   - `oracle`: In-memory mock oracle
//!   - `config`: Container wiring the oracle and calculator from configuration
//!
//! # Units
//!
//! Option amounts and prices carry 8 decimals, product parameters (spot shock,
//! upper bounds, oracle deviation) carry 27 decimals, collateral amounts carry
//! the collateral asset's own decimals. All math runs on [`FixedPointInt`]
//! with 18 decimals.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and DTOs.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Supporting Modules
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Crate-wide error type with stable reason codes.
pub mod error;

/// Logging setup for the binary.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::fixed_point::{FixedPointInt, MathError};
pub use domain::margin::{
    AUCTION_TIME, LiquidationCheck, MarginCalculator, MarginError, ProductKey, VaultDetails,
};
pub use domain::oracle::{
    ExpiryPrice, ExpiryPriceState, OracleError, PriceOracle, PriceReader, PriceSource, Pricer,
    PricerError, RoundData, SubmissionMode,
};
pub use domain::shared::{Asset, ErrorCategory, Timestamp};
pub use domain::vault::{Otoken, Vault, VaultError, VaultType};

// Application re-exports
pub use application::dto::{
    AssessVaultRequest, MarginQuoteDto, NakedMarginQuoteRequest, VaultAssessmentDto,
};
pub use application::use_cases::{AssessVaultUseCase, QuoteNakedMarginUseCase};

// Infrastructure re-exports
pub use infrastructure::config::Container;
pub use infrastructure::oracle::MockOracle;
pub use infrastructure::pricers::{
    DerivedPricer, InMemoryRoundFeed, ManualPricer, RoundFeedPricer, StablePricer,
};

pub use error::{EngineError, ErrorCode};
