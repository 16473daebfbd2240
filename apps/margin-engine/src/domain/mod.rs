//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Aggregates**: Consistency boundaries with invariants (`PriceOracle`, `Vault`)
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Services**: Stateless business logic (margin formulas)
//! - **Ports**: Traits implemented by adapters (`Pricer`, `PriceReader`, `RoundFeed`)
//!
//! # Bounded Contexts
//!
//! - [`fixed_point`]: Signed 18-decimal arithmetic
//! - [`oracle`]: Expiry price establishment and dispute
//! - [`vault`]: Option tokens and vault slot accounting
//! - [`margin`]: Collateral requirements, liquidation and settlement

pub mod fixed_point;
pub mod margin;
pub mod oracle;
pub mod shared;
pub mod vault;
