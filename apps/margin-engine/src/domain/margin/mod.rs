//! Margin Bounded Context
//!
//! Decides how much collateral a vault needs, whether a naked vault can be
//! liquidated and at what price, and what an expired option pays out.
//!
//! # Key Concepts
//!
//! - **Product**: `(underlying, strike, collateral, isPut)`, the unit of
//!   margin configuration
//! - **Spot shock**: multiplier applied to the spot price in stress scenarios
//! - **Upper bound value**: maximum option price as a fraction of notional,
//!   bucketed by time to expiry
//! - **Collateral dust**: minimum collateral a naked vault must keep
//! - **Oracle deviation**: discount on the starting price of the liquidation
//!   auction
//!
//! # Services
//!
//! - `naked_margin`: the four naked margin formulas
//! - `excess_collateral`: spread and expired margin, vault excess/shortfall
//! - `liquidation`: liquidation verdict and Dutch auction debt price
//! - `settlement`: expired cash value and payout rate

pub mod calculator;
pub mod errors;
pub mod excess_collateral;
pub mod liquidation;
pub mod naked_margin;
pub mod product;
pub mod settlement;
pub mod vault_details;

pub use calculator::MarginCalculator;
pub use errors::MarginError;
pub use liquidation::{AUCTION_TIME, LiquidationCheck};
pub use product::ProductKey;
pub use vault_details::VaultDetails;
