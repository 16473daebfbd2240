//! Vault Bounded Context
//!
//! A vault is one user's collateralized position: short options, long options
//! and collateral, each held in indexed slots.
//!
//! # Key Concepts
//!
//! - **Otoken**: an option token (underlying, strike asset, collateral asset,
//!   strike price, expiry, put/call)
//! - **Slot**: an item plus an amount; emptied slots keep their index
//! - **Vault type**: fully collateralized or naked margin (liquidatable)

pub mod aggregate;
pub mod errors;
pub mod otoken;

pub use aggregate::{PositionKind, Slot, Vault, VaultType};
pub use errors::VaultError;
pub use otoken::Otoken;
