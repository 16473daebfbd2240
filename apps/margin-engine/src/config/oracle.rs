//! Oracle configuration: disputer, stable prices and pricers.

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Oracle configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Address allowed to dispute submitted expiry prices.
    #[serde(default)]
    pub disputer: Option<Address>,
    /// Assets with a constant price.
    #[serde(default)]
    pub stable_prices: Vec<StablePriceConfig>,
    /// Assets priced by a pricer.
    #[serde(default)]
    pub pricers: Vec<PricerConfig>,
}

/// A stable-priced asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StablePriceConfig {
    /// Asset.
    pub asset: Address,
    /// Price in the unit of account.
    pub price: Decimal,
}

/// Pricers that can be built from configuration alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricerKind {
    /// Prices submitted by a bot.
    Manual,
    /// Constant 1.0.
    Stable,
}

/// A pricer and its periods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricerConfig {
    /// Pricer type.
    pub kind: PricerKind,
    /// Address the oracle knows the pricer by.
    pub address: Address,
    /// Asset priced.
    pub asset: Address,
    /// Trusted submitter, required for manual pricers.
    #[serde(default)]
    pub bot: Option<Address>,
    /// Seconds after expiry before a price may be submitted.
    #[serde(default)]
    pub locking_period_secs: u64,
    /// Seconds after submission during which the price may be disputed.
    #[serde(default)]
    pub dispute_period_secs: u64,
}
