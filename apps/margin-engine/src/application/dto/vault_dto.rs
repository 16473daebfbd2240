//! Vault assessment DTOs

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Asset, Timestamp};
use crate::domain::vault::VaultType;

/// Option token as seen at the JSON boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtokenDto {
    /// Token address.
    pub address: Address,
    /// Underlying asset.
    pub underlying: Asset,
    /// Strike asset.
    pub strike: Asset,
    /// Collateral asset.
    pub collateral: Asset,
    /// Strike price.
    pub strike_price: Decimal,
    /// Expiry.
    pub expiry: Timestamp,
    /// Put (true) or call (false).
    pub is_put: bool,
}

/// An option position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtokenPositionDto {
    /// Option held or sold.
    pub otoken: OtokenDto,
    /// Number of options.
    pub amount: Decimal,
}

/// A collateral position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollateralPositionDto {
    /// Collateral asset.
    pub asset: Asset,
    /// Amount in whole units.
    pub amount: Decimal,
}

/// Request to assess a single-position vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessVaultRequest {
    /// Margin type of the vault.
    #[serde(default)]
    pub vault_type: VaultType,
    /// Short position.
    #[serde(default)]
    pub short: Option<OtokenPositionDto>,
    /// Long position.
    #[serde(default)]
    pub long: Option<OtokenPositionDto>,
    /// Collateral position.
    #[serde(default)]
    pub collateral: Option<CollateralPositionDto>,
    /// Time of the last vault update.
    #[serde(default)]
    pub latest_update: Timestamp,
    /// Round of the underlying price to test liquidation against.
    #[serde(default)]
    pub round_id: Option<u64>,
    /// Evaluation time; defaults to the wall clock.
    #[serde(default)]
    pub now: Option<Timestamp>,
}

/// Liquidation verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationDto {
    /// Whether the vault can be liquidated.
    pub is_liquidatable: bool,
    /// Collateral paid per option repaid.
    pub debt_price: Decimal,
    /// Dust of the collateral asset.
    pub collateral_dust: Decimal,
}

/// Result of a vault assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultAssessmentDto {
    /// Excess collateral, or shortfall when `is_excess` is false.
    pub excess_collateral: Decimal,
    /// Whether `excess_collateral` is an excess.
    pub is_excess: bool,
    /// Liquidation verdict, for naked vaults assessed at a round.
    pub liquidation: Option<LiquidationDto>,
    /// Evaluation time.
    pub evaluated_at: Timestamp,
}
