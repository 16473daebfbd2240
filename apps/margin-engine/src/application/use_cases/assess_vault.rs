//! Assess Vault Use Case

use std::sync::{Arc, PoisonError, RwLock};

use alloy_primitives::U256;
use tracing::debug;

use crate::application::dto::{
    AssessVaultRequest, LiquidationDto, OtokenDto, OtokenPositionDto, VaultAssessmentDto,
};
use crate::domain::fixed_point::{BASE_DECIMALS, decimal_to_scaled, scaled_to_decimal};
use crate::domain::margin::MarginCalculator;
use crate::domain::oracle::PriceReader;
use crate::domain::shared::Timestamp;
use crate::domain::vault::{Otoken, Vault, VaultType};
use crate::error::EngineError;

/// Use case for computing a vault's excess collateral and liquidation state.
pub struct AssessVaultUseCase<O: PriceReader> {
    calculator: Arc<MarginCalculator>,
    oracle: Arc<RwLock<O>>,
}

impl<O: PriceReader> AssessVaultUseCase<O> {
    /// Create a new AssessVaultUseCase.
    pub fn new(calculator: Arc<MarginCalculator>, oracle: Arc<RwLock<O>>) -> Self {
        Self { calculator, oracle }
    }

    /// Execute the use case.
    ///
    /// Liquidation is only checked for naked vaults with an unexpired short
    /// when the request names a round. Every price is read under one read
    /// lock, so an assessment never mixes two oracle states.
    pub fn execute(&self, request: &AssessVaultRequest) -> Result<VaultAssessmentDto, EngineError> {
        let now = request.now.unwrap_or_else(Timestamp::now);
        let vault = build_vault(request)?;
        let decimals = collateral_decimals(request);

        let oracle = self.oracle.read().unwrap_or_else(PoisonError::into_inner);
        let (excess, is_excess) =
            self.calculator
                .get_excess_collateral(&*oracle, &vault, request.vault_type, now)?;

        let short_is_live = request
            .short
            .as_ref()
            .is_some_and(|short| short.otoken.expiry > now);
        let liquidation = match request.round_id {
            Some(round_id) if request.vault_type == VaultType::NakedMargin && short_is_live => {
                let check = self.calculator.is_liquidatable(
                    &*oracle,
                    &vault,
                    request.vault_type,
                    round_id,
                    now,
                )?;
                Some(LiquidationDto {
                    is_liquidatable: check.is_liquidatable,
                    debt_price: scaled_to_decimal(check.debt_price, decimals)?,
                    collateral_dust: scaled_to_decimal(check.collateral_dust, decimals)?,
                })
            }
            _ => None,
        };
        drop(oracle);

        let excess_collateral = scaled_to_decimal(excess, decimals)?;
        debug!(
            vault_type = ?request.vault_type,
            excess_collateral = %excess_collateral,
            is_excess,
            liquidatable = liquidation.as_ref().is_some_and(|l| l.is_liquidatable),
            "Vault assessed"
        );

        Ok(VaultAssessmentDto {
            excess_collateral,
            is_excess,
            liquidation,
            evaluated_at: now,
        })
    }
}

fn to_otoken(dto: &OtokenDto) -> Result<Otoken, EngineError> {
    Ok(Otoken {
        address: dto.address,
        underlying: dto.underlying,
        strike: dto.strike,
        collateral: dto.collateral,
        strike_price: decimal_to_scaled(dto.strike_price, BASE_DECIMALS)?,
        expiry: dto.expiry,
        is_put: dto.is_put,
    })
}

fn option_amount(position: &OtokenPositionDto) -> Result<(Otoken, U256), EngineError> {
    Ok((
        to_otoken(&position.otoken)?,
        decimal_to_scaled(position.amount, BASE_DECIMALS)?,
    ))
}

/// Vault holding the request's positions, each in slot 0.
fn build_vault(request: &AssessVaultRequest) -> Result<Vault, EngineError> {
    let at = request.latest_update;
    let mut vault = Vault::new();
    if let Some(short) = &request.short {
        let (otoken, amount) = option_amount(short)?;
        vault.add_short(otoken, amount, 0, at)?;
    }
    if let Some(long) = &request.long {
        let (otoken, amount) = option_amount(long)?;
        vault.add_long(otoken, amount, 0, at)?;
    }
    if let Some(collateral) = &request.collateral {
        let amount = decimal_to_scaled(collateral.amount, collateral.asset.decimals)?;
        vault.add_collateral(collateral.asset, amount, 0, at)?;
    }
    Ok(vault)
}

/// Decimals results are reported in.
fn collateral_decimals(request: &AssessVaultRequest) -> u8 {
    request
        .collateral
        .as_ref()
        .map(|c| c.asset.decimals)
        .or_else(|| request.short.as_ref().map(|s| s.otoken.collateral.decimals))
        .or_else(|| request.long.as_ref().map(|l| l.otoken.collateral.decimals))
        .unwrap_or(0)
}
