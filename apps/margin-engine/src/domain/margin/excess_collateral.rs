//! Vault margin requirement and excess collateral.

use alloy_primitives::U256;
use tracing::debug;

use super::calculator::MarginCalculator;
use super::errors::MarginError;
use super::product::ProductKey;
use super::vault_details::VaultDetails;
use crate::domain::fixed_point::{BASE_DECIMALS, FixedPointInt};
use crate::domain::oracle::PriceReader;
use crate::domain::shared::Timestamp;
use crate::domain::vault::{Otoken, Vault, VaultType};

impl MarginCalculator {
    /// Collateral a vault holds beyond its requirement (`is_excess == true`),
    /// or its shortfall.
    ///
    /// Excess is rounded down and shortfall rounded up, in the collateral's
    /// native decimals.
    pub fn get_excess_collateral(
        &self,
        oracle: &dyn PriceReader,
        vault: &Vault,
        vault_type: VaultType,
        now: Timestamp,
    ) -> Result<(U256, bool), MarginError> {
        let details = VaultDetails::from_vault(vault, vault_type)?;
        self.validate_vault(&details)?;

        let Some(otoken) = details.otoken() else {
            return Ok((details.collateral_amount(), true));
        };
        let decimals = otoken.collateral.decimals;
        let collateral = FixedPointInt::from_scaled_uint(details.collateral_amount(), decimals)?;
        let required = self.margin_required(oracle, &details, &otoken, now)?;

        let net = collateral.checked_sub(required)?;
        let is_excess = !net.is_negative();
        let amount = net.to_scaled_uint(decimals, is_excess)?;
        debug!(
            otoken = %otoken.address,
            vault_type = ?vault_type,
            collateral = %collateral,
            required = %required,
            amount = %amount,
            is_excess,
            "Excess collateral computed"
        );
        Ok((amount, is_excess))
    }

    /// Margin required by a validated vault, in collateral units.
    fn margin_required(
        &self,
        oracle: &dyn PriceReader,
        details: &VaultDetails,
        otoken: &Otoken,
        now: Timestamp,
    ) -> Result<FixedPointInt, MarginError> {
        let short_amount = FixedPointInt::from_scaled_uint(details.short_amount(), BASE_DECIMALS)?;
        let long_amount = FixedPointInt::from_scaled_uint(details.long_amount(), BASE_DECIMALS)?;

        if otoken.is_expired(now) {
            let short_cash = match details.short {
                Some((short, _)) => self.expired_cash_value(oracle, &short, now)?,
                None => FixedPointInt::ZERO,
            };
            let long_cash = match details.long {
                Some((long, _)) => self.expired_cash_value(oracle, &long, now)?,
                None => FixedPointInt::ZERO,
            };
            let net = short_cash
                .checked_mul(short_amount)?
                .checked_sub(long_cash.checked_mul(long_amount)?)?;
            return self.convert_on_expiry_price(
                oracle,
                net,
                otoken.strike.address,
                otoken.collateral.address,
                otoken.expiry,
                now,
            );
        }

        let strike_of = |slot: Option<(Otoken, U256)>| {
            slot.map_or(Ok(FixedPointInt::ZERO), |(otoken, _)| {
                FixedPointInt::from_scaled_uint(otoken.strike_price, BASE_DECIMALS)
            })
        };
        let short_strike = strike_of(details.short)?;
        let long_strike = strike_of(details.long)?;

        if details.vault_type == VaultType::NakedMargin {
            let spot = FixedPointInt::from_scaled_uint(
                oracle.price(otoken.underlying.address)?,
                BASE_DECIMALS,
            )?;
            return self.naked_margin_value(
                ProductKey::from(otoken),
                short_amount,
                short_strike,
                spot,
                otoken.expiry,
                now,
            );
        }

        if otoken.is_put {
            let margin = short_strike
                .checked_mul(short_amount)?
                .checked_sub(long_strike.checked_mul(short_amount.min(long_amount))?)?
                .max(FixedPointInt::ZERO);
            self.convert_on_live_price(
                oracle,
                margin,
                otoken.strike.address,
                otoken.collateral.address,
            )
        } else {
            let margin = if long_strike.is_zero() {
                short_amount
            } else {
                let strike_gap = long_strike
                    .checked_sub(short_strike)?
                    .checked_mul(short_amount)?
                    .checked_div(long_strike)?;
                let uncovered = short_amount
                    .checked_sub(long_amount)?
                    .max(FixedPointInt::ZERO);
                strike_gap.max(uncovered)
            };
            self.convert_on_live_price(
                oracle,
                margin,
                otoken.underlying.address,
                otoken.collateral.address,
            )
        }
    }
}
