//! Liquidation of naked margin vaults.
//!
//! An undercollateralized vault is sold through a one-hour Dutch auction. The
//! price per option starts at the option's cash value minus the oracle
//! deviation and rises linearly to the vault's collateral per option.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::calculator::MarginCalculator;
use super::errors::MarginError;
use super::product::ProductKey;
use super::vault_details::VaultDetails;
use crate::domain::fixed_point::{BASE_DECIMALS, FixedPointInt};
use crate::domain::oracle::PriceReader;
use crate::domain::shared::Timestamp;
use crate::domain::vault::{Otoken, Vault, VaultType};

/// Duration of the liquidation auction in seconds.
pub const AUCTION_TIME: u64 = 3_600;

/// Liquidation verdict for a vault.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationCheck {
    /// Whether the vault can be liquidated.
    pub is_liquidatable: bool,
    /// Collateral paid per option repaid (collateral decimals, rounded down).
    pub debt_price: U256,
    /// Dust of the vault's collateral asset.
    pub collateral_dust: U256,
}

impl MarginCalculator {
    /// Whether a vault is undercollateralized at the price of `round_id`, and
    /// the current auction price if it is.
    ///
    /// The vault is not validated here. Callers must only pass vaults whose
    /// collateral asset is the short's collateral asset; amounts are scaled
    /// with the short's collateral decimals.
    pub fn is_liquidatable(
        &self,
        oracle: &dyn PriceReader,
        vault: &Vault,
        vault_type: VaultType,
        round_id: u64,
        now: Timestamp,
    ) -> Result<LiquidationCheck, MarginError> {
        if vault_type != VaultType::NakedMargin {
            return Err(MarginError::InvalidVaultType { vault_type });
        }
        let details = VaultDetails::from_vault(vault, vault_type)?;
        let Some((short, short_amount)) = details.short else {
            return Ok(LiquidationCheck::default());
        };
        if short.is_expired(now) {
            return Err(MarginError::ShortOtokenExpired {
                otoken: short.address,
            });
        }

        let round = oracle.round_data(short.underlying.address, round_id, now)?;
        let latest_update = vault.latest_update_timestamp();
        if round.timestamp <= latest_update {
            return Err(MarginError::AuctionTooEarly {
                round_timestamp: round.timestamp,
                latest_update,
            });
        }

        let decimals = short.collateral.decimals;
        let short_amount = FixedPointInt::from_scaled_uint(short_amount, BASE_DECIMALS)?;
        let strike = FixedPointInt::from_scaled_uint(short.strike_price, BASE_DECIMALS)?;
        let spot = FixedPointInt::from_scaled_uint(round.price, BASE_DECIMALS)?;
        let collateral = FixedPointInt::from_scaled_uint(details.collateral_amount(), decimals)?;

        let required = self.naked_margin_value(
            ProductKey::from(&short),
            short_amount,
            strike,
            spot,
            short.expiry,
            now,
        )?;
        if collateral >= required {
            debug!(
                otoken = %short.address,
                collateral = %collateral,
                required = %required,
                "Vault is sufficiently collateralized"
            );
            return Ok(LiquidationCheck::default());
        }

        let elapsed = round.timestamp.seconds_until(now).unwrap_or(0);
        let debt_price = self.debt_price(&short, collateral, short_amount, strike, spot, elapsed)?;
        let check = LiquidationCheck {
            is_liquidatable: true,
            debt_price: debt_price.to_scaled_uint(decimals, true)?,
            collateral_dust: self.collateral_dust(short.collateral.address),
        };
        info!(
            otoken = %short.address,
            collateral = %collateral,
            required = %required,
            debt_price = %check.debt_price,
            auction_elapsed = elapsed,
            "Vault is liquidatable"
        );
        Ok(check)
    }

    /// Auction price per option `elapsed` seconds after the round.
    fn debt_price(
        &self,
        short: &Otoken,
        collateral: FixedPointInt,
        short_amount: FixedPointInt,
        strike: FixedPointInt,
        spot: FixedPointInt,
        elapsed: u64,
    ) -> Result<FixedPointInt, MarginError> {
        let ending_price = collateral.checked_div(short_amount)?;
        if elapsed >= AUCTION_TIME {
            return Ok(ending_price);
        }

        let cash_value = if short.is_put {
            strike.checked_sub(spot)?
        } else {
            spot.checked_sub(strike)?
        }
        .max(FixedPointInt::ZERO);
        let deviation = self.oracle_deviation_value()?.checked_mul(spot)?;
        let mut starting_price = cash_value
            .checked_sub(deviation)?
            .max(FixedPointInt::ZERO);
        if short.is_collateralized_by_underlying() {
            starting_price = starting_price.checked_div(spot)?;
        }

        let progress = ending_price
            .checked_sub(starting_price)?
            .checked_mul(FixedPointInt::from_scaled_uint(U256::from(elapsed), 0)?)?
            .checked_div(FixedPointInt::from_scaled_uint(U256::from(AUCTION_TIME), 0)?)?;
        Ok(starting_price.checked_add(progress)?.min(ending_price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::Asset;
    use crate::infrastructure::oracle::MockOracle;
    use alloy_primitives::Address;
    use test_case::test_case;

    const DAY: u64 = 86_400;
    const OPENED: Timestamp = Timestamp::from_unix(1_700_000_000);
    const ROUND: Timestamp = Timestamp::from_unix(1_700_000_100);
    const ROUND_ID: u64 = 42;

    fn owner() -> Address {
        Address::repeat_byte(0xa0)
    }

    fn weth() -> Asset {
        Asset::new(Address::repeat_byte(0x01), 18)
    }

    fn usdc() -> Asset {
        Asset::new(Address::repeat_byte(0x02), 6)
    }

    fn price(n: u64) -> U256 {
        U256::from(n) * U256::from(100_000_000u64)
    }

    /// `n / 1000` with 27 decimals.
    fn per_mille(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(24u64))
    }

    fn put() -> Otoken {
        Otoken::put(
            Address::repeat_byte(0x10),
            weth(),
            usdc(),
            usdc(),
            price(200),
            OPENED.plus_seconds(DAY),
        )
    }

    fn calc() -> MarginCalculator {
        let product = ProductKey::from(&put());
        let mut calc = MarginCalculator::new(owner());
        calc.set_upper_bound_values(owner(), product, &[2 * DAY], &[per_mille(237)])
            .unwrap();
        calc.set_spot_shock(owner(), product, per_mille(750)).unwrap();
        calc.set_oracle_deviation(owner(), per_mille(50)).unwrap();
        calc.set_collateral_dust(owner(), usdc().address, U256::from(1_000_000u64))
            .unwrap();
        calc
    }

    fn oracle() -> MockOracle {
        let oracle = MockOracle::new();
        oracle.set_round_data(weth().address, ROUND_ID, price(100), ROUND);
        oracle
    }

    fn vault(collateral: u64) -> Vault {
        let mut vault = Vault::new();
        vault.add_short(put(), price(1), 0, OPENED).unwrap();
        vault
            .add_collateral(usdc(), U256::from(collateral), 0, OPENED)
            .unwrap();
        vault
    }

    #[test]
    fn only_naked_vaults() {
        assert_eq!(
            calc().is_liquidatable(&oracle(), &vault(1), VaultType::FullyCollateralized, ROUND_ID, ROUND),
            Err(MarginError::InvalidVaultType {
                vault_type: VaultType::FullyCollateralized
            })
        );
    }

    #[test]
    fn vault_without_short_is_safe() {
        assert_eq!(
            calc().is_liquidatable(&oracle(), &Vault::new(), VaultType::NakedMargin, ROUND_ID, ROUND),
            Ok(LiquidationCheck::default())
        );
    }

    #[test]
    fn collateral_at_requirement_is_safe() {
        // requirement at spot 100: 0.237 * 75 + 125 = 142.775
        assert_eq!(
            calc().is_liquidatable(&oracle(), &vault(142_775_000), VaultType::NakedMargin, ROUND_ID, ROUND),
            Ok(LiquidationCheck::default())
        );
    }

    #[test_case(0, 95_000_000 ; "auction start")]
    #[test_case(600, 102_962_499 ; "ten minutes in")]
    #[test_case(3_600, 142_774_995 ; "auction end")]
    #[test_case(7_200, 142_774_995 ; "after auction")]
    fn debt_price_rises_to_collateral(elapsed: u64, expected: u64) {
        let check = calc()
            .is_liquidatable(
                &oracle(),
                &vault(142_774_995),
                VaultType::NakedMargin,
                ROUND_ID,
                ROUND.plus_seconds(elapsed),
            )
            .unwrap();
        assert_eq!(
            check,
            LiquidationCheck {
                is_liquidatable: true,
                debt_price: U256::from(expected),
                collateral_dust: U256::from(1_000_000u64),
            }
        );
    }

    #[test]
    fn expired_short_cannot_be_liquidated() {
        assert_eq!(
            calc().is_liquidatable(
                &oracle(),
                &vault(1),
                VaultType::NakedMargin,
                ROUND_ID,
                put().expiry
            ),
            Err(MarginError::ShortOtokenExpired {
                otoken: put().address
            })
        );
    }

    #[test]
    fn round_must_follow_vault_update() {
        let oracle = oracle();
        oracle.set_round_data(weth().address, 41, price(100), OPENED);
        assert_eq!(
            calc().is_liquidatable(&oracle, &vault(1), VaultType::NakedMargin, 41, ROUND),
            Err(MarginError::AuctionTooEarly {
                round_timestamp: OPENED,
                latest_update: OPENED
            })
        );
    }
}
