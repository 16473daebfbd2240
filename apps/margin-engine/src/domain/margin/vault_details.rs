//! Vault snapshot the calculator works on, and its validity rules.

use alloy_primitives::U256;
use tracing::warn;

use super::calculator::MarginCalculator;
use super::errors::MarginError;
use crate::domain::shared::Asset;
use crate::domain::vault::{Otoken, PositionKind, Slot, Vault, VaultType};

/// First short, long and collateral of a vault, with its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultDetails {
    /// Short otoken and amount (8 decimals).
    pub short: Option<(Otoken, U256)>,
    /// Long otoken and amount (8 decimals).
    pub long: Option<(Otoken, U256)>,
    /// Collateral asset and amount (native decimals).
    pub collateral: Option<(Asset, U256)>,
    /// Vault type.
    pub vault_type: VaultType,
}

impl VaultDetails {
    /// Snapshot `vault`, rejecting vaults with more than one slot of a kind.
    pub fn from_vault(vault: &Vault, vault_type: VaultType) -> Result<Self, MarginError> {
        ensure_single(vault.shorts(), PositionKind::Short)?;
        ensure_single(vault.longs(), PositionKind::Long)?;
        ensure_single(vault.collateral(), PositionKind::Collateral)?;
        Ok(Self {
            short: vault.first_short(),
            long: vault.first_long(),
            collateral: vault.first_collateral(),
            vault_type,
        })
    }

    /// The option that defines the vault's product: the short, else the long.
    #[must_use]
    pub fn otoken(&self) -> Option<Otoken> {
        self.short.or(self.long).map(|(otoken, _)| otoken)
    }

    /// Short amount, zero when there is no short.
    #[must_use]
    pub fn short_amount(&self) -> U256 {
        self.short.map_or(U256::ZERO, |(_, amount)| amount)
    }

    /// Long amount, zero when there is no long.
    #[must_use]
    pub fn long_amount(&self) -> U256 {
        self.long.map_or(U256::ZERO, |(_, amount)| amount)
    }

    /// Collateral amount, zero when there is no collateral.
    #[must_use]
    pub fn collateral_amount(&self) -> U256 {
        self.collateral.map_or(U256::ZERO, |(_, amount)| amount)
    }
}

fn ensure_single<T>(slots: &[Slot<T>], kind: PositionKind) -> Result<(), MarginError> {
    if slots.len() > 1 {
        return Err(MarginError::TooManyAssets {
            kind,
            count: slots.len(),
        });
    }
    Ok(())
}

/// A long offsets a short only if it is a different token on the same product
/// and expiry.
fn is_marginable_long(short: &Otoken, long: &Otoken) -> bool {
    short.address != long.address
        && short.underlying.address == long.underlying.address
        && short.strike.address == long.strike.address
        && short.collateral.address == long.collateral.address
        && short.expiry == long.expiry
        && short.is_put == long.is_put
}

impl MarginCalculator {
    /// Check the position rules a vault must satisfy before margining.
    pub(crate) fn validate_vault(&self, details: &VaultDetails) -> Result<(), MarginError> {
        if let (Some((short, _)), Some((long, _))) = (details.short, details.long) {
            if !is_marginable_long(&short, &long) {
                return Err(MarginError::LongNotMarginable {
                    long: long.address,
                    short: short.address,
                });
            }
        }

        if let (Some(otoken), Some((collateral, _))) = (details.otoken(), details.collateral) {
            if otoken.collateral.address != collateral.address {
                return Err(MarginError::CollateralNotMarginable {
                    collateral: collateral.address,
                    otoken: otoken.address,
                });
            }
        }

        if details.vault_type == VaultType::NakedMargin {
            if details.long.is_some() {
                return Err(MarginError::NakedVaultHasLong);
            }
            if let Some((short, _)) = details.short {
                let dust = self.collateral_dust(short.collateral.address);
                let amount = details.collateral_amount();
                if amount <= dust {
                    warn!(
                        otoken = %short.address,
                        amount = %amount,
                        dust = %dust,
                        "Naked vault collateral at or below dust"
                    );
                    return Err(MarginError::CollateralBelowDust { amount, dust });
                }
            }
        }
        Ok(())
    }
}
