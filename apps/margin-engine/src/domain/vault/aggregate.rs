//! Vault aggregate.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::VaultError;
use super::otoken::Otoken;
use crate::domain::shared::{Asset, Timestamp};

/// How a vault is margined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaultType {
    /// Fully collateralized; never liquidated.
    #[default]
    FullyCollateralized,
    /// Partially collateralized naked short; subject to liquidation.
    NakedMargin,
}

impl VaultType {
    /// Numeric identifier (0 or 1).
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        match self {
            Self::FullyCollateralized => 0,
            Self::NakedMargin => 1,
        }
    }
}

impl TryFrom<u8> for VaultType {
    type Error = VaultError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::FullyCollateralized),
            1 => Ok(Self::NakedMargin),
            value => Err(VaultError::UnknownVaultType { value }),
        }
    }
}

/// Which slot list of a vault an operation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionKind {
    /// Short otokens.
    Short,
    /// Long otokens.
    Long,
    /// Collateral assets.
    Collateral,
}

impl fmt::Display for PositionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Short => "short",
            Self::Long => "long",
            Self::Collateral => "collateral",
        })
    }
}

/// One indexed position: an item (or nothing, once emptied) and an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot<T> {
    item: Option<T>,
    amount: U256,
}

impl<T: Copy> Slot<T> {
    /// Item held, if any.
    #[must_use]
    pub fn item(&self) -> Option<T> {
        self.item
    }

    /// Amount held.
    #[must_use]
    pub const fn amount(&self) -> U256 {
        self.amount
    }
}

fn deposit<T: Copy + PartialEq>(
    slots: &mut Vec<Slot<T>>,
    kind: PositionKind,
    item: T,
    amount: U256,
    index: usize,
) -> Result<(), VaultError> {
    if amount.is_zero() {
        return Err(VaultError::ZeroAmount { kind });
    }
    let len = slots.len();
    if index == len {
        slots.push(Slot {
            item: Some(item),
            amount,
        });
        return Ok(());
    }
    let slot = slots
        .get_mut(index)
        .ok_or(VaultError::InvalidIndex { kind, index, len })?;
    if slot.item.is_some_and(|held| held != item) {
        return Err(VaultError::SlotMismatch { kind, index });
    }
    slot.amount = slot
        .amount
        .checked_add(amount)
        .ok_or(VaultError::AmountOverflow { kind, index })?;
    slot.item = Some(item);
    Ok(())
}

fn withdraw<T: Copy + PartialEq>(
    slots: &mut [Slot<T>],
    kind: PositionKind,
    item: T,
    amount: U256,
    index: usize,
) -> Result<(), VaultError> {
    let len = slots.len();
    let slot = slots
        .get_mut(index)
        .ok_or(VaultError::InvalidIndex { kind, index, len })?;
    if slot.item != Some(item) {
        return Err(VaultError::SlotMismatch { kind, index });
    }
    let remaining =
        slot.amount
            .checked_sub(amount)
            .ok_or(VaultError::InsufficientBalance {
                kind,
                index,
                available: slot.amount,
                requested: amount,
            })?;
    slot.amount = remaining;
    if remaining.is_zero() {
        slot.item = None;
    }
    Ok(())
}

fn first<T: Copy>(slots: &[Slot<T>]) -> Option<(T, U256)> {
    slots
        .first()
        .and_then(|slot| slot.item.map(|item| (item, slot.amount)))
}

/// A user's collateralized option position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    shorts: Vec<Slot<Otoken>>,
    longs: Vec<Slot<Otoken>>,
    collateral: Vec<Slot<Asset>>,
    latest_update: Timestamp,
}

impl Vault {
    /// Create an empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` of `otoken` to the short slot at `index`.
    ///
    /// `index == len` opens a new slot; an existing slot must hold the same
    /// otoken or be empty.
    pub fn add_short(
        &mut self,
        otoken: Otoken,
        amount: U256,
        index: usize,
        now: Timestamp,
    ) -> Result<(), VaultError> {
        deposit(&mut self.shorts, PositionKind::Short, otoken, amount, index)?;
        self.touch(now);
        Ok(())
    }

    /// Remove `amount` of `otoken` from the short slot at `index`.
    pub fn remove_short(
        &mut self,
        otoken: Otoken,
        amount: U256,
        index: usize,
        now: Timestamp,
    ) -> Result<(), VaultError> {
        withdraw(&mut self.shorts, PositionKind::Short, otoken, amount, index)?;
        self.touch(now);
        Ok(())
    }

    /// Add `amount` of `otoken` to the long slot at `index`.
    pub fn add_long(
        &mut self,
        otoken: Otoken,
        amount: U256,
        index: usize,
        now: Timestamp,
    ) -> Result<(), VaultError> {
        deposit(&mut self.longs, PositionKind::Long, otoken, amount, index)?;
        self.touch(now);
        Ok(())
    }

    /// Remove `amount` of `otoken` from the long slot at `index`.
    pub fn remove_long(
        &mut self,
        otoken: Otoken,
        amount: U256,
        index: usize,
        now: Timestamp,
    ) -> Result<(), VaultError> {
        withdraw(&mut self.longs, PositionKind::Long, otoken, amount, index)?;
        self.touch(now);
        Ok(())
    }

    /// Add `amount` of `asset` to the collateral slot at `index`.
    pub fn add_collateral(
        &mut self,
        asset: Asset,
        amount: U256,
        index: usize,
        now: Timestamp,
    ) -> Result<(), VaultError> {
        deposit(
            &mut self.collateral,
            PositionKind::Collateral,
            asset,
            amount,
            index,
        )?;
        self.touch(now);
        Ok(())
    }

    /// Remove `amount` of `asset` from the collateral slot at `index`.
    pub fn remove_collateral(
        &mut self,
        asset: Asset,
        amount: U256,
        index: usize,
        now: Timestamp,
    ) -> Result<(), VaultError> {
        withdraw(
            &mut self.collateral,
            PositionKind::Collateral,
            asset,
            amount,
            index,
        )?;
        self.touch(now);
        Ok(())
    }

    fn touch(&mut self, now: Timestamp) {
        self.latest_update = now;
        tracing::debug!(
            shorts = self.shorts.len(),
            longs = self.longs.len(),
            collateral = self.collateral.len(),
            now = %now,
            "Vault updated"
        );
    }

    /// Short slots.
    #[must_use]
    pub fn shorts(&self) -> &[Slot<Otoken>] {
        &self.shorts
    }

    /// Long slots.
    #[must_use]
    pub fn longs(&self) -> &[Slot<Otoken>] {
        &self.longs
    }

    /// Collateral slots.
    #[must_use]
    pub fn collateral(&self) -> &[Slot<Asset>] {
        &self.collateral
    }

    /// Otoken and amount in the first short slot, if occupied.
    #[must_use]
    pub fn first_short(&self) -> Option<(Otoken, U256)> {
        first(&self.shorts)
    }

    /// Otoken and amount in the first long slot, if occupied.
    #[must_use]
    pub fn first_long(&self) -> Option<(Otoken, U256)> {
        first(&self.longs)
    }

    /// Asset and amount in the first collateral slot, if occupied.
    #[must_use]
    pub fn first_collateral(&self) -> Option<(Asset, U256)> {
        first(&self.collateral)
    }

    /// Time of the last successful mutation.
    #[must_use]
    pub const fn latest_update_timestamp(&self) -> Timestamp {
        self.latest_update
    }
}
