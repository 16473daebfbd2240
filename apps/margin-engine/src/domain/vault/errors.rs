//! Vault accounting errors.

use alloy_primitives::U256;
use thiserror::Error;

use super::aggregate::PositionKind;
use crate::domain::shared::ErrorCategory;

/// Errors raised by vault slot accounting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VaultError {
    /// Deposits must be strictly positive.
    #[error("{kind} amount must be greater than zero")]
    ZeroAmount {
        /// Slot list being modified.
        kind: PositionKind,
    },

    /// Index is neither an existing slot nor the next free one.
    #[error("Invalid {kind} index {index} (slots: {len})")]
    InvalidIndex {
        /// Slot list being modified.
        kind: PositionKind,
        /// Requested index.
        index: usize,
        /// Current number of slots.
        len: usize,
    },

    /// Slot already holds a different item.
    #[error("{kind} slot {index} holds a different asset")]
    SlotMismatch {
        /// Slot list being modified.
        kind: PositionKind,
        /// Slot index.
        index: usize,
    },

    /// Removal exceeds the slot balance.
    #[error("Cannot remove {requested} from {kind} slot {index} holding {available}")]
    InsufficientBalance {
        /// Slot list being modified.
        kind: PositionKind,
        /// Slot index.
        index: usize,
        /// Amount held.
        available: U256,
        /// Amount requested.
        requested: U256,
    },

    /// Deposit would overflow the slot balance.
    #[error("{kind} slot {index} balance overflow")]
    AmountOverflow {
        /// Slot list being modified.
        kind: PositionKind,
        /// Slot index.
        index: usize,
    },

    /// Vault type value is not a known type.
    #[error("Unknown vault type {value}")]
    UnknownVaultType {
        /// Raw value.
        value: u8,
    },
}

impl VaultError {
    /// Error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ZeroAmount { .. } | Self::UnknownVaultType { .. } => {
                ErrorCategory::Configuration
            }
            Self::AmountOverflow { .. } => ErrorCategory::Arithmetic,
            Self::InvalidIndex { .. }
            | Self::SlotMismatch { .. }
            | Self::InsufficientBalance { .. } => ErrorCategory::State,
        }
    }
}
