//! Owner-gated access control.
//!
//! Every privileged mutation carries the caller's address explicitly; there is
//! no ambient sender.

use alloy_primitives::Address;
use thiserror::Error;

use super::errors::ErrorCategory;

/// Access control failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Caller is not the owner.
    #[error("Caller {caller} is not the owner")]
    NotOwner {
        /// The rejected caller.
        caller: Address,
    },

    /// Ownership cannot be transferred to the zero address.
    #[error("New owner cannot be the zero address")]
    ZeroOwner,
}

impl AccessError {
    /// Error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Single-owner access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    owner: Address,
}

impl Ownership {
    /// Create with an initial owner.
    #[must_use]
    pub const fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// Current owner.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Fail unless `caller` is the owner.
    pub fn ensure_owner(&self, caller: Address) -> Result<(), AccessError> {
        if caller == self.owner {
            Ok(())
        } else {
            tracing::warn!(caller = %caller, "Rejected privileged call from non-owner");
            Err(AccessError::NotOwner { caller })
        }
    }

    /// Hand ownership to `new_owner`.
    pub fn transfer(&mut self, caller: Address, new_owner: Address) -> Result<(), AccessError> {
        self.ensure_owner(caller)?;
        if new_owner == Address::ZERO {
            return Err(AccessError::ZeroOwner);
        }
        tracing::info!(previous = %self.owner, new_owner = %new_owner, "Ownership transferred");
        self.owner = new_owner;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_passes_and_others_fail() {
        let owner = Address::repeat_byte(0x01);
        let other = Address::repeat_byte(0x02);
        let ownership = Ownership::new(owner);

        assert!(ownership.ensure_owner(owner).is_ok());
        assert_eq!(
            ownership.ensure_owner(other),
            Err(AccessError::NotOwner { caller: other })
        );
    }

    #[test]
    fn transfer_moves_ownership() {
        let owner = Address::repeat_byte(0x01);
        let next = Address::repeat_byte(0x02);
        let mut ownership = Ownership::new(owner);

        ownership.transfer(owner, next).unwrap();
        assert_eq!(ownership.owner(), next);
        assert!(ownership.ensure_owner(owner).is_err());
    }

    #[test]
    fn transfer_rejects_zero_and_non_owner() {
        let owner = Address::repeat_byte(0x01);
        let mut ownership = Ownership::new(owner);

        assert_eq!(
            ownership.transfer(owner, Address::ZERO),
            Err(AccessError::ZeroOwner)
        );
        assert!(
            ownership
                .transfer(Address::repeat_byte(0x09), Address::repeat_byte(0x03))
                .is_err()
        );
        assert_eq!(ownership.owner(), owner);
    }
}
