//! Asset value object.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A token identified by address, with its native decimal count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    /// Token address.
    pub address: Address,
    /// Native decimals of the token.
    pub decimals: u8,
}

impl Asset {
    /// Create a new asset.
    #[must_use]
    pub const fn new(address: Address, decimals: u8) -> Self {
        Self { address, decimals }
    }

    /// Token address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Native decimals.
    #[must_use]
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} dp)", self.address, self.decimals)
    }
}
