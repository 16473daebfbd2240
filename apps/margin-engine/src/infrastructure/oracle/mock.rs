//! Mock oracle for testing.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use alloy_primitives::{Address, U256};

use crate::domain::oracle::{ExpiryPrice, OracleError, PriceReader, PricerError, RoundData};
use crate::domain::shared::Timestamp;

/// In-memory `PriceReader` whose answers are set directly.
#[derive(Debug, Default)]
pub struct MockOracle {
    prices: RwLock<HashMap<Address, U256>>,
    expiry_prices: RwLock<HashMap<(Address, Timestamp), ExpiryPrice>>,
    rounds: RwLock<HashMap<(Address, u64), RoundData>>,
}

impl MockOracle {
    /// Create an empty mock oracle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the live price of an asset (8 decimals).
    pub fn set_price(&self, asset: Address, price: U256) {
        self.prices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(asset, price);
    }

    /// Set the expiry price of an asset and whether it is final.
    pub fn set_expiry_price(
        &self,
        asset: Address,
        expiry: Timestamp,
        price: U256,
        is_finalized: bool,
    ) {
        self.expiry_prices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                (asset, expiry),
                ExpiryPrice {
                    price,
                    is_finalized,
                },
            );
    }

    /// Set the price of an asset at a round.
    pub fn set_round_data(&self, asset: Address, round_id: u64, price: U256, timestamp: Timestamp) {
        self.rounds
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((asset, round_id), RoundData { price, timestamp });
    }
}

impl PriceReader for MockOracle {
    fn price(&self, asset: Address) -> Result<U256, OracleError> {
        self.prices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&asset)
            .copied()
            .ok_or(OracleError::NoPricerConfigured { asset })
    }

    fn expiry_price(
        &self,
        asset: Address,
        expiry: Timestamp,
        _now: Timestamp,
    ) -> Result<ExpiryPrice, OracleError> {
        self.expiry_prices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(asset, expiry))
            .copied()
            .ok_or(OracleError::ExpiryPriceNotSet { asset, expiry })
    }

    fn round_data(
        &self,
        asset: Address,
        round_id: u64,
        _now: Timestamp,
    ) -> Result<RoundData, OracleError> {
        self.rounds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(asset, round_id))
            .copied()
            .ok_or(OracleError::Pricer(PricerError::NoRoundData { round_id }))
    }
}
