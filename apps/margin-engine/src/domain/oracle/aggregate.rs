//! Price oracle aggregate.
//!
//! Lifecycle of the price of an asset at an expiry timestamp:
//!
//! ```text
//! Pending --(locking period over)--> Unset --(pricer submits)--> Unfinalized
//! Unfinalized --(dispute period over | disputer overrides)--> Finalized
//! ```
//!
//! Migrated prices and stable-priced assets are always `Finalized`.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use tracing::{debug, info, warn};

use super::errors::OracleError;
use super::pricer::Pricer;
use super::reader::PriceReader;
use super::value_objects::{
    ExpiryPrice, ExpiryPriceRecord, ExpiryPriceState, PriceOrigin, PriceSource, RoundData,
};
use crate::domain::shared::{Ownership, Timestamp};

/// Expiry price oracle.
#[derive(Debug)]
pub struct PriceOracle {
    ownership: Ownership,
    disputer: Option<Address>,
    sources: HashMap<Address, PriceSource>,
    locking_periods: HashMap<Address, u64>,
    dispute_periods: HashMap<Address, u64>,
    records: HashMap<(Address, Timestamp), ExpiryPriceRecord>,
    migration_ended: bool,
}

impl PriceOracle {
    /// Create an empty oracle owned by `owner`.
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self {
            ownership: Ownership::new(owner),
            disputer: None,
            sources: HashMap::new(),
            locking_periods: HashMap::new(),
            dispute_periods: HashMap::new(),
            records: HashMap::new(),
            migration_ended: false,
        }
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Current owner.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.ownership.owner()
    }

    /// Transfer ownership.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), OracleError> {
        Ok(self.ownership.transfer(caller, new_owner)?)
    }

    /// Delegate pricing of `asset` to `pricer`.
    pub fn set_asset_pricer(
        &mut self,
        caller: Address,
        asset: Address,
        pricer: Arc<dyn Pricer>,
    ) -> Result<(), OracleError> {
        self.ownership.ensure_owner(caller)?;
        if pricer.address() == Address::ZERO {
            return Err(OracleError::ZeroPricerAddress { asset });
        }
        if matches!(self.sources.get(&asset), Some(PriceSource::Stable(_))) {
            return Err(OracleError::StablePriceConfigured { asset });
        }
        info!(
            asset = %asset,
            pricer = %pricer.address(),
            mode = %pricer.submission_mode(),
            "Asset pricer set"
        );
        self.sources.insert(asset, PriceSource::Delegated(pricer));
        Ok(())
    }

    /// Fix the price of `asset` (8 decimals).
    pub fn set_stable_price(
        &mut self,
        caller: Address,
        asset: Address,
        price: U256,
    ) -> Result<(), OracleError> {
        self.ownership.ensure_owner(caller)?;
        if price.is_zero() {
            return Err(OracleError::InvalidStablePrice { asset });
        }
        if matches!(self.sources.get(&asset), Some(PriceSource::Delegated(_))) {
            return Err(OracleError::PricerConfigured { asset });
        }
        info!(asset = %asset, price = %price, "Stable price set");
        self.sources.insert(asset, PriceSource::Stable(price));
        Ok(())
    }

    /// Set the address allowed to dispute submitted prices.
    pub fn set_disputer(&mut self, caller: Address, disputer: Address) -> Result<(), OracleError> {
        self.ownership.ensure_owner(caller)?;
        info!(disputer = %disputer, "Disputer set");
        self.disputer = Some(disputer);
        Ok(())
    }

    /// Set the locking period (seconds) of a pricer.
    pub fn set_locking_period(
        &mut self,
        caller: Address,
        pricer: Address,
        seconds: u64,
    ) -> Result<(), OracleError> {
        self.ownership.ensure_owner(caller)?;
        info!(pricer = %pricer, seconds, "Locking period set");
        self.locking_periods.insert(pricer, seconds);
        Ok(())
    }

    /// Set the dispute period (seconds) of a pricer.
    pub fn set_dispute_period(
        &mut self,
        caller: Address,
        pricer: Address,
        seconds: u64,
    ) -> Result<(), OracleError> {
        self.ownership.ensure_owner(caller)?;
        info!(pricer = %pricer, seconds, "Dispute period set");
        self.dispute_periods.insert(pricer, seconds);
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Configured source of `asset`.
    #[must_use]
    pub fn source(&self, asset: Address) -> Option<&PriceSource> {
        self.sources.get(&asset)
    }

    /// Pricer address of `asset`, if delegated.
    #[must_use]
    pub fn pricer(&self, asset: Address) -> Option<Address> {
        match self.sources.get(&asset) {
            Some(PriceSource::Delegated(pricer)) => Some(pricer.address()),
            _ => None,
        }
    }

    /// Stable price of `asset`, if configured.
    #[must_use]
    pub fn stable_price(&self, asset: Address) -> Option<U256> {
        match self.sources.get(&asset) {
            Some(PriceSource::Stable(price)) => Some(*price),
            _ => None,
        }
    }

    /// Current disputer.
    #[must_use]
    pub const fn disputer(&self) -> Option<Address> {
        self.disputer
    }

    /// Locking period of a pricer (zero if unset).
    #[must_use]
    pub fn locking_period(&self, pricer: Address) -> u64 {
        self.locking_periods.get(&pricer).copied().unwrap_or(0)
    }

    /// Dispute period of a pricer (zero if unset).
    #[must_use]
    pub fn dispute_period(&self, pricer: Address) -> u64 {
        self.dispute_periods.get(&pricer).copied().unwrap_or(0)
    }

    /// Whether migration has been permanently closed.
    #[must_use]
    pub const fn is_migration_ended(&self) -> bool {
        self.migration_ended
    }

    /// Live price of `asset`.
    pub fn get_price(&self, asset: Address) -> Result<U256, OracleError> {
        match self.sources.get(&asset) {
            Some(PriceSource::Stable(price)) => Ok(*price),
            Some(PriceSource::Delegated(pricer)) => Ok(pricer.get_price(self)?),
            None => Err(OracleError::NoPricerConfigured { asset }),
        }
    }

    fn is_stable(&self, asset: Address) -> bool {
        matches!(self.sources.get(&asset), Some(PriceSource::Stable(_)))
    }

    /// Whether submissions for `asset` at `expiry` are open at `now`.
    ///
    /// Stable assets are always past their locking period.
    #[must_use]
    pub fn is_locking_period_over(&self, asset: Address, expiry: Timestamp, now: Timestamp) -> bool {
        if self.is_stable(asset) {
            return true;
        }
        let locking = self
            .pricer(asset)
            .map_or(0, |pricer| self.locking_period(pricer));
        now > expiry.plus_seconds(locking)
    }

    /// Whether the stored price of `asset` at `expiry` can no longer be disputed.
    ///
    /// False when nothing is stored; always true for stable assets.
    #[must_use]
    pub fn is_dispute_period_over(&self, asset: Address, expiry: Timestamp, now: Timestamp) -> bool {
        if self.is_stable(asset) {
            return true;
        }
        let Some(record) = self.records.get(&(asset, expiry)) else {
            return false;
        };
        if record.is_final_by_origin() {
            return true;
        }
        let dispute = self
            .pricer(asset)
            .map_or(0, |pricer| self.dispute_period(pricer));
        now > record.submitted_at.plus_seconds(dispute)
    }

    /// Lifecycle state of the price of `asset` at `expiry`.
    #[must_use]
    pub fn expiry_price_state(
        &self,
        asset: Address,
        expiry: Timestamp,
        now: Timestamp,
    ) -> ExpiryPriceState {
        if self.is_stable(asset) {
            return ExpiryPriceState::Finalized;
        }
        if self.records.contains_key(&(asset, expiry)) {
            if self.is_dispute_period_over(asset, expiry, now) {
                ExpiryPriceState::Finalized
            } else {
                ExpiryPriceState::Unfinalized
            }
        } else if self.is_locking_period_over(asset, expiry, now) {
            ExpiryPriceState::Unset
        } else {
            ExpiryPriceState::Pending
        }
    }

    /// Stored record of `asset` at `expiry`.
    #[must_use]
    pub fn expiry_price_record(
        &self,
        asset: Address,
        expiry: Timestamp,
    ) -> Option<&ExpiryPriceRecord> {
        self.records.get(&(asset, expiry))
    }

    /// Price of `asset` at `expiry` and whether it is final.
    pub fn get_expiry_price(
        &self,
        asset: Address,
        expiry: Timestamp,
        now: Timestamp,
    ) -> Result<ExpiryPrice, OracleError> {
        if let Some(price) = self.stable_price(asset) {
            return Ok(ExpiryPrice {
                price,
                is_finalized: true,
            });
        }
        let record = self
            .records
            .get(&(asset, expiry))
            .ok_or(OracleError::ExpiryPriceNotSet { asset, expiry })?;
        Ok(ExpiryPrice {
            price: record.price,
            is_finalized: self.is_dispute_period_over(asset, expiry, now),
        })
    }

    /// Price of `asset` at a historical round.
    ///
    /// Stable assets report their stable price at `now`.
    pub fn get_round_data(
        &self,
        asset: Address,
        round_id: u64,
        now: Timestamp,
    ) -> Result<RoundData, OracleError> {
        match self.sources.get(&asset) {
            Some(PriceSource::Stable(price)) => Ok(RoundData {
                price: *price,
                timestamp: now,
            }),
            Some(PriceSource::Delegated(pricer)) => Ok(pricer.historical_price(round_id, now)?),
            None => Err(OracleError::NoPricerConfigured { asset }),
        }
    }

    // =========================================================================
    // Expiry price lifecycle
    // =========================================================================

    /// Store the price of `asset` at `expiry`.
    ///
    /// The asset's pricer may submit once, after the locking period. The
    /// disputer may call this only while a stored price is disputable, in which
    /// case it acts as [`Self::dispute_expiry_price`].
    pub fn set_expiry_price(
        &mut self,
        caller: Address,
        asset: Address,
        expiry: Timestamp,
        price: U256,
        now: Timestamp,
    ) -> Result<(), OracleError> {
        let pricer = match self.sources.get(&asset) {
            Some(PriceSource::Delegated(pricer)) if pricer.address() == caller => {
                Some(Arc::clone(pricer))
            }
            _ => None,
        };

        if let Some(pricer) = pricer {
            if !self.is_locking_period_over(asset, expiry, now) {
                return Err(OracleError::LockingPeriodNotOver { asset, expiry });
            }
            if self.records.contains_key(&(asset, expiry)) {
                return Err(if self.is_dispute_period_over(asset, expiry, now) {
                    OracleError::PriceFinalized { asset, expiry }
                } else {
                    OracleError::PriceAlreadySubmitted { asset, expiry }
                });
            }
            let mode = pricer.submission_mode();
            self.records.insert(
                (asset, expiry),
                ExpiryPriceRecord {
                    price,
                    submitted_at: now,
                    origin: PriceOrigin::Submitted(mode),
                    disputed: false,
                },
            );
            info!(
                asset = %asset,
                expiry = %expiry,
                price = %price,
                mode = %mode,
                "Expiry price submitted"
            );
            return Ok(());
        }

        if self.disputer == Some(caller)
            && self.records.contains_key(&(asset, expiry))
            && !self.is_dispute_period_over(asset, expiry, now)
        {
            return self.dispute_expiry_price(caller, asset, expiry, price, now);
        }

        warn!(caller = %caller, asset = %asset, expiry = %expiry, "Rejected expiry price submission");
        Err(OracleError::Unauthorized { caller, asset })
    }

    /// Override a stored, still disputable price. A price can be overridden once.
    pub fn dispute_expiry_price(
        &mut self,
        caller: Address,
        asset: Address,
        expiry: Timestamp,
        price: U256,
        now: Timestamp,
    ) -> Result<(), OracleError> {
        if self.disputer != Some(caller) {
            warn!(caller = %caller, "Rejected dispute from non-disputer");
            return Err(OracleError::NotDisputer { caller });
        }
        if !self.records.contains_key(&(asset, expiry)) {
            return Err(OracleError::PriceToDisputeNotFound { asset, expiry });
        }
        if self.is_dispute_period_over(asset, expiry, now) {
            return Err(OracleError::DisputeWindowClosed { asset, expiry });
        }
        let record = self
            .records
            .get_mut(&(asset, expiry))
            .ok_or(OracleError::PriceToDisputeNotFound { asset, expiry })?;
        let previous = record.price;
        record.price = price;
        record.disputed = true;
        info!(
            asset = %asset,
            expiry = %expiry,
            previous = %previous,
            price = %price,
            "Expiry price disputed"
        );
        Ok(())
    }

    // =========================================================================
    // Migration
    // =========================================================================

    /// Import finalized expiry prices for `asset`.
    pub fn migrate_oracle(
        &mut self,
        caller: Address,
        asset: Address,
        expiries: &[Timestamp],
        prices: &[U256],
        now: Timestamp,
    ) -> Result<(), OracleError> {
        self.ownership.ensure_owner(caller)?;
        if self.migration_ended {
            return Err(OracleError::MigrationEnded);
        }
        if expiries.len() != prices.len() {
            return Err(OracleError::MigrationDataMismatch {
                timestamps: expiries.len(),
                prices: prices.len(),
            });
        }
        for (expiry, price) in expiries.iter().zip(prices) {
            debug!(asset = %asset, expiry = %expiry, price = %price, "Migrating expiry price");
            self.records.insert(
                (asset, *expiry),
                ExpiryPriceRecord {
                    price: *price,
                    submitted_at: now,
                    origin: PriceOrigin::Migrated,
                    disputed: false,
                },
            );
        }
        info!(asset = %asset, count = expiries.len(), "Expiry prices migrated");
        Ok(())
    }

    /// Permanently close migration.
    pub fn end_migration(&mut self, caller: Address) -> Result<(), OracleError> {
        self.ownership.ensure_owner(caller)?;
        if !self.migration_ended {
            info!("Oracle migration ended");
        }
        self.migration_ended = true;
        Ok(())
    }
}

impl PriceReader for PriceOracle {
    fn price(&self, asset: Address) -> Result<U256, OracleError> {
        self.get_price(asset)
    }

    fn expiry_price(
        &self,
        asset: Address,
        expiry: Timestamp,
        now: Timestamp,
    ) -> Result<ExpiryPrice, OracleError> {
        self.get_expiry_price(asset, expiry, now)
    }

    fn round_data(
        &self,
        asset: Address,
        round_id: u64,
        now: Timestamp,
    ) -> Result<RoundData, OracleError> {
        self.get_round_data(asset, round_id, now)
    }
}
