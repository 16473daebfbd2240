//! Dependency Injection Container
//!
//! Applies a validated configuration to a fresh oracle and margin calculator
//! through their owner-gated operations, and hands out use cases.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use alloy_primitives::{Address, U256};
use tracing::info;

use crate::application::use_cases::{AssessVaultUseCase, QuoteNakedMarginUseCase};
use crate::config::{Config, ConfigError, MarginConfig, OracleConfig, PricerKind};
use crate::domain::fixed_point::{BASE_DECIMALS, CONFIG_DECIMALS, decimal_to_scaled};
use crate::domain::margin::MarginCalculator;
use crate::domain::oracle::{OracleError, PriceOracle, Pricer};
use crate::domain::shared::Timestamp;
use crate::error::EngineError;
use crate::infrastructure::pricers::{ManualPricer, StablePricer};

/// Dependency injection container.
///
/// The oracle stays writable behind a lock so configured pricers can push
/// expiry prices; the calculator is frozen once configured.
pub struct Container {
    oracle: Arc<RwLock<PriceOracle>>,
    calculator: Arc<MarginCalculator>,
    manual_pricers: HashMap<Address, Arc<ManualPricer>>,
    stable_pricers: HashMap<Address, StablePricer>,
}

impl Container {
    /// Wire the oracle and calculator described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, EngineError> {
        let owner = config.owner;
        let mut oracle = PriceOracle::new(owner);
        let (manual_pricers, stable_pricers) = configure_oracle(&mut oracle, owner, &config.oracle)?;

        let mut calculator = MarginCalculator::new(owner);
        configure_calculator(&mut calculator, owner, &config.margin)?;

        info!(
            owner = %owner,
            manual_pricers = manual_pricers.len(),
            stable_pricers = stable_pricers.len(),
            products = config.margin.products.len(),
            "Margin engine wired"
        );

        Ok(Self {
            oracle: Arc::new(RwLock::new(oracle)),
            calculator: Arc::new(calculator),
            manual_pricers,
            stable_pricers,
        })
    }

    /// Get the oracle.
    pub fn oracle(&self) -> Arc<RwLock<PriceOracle>> {
        Arc::clone(&self.oracle)
    }

    /// Get the margin calculator.
    pub fn calculator(&self) -> Arc<MarginCalculator> {
        Arc::clone(&self.calculator)
    }

    /// Get the manual pricer of `asset`.
    pub fn manual_pricer(&self, asset: Address) -> Option<Arc<ManualPricer>> {
        self.manual_pricers.get(&asset).map(Arc::clone)
    }

    /// Get the configured stable pricer of `asset`.
    pub fn stable_pricer(&self, asset: Address) -> Option<StablePricer> {
        self.stable_pricers.get(&asset).copied()
    }

    /// Submit a bot price for `asset` at `expiry` through its manual pricer.
    pub fn submit_manual_price(
        &self,
        caller: Address,
        asset: Address,
        expiry: Timestamp,
        price: U256,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        let pricer = self
            .manual_pricer(asset)
            .ok_or(OracleError::NoPricerConfigured { asset })?;
        let mut oracle = self.oracle.write().unwrap_or_else(PoisonError::into_inner);
        pricer.set_expiry_price_in_oracle(&mut oracle, caller, expiry, price, now)?;
        Ok(())
    }

    /// Push the stable price of `asset` at `expiry` through its stable pricer.
    pub fn push_stable_price(
        &self,
        asset: Address,
        expiry: Timestamp,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        let pricer = self
            .stable_pricer(asset)
            .ok_or(OracleError::NoPricerConfigured { asset })?;
        let mut oracle = self.oracle.write().unwrap_or_else(PoisonError::into_inner);
        pricer.set_expiry_price_in_oracle(&mut oracle, expiry, now)?;
        Ok(())
    }

    /// Create a `QuoteNakedMarginUseCase`.
    pub fn quote_naked_margin_use_case(&self) -> QuoteNakedMarginUseCase {
        QuoteNakedMarginUseCase::new(Arc::clone(&self.calculator))
    }

    /// Create an `AssessVaultUseCase` reading the configured oracle.
    pub fn assess_vault_use_case(&self) -> AssessVaultUseCase<PriceOracle> {
        AssessVaultUseCase::new(Arc::clone(&self.calculator), Arc::clone(&self.oracle))
    }
}

type ConfiguredPricers = (
    HashMap<Address, Arc<ManualPricer>>,
    HashMap<Address, StablePricer>,
);

fn configure_oracle(
    oracle: &mut PriceOracle,
    owner: Address,
    config: &OracleConfig,
) -> Result<ConfiguredPricers, EngineError> {
    if let Some(disputer) = config.disputer {
        oracle.set_disputer(owner, disputer)?;
    }
    for stable in &config.stable_prices {
        let price = decimal_to_scaled(stable.price, BASE_DECIMALS)?;
        oracle.set_stable_price(owner, stable.asset, price)?;
    }

    let mut manual_pricers = HashMap::new();
    let mut stable_pricers = HashMap::new();
    for entry in &config.pricers {
        let pricer: Arc<dyn Pricer> = match entry.kind {
            PricerKind::Manual => {
                let bot = entry.bot.ok_or_else(|| {
                    ConfigError::ValidationError(format!(
                        "manual pricer of {} requires a bot",
                        entry.asset
                    ))
                })?;
                let pricer = Arc::new(ManualPricer::new(entry.address, entry.asset, bot));
                manual_pricers.insert(entry.asset, Arc::clone(&pricer));
                pricer
            }
            PricerKind::Stable => {
                let pricer = StablePricer::new(entry.address, entry.asset);
                stable_pricers.insert(entry.asset, pricer);
                Arc::new(pricer)
            }
        };
        oracle.set_asset_pricer(owner, entry.asset, pricer)?;
        oracle.set_locking_period(owner, entry.address, entry.locking_period_secs)?;
        oracle.set_dispute_period(owner, entry.address, entry.dispute_period_secs)?;
    }
    Ok((manual_pricers, stable_pricers))
}

fn configure_calculator(
    calculator: &mut MarginCalculator,
    owner: Address,
    config: &MarginConfig,
) -> Result<(), EngineError> {
    calculator.set_oracle_deviation(
        owner,
        decimal_to_scaled(config.oracle_deviation, CONFIG_DECIMALS)?,
    )?;
    for dust in &config.collateral_dust {
        calculator.set_collateral_dust(
            owner,
            dust.asset,
            decimal_to_scaled(dust.amount, dust.decimals)?,
        )?;
    }
    for product in &config.products {
        let key = product.key();
        calculator.set_spot_shock(
            owner,
            key,
            decimal_to_scaled(product.spot_shock, CONFIG_DECIMALS)?,
        )?;
        let times: Vec<u64> = product
            .upper_bounds
            .iter()
            .map(|bound| bound.time_to_expiry_secs)
            .collect();
        let values = product
            .upper_bounds
            .iter()
            .map(|bound| decimal_to_scaled(bound.value, CONFIG_DECIMALS))
            .collect::<Result<Vec<_>, _>>()?;
        calculator.set_upper_bound_values(owner, key, &times, &values)?;
    }
    Ok(())
}
