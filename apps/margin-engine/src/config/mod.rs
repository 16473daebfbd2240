//! Configuration module for the margin engine.
//!
//! Loads the YAML configuration with environment variable interpolation and
//! validates it before anything is wired.
//!
//! # Usage
//!
//! ```rust,ignore
//! use margin_engine::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("owner: {}", config.owner);
//! ```

mod margin;
mod observability;
mod oracle;

use std::collections::HashSet;

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use margin::{CollateralDustConfig, MarginConfig, ProductConfig, UpperBoundConfig};
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use oracle::{OracleConfig, PricerConfig, PricerKind, StablePriceConfig};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Owner of the oracle and the margin calculator.
    pub owner: Address,
    /// Oracle configuration.
    #[serde(default)]
    pub oracle: OracleConfig,
    /// Margin calculator configuration.
    #[serde(default)]
    pub margin: MarginConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.owner == Address::ZERO {
        return Err(invalid("owner must not be the zero address"));
    }

    // An asset has exactly one price source
    let mut priced = HashSet::new();
    for stable in &config.oracle.stable_prices {
        if stable.price <= Decimal::ZERO {
            return Err(invalid(format!(
                "stable price of {} must be positive",
                stable.asset
            )));
        }
        if !priced.insert(stable.asset) {
            return Err(invalid(format!("asset {} is priced twice", stable.asset)));
        }
    }
    for pricer in &config.oracle.pricers {
        if pricer.address == Address::ZERO {
            return Err(invalid(format!(
                "pricer address of {} must not be the zero address",
                pricer.asset
            )));
        }
        if pricer.kind == PricerKind::Manual && pricer.bot.is_none() {
            return Err(invalid(format!(
                "manual pricer of {} requires a bot",
                pricer.asset
            )));
        }
        if !priced.insert(pricer.asset) {
            return Err(invalid(format!("asset {} is priced twice", pricer.asset)));
        }
    }

    let margin = &config.margin;
    if margin.oracle_deviation < Decimal::ZERO || margin.oracle_deviation > Decimal::ONE {
        return Err(invalid("oracle_deviation must be between 0 and 1"));
    }
    for dust in &margin.collateral_dust {
        if dust.amount <= Decimal::ZERO {
            return Err(invalid(format!(
                "collateral dust of {} must be positive",
                dust.asset
            )));
        }
    }

    let mut products = HashSet::new();
    for product in &margin.products {
        let key = product.key();
        if !products.insert(key) {
            return Err(invalid(format!("product {key} is configured twice")));
        }
        if product.spot_shock <= Decimal::ZERO {
            return Err(invalid(format!("spot_shock of {key} must be positive")));
        }
        if product.upper_bounds.is_empty() {
            return Err(invalid(format!("product {key} has no upper bounds")));
        }
        if product
            .upper_bounds
            .windows(2)
            .any(|pair| pair[0].time_to_expiry_secs >= pair[1].time_to_expiry_secs)
        {
            return Err(invalid(format!(
                "upper bounds of {key} must be in strictly increasing time to expiry"
            )));
        }
        if product
            .upper_bounds
            .iter()
            .any(|bound| bound.value <= Decimal::ZERO)
        {
            return Err(invalid(format!("upper bound values of {key} must be positive")));
        }
    }

    let valid_formats = ["json", "pretty"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(invalid(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const OWNER: &str = "0xa0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0";

    fn minimal() -> String {
        format!("owner: \"{OWNER}\"\n")
    }

    fn expect_invalid(yaml: &str, needle: &str) {
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected validation error containing '{needle}'");
        };
        assert!(
            err.to_string().contains(needle),
            "'{err}' does not contain '{needle}'"
        );
    }

    #[test]
    fn test_load_minimal_config() {
        let config = match load_config_from_string(&minimal()) {
            Ok(c) => c,
            Err(e) => panic!("should load minimal config: {e}"),
        };
        assert_eq!(config.owner, Address::repeat_byte(0xa0));
        assert!(config.oracle.pricers.is_empty());
        assert_eq!(config.margin.oracle_deviation, Decimal::ZERO);
        assert_eq!(config.observability.logging.level, "info");
        assert_eq!(config.observability.logging.format, "json");
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "level: ${MARGIN_ENGINE_CONFIG_TEST_NONEXISTENT_VAR:-debug}";
        assert_eq!(interpolate_env_vars(input), "level: debug");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);
        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "disputer: ${MARGIN_ENGINE_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "disputer: ");
    }

    #[test]
    fn test_validation_zero_owner() {
        expect_invalid(
            "owner: \"0x0000000000000000000000000000000000000000\"\n",
            "owner",
        );
    }

    #[test]
    fn test_validation_asset_priced_twice() {
        let yaml = format!(
            r#"{}
oracle:
  stable_prices:
    - asset: "0x0202020202020202020202020202020202020202"
      price: "1"
  pricers:
    - kind: stable
      address: "0x5454545454545454545454545454545454545454"
      asset: "0x0202020202020202020202020202020202020202"
"#,
            minimal()
        );
        expect_invalid(&yaml, "priced twice");
    }

    #[test]
    fn test_validation_manual_pricer_needs_bot() {
        let yaml = format!(
            r#"{}
oracle:
  pricers:
    - kind: manual
      address: "0x5252525252525252525252525252525252525252"
      asset: "0x0101010101010101010101010101010101010101"
"#,
            minimal()
        );
        expect_invalid(&yaml, "requires a bot");
    }

    #[test]
    fn test_validation_upper_bounds_order() {
        let yaml = format!(
            r#"{}
margin:
  products:
    - underlying: "0x0101010101010101010101010101010101010101"
      strike: "0x0202020202020202020202020202020202020202"
      collateral: "0x0202020202020202020202020202020202020202"
      is_put: true
      spot_shock: "0.75"
      upper_bounds:
        - time_to_expiry_secs: 604800
          value: "0.2"
        - time_to_expiry_secs: 86400
          value: "0.1"
"#,
            minimal()
        );
        expect_invalid(&yaml, "strictly increasing");
    }

    #[test]
    fn test_validation_oracle_deviation_range() {
        let yaml = format!("{}margin:\n  oracle_deviation: \"1.5\"\n", minimal());
        expect_invalid(&yaml, "oracle_deviation");
    }

    #[test]
    fn test_validation_invalid_log_format() {
        let yaml = format!(
            "{}observability:\n  logging:\n    format: \"xml\"\n",
            minimal()
        );
        expect_invalid(&yaml, "format");
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = format!(
            r#"{}
oracle:
  disputer: "0xd0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0"
  stable_prices:
    - asset: "0x0202020202020202020202020202020202020202"
      price: "1"
  pricers:
    - kind: manual
      address: "0x5252525252525252525252525252525252525252"
      asset: "0x0101010101010101010101010101010101010101"
      bot: "0xb0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0"
      locking_period_secs: 300
      dispute_period_secs: 3600

margin:
  oracle_deviation: "0.05"
  collateral_dust:
    - asset: "0x0202020202020202020202020202020202020202"
      decimals: 6
      amount: "10"
  products:
    - underlying: "0x0101010101010101010101010101010101010101"
      strike: "0x0202020202020202020202020202020202020202"
      collateral: "0x0202020202020202020202020202020202020202"
      is_put: true
      spot_shock: "0.75"
      upper_bounds:
        - time_to_expiry_secs: 86400
          value: "0.1678"
        - time_to_expiry_secs: 604800
          value: "0.237"

observability:
  logging:
    level: "debug"
    format: "pretty"
"#,
            minimal()
        );

        let config = match load_config_from_string(&yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        assert_eq!(config.oracle.disputer, Some(Address::repeat_byte(0xd0)));
        assert_eq!(config.oracle.stable_prices[0].price, dec!(1));
        let pricer = &config.oracle.pricers[0];
        assert_eq!(pricer.kind, PricerKind::Manual);
        assert_eq!(pricer.bot, Some(Address::repeat_byte(0xb0)));
        assert_eq!(pricer.locking_period_secs, 300);
        assert_eq!(pricer.dispute_period_secs, 3600);
        assert_eq!(config.margin.oracle_deviation, dec!(0.05));
        assert_eq!(config.margin.collateral_dust[0].amount, dec!(10));
        let product = &config.margin.products[0];
        assert!(product.is_put);
        assert_eq!(product.spot_shock, dec!(0.75));
        assert_eq!(product.upper_bounds[1].time_to_expiry_secs, 604_800);
        assert_eq!(product.upper_bounds[0].value, dec!(0.1678));
        assert_eq!(config.observability.logging.format, "pretty");
    }

    #[test]
    fn test_load_config_missing_file() {
        let Err(err) = load_config(Some("/nonexistent/margin-engine.yaml")) else {
            panic!("expected read error");
        };
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
