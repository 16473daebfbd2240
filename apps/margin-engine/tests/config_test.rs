//! Integration tests for configuration loading and wiring.

use std::io::Write;

use alloy_primitives::{Address, U256};
use margin_engine::config::{ConfigError, PricerKind, load_config};
use margin_engine::{Container, ProductKey};
use rust_decimal_macros::dec;

fn example_path() -> String {
    format!("{}/config.example.yaml", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn test_example_config_loads_and_wires() {
    let config = load_config(Some(&example_path())).expect("example config is valid");

    assert_eq!(config.oracle.pricers.len(), 1);
    assert_eq!(config.oracle.pricers[0].kind, PricerKind::Manual);
    assert_eq!(config.margin.oracle_deviation, dec!(0.05));
    assert_eq!(config.margin.products.len(), 2);

    let container = Container::from_config(&config).expect("example config wires");
    let weth = Address::repeat_byte(0x01);
    let usdc = Address::repeat_byte(0x02);
    let call = ProductKey::new(weth, usdc, weth, false);
    let calculator = container.calculator();
    assert_eq!(
        calculator.times_to_expiry(call),
        vec![86_400, 604_800, 2_592_000]
    );
    // 0.01 WETH at 18 decimals
    assert_eq!(
        calculator.collateral_dust(weth),
        U256::from(10_000_000_000_000_000u64)
    );
}

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"owner: "0xa0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0"
margin:
  oracle_deviation: "${{MARGIN_ENGINE_TEST_UNSET_DEVIATION:-0.1}}"
observability:
  logging:
    format: "pretty"
"#
    )
    .expect("write config");

    let path = file.path().to_string_lossy().into_owned();
    let config = load_config(Some(&path)).expect("temp config is valid");
    assert_eq!(config.margin.oracle_deviation, dec!(0.1));
    assert_eq!(config.observability.logging.format, "pretty");
}

#[test]
fn test_invalid_file_reports_validation_error() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"owner: "0xa0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0"
margin:
  collateral_dust:
    - asset: "0x0202020202020202020202020202020202020202"
      decimals: 6
      amount: "0"
"#
    )
    .expect("write config");

    let path = file.path().to_string_lossy().into_owned();
    let Err(err) = load_config(Some(&path)) else {
        panic!("zero dust should be rejected");
    };
    assert!(matches!(err, ConfigError::ValidationError(_)));
    assert!(err.to_string().contains("collateral dust"));
}

#[test]
fn test_malformed_yaml_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "owner: [not, an, address").expect("write config");

    let path = file.path().to_string_lossy().into_owned();
    let Err(err) = load_config(Some(&path)) else {
        panic!("malformed yaml should be rejected");
    };
    assert!(matches!(err, ConfigError::ParseError(_)));
}
