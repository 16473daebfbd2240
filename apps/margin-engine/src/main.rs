//! Margin Engine Binary
//!
//! Loads a configuration, wires the oracle and margin calculator, and answers
//! naked margin quote requests.
//!
//! # Usage
//!
//! ```bash
//! margin-engine [CONFIG] [REQUESTS]
//! ```
//!
//! - `CONFIG`: YAML configuration (default: `$MARGIN_ENGINE_CONFIG` or `config.yaml`)
//! - `REQUESTS`: JSON array of quote requests (default: stdin)
//!
//! Quotes are printed to stdout as a JSON array; logs go to stderr.
//!
//! # Environment Variables
//!
//! - `MARGIN_ENGINE_CONFIG`: configuration path
//! - `RUST_LOG`: log filter (default: `observability.logging.level`)

use std::io::Read;

use anyhow::{Context, Result};
use margin_engine::application::dto::NakedMarginQuoteRequest;
use margin_engine::config::load_config;
use margin_engine::infrastructure::config::Container;
use margin_engine::telemetry::init_telemetry;

/// Default configuration path.
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

fn read_requests(path: Option<&str>) -> Result<Vec<NakedMarginQuoteRequest>> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read requests from '{path}'"))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read requests from stdin")?;
            buffer
        }
    };
    serde_json::from_str(&raw).context("Failed to parse quote requests")
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .or_else(|| std::env::var("MARGIN_ENGINE_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let requests_path = args.next();

    let config = load_config(Some(&config_path))
        .with_context(|| format!("Failed to load configuration from '{config_path}'"))?;
    init_telemetry(&config.observability.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    tracing::info!(
        config = %config_path,
        version = env!("CARGO_PKG_VERSION"),
        "Starting margin engine"
    );

    let container = Container::from_config(&config).context("Failed to wire margin engine")?;
    let requests = read_requests(requests_path.as_deref())?;
    let quotes = container
        .quote_naked_margin_use_case()
        .execute_all(&requests)
        .map_err(|e| anyhow::anyhow!("{} ({})", e, e.code()))?;

    tracing::info!(count = quotes.len(), "Quotes computed");
    println!(
        "{}",
        serde_json::to_string_pretty(&quotes).context("Failed to serialize quotes")?
    );
    Ok(())
}
