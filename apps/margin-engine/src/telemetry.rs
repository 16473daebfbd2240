//! Logging Setup
//!
//! Installs a `tracing-subscriber` fmt subscriber for the binary.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives, overriding `observability.logging.level`
//! - `observability.logging.format`: `json` (default) or `pretty`
//!
//! # Usage
//!
//! ```rust,ignore
//! use margin_engine::telemetry::init_telemetry;
//!
//! let config = margin_engine::config::load_config(None)?;
//! init_telemetry(&config.observability.logging)?;
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::LoggingConfig;

/// Error installing the global subscriber.
pub type TelemetryError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Build the filter from `RUST_LOG`, falling back to the configured level.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), config)
}

/// Use `directives` when present and valid, else the configured level.
fn filter_from(directives: Option<&str>, config: &LoggingConfig) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(&config.level))
}

/// Initialize logging.
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let span_events = if config.include_spans {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_span_events(span_events)
        .with_writer(std::io::stderr);

    if config.format == "pretty" {
        builder.pretty().try_init()?;
    } else {
        builder
            .json()
            .with_current_span(config.include_spans)
            .try_init()?;
    }

    tracing::debug!(level = %config.level, format = %config.format, "Logging initialized");
    Ok(())
}
