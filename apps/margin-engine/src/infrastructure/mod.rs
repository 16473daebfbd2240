//! Infrastructure Layer
//!
//! Adapters for the ports defined in the domain:
//!
//! - `pricers/`: `Pricer` implementations (round feeds, manual, derived, stable)
//! - `oracle/`: in-memory `PriceReader` for tests and dry runs
//! - `config/`: wiring of configured oracle and calculator

pub mod config;
pub mod oracle;
pub mod pricers;
