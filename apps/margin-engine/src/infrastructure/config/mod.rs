//! Configuration Wiring
//!
//! Builds the oracle and margin calculator described by a [`Config`](crate::config::Config).

mod container;

pub use container::Container;
