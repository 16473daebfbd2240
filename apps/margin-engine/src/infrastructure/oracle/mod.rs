//! Price Reader Adapters
//!
//! Implementations of `PriceReader` besides the domain `PriceOracle`.

pub mod mock;

pub use mock::MockOracle;
