//! Oracle Bounded Context
//!
//! Establishes authoritative asset prices at option expiry.
//!
//! # Key Concepts
//!
//! - **Price source**: an asset is either stable-priced or delegated to a pricer
//! - **Locking period**: time after expiry before a price may be submitted
//! - **Dispute period**: time after submission during which the disputer may
//!   override the price once
//! - **Migration**: owner bulk-import of finalized prices, permanently
//!   closable
//! - **Submission modes**: round-adjacency (round feeds) and timestamp-window
//!   (manual, derived and stable pricers)

pub mod aggregate;
pub mod errors;
pub mod pricer;
pub mod reader;
pub mod value_objects;

pub use aggregate::PriceOracle;
pub use errors::{OracleError, PricerError};
pub use pricer::{Pricer, RoundAnswer, RoundFeed};
pub use reader::PriceReader;
pub use value_objects::{
    ExpiryPrice, ExpiryPriceRecord, ExpiryPriceState, PriceOrigin, PriceSource, RoundData,
    SubmissionMode,
};
