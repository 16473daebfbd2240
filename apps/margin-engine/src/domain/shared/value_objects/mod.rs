//! Shared value objects.

mod asset;
mod timestamp;

pub use asset::Asset;
pub use timestamp::Timestamp;
