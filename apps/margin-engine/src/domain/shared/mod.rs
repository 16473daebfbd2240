//! Shared Domain Types
//!
//! Value objects, access control and error taxonomy shared across bounded contexts.

pub mod access;
pub mod errors;
pub mod value_objects;

pub use access::{AccessError, Ownership};
pub use errors::ErrorCategory;
pub use value_objects::{Asset, Timestamp};
