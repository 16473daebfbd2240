//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Use Cases**: quoting naked margin, assessing vaults
//! - **DTOs**: Data transfer objects for the JSON boundary

pub mod dto;
pub mod use_cases;

pub use dto::*;
pub use use_cases::*;
