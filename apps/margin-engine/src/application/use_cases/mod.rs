//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod assess_vault;
mod quote_naked_margin;

pub use assess_vault::AssessVaultUseCase;
pub use quote_naked_margin::QuoteNakedMarginUseCase;
