//! Data Transfer Objects (DTOs)
//!
//! DTOs are used for the JSON boundary and use case inputs/outputs.

mod margin_dto;
mod vault_dto;

pub use margin_dto::{MarginQuoteDto, NakedMarginQuoteRequest};
pub use vault_dto::{
    AssessVaultRequest, CollateralPositionDto, LiquidationDto, OtokenDto, OtokenPositionDto,
    VaultAssessmentDto,
};
