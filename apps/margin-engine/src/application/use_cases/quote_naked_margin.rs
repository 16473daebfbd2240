//! Quote Naked Margin Use Case

use std::sync::Arc;

use tracing::debug;

use crate::application::dto::{MarginQuoteDto, NakedMarginQuoteRequest};
use crate::domain::fixed_point::{BASE_DECIMALS, decimal_to_scaled, scaled_to_decimal};
use crate::domain::margin::MarginCalculator;
use crate::domain::shared::Timestamp;
use crate::error::EngineError;

/// Use case for quoting the collateral a naked short needs.
pub struct QuoteNakedMarginUseCase {
    calculator: Arc<MarginCalculator>,
}

impl QuoteNakedMarginUseCase {
    /// Create a new QuoteNakedMarginUseCase.
    pub fn new(calculator: Arc<MarginCalculator>) -> Self {
        Self { calculator }
    }

    /// Execute the use case.
    pub fn execute(&self, request: &NakedMarginQuoteRequest) -> Result<MarginQuoteDto, EngineError> {
        let now = request.now.unwrap_or_else(Timestamp::now);
        let product = request.product();

        let required = self.calculator.get_naked_margin_required(
            product,
            decimal_to_scaled(request.short_amount, BASE_DECIMALS)?,
            decimal_to_scaled(request.strike_price, BASE_DECIMALS)?,
            decimal_to_scaled(request.underlying_price, BASE_DECIMALS)?,
            request.expiry,
            request.collateral_decimals,
            now,
        )?;
        let required_margin = scaled_to_decimal(required, request.collateral_decimals)?;

        debug!(
            product = %product,
            short_amount = %request.short_amount,
            required_margin = %required_margin,
            "Naked margin quoted"
        );

        Ok(MarginQuoteDto {
            product,
            short_amount: request.short_amount,
            required_margin,
            time_to_expiry_secs: now.seconds_until(request.expiry).unwrap_or(0),
            evaluated_at: now,
        })
    }

    /// Quote a batch, stopping at the first failure.
    pub fn execute_all(
        &self,
        requests: &[NakedMarginQuoteRequest],
    ) -> Result<Vec<MarginQuoteDto>, EngineError> {
        requests.iter().map(|request| self.execute(request)).collect()
    }
}
