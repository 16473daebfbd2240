//! Fixed-point arithmetic errors.

use alloy_primitives::U256;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::shared::ErrorCategory;

/// Errors raised by fixed-point arithmetic and conversions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MathError {
    /// Result does not fit in the signed 256-bit range.
    #[error("Arithmetic overflow in {operation}")]
    Overflow {
        /// Operation that overflowed.
        operation: &'static str,
    },

    /// Division by a zero divisor.
    #[error("Division by zero")]
    DivisionByZero,

    /// Unsigned value is at or above 2^255 and has no signed representation.
    #[error("Value {value} is out of the signed integer range")]
    OutOfIntRange {
        /// The unsigned value.
        value: U256,
    },

    /// Unsigned amounts cannot be built from a negative decimal.
    #[error("Amount {value} is negative")]
    NegativeAmount {
        /// The decimal value.
        value: Decimal,
    },

    /// Decimal carries digits finer than the target precision.
    #[error("Amount {value} has more than {decimals} decimals")]
    ExcessPrecision {
        /// The decimal value.
        value: Decimal,
        /// Decimals the amount must fit in.
        decimals: u8,
    },
}

impl MathError {
    /// Error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        ErrorCategory::Arithmetic
    }
}
