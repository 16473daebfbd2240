//! Conversions between human-facing decimals and scaled integers.

use alloy_primitives::U256;
use rust_decimal::Decimal;

use super::errors::MathError;
use super::fixed_point_int::pow10;

/// `value` as an unsigned integer with `decimals` decimals.
///
/// Non-zero digits finer than `decimals` are rejected rather than dropped.
pub fn decimal_to_scaled(value: Decimal, decimals: u8) -> Result<U256, MathError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(MathError::NegativeAmount { value });
    }
    let overflow = MathError::Overflow {
        operation: "decimal_to_scaled",
    };
    let mantissa = U256::from(value.mantissa().unsigned_abs());
    let scale = value.scale();
    let target = u32::from(decimals);
    if target >= scale {
        let shift = u8::try_from(target - scale).map_err(|_| overflow.clone())?;
        mantissa.checked_mul(pow10(shift)?).ok_or(overflow)
    } else {
        let shift = u8::try_from(scale - target).map_err(|_| overflow)?;
        let divisor = pow10(shift)?;
        if !(mantissa % divisor).is_zero() {
            return Err(MathError::ExcessPrecision { value, decimals });
        }
        Ok(mantissa / divisor)
    }
}

/// An unsigned integer with `decimals` decimals as a normalized `Decimal`.
pub fn scaled_to_decimal(value: U256, decimals: u8) -> Result<Decimal, MathError> {
    let overflow = MathError::Overflow {
        operation: "scaled_to_decimal",
    };
    let mantissa = u128::try_from(value)
        .ok()
        .and_then(|m| i128::try_from(m).ok())
        .ok_or_else(|| overflow.clone())?;
    Decimal::try_from_i128_with_scale(mantissa, u32::from(decimals))
        .map(|d| d.normalize())
        .map_err(|_| overflow)
}
