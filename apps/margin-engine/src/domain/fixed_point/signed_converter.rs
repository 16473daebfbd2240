//! Conversion between unsigned and signed 256-bit integers.

use alloy_primitives::{I256, U256};

use super::errors::MathError;

/// Convert an unsigned value to signed.
///
/// Fails when `a >= 2^255`.
pub fn uint_to_int(a: U256) -> Result<I256, MathError> {
    if a > I256::MAX.into_raw() {
        return Err(MathError::OutOfIntRange { value: a });
    }
    Ok(I256::from_raw(a))
}

/// Absolute value of a signed integer as unsigned.
#[must_use]
pub fn int_to_uint(a: I256) -> U256 {
    a.unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_pow_255() -> U256 {
        U256::from(1u64) << 255usize
    }

    #[test]
    fn uint_to_int_accepts_max_signed() {
        let max = two_pow_255() - U256::from(1u64);
        assert_eq!(uint_to_int(max).unwrap(), I256::MAX);
    }

    #[test]
    fn uint_to_int_rejects_two_pow_255() {
        let err = uint_to_int(two_pow_255()).unwrap_err();
        assert_eq!(
            err,
            MathError::OutOfIntRange {
                value: two_pow_255()
            }
        );
    }

    #[test]
    fn uint_to_int_rejects_above_two_pow_255() {
        let value = two_pow_255() + U256::from(1u64);
        assert_eq!(
            uint_to_int(value),
            Err(MathError::OutOfIntRange { value })
        );
    }

    #[test]
    fn uint_to_int_small_values() {
        assert_eq!(uint_to_int(U256::ZERO).unwrap(), I256::ZERO);
        assert_eq!(
            uint_to_int(U256::from(5u64)).unwrap(),
            I256::try_from(5i64).unwrap()
        );
    }

    #[test]
    fn int_to_uint_is_absolute_value() {
        assert_eq!(int_to_uint(I256::try_from(-5i64).unwrap()), U256::from(5u64));
        assert_eq!(int_to_uint(I256::try_from(5i64).unwrap()), U256::from(5u64));
        assert_eq!(int_to_uint(I256::MIN), two_pow_255());
    }
}
