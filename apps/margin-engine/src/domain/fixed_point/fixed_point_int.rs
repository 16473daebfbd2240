//! Signed 18-decimal fixed-point integer.

use std::cmp::Ordering;
use std::fmt;

use alloy_primitives::{I256, U256, Uint};

use super::errors::MathError;
use super::signed_converter::{int_to_uint, uint_to_int};

/// Decimals of the fixed-point representation.
pub const SCALING_FACTOR: u8 = 18;

/// Decimals of option amounts and oracle prices.
pub const BASE_DECIMALS: u8 = 8;

/// Decimals of stored product parameters (spot shock, upper bounds, deviation).
pub const CONFIG_DECIMALS: u8 = 27;

const SCALE: u64 = 1_000_000_000_000_000_000;
const SCALE_INT: I256 = I256::from_raw(U256::from_limbs([SCALE, 0, 0, 0]));

type U512 = Uint<512, 8>;

/// `10^exp` as a 256-bit unsigned integer.
pub fn pow10(exp: u8) -> Result<U256, MathError> {
    U256::from(10u64)
        .checked_pow(U256::from(exp))
        .ok_or(MathError::Overflow { operation: "pow10" })
}

fn widen(value: U256) -> U512 {
    let [a, b, c, d] = value.into_limbs();
    U512::from_limbs([a, b, c, d, 0, 0, 0, 0])
}

fn narrow(value: U512) -> Option<U256> {
    let limbs = value.into_limbs();
    if limbs[4..].iter().any(|&limb| limb != 0) {
        return None;
    }
    Some(U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

/// Build a signed value from a sign and magnitude, failing if it does not fit.
fn signed(negative: bool, magnitude: U256, operation: &'static str) -> Result<I256, MathError> {
    // -2^255 has no positive counterpart
    if negative && magnitude == I256::MIN.unsigned_abs() {
        return Ok(I256::MIN);
    }
    let value = uint_to_int(magnitude).map_err(|_| MathError::Overflow { operation })?;
    if negative {
        value.checked_neg().ok_or(MathError::Overflow { operation })
    } else {
        Ok(value)
    }
}

/// A signed fixed-point number: the raw value `v` represents `v / 1e18`.
///
/// Comparisons (`==`, `<`, `<=`, `>`, `>=`) and `min`/`max` come from `Ord`
/// on the raw value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedPointInt {
    value: I256,
}

impl FixedPointInt {
    /// Zero.
    pub const ZERO: Self = Self { value: I256::ZERO };

    /// One (raw `1e18`).
    pub const ONE: Self = Self { value: SCALE_INT };

    /// Wrap an already-scaled raw value.
    #[must_use]
    pub const fn from_raw(value: I256) -> Self {
        Self { value }
    }

    /// The raw scaled value.
    #[must_use]
    pub const fn raw(&self) -> I256 {
        self.value
    }

    /// Scale an integer: `a` becomes `a * 1e18`.
    pub fn from_unscaled_int(a: i64) -> Result<Self, MathError> {
        let a = I256::try_from(a).map_err(|_| MathError::Overflow {
            operation: "from_unscaled_int",
        })?;
        a.checked_mul(SCALE_INT)
            .map(Self::from_raw)
            .ok_or(MathError::Overflow {
                operation: "from_unscaled_int",
            })
    }

    /// Rescale an unsigned amount carrying `decimals` decimals to 18 decimals.
    ///
    /// Amounts with more than 18 decimals are truncated.
    pub fn from_scaled_uint(a: U256, decimals: u8) -> Result<Self, MathError> {
        let scaled = match decimals.cmp(&SCALING_FACTOR) {
            Ordering::Equal => a,
            Ordering::Greater => a / pow10(decimals - SCALING_FACTOR)?,
            Ordering::Less => a
                .checked_mul(pow10(SCALING_FACTOR - decimals)?)
                .ok_or(MathError::Overflow {
                    operation: "from_scaled_uint",
                })?,
        };
        Ok(Self::from_raw(uint_to_int(scaled)?))
    }

    /// Convert the magnitude to an unsigned amount with `decimals` decimals.
    ///
    /// When precision is dropped and `round_down` is false, any non-zero
    /// remainder rounds the result up by one unit.
    pub fn to_scaled_uint(&self, decimals: u8, round_down: bool) -> Result<U256, MathError> {
        let magnitude = int_to_uint(self.value);
        match decimals.cmp(&SCALING_FACTOR) {
            Ordering::Equal => Ok(magnitude),
            Ordering::Greater => magnitude
                .checked_mul(pow10(decimals - SCALING_FACTOR)?)
                .ok_or(MathError::Overflow {
                    operation: "to_scaled_uint",
                }),
            Ordering::Less => {
                let divisor = pow10(SCALING_FACTOR - decimals)?;
                let quotient = magnitude / divisor;
                if !round_down && magnitude % divisor > U256::ZERO {
                    Ok(quotient + U256::from(1u64))
                } else {
                    Ok(quotient)
                }
            }
        }
    }

    /// `self + rhs`.
    pub fn checked_add(self, rhs: Self) -> Result<Self, MathError> {
        self.value
            .checked_add(rhs.value)
            .map(Self::from_raw)
            .ok_or(MathError::Overflow { operation: "add" })
    }

    /// `self - rhs`.
    pub fn checked_sub(self, rhs: Self) -> Result<Self, MathError> {
        self.value
            .checked_sub(rhs.value)
            .map(Self::from_raw)
            .ok_or(MathError::Overflow { operation: "sub" })
    }

    /// `self * rhs / 1e18`, truncated toward zero.
    pub fn checked_mul(self, rhs: Self) -> Result<Self, MathError> {
        let product: U512 = widen(int_to_uint(self.value)) * widen(int_to_uint(rhs.value));
        let magnitude = narrow(product / widen(U256::from(SCALE)))
            .ok_or(MathError::Overflow { operation: "mul" })?;
        let negative = self.is_negative() != rhs.is_negative();
        signed(negative, magnitude, "mul").map(Self::from_raw)
    }

    /// `self * 1e18 / rhs`, truncated toward zero.
    pub fn checked_div(self, rhs: Self) -> Result<Self, MathError> {
        if rhs.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        let numerator: U512 = widen(int_to_uint(self.value)) * widen(U256::from(SCALE));
        let magnitude = narrow(numerator / widen(int_to_uint(rhs.value)))
            .ok_or(MathError::Overflow { operation: "div" })?;
        let negative = self.is_negative() != rhs.is_negative();
        signed(negative, magnitude, "div").map(Self::from_raw)
    }

    /// Whether the value is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    /// Whether the value is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl fmt::Display for FixedPointInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = int_to_uint(self.value);
        let scale = U256::from(SCALE);
        let whole = magnitude / scale;
        let fraction = format!("{:0>18}", (magnitude % scale).to_string());
        let fraction = fraction.trim_end_matches('0');
        let sign = if self.is_negative() { "-" } else { "" };
        if fraction.is_empty() {
            write!(f, "{sign}{whole}")
        } else {
            write!(f, "{sign}{whole}.{fraction}")
        }
    }
}
