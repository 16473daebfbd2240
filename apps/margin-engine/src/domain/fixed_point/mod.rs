//! Fixed Point Bounded Context
//!
//! Signed 256-bit integers scaled by 1e18, used for every financial calculation.
//!
//! # Key Concepts
//!
//! - **FixedPointInt**: value `v` represents `v / 1e18`
//! - **Scaled amounts**: raw token amounts carry their own decimals and are
//!   rescaled on the way in and out (`from_scaled_uint` / `to_scaled_uint`)
//! - **Truncation**: multiplication and division truncate toward zero; overflow
//!   is always an error
//! - **Decimal boundary**: human-facing `Decimal` values convert to and from
//!   scaled integers at the edges of the crate

pub mod decimal;
pub mod errors;
pub mod fixed_point_int;
pub mod signed_converter;

pub use decimal::{decimal_to_scaled, scaled_to_decimal};
pub use errors::MathError;
pub use fixed_point_int::{BASE_DECIMALS, CONFIG_DECIMALS, FixedPointInt, SCALING_FACTOR, pow10};
pub use signed_converter::{int_to_uint, uint_to_int};
