#![cfg_attr(not(test), no_std)]
//! Software implementation of [posit arithmetic]: tapered-precision binary
//! floats with a single exception value, plus the *quire*, a fixed-point
//! super-accumulator for dot products with no intermediate rounding.
//!
//! Posits encode a number as a sign bit, a run-length-encoded *regime* field,
//! an `ES`-bit exponent, and whatever fraction bits remain. The regime trades
//! fraction bits for dynamic range, so precision tapers off smoothly towards
//! the extremes instead of falling off a subnormal cliff. There is exactly one
//! non-finite value, NaR ("not a real"), and no signed zero; interpreted as
//! two's complement integers, the bit patterns are ordered exactly like the
//! values they represent.
//!
//! # Usage
//!
//! ```
//! use tapered::{Posit, RoundFrom, RoundInto};
//! use tapered::{p16, p32, q16};
//!
//! // Standard types, or roll your own width/exponent combination.
//! type Narrow = Posit<10, 1, i16>;
//!
//! // Construct from raw bits, native numbers, or constants.
//! let a = p32::round_from(2.75_f64);
//! let b = p32::round_from(-14_i32);
//! let c = p16::from_bits(0x4000);
//! assert_eq!(c, p16::ONE);
//!
//! // The usual operator surface, with posit rounding semantics.
//! assert_eq!(a * b, (-38.5_f64).round_into());
//! assert_eq!(p32::MAX + p32::MIN_POSITIVE, p32::MAX);
//!
//! // Dot products round once, at the very end.
//! let mut q = q16::ZERO;
//! q.add_prod(p16::round_from(0.5_f64), p16::round_from(0.5_f64));
//! q.add_prod(p16::round_from(0.75_f64), p16::ONE);
//! assert_eq!(q.to_posit::<i16>(), p16::ONE);
//! ```
//!
//! All arithmetic is a pure function of the operand bit patterns: results are
//! bit-reproducible across platforms, which is the point of the format.
//!
//! # References
//!
//!   - Posit standard (2022): <https://posithub.org/docs/posit_standard-2.pdf>
//!   - Gustafson & Yonemoto, "Beating Floating Point at its Own Game" (2017)

mod machine;
mod posit;

pub use machine::Int;
pub use posit::convert::{RoundFrom, RoundInto};
pub use posit::quire::{Quire, QuireError};
pub use posit::{ArithmeticError, Fields, Posit};

/// Standard 8-bit posit (2-bit exponent field).
#[allow(non_camel_case_types)]
pub type p8 = Posit<8, 2, i8>;

/// Standard 16-bit posit (2-bit exponent field).
#[allow(non_camel_case_types)]
pub type p16 = Posit<16, 2, i16>;

/// Standard 32-bit posit (2-bit exponent field).
#[allow(non_camel_case_types)]
pub type p32 = Posit<32, 2, i32>;

/// Standard 64-bit posit (2-bit exponent field).
#[allow(non_camel_case_types)]
pub type p64 = Posit<64, 2, i64>;

/// Standard quire for [`p8`] (128 bits).
#[allow(non_camel_case_types)]
pub type q8 = Quire<8, 2, 16>;

/// Standard quire for [`p16`] (256 bits).
#[allow(non_camel_case_types)]
pub type q16 = Quire<16, 2, 32>;

/// Standard quire for [`p32`] (512 bits).
#[allow(non_camel_case_types)]
pub type q32 = Quire<32, 2, 64>;

/// Standard quire for [`p64`] (1024 bits).
#[allow(non_camel_case_types)]
pub type q64 = Quire<64, 2, 128>;

/// C-linkage wrappers over the standard types.
#[cfg(feature = "capi")]
pub mod capi;

/// Iteration budget for the randomised test suites.
#[cfg(test)]
pub(crate) const PROPTEST_CASES: u32 = if cfg!(debug_assertions) { 0x800 } else { 0x8000 };
