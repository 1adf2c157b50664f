//! The machine-integer substrate of the crate: every bit-level operation the
//! posit and quire kernels need, defined once on a sealed trait and
//! implemented for the two's complement types `i8`, `i16`, `i32` and `i64`
//! (the widths of the standard posit formats).

/// Marker trait for the machine integer types a posit can be stored in.
///
/// This trait is *sealed*: it is implemented for `i8`, `i16`, `i32` and
/// `i64`, and cannot be implemented outside this crate.
pub trait Int: Sealed {}

/// The actual operation surface. Kept out of [`Int`] so the long method list
/// stays out of the public documentation.
pub trait Sealed:
  core::fmt::Debug + core::fmt::Display + core::fmt::Binary +
  Copy + Clone + Default +
  Eq + Ord + core::hash::Hash +
  core::ops::Add<Output = Self> + core::ops::Sub<Output = Self> +
  core::ops::Shl<u32, Output = Self> + core::ops::Shr<u32, Output = Self> +
  core::ops::BitAnd<Output = Self> + core::ops::BitOr<Output = Self> +
  core::ops::BitOrAssign + core::ops::BitXor<Output = Self> +
  core::ops::Not<Output = Self> + core::ops::Neg<Output = Self> +
  From<bool> + Into<i128>
{
  /// The same-width unsigned type.
  type Unsigned: Unsigned;

  /// The double-width signed type (`i8 → i16`, …, `i64 → i128`).
  type Double: Double<Half = Self>;

  const ZERO: Self;
  const ONE: Self;
  const MIN: Self;
  const MAX: Self;
  const BITS: u32;

  fn as_unsigned(self) -> Self::Unsigned;
  fn of_unsigned(x: Self::Unsigned) -> Self;

  /// Narrowing cast to `u32`; the value must fit (debug-checked).
  fn as_u32(self) -> u32;

  /// Widening cast from `u32`; the value must fit (debug-checked).
  fn of_u32(x: u32) -> Self;

  /// `self >= 0`.
  fn is_positive(self) -> bool;

  /// Logical (zero-filling) shift right, as opposed to the arithmetic shift
  /// of the `>>` operator.
  fn lshr(self, n: u32) -> Self;

  /// Keep the low `n` bits, zero the rest. `n` must be `< BITS`.
  ///
  /// ```ignore
  /// assert_eq!(0x5ace_i16.mask_lsb(8), 0x00ce);
  /// ```
  fn mask_lsb(self, n: u32) -> Self;

  /// Keep the high `n` bits, zero the rest. `n` must be `1..=BITS`.
  ///
  /// ```ignore
  /// assert_eq!(0x5ace_i16.mask_msb(8), 0x5a00);
  /// ```
  fn mask_msb(self, n: u32) -> Self;

  /// The least significant bit, as a bool.
  fn lsb(self) -> bool;

  fn leading_zeros(self) -> u32;

  /// As [`Sealed::leading_zeros`], but `self` must be non-zero or the call is
  /// *undefined behaviour*.
  unsafe fn leading_zeros_nonzero(self) -> u32;

  /// The number of leading bits equal to the sign bit, minus one, i.e. the
  /// left shift that normalises `self` to a `0b01…`/`0b10…` pattern
  /// (`BITS - 1` for `-1`, whose normalisation is `MIN`).
  ///
  /// ```ignore
  /// assert_eq!(unsafe { 0b0001_0110_i8.redundant_sign_bits() }, 2);
  /// assert_eq!(unsafe { 0b1110_0011_u8 as i8.redundant_sign_bits() }, 2);
  /// ```
  ///
  /// # Safety
  ///
  /// `self` must not be `0`, or the call is *undefined behaviour*.
  unsafe fn redundant_sign_bits(self) -> u32;

  /// `if control < 0 { !self } else { self }`, branch-free.
  fn not_if_negative(self, control: Self) -> Self;

  /// `if control >= 0 { !self } else { self }`, branch-free.
  fn not_if_positive(self, control: Self) -> Self;

  fn wrapping_add(self, other: Self) -> Self;
  fn wrapping_sub(self, other: Self) -> Self;
  fn wrapping_neg(self) -> Self;
  fn wrapping_abs(self) -> Self;

  /// Add, and on signed overflow return the *midpoint* (the true sum shifted
  /// one place right, its top bit restored) together with the overflow flag.
  /// This is the "add significands, renormalise on carry-out" primitive.
  fn overflowing_add_shift(self, other: Self) -> (Self, bool);

  /// Full-precision multiply into the double-width type.
  fn widening_mul(self, other: Self) -> Self::Double;

  /// `((self << precision) / other, (self << precision) % other)` computed in
  /// the double-width type, with the quotient rounded towards negative
  /// infinity (so a non-zero remainder always means "the true quotient is a
  /// little larger").
  ///
  /// # Safety
  ///
  /// `other` must not be `0` or `-1` and `precision` must be `< BITS`, or the
  /// call is *undefined behaviour* (quotient indeterminate or overflowing).
  unsafe fn shifted_div_rem(self, other: Self, precision: u32) -> (Self, Self);
}

/// Unsigned counterpart of an [`Int`].
pub trait Unsigned:
  core::fmt::Debug + core::fmt::Display + core::fmt::Binary +
  Copy + Clone + Eq + Ord +
  core::ops::Shl<u32, Output = Self> + core::ops::Shr<u32, Output = Self>
{
  /// `(isqrt(self << precision), inexact)`: the floor square root of the
  /// shifted value, computed without overflow in a 128-bit intermediate, and
  /// whether any remainder was discarded.
  fn shifted_sqrt(self, precision: u32) -> (Self, bool);
}

/// Double-width counterpart of an [`Int`]; produced by
/// [`Sealed::widening_mul`], consumed by splitting back into halves.
pub trait Double:
  core::fmt::Debug + Copy + Clone + Eq + Ord +
  core::ops::Shl<u32, Output = Self> + core::ops::Shr<u32, Output = Self>
{
  type Half: Int;

  /// Split into `(high, low)` halves.
  fn halves(self) -> (Self::Half, Self::Half);

  /// See [`Sealed::redundant_sign_bits`]; same safety contract.
  unsafe fn redundant_sign_bits(self) -> u32;
}

mod cast;
mod double;
mod int;
mod unsigned;

pub(crate) use cast::{cast, cast_i128};
