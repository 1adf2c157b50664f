use super::*;
use crate::machine::cast_i128;

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> Posit<N, ES, Int> {
  /// The `0b1000…0` pattern (sign-extended), spelled as an i128 so all the
  /// other special patterns can be derived from it in const context.
  const TOP_I128: i128 = i128::MIN >> (128 - Int::BITS + Self::JUNK_BITS);

  /// Zero. The unique additive identity; posits have no negative zero.
  pub const ZERO: Self = Self(Int::ZERO);

  /// Not-a-Real: the single exception value, pattern `0b1000…0`.
  ///
  /// Every invalid operation yields this one pattern, and (unlike IEEE NaN)
  /// it compares like the integer its bits spell, so `NAR == NAR`.
  pub const NAR: Self = Self(cast_i128(Self::TOP_I128));

  /// Largest finite value, pattern `0b0111…1`; equal to `2^MAX_EXP`.
  pub const MAX: Self = Self(cast_i128(!Self::TOP_I128));

  /// Smallest (most negative) value, pattern `0b1000…1`; equal to `-MAX`.
  pub const MIN: Self = Self(cast_i128(Self::TOP_I128 + 1));

  /// Smallest positive value, pattern `0b0000…1`; equal to `2^MIN_EXP`.
  pub const MIN_POSITIVE: Self = Self(Int::ONE);

  /// Largest negative value, pattern `0b1111…1`; equal to `-MIN_POSITIVE`.
  pub const MAX_NEGATIVE: Self = Self(cast_i128(-1));

  /// One, pattern `0b0100…0`.
  pub const ONE: Self = Self(cast_i128(-(Self::TOP_I128 >> 1)));

  /// Minus one, pattern `0b1100…0`.
  pub const MINUS_ONE: Self = Self(cast_i128(Self::TOP_I128 >> 1));

  /// The scale of [`Self::MAX`]: `(N-2) × 2^ES`.
  pub const MAX_EXP: Int = cast_i128(((N as i128) - 2) << ES);

  /// The scale of [`Self::MIN_POSITIVE`]: `-(N-2) × 2^ES`.
  pub const MIN_EXP: Int = cast_i128(-(((N as i128) - 2) << ES));

  /// log2 of *useed*, the scale jump of one regime step: `2^ES`.
  ///
  /// The value `useed = 2^(2^ES)` itself overflows every machine type for
  /// large `ES`, so only its logarithm is provided.
  pub const USEED_LOG2: u32 = 1 << ES;

  /// The distance from one to the next representable value, `2^-(N-3-ES)`
  /// for the standard formats.
  ///
  /// ```
  /// # use tapered::*;
  /// assert_eq!(p16::epsilon(), p16::round_from(2.0_f64.powi(-11)));
  /// ```
  pub fn epsilon() -> Self {
    // ONE and its successor differ by exactly one fraction ulp, and that
    // difference is itself representable, so the subtraction is exact.
    Self::ONE.next() + (-Self::ONE)
  }
}
