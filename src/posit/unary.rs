use super::*;

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> Posit<N, ES, Int> {
  /// The next representable value up: +1 in the bit domain (one ULP), *not*
  /// +1.0 in value.
  ///
  /// Wraps around the circle of patterns, so unlike the arithmetic
  /// operations this does not propagate NaR: `NAR.next()` is [`MIN`](Self::MIN).
  ///
  /// ```
  /// # use tapered::*;
  /// assert_eq!(p8::ONE.next().to_bits(), 0b0100_0001);
  /// assert_eq!(p8::MAX_NEGATIVE.next(), p8::ZERO);
  /// ```
  #[inline]
  pub fn next(self) -> Self {
    Self::from_bits(self.0.wrapping_add(Int::ONE))
  }

  /// The next representable value down: -1 in the bit domain (one ULP).
  /// Inverse of [`Self::next`], with the same wrap-around at NaR.
  #[inline]
  pub fn prior(self) -> Self {
    Self::from_bits(self.0.wrapping_sub(Int::ONE))
  }

  /// The absolute value. Exact; NaR stays NaR.
  #[inline]
  pub fn abs(self) -> Self {
    Self::from_bits(self.0.wrapping_abs())
  }
}

impl<const N: u32, const ES: u32, Int: crate::Int>
core::ops::Neg for Posit<N, ES, Int> {
  type Output = Self;

  /// Negation is the two's complement of the pattern: always exact, and its
  /// own inverse. NaR and 0 are the two fixed points.
  #[inline]
  fn neg(self) -> Self {
    Self::from_bits(self.0.wrapping_neg())
  }
}

impl<const N: u32, const ES: u32, Int: crate::Int>
core::ops::Neg for &Posit<N, ES, Int> {
  type Output = Posit<N, ES, Int>;

  #[inline]
  fn neg(self) -> Posit<N, ES, Int> {
    -*self
  }
}
