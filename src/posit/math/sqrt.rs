use super::*;

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> Posit<N, ES, Int> {
  /// The square root kernel.
  ///
  /// First make the scale even, borrowing one place into the significand if
  /// needed (the significand is positive here, so there is room for that
  /// shift in the unsigned view). Then halve the scale, and take the
  /// integer square root of the significand re-shifted up by `FRAC_WIDTH`:
  ///
  ///   √(frac / 2^FW × 2^exp) = √(frac × 2^FW) / 2^FW × 2^(exp/2)
  ///
  /// An input window of `[1, 4)` roots into `[1, 2)`, so the result needs no
  /// renormalisation; a discarded root remainder just sets the sticky.
  ///
  /// # Safety
  ///
  /// `x` must be [normal](Unpacked::is_normal) with `x.frac` positive, or
  /// the call is *undefined behaviour*.
  #[inline]
  pub(crate) unsafe fn sqrt_kernel(x: Unpacked<N, ES, Int>) -> (Unpacked<N, ES, Int>, Int) {
    use crate::machine::Unsigned;
    debug_assert!(x.frac.is_positive());

    let odd = x.exp & Int::ONE;
    let widened = x.frac.as_unsigned() << odd.as_u32();
    let exp = (x.exp - odd) >> 1;

    let (root, inexact) = widened.shifted_sqrt(Unpacked::<N, ES, Int>::FRAC_WIDTH);

    (Unpacked { frac: Int::of_unsigned(root), exp }, Int::from(inexact))
  }

  /// The square root, correctly rounded. Negative arguments and NaR give
  /// [NaR](Self::NAR).
  ///
  /// ```
  /// # use tapered::*;
  /// assert_eq!(p16::round_from(2.0_f64).sqrt(), core::f64::consts::SQRT_2.round_into());
  /// assert_eq!(p16::MINUS_ONE.sqrt(), p16::NAR);
  /// ```
  pub fn sqrt(self) -> Self {
    if self < Self::ZERO {
      // Catches NaR too: its pattern is the smallest integer.
      Self::NAR
    } else if self == Self::ZERO {
      Self::ZERO
    } else {
      // SAFETY: `self` is a positive regular value, so the unpacked
      // significand is positive and normal; the kernel result is normal.
      unsafe {
        let (root, sticky) = Self::sqrt_kernel(self.unpack_regular());
        root.pack_round(sticky)
      }
    }
  }
}
