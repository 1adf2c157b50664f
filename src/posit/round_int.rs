use super::*;

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> Posit<N, ES, Int> {
  /// Split an unpacked value at the binary point: how many of the
  /// significand's bits (counted from the top) lie left of the point.
  /// `2 + exp` because the significand carries two integer bits already.
  #[inline]
  fn integral_bits(unpacked: Unpacked<N, ES, Int>) -> Int {
    (Int::ONE + Int::ONE).wrapping_add(unpacked.exp)
  }

  /// The nearest integer-valued posit, ties going to the nearest *even*
  /// integer.
  ///
  /// ```
  /// # use tapered::*;
  /// assert_eq!(p32::round_from(2.5_f64).nearest_int(), p32::round_from(2));
  /// assert_eq!(p32::round_from(3.5_f64).nearest_int(), p32::round_from(4));
  /// assert_eq!(p32::round_from(-0.3_f64).nearest_int(), p32::ZERO);
  /// ```
  pub fn nearest_int(self) -> Self {
    if self.is_special() {
      return self;
    }
    // SAFETY: not 0 or NaR.
    let unpacked = unsafe { self.unpack_regular() };
    let integral_bits = Self::integral_bits(unpacked);

    // Magnitude below 0.5 (positive) / up to 0.5 (negative): no integer
    // bits, rounds to zero. (±0.5 exactly has one integral bit and is
    // handled by the tie logic below.)
    if integral_bits <= Int::ZERO {
      return Self::ZERO;
    }
    // No fractional bits at all: already an integer.
    if integral_bits >= Int::of_u32(Int::BITS) {
      return self;
    }

    let integral_bits = integral_bits.as_u32();
    let fractional_bits = Int::BITS - integral_bits;
    let integral = unpacked.frac >> fractional_bits;
    let fractional = unpacked.frac << integral_bits;

    // Round half to even on the fractional part.
    let half = !fractional.is_positive();
    let rest = fractional << 1 != Int::ZERO;
    let odd = integral.lsb();
    let up = half & (odd | rest);

    let rounded = integral + Int::from(up);
    if rounded == Int::ZERO {
      // -0.5 rounded up.
      return Self::ZERO;
    }
    // Rounding up may have carried across a power of two (0b01_11 + 1 =
    // 0b10_0 reads as a sign change); renormalise.
    // SAFETY: `rounded` is not 0 (just checked).
    let shift = unsafe { rounded.redundant_sign_bits() };
    let result = Unpacked {
      frac: rounded << shift,
      exp: unpacked.exp + Int::of_u32(fractional_bits) - Int::of_u32(shift),
    };
    // SAFETY: normalised above; integer-valued results never saturate.
    unsafe { result.pack() }
  }

  /// The largest integer-valued posit `<= self`.
  ///
  /// ```
  /// # use tapered::*;
  /// assert_eq!(p32::round_from(2.7_f64).floor(), p32::round_from(2));
  /// assert_eq!(p32::round_from(-2.1_f64).floor(), p32::round_from(-3));
  /// ```
  pub fn floor(self) -> Self {
    if self.is_special() {
      return self;
    }
    // SAFETY: not 0 or NaR.
    let unpacked = unsafe { self.unpack_regular() };
    let integral_bits = Self::integral_bits(unpacked);

    if integral_bits <= Int::ZERO {
      // (-0.5, 0) floors to -1, (0, 0.5) floors to 0.
      return if self > Self::ZERO { Self::ZERO } else { Self::MINUS_ONE };
    }
    if integral_bits >= Int::of_u32(Int::BITS) {
      return self;
    }

    // Truncating the fractional bits of the two's complement significand
    // *is* the floor.
    let frac = unpacked.frac.mask_msb(integral_bits.as_u32());
    if frac == Int::ZERO {
      return Self::ZERO;
    }
    // SAFETY: `frac` is not 0 (just checked). The sign-run count fixes up
    // the one truncation that leaves the window, a collapse to -1.
    let shift = unsafe { frac.redundant_sign_bits() };
    let result = Unpacked {
      frac: frac << shift,
      exp: unpacked.exp - Int::of_u32(shift),
    };
    // SAFETY: normalised above.
    unsafe { result.pack() }
  }

  /// The smallest integer-valued posit `>= self`.
  ///
  /// ```
  /// # use tapered::*;
  /// assert_eq!(p32::round_from(2.1_f64).ceil(), p32::round_from(3));
  /// assert_eq!(p32::round_from(-2.7_f64).ceil(), p32::round_from(-2));
  /// ```
  pub fn ceil(self) -> Self {
    if self.is_special() {
      return self;
    }
    // SAFETY: not 0 or NaR.
    let unpacked = unsafe { self.unpack_regular() };
    let integral_bits = Self::integral_bits(unpacked);

    if integral_bits <= Int::ZERO {
      return if self > Self::ZERO { Self::ONE } else { Self::ZERO };
    }
    if integral_bits >= Int::of_u32(Int::BITS) {
      return self;
    }

    let integral_bits = integral_bits.as_u32();
    let fractional_bits = Int::BITS - integral_bits;
    let integral = unpacked.frac >> fractional_bits;
    let fractional = unpacked.frac << integral_bits;

    let rounded = integral + Int::from(fractional != Int::ZERO);
    if rounded == Int::ZERO {
      return Self::ZERO;
    }
    // SAFETY: `rounded` is not 0 (just checked).
    let shift = unsafe { rounded.redundant_sign_bits() };
    let result = Unpacked {
      frac: rounded << shift,
      exp: unpacked.exp + Int::of_u32(fractional_bits) - Int::of_u32(shift),
    };
    // SAFETY: normalised above.
    unsafe { result.pack() }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::posit::oracle;
  use malachite::base::num::arithmetic::traits::RoundToMultiple;
  use malachite::base::rounding_modes::RoundingMode;
  use malachite::rational::Rational;
  use proptest::prelude::*;

  fn reference<const N: u32, const ES: u32, Int: oracle::IntExt>(
    p: Posit<N, ES, Int>,
    mode: RoundingMode,
  ) -> Option<Rational> {
    Rational::try_from(p)
      .map(|exact| exact.round_to_multiple(Rational::from(1), mode).0)
      .ok()
  }

  fn check<const N: u32, const ES: u32, Int: oracle::IntExt>(p: Posit<N, ES, Int>) {
    let pairs = [
      (p.nearest_int(), RoundingMode::Nearest),
      (p.floor(), RoundingMode::Floor),
      (p.ceil(), RoundingMode::Ceiling),
    ];
    for (result, mode) in pairs {
      assert_eq!(
        Rational::try_from(result).ok(),
        reference(p, mode),
        "{p:?} under {mode:?}",
      );
    }
  }

  #[test]
  fn p8_exhaustive() {
    for p in crate::p8::all_values() {
      check(p)
    }
  }

  #[test]
  fn p16_exhaustive() {
    for p in crate::p16::all_values() {
      check(p)
    }
  }

  #[test]
  fn posit_10_0_exhaustive() {
    for p in Posit::<10, 0, i16>::all_values() {
      check(p)
    }
  }

  #[test]
  fn posit_10_3_exhaustive() {
    for p in Posit::<10, 3, i16>::all_values() {
      check(p)
    }
  }

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(crate::PROPTEST_CASES))]

    #[test]
    fn p32_proptest(p in crate::p32::arb_value()) {
      check(p)
    }

    #[test]
    fn p64_proptest(p in crate::p64::arb_value()) {
      check(p)
    }
  }
}
