use super::*;

use crate::machine::{Sealed, cast};

/// Pull a finite, non-zero `f64` apart into an [`Unpacked`] plus sticky.
fn unpack_finite_f64<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
>(num: f64) -> (Unpacked<N, ES, Int>, Int) {
  debug_assert!(num.is_finite() && num != 0.0);
  const MANT_BITS: u32 = f64::MANTISSA_DIGITS - 1;          // 52 stored bits
  const EXP_BIAS: i64 = 1 - f64::MIN_EXP as i64;            // 1022
  const HIDDEN: i64 = 1 << MANT_BITS;

  let negative = num.is_sign_negative();
  let bits = (num.to_bits() << 1 >> 1) as i64;  // sign bit dropped
  let mantissa = bits.mask_lsb(MANT_BITS);
  let biased_exp = bits >> MANT_BITS;

  // Exponent field 0 marks a subnormal: no hidden bit, and the exponent is
  // pinned one step above its field value.
  let is_normal = biased_exp != 0;
  let mut exponent = biased_exp - i64::from(is_normal) - EXP_BIAS;

  // Build the signed significand in an i64, hidden bit included, value
  // scaled to the [1,2) window at bit 61 (our two-integer-bit convention).
  let mut significand: i64 = {
    let magnitude = (mantissa | if is_normal { HIDDEN } else { 0 }) << (62 - MANT_BITS);
    if !negative {
      magnitude
    } else if magnitude == HIDDEN << (62 - MANT_BITS) {
      // -1.0 × 2^e normalises to -2.0 × 2^(e-1).
      exponent -= 1;
      i64::MIN
    } else {
      -magnitude
    }
  };

  // Subnormals arrive with leading zeros in the significand; normalise them
  // into the window at full width, before any bits are at stake.
  if !is_normal {
    // SAFETY: `num` is non-zero, so the significand is too.
    let shift = unsafe { significand.redundant_sign_bits() };
    significand = significand << shift;
    exponent -= shift as i64;
  }

  // Move into the target width; bits that fall off the end are sticky.
  let (frac, sticky): (Int, Int) = if const { Int::BITS == 64 } {
    (cast::<i64, Int>(significand), Int::ZERO)
  } else {
    let dropped = 64 - Int::BITS;
    let sticky = Int::from(significand.mask_lsb(dropped) != 0);
    (cast::<i64, Int>(significand.lshr(dropped)), sticky)
  };

  // Clamp the exponent into the storage type. Far outside the posit range
  // either way, so the clamp never changes the rounded result.
  let exp = if const { Int::BITS < 64 } {
    let limit: i64 = cast::<Int, i64>(Int::MAX >> 1);
    cast::<i64, Int>(exponent.clamp(-limit, limit))
  } else {
    cast::<i64, Int>(exponent)
  };

  (Unpacked { frac, exp }, sticky)
}

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> RoundFrom<f64> for Posit<N, ES, Int> {
  /// Convert an `f64`, rounding per the standard: every NaN and both
  /// infinities land on [NaR](Posit::NAR), everything else rounds.
  fn round_from(value: f64) -> Self {
    use core::num::FpCategory;
    match value.classify() {
      FpCategory::Nan | FpCategory::Infinite => Self::NAR,
      FpCategory::Zero => Self::ZERO,
      FpCategory::Normal | FpCategory::Subnormal => {
        let (unpacked, sticky) = unpack_finite_f64(value);
        // SAFETY: `unpack_finite_f64` yields a normal significand.
        unsafe { unpacked.pack_round(sticky) }
      }
    }
  }
}

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> RoundFrom<f32> for Posit<N, ES, Int> {
  /// Convert an `f32`, rounding per the standard (see the `f64` impl).
  fn round_from(value: f32) -> Self {
    // f32 → f64 is exact, so this changes nothing about the rounding.
    Self::round_from(value as f64)
  }
}

/// A posit's value as sign, normalised magnitude (msb at bit 63) and the
/// power of two of that msb. Exact.
fn float_parts<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
>(unpacked: Unpacked<N, ES, Int>) -> (bool, u64, i64) {
  let frac: i128 = unpacked.frac.into();
  let exp: i128 = unpacked.exp.into();
  let negative = frac < 0;
  let magnitude = frac.unsigned_abs();  // in [2^(BITS-2), 2^(BITS-1)]
  let top = 127 - magnitude.leading_zeros();
  let mag64 = (magnitude << (127 - top) >> 64) as u64;
  let pow2 = exp + top as i128 - Unpacked::<N, ES, Int>::FRAC_WIDTH as i128;
  (negative, mag64, pow2 as i64)
}

/// Round `(mag64, pow2)` into an IEEE format given its mantissa width and
/// exponent bias; returns the magnitude's bit pattern (sign excluded).
///
/// Overflow runs off to infinity and tiny values degrade through the
/// subnormals to zero, exactly as a hardware float conversion would.
fn assemble_ieee(mag64: u64, pow2: i64, mant_bits: u32, bias: i64) -> u64 {
  debug_assert!(mag64 >> 63 == 1);
  if pow2 > bias {
    return ((2 * bias + 1) as u64) << mant_bits;  // infinity
  }

  // Normal values keep `mant_bits` bits after the leading one; subnormals
  // lose one more per step below the minimum exponent. Composing the biased
  // exponent *minus one* with the hidden bit still in place makes the
  // mantissa's rounding carry ripple into the exponent field on its own.
  let min_normal = 1 - bias;
  let drop = if pow2 >= min_normal {
    (63 - mant_bits) as u64
  } else {
    (63 - mant_bits) as u64 + (min_normal - pow2) as u64
  };
  if drop >= 65 {
    // Strictly below half the smallest subnormal: nothing survives.
    return 0;
  }
  let base = if pow2 >= min_normal { ((pow2 + bias - 1) as u64) << mant_bits } else { 0 };

  let (kept, round, sticky) = if drop == 64 {
    // Landed right on the round bit: at or just above half the smallest
    // subnormal. Exactly half ties down to zero.
    (0, true, mag64 << 1 != 0)
  } else {
    let drop = drop as u32;
    (
      mag64 >> drop,
      mag64 >> (drop - 1) & 1 == 1,
      drop > 1 && mag64 & ((1 << (drop - 1)) - 1) != 0,
    )
  };
  let pattern = base + kept;
  pattern + u64::from(round & (sticky | (pattern & 1 == 1)))
}

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> RoundFrom<Posit<N, ES, Int>> for f64 {
  /// The posit's value as a double, rounded to nearest (ties to even) when
  /// the posit carries more precision than an `f64` mantissa. NaR maps to
  /// NaN.
  fn round_from(value: Posit<N, ES, Int>) -> Self {
    match value.unpack() {
      Unpacking::Zero => 0.0,
      Unpacking::Nar => f64::NAN,
      Unpacking::Regular(unpacked) => {
        let (negative, mag64, pow2) = float_parts(unpacked);
        let bits = assemble_ieee(mag64, pow2, f64::MANTISSA_DIGITS - 1, 1023);
        f64::from_bits(bits | (negative as u64) << 63)
      }
    }
  }
}

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> RoundFrom<Posit<N, ES, Int>> for f32 {
  /// The posit's value as a single, rounded to nearest (ties to even).
  /// NaR maps to NaN.
  fn round_from(value: Posit<N, ES, Int>) -> Self {
    match value.unpack() {
      Unpacking::Zero => 0.0,
      Unpacking::Nar => f32::NAN,
      Unpacking::Regular(unpacked) => {
        let (negative, mag64, pow2) = float_parts(unpacked);
        let bits = assemble_ieee(mag64, pow2, f32::MANTISSA_DIGITS - 1, 127) as u32;
        f32::from_bits(bits | (negative as u32) << 31)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::posit::oracle;
  use malachite::rational::Rational;
  use proptest::prelude::*;

  mod into_posit {
    use super::*;

    macro_rules! make_suite {
      ($mod_name:ident, $float:ty, $posit:ty) => {
        mod $mod_name {
          use super::*;

          #[test]
          fn fixed_points() {
            assert_eq!(<$posit>::round_from(0.0 as $float), <$posit>::ZERO);
            assert_eq!(<$posit>::round_from(-0.0 as $float), <$posit>::ZERO);
            assert_eq!(<$posit>::round_from(1.0 as $float), <$posit>::ONE);
            assert_eq!(<$posit>::round_from(-1.0 as $float), <$posit>::MINUS_ONE);
            assert_eq!(<$posit>::round_from(<$float>::NAN), <$posit>::NAR);
            assert_eq!(<$posit>::round_from(<$float>::INFINITY), <$posit>::NAR);
            assert_eq!(<$posit>::round_from(<$float>::NEG_INFINITY), <$posit>::NAR);
          }

          /// Only meaningful when the float's range exceeds the posit's on
          /// both ends (not so for f32 against p64).
          #[test]
          fn range_clamps() {
            if (<$posit>::MAX_EXP as i64) < <$float>::MAX_EXP as i64 {
              // The smallest positive float is below every posit here...
              assert_eq!(
                <$posit>::round_from(<$float>::from_bits(1)),
                <$posit>::MIN_POSITIVE,
              );
              assert_eq!(
                <$posit>::round_from(-<$float>::from_bits(1)),
                <$posit>::MAX_NEGATIVE,
              );
              // ...and the largest is above.
              assert_eq!(<$posit>::round_from(<$float>::MAX), <$posit>::MAX);
              assert_eq!(<$posit>::round_from(<$float>::MIN), <$posit>::MIN);
            }
          }

          proptest! {
            #![proptest_config(ProptestConfig::with_cases(crate::PROPTEST_CASES))]
            #[test]
            fn rounds_correctly(f: $float) {
              let posit = <$posit>::round_from(f);
              match Rational::try_from(f) {
                Ok(exact) => prop_assert!(oracle::rounds_to(&exact, posit), "{f} -> {posit:?}"),
                Err(_) => prop_assert_eq!(posit, <$posit>::NAR),
              }
            }
          }
        }
      };
    }

    make_suite! {f64_p8, f64, crate::p8}
    make_suite! {f64_p16, f64, crate::p16}
    make_suite! {f64_p32, f64, crate::p32}
    make_suite! {f64_p64, f64, crate::p64}
    make_suite! {f64_posit_8_0, f64, Posit::<8, 0, i8>}
    make_suite! {f64_posit_10_1, f64, Posit::<10, 1, i16>}
    make_suite! {f64_posit_10_3, f64, Posit::<10, 3, i16>}
    make_suite! {f32_p8, f32, crate::p8}
    make_suite! {f32_p16, f32, crate::p16}
    make_suite! {f32_p32, f32, crate::p32}
    make_suite! {f32_p64, f32, crate::p64}

    /// 1.0 must hit the exact `0x4000` pattern in 16 bits, whatever the
    /// exponent size.
    #[test]
    fn one_is_0x4000() {
      assert_eq!(crate::p16::round_from(1.0_f64).to_bits(), 0x4000);
      assert_eq!(Posit::<16, 1, i16>::round_from(1.0_f64).to_bits(), 0x4000);
      assert_eq!(Posit::<16, 0, i16>::round_from(1.0_f64).to_bits(), 0x4000);
    }
  }

  mod from_posit {
    use super::*;

    /// p8..p32 values fit an f64 mantissa exactly, so converting out is
    /// exact and converting back is the identity.
    macro_rules! roundtrip_exhaustive {
      ($name:ident, $posit:ty) => {
        #[test]
        fn $name() {
          for p in <$posit>::all_values() {
            let d = f64::round_from(p);
            assert_eq!(<$posit>::round_from(d), p, "{p:?} via {d}");
          }
        }
      };
    }

    roundtrip_exhaustive! {p8_exhaustive, crate::p8}
    roundtrip_exhaustive! {p16_exhaustive, crate::p16}
    roundtrip_exhaustive! {posit_10_3_exhaustive, Posit::<10, 3, i16>}

    proptest! {
      #![proptest_config(ProptestConfig::with_cases(crate::PROPTEST_CASES))]

      #[test]
      fn p32_roundtrip(p in crate::p32::arb_value()) {
        prop_assert_eq!(crate::p32::round_from(f64::round_from(p)), p)
      }

      /// p64 can out-carry an f64 mantissa; but a value that came *from* an
      /// f64 survives the trip back.
      #[test]
      fn p64_from_f64_roundtrip(f: f64) {
        let p = crate::p64::round_from(f);
        let q = crate::p64::round_from(f64::round_from(p));
        prop_assert_eq!(p, q)
      }
    }

    #[test]
    fn exact_small_values() {
      assert_eq!(f64::round_from(crate::p16::ONE), 1.0);
      assert_eq!(f64::round_from(crate::p16::MINUS_ONE), -1.0);
      assert_eq!(f64::round_from(crate::p16::round_from(2.5_f64)), 2.5);
      assert_eq!(f64::round_from(crate::p16::MAX), 2.0_f64.powi(56));
      assert_eq!(f64::round_from(crate::p16::MIN_POSITIVE), 2.0_f64.powi(-56));
      assert_eq!(f32::round_from(crate::p16::MAX), 2.0_f32.powi(56));
      assert!(f64::round_from(crate::p16::NAR).is_nan());
      assert!(f32::round_from(crate::p32::NAR).is_nan());
      assert_eq!(f64::round_from(crate::p16::ZERO), 0.0);
    }

    /// p64's range doesn't fit an f32: the edges overflow to infinity and
    /// underflow through the subnormals to zero.
    #[test]
    fn f32_edges_from_p64() {
      assert_eq!(f32::round_from(crate::p64::MAX), f32::INFINITY);
      assert_eq!(f32::round_from(crate::p64::MIN), f32::NEG_INFINITY);
      assert_eq!(f32::round_from(crate::p64::MIN_POSITIVE), 0.0);
      assert_eq!(f32::round_from(-crate::p64::MIN_POSITIVE), 0.0);
      // 2^-140 is a representable f32 subnormal.
      let tiny = crate::p64::round_from(2.0_f64.powi(-140));
      assert_eq!(f32::round_from(tiny), 2.0_f32.powi(-140));
    }
  }
}
