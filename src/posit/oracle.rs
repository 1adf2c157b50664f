//! The test oracle: deliberately plain conversions from posits, unpacked
//! values and quires into exact `malachite` rationals, plus the predicate
//! "is this posit the correctly rounded image of this rational". Everything
//! here favours obviousness over speed; it is what the optimised kernels
//! are judged against.

use super::*;

use crate::Quire;
use malachite::Integer;
use malachite::base::num::arithmetic::traits::{Abs, PowerOf2, Reciprocal};
use malachite::rational::Rational;

/// Convenience alias bound for tests that mix posits and rationals.
pub(crate) trait IntExt: crate::Int {}
impl<T: crate::Int> IntExt for T {}

/// Error type for converting NaR (which has no rational value).
#[derive(Debug, PartialEq, Eq)]
pub struct IsNar;

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> TryFrom<Posit<N, ES, Int>> for Rational {
  type Error = IsNar;

  /// A from-first-principles posit decode: read the fields one by one,
  /// then evaluate `sign × useed^regime × 2^exponent × 1.fraction`.
  fn try_from(value: Posit<N, ES, Int>) -> Result<Self, IsNar> {
    if value == Posit::ZERO {
      return Ok(Rational::from(0));
    }
    if value == Posit::NAR {
      return Err(IsNar);
    }

    // Sign first; fields are read from the two's complement magnitude.
    let x = value.to_bits() << Posit::<N, ES, Int>::JUNK_BITS;
    let sign = !x.is_positive();
    let x = x.wrapping_abs();

    // Regime: a run of 0s (regime -run) or of 1s (regime run - 1) after
    // the sign bit, ended by the opposite bit or the end of the posit.
    let x = x << 1;
    let run_of_ones = !x.is_positive();
    let run = if run_of_ones { (!x).leading_zeros() } else { x.leading_zeros() };
    let regime: i64 = if run_of_ones { run as i64 - 1 } else { -(run as i64) };

    // Exponent: the next ES bits, zero-filled from the right if the regime
    // ran them off the end.
    let x = (x << run) << 1;
    let exponent: i128 = if const { ES == 0 } {
      0
    } else {
      x.lshr(Int::BITS - ES).into()
    };

    // Fraction: whatever is left, under a hidden one.
    let fraction: i128 = (x << ES).into();
    let fraction = fraction & ((1_i128 << Int::BITS) - 1);  // as unsigned

    let sign = if sign { Rational::from(-1) } else { Rational::from(1) };
    let regime = Rational::power_of_2(regime * (1_i64 << ES));
    let exponent = Rational::power_of_2(exponent as i64);
    let fraction = Rational::from(1)
      + Rational::from(fraction) / Rational::power_of_2(Int::BITS as i64);

    Ok(sign * regime * exponent * fraction)
  }
}

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> From<Unpacked<N, ES, Int>> for Rational {
  /// `frac / 2^FRAC_WIDTH × 2^exp`, verbatim.
  fn from(value: Unpacked<N, ES, Int>) -> Self {
    let frac: i128 = value.frac.into();
    let exp: i128 = value.exp.into();
    Rational::from(frac)
      * Rational::power_of_2(exp as i64 - Unpacked::<N, ES, Int>::FRAC_WIDTH as i64)
  }
}

impl<
  const N: u32,
  const ES: u32,
  const SIZE: usize,
> TryFrom<&Quire<N, ES, SIZE>> for Rational {
  type Error = IsNar;

  /// The quire read as one big two's complement fixed-point number.
  fn try_from(value: &Quire<N, ES, SIZE>) -> Result<Self, IsNar> {
    if value.is_nar() {
      return Err(IsNar);
    }
    let bytes = value.to_le_bytes();
    let mut numerator = Integer::from(bytes[SIZE - 1] as i8);
    for &byte in bytes[..SIZE - 1].iter().rev() {
      numerator *= Integer::from(256);
      numerator += Integer::from(byte);
    }
    let denominator = Integer::power_of_2(Quire::<N, ES, SIZE>::FRAC_BITS as u64);
    Ok(Rational::from_integers(numerator, denominator))
  }
}

/// Does `exact` round to `posit` under the posit rounding rules?
///
///   - Beyond the finite extremes (or inside `(0, MIN_POSITIVE)` and its
///     mirror): clamp: rounding never produces 0 or NaR from a non-zero
///     finite value.
///   - Where the format still stores exponent bits: nearest by absolute
///     difference, ties to the even bit pattern.
///   - Where the regime has squeezed the exponent field out (the far ends
///     of the range, where all representable values are powers of two):
///     nearest by *ratio*: the bit-pattern midpoint is the geometric mean
///     of its neighbours there, not the arithmetic one.
pub(crate) fn rounds_to<const N: u32, const ES: u32, Int: crate::Int>(
  exact: &Rational,
  posit: Posit<N, ES, Int>,
) -> bool {
  let zero = Rational::from(0);
  if posit == Posit::ZERO {
    return *exact == zero;
  }
  if posit == Posit::NAR {
    return false;
  }
  if *exact == zero {
    return false;
  }

  // The clamping regions.
  if *exact > zero {
    if *exact >= Rational::try_from(Posit::<N, ES, Int>::MAX).unwrap() {
      return posit == Posit::MAX;
    }
    if *exact <= Rational::try_from(Posit::<N, ES, Int>::MIN_POSITIVE).unwrap() {
      return posit == Posit::MIN_POSITIVE;
    }
  } else {
    if *exact <= Rational::try_from(Posit::<N, ES, Int>::MIN).unwrap() {
      return posit == Posit::MIN;
    }
    if *exact >= Rational::try_from(Posit::<N, ES, Int>::MAX_NEGATIVE).unwrap() {
      return posit == Posit::MAX_NEGATIVE;
    }
  }

  // Inside the range: nearest-or-even against the two neighbours, with the
  // metric depending on where we are. Exponent bits survive while the
  // regime run is at most N-2-ES long, i.e. up to scale (N-2-ES) × 2^ES.
  let geometric_cutoff = Rational::power_of_2(((N as i64 - 2 - ES as i64) << ES).max(0));
  let magnitude: Rational = Abs::abs(exact);
  let arithmetic =
    (&geometric_cutoff).reciprocal() <= magnitude && magnitude <= geometric_cutoff;
  let distance = |larger: &Rational, smaller: &Rational| {
    if arithmetic { larger - smaller } else { larger / smaller }
  };

  let prev = Rational::try_from(posit.prior());
  let here = Rational::try_from(posit).unwrap();
  let next = Rational::try_from(posit.next());
  let even = !posit.to_bits().lsb();

  if *exact == here {
    true
  } else if *exact < here {
    let Ok(prev) = prev else { return false };
    if *exact <= prev {
      return false;
    }
    // In (prev, here): `posit` must be at most as far as `prev`, with ties
    // only allowed onto even patterns. In the geometric region both
    // neighbours are positive or both negative; order the ratio operands
    // by magnitude so the metric stays ≥ 1.
    let (d_here, d_prev) = if *exact > zero || arithmetic {
      (distance(&here, exact), distance(exact, &prev))
    } else {
      (distance(exact, &here), distance(&prev, exact))
    };
    d_here < d_prev || (d_here == d_prev && even)
  } else {
    let Ok(next) = next else { return false };
    if *exact >= next {
      return false;
    }
    let (d_here, d_next) = if *exact > zero || arithmetic {
      (distance(exact, &here), distance(&next, exact))
    } else {
      (distance(&here, exact), distance(exact, &next))
    };
    d_here < d_next || (d_here == d_next && even)
  }
}

/// As [`rounds_to`], with a quire as the exact value.
pub(crate) fn quire_rounds_to<const N: u32, const ES: u32, Int: crate::Int, const SIZE: usize>(
  quire: &Quire<N, ES, SIZE>,
  posit: Posit<N, ES, Int>,
) -> bool {
  match Rational::try_from(quire) {
    Ok(exact) => rounds_to(&exact, posit),
    Err(IsNar) => posit == Posit::NAR,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// All 6-bit, ES=2 values against the classic table (Posit Arithmetic,
  /// Gustafson, ch. 2).
  #[test]
  fn posit_6_2_values() {
    type P = Posit<6, 2, i16>;
    assert_eq!(Rational::try_from(P::from_bits(0b000000)), Ok(Rational::from(0)));
    assert_eq!(Rational::try_from(P::from_bits(-0b100000)), Err(IsNar));

    for (bits, (num, den)) in [
      (0b000001, (1, 65536)),
      (0b000010, (1, 4096)),
      (0b000011, (1, 1024)),
      (0b000100, (1, 256)),
      (0b000101, (1, 128)),
      (0b000110, (1, 64)),
      (0b000111, (1, 32)),
      (0b001000, (2, 32)),
      (0b001001, (3, 32)),
      (0b001010, (4, 32)),
      (0b001011, (6, 32)),
      (0b001100, (8, 32)),
      (0b001101, (12, 32)),
      (0b001110, (16, 32)),
      (0b001111, (24, 32)),
      (0b010000, (1, 1)),
      (0b010001, (3, 2)),
      (0b010010, (2, 1)),
      (0b010011, (3, 1)),
      (0b010100, (4, 1)),
      (0b010101, (6, 1)),
      (0b010110, (8, 1)),
      (0b010111, (12, 1)),
      (0b011000, (16, 1)),
      (0b011001, (32, 1)),
      (0b011010, (64, 1)),
      (0b011011, (128, 1)),
      (0b011100, (256, 1)),
      (0b011101, (1024, 1)),
      (0b011110, (4096, 1)),
      (0b011111, (65536, 1)),
    ] {
      assert_eq!(
        Rational::try_from(P::from_bits(bits)),
        Ok(Rational::from_signeds(num, den)),
        "{bits:#08b}",
      );
      assert_eq!(
        Rational::try_from(P::from_bits(-bits)),
        Ok(Rational::from_signeds(-num, den)),
        "-{bits:#08b}",
      );
    }
  }

  #[test]
  fn named_constants() {
    type P = Posit<16, 2, i16>;
    assert_eq!(P::MAX.try_into(), Ok(Rational::from(1_i64 << 56)));
    assert_eq!(P::MIN.try_into(), Ok(Rational::from(-1_i64 << 56)));
    assert_eq!(P::MIN_POSITIVE.try_into(), Ok(Rational::from_signeds(1, 1_i64 << 56)));
    assert_eq!(P::MAX_NEGATIVE.try_into(), Ok(Rational::from_signeds(-1, 1_i64 << 56)));
    assert_eq!(P::ONE.try_into(), Ok(Rational::from(1)));
    assert_eq!(P::MINUS_ONE.try_into(), Ok(Rational::from(-1)));
    assert_eq!(Rational::try_from(P::NAR), Err(IsNar));
  }

  #[test]
  fn truncated_exponents() {
    // Near the edges the regime cuts the exponent field short; missing
    // bits read as zero, so the last few encodings step by whole regimes.
    type P = Posit<16, 2, i16>;
    assert_eq!(Rational::try_from(P::from_bits(0x7ffc)), Ok(Rational::power_of_2(48i64)));
    assert_eq!(Rational::try_from(P::from_bits(0x7ffd)), Ok(Rational::power_of_2(50i64)));
    assert_eq!(Rational::try_from(P::from_bits(0x7ffe)), Ok(Rational::power_of_2(52i64)));
    assert_eq!(Rational::try_from(P::from_bits(0x7fff)), Ok(Rational::power_of_2(56i64)));
  }

  #[test]
  fn quire_values() {
    let mut bytes = [0_u8; 32];
    bytes[112 / 8] = 1;  // 1.0 at the fixed point
    assert_eq!(Rational::try_from(&crate::q16::from_le_bytes(bytes)), Ok(Rational::from(1)));

    let mut bytes = [0_u8; 32];
    bytes[0] = 3;
    assert_eq!(
      Rational::try_from(&crate::q16::from_le_bytes(bytes)),
      Ok(Rational::from_signeds(3, 1_i128 << 112)),
    );

    assert_eq!(
      Rational::try_from(&crate::q16::from_le_bytes([0xff; 32])),
      Ok(Rational::from_signeds(-1, 1_i128 << 112)),
    );

    assert_eq!(Rational::try_from(&crate::q16::NAR), Err(IsNar));
    assert_eq!(Rational::try_from(&crate::q16::ZERO), Ok(Rational::from(0)));
  }

  #[test]
  fn rounding_predicate_sanity() {
    use crate::RoundFrom;
    let third = Rational::from_signeds(1, 3);
    let posit = crate::p16::round_from(1.0_f64 / 3.0);
    assert!(rounds_to(&third, posit));
    assert!(!rounds_to(&third, posit.next()));
    assert!(!rounds_to(&third, posit.prior()));
    assert!(!rounds_to(&third, crate::p16::NAR));

    // Clamping.
    let huge = Rational::power_of_2(1000i64);
    assert!(rounds_to(&huge, crate::p16::MAX));
    assert!(rounds_to(&(-&huge), crate::p16::MIN));
    assert!(rounds_to(&huge.reciprocal(), crate::p16::MIN_POSITIVE));

    // Geometric region: the top two finite p16 values are 2^52 and 2^56,
    // and the rounding boundary between them is their geometric mean 2^54
    // (with the tie going to the even pattern, 2^52).
    let lo = crate::p16::from_bits(0x7ffe);
    let hi = crate::p16::MAX;
    let mean = Rational::power_of_2(54i64);
    assert!(rounds_to(&(&mean - Rational::from(1)), lo));
    assert!(!rounds_to(&(&mean - Rational::from(1)), hi));
    assert!(rounds_to(&(&mean + Rational::from(1)), hi));
    assert!(!rounds_to(&(&mean + Rational::from(1)), lo));
    assert!(rounds_to(&mean, lo));
    assert!(!rounds_to(&mean, hi));
  }
}
