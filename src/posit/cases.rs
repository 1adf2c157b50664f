//! Test-input generators: exhaustive walks for the small formats, proptest
//! strategies for the wide ones.

use super::*;

use crate::machine::cast_i128;
use proptest::prelude::*;

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> Posit<N, ES, Int> {
  /// Every regular value: all bit patterns except 0 and NaR, positives
  /// first.
  pub(crate) fn regular_values() -> impl Iterator<Item = Self> {
    let magnitudes = 1..=((1_i128 << (Self::BITS - 1)) - 1);
    let pos = magnitudes.clone().map(|bits| Self::from_bits(cast_i128(bits)));
    let neg = magnitudes.map(|bits| Self::from_bits(cast_i128(-bits)));
    pos.chain(neg)
  }

  /// Every value, 0 and NaR included.
  pub(crate) fn all_values() -> impl Iterator<Item = Self> {
    [Self::ZERO, Self::NAR].into_iter().chain(Self::regular_values())
  }

  /// Uniformly random regular values.
  pub(crate) fn arb_regular() -> impl Strategy<Value = Self> {
    (1..=((1_i128 << (Self::BITS - 1)) - 1), any::<bool>())
      .prop_map(|(bits, negative)| Self::from_bits(cast_i128(if negative { -bits } else { bits })))
  }

  /// Uniformly random bit patterns (0 and NaR included).
  pub(crate) fn arb_value() -> impl Strategy<Value = Self> {
    let top = 1_i128 << (Self::BITS - 1);
    (-top..top).prop_map(|bits| Self::from_bits(cast_i128(bits)))
  }
}

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> Unpacked<N, ES, Int> {
  fn assemble(fraction: i128, negative: bool, exp: i128) -> Self {
    let hidden = if negative { Int::MIN } else { Int::MIN.lshr(1) };
    Unpacked {
      frac: hidden + cast_i128::<Int>(fraction << 2).lshr(2),
      exp: cast_i128(exp),
    }
  }

  fn exp_range() -> core::ops::RangeInclusive<i128> {
    // Twice the representable scale range, to exercise saturation.
    let max: i128 = Posit::<N, ES, Int>::MAX_EXP.into();
    -2 * max..=2 * max
  }

  /// Every normal significand at every scale out to 2× the representable
  /// range. Only tractable for narrow `Int`s.
  pub(crate) fn all_normal() -> impl Iterator<Item = Self> {
    Self::exp_range().flat_map(|exp| {
      (0..1_i128 << Self::FRAC_WIDTH).flat_map(move |fraction| {
        [Self::assemble(fraction, false, exp), Self::assemble(fraction, true, exp)]
      })
    })
  }

  /// Random normal values paired with a sticky flag.
  pub(crate) fn arb_normal_sticky() -> impl Strategy<Value = (Self, bool)> {
    (0..1_i128 << Self::FRAC_WIDTH, any::<bool>(), Self::exp_range(), any::<bool>())
      .prop_map(|(fraction, negative, exp, sticky)| {
        (Self::assemble(fraction, negative, exp), sticky)
      })
  }
}

/// Random q16 contents: half genuinely arbitrary patterns, half small
/// values that keep the interesting rounding work near the fixed point.
pub(crate) fn arb_quire_16() -> impl Strategy<Value = crate::q16> {
  prop_oneof![
    any::<[u8; 32]>().prop_map(crate::q16::from_le_bytes),
    (any::<i128>(), 0_u32..128).prop_map(|(value, shift)| {
      let mut quire = crate::q16::ZERO;
      quire.add_value(value >> (shift % 64), shift as i32);
      quire
    }),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn counts() {
    assert_eq!(Posit::<4, 1, i8>::regular_values().count(), 14);
    assert_eq!(Posit::<4, 1, i8>::all_values().count(), 16);
    assert_eq!(crate::p8::all_values().count(), 256);
  }

  #[test]
  fn all_normal_is_normal() {
    for u in Unpacked::<4, 0, i8>::all_normal() {
      assert!(u.is_normal(), "{u:?}");
    }
  }
}
