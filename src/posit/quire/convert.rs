use super::*;

use crate::RoundFrom;
use crate::machine::cast;

impl<
  const N: u32,
  const ES: u32,
  const SIZE: usize,
> Quire<N, ES, SIZE> {
  /// Read the accumulated value out as a posit. This is the **only**
  /// rounding step in a quire computation: find the leading significant
  /// bit, take a significand's worth of bits from there, and round once.
  ///
  /// ```
  /// # use tapered::*;
  /// let mut q = q16::ZERO;
  /// q.add_prod(p16::round_from(3.0_f64), p16::round_from(4.0_f64));
  /// assert_eq!(q.to_posit::<i16>(), p16::round_from(12.0_f64));
  /// ```
  pub fn to_posit<Int: crate::Int>(&self) -> Posit<N, ES, Int> {
    if self.is_nar() {
      return Posit::NAR;
    }

    let words = self.words();
    let sign = words[Self::WORDS - 1] >> 63 == 1;
    let extension = if sign { u64::MAX } else { 0 };

    // Find the topmost word carrying actual magnitude.
    let Some(top) = words.iter().rposition(|&w| w != extension) else {
      // All words are pure sign: the quire holds 0, or -1 (one lsb below
      // zero), whose bits `…1111` are exactly MAX_NEGATIVE's pattern,
      // which is also where "round a tiny negative, never to zero" lands.
      return Posit::from_bits(cast::<i64, Int>(extension as i64));
    };

    // Position (from bit 0 of the quire) of the first bit that differs
    // from the sign; `msb` such that the value's magnitude is in
    // [2^(msb), 2^(msb+1)) relative to the quire's bottom bit... for
    // positive values; for negative ones it marks the leading 0 of the
    // two's complement pattern, which lines up with the [-2,-1) window
    // convention below.
    let word_bits = if sign { !words[top] } else { words[top] };
    let msb = top as u32 * 64 + (63 - word_bits.leading_zeros());

    // The significand window: `Int::BITS` bits whose top bit is the sign
    // bit just *above* the leading significant bit. Gather the (up to) two
    // words that cover it, low-padded with zeros if the window reaches
    // below the quire.
    let start = msb + 1;  // top bit of the window, inclusive
    let hi_word = |i: i64| -> u64 {
      if i < 0 { 0 } else if i as usize >= Self::WORDS { extension } else { words[i as usize] }
    };
    let idx = (start / 64) as i64;
    let within = start % 64;
    let window = (hi_word(idx) as u128) << 64 | hi_word(idx - 1) as u128;

    // The window's top bit sits at position 64 + within; align so it lands
    // at bit 63 of a u64, then take the top Int::BITS as the significand.
    let aligned = (window >> (within + 1)) as u64;
    let frac = cast::<i64, Int>((aligned as i64) >> (64 - Int::BITS));

    // Everything below the window is rounding information. That is: the
    // tail of the aligned pair below the significand, plus all whole words
    // further down.
    let below_window = (window << (127 - within)) != 0;
    // The double shift totals Int::BITS without tripping the shift-amount
    // limit when Int is the full 64 bits wide.
    let tail = aligned << 1 << (Int::BITS - 1) != 0;
    let lower_words = idx > 1 && words[..(idx - 1) as usize].iter().any(|&w| w != 0);
    let sticky = Int::from(tail | below_window | lower_words);

    // The scale: the window top is one above `msb`, and the quire's fixed
    // point is `FRAC_BITS` up from the bottom. Guard against scales too
    // big for the storage type (possible with a huge quire on a small
    // posit): they saturate anyway, so clamp.
    let exp = msb as i64 - Self::FRAC_BITS as i64;
    let limit: i64 = cast::<Int, i64>(Int::MAX >> 1);
    let exp = cast::<i64, Int>(exp.clamp(-limit, limit));

    // SAFETY: the window construction puts the sign bit and its complement
    // in the top two significand bits, which is normality.
    unsafe { Unpacked { frac, exp }.pack_round(sticky) }
  }
}

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
  const SIZE: usize,
> RoundFrom<&Quire<N, ES, SIZE>> for Posit<N, ES, Int> {
  /// See [`Quire::to_posit`].
  fn round_from(value: &Quire<N, ES, SIZE>) -> Self {
    value.to_posit()
  }
}

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
  const SIZE: usize,
> From<Posit<N, ES, Int>> for Quire<N, ES, SIZE> {
  /// A quire holding exactly this posit's value (exact; quires subsume the
  /// posit range).
  fn from(value: Posit<N, ES, Int>) -> Self {
    let mut quire = Self::ZERO;
    quire.add(value);
    quire
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::posit::oracle;
  use malachite::rational::Rational;
  use proptest::prelude::*;

  /// posit → quire → posit must be the identity (both conversions exact or
  /// single-rounded on an exactly-held value).
  macro_rules! roundtrip {
    ($name:ident, $posit:ty, $quire:ty) => {
      #[test]
      fn $name() {
        for p in <$posit>::all_values() {
          let q = <$quire>::from(p);
          assert_eq!(Rational::try_from(&q).ok(), Rational::try_from(p).ok(), "{p:?}");
          assert_eq!(q.to_posit(), p, "{p:?}");
        }
      }
    };
  }

  roundtrip! {p8_roundtrip, crate::p8, crate::q8}
  roundtrip! {p16_roundtrip, crate::p16, crate::q16}
  roundtrip! {posit_8_0_roundtrip, Posit::<8, 0, i8>, Quire::<8, 0, 16>}
  roundtrip! {posit_10_1_roundtrip, Posit::<10, 1, i16>, Quire::<10, 1, 16>}
  roundtrip! {posit_10_3_roundtrip, Posit::<10, 3, i16>, Quire::<10, 3, 48>}

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(crate::PROPTEST_CASES))]

    #[test]
    fn p32_roundtrip(p in crate::p32::arb_value()) {
      prop_assert_eq!(crate::q32::from(p).to_posit::<i32>(), p)
    }

    #[test]
    fn p64_roundtrip(p in crate::p64::arb_value()) {
      prop_assert_eq!(crate::q64::from(p).to_posit::<i64>(), p)
    }

    /// Arbitrary quire contents round correctly against the oracle.
    #[test]
    fn arbitrary_quire_rounds_correctly(q in crate::posit::cases::arb_quire_16()) {
      let posit = q.to_posit::<i16>();
      prop_assert!(oracle::quire_rounds_to(&q, posit), "{q:?}")
    }
  }

  #[test]
  fn special_quires() {
    assert_eq!(crate::q16::NAR.to_posit::<i16>(), crate::p16::NAR);
    assert_eq!(crate::q16::ZERO.to_posit::<i16>(), crate::p16::ZERO);
    assert_eq!(crate::q16::from(crate::p16::NAR).to_posit::<i16>(), crate::p16::NAR);

    // A single bottom bit: far below MIN_POSITIVE, rounds up to it (never
    // to zero). All ones: one lsb below zero, rounds to MAX_NEGATIVE.
    let mut tiny = [0_u8; 32];
    tiny[0] = 1;
    assert_eq!(crate::q16::from_le_bytes(tiny).to_posit::<i16>(), crate::p16::MIN_POSITIVE);
    assert_eq!(
      crate::q16::from_le_bytes([0xff; 32]).to_posit::<i16>(),
      crate::p16::MAX_NEGATIVE,
    );
  }

  #[test]
  fn saturating_quires() {
    // Magnitudes beyond MAX² still convert (to MAX): fill high bits.
    let mut big = [0_u8; 32];
    big[30] = 0xff;
    assert_eq!(crate::q16::from_le_bytes(big).to_posit::<i16>(), crate::p16::MAX);
    let neg = crate::q16::from_le_bytes(big);
    let mut q = crate::q16::ZERO;
    q -= neg.to_posit::<i16>();  // MAX, negated on the way in
    assert_eq!(q.to_posit::<i16>(), crate::p16::MIN);
  }
}
