use super::*;

/// The three-way classification of a posit's bit pattern.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Unpacking<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> {
  Zero,
  Nar,
  Regular(Unpacked<N, ES, Int>),
}

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> Posit<N, ES, Int> {
  /// Classify and, for regular values, decode. The interesting work is in
  /// [`Self::unpack_regular`].
  pub(crate) fn unpack(self) -> Unpacking<N, ES, Int> {
    if self == Self::ZERO {
      Unpacking::Zero
    } else if self == Self::NAR {
      Unpacking::Nar
    } else {
      // SAFETY: just excluded the two special patterns.
      Unpacking::Regular(unsafe { self.unpack_regular() })
    }
  }

  /// Decode a regular posit into its significand and scale.
  ///
  /// Sits on the hot path of every operation, so it is written branch-free.
  /// The naive decoding would take the absolute value of the pattern, pull
  /// out regime/exponent/fraction, and negate the result for negative
  /// inputs; instead we read the fields straight out of the two's complement
  /// pattern. Three observations make that work:
  ///
  ///  1. The regime run always starts one bit after the sign bit, and its
  ///     *length* is unchanged by two's complement negation (negation flips
  ///     the run bits, and the trailing `+1` is absorbed by the lower
  ///     fields). So the run length can be read directly; only the mapping
  ///     run → regime value depends on (run bit xor sign bit).
  ///
  ///  2. Negating a pattern complements the exponent bits, again with the
  ///     `+1` absorbed below. So for negative posits the exponent field is
  ///     just read complemented.
  ///
  ///  3. The significand we decode *to* is itself signed (hidden bits `01`
  ///     for positive, `10` for negative), and the fraction bits of a
  ///     negative two's complement pattern are exactly the low bits of that
  ///     signed significand. No correction at all.
  ///
  /// # Safety
  ///
  /// `self` must not be 0 or NaR, or the call is *undefined behaviour*.
  pub(crate) unsafe fn unpack_regular(self) -> Unpacked<N, ES, Int> {
    // Push the pattern against the top of the storage type; from here on the
    // junk bits are gone.
    let x = self.0 << Self::JUNK_BITS;
    debug_assert!(
      x != Int::ZERO && x != Int::MIN,
      "unpack_regular precondition violated: {self:?} is 0 or NaR",
    );

    // `x ^ (x << 1)` marks positions where adjacent bits differ. Its msb is
    // sign ^ first-regime-bit (the quantity from observation 1), and
    // skipping that, the leading zeros of `(x_edges << 1)` count the regime
    // run length minus one.
    //
    //   x           = s r r r ...
    //   x_edges     = (s^r) (r^r) (r^r) (r^t) ...
    let x_edges = x ^ (x << 1);
    // SAFETY: `x` is not 0 or MIN, so `x << 1 != 0` and the xor keeps a set
    // bit below position msb.
    let run_m1 = unsafe { (x_edges << 1).leading_zeros_nonzero() };
    debug_assert!(run_m1 <= Self::BITS - 2);

    // A run of n ones means regime n-1; a run of n zeros means regime -n;
    // and a negative sign flips which run kind we are looking at. Folding
    // the sign in via the msb of `x_edges`, and using `-n = !(n-1)`:
    //
    //   regime = run_m1,  if msb of x_edges is set
    //   regime = !run_m1, otherwise
    let regime = Int::of_u32(run_m1).not_if_positive(x_edges);

    // Drop sign bit, the run, and the terminating bit: 1 + (run_m1 + 1) + 1
    // bits in total. What's left is exponent-then-fraction, top-aligned.
    let y = (x << run_m1) << 3;

    // The exponent is the top ES bits of `y`, complemented for negative
    // posits (observation 2), moved down to the bottom of the word.
    let exponent = if const { Self::ES == 0 } {
      Int::ZERO
    } else {
      y.not_if_negative(x).lshr(Int::BITS - Self::ES)
    };

    // The fraction is the rest of `y`, kept exactly as stored (observation
    // 3), parked under a pair of hidden bits: `01` if positive, `10` if
    // negative.
    let fraction = if const { Self::ES == 2 } {
      // The standard's ES: the two hidden bits exactly replace the two
      // exponent bits, one mask instead of two shifts.
      y.mask_lsb(Int::BITS - 2)
    } else {
      (y << Self::ES).lshr(2)
    };
    let hidden = Int::MIN.lshr(x.is_positive() as u32);

    Unpacked {
      frac: hidden + fraction,
      exp: (regime << Self::ES) + exponent,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::posit::oracle;
  use malachite::rational::Rational;
  use proptest::prelude::*;

  /// All 62 regular values of the 6-bit, ES=2 format from the posit
  /// literature, with their hand-decoded significand/scale pairs.
  fn posit_6_2_table() -> impl Iterator<Item = (Posit<6, 2, i32>, Unpacked<6, 2, i32>)> {
    [
      (0b000001, 0b01_0000, -16),
      (0b000010, 0b01_0000, -12),
      (0b000011, 0b01_0000, -10),
      (0b000100, 0b01_0000, -8),
      (0b000101, 0b01_0000, -7),
      (0b000110, 0b01_0000, -6),
      (0b000111, 0b01_0000, -5),
      (0b001000, 0b01_0000, -4),
      (0b001001, 0b01_1000, -4),
      (0b001010, 0b01_0000, -3),
      (0b001011, 0b01_1000, -3),
      (0b001100, 0b01_0000, -2),
      (0b001101, 0b01_1000, -2),
      (0b001110, 0b01_0000, -1),
      (0b001111, 0b01_1000, -1),
      (0b010000, 0b01_0000, 0),
      (0b010001, 0b01_1000, 0),
      (0b010010, 0b01_0000, 1),
      (0b010011, 0b01_1000, 1),
      (0b010100, 0b01_0000, 2),
      (0b010101, 0b01_1000, 2),
      (0b010110, 0b01_0000, 3),
      (0b010111, 0b01_1000, 3),
      (0b011000, 0b01_0000, 4),
      (0b011001, 0b01_0000, 5),
      (0b011010, 0b01_0000, 6),
      (0b011011, 0b01_0000, 7),
      (0b011100, 0b01_0000, 8),
      (0b011101, 0b01_0000, 10),
      (0b011110, 0b01_0000, 12),
      (0b011111, 0b01_0000, 16),
    ]
    .into_iter()
    .flat_map(|(bits, frac, exp): (i32, i32, i32)| {
      // The negation of a posit decodes to the negated significand. For a
      // significand strictly inside (1, 2) the negation lands in (-2, -1)
      // and is already normal; exactly 1.0 renormalises to -2.0 with the
      // scale down one.
      let (neg_frac, neg_exp) =
        if frac == 0b01_0000 { (-frac << 1, exp - 1) } else { (-frac, exp) };
      [
        (Posit::from_bits(bits), Unpacked { frac: frac << 26, exp }),
        (Posit::from_bits(-bits), Unpacked { frac: neg_frac << 26, exp: neg_exp }),
      ]
    })
  }

  #[test]
  fn table_is_sound() {
    // The table itself must agree with the exact-rational reference decode.
    for (posit, unpacked) in posit_6_2_table() {
      assert_eq!(
        Rational::try_from(posit).ok(),
        Some(Rational::from(unpacked)),
        "{posit:?}",
      );
    }
  }

  #[test]
  fn posit_6_2_manual() {
    for (posit, unpacked) in posit_6_2_table() {
      assert_eq!(unsafe { posit.unpack_regular() }, unpacked, "{posit:?}")
    }
  }

  fn assert_decodes_exactly<const N: u32, const ES: u32, Int: oracle::IntExt>(
    p: Posit<N, ES, Int>,
  ) {
    let Unpacking::Regular(unpacked) = p.unpack() else { panic!("bad test case") };
    assert_eq!(Rational::try_from(p).ok(), Some(Rational::from(unpacked)), "{p:?}")
  }

  macro_rules! test_exhaustive {
    ($name:ident, $posit:ty) => {
      #[test]
      fn $name() {
        for p in <$posit>::regular_values() {
          assert_decodes_exactly(p)
        }
      }
    };
  }

  test_exhaustive! {p8_exhaustive, crate::p8}
  test_exhaustive! {p16_exhaustive, crate::p16}
  test_exhaustive! {posit_8_0_exhaustive, Posit::<8, 0, i8>}
  test_exhaustive! {posit_10_1_exhaustive, Posit::<10, 1, i16>}
  test_exhaustive! {posit_10_3_exhaustive, Posit::<10, 3, i16>}
  test_exhaustive! {posit_20_4_exhaustive, Posit::<20, 4, i32>}

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(crate::PROPTEST_CASES))]

    #[test]
    fn p32_proptest(p in crate::p32::arb_regular()) {
      assert_decodes_exactly(p)
    }

    #[test]
    fn p64_proptest(p in crate::p64::arb_regular()) {
      assert_decodes_exactly(p)
    }
  }

  /// Bit-pattern order must equal value order (the format's monotonicity
  /// law). Checking adjacent pairs is enough: order is transitive.
  #[test]
  fn monotone_p8() {
    let mut prev: Option<(crate::p8, Rational)> = None;
    for bits in i8::MIN..=i8::MAX {
      let p = crate::p8::from_bits(bits);
      let Ok(value) = Rational::try_from(p) else { continue };  // skip NaR
      if let Some((q, prev_value)) = prev.replace((p, value.clone())) {
        assert!(q < p && prev_value < value, "{q:?} vs {p:?}");
      }
    }
  }

  #[test]
  fn monotone_posit_10_0() {
    type P = Posit<10, 0, i16>;
    let mut prev: Option<Rational> = None;
    for bits in -512_i16..512 {
      let Ok(value) = Rational::try_from(P::from_bits(bits)) else { continue };
      if let Some(prev_value) = prev.replace(value.clone()) {
        assert!(prev_value < value, "at bits {bits}");
      }
    }
  }
}
