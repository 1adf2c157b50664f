use super::*;

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> Unpacked<N, ES, Int> {
  /// Encode back to bits, rounding. This is the one place in the crate where
  /// information is allowed to be lost, and the rule is always the same:
  /// write the value as an infinitely long bit string, keep the first `N`
  /// bits, round to the nearest pattern with ties to the even pattern; and
  /// never round a non-zero value to 0 or past the finite extremes.
  ///
  /// `sticky` summarises everything the *caller* already shifted out below
  /// `frac`'s own lsb: it must be zero iff all those lost bits were zero.
  ///
  /// # Safety
  ///
  /// [`self.is_normal()`](Self::is_normal) must hold, or the call is
  /// *undefined behaviour*. (Out-of-range scales are fine: the regime cap
  /// below saturates them.)
  pub(crate) unsafe fn pack_round(self, mut sticky: Int) -> Posit<N, ES, Int> {
    debug_assert!(
      self.is_normal(),
      "pack_round precondition violated: {self:?} is not normalised",
    );

    // The scale splits into regime (high bits) and exponent field (low ES
    // bits). Note an arithmetic shift keeps this correct for negative
    // scales.
    let regime = self.exp >> ES;

    // --- Sign and regime bits -------------------------------------------
    //
    // Writing n for the regime and s for the posit's sign, the encoding
    // rules (after folding the two's complement re-interpretation of
    // negative patterns into the fields, and using -n = !n + 1) collapse to:
    //
    //   a run of  n+1 ones  then a zero,  if n ^ s ≥ 0
    //   a run of !n+1 zeros then a one,   if n ^ s < 0
    //
    // Two facts let us build that without branching. First, `frac` is
    // normalised, so its top two bits are exactly `01` or `10`, the sign
    // twice over. Second, `regime`'s top two bits are `00` or `11` (the
    // regime is tiny compared to the word width). Hence the top two bits of
    // `!(frac ^ exp)` are `10` when we need a falling run and `01` when we
    // need a rising one; dragging them right by the run length (arithmetic
    // shift!) paints exactly the run-plus-terminator pattern.
    let run = regime.not_if_negative(regime).as_u32();  // n if n ≥ 0 else !n

    // Saturation: rounding must never reach 0 or NaR, so the run is capped
    // at the longest one that leaves the terminating bit in the word. When
    // the cap kicks in, the result is one of the four extreme patterns
    // (s111…1 / s000…01); all four end in a 1, which we OR in at the end.
    let run_cap = Self::BITS - 3;
    let saturated = run > run_cap;
    let run = if saturated { run_cap } else { run };

    let regime_bits = (!(self.frac ^ self.exp)).mask_msb(2) >> run;
    let sign_and_regime = (self.frac.mask_msb(1) | regime_bits.lshr(1)) >> Self::JUNK_BITS;

    // --- Exponent and fraction bits -------------------------------------
    //
    // These are assembled top-aligned in one word first, then shifted into
    // place below the regime; doing it in one piece means the bits that
    // fall off the end are exactly the rounding information.
    //
    // For negative posits the stored exponent field is complemented
    // (mirroring decode); the fraction bits go in as-is.
    let exponent_bits = if const { ES == 0 } {
      Int::ZERO
    } else {
      self.exp.not_if_negative(self.frac) << (Int::BITS - ES)
    };
    let fraction_bits = (self.frac << 2).lshr(Self::ES);
    let below_regime = (exponent_bits | fraction_bits).lshr(Self::JUNK_BITS);

    // If ES > 2 (or there are junk bits), assembling `below_regime` already
    // discarded some fraction lsbs; fold them into the sticky.
    if const { Self::JUNK_BITS + Self::ES > 2 } {
      sticky |= self.frac.mask_lsb(Self::JUNK_BITS + Self::ES - 2);
    }

    // Shifting `below_regime` under the sign/run/terminator (run + 3 bits,
    // of which one was pre-consumed by the lshr(1) above, so run + 2 here)
    // pushes out the low bits: all but the last feed the sticky, the last
    // one out is the round bit.
    sticky |= below_regime.mask_lsb(2 + run);
    let below_regime = below_regime.lshr(2 + run);
    let round = below_regime.lsb();
    let truncated = sign_and_regime | below_regime.lshr(1);

    // Round to nearest, ties to even pattern:
    //
    //   round sticky | action
    //     0     any  | down
    //     1      ≠0  | up
    //     1       0  | to the even pattern (up iff lsb is set)
    //
    // Adding 1 to the *whole* truncated pattern is the correct "up" in
    // every case: if the fraction was all ones the carry ripples into the
    // exponent and regime fields and lands on the right neighbouring
    // pattern, which is the great charm of this encoding.
    let round_up = round & (truncated.lsb() | (sticky != Int::ZERO));
    let bits = truncated + Int::from(round_up & !saturated);

    // SAFETY: built sign-extended by construction.
    unsafe { Posit::from_bits_unchecked(bits | Int::from(saturated)) }
  }

  /// Encode exactly (no information below `frac`'s lsb). Mainly for values
  /// that came straight out of [`Posit::unpack_regular`].
  ///
  /// # Safety
  ///
  /// As [`Self::pack_round`].
  #[inline]
  pub(crate) unsafe fn pack(self) -> Posit<N, ES, Int> {
    // SAFETY: forwarded contract.
    unsafe { self.pack_round(Int::ZERO) }
  }

  /// Checked front door for tests.
  #[cfg(test)]
  pub(crate) fn try_pack_round(self, sticky: Int) -> Option<Posit<N, ES, Int>> {
    // SAFETY: guarded by the normality check.
    self.is_normal().then(|| unsafe { self.pack_round(sticky) })
  }
}
