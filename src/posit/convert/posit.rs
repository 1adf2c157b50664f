use super::*;

use crate::machine::cast;

impl<
  const N2: u32,
  const ES2: u32,
  Int2: crate::Int,
  const N1: u32,
  const ES1: u32,
  Int1: crate::Int,
> RoundFrom<Posit<N1, ES1, Int1>> for Posit<N2, ES2, Int2> {
  /// Convert between posit formats, rounding per the standard.
  ///
  /// Between formats with the same exponent size (the standard types in
  /// particular), a posit resize is nothing but a resize of the bit
  /// pattern, which makes mixed-precision code essentially free.
  ///
  /// ```
  /// # use tapered::*;
  /// let wide = p32::round_from(3.25_f64);
  /// let narrow = p8::round_from(wide);
  /// assert_eq!(narrow, p8::round_from(3.25_f64));
  /// assert_eq!(p32::round_from(p8::NAR), p32::NAR);
  /// ```
  fn round_from(value: Posit<N1, ES1, Int1>) -> Self {
    if const { ES1 == ES2 } {
      round_resize(value)
    } else {
      round_repack(value)
    }
  }
}

/// Same exponent size: appending zeros (widening) or rounding off the tail
/// of the pattern (narrowing) is the whole conversion.
fn round_resize<
  const N2: u32,
  const ES2: u32,
  Int2: crate::Int,
  const N1: u32,
  const ES1: u32,
  Int1: crate::Int,
>(value: Posit<N1, ES1, Int1>) -> Posit<N2, ES2, Int2> {
  if const { N1 <= N2 } {
    // Widening is exact.
    let widen = N2.saturating_sub(N1);
    let bits = cast::<Int1, Int2>(value.to_bits()) << widen;
    // SAFETY: a sign-extended N1-bit pattern stays sign-extended after
    // appending zeros up to N2 bits.
    return unsafe { Posit::from_bits_unchecked(bits) };
  }

  // Narrowing: the dropped tail is the rounding information. Note 0 and
  // NaR pass through unchanged (their truncations are themselves, with
  // nothing dropped).
  let dropped = N1.saturating_sub(N2);
  let truncated = cast::<Int1, Int2>(value.to_bits() >> dropped);
  let round = cast::<Int1, Int2>(value.to_bits() >> dropped.saturating_sub(1)) & Int2::ONE;
  let sticky = Int2::from(value.to_bits().mask_lsb(dropped.saturating_sub(1)) != Int1::ZERO);

  // Nearest, ties to even pattern...
  let round_up = round & (truncated | sticky) & Int2::ONE;
  // ...except never round a regular value onto 0 or NaR: if the truncation
  // landed on one of those, any dropped bit at all forces the +1 back off
  // the special pattern.
  let is_special = Posit::<N2, ES2, Int2>::from_bits(truncated).is_special();
  let round_up = round_up | ((round | sticky) & Int2::from(is_special));

  let rounded = Posit::<N2, ES2, Int2>::sign_extend(truncated.wrapping_add(round_up));
  // And never ride the +1 across the sign bit (MAX must not round up to
  // NaR, nor MAX_NEGATIVE up to 0).
  let wrapped = !(rounded ^ truncated).is_positive();
  Posit::from_bits(rounded.wrapping_sub(Int2::from(wrapped)))
}

/// Different exponent sizes: go through decode and re-encode.
fn round_repack<
  const N2: u32,
  const ES2: u32,
  Int2: crate::Int,
  const N1: u32,
  const ES1: u32,
  Int1: crate::Int,
>(value: Posit<N1, ES1, Int1>) -> Posit<N2, ES2, Int2> {
  match value.unpack() {
    Unpacking::Zero => Posit::ZERO,
    Unpacking::Nar => Posit::NAR,
    Unpacking::Regular(unpacked) => {
      // Move the significand window between storage widths, spilling into
      // the sticky when narrowing.
      let frac: i128 = unpacked.frac.into();
      let (frac, sticky) = if const { Int2::BITS >= Int1::BITS } {
        let widen = Int2::BITS.saturating_sub(Int1::BITS);
        (crate::machine::cast_i128::<Int2>(frac << widen), Int2::ZERO)
      } else {
        let dropped = Int1::BITS.saturating_sub(Int2::BITS);
        let sticky = Int2::from(frac & ((1 << dropped) - 1) != 0);
        (crate::machine::cast_i128::<Int2>(frac >> dropped), sticky)
      };

      // The scale always fits an i128; clamp it into the destination
      // storage (the clamp is already deep in saturation territory, so it
      // never changes the rounded result).
      let exp: i128 = unpacked.exp.into();
      let limit: i128 = cast::<Int2, i64>(Int2::MAX >> 1).into();
      let exp = crate::machine::cast_i128::<Int2>(exp.clamp(-limit, limit));

      // SAFETY: the window shape survives the shifts; the scale is clamped.
      unsafe { Unpacked { frac, exp }.pack_round(sticky) }
    }
  }
}

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> Posit<N, ES, Int> {
  /// Convert into another posit format; shorthand for the
  /// [`RoundFrom`]/[`RoundInto`] impls with the parameters spelled inline.
  ///
  /// ```
  /// # use tapered::*;
  /// let x = p16::round_from(1.5_f64);
  /// assert_eq!(x.convert::<32, 2, i32>(), p32::round_from(1.5_f64));
  /// ```
  pub fn convert<const N2: u32, const ES2: u32, Int2: crate::Int>(self) -> Posit<N2, ES2, Int2> {
    Posit::round_from(self)
  }
}
