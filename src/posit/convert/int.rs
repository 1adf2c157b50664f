use super::*;

use crate::machine::{cast, cast_i128};

/// Integer → posit conversions for every primitive width, signed and
/// unsigned.
///
/// One quirk inherited from the standard's `iToP`/`uToP`: the source bit
/// pattern `1000…0` (the most negative signed value, or the corresponding
/// unsigned pattern) converts to NaR, mirroring the posit pattern with the
/// same shape.
///
/// The conversion normalises the integer in its own width first (so nothing
/// is lost), then narrows into the target storage width with the spilled
/// bits as sticky; a 128-bit source is the same code path as an 8-bit one.
macro_rules! impl_round_from_int {
  ($signed:ty, $unsigned:ty) => {
    impl<
      const N: u32,
      const ES: u32,
      Int: crate::Int,
    > RoundFrom<$signed> for Posit<N, ES, Int> {
      #[doc = concat!("Convert an `", stringify!($signed), "`, rounding if needed; `",
        stringify!($signed), "::MIN` converts to [NaR](Posit::NAR) per the standard.")]
      fn round_from(value: $signed) -> Self {
        const BITS: u32 = <$signed>::BITS;
        if value == 0 {
          return Self::ZERO;
        }
        if value == <$signed>::MIN {
          return Self::NAR;
        }

        // Normalise within the source width: shift the redundant sign bits
        // out, leaving the two-sign-bit significand window.
        let lead = (value ^ (value << 1)).leading_zeros();
        let normalized = value << lead;
        let exp = BITS as i32 - 2 - lead as i32;

        // Narrow (or widen) into the storage type, spill into sticky.
        let (frac, sticky): (Int, Int) = if const { Int::BITS >= BITS } {
          let widen = Int::BITS.saturating_sub(BITS);
          (cast_i128::<Int>((normalized as i128) << widen), Int::ZERO)
        } else {
          let dropped = BITS.saturating_sub(Int::BITS);
          let sticky = Int::from(normalized & ((1 << dropped) - 1) != 0);
          (cast_i128::<Int>((normalized >> dropped) as i128), sticky)
        };

        // Clamp the scale into the storage type's comfort zone (it only
        // moves scales that saturate either way).
        let limit = cast::<Int, i64>(Int::MAX >> 1);
        let exp = (exp as i64).clamp(-limit, limit);

        // SAFETY: `normalized` has significand shape by construction, and
        // the exponent is clamped.
        unsafe { Unpacked { frac, exp: cast_i128::<Int>(exp as i128) }.pack_round(sticky) }
      }
    }

    impl<
      const N: u32,
      const ES: u32,
      Int: crate::Int,
    > RoundFrom<$unsigned> for Posit<N, ES, Int> {
      #[doc = concat!("Convert a `", stringify!($unsigned), "`, rounding if needed; the `",
        "0b1000…0` pattern converts to [NaR](Posit::NAR) per the standard.")]
      fn round_from(value: $unsigned) -> Self {
        const BITS: u32 = <$unsigned>::BITS;
        if value == 0 {
          return Self::ZERO;
        }
        if value == 1 << (BITS - 1) {
          return Self::NAR;
        }

        // As the signed case, except a set top bit means one more doubling,
        // not a sign: pull the value down one place (lsb to sticky) so the
        // signed normalisation applies.
        let (signed, exp_fixup, dropped_lsb) = if value >> (BITS - 1) == 1 {
          ((value >> 1) as $signed, 1, value & 1 != 0)
        } else {
          (value as $signed, 0, false)
        };
        let lead = (signed ^ (signed << 1)).leading_zeros();
        let normalized = signed << lead;
        let exp = BITS as i32 - 2 - lead as i32 + exp_fixup;

        let (frac, sticky): (Int, Int) = if const { Int::BITS >= BITS } {
          let widen = Int::BITS.saturating_sub(BITS);
          (cast_i128::<Int>((normalized as i128) << widen), Int::from(dropped_lsb))
        } else {
          let dropped = BITS.saturating_sub(Int::BITS);
          let sticky = Int::from(dropped_lsb || normalized & ((1 << dropped) - 1) != 0);
          (cast_i128::<Int>((normalized >> dropped) as i128), sticky)
        };

        let limit = cast::<Int, i64>(Int::MAX >> 1);
        let exp = (exp as i64).clamp(-limit, limit);

        // SAFETY: as the signed case.
        unsafe { Unpacked { frac, exp: cast_i128::<Int>(exp as i128) }.pack_round(sticky) }
      }
    }
  }
}

impl_round_from_int! {i8, u8}
impl_round_from_int! {i16, u16}
impl_round_from_int! {i32, u32}
impl_round_from_int! {i64, u64}
impl_round_from_int! {i128, u128}
