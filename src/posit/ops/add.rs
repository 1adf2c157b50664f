use super::*;

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> Posit<N, ES, Int> {
  /// The addition kernel: align, add, renormalise. Returns the normalised
  /// sum and the sticky word.
  ///
  /// # Safety
  ///
  /// `x` and `y` must be [normal](Unpacked::is_normal) and must not cancel
  /// exactly (`x != -y`), or the call is *undefined behaviour*.
  #[inline]
  pub(crate) unsafe fn add_kernel(
    x: Unpacked<N, ES, Int>,
    y: Unpacked<N, ES, Int>,
  ) -> (Unpacked<N, ES, Int>, Int) {
    // Let x be the operand with the larger scale; y's significand then gets
    // shifted right by the scale difference to line the binary points up.
    let shift = x.exp - y.exp;
    let (x, y) = if shift.is_positive() { (x, y) } else { (y, x) };
    let shift = shift.wrapping_abs().as_u32();
    if shift >= Int::BITS {
      // y is so much smaller that none of its bits line up with x's
      // significand at all; it survives only as rounding information.
      return (x, y.frac);
    }
    let yfrac = y.frac >> shift;

    // Same signs: the sum may carry out one place (1.5 + 1.5 = 3.0, whose
    // significand no longer fits the [1,2) window). `overflowing_add_shift`
    // folds the halving into the add; the scale goes up one to compensate,
    // and the bit the halving pushed out must survive as rounding
    // information. That bit is the lsb of the unshifted sum, i.e. the xor of
    // the addends' lsbs (no carry enters the lsb).
    let (frac, carry) = x.frac.overflowing_add_shift(yfrac);
    let exp = x.exp + carry.into();
    let dropped = (x.frac ^ yfrac) & Int::ONE & Int::from(carry);

    // Opposite signs: leading bits may cancel instead (-1.25 + 1.0 = -0.25),
    // leaving a significand below the window. Count the redundant sign bits
    // and shift them out, lowering the scale to match.
    //
    // SAFETY: the aligned sum can only be 0 if a 1.0 significand meets a
    // MIN-pattern one at shift 1 (decoded fractions keep their lowest bit
    // clear, so the arithmetic shift can't manufacture the half-ulp that
    // any other zero sum would need), and that pair is x == -y, which the
    // precondition excludes.
    let borrow = unsafe { frac.redundant_sign_bits() };
    let frac = frac << borrow;
    let exp = exp - Int::of_u32(borrow);

    // The left shift after cancellation reaches below y's aligned lsb: the
    // first `borrow` of the bits we shifted off `y.frac` earlier come back
    // into view and belong in the result. Whatever still doesn't fit is the
    // sticky. (`carry` and `borrow` can't both be non-zero, so `dropped`
    // never collides with the recovered bits.)
    let back_in_view = shift.min(borrow);
    let recovered = y.frac.mask_lsb(shift) >> (shift - back_in_view);
    let sticky = y.frac.mask_lsb(shift - back_in_view) | dropped;

    (Unpacked { frac: frac | recovered, exp }, sticky)
  }

  pub(crate) fn add(self, other: Self) -> Self {
    if self == Self::NAR || other == Self::NAR {
      Self::NAR
    } else if self == Self::ZERO {
      other
    } else if other == Self::ZERO {
      self
    } else if self.0.wrapping_add(other.0) == Int::ZERO {
      // x + (-x): exact cancellation, which the kernel must not see.
      Self::ZERO
    } else {
      // SAFETY: neither operand is 0 or NaR, and they don't cancel exactly.
      unsafe {
        let (sum, sticky) = Self::add_kernel(self.unpack_regular(), other.unpack_regular());
        sum.pack_round(sticky)
      }
    }
  }

  #[inline]
  pub(crate) fn sub(self, other: Self) -> Self {
    self.add(-other)
  }
}

use core::ops::{Add, AddAssign, Sub, SubAssign};
super::forward_binop! {Add, AddAssign, add, add_assign}
super::forward_binop! {Sub, SubAssign, sub, sub_assign}
