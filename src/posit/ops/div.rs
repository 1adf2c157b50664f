use super::*;

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> Posit<N, ES, Int> {
  /// The division kernel. Scales subtract; significands divide exactly at
  /// double width, the remainder becoming the sticky.
  ///
  /// A quotient of two windows `±[1,2)` lands in `±(1/2, 2)`, so it may sit
  /// one place below the normal window. A first division finds that
  /// normalisation shift, a second one retakes the quotient with the shift
  /// folded in so no quotient bit is wasted.
  ///
  /// # Safety
  ///
  /// `x` and `y` must be [normal](Unpacked::is_normal), or the call is
  /// *undefined behaviour*.
  #[inline]
  pub(crate) unsafe fn div_kernel(
    x: Unpacked<N, ES, Int>,
    y: Unpacked<N, ES, Int>,
  ) -> (Unpacked<N, ES, Int>, Int) {
    // SAFETY: y.frac is normal, so it is neither 0 nor -1; both quotients
    // below are non-zero (x.frac is normal too) and not MIN.
    let (probe, _) = unsafe { x.frac.shifted_div_rem(y.frac, Unpacked::<N, ES, Int>::FRAC_WIDTH) };
    let redundant = unsafe { probe.redundant_sign_bits() };
    let (frac, sticky) = unsafe {
      x.frac.shifted_div_rem(y.frac, Unpacked::<N, ES, Int>::FRAC_WIDTH + redundant)
    };
    let exp = x.exp - y.exp - Int::of_u32(redundant);

    (Unpacked { frac, exp }, sticky)
  }

  pub(crate) fn div(self, other: Self) -> Self {
    if self == Self::NAR || other == Self::NAR || other == Self::ZERO {
      Self::NAR
    } else if self == Self::ZERO {
      Self::ZERO
    } else {
      // SAFETY: neither operand is 0 or NaR; the kernel result is normal.
      unsafe {
        let (quotient, sticky) = Self::div_kernel(self.unpack_regular(), other.unpack_regular());
        quotient.pack_round(sticky)
      }
    }
  }
}

use core::ops::{Div, DivAssign};
super::forward_binop! {Div, DivAssign, div, div_assign}
