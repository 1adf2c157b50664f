use super::*;

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> Posit<N, ES, Int> {
  /// The multiplication kernel. Scales add; significands multiply at double
  /// width so nothing is lost.
  ///
  /// With significands scaled by `2^FRAC_WIDTH` and `FRAC_WIDTH = BITS - 2`,
  /// the double-width product is scaled by `2^(2·BITS - 4)`; taking its high
  /// word divides by `2^BITS`, so the result is scaled by `2^(BITS - 4)`,
  /// two ulps of scale short, hence the `+ 2` on the exponent. The product
  /// of two windows `±[1,2)` lands in `±[1,4)`, so up to two leading bits
  /// can be redundant and get normalised out again.
  ///
  /// # Safety
  ///
  /// `x` and `y` must be [normal](Unpacked::is_normal), or the call is
  /// *undefined behaviour*.
  #[inline]
  pub(crate) unsafe fn mul_kernel(
    x: Unpacked<N, ES, Int>,
    y: Unpacked<N, ES, Int>,
  ) -> (Unpacked<N, ES, Int>, Int) {
    use crate::machine::Double;
    let product = x.frac.widening_mul(y.frac);
    // SAFETY: both factors are non-zero, so the product is neither 0 nor
    // all-ones, and (being a product of two normal windows) not MIN either.
    let redundant = unsafe { product.redundant_sign_bits() };
    let (frac, sticky) = (product << redundant).halves();
    let exp = x.exp + y.exp + Int::ONE + Int::ONE - Int::of_u32(redundant);

    (Unpacked { frac, exp }, sticky)
  }

  pub(crate) fn mul(self, other: Self) -> Self {
    if self == Self::NAR || other == Self::NAR {
      Self::NAR
    } else if self == Self::ZERO || other == Self::ZERO {
      Self::ZERO
    } else {
      // SAFETY: neither operand is 0 or NaR; the kernel result is normal.
      unsafe {
        let (product, sticky) = Self::mul_kernel(self.unpack_regular(), other.unpack_regular());
        product.pack_round(sticky)
      }
    }
  }
}

use core::ops::{Mul, MulAssign};
super::forward_binop! {Mul, MulAssign, mul, mul_assign}
