use super::{Double, Sealed};

macro_rules! impl_double {
  ($double:ty, $half:ty) => {
    impl Double for $double {
      type Half = $half;

      #[inline]
      fn halves(self) -> ($half, $half) {
        ((self >> <$half>::BITS) as $half, self as $half)
      }

      #[inline]
      unsafe fn redundant_sign_bits(self) -> u32 {
        // SAFETY: same contract as the Sealed method.
        unsafe { <Self as Sealed>::redundant_sign_bits(self) }
      }
    }
  }
}

impl_double! {i16, i8}
impl_double! {i32, i16}
impl_double! {i64, i32}

// `i128` is a Double (of i64) but not an Int, so it gets a standalone impl.
impl Double for i128 {
  type Half = i64;

  #[inline]
  fn halves(self) -> (i64, i64) {
    ((self >> 64) as i64, self as i64)
  }

  #[inline]
  unsafe fn redundant_sign_bits(self) -> u32 {
    let run = self ^ (self << 1);
    // SAFETY: caller guarantees `self != 0`, so `run != 0`.
    unsafe { core::num::NonZeroI128::new_unchecked(run) }.leading_zeros()
  }
}
