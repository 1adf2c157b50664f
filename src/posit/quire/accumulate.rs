use super::*;

#[inline]
fn carrying_add(a: u64, b: u64, carry: bool) -> (u64, bool) {
  let (sum, c1) = a.overflowing_add(b);
  let (sum, c2) = sum.overflowing_add(carry as u64);
  (sum, c1 | c2)
}

impl<
  const N: u32,
  const ES: u32,
  const SIZE: usize,
> Quire<N, ES, SIZE> {
  /// The accumulation kernel: add `value × 2^shift` (in units of the
  /// quire's bottom bit) into the fixed-point accumulator, exactly.
  ///
  /// `shift` may be negative, but only when the bits it would push below
  /// the quire are all zero, which holds for every posit and every posit
  /// product by the sizing of [`Self::MIN_SIZE`] (debug-checked here).
  ///
  /// Returns `true` on two's complement overflow of the whole quire, in
  /// which case the stored result has wrapped and the caller must dispose
  /// of it (NaR, or an error).
  pub(crate) fn add_value(&mut self, value: i128, shift: i32) -> bool {
    if value == 0 {
      return false;
    }
    let (value, shift) = if shift < 0 {
      debug_assert_eq!(value & ((1 << -shift) - 1), 0, "non-representable low bits");
      (value >> -shift, 0)
    } else {
      (value, shift as u32)
    };

    // Split `value << (shift % 64)` into three 64-bit limbs, low to high;
    // the word offset places them in the accumulator.
    let offset = (shift / 64) as usize;
    let bit = shift % 64;
    let limbs: [u64; 3] = if bit == 0 {
      [value as u64, (value >> 64) as u64, (value >> 127) as u64]
    } else {
      [
        (value as u64) << bit,
        (value as u128 >> (64 - bit)) as u64,
        (value >> (128 - bit)) as u64,
      ]
    };

    let negative = value < 0;
    let extension = if negative { u64::MAX } else { 0 };
    let words = self.words_mut();
    let sign_before = words[words.len() - 1] >> 63;

    let mut carry = false;
    for (i, &limb) in limbs.iter().enumerate() {
      let Some(word) = words.get_mut(offset + i) else {
        // Limbs past the top must be pure sign extension (the value fits
        // the quire by construction); their carry contribution is the same
        // as the extension words below, so fold them into that loop.
        debug_assert_eq!(limb, extension);
        break;
      };
      (*word, carry) = carrying_add(*word, limb, carry);
    }

    // Sign-extend the addend across the remaining words. Once the word
    // updates become no-ops (adding 0 without carry, or all-ones with
    // carry), the rest of the quire is untouched.
    for word in words.iter_mut().skip(offset + 3) {
      if carry == negative {
        break;
      }
      (*word, carry) = carrying_add(*word, extension, carry);
    }

    let sign_after = words[words.len() - 1] >> 63;
    sign_before == (negative as u64) && sign_after != sign_before
  }

  /// Add a single unpacked posit, exactly.
  pub(crate) fn add_unpacked<Int: crate::Int>(&mut self, x: Unpacked<N, ES, Int>) -> bool {
    // `frac` sits `FRAC_WIDTH` bits above its own unit; the quire's unit is
    // `FRAC_BITS` below the point.
    let shift = Self::FRAC_BITS as i32 - Unpacked::<N, ES, Int>::FRAC_WIDTH as i32
      + exp_i32(x.exp);
    self.add_value(x.frac.into(), shift)
  }

  /// Add the exact product of two unpacked posits: the double-width
  /// significand product, placed at the sum of the scales. Nothing is
  /// rounded; this is the whole point of the quire.
  pub(crate) fn add_product<Int: crate::Int>(
    &mut self,
    x: Unpacked<N, ES, Int>,
    y: Unpacked<N, ES, Int>,
  ) -> bool {
    use crate::machine::Double;
    const { assert!(Int::BITS <= 64, "quire products need the significand product to fit an i128") };
    let product = x.frac.widening_mul(y.frac);
    let (hi, lo) = product.halves();
    let (hi, lo): (i128, i128) = (hi.into(), lo.into());
    let wide = (hi << Int::BITS) | (lo & ((1_i128 << Int::BITS) - 1));
    let shift = Self::FRAC_BITS as i32 - 2 * Unpacked::<N, ES, Int>::FRAC_WIDTH as i32
      + exp_i32(x.exp) + exp_i32(y.exp);
    self.add_value(wide, shift)
  }
}

/// An unpacked scale always fits an i32.
fn exp_i32<Int: crate::Int>(exp: Int) -> i32 {
  let wide: i128 = exp.into();
  wide as i32
}

#[cfg(test)]
mod tests {
  use super::*;

  fn q16_with(value: i128, shift: i32) -> crate::q16 {
    let mut q = crate::q16::ZERO;
    assert!(!q.add_value(value, shift));
    q
  }

  #[test]
  fn add_value_places_bits() {
    // 1 at shift 0 is the bottom bit.
    assert_eq!(q16_with(1, 0).to_le_bytes()[0], 1);
    // 1 at shift FRAC_BITS is the value 1.0.
    let q = q16_with(1, crate::q16::FRAC_BITS as i32);
    assert_eq!(q.to_le_bytes()[112 / 8], 1);
    // Straddling a word boundary.
    let q = q16_with(0b11, 63);
    assert_eq!(q.words()[0], 1 << 63);
    assert_eq!(q.words()[1], 1);
  }

  #[test]
  fn add_value_negative_shift() {
    assert_eq!(q16_with(0b100, -2).to_le_bytes()[0], 1);
  }

  #[test]
  fn negative_values_sign_extend() {
    let mut q = crate::q16::ZERO;
    assert!(!q.add_value(-1, 0));
    assert!(q.words().iter().all(|&w| w == u64::MAX));
    // And cancel back to zero.
    assert!(!q.add_value(1, 0));
    assert!(q.is_zero());
  }

  #[test]
  fn carries_ripple() {
    let mut q = crate::q16::ZERO;
    assert!(!q.add_value(u64::MAX as i128, 0));
    assert!(!q.add_value(1, 0));
    assert_eq!(q.words()[0], 0);
    assert_eq!(q.words()[1], 1);
  }

  #[test]
  fn overflow_is_reported() {
    let mut q = crate::q16::ZERO;
    // Two halves of the positive range: the second lands on the sign bit.
    assert!(!q.add_value(1, crate::q16::BITS as i32 - 2));
    assert!(q.add_value(1, crate::q16::BITS as i32 - 2));
  }

  #[test]
  fn negative_overflow_is_reported() {
    let mut q = crate::q16::ZERO;
    assert!(!q.add_value(-1, crate::q16::BITS as i32 - 1));
    assert!(q.add_value(-1, crate::q16::BITS as i32 - 1));
  }
}
