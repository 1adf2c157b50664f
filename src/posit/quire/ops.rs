use super::*;

impl<
  const N: u32,
  const ES: u32,
  const SIZE: usize,
> Quire<N, ES, SIZE> {
  /// Add a posit, exactly. A NaR operand (or an overflowing carry) leaves
  /// the quire NaR.
  pub fn add<Int: crate::Int>(&mut self, x: Posit<N, ES, Int>) {
    match x.unpack() {
      Unpacking::Zero => {}
      Unpacking::Nar => *self = Self::NAR,
      Unpacking::Regular(unpacked) => {
        if !self.is_nar() && self.add_unpacked(unpacked) {
          *self = Self::NAR;
        }
      }
    }
  }

  /// Subtract a posit, exactly (negation of a posit being exact).
  pub fn sub<Int: crate::Int>(&mut self, x: Posit<N, ES, Int>) {
    self.add(-x)
  }

  /// Accumulate the product `a × b`, exactly: the full double-width
  /// significand product lands in the accumulator with no rounding.
  ///
  /// ```
  /// # use tapered::*;
  /// let eps = p16::epsilon();
  /// let mut q = q16::ZERO;
  /// q.add_prod(p16::ONE, p16::ONE);
  /// q.add_prod(eps, eps);          // far below ONE's precision, but kept
  /// q.sub_prod(p16::ONE, p16::ONE);
  /// assert_eq!(q.to_posit::<i16>(), eps * eps);  // survived the cancellation
  /// ```
  pub fn add_prod<Int: crate::Int>(&mut self, a: Posit<N, ES, Int>, b: Posit<N, ES, Int>) {
    match (a.unpack(), b.unpack()) {
      (Unpacking::Nar, _) | (_, Unpacking::Nar) => *self = Self::NAR,
      (Unpacking::Zero, _) | (_, Unpacking::Zero) => {}
      (Unpacking::Regular(a), Unpacking::Regular(b)) => {
        if !self.is_nar() && self.add_product(a, b) {
          *self = Self::NAR;
        }
      }
    }
  }

  /// Accumulate `-(a × b)`, exactly.
  pub fn sub_prod<Int: crate::Int>(&mut self, a: Posit<N, ES, Int>, b: Posit<N, ES, Int>) {
    self.add_prod(-a, b)
  }

  /// Accumulate the dot product `Σ aᵢ·bᵢ` of two slices (truncated to the
  /// shorter), exactly. The fused dot product: one rounding for the whole
  /// sum, at [`Self::to_posit`].
  pub fn add_dot<Int: crate::Int>(&mut self, a: &[Posit<N, ES, Int>], b: &[Posit<N, ES, Int>]) {
    for (&x, &y) in a.iter().zip(b) {
      self.add_prod(x, y);
    }
  }

  /// As [`Self::add`], but NaR operands and capacity overflow are reported
  /// instead of collapsing the quire (which is left untouched on error).
  pub fn checked_add<Int: crate::Int>(
    &mut self,
    x: Posit<N, ES, Int>,
  ) -> Result<(), QuireError> {
    if x == Posit::NAR || self.is_nar() {
      return Err(QuireError::OperandIsNar);
    }
    let Unpacking::Regular(unpacked) = x.unpack() else { return Ok(()) };
    let mut attempt = self.clone();
    if attempt.add_unpacked(unpacked) {
      return Err(QuireError::CapacityExceeded);
    }
    *self = attempt;
    Ok(())
  }

  /// As [`Self::sub`], with the error reporting of [`Self::checked_add`].
  pub fn checked_sub<Int: crate::Int>(
    &mut self,
    x: Posit<N, ES, Int>,
  ) -> Result<(), QuireError> {
    self.checked_add(-x)
  }

  /// As [`Self::add_prod`], with the error reporting of
  /// [`Self::checked_add`].
  pub fn checked_add_prod<Int: crate::Int>(
    &mut self,
    a: Posit<N, ES, Int>,
    b: Posit<N, ES, Int>,
  ) -> Result<(), QuireError> {
    if a == Posit::NAR || b == Posit::NAR || self.is_nar() {
      return Err(QuireError::OperandIsNar);
    }
    let (Unpacking::Regular(a), Unpacking::Regular(b)) = (a.unpack(), b.unpack()) else {
      return Ok(());
    };
    let mut attempt = self.clone();
    if attempt.add_product(a, b) {
      return Err(QuireError::CapacityExceeded);
    }
    *self = attempt;
    Ok(())
  }
}

impl<const N: u32, const ES: u32, Int: crate::Int, const SIZE: usize>
core::ops::AddAssign<Posit<N, ES, Int>> for Quire<N, ES, SIZE> {
  fn add_assign(&mut self, rhs: Posit<N, ES, Int>) {
    self.add(rhs)
  }
}

impl<const N: u32, const ES: u32, Int: crate::Int, const SIZE: usize>
core::ops::SubAssign<Posit<N, ES, Int>> for Quire<N, ES, SIZE> {
  fn sub_assign(&mut self, rhs: Posit<N, ES, Int>) {
    self.sub(rhs)
  }
}

/// `quire += (a, b)` accumulates the exact product `a × b`.
impl<const N: u32, const ES: u32, Int: crate::Int, const SIZE: usize>
core::ops::AddAssign<(Posit<N, ES, Int>, Posit<N, ES, Int>)> for Quire<N, ES, SIZE> {
  fn add_assign(&mut self, (a, b): (Posit<N, ES, Int>, Posit<N, ES, Int>)) {
    self.add_prod(a, b)
  }
}

/// `quire -= (a, b)` subtracts the exact product `a × b`.
impl<const N: u32, const ES: u32, Int: crate::Int, const SIZE: usize>
core::ops::SubAssign<(Posit<N, ES, Int>, Posit<N, ES, Int>)> for Quire<N, ES, SIZE> {
  fn sub_assign(&mut self, (a, b): (Posit<N, ES, Int>, Posit<N, ES, Int>)) {
    self.sub_prod(a, b)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::posit::oracle;
  use crate::{RoundFrom, p16, q16};
  use malachite::rational::Rational;
  use proptest::prelude::*;

  /// Oracle mirror of a quire computation: rationals, summed exactly.
  fn exact_dot<const N: u32, const ES: u32, Int: oracle::IntExt>(
    pairs: &[(Posit<N, ES, Int>, Posit<N, ES, Int>)],
  ) -> Option<Rational> {
    let mut sum = Rational::from(0);
    for &(a, b) in pairs {
      sum += Rational::try_from(a).ok()? * Rational::try_from(b).ok()?;
    }
    Some(sum)
  }

  #[test]
  fn nar_posits_poison() {
    let mut q = q16::ZERO;
    q += p16::NAR;
    assert!(q.is_nar());
    // And NaR sticks.
    q += p16::ONE;
    assert!(q.is_nar());

    let mut q = q16::ZERO;
    q.add_prod(p16::NAR, p16::ZERO);
    assert!(q.is_nar());
  }

  #[test]
  fn zero_operands_are_noops() {
    let mut q = q16::ZERO;
    q += p16::ZERO;
    q.add_prod(p16::ZERO, p16::MAX);
    q.add_prod(p16::MAX, p16::ZERO);
    assert!(q.is_zero());
  }

  #[test]
  fn checked_reports_instead_of_poisoning() {
    let mut q = q16::ZERO;
    assert_eq!(q.checked_add(p16::NAR), Err(QuireError::OperandIsNar));
    assert!(q.is_zero());
    assert_eq!(q.checked_add(p16::ONE), Ok(()));
    assert_eq!(q.checked_add_prod(p16::ONE, p16::NAR), Err(QuireError::OperandIsNar));
    assert_eq!(q.checked_sub(p16::ONE), Ok(()));
    assert!(q.is_zero());
  }

  #[test]
  fn capacity_overflow() {
    // A 64-bit quire for an 8-bit, ES=0 format, parked one product short of
    // the positive edge: the next MAX² must trip the guard.
    type P = Posit<8, 0, i8>;  // MAX = 2^6, so MAX² is 2^24 quire units
    type Q = Quire<8, 0, 8>;
    let near_full = Q::from_le_bytes([0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f]);
    let max = P::MAX;

    let mut q = near_full.clone();
    assert_eq!(q.checked_add_prod(max, max), Err(QuireError::CapacityExceeded));
    assert_eq!(q, near_full);  // left untouched
    assert_eq!(q.checked_add_prod(max, -max), Ok(()));  // the other way is fine

    let mut q = near_full.clone();
    q.add_prod(max, max);
    assert!(q.is_nar());

    // Mirrored on the negative edge (one above NaR's pattern, which is the
    // most negative quire value).
    let mut q = Q::from_le_bytes([1, 0, 0, 0, 0, 0, 0, 0x80]);
    q.sub_prod(max, max);
    assert!(q.is_nar());
  }

  #[test]
  fn sums_match_the_oracle_p16_pairs() {
    // Across a spread of magnitudes and signs, quire sums of two posits
    // round exactly like the rational sum.
    let values: Vec<p16> = (0..=u16::MAX)
      .step_by(41)
      .map(|bits| p16::from_bits(bits as i16))
      .filter(|p| *p != p16::NAR)
      .collect();
    for (i, &a) in values.iter().enumerate() {
      // A sliding window rather than the full square, for time's sake.
      for &b in values.iter().skip(i).take(40) {
        let mut q = q16::from(a);
        q += b;
        let exact = Rational::try_from(a).unwrap() + Rational::try_from(b).unwrap();
        assert!(oracle::rounds_to(&exact, q.to_posit::<i16>()), "{a:?} + {b:?}");
      }
    }
  }

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(crate::PROPTEST_CASES / 4))]

    /// The headline property: an 8-term dot product, accumulated in the
    /// quire and rounded once, equals the exact rational dot product
    /// rounded once.
    #[test]
    fn fused_dot_product_rounds_once(
      pairs in proptest::collection::vec((p16::arb_regular(), p16::arb_regular()), 1..8),
    ) {
      let mut q = q16::ZERO;
      for &(a, b) in &pairs {
        q.add_prod(a, b);
      }
      let exact = exact_dot(&pairs).unwrap();
      prop_assert!(oracle::rounds_to(&exact, q.to_posit::<i16>()), "{pairs:?}");
    }

    /// Subtraction mirrors addition exactly.
    #[test]
    fn sub_is_negated_add(a in p16::arb_regular(), b in p16::arb_regular()) {
      let mut q1 = q16::ZERO;
      q1.sub_prod(a, b);
      let mut q2 = q16::ZERO;
      q2.add_prod(-a, b);
      prop_assert_eq!(q1, q2);
      let mut q3 = q16::ZERO;
      q3 -= a;
      let mut q4 = q16::ZERO;
      q4 += -a;
      prop_assert_eq!(q3, q4);
    }
  }

  /// Mixed-sign products at a wide dynamic range, ten thousand times over:
  /// one rounding at the end, checked against the exact rational oracle.
  #[test]
  fn ten_thousand_mixed_products() {
    let a = p16::round_from(0.1_f64);
    let b = p16::round_from(-0.01_f64);
    let one = p16::ONE;

    let mut q = q16::ZERO;
    for _ in 0..10_000 {
      q.add_prod(a, a);
      q.add_prod(b, one);
    }
    let term = Rational::try_from(a).unwrap() * Rational::try_from(a).unwrap()
      + Rational::try_from(b).unwrap();
    let exact = term * Rational::from(10_000);
    assert!(oracle::rounds_to(&exact, q.to_posit::<i16>()));
  }

  /// The cancellation case the quire exists for: 1 + ε² - 1. The quire
  /// keeps ε²; posit-by-posit arithmetic loses it to rounding twice.
  #[test]
  fn cancellation_beats_naive_summation() {
    let eps = p16::epsilon();
    let eps_squared = eps * eps;
    assert_ne!(eps_squared, p16::ZERO);

    let mut q = q16::ZERO;
    q.add_prod(p16::ONE, p16::ONE);
    q.add_prod(eps, eps);
    q.sub_prod(p16::ONE, p16::ONE);
    assert_eq!(q.to_posit::<i16>(), eps_squared);

    let naive = (p16::ONE + eps * eps) - p16::ONE;
    assert_eq!(naive, p16::ZERO);  // the naive sum rounded ε² clean away
  }
}
