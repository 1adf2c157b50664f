pub(crate) use super::*;

/// Addition and subtraction (one kernel: `a - b` is `a + (-b)`, negation
/// being exact).
mod add;

/// Multiplication.
mod mul;

/// Division.
mod div;

/// Implements a binary operator trait for every value/reference combination,
/// plus the corresponding `*Assign` forms, on top of one inherent method.
macro_rules! forward_binop {
  ($trait:ident, $trait_assign:ident, $method:ident, $method_assign:ident) => {
    impl<const N: u32, const ES: u32, Int: crate::Int>
    $trait for Posit<N, ES, Int> {
      type Output = Self;

      #[inline]
      fn $method(self, rhs: Self) -> Self { Posit::$method(self, rhs) }
    }

    impl<const N: u32, const ES: u32, Int: crate::Int>
    $trait<&Posit<N, ES, Int>> for Posit<N, ES, Int> {
      type Output = Self;

      #[inline]
      fn $method(self, rhs: &Self) -> Self { Posit::$method(self, *rhs) }
    }

    impl<const N: u32, const ES: u32, Int: crate::Int>
    $trait<Posit<N, ES, Int>> for &Posit<N, ES, Int> {
      type Output = Posit<N, ES, Int>;

      #[inline]
      fn $method(self, rhs: Posit<N, ES, Int>) -> Posit<N, ES, Int> {
        Posit::$method(*self, rhs)
      }
    }

    impl<const N: u32, const ES: u32, Int: crate::Int>
    $trait<&Posit<N, ES, Int>> for &Posit<N, ES, Int> {
      type Output = Posit<N, ES, Int>;

      #[inline]
      fn $method(self, rhs: &Posit<N, ES, Int>) -> Posit<N, ES, Int> {
        Posit::$method(*self, *rhs)
      }
    }

    impl<const N: u32, const ES: u32, Int: crate::Int>
    $trait_assign for Posit<N, ES, Int> {
      #[inline]
      fn $method_assign(&mut self, rhs: Self) { *self = Posit::$method(*self, rhs) }
    }

    impl<const N: u32, const ES: u32, Int: crate::Int>
    $trait_assign<&Posit<N, ES, Int>> for Posit<N, ES, Int> {
      #[inline]
      fn $method_assign(&mut self, rhs: &Self) { *self = Posit::$method(*self, *rhs) }
    }
  }
}

pub(crate) use forward_binop;

/// The oracle suite every binary operator instantiates: exhaustive over the
/// small formats, randomised over the big ones, each result checked for
/// correct rounding (and NaR behaviour) against exact rational arithmetic.
#[cfg(test)]
macro_rules! binop_tests {
  ($op:tt, $op_assign:tt) => {
    use crate::posit::oracle;
    use crate::{Posit, RoundFrom};
    use malachite::rational::Rational;
    use proptest::prelude::*;

    fn correct<const N: u32, const ES: u32, Int: oracle::IntExt>(
      a: Posit<N, ES, Int>,
      b: Posit<N, ES, Int>,
    ) -> bool {
      let result = a $op b;
      match (Rational::try_from(a), Rational::try_from(b)) {
        (Ok(ar), Ok(br)) => {
          if stringify!($op) == "/" && br == Rational::from(0) {
            return result == Posit::NAR;
          }
          oracle::rounds_to(&(ar $op br), result)
        }
        // Any NaR operand: NaR result.
        _ => result == Posit::NAR,
      }
    }

    fn exhaustive<const N: u32, const ES: u32, Int: oracle::IntExt>() {
      for a in Posit::<N, ES, Int>::all_values() {
        for b in Posit::<N, ES, Int>::all_values() {
          assert!(correct(a, b), "{a:?} {} {b:?}", stringify!($op));
        }
      }
    }

    #[test]
    fn assign_and_reference_forms() {
      let mut a = crate::p32::round_from(6_i32);
      let b = crate::p32::round_from(3_i32);
      let by_value = a $op b;
      assert_eq!(a $op &b, by_value);
      assert_eq!(&a $op b, by_value);
      assert_eq!(&a $op &b, by_value);
      a $op_assign b;
      assert_eq!(a, by_value);
    }

    #[test]
    fn posit_4_0_exhaustive() { exhaustive::<4, 0, i8>() }

    #[test]
    fn posit_6_0_exhaustive() { exhaustive::<6, 0, i8>() }

    #[test]
    fn posit_6_1_exhaustive() { exhaustive::<6, 1, i8>() }

    #[test]
    fn posit_6_2_exhaustive() { exhaustive::<6, 2, i8>() }

    #[test]
    fn posit_6_3_exhaustive() { exhaustive::<6, 3, i16>() }

    #[test]
    fn p8_exhaustive() { exhaustive::<8, 2, i8>() }

    // Exhaustive pairs are out of reach from 16 bits up.
    proptest! {
      #![proptest_config(ProptestConfig::with_cases(crate::PROPTEST_CASES))]

      #[test]
      fn p16_proptest(a in crate::p16::arb_value(), b in crate::p16::arb_value()) {
        prop_assert!(correct(a, b), "{a:?} {} {b:?}", stringify!($op))
      }

      #[test]
      fn p32_proptest(a in crate::p32::arb_value(), b in crate::p32::arb_value()) {
        prop_assert!(correct(a, b), "{a:?} {} {b:?}", stringify!($op))
      }

      #[test]
      fn p64_proptest(a in crate::p64::arb_value(), b in crate::p64::arb_value()) {
        prop_assert!(correct(a, b), "{a:?} {} {b:?}", stringify!($op))
      }

      #[test]
      fn posit_10_1_proptest(
        a in Posit::<10, 1, i16>::arb_value(),
        b in Posit::<10, 1, i16>::arb_value(),
      ) {
        prop_assert!(correct(a, b), "{a:?} {} {b:?}", stringify!($op))
      }

      #[test]
      fn posit_20_4_proptest(
        a in Posit::<20, 4, i32>::arb_value(),
        b in Posit::<20, 4, i32>::arb_value(),
      ) {
        prop_assert!(correct(a, b), "{a:?} {} {b:?}", stringify!($op))
      }
    }
  }
}

#[cfg(test)]
pub(crate) use binop_tests;
