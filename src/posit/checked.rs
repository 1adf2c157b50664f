use super::*;

/// Why a checked arithmetic operation refused to produce a number.
///
/// The operator surface (`+`, `/`, [`Posit::sqrt`], …) never fails: invalid
/// operations quietly produce [`NaR`](Posit::NAR), which then propagates.
/// The `checked_*` methods report the same conditions as values of this type
/// instead, for callers that want to catch the moment arithmetic goes wrong
/// rather than test for NaR at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArithmeticError {
  /// An input was already NaR.
  OperandIsNar,
  /// Division had a NaR numerator.
  NumeratorIsNar,
  /// Division by exact zero.
  DivideByZero,
  /// Square root of a negative number.
  NegativeSqrtArgument,
}

impl core::fmt::Display for ArithmeticError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(match self {
      Self::OperandIsNar => "operand is NaR",
      Self::NumeratorIsNar => "numerator is NaR",
      Self::DivideByZero => "division by zero",
      Self::NegativeSqrtArgument => "square root of a negative number",
    })
  }
}

impl core::error::Error for ArithmeticError {}

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> Posit<N, ES, Int> {
  /// As `self + other`, but a NaR operand is an error instead of a silent
  /// NaR result.
  pub fn checked_add(self, other: Self) -> Result<Self, ArithmeticError> {
    if self == Self::NAR || other == Self::NAR {
      Err(ArithmeticError::OperandIsNar)
    } else {
      Ok(self.add(other))
    }
  }

  /// As `self - other`, with the error behaviour of [`Self::checked_add`].
  pub fn checked_sub(self, other: Self) -> Result<Self, ArithmeticError> {
    self.checked_add(-other)
  }

  /// As `self * other`, but a NaR operand is an error.
  pub fn checked_mul(self, other: Self) -> Result<Self, ArithmeticError> {
    if self == Self::NAR || other == Self::NAR {
      Err(ArithmeticError::OperandIsNar)
    } else {
      Ok(self.mul(other))
    }
  }

  /// As `self / other`, but the NaR-producing cases are errors:
  ///
  /// ```
  /// # use tapered::*;
  /// assert_eq!(p16::ONE.checked_div(p16::ZERO), Err(ArithmeticError::DivideByZero));
  /// assert_eq!((p16::ONE / p16::ZERO), p16::NAR);
  /// ```
  pub fn checked_div(self, other: Self) -> Result<Self, ArithmeticError> {
    if other == Self::NAR {
      Err(ArithmeticError::OperandIsNar)
    } else if self == Self::NAR {
      Err(ArithmeticError::NumeratorIsNar)
    } else if other == Self::ZERO {
      Err(ArithmeticError::DivideByZero)
    } else {
      Ok(self.div(other))
    }
  }

  /// As [`Self::sqrt`], but NaR and negative arguments are errors.
  pub fn checked_sqrt(self) -> Result<Self, ArithmeticError> {
    if self == Self::NAR {
      Err(ArithmeticError::OperandIsNar)
    } else if self < Self::ZERO {
      Err(ArithmeticError::NegativeSqrtArgument)
    } else {
      Ok(self.sqrt())
    }
  }
}
