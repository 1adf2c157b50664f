pub(crate) use super::*;

/// Value conversion with posit rounding semantics; the counterpart of
/// [`From`] for conversions that are allowed to round.
///
/// The posit standard prescribes one rounding behaviour for every
/// conversion in and out of a posit format:
///
///   - values beyond the largest finite posit round to it (no overflow to
///     NaR), and non-zero values below the smallest positive posit round to
///     it (no underflow to zero);
///   - everything else rounds to the nearest representable bit pattern,
///     ties to the even pattern.
///
/// [`From`] is reserved, per its contract, for lossless conversions; this
/// trait is the explicit opt-in to the lossy ones. As with `From`/`Into`,
/// implement `RoundFrom` and use [`RoundInto`] in bounds; the blanket impl
/// derives the latter.
///
/// ```
/// # use tapered::*;
/// assert_eq!(p16::round_from(1.0_f64).to_bits(), 0x4000);
/// assert_eq!(p32::round_from(f64::NAN), p32::NAR);
/// assert!(p32::round_from(1e300_f64) == p32::MAX);
/// ```
pub trait RoundFrom<T> {
  /// Convert, rounding per the posit standard if the value is not exactly
  /// representable.
  #[must_use]
  fn round_from(value: T) -> Self;
}

/// The reciprocal of [`RoundFrom`], by blanket implementation; see there.
///
/// ```
/// # use tapered::*;
/// let x: p16 = 2.5_f64.round_into();
/// assert_eq!(x, p16::round_from(2.5_f64));
/// ```
pub trait RoundInto<T> {
  /// Convert, rounding per the posit standard if the value is not exactly
  /// representable.
  #[must_use]
  fn round_into(self) -> T;
}

impl<T, U> RoundInto<U> for T
where
  U: RoundFrom<T>,
{
  fn round_into(self) -> U {
    U::round_from(self)
  }
}

/// Floats, both directions.
mod float;

/// Native integers into posits.
mod int;

/// Between posit formats (resizing, re-exponenting).
mod posit;
