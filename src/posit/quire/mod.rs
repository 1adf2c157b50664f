pub(crate) use super::*;

/// The *quire* for the `(N, ES)` posit format: a fixed-point two's
/// complement accumulator `SIZE` bytes wide, in which sums and dot products
/// of posits are computed with **no intermediate rounding at all**.
///
/// Adding a posit, or the product of two posits, into a quire is exact;
/// information is lost only at the single, final [`to_posit`](Self::to_posit)
/// readout. A sum of ten thousand products therefore rounds *once*, where
/// the posit-by-posit computation would have rounded twenty thousand times;
/// and the answer is bit-reproducible on every platform.
///
/// `SIZE` is bounded below by [`MIN_SIZE`](Self::MIN_SIZE), the width that
/// makes every single product exactly representable; bytes beyond that are
/// carry guard, buying headroom for more terms (see
/// [`SUM_HEADROOM`](Self::SUM_HEADROOM) and
/// [`PROD_HEADROOM`](Self::PROD_HEADROOM)). The standard sizes (the
/// [`q8`](crate::q8)…[`q64`](crate::q64) aliases) carry roughly 30 bits of
/// guard, good for over a billion terms.
///
/// If accumulation ever does escape the guard bits, the quire collapses to
/// [NaR](Self::NAR); the `checked_*` methods report
/// [`QuireError::CapacityExceeded`] instead of collapsing.
///
/// ```
/// # use tapered::*;
/// let mut q = q16::ZERO;
/// q.add_prod(p16::round_from(0.1_f64), p16::round_from(0.1_f64));
/// q -= p16::round_from(0.01_f64);
/// // One rounding, at the very end. (In p16, 0.1² lands a hair *below*
/// // 0.01, and the quire still sees the difference.)
/// assert!(q.to_posit::<i16>() < p16::ZERO);
/// ```
//
// Storage is a little-endian byte array, operated on as little-endian u64
// words; the fixed point sits `FRAC_BITS` bits from the bottom. Alignment
// and the SIZE-multiple-of-8 restriction make the word view free.
#[repr(C, align(8))]
#[derive(Clone, PartialEq, Eq)]
pub struct Quire<
  const N: u32,
  const ES: u32,
  const SIZE: usize,
> (pub(crate) [u8; SIZE]);

/// Why a checked quire operation refused to proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuireError {
  /// A posit operand (or the quire itself) was already NaR.
  OperandIsNar,
  /// The accumulated magnitude outran the carry-guard bits.
  CapacityExceeded,
}

impl core::fmt::Display for QuireError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(match self {
      Self::OperandIsNar => "operand is NaR",
      Self::CapacityExceeded => "quire capacity exceeded",
    })
  }
}

impl core::error::Error for QuireError {}

/// Sizing constants, special values, raw byte access.
mod basics;

/// The fixed-point accumulation kernel.
mod accumulate;

/// The posit-facing operation surface (`+=`, `-=`, `add_prod`, …).
mod ops;

/// Conversions: posit → quire, and the single rounding quire → posit.
mod convert;
