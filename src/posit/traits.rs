use super::*;

// Everything here is a plain forward to the stored integer: the bit pattern
// of a posit, read as two's complement, already compares exactly like the
// value it encodes (NaR sorting below everything as the most negative
// pattern, which is also what makes NaR == NaR hold, unlike IEEE NaN).
//
// Hand-written rather than derived so the impls bound on `Int: crate::Int`
// alone instead of the extra per-trait bounds a derive would emit.

impl<const N: u32, const ES: u32, Int: crate::Int>
Clone for Posit<N, ES, Int> {
  #[inline]
  fn clone(&self) -> Self {
    *self
  }
}

impl<const N: u32, const ES: u32, Int: crate::Int>
Copy for Posit<N, ES, Int> {}

impl<const N: u32, const ES: u32, Int: crate::Int>
PartialEq for Posit<N, ES, Int> {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.0 == other.0
  }
}

impl<const N: u32, const ES: u32, Int: crate::Int>
Eq for Posit<N, ES, Int> {}

impl<const N: u32, const ES: u32, Int: crate::Int>
PartialOrd for Posit<N, ES, Int> {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
    Some(self.cmp(other))
  }
}

impl<const N: u32, const ES: u32, Int: crate::Int>
Ord for Posit<N, ES, Int> {
  #[inline]
  fn cmp(&self, other: &Self) -> core::cmp::Ordering {
    self.0.cmp(&other.0)
  }
}

impl<const N: u32, const ES: u32, Int: crate::Int>
core::hash::Hash for Posit<N, ES, Int> {
  #[inline]
  fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
    self.0.hash(state)
  }
}

impl<const N: u32, const ES: u32, Int: crate::Int>
Default for Posit<N, ES, Int> {
  /// Zero, as for the built-in numeric types.
  #[inline]
  fn default() -> Self {
    Self::ZERO
  }
}
