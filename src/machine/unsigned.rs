use super::Unsigned;

macro_rules! impl_unsigned {
  ($uint:ty) => {
    impl Unsigned for $uint {
      #[inline]
      fn shifted_sqrt(self, precision: u32) -> (Self, bool) {
        // Widen to 128 bits so the shift cannot lose anything: the widest
        // caller shifts a 64-bit significand by at most 63 places.
        debug_assert!(precision < 64 && Self::BITS as u32 + precision <= 128);
        let wide = (self as u128) << precision;
        let root = wide.isqrt();
        (root as $uint, root * root != wide)
      }
    }
  }
}

impl_unsigned! {u8}
impl_unsigned! {u16}
impl_unsigned! {u32}
impl_unsigned! {u64}
