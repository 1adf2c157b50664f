//! C-linkage wrappers over the standard posit types (cargo feature `capi`).
//!
//! Pure marshalling: posits cross the boundary as their raw bit patterns in
//! the matching fixed-width unsigned type, quires are out of scope, and no
//! function here contains any arithmetic of its own.
//!
//! Naming follows the C convention `posit<N>_<op>`.

use crate::{RoundFrom, p8, p16, p32, p64};

macro_rules! c_api {
  ($bits:ty, $posit:ty,
   $add:ident, $sub:ident, $mul:ident, $div:ident, $neg:ident, $sqrt:ident,
   $from_f64:ident, $to_f64:ident, $cmp:ident) => {
    #[unsafe(no_mangle)]
    pub extern "C" fn $add(a: $bits, b: $bits) -> $bits {
      (<$posit>::from_bits_unsigned(a) + <$posit>::from_bits_unsigned(b)).to_bits_unsigned()
    }

    #[unsafe(no_mangle)]
    pub extern "C" fn $sub(a: $bits, b: $bits) -> $bits {
      (<$posit>::from_bits_unsigned(a) - <$posit>::from_bits_unsigned(b)).to_bits_unsigned()
    }

    #[unsafe(no_mangle)]
    pub extern "C" fn $mul(a: $bits, b: $bits) -> $bits {
      (<$posit>::from_bits_unsigned(a) * <$posit>::from_bits_unsigned(b)).to_bits_unsigned()
    }

    #[unsafe(no_mangle)]
    pub extern "C" fn $div(a: $bits, b: $bits) -> $bits {
      (<$posit>::from_bits_unsigned(a) / <$posit>::from_bits_unsigned(b)).to_bits_unsigned()
    }

    #[unsafe(no_mangle)]
    pub extern "C" fn $neg(a: $bits) -> $bits {
      (-<$posit>::from_bits_unsigned(a)).to_bits_unsigned()
    }

    #[unsafe(no_mangle)]
    pub extern "C" fn $sqrt(a: $bits) -> $bits {
      <$posit>::from_bits_unsigned(a).sqrt().to_bits_unsigned()
    }

    #[unsafe(no_mangle)]
    pub extern "C" fn $from_f64(value: f64) -> $bits {
      <$posit>::round_from(value).to_bits_unsigned()
    }

    #[unsafe(no_mangle)]
    pub extern "C" fn $to_f64(a: $bits) -> f64 {
      f64::round_from(<$posit>::from_bits_unsigned(a))
    }

    /// Total-order comparison: -1, 0 or +1 (NaR sorts below everything).
    #[unsafe(no_mangle)]
    pub extern "C" fn $cmp(a: $bits, b: $bits) -> i32 {
      let (a, b) = (<$posit>::from_bits_unsigned(a), <$posit>::from_bits_unsigned(b));
      match a.cmp(&b) {
        core::cmp::Ordering::Less => -1,
        core::cmp::Ordering::Equal => 0,
        core::cmp::Ordering::Greater => 1,
      }
    }
  }
}

c_api! {u8, p8,
  posit8_add, posit8_sub, posit8_mul, posit8_div, posit8_neg, posit8_sqrt,
  posit8_from_f64, posit8_to_f64, posit8_cmp}

c_api! {u16, p16,
  posit16_add, posit16_sub, posit16_mul, posit16_div, posit16_neg, posit16_sqrt,
  posit16_from_f64, posit16_to_f64, posit16_cmp}

c_api! {u32, p32,
  posit32_add, posit32_sub, posit32_mul, posit32_div, posit32_neg, posit32_sqrt,
  posit32_from_f64, posit32_to_f64, posit32_cmp}

c_api! {u64, p64,
  posit64_add, posit64_sub, posit64_mul, posit64_div, posit64_neg, posit64_sqrt,
  posit64_from_f64, posit64_to_f64, posit64_cmp}
