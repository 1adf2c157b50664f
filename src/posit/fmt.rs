use super::*;

use crate::RoundFrom;
use core::fmt;

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> fmt::Debug for Posit<N, ES, Int> {
  /// The raw pattern, junk bits split off when the storage is wider than
  /// the format: `Posit(0b0000000000_011010)`.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if const { Self::JUNK_BITS == 0 } {
      let bits = self.0;
      f.debug_tuple("Posit")
        .field(&format_args!("0b{bits:0w$b}", w = Int::BITS as usize))
        .finish()
    } else {
      let junk = (self.0 >> Self::BITS).mask_lsb(Self::JUNK_BITS);
      let bits = self.0.mask_lsb(Self::BITS);
      f.debug_tuple("Posit")
        .field(&format_args!(
          "0b{junk:0jw$b}_{bits:0bw$b}",
          jw = Self::JUNK_BITS as usize,
          bw = Self::BITS as usize,
        ))
        .finish()
    }
  }
}

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> fmt::Debug for Unpacked<N, ES, Int> {
  /// Significand with the hidden pair split off, scale split into
  /// regime/exponent: `Unpacked { frac: 0b01_10110…, exp: 0b…01_10 (+6) }`.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let hidden = self.frac.lshr(Int::BITS - 2);
    let fraction = (self.frac << 2).lshr(2);
    let regime = self.exp >> ES;
    let exponent = if const { ES == 0 } { Int::ZERO } else { self.exp.mask_lsb(ES) };
    let exp = self.exp;
    f.debug_struct("Unpacked")
      .field("frac", &format_args!("0b{hidden:02b}_{fraction:0w$b}", w = Int::BITS as usize - 2))
      .field("exp", &format_args!(
        "0b{regime:0rw$b}_{exponent:0ew$b} ({exp:+})",
        rw = (Int::BITS - ES) as usize,
        ew = ES as usize,
      ))
      .finish()
  }
}

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> fmt::Display for Posit<N, ES, Int> {
  /// The numeric value, via the (possibly rounded) double conversion; NaR
  /// prints as the distinguished token `NaR`, never as a number.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if *self == Self::NAR {
      f.write_str("NaR")
    } else {
      fmt::Display::fmt(&f64::round_from(*self), f)
    }
  }
}

/// The four encoding fields of a posit pattern, pulled apart for diagnostic
/// display; see [`Posit::fields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields {
  /// Sign bit.
  pub sign: bool,
  /// Regime value `k` (the scale contribution is `k × 2^ES`).
  pub regime: i32,
  /// Exponent field, zero-filled if truncated by the regime.
  pub exponent: u32,
  /// Fraction bits, msb-aligned… to the *low* end: the stored fraction as
  /// an integer, `fraction_bits` wide.
  pub fraction: u64,
  /// How many fraction bits the pattern actually stores.
  pub fraction_bits: u32,
}

impl fmt::Display for Fields {
  /// `s:0 k:+1 e:2 f:0b0110/10` style (fraction shown over its width).
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "s:{} k:{:+} e:{} f:0b{:0w$b}/{}",
      self.sign as u8,
      self.regime,
      self.exponent,
      self.fraction,
      self.fraction_bits,
      w = self.fraction_bits.max(1) as usize,
    )
  }
}

impl<
  const N: u32,
  const ES: u32,
  Int: crate::Int,
> Posit<N, ES, Int> {
  /// The decoded sign/regime/exponent/fraction fields of a *regular* value,
  /// for diagnostics; `None` for 0 and NaR, which have no fields.
  ///
  /// ```
  /// # use tapered::*;
  /// let fields = p8::from_bits(0b0110_1101).fields().unwrap();
  /// assert_eq!((fields.regime, fields.exponent, fields.fraction), (1, 3, 1));
  /// ```
  pub fn fields(self) -> Option<Fields> {
    if self.is_special() {
      return None;
    }

    // Work on the two's complement magnitude, msb-aligned; this is the
    // plain rendition of the decode algorithm, fields read left to right.
    let sign = self.0 < Int::ZERO;
    let magnitude = (self.0 << Self::JUNK_BITS).wrapping_abs();

    let after_sign = magnitude << 1;
    let run = if after_sign.is_positive() {
      // Run of zeros, regime -run.
      after_sign.leading_zeros().min(Self::BITS - 1)
    } else {
      (!after_sign).leading_zeros().min(Self::BITS - 1)
    };
    let regime = if after_sign.is_positive() { -(run as i32) } else { run as i32 - 1 };

    // Whatever remains after sign, run, and terminator (when present).
    let consumed = (1 + run + 1).min(Self::BITS);
    let remaining = Self::BITS - consumed;
    let tail = (after_sign << run) << 1;

    let exponent = if const { ES == 0 } {
      0
    } else {
      // The logical shift keeps exactly the ES field bits.
      tail.lshr(Int::BITS - ES).as_u32()
    };
    let fraction_bits = remaining.saturating_sub(ES);
    let fraction = if fraction_bits == 0 {
      0
    } else {
      let f: i128 = (tail << ES).lshr(Int::BITS - fraction_bits).into();
      f as u64
    };

    Some(Fields { sign, regime, exponent, fraction, fraction_bits })
  }
}
