//! The coefficient buffer.

use core::fmt;

use super::{bcd, tables::BCD_TO_DPD};
use crate::{conv::ParseError, util};

/// A fixed-size buffer of decimal digits, most significant
/// first.
///
/// The buffer holds more digits than a decimal128 can store so
/// that the parser can accept literals longer than the working
/// precision. Slots past [`len`][Self::len] are never read.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Coefficient {
    digits: [u8; Self::CAPACITY],
    len: usize,
}

impl Coefficient {
    /// The maximum number of digits in the buffer.
    pub const CAPACITY: usize = 64;

    /// The number of 10-bit declets in a decimal128's
    /// coefficient continuation.
    pub const DECLETS: usize = 11;

    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self {
            digits: [0; Self::CAPACITY],
            len: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_digits(digits: &[u8]) -> Result<Self, ParseError> {
        let mut coeff = Self::new();
        for &d in digits {
            coeff.push(d)?;
        }
        Ok(coeff)
    }

    /// Appends a digit in [0, 9].
    pub(crate) fn push(&mut self, d: u8) -> Result<(), ParseError> {
        debug_assert!(d <= 9);

        let slot = self
            .digits
            .get_mut(self.len)
            .ok_or(ParseError::too_long())?;
        *slot = d;
        self.len += 1;
        Ok(())
    }

    /// Returns the number of digits in the buffer.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Reports whether the buffer is empty.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the index of the least significant digit, or
    /// `None` if the buffer is empty.
    pub const fn lsd(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    /// Returns the digits, most significant first.
    pub fn digits(&self) -> &[u8] {
        let digits = self.digits.get(..self.len).unwrap_or_default();
        util::debug_assert_all_digits(digits);
        digits
    }

    /// Reports whether every digit is zero.
    pub fn is_zero(&self) -> bool {
        self.digits().iter().all(|&d| d == 0)
    }

    /// Removes the `n` least significant digits.
    ///
    /// If every digit is removed the buffer is left holding a
    /// single zero.
    ///
    /// It reports whether any removed digit was non-zero.
    pub(crate) fn truncate(&mut self, n: usize) -> bool {
        let keep = self.len.saturating_sub(n);
        let inexact = self
            .digits
            .get(keep..self.len)
            .unwrap_or_default()
            .iter()
            .any(|&d| d != 0);
        if keep == 0 {
            self.len = 0;
            // Cannot fail: the buffer is empty.
            let _ = self.push(0);
        } else {
            self.len = keep;
        }
        inexact
    }

    /// Appends `n` zeros.
    ///
    /// The caller must ensure that the zeros fit.
    pub(crate) fn pad(&mut self, n: usize) {
        debug_assert!(self.len + n <= Self::CAPACITY);

        let end = (self.len + n).min(Self::CAPACITY);
        if let Some(slots) = self.digits.get_mut(self.len..end) {
            slots.fill(0);
        }
        self.len = end;
    }

    /// Keeps only the `n` least significant digits.
    pub(crate) fn keep_low(&mut self, n: usize) {
        let start = self.len.saturating_sub(n);
        self.digits.copy_within(start..self.len, 0);
        self.len -= start;
    }

    /// Returns the digit to the left of the [`DECLETS`]
    /// declets, or zero if there is no such digit.
    ///
    /// This is the 34th digit from the right. Any digits to its
    /// left are ignored.
    ///
    /// [`DECLETS`]: Self::DECLETS
    pub fn msd(&self) -> u8 {
        self.len
            .checked_sub(Self::DECLETS * 3 + 1)
            .and_then(|i| self.digits.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Returns the `n`th declet, counting from the least
    /// significant.
    ///
    /// The declet packs the three digit slots starting at `lsd
    /// - 3n - 2`. Slots before the first digit read as zero, so
    /// a partial window encodes the same as one with explicit
    /// leading zeros.
    pub fn declet(&self, n: usize) -> u16 {
        // One past the last slot in the window.
        let end = match self.len.checked_sub(3 * n) {
            Some(end) if end > 0 => end,
            _ => return 0,
        };
        let start = end.saturating_sub(3);

        let mut window = [0u8; 3];
        let digits = self.digits.get(start..end).unwrap_or_default();
        let pad = window.len() - digits.len();
        if let Some(slots) = window.get_mut(pad..) {
            slots.copy_from_slice(digits);
        }
        let [hi, mid, lo] = window;

        let bcd = bcd::from_digits(hi, mid, lo);
        BCD_TO_DPD.get(usize::from(bcd)).copied().unwrap_or(0)
    }
}

impl Default for Coefficient {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "[]");
        }
        for d in self.digits() {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}
