use core::{
    fmt,
    mem::size_of,
    str::FromStr,
};

use super::{coeff::Coefficient, tables::COMB_FROM};
use crate::{conv::ParseError, ctx::Ctx, util::const_assert};

/// A 128-bit decimal floating point number in the IEEE 754-2008
/// decimal128 interchange format with a densely packed decimal
/// coefficient.
///
/// (–1)^sign * coefficient * 10^exp
///
/// The value is stored as four 32-bit words, least significant
/// word first. Word [`HIGH_WORD`][Self::HIGH_WORD] holds the
/// sign, the combination field, the exponent continuation, and
/// the most significant declet.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Dpd128(
    /// # Layout
    ///
    /// ## Bits (of the 128-bit value)
    ///
    /// 127: sign
    /// 122-126: combination
    /// 110-121: exponent continuation
    /// 0-109: coefficient continuation (11 declets)
    [u32; 4],
);
const_assert!(size_of::<Dpd128>() == 128 / 8);

// Internal stuff.
impl Dpd128 {
    /// The bias added to the encoded exponent in order to
    /// convert it to the "actual" exponent.
    const BIAS: i32 = 6176;
    /// The maxmimum value of the encoded exponent.
    const LIMIT: u32 = 12287;

    const SIGN_MASK: u32 = 0x8000_0000;

    const COMB_SHIFT: u32 = 32 - 1 - 5;
    const COMB_MASK: u32 = 0x1f << Self::COMB_SHIFT;

    const ECON_SHIFT: u32 = 32 - 1 - 5 - 12;
    const ECON_MASK: u32 = 0xfff << Self::ECON_SHIFT;

    /// The high word of an infinity: combination `11110`.
    const INF_WORD: u32 = 0x7800_0000;
    /// The high word of a quiet NaN: combination `11111`.
    const QNAN_WORD: u32 = 0x7c00_0000;
    /// The high word of a signaling NaN: combination `11111`
    /// and the first exponent continuation bit set.
    const SNAN_WORD: u32 = 0x7e00_0000;

    /// Mask for the coefficient continuation bits in the high
    /// word.
    const HIGH_COEFF_MASK: u32 = (1 << Self::ECON_SHIFT) - 1;

    const fn high(self) -> u32 {
        self.0[Self::HIGH_WORD]
    }

    const fn signbit(self) -> bool {
        (self.high() & Self::SIGN_MASK) != 0
    }

    /// Returns the combination field.
    const fn comb(self) -> Comb {
        let comb = (self.high() & Self::COMB_MASK) >> Self::COMB_SHIFT;
        Comb(comb as u8)
    }

    /// Returns the exponent continuation field.
    ///
    /// The result is always in [0, 4095].
    const fn econ(self) -> u32 {
        (self.high() & Self::ECON_MASK) >> Self::ECON_SHIFT
    }

    /// Returns the biased exponent.
    ///
    /// If the number is finite, the result is in [0,
    /// [`LIMIT`][Self::LIMIT]].
    /// The bits are read as-is for infinities and NaNs.
    const fn exp(self) -> u32 {
        let msb = self.comb().msb() as u32;
        let exp = (msb << 12) | self.econ();
        debug_assert!(!self.is_finite() || exp <= Self::LIMIT);
        exp
    }

    /// Packs the declets of `coeff` below the `high` bits.
    ///
    /// `high` holds the sign, combination field, and exponent
    /// continuation.
    fn pack(high: u32, coeff: &Coefficient) -> Self {
        debug_assert!(high & Self::HIGH_COEFF_MASK == 0);

        let mut words = [0u32; 4];
        if let Some(w) = words.get_mut(Self::HIGH_WORD) {
            *w = high;
        }
        for n in 0..Coefficient::DECLETS {
            let dpd = u32::from(coeff.declet(n));
            // Declet `n` occupies bits [10n, 10n+10) of the
            // 128-bit value.
            let bit = n * 10;
            let (idx, shift) = (bit / 32, (bit % 32) as u32);
            if let Some(w) = words.get_mut(idx) {
                *w |= dpd << shift;
            }
            if shift > 32 - 10 {
                // Straddles a word boundary.
                if let Some(w) = words.get_mut(idx + 1) {
                    *w |= dpd >> (32 - shift);
                }
            }
        }
        Self(words)
    }

    /// Encodes a finite number.
    ///
    /// `exp` must be in [[`MIN_EXP`][Self::MIN_EXP],
    /// [`MAX_EXP`][Self::MAX_EXP]] and `coeff` must have at
    /// most [`DIGITS`][Self::DIGITS] digits.
    pub(crate) fn from_parts(sign: bool, exp: i32, coeff: &Coefficient) -> Self {
        debug_assert!(exp >= Self::MIN_EXP);
        debug_assert!(exp <= Self::MAX_EXP);
        debug_assert!(coeff.len() <= Self::DIGITS as usize);

        // `exp` >= MIN_EXP = -BIAS, so the sum is never
        // negative.
        let biased = (exp + Self::BIAS).unsigned_abs();
        let msb = biased >> 12;
        let msd = u32::from(coeff.msd());
        debug_assert!(msb <= 2);

        let mut high = COMB_FROM
            .get(((msb << 4) | msd) as usize)
            .copied()
            .unwrap_or(0);
        high |= (biased << Self::ECON_SHIFT) & Self::ECON_MASK;
        if sign {
            high |= Self::SIGN_MASK;
        }
        Self::pack(high, coeff)
    }

    /// Creates a quiet NaN with the given payload.
    pub(crate) fn nan_with_payload(sign: bool, payload: &Coefficient) -> Self {
        Self::special_with_payload(Self::QNAN_WORD, sign, payload)
    }

    /// Creates a signaling NaN with the given payload.
    pub(crate) fn snan_with_payload(sign: bool, payload: &Coefficient) -> Self {
        Self::special_with_payload(Self::SNAN_WORD, sign, payload)
    }

    fn special_with_payload(word: u32, sign: bool, payload: &Coefficient) -> Self {
        // The MSD cannot be encoded for specials.
        debug_assert!(payload.len() < Self::DIGITS as usize);

        let high = if sign { word | Self::SIGN_MASK } else { word };
        Self::pack(high, payload)
    }

    const fn from_high(word: u32, sign: bool) -> Self {
        let high = if sign { word | Self::SIGN_MASK } else { word };
        Self([0, 0, 0, high])
    }

    /// Creates a quiet NaN.
    pub(crate) const fn nan(sign: bool) -> Self {
        Self::from_high(Self::QNAN_WORD, sign)
    }

    /// Creates a signaling NaN.
    pub(crate) const fn snan(sign: bool) -> Self {
        Self::from_high(Self::SNAN_WORD, sign)
    }

    /// Creates an infinity.
    pub(crate) const fn inf(sign: bool) -> Self {
        Self::from_high(Self::INF_WORD, sign)
    }
}

// Public stuff.
impl Dpd128 {
    /// The index of the word holding the sign, combination
    /// field, and exponent continuation.
    pub const HIGH_WORD: usize = 3;

    /// The number of base 10 significant digits.
    pub const DIGITS: u32 = 34;

    /// The maximum adjusted exponent.
    pub const EMAX: i32 = 6144;

    /// The minimum adjusted exponent.
    pub const EMIN: i32 = -6143;

    /// The maximum allowed exponent.
    #[allow(clippy::cast_possible_wrap)]
    pub const MAX_EXP: i32 = Self::EMAX - Self::DIGITS as i32 + 1;

    /// The smallest allowed exponent.
    #[allow(clippy::cast_possible_wrap)]
    pub const MIN_EXP: i32 = Self::EMIN - Self::DIGITS as i32 + 1;

    /// Not a Number (NaN).
    pub const NAN: Self = Self::nan(false);

    /// Infinity (∞).
    pub const INFINITY: Self = Self::inf(false);

    /// Negative infinity (−∞).
    pub const NEG_INFINITY: Self = Self::inf(true);

    /// Reports whether the number is neither infinite nor NaN.
    pub const fn is_finite(self) -> bool {
        self.comb().is_finite()
    }

    /// Reports whether the number is either positive or negative
    /// infinity.
    pub const fn is_infinite(self) -> bool {
        self.comb().is_infinite()
    }

    /// Reports whether the number is a NaN.
    pub const fn is_nan(self) -> bool {
        self.comb().is_nan()
    }

    /// Reports whether the number is a quiet NaN.
    pub const fn is_qnan(self) -> bool {
        // When the number is a NaN, the first exponent
        // continuation bit signals whether the NaN is signaling.
        self.is_nan() && self.econ() >> 11 == 0
    }

    /// Reports whether the number is a signaling NaN.
    pub const fn is_snan(self) -> bool {
        // When the number is a NaN, the first exponent
        // continuation bit signals whether the NaN is signaling.
        self.is_nan() && self.econ() >> 11 == 1
    }

    /// Reports whether the number is `-0.0` or `+0.0`.
    pub const fn is_zero(self) -> bool {
        let [w0, w1, w2, _] = self.0;
        self.is_finite()
            && self.comb().msd() == 0
            && (self.high() & Self::HIGH_COEFF_MASK) == 0
            && (w0 | w1 | w2) == 0
    }

    /// Reports whether the number is positive, including `+0.0`.
    pub const fn is_sign_positive(self) -> bool {
        !self.is_sign_negative()
    }

    /// Reports whether the number is negative, including `-0.0`.
    pub const fn is_sign_negative(self) -> bool {
        self.signbit()
    }

    /// Returns the unbiased exponent.
    ///
    /// The result is only meaningful for finite numbers, where
    /// it is in [[`MIN_EXP`][Self::MIN_EXP],
    /// [`MAX_EXP`][Self::MAX_EXP]].
    pub const fn unbiased_exp(self) -> i32 {
        // `self.exp()` fits in 14 bits, so the cast cannot
        // wrap.
        #[allow(clippy::cast_possible_wrap)]
        let exp = self.exp() as i32;
        exp - Self::BIAS
    }

    /// Returns the most significant digit of the coefficient,
    /// which is stored in the combination field.
    ///
    /// The result is only meaningful for finite numbers.
    pub const fn msd(self) -> u8 {
        self.comb().msd()
    }
}

// To/from reprs.
impl Dpd128 {
    /// Creates a `Dpd128` from its 32-bit words, least
    /// significant first.
    pub const fn from_words(words: [u32; 4]) -> Self {
        Self(words)
    }

    /// Returns the 32-bit words, least significant first.
    pub const fn to_words(self) -> [u32; 4] {
        self.0
    }

    /// Returns the word holding the sign, combination field,
    /// and exponent continuation.
    pub const fn high_word(self) -> u32 {
        self.high()
    }

    /// Creates a `Dpd128` from its raw bits.
    ///
    /// ```rust
    /// use decquad::Dpd128;
    ///
    /// let got = Dpd128::from_bits(0x2207c0000000000000000000000000a5);
    /// let want: Dpd128 = "12.5".parse().unwrap();
    /// assert_eq!(got, want);
    /// ```
    pub const fn from_bits(bits: u128) -> Self {
        Self([
            bits as u32,
            (bits >> 32) as u32,
            (bits >> 64) as u32,
            (bits >> 96) as u32,
        ])
    }

    /// Raw transmutation to `u128`.
    pub const fn to_bits(self) -> u128 {
        let [w0, w1, w2, w3] = self.0;
        (w0 as u128) | ((w1 as u128) << 32) | ((w2 as u128) << 64) | ((w3 as u128) << 96)
    }

    /// Creates a `Dpd128` from a little-endian byte array.
    pub const fn from_le_bytes(bytes: [u8; 16]) -> Self {
        Self::from_bits(u128::from_le_bytes(bytes))
    }

    /// Creates a `Dpd128` from a big-endian byte array.
    pub const fn from_be_bytes(bytes: [u8; 16]) -> Self {
        Self::from_bits(u128::from_be_bytes(bytes))
    }

    /// Creates a `Dpd128` from a native-endian byte array.
    pub const fn from_ne_bytes(bytes: [u8; 16]) -> Self {
        Self::from_bits(u128::from_ne_bytes(bytes))
    }

    /// Converts the `Dpd128` to a little-endian byte array.
    pub const fn to_le_bytes(self) -> [u8; 16] {
        self.to_bits().to_le_bytes()
    }

    /// Converts the `Dpd128` to a big-endian byte array.
    ///
    /// This is the byte order of the IEEE 754 interchange
    /// format.
    pub const fn to_be_bytes(self) -> [u8; 16] {
        self.to_bits().to_be_bytes()
    }

    /// Converts the `Dpd128` to a native-endian byte array.
    pub const fn to_ne_bytes(self) -> [u8; 16] {
        self.to_bits().to_ne_bytes()
    }
}

// String conversions.
impl Dpd128 {
    /// Parses a decimal from a string using the default
    /// decimal128 context.
    ///
    /// Any conditions raised while fitting the number into a
    /// decimal128 are discarded. Use [`encode`][crate::encode]
    /// to see them.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        crate::encode(s, &Ctx::new()).map(|enc| enc.value)
    }
}

impl FromStr for Dpd128 {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dpd128::parse(s)
    }
}

impl fmt::Binary for Dpd128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.to_bits(), f)
    }
}

impl fmt::LowerHex for Dpd128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.to_bits(), f)
    }
}

impl fmt::UpperHex for Dpd128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.to_bits(), f)
    }
}

impl fmt::Debug for Dpd128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ">> ")?;
        for word in self.0.iter().rev() {
            write!(f, "{word:08x} ")?;
        }
        let sign = u8::from(self.signbit());
        let cb = self.comb().0;
        let ec = self.econ();
        write!(f, " [S:{sign} Cb:{cb:02x} Ec:{ec:03x}]")
    }
}

/// The combination field.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Comb(
    /// ```text
    /// | Field     | Type     | Exp | Coeff   |
    /// | --------- | -------- | --- | ------- |
    /// | a b c d e | Finite   | a b | 0 c d e |
    /// | 1 1 c d e | Finite   | c d | 1 0 0 e |
    /// | 1 1 1 1 0 | Infinity | - - | - - - - |
    /// | 1 1 1 1 1 | NaN      | - - | - - - - |
    /// ```
    u8,
);

impl Comb {
    const AB: u8 = 0b11000; // ab...
    const CD: u8 = 0b00110; // ..cd.
    const E_: u8 = 0b00001; // ....e

    const fn is_finite(self) -> bool {
        !self.is_special()
    }

    const fn is_infinite(self) -> bool {
        // When the first (top) four bits of the combination
        // field are set, the number is either an infinity or
        // a NaN. The fifth bit signals NaN.
        self.0 & 0x1f == 0x1e
    }

    const fn is_nan(self) -> bool {
        self.0 & 0x1f == 0x1f
    }

    const fn is_special(self) -> bool {
        self.0 & 0x1e == 0x1e
    }

    /// Returns the encoded MSD.
    ///
    /// If the number is finite, the result is in [0, 9].
    const fn msd(self) -> u8 {
        match self.0 & Self::AB {
            Self::AB => 0x8 | (self.0 & Self::E_), // 100e
            _ => self.0 & (Self::CD | Self::E_),   // 0cde
        }
    }

    /// Returns the encoded two MSB for the exponent.
    ///
    /// If the number is finite, the result is always in [0, 2].
    const fn msb(self) -> u8 {
        // self = abcde
        match self.0 & Self::AB {
            // If bits `ab` are both set, then the MSBs are
            // encoded in bits `cd`. Otherwise, the MSBs are
            // encoded in `ab`.
            Self::AB => (self.0 & Self::CD) >> 1,
            b => b >> 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(Dpd128::MAX_EXP, 6111);
        assert_eq!(Dpd128::MIN_EXP, -6176);
        assert_eq!(Dpd128::MIN_EXP, -Dpd128::BIAS);
        assert_eq!(Dpd128::MAX_EXP + Dpd128::BIAS, Dpd128::LIMIT as i32);

        assert_eq!(Dpd128::INFINITY.to_words(), [0, 0, 0, 0x7800_0000]);
        assert_eq!(Dpd128::NEG_INFINITY.to_words(), [0, 0, 0, 0xf800_0000]);
        assert_eq!(Dpd128::NAN.to_words(), [0, 0, 0, 0x7c00_0000]);
        assert_eq!(Dpd128::snan(true).to_words(), [0, 0, 0, 0xfe00_0000]);
    }

    #[test]
    fn test_classify() {
        let tests = [
            // (value, finite, infinite, nan, snan, negative)
            (Dpd128::INFINITY, false, true, false, false, false),
            (Dpd128::NEG_INFINITY, false, true, false, false, true),
            (Dpd128::NAN, false, false, true, false, false),
            (Dpd128::nan(true), false, false, true, false, true),
            (Dpd128::snan(false), false, false, true, true, false),
            (Dpd128::from_bits(0x2208 << 112), true, false, false, false, false),
        ];
        for (i, (d, finite, infinite, nan, snan, neg)) in tests.into_iter().enumerate() {
            assert_eq!(d.is_finite(), finite, "#{i}: {d:?}");
            assert_eq!(d.is_infinite(), infinite, "#{i}: {d:?}");
            assert_eq!(d.is_nan(), nan, "#{i}: {d:?}");
            assert_eq!(d.is_snan(), snan, "#{i}: {d:?}");
            assert_eq!(d.is_qnan(), nan && !snan, "#{i}: {d:?}");
            assert_eq!(d.is_sign_negative(), neg, "#{i}: {d:?}");
            assert_eq!(d.is_sign_positive(), !neg, "#{i}: {d:?}");
        }
    }

    #[test]
    fn test_from_parts() {
        let tests: &[(bool, i32, &[u8], u128)] = &[
            (false, 0, &[0], 0x22080000000000000000000000000000),
            (true, 0, &[0], 0xa2080000000000000000000000000000),
            (false, -2, &[1, 2, 3, 4, 5], 0x220780000000000000000000000049c5),
            (true, -2, &[7, 5, 0], 0xa20780000000000000000000000003d0),
            (false, 3, &[8], 0x2208c000000000000000000000000008),
            (false, 0, &[9; 34], 0x6e080ff3fcff3fcff3fcff3fcff3fcff),
            (
                false,
                0,
                &[
                    1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2, 3, 4, 5, 6,
                    7, 8, 9, 0, 1, 2, 3, 4,
                ],
                0x2608134b9c1e28e56f3c127177823534,
            ),
            (false, Dpd128::MIN_EXP, &[1], 0x00000000000000000000000000000001),
            (false, Dpd128::MAX_EXP, &[9; 34], 0x77ffcff3fcff3fcff3fcff3fcff3fcff),
        ];
        for (i, &(sign, exp, digits, want)) in tests.iter().enumerate() {
            let coeff = Coefficient::from_digits(digits).unwrap();
            let got = Dpd128::from_parts(sign, exp, &coeff);
            let want = Dpd128::from_bits(want);
            assert_eq!(got, want, "#{i}: {got:?} != {want:?}");

            assert!(got.is_finite(), "#{i}");
            assert_eq!(got.is_sign_negative(), sign, "#{i}");
            assert_eq!(got.unbiased_exp(), exp, "#{i}");
            let msd = if digits.len() == 34 { digits[0] } else { 0 };
            assert_eq!(got.msd(), msd, "#{i}");
        }
    }

    #[test]
    fn test_exp_round_trip() {
        let coeff = Coefficient::from_digits(&[1]).unwrap();
        for exp in Dpd128::MIN_EXP..=Dpd128::MAX_EXP {
            let d = Dpd128::from_parts(false, exp, &coeff);
            assert_eq!(d.unbiased_exp(), exp, "#{exp}: {d:?}");
            assert!(!d.is_zero(), "#{exp}");
        }
    }

    #[test]
    fn test_fields_of_specials() {
        // The field readers do not check the class.
        for d in [Dpd128::NAN, Dpd128::snan(true), Dpd128::INFINITY, Dpd128::NEG_INFINITY] {
            assert!(!d.is_finite(), "{d:?}");
            let exp = d.unbiased_exp();
            assert!(exp > Dpd128::MAX_EXP, "{d:?}: {exp}");
            assert!(d.msd() <= 9, "{d:?}");
        }
    }

    #[test]
    fn test_nan_payload() {
        let payload = Coefficient::from_digits(&[1, 2, 3]).unwrap();
        let got = Dpd128::nan_with_payload(false, &payload);
        assert_eq!(got.to_bits(), 0x7c0000000000000000000000000000a3);
        assert!(got.is_qnan());

        let payload = Coefficient::from_digits(&[9, 8, 7, 6, 5, 4, 3, 2, 1]).unwrap();
        let got = Dpd128::snan_with_payload(false, &payload);
        assert_eq!(got.to_bits(), 0x7e000000000000000000000038fd51a1);
        assert!(got.is_snan());

        let payload = Coefficient::from_digits(&[9; 33]).unwrap();
        let got = Dpd128::nan_with_payload(false, &payload);
        assert_eq!(got.to_bits(), 0x7c000ff3fcff3fcff3fcff3fcff3fcff);

        let got = Dpd128::nan_with_payload(true, &Coefficient::new());
        assert_eq!(got, Dpd128::nan(true));
    }

    #[test]
    fn test_is_zero() {
        assert!(Dpd128::from_bits(0x22080000000000000000000000000000).is_zero());
        assert!(Dpd128::from_bits(0xa2080000000000000000000000000000).is_zero());
        assert!(Dpd128::from_bits(0).is_zero());
        assert!(!Dpd128::from_bits(1).is_zero());
        assert!(!Dpd128::from_bits(0x22080000000000000000000000000400).is_zero());
        // MSD of 8.
        assert!(!Dpd128::from_bits(0x62080000000000000000000000000000).is_zero());
        assert!(!Dpd128::INFINITY.is_zero());
        assert!(!Dpd128::NAN.is_zero());
    }

    #[test]
    fn test_bytes() {
        let d = Dpd128::from_bits(0x220780000000000000000000000049c5);
        assert_eq!(d.to_words(), [0x000049c5, 0, 0, 0x22078000]);
        assert_eq!(d.high_word(), 0x22078000);

        let be = d.to_be_bytes();
        assert_eq!(&be[..4], &[0x22, 0x07, 0x80, 0x00]);
        assert_eq!(&be[12..], &[0x00, 0x00, 0x49, 0xc5]);
        assert_eq!(Dpd128::from_be_bytes(be), d);

        let le = d.to_le_bytes();
        assert_eq!(&le[..4], &[0xc5, 0x49, 0x00, 0x00]);
        assert_eq!(Dpd128::from_le_bytes(le), d);

        assert_eq!(Dpd128::from_ne_bytes(d.to_ne_bytes()), d);
        assert_eq!(Dpd128::from_words(d.to_words()), d);
    }

    #[test]
    fn test_fmt() {
        let d = Dpd128::from_bits(0x220780000000000000000000000049c5);
        assert_eq!(
            format!("{d:?}"),
            ">> 22078000 00000000 00000000 000049c5  [S:0 Cb:08 Ec:81e]"
        );
        assert_eq!(format!("{d:x}"), "220780000000000000000000000049c5");
        assert_eq!(format!("{d:X}"), "220780000000000000000000000049C5");
        assert_eq!(format!("{:b}", Dpd128::from_bits(5)), "101");
    }
}
