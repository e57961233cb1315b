//! Lexing of decimal literals.
//!
//! ```text
//! sign?  ( digits ( '.' digits? )? | '.' digits )  ( ('e'|'E') sign? digits )?
//! sign?  ( "inf" | "infinity" | "nan" digits? | "snan" digits? )
//! ```
//!
//! Special names are matched without regard to ASCII case.

use core::str::FromStr;

use crate::{
    conv::{equal_fold_ascii, ParseError},
    dpd::Coefficient,
};

/// The kind of number a [`Literal`] denotes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Category {
    /// A finite number.
    Finite,
    /// Positive or negative infinity.
    Infinity,
    /// A quiet NaN.
    QuietNaN,
    /// A signaling NaN.
    SignalingNaN,
}

/// A lexed decimal literal.
///
/// The coefficient holds the significant digits of the literal
/// without leading zeros. A zero coefficient is a single `0`.
/// For NaNs the coefficient holds the payload, which is empty if
/// the literal did not have one.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Literal {
    sign: bool,
    category: Category,
    coeff: Coefficient,
    exp: i32,
    exp_overflow: bool,
    /// The net exponent computed from every exponent digit,
    /// saturating at `i32::MAX` for the exponent part.
    exact_exp: i64,
}

impl Literal {
    /// The exponent magnitude recorded when the exponent part
    /// has more than [`MAX_EXP_DIGITS`][Self::MAX_EXP_DIGITS]
    /// significant digits.
    pub const EXP_SENTINEL: i32 = 6144;

    /// The maximum number of significant exponent digits.
    pub const MAX_EXP_DIGITS: usize = 4;

    const fn new() -> Self {
        Self {
            sign: false,
            category: Category::Finite,
            coeff: Coefficient::new(),
            exp: 0,
            exp_overflow: false,
            exact_exp: 0,
        }
    }

    /// Reports whether the literal is negative.
    pub const fn sign(&self) -> bool {
        self.sign
    }

    /// Returns the kind of number.
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Returns the coefficient.
    pub const fn coefficient(&self) -> &Coefficient {
        &self.coeff
    }

    /// Returns the coefficient digits, most significant first.
    pub fn digits(&self) -> &[u8] {
        self.coeff.digits()
    }

    /// Returns the net exponent: the exponent part minus the
    /// number of digits after the point.
    ///
    /// Always zero for infinities and NaNs.
    pub const fn exponent(&self) -> i32 {
        self.exp
    }

    /// Reports whether the exponent part had too many digits and
    /// was replaced by [`EXP_SENTINEL`][Self::EXP_SENTINEL].
    pub const fn exponent_overflow(&self) -> bool {
        self.exp_overflow
    }

    /// Returns the net exponent without the sentinel
    /// substitution.
    ///
    /// Equal to [`exponent`][Self::exponent] unless
    /// [`exponent_overflow`][Self::exponent_overflow] is set.
    pub(crate) const fn exact_exponent(&self) -> i64 {
        self.exact_exp
    }

    /// Returns the NaN payload digits, or `None` if the literal
    /// is not a NaN or has no payload.
    pub fn payload(&self) -> Option<&[u8]> {
        match self.category {
            Category::QuietNaN | Category::SignalingNaN if !self.coeff.is_empty() => {
                Some(self.coeff.digits())
            }
            _ => None,
        }
    }
}

impl FromStr for Literal {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Lexes a decimal literal.
///
/// # Example
///
/// ```rust
/// use decquad::literal::{self, Category};
///
/// let lit = literal::parse("-123.45e+2").unwrap();
/// assert!(lit.sign());
/// assert_eq!(lit.category(), Category::Finite);
/// assert_eq!(lit.digits(), &[1, 2, 3, 4, 5]);
/// assert_eq!(lit.exponent(), 0);
/// ```
pub fn parse(text: &str) -> Result<Literal, ParseError> {
    let input = text.as_bytes();
    if input.is_empty() {
        return Err(ParseError::empty());
    }

    let mut lit = Literal::new();
    let mut s = input;
    if let Some((&c @ (b'-' | b'+'), rest)) = s.split_first() {
        lit.sign = c == b'-';
        s = rest;
    }

    match s.first() {
        Some(c) if c.is_ascii_digit() || *c == b'.' => {}
        Some(c) if c.is_ascii_alphabetic() => {
            parse_special(&mut lit, input, s)?;
            log::trace!("parse({text:?}) -> {lit:?}");
            return Ok(lit);
        }
        _ => return Err(invalid(input, s)),
    }

    let (int_digits, mut s) = lex_digits(&mut lit.coeff, s)?;
    let mut frac_digits = 0;
    if let Some((b'.', rest)) = s.split_first() {
        (frac_digits, s) = lex_digits(&mut lit.coeff, rest)?;
    }
    if int_digits == 0 && frac_digits == 0 {
        // A lone point.
        return Err(invalid(input, s));
    }
    if lit.coeff.is_empty() {
        // Every digit was a leading zero.
        lit.coeff.push(0)?;
    }

    let mut exp = 0i32;
    let mut exact = 0i32;
    if let Some((b'e' | b'E', rest)) = s.split_first() {
        s = rest;
        let mut negative = false;
        if let Some((&c @ (b'-' | b'+'), rest)) = s.split_first() {
            negative = c == b'-';
            s = rest;
        }
        let mut ndigits = 0;
        let mut sig = 0;
        while let Some((&c, rest)) = s.split_first() {
            if !c.is_ascii_digit() {
                break;
            }
            let d = i32::from(c - b'0');
            if sig > 0 || d != 0 {
                sig += 1;
                if sig <= Literal::MAX_EXP_DIGITS {
                    exp = exp * 10 + d;
                }
                exact = exact.saturating_mul(10).saturating_add(d);
            }
            ndigits += 1;
            s = rest;
        }
        if ndigits == 0 {
            return Err(invalid(input, s));
        }
        if sig > Literal::MAX_EXP_DIGITS {
            exp = Literal::EXP_SENTINEL;
            lit.exp_overflow = true;
        }
        if negative {
            exp = -exp;
            exact = -exact;
        }
    }
    if !s.is_empty() {
        return Err(invalid(input, s));
    }

    let frac = i32::try_from(frac_digits).unwrap_or(i32::MAX);
    lit.exp = exp.saturating_sub(frac);
    lit.exact_exp = i64::from(exact) - i64::from(frac);

    log::trace!("parse({text:?}) -> {lit:?}");
    Ok(lit)
}

/// Lexes "inf", "infinity", "nan", and "snan" with an optional
/// payload.
fn parse_special(lit: &mut Literal, input: &[u8], s: &[u8]) -> Result<(), ParseError> {
    if equal_fold_ascii(s, b"inf") || equal_fold_ascii(s, b"infinity") {
        lit.category = Category::Infinity;
        return Ok(());
    }

    let (category, payload) = match s.split_first_chunk::<4>() {
        Some((word, rest)) if equal_fold_ascii(word, b"snan") => (Category::SignalingNaN, rest),
        _ => match s.split_first_chunk::<3>() {
            Some((word, rest)) if equal_fold_ascii(word, b"nan") => (Category::QuietNaN, rest),
            _ => return Err(invalid(input, s)),
        },
    };
    lit.category = category;

    let (_, rest) = lex_digits(&mut lit.coeff, payload)?;
    if !rest.is_empty() {
        return Err(invalid(input, rest));
    }
    Ok(())
}

/// Appends the leading ASCII digits of `s` to `coeff`, skipping
/// zeros while `coeff` is empty.
///
/// It returns the number of digits consumed and the rest of
/// `s`.
fn lex_digits<'a>(
    coeff: &mut Coefficient,
    mut s: &'a [u8],
) -> Result<(usize, &'a [u8]), ParseError> {
    let mut n = 0;
    while let Some((&c, rest)) = s.split_first() {
        if !c.is_ascii_digit() {
            break;
        }
        let d = c - b'0';
        if d != 0 || !coeff.is_empty() {
            coeff.push(d)?;
        }
        n += 1;
        s = rest;
    }
    Ok((n, s))
}

/// Returns a syntax error at the start of `rest`, which must be
/// a suffix of `input`.
fn invalid(input: &[u8], rest: &[u8]) -> ParseError {
    debug_assert!(rest.len() <= input.len());

    ParseError::invalid(input.len() - rest.len(), rest.first().copied())
}
