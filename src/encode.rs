//! Conversion of decimal literals to [`Dpd128`].

use crate::{
    conv::ParseError,
    ctx::{Condition, Ctx, PayloadPolicy},
    dpd::{Coefficient, Dpd128},
    literal::{self, Category, Literal},
};

/// The result of [`encode`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Encoded {
    /// The encoded number.
    pub value: Dpd128,
    /// The conditions raised while fitting the literal into the
    /// context.
    pub status: Condition,
}

impl Encoded {
    const fn exact(value: Dpd128) -> Self {
        Self {
            value,
            status: Condition::empty(),
        }
    }
}

/// Converts a decimal literal to a decimal128.
///
/// Literals that do not fit `ctx` are truncated toward zero,
/// clamped, overflow to infinity, or underflow to zero. The
/// returned [`status`][Encoded::status] reports which of these
/// happened.
///
/// # Example
///
/// ```rust
/// use decquad::{encode, Condition, Ctx};
///
/// let enc = encode("123.45", &Ctx::new()).unwrap();
/// assert_eq!(enc.value.to_bits(), 0x2207_8000_0000_0000_0000_0000_0000_49c5);
/// assert!(enc.status.is_empty());
///
/// let enc = encode("1E99999", &Ctx::new()).unwrap();
/// assert!(enc.value.is_infinite());
/// assert!(enc.status.contains(Condition::OVERFLOW));
/// ```
pub fn encode(s: &str, ctx: &Ctx) -> Result<Encoded, ParseError> {
    let lit = literal::parse(s)?;
    let enc = match lit.category() {
        Category::Finite => finalize(&lit, ctx),
        Category::Infinity => Encoded::exact(Dpd128::inf(lit.sign())),
        Category::QuietNaN | Category::SignalingNaN => encode_nan(&lit, ctx)?,
    };
    log::trace!("encode({s:?}) -> {:?} {:?}", enc.value, enc.status);
    Ok(enc)
}

/// Encodes a NaN and its payload.
fn encode_nan(lit: &Literal, ctx: &Ctx) -> Result<Encoded, ParseError> {
    let sign = lit.sign();
    let snan = lit.category() == Category::SignalingNaN;
    if lit.payload().is_none() {
        let value = if snan {
            Dpd128::snan(sign)
        } else {
            Dpd128::nan(sign)
        };
        return Ok(Encoded::exact(value));
    }

    let mut status = Condition::empty();
    let mut payload = *lit.coefficient();
    // The payload cannot use the digit in the combination field.
    let limit = ctx.precision().saturating_sub(1) as usize;
    if payload.len() > limit {
        match ctx.payload_policy() {
            PayloadPolicy::Reject => return Err(ParseError::payload_too_long()),
            PayloadPolicy::Truncate => {
                log::debug!("truncating NaN payload of {} digits", payload.len());
                payload.keep_low(limit);
                status |= Condition::CLAMPED;
            }
        }
    }
    let value = if snan {
        Dpd128::snan_with_payload(sign, &payload)
    } else {
        Dpd128::nan_with_payload(sign, &payload)
    };
    Ok(Encoded { value, status })
}

/// Bounds the exponent of a literal before it is fitted into
/// the context.
///
/// It is far enough outside of every context's limits that it
/// always overflows or underflows, yet small enough that the
/// exponent arithmetic cannot wrap.
const EXP_LIMIT: i32 = 1 << 20;

/// Fits a finite literal into the context.
fn finalize(lit: &Literal, ctx: &Ctx) -> Encoded {
    let sign = lit.sign();
    let mut coeff = *lit.coefficient();
    // The exact exponent keeps every exponent digit, so huge
    // exponent parts still net out against the fraction digits.
    let mut exp = clamp_exp(lit.exact_exponent());
    let mut status = Condition::empty();

    let digits = ctx.digits();
    let excess = ndigits(&coeff) - digits;
    if excess > 0 {
        log::trace!("dropping {excess} digits");
        if coeff.truncate(excess.unsigned_abs() as usize) {
            status |= Condition::INEXACT;
        }
        status |= Condition::ROUNDED;
        exp += excess;
    }

    let etiny = ctx.etiny();
    let etop = ctx.etop();

    if coeff.is_zero() {
        let clamped = exp.clamp(etiny, etop);
        if clamped != exp {
            status |= Condition::CLAMPED;
        }
        return Encoded {
            value: Dpd128::from_parts(sign, clamped, &coeff),
            status,
        };
    }

    let adj = exp + ndigits(&coeff) - 1;
    if adj > ctx.max_exp() {
        log::debug!("overflow: adjusted exponent {adj} > {}", ctx.max_exp());
        status |= Condition::OVERFLOW | Condition::INEXACT | Condition::ROUNDED;
        return Encoded {
            value: Dpd128::inf(sign),
            status,
        };
    }

    if exp > etop {
        // Fold down: trade exponent for trailing zeros.
        let pad = exp - etop;
        log::trace!("folding down {pad} digits");
        coeff.pad(pad.unsigned_abs() as usize);
        exp = etop;
        status |= Condition::CLAMPED;
    }

    if adj < ctx.min_exp() {
        status |= Condition::SUBNORMAL;
        if exp < etiny {
            let drop = etiny - exp;
            log::debug!("underflow: dropping {drop} digits");
            if coeff.truncate(drop.unsigned_abs() as usize) {
                status |= Condition::INEXACT | Condition::UNDERFLOW;
            }
            status |= Condition::ROUNDED;
            exp = etiny;
            if coeff.is_zero() {
                status |= Condition::CLAMPED;
            }
        }
    }

    Encoded {
        value: Dpd128::from_parts(sign, exp, &coeff),
        status,
    }
}

/// Limits `exp` to [-`EXP_LIMIT`, `EXP_LIMIT`].
fn clamp_exp(exp: i64) -> i32 {
    let exp = exp.clamp(i64::from(-EXP_LIMIT), i64::from(EXP_LIMIT));
    // In [-2^20, 2^20], so the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation)]
    let exp = exp as i32;
    exp
}

/// Returns the number of digits in `coeff` as an `i32`.
fn ndigits(coeff: &Coefficient) -> i32 {
    // At most `Coefficient::CAPACITY` digits, so the cast
    // cannot wrap.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let n = coeff.len() as i32;
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conv::ErrorKind;

    const NONE: Condition = Condition::empty();

    fn enc(s: &str, ctx: &Ctx) -> Encoded {
        encode(s, ctx).unwrap_or_else(|err| panic!("{s}: {err}"))
    }

    #[test]
    fn test_encode_exact() {
        let ctx = Ctx::new();
        let tests = [
            ("0", 0x2208_0000_0000_0000_0000_0000_0000_0000),
            ("-0", 0xa208_0000_0000_0000_0000_0000_0000_0000),
            ("1", 0x2208_0000_0000_0000_0000_0000_0000_0001),
            ("123.45", 0x2207_8000_0000_0000_0000_0000_0000_49c5),
            ("-7.50", 0xa207_8000_0000_0000_0000_0000_0000_03d0),
            ("12.5", 0x2207_c000_0000_0000_0000_0000_0000_00a5),
            ("0.001", 0x2207_4000_0000_0000_0000_0000_0000_0001),
            ("1000", 0x2208_0000_0000_0000_0000_0000_0000_0400),
            ("8E3", 0x2208_c000_0000_0000_0000_0000_0000_0008),
            ("999", 0x2208_0000_0000_0000_0000_0000_0000_00ff),
            (
                "9999999999999999999999999999999999",
                0x6e08_0ff3_fcff_3fcf_f3fc_ff3f_cff3_fcff,
            ),
            (
                "1234567890123456789012345678901234",
                0x2608_134b_9c1e_28e5_6f3c_1271_7782_3534,
            ),
            (
                "9.999999999999999999999999999999999E+6144",
                0x77ff_cff3_fcff_3fcf_f3fc_ff3f_cff3_fcff,
            ),
            ("0E-6176", 0),
            ("inf", 0x7800_0000_0000_0000_0000_0000_0000_0000),
            ("-Infinity", 0xf800_0000_0000_0000_0000_0000_0000_0000),
            ("nan", 0x7c00_0000_0000_0000_0000_0000_0000_0000),
            ("-snan", 0xfe00_0000_0000_0000_0000_0000_0000_0000),
            ("nan123", 0x7c00_0000_0000_0000_0000_0000_0000_00a3),
            ("snan987654321", 0x7e00_0000_0000_0000_0000_0000_38fd_51a1),
            (
                "nan999999999999999999999999999999999",
                0x7c00_0ff3_fcff_3fcf_f3fc_ff3f_cff3_fcff,
            ),
        ];
        for (i, (s, want)) in tests.into_iter().enumerate() {
            let got = enc(s, &ctx);
            assert_eq!(
                got.value.to_bits(),
                want,
                "#{i}: {s}: {:032x} != {want:032x}",
                got.value
            );
            assert_eq!(got.status, NONE, "#{i}: {s}");
        }
    }

    #[test]
    fn test_encode_status() {
        use Condition as C;

        let ctx = Ctx::new();
        let tests = [
            // Truncated to 34 digits.
            (
                "12345678901234567890123456789012345",
                0x2608_534b_9c1e_28e5_6f3c_1271_7782_3534,
                C::INEXACT | C::ROUNDED,
            ),
            (
                "12345678901234567890123456789012340",
                0x2608_534b_9c1e_28e5_6f3c_1271_7782_3534,
                C::ROUNDED,
            ),
            // Fold down.
            ("1E6144", 0x47ff_c000_0000_0000_0000_0000_0000_0000, C::CLAMPED),
            // Overflow.
            (
                "1E6145",
                0x7800_0000_0000_0000_0000_0000_0000_0000,
                C::OVERFLOW | C::INEXACT | C::ROUNDED,
            ),
            (
                "-1E99999",
                0xf800_0000_0000_0000_0000_0000_0000_0000,
                C::OVERFLOW | C::INEXACT | C::ROUNDED,
            ),
            // Zeros are clamped.
            ("0E+9999", 0x43ff_c000_0000_0000_0000_0000_0000_0000, C::CLAMPED),
            ("0E-9999", 0, C::CLAMPED),
            ("0E99999", 0x43ff_c000_0000_0000_0000_0000_0000_0000, C::CLAMPED),
            // Subnormals.
            ("1E-6176", 1, C::SUBNORMAL),
            (
                "1E-6177",
                0,
                C::SUBNORMAL | C::UNDERFLOW | C::INEXACT | C::ROUNDED | C::CLAMPED,
            ),
            ("10E-6177", 1, C::SUBNORMAL | C::ROUNDED),
            (
                "1E-99999",
                0,
                C::SUBNORMAL | C::UNDERFLOW | C::INEXACT | C::ROUNDED | C::CLAMPED,
            ),
        ];
        for (i, (s, want, status)) in tests.into_iter().enumerate() {
            let got = enc(s, &ctx);
            assert_eq!(
                got.value.to_bits(),
                want,
                "#{i}: {s}: {:032x} != {want:032x}",
                got.value
            );
            assert_eq!(got.status, status, "#{i}: {s}");
        }

        // Exponent parts too long for the sentinel still net out
        // against the fraction digits.
        let zeros = "0".repeat(20000);
        let tests = [
            (
                format!("0.{zeros}1E10000"),
                0,
                C::SUBNORMAL | C::UNDERFLOW | C::INEXACT | C::ROUNDED | C::CLAMPED,
            ),
            (
                format!("-0.{zeros}5E+12345"),
                0x8000_0000_0000_0000_0000_0000_0000_0000,
                C::SUBNORMAL | C::UNDERFLOW | C::INEXACT | C::ROUNDED | C::CLAMPED,
            ),
            (
                format!("0.{}1E10000", "0".repeat(7000)),
                0x40f5_c000_0000_0000_0000_0000_0000_0001,
                NONE,
            ),
        ];
        for (i, (s, want, status)) in tests.iter().enumerate() {
            let got = enc(s, &ctx);
            assert_eq!(got.value.to_bits(), *want, "#{i}: {:032x}", got.value);
            assert_eq!(got.status, *status, "#{i}");
        }
    }

    #[test]
    fn test_encode_precision() {
        let ctx = Ctx::new().with_precision(7);
        let got = enc("123456789", &ctx);
        assert_eq!(got.value, enc("1234567E2", &Ctx::new()).value);
        assert_eq!(got.status, Condition::INEXACT | Condition::ROUNDED);

        // The top exponent depends on the precision when
        // clamping.
        let ctx = Ctx::new()
            .with_precision(7)
            .with_max_exp(96)
            .with_min_exp(-95)
            .with_clamp(true);
        let got = enc("1E96", &ctx);
        assert_eq!(got.value, enc("1000000E90", &Ctx::new()).value);
        assert_eq!(got.status, Condition::CLAMPED);
        let got = enc("1E97", &ctx);
        assert!(got.value.is_infinite());

        let got = enc("1E-101", &ctx);
        assert_eq!(got.value, enc("1E-101", &Ctx::new()).value);
        assert_eq!(got.status, Condition::SUBNORMAL);
        let got = enc("1E-102", &ctx);
        assert!(got.value.is_zero());
        assert_eq!(got.value.unbiased_exp(), -101);
    }

    #[test]
    fn test_encode_payload_policy() {
        let long = format!("nan{}", "7".repeat(34));

        let err = encode(&long, &Ctx::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PayloadTooLong);

        let ctx = Ctx::new().with_payload_policy(PayloadPolicy::Truncate);
        let got = enc(&long, &ctx);
        let want = enc(&format!("nan{}", "7".repeat(33)), &Ctx::new());
        assert_eq!(got.value, want.value);
        assert_eq!(got.status, Condition::CLAMPED);
        assert!(got.value.is_qnan());

        // The limit follows the precision.
        let ctx = Ctx::new().with_precision(7);
        assert!(encode("snan123456", &ctx).is_ok());
        let err = encode("snan1234567", &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PayloadTooLong);
    }

    #[test]
    fn test_encode_errors() {
        let ctx = Ctx::new();
        assert_eq!(encode("", &ctx).unwrap_err().kind(), ErrorKind::Empty);
        assert_eq!(
            encode("1.2.3", &ctx).unwrap_err().kind(),
            ErrorKind::Invalid {
                pos: 3,
                byte: Some(b'.')
            }
        );
        let long = "1".repeat(65);
        assert_eq!(
            encode(&long, &ctx).unwrap_err().kind(),
            ErrorKind::CoefficientTooLong
        );
    }

    #[test]
    fn test_encode_leading_zeros() {
        let ctx = Ctx::new();
        let tests = [("0001", "1"), ("00.50", ".50"), ("-000", "-0"), ("0.0", "0E-1")];
        for (i, (a, b)) in tests.into_iter().enumerate() {
            assert_eq!(enc(a, &ctx), enc(b, &ctx), "#{i}: {a} != {b}");
        }
    }

    #[test]
    fn test_ctx_encode_accumulates() {
        let mut ctx = Ctx::new();
        let v = ctx.encode("1E6144").unwrap();
        assert_eq!(ctx.status, Condition::CLAMPED);
        assert!(v.is_finite());
        ctx.encode("1E-6177").unwrap();
        assert!(ctx.status.contains(Condition::CLAMPED | Condition::UNDERFLOW));
        assert!(ctx.encode("x").is_err());
    }
}
