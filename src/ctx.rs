use bitflags::bitflags;

use crate::{dpd::Dpd128, encode::Encoded, ParseError};

/// The numeric context.
///
/// The encoder reads [`precision`][Self::precision], the
/// exponent bounds, the clamp flag, and the NaN payload policy.
/// The rounding mode, trap enablers, and the extended flag are
/// carried for downstream arithmetic and are never consulted
/// here.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Ctx {
    pub(crate) precision: u32,
    pub(crate) max_exp: i32,
    pub(crate) min_exp: i32,
    pub(crate) rounding: RoundingMode,
    pub(crate) traps: Condition,
    /// Conditions raised by [`Ctx::encode`].
    pub status: Condition,
    pub(crate) clamp: bool,
    pub(crate) extended: bool,
    pub(crate) payload: PayloadPolicy,
}

impl Ctx {
    /// Creates the IEEE 754-2008 decimal128 context.
    ///
    /// - precision: 34
    /// - maximum exponent: 6144
    /// - minimum exponent: -6143
    /// - rounding: [`RoundingMode::ToNearestEven`]
    /// - clamp: on
    pub const fn new() -> Self {
        Self {
            precision: Dpd128::DIGITS,
            max_exp: Dpd128::EMAX,
            min_exp: Dpd128::EMIN,
            rounding: RoundingMode::ToNearestEven,
            traps: Condition::DEFAULT_TRAPS,
            status: Condition::empty(),
            clamp: true,
            extended: true,
            payload: PayloadPolicy::Reject,
        }
    }

    /// Sets the working precision.
    ///
    /// The precision is saturated to [1,
    /// [`Dpd128::DIGITS`]].
    pub const fn with_precision(self, digits: u32) -> Self {
        let mut ctx = self;
        ctx.precision = if digits == 0 {
            1
        } else if digits > Dpd128::DIGITS {
            Dpd128::DIGITS
        } else {
            digits
        };
        ctx
    }

    /// Sets the maximum adjusted exponent.
    ///
    /// The exponent is saturated to [0, 6144].
    pub const fn with_max_exp(self, exp: i32) -> Self {
        let mut ctx = self;
        ctx.max_exp = if exp < 0 {
            0
        } else if exp > Dpd128::EMAX {
            Dpd128::EMAX
        } else {
            exp
        };
        ctx
    }

    /// Sets the minimum adjusted exponent.
    ///
    /// The exponent is saturated to [-6143, 0].
    pub const fn with_min_exp(self, exp: i32) -> Self {
        let mut ctx = self;
        ctx.min_exp = if exp > 0 {
            0
        } else if exp < Dpd128::EMIN {
            Dpd128::EMIN
        } else {
            exp
        };
        ctx
    }

    /// Sets the rounding mode.
    pub const fn with_rounding_mode(self, mode: RoundingMode) -> Self {
        let mut ctx = self;
        ctx.rounding = mode;
        ctx
    }

    /// Sets the trap enablers.
    pub const fn with_traps(self, traps: Condition) -> Self {
        let mut ctx = self;
        ctx.traps = traps;
        ctx
    }

    /// Enables or disables the IEEE 754 exponent clamp.
    ///
    /// When enabled, exponents larger than `max_exp -
    /// (precision - 1)` are folded down by padding the
    /// coefficient with zeros.
    pub const fn with_clamp(self, clamp: bool) -> Self {
        let mut ctx = self;
        ctx.clamp = clamp;
        ctx
    }

    /// Enables or disables special values.
    pub const fn with_extended(self, extended: bool) -> Self {
        let mut ctx = self;
        ctx.extended = extended;
        ctx
    }

    /// Sets how NaN payloads that are too long are handled.
    pub const fn with_payload_policy(self, policy: PayloadPolicy) -> Self {
        let mut ctx = self;
        ctx.payload = policy;
        ctx
    }

    /// Returns the working precision.
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns the maximum adjusted exponent.
    pub const fn max_exp(&self) -> i32 {
        self.max_exp
    }

    /// Returns the minimum adjusted exponent.
    pub const fn min_exp(&self) -> i32 {
        self.min_exp
    }

    /// Returns the rounding mode.
    pub const fn rounding_mode(&self) -> RoundingMode {
        self.rounding
    }

    /// Returns the trap enablers.
    pub const fn traps(&self) -> Condition {
        self.traps
    }

    /// Reports whether the IEEE 754 exponent clamp is enabled.
    pub const fn clamp(&self) -> bool {
        self.clamp
    }

    /// Reports whether special values are enabled.
    pub const fn extended(&self) -> bool {
        self.extended
    }

    /// Returns the NaN payload policy.
    pub const fn payload_policy(&self) -> PayloadPolicy {
        self.payload
    }

    /// Returns the precision as an `i32`.
    pub(crate) const fn digits(&self) -> i32 {
        // `precision` is in [1, 34], so the cast cannot wrap.
        #[allow(clippy::cast_possible_wrap)]
        let digits = self.precision as i32;
        digits
    }

    /// The smallest exponent a finite number may have.
    pub(crate) const fn etiny(&self) -> i32 {
        self.min_exp - (self.digits() - 1)
    }

    /// The largest exponent a finite number may have.
    pub(crate) const fn etop(&self) -> i32 {
        let etop = if self.clamp {
            self.max_exp - (self.digits() - 1)
        } else {
            self.max_exp
        };
        if etop > Dpd128::MAX_EXP {
            Dpd128::MAX_EXP
        } else {
            etop
        }
    }

    /// Encodes `s`, accumulating any raised conditions in
    /// [`status`][Self::status].
    pub fn encode(&mut self, s: &str) -> Result<Dpd128, ParseError> {
        let Encoded { value, status } = crate::encode(s, self)?;
        self.status |= status;
        Ok(value)
    }
}

impl Default for Ctx {
    fn default() -> Self {
        Self::new()
    }
}

/// Describes what happens to a NaN payload with more digits
/// than fit in the coefficient continuation (precision - 1).
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub enum PayloadPolicy {
    /// Fail with [`ErrorKind::PayloadTooLong`][crate::ErrorKind::PayloadTooLong].
    #[default]
    Reject,
    /// Keep the least significant digits and raise
    /// [`Condition::CLAMPED`].
    Truncate,
}

/// The rounding mode.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub enum RoundingMode {
    /// IEEE 754-2008 roundTiesToEven.
    ///
    /// - Under 0.5 rounds down.
    /// - Over 0.5 rounds up.
    /// - Exactly 0.5 rounds to the nearest even.
    #[default]
    ToNearestEven,
    /// IEEE 754-2008 roundTiesToAway.
    ///
    /// Like [`ToNearestEven`][Self::ToNearestEven], except that
    /// 0.5 rounds up.
    ToNearestAway,
    /// IEEE 754-2008 roundTowardZero.
    ///
    /// AKA truncation.
    ToZero,
    /// No IEEE 754-2008 equivalent.
    ///
    /// Rounds up if the discarded digits are non-zero.
    AwayFromZero,
    /// IEEE 754-2008 roundTowardNegative.
    ///
    /// AKA floor.
    ToNegativeInf,
    /// IEEE 754-2008 roundTowardPositive.
    ///
    /// AKA ceiling.
    ToPositiveInf,
    /// No IEEE 754-2008 equivalent.
    ///
    /// Like [`ToNearestAway`][Self::ToNearestAway], except that
    /// 0.5 rounds down.
    ToNearestTowardZero,
    /// No IEEE 754-2008 equivalent.
    ///
    /// Rounds away from zero if the last retained digit is 0 or
    /// 5, otherwise truncates.
    ZeroFiveUp,
}

impl RoundingMode {
    /// Parses a rounding mode from its decTest name, e.g.
    /// `half_even`.
    pub fn try_from_str(s: &str) -> Option<Self> {
        let mode = match s {
            "ceiling" => Self::ToPositiveInf,
            "down" => Self::ToZero,
            "floor" => Self::ToNegativeInf,
            "half_down" => Self::ToNearestTowardZero,
            "half_even" => Self::ToNearestEven,
            "half_up" => Self::ToNearestAway,
            "up" => Self::AwayFromZero,
            "05up" => Self::ZeroFiveUp,
            _ => return None,
        };
        Some(mode)
    }
}

/// An exceptional condition raised during or after an operation.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Condition(u32);

bitflags! {
    impl Condition: u32 {
        /// Occurs if the exponent has been modified to fit the
        /// constraints of the decimal representation.
        const CLAMPED = 0x1;
        /// Occurs when a string is converted to a decimal and
        /// does not have a valid syntax.
        const CONVERSION_SYNTAX = 0x2;
        /// Occurs when division is attempted with a finite,
        /// non-zero dividend and a divisor with a value of zero.
        const DIVISION_BY_ZERO = 0x4;
        /// Occurs when the result of integer division would
        /// contain too many digits (i.e. be longer than the
        /// specified precision).
        const DIVISION_IMPOSSIBLE = 0x8;
        /// Occurs when division is attempted with in which both
        /// the divided and divisor are zero.
        const DIVISION_UNDEFINED = 0x10;
        /// Occurs when the result of an operation (e.g. a
        /// conversion) is not exact, or when the
        /// [OVERFLOW][Condition::OVERFLOW] or
        /// [UNDERFLOW][Condition::UNDERFLOW] conditions occur.
        const INEXACT = 0x20;
        /// Occurs when the system doesn't have enough storage
        /// (i.e. memory) to store the result.
        const INSUFFICIENT_STORAGE = 0x40;
        /// Occurs when an invalid context was detected during an
        /// operation.
        const INVALID_CONTEXT = 0x80;
        /// Occurs when an operand is a signaling NaN or an
        /// operation has no defined result.
        const INVALID_OPERATION = 0x100;
        /// Occurs when the adjusted exponent, after rounding,
        /// would be greater than the maximum allowed exponent.
        /// ([INEXACT][Condition::INEXACT] and
        /// [ROUNDED][Condition::ROUNDED] will also be raised.)
        const OVERFLOW = 0x200;
        /// Occurs when the result of an operation is rounded, or
        /// if an [OVERFLOW][Condition::OVERFLOW] or
        /// [UNDERFLOW][Condition::UNDERFLOW] occurs.
        const ROUNDED = 0x400;
        /// Ocurs when the result of a conversion or operation is
        /// subnormal (i.e. the adjusted exponent is less than
        /// the minimum allowed exponent before any rounding).
        const SUBNORMAL = 0x800;
        /// Occurs when the result is inexact and the adjusted
        /// exponent would be smaller (more negative) than the
        /// minimum allowed exponent.
        const UNDERFLOW = 0x1000;
    }
}

impl Condition {
    /// The trap enablers of a new [`Ctx`]: everything except
    /// [INEXACT][Self::INEXACT], [ROUNDED][Self::ROUNDED], and
    /// [SUBNORMAL][Self::SUBNORMAL].
    pub const DEFAULT_TRAPS: Self = Self::all()
        .difference(Self::INEXACT)
        .difference(Self::ROUNDED)
        .difference(Self::SUBNORMAL);
}
