#![cfg(test)]

use std::{
    ffi::{c_char, CStr, CString},
    fmt,
};

use decnumber_sys::{
    decContext, decContextDefault, decQuad, decQuadFromString, decQuadToString,
    DEC_INIT_DECIMAL128,
};

use crate::{ctx::Condition, dpd::Dpd128};

fn ctx128() -> decContext {
    let mut ctx = decContext {
        digits: 0,
        emax: 0,
        emin: 0,
        round: 0,
        traps: 0,
        status: 0,
        clamp: 0,
    };
    // SAFETY: `ctx` is a valid, exclusive pointer.
    unsafe { decContextDefault(&mut ctx, DEC_INIT_DECIMAL128) };
    ctx
}

/// Status flags from decContext.h.
const STATUS: [(u32, Condition); 13] = [
    (0x0000_0001, Condition::CONVERSION_SYNTAX),
    (0x0000_0002, Condition::DIVISION_BY_ZERO),
    (0x0000_0004, Condition::DIVISION_IMPOSSIBLE),
    (0x0000_0008, Condition::DIVISION_UNDEFINED),
    (0x0000_0010, Condition::INSUFFICIENT_STORAGE),
    (0x0000_0020, Condition::INEXACT),
    (0x0000_0040, Condition::INVALID_CONTEXT),
    (0x0000_0080, Condition::INVALID_OPERATION),
    (0x0000_0200, Condition::OVERFLOW),
    (0x0000_0400, Condition::CLAMPED),
    (0x0000_0800, Condition::ROUNDED),
    (0x0000_1000, Condition::SUBNORMAL),
    (0x0000_2000, Condition::UNDERFLOW),
];

fn condition(status: u32) -> Condition {
    STATUS
        .iter()
        .filter(|(flag, _)| status & flag != 0)
        .fold(Condition::empty(), |acc, (_, c)| acc | *c)
}

/// A decNumber decimal128.
#[derive(Copy, Clone, Debug)]
pub struct Quad(decQuad);

impl Quad {
    /// The conditions `decQuadFromString` can raise.
    ///
    /// decNumber's decFloat layer does not report `Clamped`,
    /// `Rounded`, or `Subnormal`.
    pub const REPORTED: Condition = Condition::CONVERSION_SYNTAX
        .union(Condition::INEXACT)
        .union(Condition::OVERFLOW)
        .union(Condition::UNDERFLOW);

    /// Parses `s` in the decimal128 context, returning the
    /// result and the raised conditions.
    pub fn parse(s: &str) -> (Self, Condition) {
        let s = CString::new(s).unwrap();
        let mut d = decQuad { bytes: [0u8; 16] };
        let mut ctx = ctx128();
        // SAFETY: `s` is NUL terminated and `d` and `ctx` are
        // valid, exclusive pointers.
        unsafe { decQuadFromString(&mut d, s.as_ptr(), &mut ctx) };
        (Self(d), condition(ctx.status))
    }

    pub const fn to_ne_bytes(self) -> [u8; 16] {
        self.0.bytes
    }

    pub const fn to_bits(self) -> u128 {
        u128::from_ne_bytes(self.to_ne_bytes())
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // DECQUAD_String is 43.
        let mut buf = [0u8; 48];
        // SAFETY: `buf` is large enough for any decQuad.
        let ptr = unsafe { decQuadToString(&self.0, buf.as_mut_ptr().cast::<c_char>()) };
        // SAFETY: `decQuadToString` NUL terminates `buf`.
        let s = unsafe { CStr::from_ptr(ptr) };
        s.to_string_lossy().fmt(f)
    }
}

impl PartialEq<Quad> for Dpd128 {
    fn eq(&self, other: &Quad) -> bool {
        self.to_ne_bytes() == other.to_ne_bytes()
    }
}

impl PartialEq<Dpd128> for Quad {
    fn eq(&self, other: &Dpd128) -> bool {
        self.to_ne_bytes() == other.to_ne_bytes()
    }
}
