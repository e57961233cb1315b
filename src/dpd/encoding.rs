//! Bit-level densely packed decimal conversions.
//!
//! These run at compile time to build [`BCD_TO_DPD`]. The
//! encoder itself only ever does table lookups.
//!
//! [`BCD_TO_DPD`]: super::tables::BCD_TO_DPD

use super::bcd::{self, Pattern};

/// Packs a 12-bit BCD into a 10-bit DPD.
pub(super) const fn pack(mut bcd: u16) -> u16 {
    // (abcd)(efgh)(ijkm) becomes (pqr)(stu)(v)(wxy)

    // | aei | pqr stu v wxy   comments
    // | --- | ------------- | ----------------------|
    // | 000 | bcd fgh 0 jkm | All digits are small  |
    // | 001 | bcd fgh 1 00m | Right digit is large  |
    // | 010 | bcd jkh 1 01m | Middle digit is large |
    // | 100 | jkd fgh 1 10m | Left digit is large   |
    // | 110 | jkd 00h 1 11m | Right digit is small  |
    // | 101 | fgd 01h 1 11m | Middle digit is small |
    // | 011 | bcd 10h 1 11m | Left digit is small   |
    // | 111 | 00d 11h 1 11m | All digits are large  |

    // BCDs only use the lower 12 bits.
    bcd &= 0x0fff;

    use Pattern::*;
    match bcd::classify(bcd) {
        AllSmall => {
            // .... abcd efgh ijkm
            // .... ..bc dfgh 0jkm
            ((bcd & 0x700) >> 1) | (bcd & 0x77)
        }
        RightLarge => {
            // .... abcd efgh ijkm
            // .... ..bc dfgh 100m
            ((bcd & 0x700) >> 1) | (bcd & 0x70) | 0x8 | (bcd & 0x1)
        }
        MiddleLarge => {
            // .... abcd efgh ijkm
            // .... ..bc djkh 101m
            ((bcd & 0x700) >> 1) | ((bcd & 0x6) << 4) | (bcd & 0x10) | 0xa | (bcd & 0x1)
        }
        LeftLarge => {
            // .... abcd efgh ijkm
            // .... ..jk dfgh 110m
            ((bcd & 0x6) << 7) | ((bcd & 0x100) >> 1) | (bcd & 0x70) | 0xc | (bcd & 0x1)
        }
        RightSmall => {
            // .... abcd efgh ijkm
            // .... ..jk d00h 111m
            ((bcd & 0x6) << 7) | ((bcd & 0x100) >> 1) | (bcd & 0x11) | 0xe
        }
        MiddleSmall => {
            // .... abcd efgh ijkm
            // .... ..fg d01h 111m
            ((bcd & 0x60) << 3) | ((bcd & 0x100) >> 1) | (bcd & 0x11) | 0x2e
        }
        LeftSmall => {
            // .... abcd efgh ijkm
            // .... ..bc d10h 111m
            ((bcd & 0x700) >> 1) | (bcd & 0x11) | 0x4e
        }
        AllLarge => {
            // .... abcd efgh ijkm
            // .... ..00 d11h 111m
            ((bcd & 0x100) >> 1) | (bcd & 0x11) | 0x6e
        }
    }
}

/// Classifies a DPD for unpacking into a BCD.
#[cfg(test)]
const fn classify_dpd(dpd: u16) -> Pattern {
    use Pattern::*;

    // Match bit `v`.
    if dpd & 0x8 == 0 {
        return AllSmall;
    }

    // Match bits `vwx`.
    match dpd & 0xe {
        0x8 => return RightLarge,
        0xa => return MiddleLarge,
        0xc => return LeftLarge,
        _ => {}
    }

    // Match bits `st`.
    match dpd & 0x60 {
        0x00 => RightSmall,
        0x20 => MiddleSmall,
        0x40 => LeftSmall,
        _ => AllLarge,
    }
}

/// Unpacks a DPD into a BCD.
///
/// Only used to check [`pack`]; decoding is not part of this
/// crate.
#[cfg(test)]
const fn unpack(mut dpd: u16) -> u16 {
    // (pqr)(stu)(v)(wxy) becomes (abcd)(efgh)(ijkm)

    // DPDs only use the lower 10 bits.
    dpd &= 0x3ff;

    // | vwxst | abcd efgh ijkm |
    // | ----- | -------------- |
    // | 0.... | 0pqr 0stu 0wxy |
    // | 100.. | 0pqr 0stu 100y |
    // | 101.. | 0pqr 100u 0sty |
    // | 110.. | 100r 0stu 0pqy |
    // | 11100 | 100r 100u 0pqy |
    // | 11101 | 100r 0pqu 100y |
    // | 11110 | 0pqr 100u 100y |
    // | 11111 | 100r 100u 100y |

    use Pattern::*;
    match classify_dpd(dpd) {
        AllSmall => ((dpd & 0x380) << 1) | (dpd & 0x77),
        RightLarge => ((dpd & 0x380) << 1) | (dpd & 0x70) | 0x8 | (dpd & 0x1),
        MiddleLarge => {
            ((dpd & 0x380) << 1) | 0x80 | (dpd & 0x10) | ((dpd & 0x60) >> 4) | (dpd & 0x1)
        }
        LeftLarge => {
            0x800 | ((dpd & 0x80) << 1) | (dpd & 0x70) | ((dpd & 0x300) >> 7) | (dpd & 0x1)
        }
        RightSmall => {
            0x880 | ((dpd & 0x80) << 1) | (dpd & 0x10) | ((dpd & 0x300) >> 7) | (dpd & 0x1)
        }
        MiddleSmall => {
            0x808 | ((dpd & 0x80) << 1) | ((dpd & 0x300) >> 3) | (dpd & 0x10) | (dpd & 0x1)
        }
        LeftSmall => 0x088 | ((dpd & 0x380) << 1) | (dpd & 0x10) | (dpd & 0x1),
        AllLarge => 0x888 | ((dpd & 0x80) << 1) | (dpd & 0x11),
    }
}
