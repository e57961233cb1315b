use super::{bcd, encoding as dpd};

/// Maps 12-bit BCDs to 10-bit DPDs.
///
/// Indices that are not valid BCDs map to zero.
#[allow(clippy::indexing_slicing)]
pub(crate) const BCD_TO_DPD: [u16; 0x999 + 1] = {
    let mut t = [0u16; 0x999 + 1];
    let mut bin = 0;
    while bin <= 999 {
        let bcd = bcd::from_bin(bin);
        t[bcd as usize] = dpd::pack(bcd);
        bin += 1;
    }
    t
};

/// Maps the top two bits of the biased exponent and the MSD to
/// the combination field, already shifted into place in the
/// high word.
///
/// The index is `(msb << 4) | msd`. Indices with an MSD above
/// nine are zero.
///
/// ```text
/// | Field     | Exp | Coeff   |
/// | --------- | --- | ------- |
/// | a b c d e | a b | 0 c d e |
/// | 1 1 c d e | c d | 1 0 0 e |
/// ```
#[allow(clippy::indexing_slicing)]
pub(crate) const COMB_FROM: [u32; 48] = {
    let mut t = [0u32; 48];
    let mut msb = 0;
    while msb <= 2 {
        let mut msd = 0;
        while msd <= 9 {
            let comb = if msd <= 7 {
                (msb << 3) | msd
            } else {
                0x18 | (msb << 1) | (msd & 0x1)
            };
            t[(msb << 4) | msd] = (comb as u32) << 26;
            msd += 1;
        }
        msb += 1;
    }
    t
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcd_to_dpd() {
        let mut bin = 0;
        while bin <= 999 {
            let bcd = bcd::from_bin(bin);
            let dpd = dpd::pack(bcd);
            assert_eq!(BCD_TO_DPD[bcd as usize], dpd, "#{bin}");
            bin += 1;
        }
    }

    #[test]
    fn test_bcd_to_dpd_invalid_is_zero() {
        for (i, &dpd) in BCD_TO_DPD.iter().enumerate() {
            let nibbles = [i >> 8, (i >> 4) & 0xf, i & 0xf];
            if nibbles.iter().any(|&n| n > 9) {
                assert_eq!(dpd, 0, "{i:03x}");
            }
        }
    }

    #[test]
    fn test_bcd_to_dpd_small_values() {
        // 0x012 -> 0b000_001_0_010
        let tests = [
            (0x000, 0x000),
            (0x001, 0x001),
            (0x009, 0x009),
            (0x012, 0x012),
            (0x079, 0x079),
            (0x345, 0x1c5),
            (0x999, 0x0ff),
        ];
        for (i, (bcd, want)) in tests.into_iter().enumerate() {
            assert_eq!(BCD_TO_DPD[bcd], want, "#{i}: {bcd:03x}");
        }
    }

    #[test]
    fn test_comb_from() {
        // Every entry from the decNumber DECCOMBFROM table.
        let want: [u32; 48] = [
            0x00000000, 0x04000000, 0x08000000, 0x0C000000, 0x10000000, 0x14000000,
            0x18000000, 0x1C000000, 0x60000000, 0x64000000, 0x00000000, 0x00000000,
            0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x20000000, 0x24000000,
            0x28000000, 0x2C000000, 0x30000000, 0x34000000, 0x38000000, 0x3C000000,
            0x68000000, 0x6C000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
            0x00000000, 0x00000000, 0x40000000, 0x44000000, 0x48000000, 0x4C000000,
            0x50000000, 0x54000000, 0x58000000, 0x5C000000, 0x70000000, 0x74000000,
            0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
        ];
        for (i, (got, want)) in COMB_FROM.iter().zip(want).enumerate() {
            assert_eq!(*got, want, "#{i}: {got:#010x} != {want:#010x}");
        }
    }
}
