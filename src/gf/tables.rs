//! GF(2^m) log/antilog/inverse table construction from a primitive polynomial.
//!
//! Builds the doubled-`exp` / sentinel-`log[0]` / `inverse` tables this
//! field specification calls for, generalized to any field width in [2, 16].

use crate::error::CodecError;

/// Primitive (irreducible) polynomial for each field width, indexed by `m - 2`.
/// Bit `i` of the entry is the coefficient of `x^i`; the implicit `x^m` term
/// is not stored. These exact values are mandated: tables built from a
/// different polynomial are incompatible with anyone else's encoding.
const PRIMITIVE_POLY: [u32; 15] = [
    0x07,    // m=2
    0x0B,    // m=3
    0x13,    // m=4
    0x25,    // m=5
    0x43,    // m=6
    0x89,    // m=7
    0x11D,   // m=8
    0x211,   // m=9
    0x409,   // m=10
    0x805,   // m=11
    0x1053,  // m=12
    0x201B,  // m=13
    0x4443,  // m=14
    0x8003,  // m=15
    0x1100B, // m=16
];

/// Smallest and largest supported field width.
pub const MIN_M: u32 = 2;
pub const MAX_M: u32 = 16;

/// Look up the mandated primitive polynomial for field width `m`.
pub fn primitive_poly(m: u32) -> Option<u32> {
    if (MIN_M..=MAX_M).contains(&m) {
        Some(PRIMITIVE_POLY[(m - MIN_M) as usize])
    } else {
        None
    }
}

/// Log / antilog / multiplicative-inverse tables for one field width.
///
/// `exp` is doubled (length `2*(2^m - 1)`) so that `exp[log[x] + log[y]]`
/// needs no modular reduction of the exponent sum.
#[derive(Debug)]
pub struct GfTables {
    pub m: u32,
    pub limit: u32, // 2^m - 1
    pub exp: Vec<u16>,
    pub log: Vec<u16>,
    pub inverse: Vec<u16>,
}

impl GfTables {
    /// Build the tables for field width `m` from its mandated primitive
    /// polynomial, following the construction in the field specification
    /// this codec implements.
    ///
    /// `GfTables` is reachable directly from outside this crate (it's
    /// re-exported from the crate root), so this validates `m` itself
    /// rather than trusting a caller like `Codec::new` to have done it.
    pub fn build(m: u32) -> Result<Self, CodecError> {
        let poly = primitive_poly(m).ok_or(CodecError::InvalidFieldWidth { m })?;
        let count = 1u32 << m;
        let limit = count - 1;

        let mut exp = vec![0u16; (2 * limit) as usize];
        let mut log = vec![0u16; count as usize];

        // Step 1: seed exp[0..m) from the polynomial's low m bits, and fold
        // the high bit contributions into exp[m].
        let mut mask: u32 = 1;
        let mut acc: u32 = 0;
        for i in 0..m {
            exp[i as usize] = mask as u16;
            log[mask as usize] = i as u16;
            if poly & (1 << i) != 0 {
                acc ^= mask;
            }
            mask <<= 1;
        }
        exp[m as usize] = acc as u16;
        log[acc as usize] = m as u16;

        // Step 2: fill the rest of the cycle by doubling mod the polynomial.
        let top_bit = 1u32 << (m - 1);
        for i in (m + 1)..=(limit - 1) {
            let prev = exp[(i - 1) as usize] as u32;
            let next = if prev & top_bit != 0 {
                (acc) ^ ((prev ^ top_bit) << 1)
            } else {
                prev << 1
            };
            exp[i as usize] = next as u16;
            log[next as usize] = i as u16;
        }

        // Step 3: sentinel for log(0).
        log[0] = limit as u16;

        // Step 4: duplicate the cycle so lookups never need a modular
        // reduction of the exponent sum.
        for i in 0..limit {
            exp[(i + limit) as usize] = exp[i as usize];
        }

        // Step 5: multiplicative inverse table.
        let mut inverse = vec![0u16; count as usize];
        inverse[0] = 0;
        if count > 1 {
            inverse[1] = 1;
        }
        for x in 2..count {
            let l = log[x as usize] as u32;
            inverse[x as usize] = exp[(limit - l) as usize];
        }

        Ok(GfTables {
            m,
            limit,
            exp,
            log,
            inverse,
        })
    }

    /// `exp[log[x]] = x` for all nonzero x, `mul(x, inverse[x]) = 1`.
    #[inline]
    pub fn mul(&self, x: u16, y: u16) -> u16 {
        if x == 0 || y == 0 {
            return 0;
        }
        let sum = self.log[x as usize] as usize + self.log[y as usize] as usize;
        self.exp[sum]
    }
}
