//! The bulk multiply-accumulate primitive: `dst[i] ^= c * src[i]`.
//!
//! This is the hot path of the whole codec (`matmul`, encode, and decode all
//! bottom out here), so it gets the same treatment this codebase gives its
//! GF(2^16) multiply-add: a scalar fallback that's good enough to always be
//! correct, and a SIMD fast path selected once via runtime CPU-feature
//! detection and cached for the life of the process.

pub mod pshufb;

use std::sync::OnceLock;

use crate::gf::GfTables;

/// Which SIMD implementation this process will use for `addmul`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdLevel {
    /// No usable SIMD; always correct, just slower.
    None,
    /// x86_64 SSSE3 PSHUFB nibble-table multiply.
    Ssse3,
}

static SIMD_LEVEL: OnceLock<SimdLevel> = OnceLock::new();

/// Detect the best available `addmul` implementation for this CPU. Result is
/// cached after the first call, matching the one-shot detection this
/// codebase does for its own SIMD dispatch.
pub fn detect_simd_support() -> SimdLevel {
    *SIMD_LEVEL.get_or_init(|| {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("ssse3") {
                return SimdLevel::Ssse3;
            }
        }
        SimdLevel::None
    })
}

/// Per-coefficient split multiplication table for field widths m > 8:
/// `c * x = low[x & 0xFF] ^ high[x >> 8]`. 1KiB total instead of a
/// `2^m`-entry table.
pub struct SplitMulTable {
    pub low: Box<[u16; 256]>,
    pub high: Box<[u16; 256]>,
}

/// Full `c * x` table for field widths m <= 8, where every element already
/// fits in a byte.
pub struct FullMulTable {
    pub table: Box<[u16; 256]>,
}

pub fn build_split_mul_table(tables: &GfTables, c: u16) -> SplitMulTable {
    let mut low = Box::new([0u16; 256]);
    let mut high = Box::new([0u16; 256]);
    if c != 0 {
        for i in 1..256u32 {
            low[i as usize] = tables.mul(i as u16, c);
        }
        for i in 1..256u32 {
            high[i as usize] = tables.mul((i << 8) as u16, c);
        }
    }
    SplitMulTable { low, high }
}

pub fn build_full_mul_table(tables: &GfTables, c: u16) -> FullMulTable {
    let mut table = Box::new([0u16; 256]);
    if c != 0 {
        for i in 1..256u32 {
            table[i as usize] = tables.mul(i as u16, c);
        }
    }
    FullMulTable { table }
}

/// `dst[i] ^= c * src[i]` for `i` in `[0, dst.len().min(src.len()))`.
///
/// Dispatches on field width and, for m > 8, on detected SIMD support.
/// Returns immediately (a no-op) when `c == 0`.
pub fn addmul(dst: &mut [u16], src: &[u16], c: u16, tables: &GfTables) {
    if c == 0 {
        return;
    }
    let len = dst.len().min(src.len());

    if tables.m <= 8 {
        let t = build_full_mul_table(tables, c);
        addmul_full_scalar(&mut dst[..len], &src[..len], &t);
        return;
    }

    let t = build_split_mul_table(tables, c);

    #[cfg(target_arch = "x86_64")]
    if detect_simd_support() == SimdLevel::Ssse3 && len >= 8 {
        let simd_words = (len / 8) * 8;
        // SAFETY: SSSE3 support was just detected at runtime.
        unsafe {
            pshufb::addmul_ssse3(&mut dst[..simd_words], &src[..simd_words], &t);
        }
        addmul_split_scalar(&mut dst[simd_words..len], &src[simd_words..len], &t);
        return;
    }

    addmul_split_scalar(&mut dst[..len], &src[..len], &t);
}

#[inline]
fn addmul_full_scalar(dst: &mut [u16], src: &[u16], t: &FullMulTable) {
    for i in 0..src.len() {
        dst[i] ^= t.table[src[i] as usize];
    }
}

#[inline]
pub(crate) fn addmul_split_scalar(dst: &mut [u16], src: &[u16], t: &SplitMulTable) {
    for i in 0..src.len() {
        let word = src[i];
        dst[i] ^= t.low[(word & 0xFF) as usize] ^ t.high[(word >> 8) as usize];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gf::GfTables;

    #[test]
    fn addmul_zero_coefficient_is_noop() {
        let tables = GfTables::build(8).unwrap();
        let src = vec![1u16, 2, 3, 4];
        let mut dst = vec![9u16, 9, 9, 9];
        let before = dst.clone();
        addmul(&mut dst, &src, 0, &tables);
        assert_eq!(dst, before);
    }

    #[test]
    fn addmul_matches_scalar_mul_loop_m8() {
        let tables = GfTables::build(8).unwrap();
        let c = 37u16;
        let src: Vec<u16> = (0..64u32).map(|v| (v * 3) as u16 % 256).collect();
        let mut dst = vec![0u16; src.len()];
        addmul(&mut dst, &src, c, &tables);
        for (i, &s) in src.iter().enumerate() {
            assert_eq!(dst[i], tables.mul(c, s));
        }
    }

    #[test]
    fn addmul_matches_scalar_mul_loop_m16() {
        let tables = GfTables::build(16).unwrap();
        let c = 12345u16;
        let src: Vec<u16> = (0..40u32).map(|v| (v * 977) as u16).collect();
        let mut dst = vec![0u16; src.len()];
        addmul(&mut dst, &src, c, &tables);
        for (i, &s) in src.iter().enumerate() {
            assert_eq!(dst[i], tables.mul(c, s));
        }
    }

    #[test]
    fn addmul_accumulates_xor() {
        let tables = GfTables::build(16).unwrap();
        let c = 5u16;
        let src = vec![7u16, 8, 9];
        let mut dst = vec![1u16, 2, 3];
        let expected: Vec<u16> = dst
            .iter()
            .zip(&src)
            .map(|(&d, &s)| d ^ tables.mul(c, s))
            .collect();
        addmul(&mut dst, &src, c, &tables);
        assert_eq!(dst, expected);
    }

    #[test]
    fn addmul_handles_unaligned_tail_m16() {
        // len not a multiple of the SIMD lane width (8 words).
        let tables = GfTables::build(16).unwrap();
        let c = 3u16;
        for len in [1usize, 7, 9, 15, 17, 63, 65] {
            let src: Vec<u16> = (0..len as u32).map(|v| (v * 31) as u16).collect();
            let mut dst = vec![0u16; len];
            addmul(&mut dst, &src, c, &tables);
            for (i, &s) in src.iter().enumerate() {
                assert_eq!(dst[i], tables.mul(c, s), "len={len} i={i}");
            }
        }
    }

    #[test]
    fn detect_simd_support_returns_a_valid_level() {
        let level = detect_simd_support();
        match level {
            SimdLevel::None | SimdLevel::Ssse3 => {}
        }
    }
}
