//! x86_64 SSSE3 PSHUFB multiply-add for field widths m > 8.
//!
//! Implements the "split multiplication by table lookup" technique: PSHUFB
//! only does 16-entry (4-bit) lookups, so each coefficient's 256-entry
//! low/high byte tables are each split into two 16-entry nibble tables (one
//! per output byte), giving 8 vector tables of 16 bytes each. Adapted from
//! this codebase's AVX2 nibble-table multiply-add for GF(2^16), narrowed to
//! 128-bit registers (8 lanes / 16 bytes per iteration) to match plain SSSE3.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::SplitMulTable;

/// Split one 256-entry byte-result table into the four 16-byte nibble
/// tables PSHUFB needs: (lo_nibble->lo_byte, lo_nibble->hi_byte,
/// hi_nibble->lo_byte, hi_nibble->hi_byte).
#[cfg(target_arch = "x86_64")]
fn nibble_tables(table: &[u16; 256]) -> ([u8; 16], [u8; 16], [u8; 16], [u8; 16]) {
    let mut lo_nib_lo = [0u8; 16];
    let mut lo_nib_hi = [0u8; 16];
    let mut hi_nib_lo = [0u8; 16];
    let mut hi_nib_hi = [0u8; 16];
    for nib in 0..16usize {
        let r_lo = table[nib];
        lo_nib_lo[nib] = (r_lo & 0xFF) as u8;
        lo_nib_hi[nib] = (r_lo >> 8) as u8;

        let r_hi = table[nib << 4];
        hi_nib_lo[nib] = (r_hi & 0xFF) as u8;
        hi_nib_hi[nib] = (r_hi >> 8) as u8;
    }
    (lo_nib_lo, lo_nib_hi, hi_nib_lo, hi_nib_hi)
}

/// `dst[i] ^= c * src[i]` over whole 8-word (16-byte) SSSE3 lanes.
///
/// # Safety
/// - The caller must have confirmed SSSE3 is available on this CPU.
/// - `dst` and `src` must have equal, nonzero length that is a multiple of
///   8 (the caller handles any unaligned prefix/tail with the scalar path).
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "ssse3")]
pub unsafe fn addmul_ssse3(dst: &mut [u16], src: &[u16], tables: &SplitMulTable) {
    debug_assert_eq!(dst.len(), src.len());
    debug_assert_eq!(dst.len() % 8, 0);

    let (low_lo_nib_lo, low_lo_nib_hi, low_hi_nib_lo, low_hi_nib_hi) = nibble_tables(&tables.low);
    let (high_lo_nib_lo, high_lo_nib_hi, high_hi_nib_lo, high_hi_nib_hi) =
        nibble_tables(&tables.high);

    let v_low_lo_nib_lo = _mm_loadu_si128(low_lo_nib_lo.as_ptr() as *const __m128i);
    let v_low_lo_nib_hi = _mm_loadu_si128(low_lo_nib_hi.as_ptr() as *const __m128i);
    let v_low_hi_nib_lo = _mm_loadu_si128(low_hi_nib_lo.as_ptr() as *const __m128i);
    let v_low_hi_nib_hi = _mm_loadu_si128(low_hi_nib_hi.as_ptr() as *const __m128i);
    let v_high_lo_nib_lo = _mm_loadu_si128(high_lo_nib_lo.as_ptr() as *const __m128i);
    let v_high_lo_nib_hi = _mm_loadu_si128(high_lo_nib_hi.as_ptr() as *const __m128i);
    let v_high_hi_nib_lo = _mm_loadu_si128(high_hi_nib_lo.as_ptr() as *const __m128i);
    let v_high_hi_nib_hi = _mm_loadu_si128(high_hi_nib_hi.as_ptr() as *const __m128i);

    let mask_0f = _mm_set1_epi8(0x0F);

    let mut idx = 0;
    while idx < src.len() {
        let in_vec = _mm_loadu_si128(src.as_ptr().add(idx) as *const __m128i);
        let out_vec = _mm_loadu_si128(dst.as_ptr().add(idx) as *const __m128i);

        // Low byte of each 16-bit word -> tables.low; high byte -> tables.high.
        let low_bytes = _mm_and_si128(in_vec, _mm_set1_epi16(0x00FF));
        let high_bytes = _mm_srli_epi16(in_vec, 8);

        let low_lo_nib = _mm_and_si128(low_bytes, mask_0f);
        let low_hi_nib = _mm_srli_epi16(_mm_and_si128(low_bytes, _mm_set1_epi8(0xF0u8 as i8)), 4);
        let high_lo_nib = _mm_and_si128(high_bytes, mask_0f);
        let high_hi_nib = _mm_srli_epi16(_mm_and_si128(high_bytes, _mm_set1_epi8(0xF0u8 as i8)), 4);

        let low_result_lo = _mm_xor_si128(
            _mm_shuffle_epi8(v_low_lo_nib_lo, low_lo_nib),
            _mm_shuffle_epi8(v_low_hi_nib_lo, low_hi_nib),
        );
        let low_result_hi = _mm_xor_si128(
            _mm_shuffle_epi8(v_low_lo_nib_hi, low_lo_nib),
            _mm_shuffle_epi8(v_low_hi_nib_hi, low_hi_nib),
        );
        let high_result_lo = _mm_xor_si128(
            _mm_shuffle_epi8(v_high_lo_nib_lo, high_lo_nib),
            _mm_shuffle_epi8(v_high_hi_nib_lo, high_hi_nib),
        );
        let high_result_hi = _mm_xor_si128(
            _mm_shuffle_epi8(v_high_lo_nib_hi, high_lo_nib),
            _mm_shuffle_epi8(v_high_hi_nib_hi, high_hi_nib),
        );

        let result_lo = _mm_xor_si128(low_result_lo, high_result_lo);
        let result_hi = _mm_xor_si128(low_result_hi, high_result_hi);
        let result = _mm_or_si128(result_lo, _mm_slli_epi16(result_hi, 8));

        let final_result = _mm_xor_si128(out_vec, result);
        _mm_storeu_si128(dst.as_mut_ptr().add(idx) as *mut __m128i, final_result);

        idx += 8;
    }
}
