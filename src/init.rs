//! Idempotent, one-shot GF table initialization.
//!
//! The reference GF(2^16) implementation this codec is adapted from builds
//! its log/antilog tables into a single `OnceLock`, built on first use and
//! shared by every caller afterwards. This generalizes that to one
//! `OnceLock` per field width, so a process using several values of `m`
//! still only ever builds each field's tables once.

use std::sync::{Arc, OnceLock};

use crate::gf::{GfTables, MAX_M, MIN_M};

const SLOTS: usize = (MAX_M - MIN_M + 1) as usize;

// `OnceLock` isn't `Copy`, so build the array with an explicit initializer
// list rather than `[OnceLock::new(); SLOTS]`.
static TABLE_CACHE: [OnceLock<Arc<GfTables>>; SLOTS] = [
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
];

/// Return the shared tables for field width `m`, building them on first use.
///
/// Safe to call concurrently from any number of threads: exactly one caller
/// performs the build, the rest block on `OnceLock::get_or_init` until it
/// completes, and every caller observes the fully-constructed tables
/// afterwards. `m` must already have been validated to be in `[MIN_M, MAX_M]`.
pub fn tables_for(m: u32) -> Arc<GfTables> {
    debug_assert!((MIN_M..=MAX_M).contains(&m));
    let slot = &TABLE_CACHE[(m - MIN_M) as usize];
    slot.get_or_init(|| {
        log::debug!("building GF(2^{m}) tables");
        let tables = GfTables::build(m)
            .unwrap_or_else(|e| unreachable!("m range validated by Codec::new: {e}"));
        Arc::new(tables)
    })
    .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn tables_for_is_memoized() {
        let a = tables_for(8);
        let b = tables_for(8);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn concurrent_init_converges_on_one_table_set() {
        let _ = env_logger::builder().is_test(true).try_init();
        let handles: Vec<_> = (0..16)
            .map(|_| thread::spawn(|| tables_for(12)))
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for pair in results.windows(2) {
            assert!(Arc::ptr_eq(&pair[0], &pair[1]));
        }
    }

    #[test]
    fn distinct_field_widths_get_distinct_tables() {
        let a = tables_for(8);
        let b = tables_for(9);
        assert_eq!(a.m, 8);
        assert_eq!(b.m, 9);
    }
}
