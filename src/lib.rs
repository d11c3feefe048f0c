//! rsgf - systematic, MDS Reed-Solomon forward error correction over GF(2^m)
//!
//! Given `k` source symbols, `Codec` produces `n >= k` encoded symbols such
//! that any `k` of the `n` recover the original data exactly. The code is
//! systematic: the first `k` encoded symbols are the source symbols
//! unchanged. `m` (2 <= m <= 16) selects the field width at construction
//! time; GF tables for each `m` are built once and shared by every `Codec`
//! that uses it.

pub mod codec;
pub mod error;
pub mod gf;
mod init;
pub mod matrix;
pub mod simd;

pub use codec::Codec;
pub use error::CodecError;
pub use gf::{Gf, GfTables, MAX_M, MIN_M};
