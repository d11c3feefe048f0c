//! The systematic Reed–Solomon codec: generator construction, encode, decode.

use std::fmt;
use std::sync::Arc;

use crate::error::CodecError;
use crate::gf::{GfTables, MAX_M, MIN_M};
use crate::init::tables_for;
use crate::matrix::{invert_mat, invert_vdm, matmul, Matrix};
use crate::simd::addmul;

/// An immutable systematic MDS Reed–Solomon codec over GF(2^m).
///
/// Construction builds the n×k generator matrix once; `encode` and `decode`
/// borrow it for the lifetime of each call and never mutate it. A `Codec`
/// may be shared across threads (`G` and the GF tables are read-only after
/// construction).
pub struct Codec {
    m: u32,
    k: usize,
    n: usize,
    generator: Matrix,
    tables: Arc<GfTables>,
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("m", &self.m)
            .field("k", &self.k)
            .field("n", &self.n)
            .finish_non_exhaustive()
    }
}

impl Codec {
    /// Build a systematic generator matrix for `k` source symbols and `n`
    /// total encoded symbols over GF(2^m).
    ///
    /// Follows the construction this crate's GF table generator implies: a
    /// temp matrix T (n×k) with row 0 = `(1, 0, .., 0)` and rows `1..n` as
    /// powers of the field's generator, inverted on its top k×k block, then
    /// used to compute the systematic lower block via `matmul`.
    pub fn new(m: u32, k: usize, n: usize) -> Result<Self, CodecError> {
        if !(MIN_M..=MAX_M).contains(&m) || k == 0 || k > n || n > (1usize << m) {
            return Err(CodecError::InvalidParameters { m, k, n });
        }

        let tables = tables_for(m);
        log::debug!("constructing codec: m={m} k={k} n={n}");

        let mut t = Matrix::new(n, k, tables.clone());
        // Row 0 = (1, 0, .., 0): deliberately not the textbook Vandermonde
        // row of all-ones. This makes the top row already match the
        // identity it'll become after inversion.
        t.set(0, 0, 1);
        for r in 1..n {
            for c in 0..k {
                let exp_idx = ((r * c) as u64 % tables.limit as u64) as usize;
                t.set(r, c, tables.exp[exp_idx]);
            }
        }

        // Invert the upper k×k block in place.
        let mut upper = Matrix::new(k, k, tables.clone());
        for r in 0..k {
            upper.row_mut(r).copy_from_slice(&t.row(r)[..k]);
        }
        invert_vdm(&mut upper, &tables);

        let mut generator = Matrix::new(n, k, tables.clone());
        for r in 0..k {
            generator.set(r, r, 1);
        }

        if n > k {
            let mut lower = Matrix::new(n - k, k, tables.clone());
            for r in 0..(n - k) {
                lower.row_mut(r).copy_from_slice(t.row(k + r));
            }
            let lower_gen = matmul(&lower, &upper, &tables);
            for r in 0..(n - k) {
                generator.row_mut(k + r).copy_from_slice(lower_gen.row(r));
            }
        }

        Ok(Self {
            m,
            k,
            n,
            generator,
            tables,
        })
    }

    #[inline]
    pub fn m(&self) -> u32 {
        self.m
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Produce the encoded symbol at `index` into `out`.
    ///
    /// `src` holds the `k` source symbols, each `sz` field elements long;
    /// `out` must be exactly `sz` elements. For `index < k` this is a plain
    /// copy (the code is systematic); otherwise `out` is the generator
    /// row's linear combination of the source symbols.
    pub fn encode(
        &self,
        src: &[&[u16]],
        out: &mut [u16],
        index: usize,
        sz: usize,
    ) -> Result<(), CodecError> {
        if index >= self.n {
            return Err(CodecError::InvalidIndex {
                index,
                n: self.n,
            });
        }
        if src.len() != self.k {
            return Err(CodecError::BufferLengthMismatch {
                expected: self.k,
                got: src.len(),
            });
        }
        if out.len() != sz {
            return Err(CodecError::BufferLengthMismatch {
                expected: sz,
                got: out.len(),
            });
        }
        for s in src.iter() {
            if s.len() != sz {
                return Err(CodecError::BufferLengthMismatch {
                    expected: sz,
                    got: s.len(),
                });
            }
        }

        if index < self.k {
            out.copy_from_slice(src[index]);
            return Ok(());
        }

        out.iter_mut().for_each(|v| *v = 0);
        let row = self.generator.row(index);
        for i in 0..self.k {
            let coeff = row[i];
            if coeff != 0 {
                addmul(out, src[i], coeff, &self.tables);
            }
        }
        Ok(())
    }

    /// Recover the original `k` source symbols from any `k` of the `n`
    /// encoded symbols.
    ///
    /// `pkt[i]` is the received symbol at `index[i]`. On success `pkt` and
    /// `index` have been reordered in place so that `pkt[i]` holds source
    /// symbol `i` and `index[i] == i`, for every `i` in `[0, k)`.
    pub fn decode(
        &self,
        pkt: &mut [Vec<u16>],
        index: &mut [usize],
        sz: usize,
    ) -> Result<(), CodecError> {
        let k = self.k;
        if pkt.len() != k || index.len() != k {
            return Err(CodecError::BufferLengthMismatch {
                expected: k,
                got: pkt.len(),
            });
        }
        for &idx in index.iter() {
            if idx >= self.n {
                return Err(CodecError::InvalidIndex { index: idx, n: self.n });
            }
        }
        for s in pkt.iter() {
            if s.len() != sz {
                return Err(CodecError::BufferLengthMismatch {
                    expected: sz,
                    got: s.len(),
                });
            }
        }

        // Cycle-following shuffle: place every symbol whose index is a
        // source index at that position. A target slot already holding its
        // own index when we try to land another symbol there means two
        // inputs claim the same index.
        let mut i = 0;
        while i < k {
            let target = index[i];
            if target < k && target != i {
                if index[target] == target {
                    return Err(CodecError::DuplicateIndex { index: target });
                }
                index.swap(i, target);
                pkt.swap(i, target);
                continue;
            }
            i += 1;
        }

        // Build the k×k decode matrix: standard basis rows for symbols that
        // are already source symbols, generator rows for parity symbols.
        let mut decode_matrix = Matrix::new(k, k, self.tables.clone());
        for row in 0..k {
            if index[row] < k {
                decode_matrix.set(row, index[row], 1);
            } else {
                decode_matrix
                    .row_mut(row)
                    .copy_from_slice(self.generator.row(index[row]));
            }
        }

        invert_mat(&mut decode_matrix, &self.tables)?;

        let mut recovered: Vec<Option<Vec<u16>>> = vec![None; k];
        for row in 0..k {
            if index[row] < k {
                continue;
            }
            let mut buf = vec![0u16; sz];
            for col in 0..k {
                let coeff = decode_matrix.get(row, col);
                if coeff != 0 {
                    addmul(&mut buf, &pkt[col], coeff, &self.tables);
                }
            }
            recovered[row] = Some(buf);
        }

        for (row, maybe_buf) in recovered.into_iter().enumerate() {
            if let Some(buf) = maybe_buf {
                pkt[row] = buf;
                index[row] = row;
            }
        }

        Ok(())
    }
}
