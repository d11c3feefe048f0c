//! Dense row-major matrices over GF(2^m) and the linear-algebra primitives
//! the codec is built from: `matmul`, `invert_mat` (Gauss–Jordan), and
//! `invert_vdm` (fast Vandermonde inverse).

use std::sync::Arc;

use rayon::prelude::*;

use crate::error::CodecError;
use crate::gf::GfTables;
use crate::simd::addmul;

/// A dense row-major matrix of GF(2^m) elements (stored as raw `u16`
/// values; every element is implicitly a member of the field described by
/// `tables`).
#[derive(Clone)]
pub struct Matrix {
    data: Vec<u16>,
    rows: usize,
    cols: usize,
    tables: Arc<GfTables>,
}

impl Matrix {
    pub fn new(rows: usize, cols: usize, tables: Arc<GfTables>) -> Self {
        Self {
            data: vec![0u16; rows * cols],
            rows,
            cols,
            tables,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> u16 {
        debug_assert!(r < self.rows && c < self.cols);
        self.data[r * self.cols + c]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, v: u16) {
        debug_assert!(r < self.rows && c < self.cols);
        self.data[r * self.cols + c] = v;
    }

    #[inline]
    pub fn row(&self, r: usize) -> &[u16] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, r: usize) -> &mut [u16] {
        &mut self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn swap_rows(&mut self, r1: usize, r2: usize) {
        if r1 == r2 {
            return;
        }
        let cols = self.cols;
        let (lo, hi) = if r1 < r2 { (r1, r2) } else { (r2, r1) };
        let (head, tail) = self.data.split_at_mut(hi * cols);
        let row_lo = &mut head[lo * cols..(lo + 1) * cols];
        let row_hi = &mut tail[..cols];
        row_lo.swap_with_slice(row_hi);
    }

    pub fn identity(size: usize, tables: Arc<GfTables>) -> Self {
        let mut m = Self::new(size, size, tables);
        for i in 0..size {
            m.set(i, i, 1);
        }
        m
    }
}

/// `C = A . B` for `A` (n x k), `B` (k x m), using the row-scaled-accumulate
/// ordering: for each output row, accumulate `A[i,j] * B[j, ·]` over nonzero
/// `A[i,j]`. This lets the inner pass reuse the bulk `addmul` primitive
/// instead of doing a scalar dot product per cell, and makes rows
/// independent so they can run on a `rayon` pool.
pub fn matmul(a: &Matrix, b: &Matrix, tables: &GfTables) -> Matrix {
    assert_eq!(a.cols(), b.rows());
    let (n, k, m) = (a.rows(), a.cols(), b.cols());
    let mut c = Matrix::new(n, m, a.tables.clone());

    c.data
        .par_chunks_mut(m)
        .enumerate()
        .for_each(|(i, out_row)| {
            for j in 0..k {
                let aij = a.get(i, j);
                if aij != 0 {
                    addmul(out_row, b.row(j), aij, tables);
                }
            }
        });

    c
}

/// Gauss–Jordan in-place inversion of a square matrix, following the
/// pivot-selection and column-unswap procedure of the field specification
/// this is adapted from.
pub fn invert_mat(m: &mut Matrix, tables: &GfTables) -> Result<(), CodecError> {
    let k = m.rows();
    assert_eq!(m.cols(), k);

    let mut ipiv = vec![0u32; k];
    let mut indxr = vec![0usize; k];
    let mut indxc = vec![0usize; k];

    for col in 0..k {
        let mut irow = usize::MAX;
        let mut icol = usize::MAX;

        if ipiv[col] != 1 && m.get(col, col) != 0 {
            irow = col;
            icol = col;
        } else {
            'search: for row in 0..k {
                if ipiv[row] == 1 {
                    continue;
                }
                for ix in 0..k {
                    if ipiv[ix] == 0 && m.get(row, ix) != 0 {
                        irow = row;
                        icol = ix;
                        break 'search;
                    } else if ipiv[ix] > 1 {
                        return Err(CodecError::SingularMatrix { col });
                    }
                }
            }
        }

        if icol == usize::MAX {
            return Err(CodecError::SingularMatrix { col });
        }

        ipiv[icol] += 1;
        if irow != icol {
            m.swap_rows(irow, icol);
        }

        indxr[col] = irow;
        indxc[col] = icol;

        let pivot = m.get(icol, icol);
        if pivot == 0 {
            return Err(CodecError::SingularMatrix { col });
        }

        if pivot != 1 {
            let pivot_inv = tables.inverse[pivot as usize];
            for c in 0..k {
                let v = m.get(icol, c);
                m.set(icol, c, tables.mul(v, pivot_inv));
            }
        }

        // Eliminate this column from every other row.
        let pivot_row: Vec<u16> = m.row(icol).to_vec();
        for ix in 0..k {
            if ix == icol {
                continue;
            }
            let c = m.row(ix)[icol];
            if c != 0 {
                m.row_mut(ix)[icol] = 0;
                addmul(m.row_mut(ix), &pivot_row, c, tables);
            }
        }
    }

    // Undo the column swaps recorded while pivoting, in reverse order.
    for col in (0..k).rev() {
        if indxr[col] != indxc[col] {
            for row in 0..k {
                let a = m.get(row, indxr[col]);
                let b = m.get(row, indxc[col]);
                m.set(row, indxr[col], b);
                m.set(row, indxc[col], a);
            }
        }
    }

    Ok(())
}

/// Fast O(k^2) inverse of a Vandermonde matrix whose second column holds the
/// distinct evaluation points `p_0 .. p_{k-1}`. The rest of the input matrix
/// is ignored; callers must have already confirmed it is a genuine,
/// non-singular Vandermonde matrix on those points.
pub fn invert_vdm(m: &mut Matrix, tables: &GfTables) {
    let k = m.rows();
    assert_eq!(m.cols(), k);
    if k == 1 {
        m.set(0, 0, 1);
        return;
    }

    let p: Vec<u16> = (0..k).map(|row| m.get(row, 1)).collect();

    // Coefficients of P(x) = product_i (x - p_i).
    let mut c = vec![0u16; k];
    c[k - 1] = p[0];
    for i in 1..k {
        let pi = p[i];
        for j in (k - 1 - i)..(k - 1) {
            let t = tables.mul(pi, c[j + 1]);
            c[j] ^= t;
        }
        c[k - 1] ^= pi;
    }

    let mut b = vec![0u16; k];
    for row in 0..k {
        let xx = p[row];
        b[k - 1] = 1;
        let mut t = 1u16;
        for i in (0..(k - 1)).rev() {
            b[i] = c[i + 1] ^ tables.mul(xx, b[i + 1]);
            t = tables.mul(xx, t) ^ b[i];
        }
        let t_inv = tables.inverse[t as usize];
        for col in 0..k {
            m.set(col, row, tables.mul(t_inv, b[col]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gf::GfTables;

    fn vandermonde(tables: &Arc<GfTables>, k: usize) -> Matrix {
        // Row 0 = (1,0,..,0); row r>=1, col c: exp[(r*c) mod limit], matching
        // the codec's own generator-matrix construction (§4.4).
        let mut t = Matrix::new(k, k, tables.clone());
        for c in 0..k {
            t.set(0, c, if c == 0 { 1 } else { 0 });
        }
        for r in 1..k {
            for c in 0..k {
                let exp_idx = (r * c) % (tables.limit as usize);
                t.set(r, c, tables.exp[exp_idx]);
            }
        }
        t
    }

    #[test]
    fn matmul_identity_is_identity() {
        let tables = Arc::new(GfTables::build(8).unwrap());
        let id = Matrix::identity(4, tables.clone());
        let mut a = Matrix::new(4, 4, tables.clone());
        for r in 0..4 {
            for c in 0..4 {
                a.set(r, c, ((r + 1) * (c + 2)) as u16 & 0xFF);
            }
        }
        let prod = matmul(&a, &id, &tables);
        for r in 0..4 {
            for c in 0..4 {
                assert_eq!(prod.get(r, c), a.get(r, c));
            }
        }
    }

    #[test]
    fn invert_vdm_then_matmul_is_identity() {
        let tables = Arc::new(GfTables::build(8).unwrap());
        for k in [1usize, 2, 3, 5, 8] {
            let t = vandermonde(&tables, k);
            let mut inv = t.clone();
            invert_vdm(&mut inv, &tables);
            let prod = matmul(&t, &inv, &tables);
            for r in 0..k {
                for c in 0..k {
                    let expected = if r == c { 1 } else { 0 };
                    assert_eq!(prod.get(r, c), expected, "k={k} r={r} c={c}");
                }
            }
        }
    }

    #[test]
    fn invert_mat_matches_invert_vdm_on_same_matrix() {
        let tables = Arc::new(GfTables::build(8).unwrap());
        let t = vandermonde(&tables, 5);
        let mut by_gauss = t.clone();
        invert_mat(&mut by_gauss, &tables).unwrap();
        let mut by_vdm = t.clone();
        invert_vdm(&mut by_vdm, &tables);
        for r in 0..5 {
            for c in 0..5 {
                assert_eq!(by_gauss.get(r, c), by_vdm.get(r, c), "r={r} c={c}");
            }
        }
    }

    #[test]
    fn invert_mat_detects_singular_matrix() {
        let tables = Arc::new(GfTables::build(8).unwrap());
        let mut m = Matrix::new(3, 3, tables.clone());
        // A row of zeros makes this matrix singular regardless of the rest.
        m.set(0, 0, 1);
        m.set(1, 1, 1);
        // row 2 left all zero
        let err = invert_mat(&mut m, &tables).unwrap_err();
        assert!(matches!(err, CodecError::SingularMatrix { .. }));
    }

    #[test]
    fn invert_mat_k1_noop() {
        let tables = Arc::new(GfTables::build(8).unwrap());
        let mut m = Matrix::new(1, 1, tables.clone());
        m.set(0, 0, 1);
        invert_mat(&mut m, &tables).unwrap();
        assert_eq!(m.get(0, 0), 1);
    }

    #[test]
    fn swap_rows_swaps_contents() {
        let tables = Arc::new(GfTables::build(8).unwrap());
        let mut m = Matrix::new(2, 2, tables);
        m.set(0, 0, 1);
        m.set(0, 1, 2);
        m.set(1, 0, 3);
        m.set(1, 1, 4);
        m.swap_rows(0, 1);
        assert_eq!(m.row(0), &[3, 4]);
        assert_eq!(m.row(1), &[1, 2]);
    }
}
