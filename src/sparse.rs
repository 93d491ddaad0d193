//! Compressed sparse row matrices.
//!
//! This module provides the small sparse matrix type used for every sparse
//! result in the crate: per-vertex triangle areas, cotangent and adjacency
//! matrices, and the assembled Laplacians. Only the operations those
//! computations need are implemented.

use nalgebra::DVector;

use crate::error::{MeshError, Result};

/// Compressed Sparse Row (CSR) matrix.
///
/// Column indices are sorted and unique within every row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Row pointers: row_ptr[i] is the index in col_idx/values where row i starts.
    /// Length is rows + 1, with row_ptr[rows] = nnz.
    row_ptr: Vec<usize>,
    /// Column indices for each non-zero value.
    col_idx: Vec<usize>,
    /// Non-zero values.
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Create an empty matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row_ptr: vec![0; rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Create a CSR matrix from triplets (row, col, value).
    ///
    /// Duplicate entries at the same (row, col) are summed in the order they
    /// appear in `triplets`.
    ///
    /// # Panics
    ///
    /// Panics if a triplet lies outside the matrix. Lookups on a built matrix
    /// never panic: out-of-range rows and columns are simply empty.
    pub fn from_triplets(rows: usize, cols: usize, mut triplets: Vec<(usize, usize, f64)>) -> Self {
        // Stable sort keeps duplicate summation order deterministic
        triplets.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut row_ptr = vec![0usize; rows + 1];
        let mut col_idx = Vec::with_capacity(triplets.len());
        let mut values: Vec<f64> = Vec::with_capacity(triplets.len());
        let mut last: Option<(usize, usize)> = None;

        for (row, col, val) in triplets {
            assert!(
                row < rows && col < cols,
                "triplet ({}, {}) outside {}x{} matrix",
                row,
                col,
                rows,
                cols
            );

            if last == Some((row, col)) {
                if let Some(acc) = values.last_mut() {
                    *acc += val;
                }
                continue;
            }

            col_idx.push(col);
            values.push(val);
            row_ptr[row + 1] += 1;
            last = Some((row, col));
        }

        for r in 0..rows {
            row_ptr[r + 1] += row_ptr[r];
        }

        Self {
            rows,
            cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Create a square diagonal matrix.
    ///
    /// Every diagonal entry is stored, zeros included.
    pub fn from_diagonal(diagonal: &[f64]) -> Self {
        let n = diagonal.len();
        Self {
            rows: n,
            cols: n,
            row_ptr: (0..=n).collect(),
            col_idx: (0..n).collect(),
            values: diagonal.to_vec(),
        }
    }

    /// Get the number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Get the number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Get `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Get the number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Get all stored values in row-major order.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the stored value at (row, col), if any.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows {
            return None;
        }
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        self.col_idx[start..end]
            .binary_search(&col)
            .ok()
            .map(|k| self.values[start + k])
    }

    /// Iterate over the stored entries of one row as `(col, value)`.
    ///
    /// Like [`CsrMatrix::get`], a row outside the matrix has no entries.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (start, end) = if row < self.rows {
            (self.row_ptr[row], self.row_ptr[row + 1])
        } else {
            (0, 0)
        };
        self.col_idx[start..end]
            .iter()
            .copied()
            .zip(self.values[start..end].iter().copied())
    }

    /// Iterate over all stored entries as `(row, col, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.rows).flat_map(move |r| self.row(r).map(move |(c, v)| (r, c, v)))
    }

    /// Multiply matrix by vector: y = A * x.
    pub fn mul_vec(&self, x: &DVector<f64>) -> Result<DVector<f64>> {
        if x.len() != self.cols {
            return Err(MeshError::dimension_mismatch(self.cols, x.len()));
        }

        let mut y = DVector::zeros(self.rows);
        for i in 0..self.rows {
            y[i] = self.row(i).map(|(j, a)| a * x[j]).sum();
        }

        Ok(y)
    }

    /// Element-wise sum of two matrices of the same shape.
    ///
    /// Rows are merged column by column. An entry stored in only one operand
    /// is copied unchanged, so adding matrices with disjoint sparsity
    /// patterns is exact.
    pub fn add(&self, other: &CsrMatrix) -> Result<CsrMatrix> {
        if self.shape() != other.shape() {
            return Err(MeshError::dimension_mismatch(self.shape(), other.shape()));
        }

        let mut row_ptr = Vec::with_capacity(self.rows + 1);
        let mut col_idx = Vec::with_capacity(self.nnz() + other.nnz());
        let mut values = Vec::with_capacity(self.nnz() + other.nnz());
        row_ptr.push(0);

        for r in 0..self.rows {
            let mut a = self.row(r).peekable();
            let mut b = other.row(r).peekable();

            loop {
                let next = match (a.peek().copied(), b.peek().copied()) {
                    (None, None) => break,
                    (Some(ea), None) => {
                        a.next();
                        ea
                    }
                    (None, Some(eb)) => {
                        b.next();
                        eb
                    }
                    (Some((ca, va)), Some((cb, vb))) => {
                        if ca < cb {
                            a.next();
                            (ca, va)
                        } else if cb < ca {
                            b.next();
                            (cb, vb)
                        } else {
                            a.next();
                            b.next();
                            (ca, va + vb)
                        }
                    }
                };
                col_idx.push(next.0);
                values.push(next.1);
            }

            row_ptr.push(col_idx.len());
        }

        Ok(CsrMatrix {
            rows: self.rows,
            cols: self.cols,
            row_ptr,
            col_idx,
            values,
        })
    }

    /// Sum of every row.
    pub fn row_sums(&self) -> DVector<f64> {
        DVector::from_iterator(self.rows, (0..self.rows).map(|r| self.row(r).map(|(_, v)| v).sum()))
    }

    /// Multiply row `i` by `factors[i]`, in place.
    pub fn scale_rows(&mut self, factors: &[f64]) -> Result<()> {
        if factors.len() != self.rows {
            return Err(MeshError::dimension_mismatch(self.rows, factors.len()));
        }

        for (r, &factor) in factors.iter().enumerate() {
            for v in &mut self.values[self.row_ptr[r]..self.row_ptr[r + 1]] {
                *v *= factor;
            }
        }

        Ok(())
    }

    /// Diagonal entries (zero where nothing is stored).
    pub fn diagonal(&self) -> DVector<f64> {
        let n = self.rows.min(self.cols);
        DVector::from_iterator(n, (0..n).map(|i| self.get(i, i).unwrap_or(0.0)))
    }
}
