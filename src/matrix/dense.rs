//! Row-major dense matrix

use super::id::StorageId;
use super::vector::DenseVector;
use super::Matrix;
use crate::error::{Error, Result};
use std::sync::Arc;

/// Dense matrix stored as one contiguous row-major buffer
///
/// `DenseMatrix` is a handle: `clone` is cheap and yields a second handle on
/// the same buffer (same [`StorageId`]). The first write through a shared
/// handle detaches it onto a private copy, so handles never observe each
/// other's writes.
///
/// # Example
///
/// ```
/// use densela::prelude::*;
///
/// let m = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]])?;
/// assert_eq!(m.get(1, 0), 3.0);
/// assert_eq!(m.get_flat(3), 4.0);
/// # Ok::<(), densela::error::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Arc<Vec<f64>>,
}

impl DenseMatrix {
    /// Create a zero-filled matrix
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero. For a fallible alternative, use
    /// [`Self::try_zeros`].
    pub fn zeros(rows: usize, cols: usize) -> Self {
        assert!(
            rows > 0 && cols > 0,
            "DenseMatrix::zeros: dimensions must be positive, got {rows}x{cols}"
        );
        Self {
            rows,
            cols,
            data: Arc::new(vec![0.0; rows * cols]),
        }
    }

    /// Create a zero-filled matrix (fallible version)
    pub fn try_zeros(rows: usize, cols: usize) -> Result<Self> {
        validate_dims(rows, cols)?;
        Ok(Self::zeros(rows, cols))
    }

    /// Create an `n x n` identity matrix
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        {
            let data = m.as_mut_slice();
            for i in 0..n {
                data[i * n + i] = 1.0;
            }
        }
        m
    }

    /// Create a matrix from row-major data
    ///
    /// Returns an error if `data.len()` does not equal `rows * cols`.
    pub fn from_slice(data: &[f64], rows: usize, cols: usize) -> Result<Self> {
        validate_dims(rows, cols)?;
        if data.len() != rows * cols {
            return Err(Error::shape_mismatch((rows, cols), (data.len(), 1)));
        }
        Ok(Self {
            rows,
            cols,
            data: Arc::new(data.to_vec()),
        })
    }

    /// Create a matrix from a slice of equally long rows
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let (r, c) = rows_shape(rows)?;
        let mut data = Vec::with_capacity(r * c);
        for row in rows {
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: r,
            cols: c,
            data: Arc::new(data),
        })
    }

    /// Create a matrix whose element `(i, j)` is `f(i, j)`
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut m = Self::zeros(rows, cols);
        {
            let data = m.as_mut_slice();
            for i in 0..rows {
                for j in 0..cols {
                    data[i * cols + j] = f(i, j);
                }
            }
        }
        m
    }

    /// Row-major view of the elements
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major view of the elements
    ///
    /// Detaches this handle from any other handle sharing the buffer.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// Row `row` as a slice
    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }
}

impl Matrix for DenseMatrix {
    type Vector = DenseVector;

    #[inline]
    fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.rows && col < self.cols);
        let cols = self.cols;
        self.as_mut_slice()[row * cols + col] = value;
    }

    fn new_matrix(&self, rows: usize, cols: usize) -> Self {
        Self::zeros(rows, cols)
    }

    fn new_vector(&self, len: usize) -> DenseVector {
        DenseVector::zeros(len)
    }

    #[inline]
    fn storage_id(&self) -> StorageId {
        StorageId::of(&self.data)
    }

    #[inline]
    fn get_flat(&self, flat: usize) -> f64 {
        self.data[flat]
    }

    #[inline]
    fn set_flat(&mut self, flat: usize, value: f64) {
        self.as_mut_slice()[flat] = value;
    }

    fn to_array(&self) -> Vec<f64> {
        self.data.as_ref().clone()
    }
}

impl PartialEq for DenseMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.data == other.data
    }
}

pub(super) fn validate_dims(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(Error::invalid_argument(
            "shape",
            format!("dimensions must be positive, got {rows}x{cols}"),
        ));
    }
    Ok(())
}

pub(super) fn rows_shape(rows: &[Vec<f64>]) -> Result<(usize, usize)> {
    let r = rows.len();
    let c = rows.first().map_or(0, Vec::len);
    validate_dims(r, c)?;
    for row in rows {
        if row.len() != c {
            return Err(Error::shape_mismatch((r, c), (r, row.len())));
        }
    }
    Ok((r, c))
}
