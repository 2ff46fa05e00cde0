//! Row-of-rows matrix

use super::dense::{rows_shape, validate_dims};
use super::id::StorageId;
use super::vector::DenseVector;
use super::Matrix;
use crate::error::Result;
use std::sync::Arc;

/// Matrix stored as one `Vec` per row
///
/// Shares the handle semantics of [`super::DenseMatrix`]: clones alias the
/// same rows until one of them is written.
#[derive(Clone, Debug)]
pub struct JaggedMatrix {
    cols: usize,
    data: Arc<Vec<Vec<f64>>>,
}

impl JaggedMatrix {
    /// Create a zero-filled matrix
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        assert!(
            rows > 0 && cols > 0,
            "JaggedMatrix::zeros: dimensions must be positive, got {rows}x{cols}"
        );
        Self {
            cols,
            data: Arc::new(vec![vec![0.0; cols]; rows]),
        }
    }

    /// Create a zero-filled matrix (fallible version)
    pub fn try_zeros(rows: usize, cols: usize) -> Result<Self> {
        validate_dims(rows, cols)?;
        Ok(Self::zeros(rows, cols))
    }

    /// Create a matrix from a slice of equally long rows
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let (_, cols) = rows_shape(rows)?;
        Ok(Self {
            cols,
            data: Arc::new(rows.to_vec()),
        })
    }

    /// Copy any other matrix into the jagged layout
    pub fn from_matrix<M: Matrix>(m: &M) -> Self {
        Self {
            cols: m.cols(),
            data: Arc::new(m.to_jagged_array()),
        }
    }

    /// Row `row` as a slice
    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row]
    }
}

impl Matrix for JaggedMatrix {
    type Vector = DenseVector;

    #[inline]
    fn rows(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, value: f64) {
        Arc::make_mut(&mut self.data)[row][col] = value;
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

    fn to_jagged_array(&self) -> Vec<Vec<f64>> {
        self.data.as_ref().clone()
    }
}
