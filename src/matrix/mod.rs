//! Matrix and vector capability contracts
//!
//! Every algorithm in this crate is written against the [`Matrix`] and
//! [`Vector`] traits rather than a concrete representation. Companions of the
//! same family are created through [`Matrix::new_matrix`] and
//! [`Matrix::new_vector`], so a generic routine handed a [`JaggedMatrix`]
//! produces jagged results and one handed a [`DenseMatrix`] produces dense
//! ones.
//!
//! Elements are addressed either by `(row, col)` or by the row-major flat
//! index `row * cols + col`.

mod dense;
mod id;
mod jagged;
mod vector;

pub use dense::DenseMatrix;
pub use id::StorageId;
pub use jagged::JaggedMatrix;
pub use vector::{DenseVector, Vector};

use std::fmt;

/// A dense, rectangular, mutable matrix of `f64` elements
pub trait Matrix: Clone + fmt::Debug + Send + Sync + Sized {
    /// Vector family produced by [`Matrix::new_vector`]
    type Vector: Vector;

    /// Number of rows
    fn rows(&self) -> usize;

    /// Number of columns
    fn cols(&self) -> usize;

    /// Read element `(row, col)`
    fn get(&self, row: usize, col: usize) -> f64;

    /// Write element `(row, col)`
    fn set(&mut self, row: usize, col: usize, value: f64);

    /// New zero-filled matrix of the same concrete family
    fn new_matrix(&self, rows: usize, cols: usize) -> Self;

    /// New zero-filled vector of a compatible family
    fn new_vector(&self, len: usize) -> Self::Vector;

    /// Identity of the backing store
    fn storage_id(&self) -> StorageId;

    /// `(rows, cols)`
    #[inline]
    fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// Total number of elements
    #[inline]
    fn len(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Always false: matrices have at least one row and one column
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major flat index of `(row, col)`
    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols() + col
    }

    /// `(row, col)` of a row-major flat index
    #[inline]
    fn indices(&self, flat: usize) -> (usize, usize) {
        (flat / self.cols(), flat % self.cols())
    }

    /// Read the element at a flat index
    #[inline]
    fn get_flat(&self, flat: usize) -> f64 {
        let (row, col) = self.indices(flat);
        self.get(row, col)
    }

    /// Write the element at a flat index
    #[inline]
    fn set_flat(&mut self, flat: usize, value: f64) {
        let (row, col) = self.indices(flat);
        self.set(row, col, value);
    }

    /// True if `other` reads and writes the same backing store
    #[inline]
    fn shares_storage<N: Matrix>(&self, other: &N) -> bool {
        self.storage_id() == other.storage_id()
    }

    /// Whether rows == cols
    #[inline]
    fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// Sum of the main diagonal
    fn trace(&self) -> f64 {
        (0..self.rows().min(self.cols()))
            .map(|i| self.get(i, i))
            .sum()
    }

    /// Square root of the sum of squared elements
    fn norm_frobenius(&self) -> f64 {
        let mut sum = 0.0;
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                let v = self.get(i, j);
                sum += v * v;
            }
        }
        sum.sqrt()
    }

    /// Whether the matrix is square and `|a[i,j] - a[j,i]| <= tolerance` everywhere
    fn is_symmetric(&self, tolerance: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.rows();
        for i in 0..n {
            for j in (i + 1)..n {
                if (self.get(i, j) - self.get(j, i)).abs() > tolerance {
                    return false;
                }
            }
        }
        true
    }

    /// Copy every element of `other` into `self`
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    fn copy_from<N: Matrix>(&mut self, other: &N) {
        assert_eq!(self.shape(), other.shape(), "copy_from: shape mismatch");
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                self.set(i, j, other.get(i, j));
            }
        }
    }

    /// Row-major copy of all elements
    fn to_array(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.len());
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                out.push(self.get(i, j));
            }
        }
        out
    }

    /// Copy of all elements as one `Vec` per row
    fn to_jagged_array(&self) -> Vec<Vec<f64>> {
        (0..self.rows())
            .map(|i| (0..self.cols()).map(|j| self.get(i, j)).collect())
            .collect()
    }
}
