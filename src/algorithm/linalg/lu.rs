//! LU decomposition with partial pivoting (Doolittle algorithm)

use super::{
    Decomposition, DecompositionOptions, DiagonalFill, Triangle, extract_triangle,
    extract_triangle_alloc, forward_unit_lower, singular,
};
use crate::error::Result;
use crate::matrix::Matrix;
use crate::ops::{check_shape, check_square, multiply, resize_if_needed};

/// LU decomposition result: P·A = L·U
///
/// L is lower triangular with unit diagonal, U is upper triangular. Both are
/// packed into one matrix: L strictly below the diagonal (its unit diagonal
/// is implicit), U on and above it. P is stored as a permutation vector.
#[derive(Debug, Clone)]
pub struct LuDecomposition<M: Matrix> {
    lu: M,
    permutation: Vec<usize>,
    toggle: f64,
}

impl<M: Matrix> LuDecomposition<M> {
    /// Decompose a copy of `a` with default tolerances
    pub fn decompose(a: &M) -> Result<Self> {
        Self::decompose_with(a, &DecompositionOptions::default())
    }

    /// Decompose a copy of `a`
    pub fn decompose_with(a: &M, options: &DecompositionOptions) -> Result<Self> {
        check_square(a)?;
        let mut lu = a.new_matrix(a.rows(), a.cols());
        lu.copy_from(a);
        Self::decompose_in_place_with(lu, options)
    }

    /// Decompose `a`, reusing its storage for the packed factors
    pub fn decompose_in_place(a: M) -> Result<Self> {
        Self::decompose_in_place_with(a, &DecompositionOptions::default())
    }

    /// Decompose `a` in place with explicit tolerances
    pub fn decompose_in_place_with(mut a: M, options: &DecompositionOptions) -> Result<Self> {
        let n = check_square(&a)?;
        let mut permutation: Vec<usize> = (0..n).collect();
        let mut toggle = 1.0;

        for col in 0..n {
            // Find pivot: max absolute value in column col, rows col..n
            let mut pivot_row = col;
            let mut max_val = a.get(col, col).abs();
            for row in (col + 1)..n {
                let val = a.get(row, col).abs();
                if val > max_val {
                    max_val = val;
                    pivot_row = row;
                }
            }

            if pivot_row != col {
                for j in 0..n {
                    let tmp = a.get(col, j);
                    a.set(col, j, a.get(pivot_row, j));
                    a.set(pivot_row, j, tmp);
                }
                permutation.swap(col, pivot_row);
                toggle = -toggle;
            }

            let pivot = a.get(col, col);
            if pivot.is_nan() || pivot.abs() < options.lu_pivot_tolerance {
                return Err(singular("lu", col, pivot));
            }

            // Multipliers (L column), then the trailing update
            for row in (col + 1)..n {
                let multiplier = a.get(row, col) / pivot;
                a.set(row, col, multiplier);
                for j in (col + 1)..n {
                    a.set(row, j, a.get(row, j) - multiplier * a.get(col, j));
                }
            }
        }

        log::trace!(target: "densela::decompose", "lu: factored {n}x{n}, toggle {toggle}");
        Ok(Self {
            lu: a,
            permutation,
            toggle,
        })
    }

    /// Packed L and U factors
    pub fn lu(&self) -> &M {
        &self.lu
    }

    /// Row permutation: `permutation()[i]` is the original row now at position `i`
    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    /// `+1.0` after an even number of row swaps, `-1.0` after an odd number
    pub fn toggle(&self) -> f64 {
        self.toggle
    }

    /// Consume the decomposition, returning `(lu, permutation, toggle)`
    pub fn into_parts(self) -> (M, Vec<usize>, f64) {
        (self.lu, self.permutation, self.toggle)
    }

    /// Write L (unit diagonal) into `result`
    pub fn extract_lower(&self, result: &mut M) -> Result<()> {
        extract_triangle(&self.lu, Triangle::Lower, DiagonalFill::Unit, result)
    }

    /// Allocating [`LuDecomposition::extract_lower`]
    pub fn extract_lower_alloc(&self, result: &mut Option<M>) -> Result<()> {
        extract_triangle_alloc(&self.lu, Triangle::Lower, DiagonalFill::Unit, result)
    }

    /// Write U into `result`
    pub fn extract_upper(&self, result: &mut M) -> Result<()> {
        extract_triangle(&self.lu, Triangle::Upper, DiagonalFill::Stored, result)
    }

    /// Allocating [`LuDecomposition::extract_upper`]
    pub fn extract_upper_alloc(&self, result: &mut Option<M>) -> Result<()> {
        extract_triangle_alloc(&self.lu, Triangle::Upper, DiagonalFill::Stored, result)
    }

    /// The permutation as a matrix P with `P·A = L·U`
    pub fn permutation_matrix(&self) -> M {
        let n = self.order();
        let mut p = self.lu.new_matrix(n, n);
        for (i, &src) in self.permutation.iter().enumerate() {
            p.set(i, src, 1.0);
        }
        p
    }

    /// Apply the inverse row permutation: row `i` of `m` becomes row
    /// `permutation()[i]` of `result`
    ///
    /// `result` may share storage with `m`.
    pub fn unpermute(&self, m: &M, result: &mut M) -> Result<()> {
        let n = self.order();
        check_shape(m, (n, m.cols()))?;
        check_shape(result, m.shape())?;
        for (i, &dst) in self.permutation.iter().enumerate() {
            for j in 0..m.cols() {
                result.set(dst, j, m.get(i, j));
            }
        }
        Ok(())
    }

    /// Allocating [`LuDecomposition::unpermute`]
    pub fn unpermute_alloc(&self, m: &M, result: &mut Option<M>) -> Result<()> {
        let (rows, cols) = m.shape();
        self.unpermute(m, resize_if_needed(m, result, rows, cols))
    }

    /// Rebuild `A = P⁻¹·L·U`
    pub fn reconstruct(&self) -> Result<M> {
        let n = self.order();
        let mut l = self.lu.new_matrix(n, n);
        let mut u = self.lu.new_matrix(n, n);
        self.extract_lower(&mut l)?;
        self.extract_upper(&mut u)?;

        let mut product = self.lu.new_matrix(n, n);
        multiply(&l, &u, &mut product)?;
        let mut a = self.lu.new_matrix(n, n);
        self.unpermute(&product, &mut a)?;
        Ok(a)
    }
}

impl<M: Matrix> Decomposition<M> for LuDecomposition<M> {
    fn order(&self) -> usize {
        self.lu.rows()
    }

    fn template(&self) -> &M {
        &self.lu
    }

    fn solve_slice(&self, rhs: &mut [f64]) {
        let n = self.order();
        let permuted: Vec<f64> = self.permutation.iter().map(|&p| rhs[p]).collect();
        rhs.copy_from_slice(&permuted);

        forward_unit_lower(&self.lu, rhs);

        // Back substitution with U
        for i in (0..n).rev() {
            let mut sum = rhs[i];
            for (j, &xj) in rhs.iter().enumerate().skip(i + 1) {
                sum -= self.lu.get(i, j) * xj;
            }
            rhs[i] = sum / self.lu.get(i, i);
        }
    }

    fn determinant(&self) -> f64 {
        (0..self.order()).fold(self.toggle, |det, i| det * self.lu.get(i, i))
    }
}
