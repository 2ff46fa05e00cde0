//! Cholesky decomposition (Cholesky-Banachiewicz algorithm)

use super::{
    Decomposition, DecompositionOptions, DiagonalFill, Triangle, extract_triangle,
    extract_triangle_alloc, singular,
};
use crate::error::Result;
use crate::matrix::Matrix;
use crate::ops::{check_square, multiply_mat_transp};

/// Cholesky decomposition result: A = L·Lᵗ
///
/// L is lower triangular with a positive diagonal. The packed factor holds L
/// on and below the diagonal and Lᵗ mirrored above it.
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition<M: Matrix> {
    factor: M,
}

impl<M: Matrix> CholeskyDecomposition<M> {
    /// Decompose a copy of `a` with the default tolerance
    pub fn decompose(a: &M) -> Result<Self> {
        Self::decompose_with(a, &DecompositionOptions::default())
    }

    /// Decompose a copy of `a`
    pub fn decompose_with(a: &M, options: &DecompositionOptions) -> Result<Self> {
        check_square(a)?;
        let mut factor = a.new_matrix(a.rows(), a.cols());
        factor.copy_from(a);
        Self::decompose_in_place_with(factor, options)
    }

    /// Decompose `a`, reusing its storage for the packed factor
    pub fn decompose_in_place(a: M) -> Result<Self> {
        Self::decompose_in_place_with(a, &DecompositionOptions::default())
    }

    /// Decompose `a` in place with an explicit tolerance
    ///
    /// Only the lower triangle of `a` is read. Fails with `SingularMatrix`
    /// when a radicand drops below the tolerance, which means `a` is not
    /// positive definite.
    pub fn decompose_in_place_with(mut a: M, options: &DecompositionOptions) -> Result<Self> {
        let n = check_square(&a)?;

        for j in 0..n {
            let mut radicand = a.get(j, j);
            for k in 0..j {
                let l = a.get(j, k);
                radicand -= l * l;
            }
            if radicand.is_nan() || radicand < options.cholesky_tolerance {
                return Err(singular("cholesky", j, radicand));
            }
            let diag = radicand.sqrt();
            a.set(j, j, diag);

            for i in (j + 1)..n {
                let mut sum = a.get(i, j);
                for k in 0..j {
                    sum -= a.get(i, k) * a.get(j, k);
                }
                let l = sum / diag;
                a.set(i, j, l);
                a.set(j, i, l);
            }
        }

        log::trace!(target: "densela::decompose", "cholesky: factored {n}x{n}");
        Ok(Self { factor: a })
    }

    /// Packed L and Lᵗ
    pub fn factor(&self) -> &M {
        &self.factor
    }

    /// Write L into `result`
    pub fn extract_lower(&self, result: &mut M) -> Result<()> {
        extract_triangle(&self.factor, Triangle::Lower, DiagonalFill::Stored, result)
    }

    /// Allocating [`CholeskyDecomposition::extract_lower`]
    pub fn extract_lower_alloc(&self, result: &mut Option<M>) -> Result<()> {
        extract_triangle_alloc(&self.factor, Triangle::Lower, DiagonalFill::Stored, result)
    }

    /// Write Lᵗ into `result`
    pub fn extract_upper(&self, result: &mut M) -> Result<()> {
        extract_triangle(&self.factor, Triangle::Upper, DiagonalFill::Stored, result)
    }

    /// Allocating [`CholeskyDecomposition::extract_upper`]
    pub fn extract_upper_alloc(&self, result: &mut Option<M>) -> Result<()> {
        extract_triangle_alloc(&self.factor, Triangle::Upper, DiagonalFill::Stored, result)
    }

    /// Rebuild `A = L·Lᵗ`
    pub fn reconstruct(&self) -> Result<M> {
        let n = self.order();
        let mut l = self.factor.new_matrix(n, n);
        self.extract_lower(&mut l)?;
        let mut a = self.factor.new_matrix(n, n);
        multiply_mat_transp(&l, &l, &mut a)?;
        Ok(a)
    }
}

impl<M: Matrix> Decomposition<M> for CholeskyDecomposition<M> {
    fn order(&self) -> usize {
        self.factor.rows()
    }

    fn template(&self) -> &M {
        &self.factor
    }

    fn solve_slice(&self, rhs: &mut [f64]) {
        let n = self.order();

        // L·y = b
        for i in 0..n {
            let mut sum = rhs[i];
            for (k, &yk) in rhs[..i].iter().enumerate() {
                sum -= self.factor.get(i, k) * yk;
            }
            rhs[i] = sum / self.factor.get(i, i);
        }

        // Lᵗ·x = y, reading Lᵗ[i,k] as L[k,i]
        for i in (0..n).rev() {
            let mut sum = rhs[i];
            for (k, &xk) in rhs.iter().enumerate().skip(i + 1) {
                sum -= self.factor.get(k, i) * xk;
            }
            rhs[i] = sum / self.factor.get(i, i);
        }
    }

    fn determinant(&self) -> f64 {
        let product: f64 = (0..self.order()).map(|i| self.factor.get(i, i)).product();
        product * product
    }
}
