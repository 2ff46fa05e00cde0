//! Direct decompositions of square matrices
//!
//! Four factorizations are provided, each as a result type produced by a
//! `decompose` constructor:
//!
//! | Type | Factorization | Requirements |
//! |------|---------------|--------------|
//! | [`LuDecomposition`] | `P·A = L·U`, partial pivoting | invertible |
//! | [`LdltDecomposition`] | `A = L·D·Lᵗ` | symmetric, non-zero pivots |
//! | [`CholeskyDecomposition`] | `A = L·Lᵗ` | symmetric positive definite |
//! | [`QrDecomposition`] | `A = Q·R`, Gram-Schmidt | invertible |
//!
//! LU, LDLT and Cholesky keep both triangular factors packed in a single
//! matrix of the input's shape; QR keeps `Q` and `R` separately.
//!
//! All of them implement [`Decomposition`], which supplies vector and matrix
//! solves, inverses and determinants on top of a single in-place
//! substitution routine.

mod cholesky;
mod ldlt;
mod lu;
mod qr;

pub use cholesky::CholeskyDecomposition;
pub use ldlt::LdltDecomposition;
pub use lu::LuDecomposition;
pub use qr::QrDecomposition;

use crate::error::{Error, Result};
use crate::matrix::{Matrix, Vector};
use crate::ops::{check_len, check_shape, check_square, resize_if_needed, resize_vector_if_needed};

/// Smallest pivot magnitude LU accepts
pub const LU_PIVOT_TOLERANCE: f64 = 1e-20;

/// Default tolerance of the LDLT, Cholesky and QR breakdown checks
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Breakdown thresholds for the decompositions
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DecompositionOptions {
    /// LU rejects pivots with `|pivot| <` this
    pub lu_pivot_tolerance: f64,
    /// LDLT rejects diagonal entries with `|d| <` this
    pub ldlt_tolerance: f64,
    /// Cholesky rejects radicands below this
    pub cholesky_tolerance: f64,
    /// QR rejects Gram-Schmidt residual norms below this
    pub qr_tolerance: f64,
}

impl Default for DecompositionOptions {
    fn default() -> Self {
        Self {
            lu_pivot_tolerance: LU_PIVOT_TOLERANCE,
            ldlt_tolerance: DEFAULT_TOLERANCE,
            cholesky_tolerance: DEFAULT_TOLERANCE,
            qr_tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl DecompositionOptions {
    /// Set the LU pivot tolerance
    pub fn with_lu_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.lu_pivot_tolerance = tolerance;
        self
    }

    /// Set the LDLT diagonal tolerance
    pub fn with_ldlt_tolerance(mut self, tolerance: f64) -> Self {
        self.ldlt_tolerance = tolerance;
        self
    }

    /// Set the Cholesky radicand tolerance
    pub fn with_cholesky_tolerance(mut self, tolerance: f64) -> Self {
        self.cholesky_tolerance = tolerance;
        self
    }

    /// Set the QR residual-norm tolerance
    pub fn with_qr_tolerance(mut self, tolerance: f64) -> Self {
        self.qr_tolerance = tolerance;
        self
    }
}

/// Operations shared by every factorization of a square matrix `A`
pub trait Decomposition<M: Matrix> {
    /// Order `n` of the factored matrix
    fn order(&self) -> usize;

    /// A matrix of the factored family, used as the template for results
    fn template(&self) -> &M;

    /// Overwrite `rhs` (length `n`) with the solution `x` of `A·x = rhs`
    fn solve_slice(&self, rhs: &mut [f64]);

    /// Determinant of `A`
    fn determinant(&self) -> f64;

    /// Solve `A·x = b`
    ///
    /// `x` may share storage with `b`.
    fn solve(&self, b: &M::Vector, x: &mut M::Vector) -> Result<()> {
        let n = self.order();
        check_len(b, n)?;
        check_len(x, n)?;
        let mut work = b.to_vec();
        self.solve_slice(&mut work);
        for (i, v) in work.into_iter().enumerate() {
            x.set(i, v);
        }
        Ok(())
    }

    /// Solve `A·x = b`, allocating `x` when absent or wrongly sized
    fn solve_alloc(&self, b: &M::Vector, x: &mut Option<M::Vector>) -> Result<()> {
        let n = self.order();
        check_len(b, n)?;
        self.solve(b, resize_vector_if_needed(self.template(), x, n))
    }

    /// Solve `A·X = B` column by column
    ///
    /// `B` must have `n` rows; `X` has the shape of `B` and may share its
    /// storage.
    fn solve_matrix(&self, b: &M, x: &mut M) -> Result<()> {
        let n = self.order();
        check_shape(b, (n, b.cols()))?;
        check_shape(x, b.shape())?;
        let mut work = vec![0.0; n];
        for j in 0..b.cols() {
            for (i, w) in work.iter_mut().enumerate() {
                *w = b.get(i, j);
            }
            self.solve_slice(&mut work);
            for (i, &w) in work.iter().enumerate() {
                x.set(i, j, w);
            }
        }
        Ok(())
    }

    /// Allocating [`Decomposition::solve_matrix`]
    fn solve_matrix_alloc(&self, b: &M, x: &mut Option<M>) -> Result<()> {
        let n = self.order();
        check_shape(b, (n, b.cols()))?;
        self.solve_matrix(b, resize_if_needed(self.template(), x, n, b.cols()))
    }

    /// Write `A⁻¹` into `result` by solving against each unit basis vector
    fn inverse(&self, result: &mut M) -> Result<()> {
        let n = self.order();
        check_shape(result, (n, n))?;
        let mut work = vec![0.0; n];
        for j in 0..n {
            work.fill(0.0);
            work[j] = 1.0;
            self.solve_slice(&mut work);
            for (i, &w) in work.iter().enumerate() {
                result.set(i, j, w);
            }
        }
        Ok(())
    }

    /// Allocating [`Decomposition::inverse`]
    fn inverse_alloc(&self, result: &mut Option<M>) -> Result<()> {
        let n = self.order();
        self.inverse(resize_if_needed(self.template(), result, n, n))
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Which part of a packed factor to extract
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Triangle {
    /// Strictly below the diagonal, plus the diagonal
    Lower,
    /// Strictly above the diagonal, plus the diagonal
    Upper,
}

/// How the diagonal of an extracted triangle is filled
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DiagonalFill {
    /// Copy the packed diagonal
    Stored,
    /// Implicit unit diagonal
    Unit,
}

/// Validate an extraction target: same shape as the factor, distinct storage
pub(crate) fn check_extract_target<M: Matrix>(factor: &M, result: &M) -> Result<()> {
    check_shape(result, factor.shape())?;
    if result.shares_storage(factor) {
        return Err(Error::aliased("extract"));
    }
    Ok(())
}

/// Copy one triangle of a packed factor into a zeroed `result`
pub(crate) fn extract_triangle<M: Matrix>(
    factor: &M,
    triangle: Triangle,
    diagonal: DiagonalFill,
    result: &mut M,
) -> Result<()> {
    check_extract_target(factor, result)?;
    let n = factor.rows();
    for i in 0..n {
        for j in 0..n {
            let v = match (i.cmp(&j), triangle) {
                (std::cmp::Ordering::Equal, _) => match diagonal {
                    DiagonalFill::Stored => factor.get(i, i),
                    DiagonalFill::Unit => 1.0,
                },
                (std::cmp::Ordering::Greater, Triangle::Lower)
                | (std::cmp::Ordering::Less, Triangle::Upper) => factor.get(i, j),
                _ => 0.0,
            };
            result.set(i, j, v);
        }
    }
    Ok(())
}

/// Allocating [`extract_triangle`]
pub(crate) fn extract_triangle_alloc<M: Matrix>(
    factor: &M,
    triangle: Triangle,
    diagonal: DiagonalFill,
    result: &mut Option<M>,
) -> Result<()> {
    let (rows, cols) = factor.shape();
    extract_triangle(factor, triangle, diagonal, resize_if_needed(factor, result, rows, cols))
}

/// Forward substitution with the strictly lower part of `factor` and a unit diagonal
pub(crate) fn forward_unit_lower<M: Matrix>(factor: &M, x: &mut [f64]) {
    for i in 0..x.len() {
        let mut sum = x[i];
        for (k, &xk) in x[..i].iter().enumerate() {
            sum -= factor.get(i, k) * xk;
        }
        x[i] = sum;
    }
}

/// Determinant by cofactor (Laplace) expansion along the first row
///
/// Exponential in the order of the matrix; meant as a reference for small
/// matrices.
pub fn cofactor_determinant<M: Matrix>(a: &M) -> Result<f64> {
    let n = check_square(a)?;
    let rows: Vec<usize> = (0..n).collect();
    let cols: Vec<usize> = (0..n).collect();
    Ok(cofactor_expand(a, &rows, &cols))
}

fn cofactor_expand<M: Matrix>(a: &M, rows: &[usize], cols: &[usize]) -> f64 {
    match cols.len() {
        1 => a.get(rows[0], cols[0]),
        2 => {
            a.get(rows[0], cols[0]) * a.get(rows[1], cols[1])
                - a.get(rows[0], cols[1]) * a.get(rows[1], cols[0])
        }
        _ => {
            let mut det = 0.0;
            let mut sign = 1.0;
            let mut minor_cols = Vec::with_capacity(cols.len() - 1);
            for (skip, &c) in cols.iter().enumerate() {
                minor_cols.clear();
                minor_cols.extend(
                    cols.iter()
                        .enumerate()
                        .filter(|&(k, _)| k != skip)
                        .map(|(_, &k)| k),
                );
                let entry = a.get(rows[0], c);
                if entry != 0.0 {
                    det += sign * entry * cofactor_expand(a, &rows[1..], &minor_cols);
                }
                sign = -sign;
            }
            det
        }
    }
}

/// Log a breakdown and build the error for it
pub(crate) fn singular(op: &'static str, index: usize, value: f64) -> Error {
    log::debug!(target: "densela::decompose", "{op}: breakdown at {index}, value {value:e}");
    Error::SingularMatrix { op, index, value }
}
