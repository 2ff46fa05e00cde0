//! LDLᵗ decomposition of symmetric matrices

use super::{
    Decomposition, DecompositionOptions, DiagonalFill, Triangle, check_extract_target,
    extract_triangle, extract_triangle_alloc, forward_unit_lower, singular,
};
use crate::error::Result;
use crate::matrix::Matrix;
use crate::ops::{check_square, multiply_abc, resize_if_needed};

/// LDLᵗ decomposition result: A = L·D·Lᵗ
///
/// L is unit lower triangular and D diagonal. The packed factor holds L
/// strictly below the diagonal, D on it, and Lᵗ mirrored above it. No
/// pivoting is performed, so an indefinite matrix can still fail on a zero
/// leading minor.
#[derive(Debug, Clone)]
pub struct LdltDecomposition<M: Matrix> {
    factor: M,
}

impl<M: Matrix> LdltDecomposition<M> {
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
    /// Only the lower triangle of `a` is read.
    pub fn decompose_in_place_with(mut a: M, options: &DecompositionOptions) -> Result<Self> {
        let n = check_square(&a)?;

        for j in 0..n {
            let mut d = a.get(j, j);
            for k in 0..j {
                let l = a.get(j, k);
                d -= l * l * a.get(k, k);
            }
            if d.is_nan() || d.abs() < options.ldlt_tolerance {
                return Err(singular("ldlt", j, d));
            }
            a.set(j, j, d);

            for i in (j + 1)..n {
                let mut sum = a.get(i, j);
                for k in 0..j {
                    sum -= a.get(i, k) * a.get(j, k) * a.get(k, k);
                }
                let l = sum / d;
                a.set(i, j, l);
                a.set(j, i, l);
            }
        }

        log::trace!(target: "densela::decompose", "ldlt: factored {n}x{n}");
        Ok(Self { factor: a })
    }

    /// Packed L, D and Lᵗ
    pub fn factor(&self) -> &M {
        &self.factor
    }

    /// The diagonal of D
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.order()).map(|i| self.factor.get(i, i)).collect()
    }

    /// Write L (unit diagonal) into `result`
    pub fn extract_lower(&self, result: &mut M) -> Result<()> {
        extract_triangle(&self.factor, Triangle::Lower, DiagonalFill::Unit, result)
    }

    /// Allocating [`LdltDecomposition::extract_lower`]
    pub fn extract_lower_alloc(&self, result: &mut Option<M>) -> Result<()> {
        extract_triangle_alloc(&self.factor, Triangle::Lower, DiagonalFill::Unit, result)
    }

    /// Write Lᵗ (unit diagonal) into `result`
    pub fn extract_upper(&self, result: &mut M) -> Result<()> {
        extract_triangle(&self.factor, Triangle::Upper, DiagonalFill::Unit, result)
    }

    /// Allocating [`LdltDecomposition::extract_upper`]
    pub fn extract_upper_alloc(&self, result: &mut Option<M>) -> Result<()> {
        extract_triangle_alloc(&self.factor, Triangle::Upper, DiagonalFill::Unit, result)
    }

    /// Write D as a full diagonal matrix into `result`
    pub fn extract_diagonal(&self, result: &mut M) -> Result<()> {
        check_extract_target(&self.factor, result)?;
        let n = self.order();
        for i in 0..n {
            for j in 0..n {
                result.set(i, j, if i == j { self.factor.get(i, i) } else { 0.0 });
            }
        }
        Ok(())
    }

    /// Allocating [`LdltDecomposition::extract_diagonal`]
    pub fn extract_diagonal_alloc(&self, result: &mut Option<M>) -> Result<()> {
        let n = self.order();
        self.extract_diagonal(resize_if_needed(&self.factor, result, n, n))
    }

    /// Rebuild `A = L·D·Lᵗ`
    pub fn reconstruct(&self) -> Result<M> {
        let n = self.order();
        let mut l = self.factor.new_matrix(n, n);
        let mut d = self.factor.new_matrix(n, n);
        let mut lt = self.factor.new_matrix(n, n);
        self.extract_lower(&mut l)?;
        self.extract_diagonal(&mut d)?;
        self.extract_upper(&mut lt)?;

        let mut a = self.factor.new_matrix(n, n);
        multiply_abc(&l, &d, &lt, &mut a)?;
        Ok(a)
    }
}

impl<M: Matrix> Decomposition<M> for LdltDecomposition<M> {
    fn order(&self) -> usize {
        self.factor.rows()
    }

    fn template(&self) -> &M {
        &self.factor
    }

    fn solve_slice(&self, rhs: &mut [f64]) {
        let n = self.order();
        forward_unit_lower(&self.factor, rhs);

        for (i, x) in rhs.iter_mut().enumerate() {
            *x /= self.factor.get(i, i);
        }

        // Lᵗ[i,k] = L[k,i]
        for i in (0..n).rev() {
            let mut sum = rhs[i];
            for (k, &xk) in rhs.iter().enumerate().skip(i + 1) {
                sum -= self.factor.get(k, i) * xk;
            }
            rhs[i] = sum;
        }
    }

    fn determinant(&self) -> f64 {
        (0..self.order()).map(|i| self.factor.get(i, i)).product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::matrix::{DenseMatrix, DenseVector, Vector};

    fn indefinite() -> DenseMatrix {
        DenseMatrix::from_rows(&[
            vec![4.0, 2.0, -2.0],
            vec![2.0, -3.0, 1.0],
            vec![-2.0, 1.0, 5.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_factors_indefinite_symmetric() {
        let a = indefinite();
        let ldlt = LdltDecomposition::decompose(&a).unwrap();

        // d0 = 4, l10 = 0.5, d1 = -3 - 0.25*4 = -4
        assert_eq!(ldlt.diagonal()[..2], [4.0, -4.0]);
        assert_eq!(ldlt.factor().get(1, 0), 0.5);
        assert_eq!(ldlt.factor().get(0, 1), 0.5);

        let back = ldlt.reconstruct().unwrap();
        for (x, y) in back.to_array().iter().zip(a.to_array()) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_solve_and_determinant() {
        let a = indefinite();
        let ldlt = LdltDecomposition::decompose(&a).unwrap();
        let x_true = DenseVector::from_slice(&[1.0, -2.0, 0.5]);
        let mut b = DenseVector::zeros(3);
        crate::ops::multiply_vector(&a, &x_true, &mut b).unwrap();

        let mut x = DenseVector::zeros(3);
        ldlt.solve(&b, &mut x).unwrap();
        for i in 0..3 {
            assert!((x.get(i) - x_true.get(i)).abs() < 1e-12);
        }

        let reference = crate::algorithm::linalg::cofactor_determinant(&a).unwrap();
        assert!((ldlt.determinant() - reference).abs() < 1e-10);
    }

    #[test]
    fn test_zero_leading_minor() {
        let a = DenseMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        assert!(matches!(
            LdltDecomposition::decompose(&a),
            Err(Error::SingularMatrix { op: "ldlt", index: 0, .. })
        ));
    }

    #[test]
    fn test_nan_pivot_rejected() {
        let a = DenseMatrix::from_rows(&[vec![1.0, 0.0], vec![0.0, f64::NAN]]).unwrap();
        assert!(matches!(
            LdltDecomposition::decompose(&a),
            Err(Error::SingularMatrix { op: "ldlt", index: 1, .. })
        ));
    }

    #[test]
    fn test_extract_diagonal() {
        let ldlt = LdltDecomposition::decompose(&indefinite()).unwrap();
        let mut d = None;
        ldlt.extract_diagonal_alloc(&mut d).unwrap();
        let d = d.unwrap();
        assert_eq!(d.get(1, 1), -4.0);
        assert_eq!(d.get(0, 1), 0.0);

        let mut alias = ldlt.factor().clone();
        assert!(ldlt.extract_diagonal(&mut alias).is_err());
    }
}
