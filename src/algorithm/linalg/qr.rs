//! QR decomposition by Gram-Schmidt orthogonalization

use std::sync::OnceLock;

use super::{Decomposition, DecompositionOptions, LuDecomposition, check_extract_target};
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::ops::{check_square, copy, multiply, resize_if_needed};

/// QR decomposition result: A = Q·R
///
/// Q is orthogonal, R is upper triangular with a positive diagonal.
#[derive(Debug, Clone)]
pub struct QrDecomposition<M: Matrix> {
    q: M,
    r: M,
    q_determinant: OnceLock<f64>,
}

impl<M: Matrix> QrDecomposition<M> {
    /// Decompose a copy of `a` with the default tolerance
    pub fn decompose(a: &M) -> Result<Self> {
        Self::decompose_with(a, &DecompositionOptions::default())
    }

    /// Decompose a copy of `a`
    pub fn decompose_with(a: &M, options: &DecompositionOptions) -> Result<Self> {
        check_square(a)?;
        let mut q = a.new_matrix(a.rows(), a.cols());
        q.copy_from(a);
        Self::decompose_in_place_with(q, options)
    }

    /// Decompose `a`, reusing its storage for Q
    pub fn decompose_in_place(a: M) -> Result<Self> {
        Self::decompose_in_place_with(a, &DecompositionOptions::default())
    }

    /// Decompose `a` in place with an explicit tolerance
    ///
    /// Column `j` of `a` is replaced by `q_j` once it has been orthogonalized
    /// against `q_0 .. q_{j-1}`; later columns are still read as the original.
    pub fn decompose_in_place_with(mut a: M, options: &DecompositionOptions) -> Result<Self> {
        let n = check_square(&a)?;
        let mut r = a.new_matrix(n, n);
        let mut v = vec![0.0; n];

        for j in 0..n {
            for (i, vi) in v.iter_mut().enumerate() {
                *vi = a.get(i, j);
            }
            for k in 0..j {
                let rkj = r.get(k, j);
                for (i, vi) in v.iter_mut().enumerate() {
                    *vi -= rkj * a.get(i, k);
                }
            }

            let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm.is_nan() || norm < options.qr_tolerance {
                log::debug!(
                    target: "densela::decompose",
                    "qr: column {j} collapsed, norm {norm:e}"
                );
                return Err(Error::RankDeficiency { column: j, norm });
            }
            for (i, &vi) in v.iter().enumerate() {
                a.set(i, j, vi / norm);
            }

            r.set(j, j, norm);
            for l in (j + 1)..n {
                let dot: f64 = (0..n).map(|i| a.get(i, j) * a.get(i, l)).sum();
                r.set(j, l, dot);
            }
        }

        log::trace!(target: "densela::decompose", "qr: factored {n}x{n}");
        Ok(Self {
            q: a,
            r,
            q_determinant: OnceLock::new(),
        })
    }

    /// The orthogonal factor
    pub fn q(&self) -> &M {
        &self.q
    }

    /// The upper triangular factor
    pub fn r(&self) -> &M {
        &self.r
    }

    /// `det(Q)`: `+1.0` or `-1.0`
    ///
    /// Computed from an LU of Q on first use and cached.
    pub fn q_determinant(&self) -> f64 {
        *self.q_determinant.get_or_init(|| {
            LuDecomposition::decompose(&self.q).map_or(0.0, |lu| lu.determinant().signum())
        })
    }

    /// Consume the decomposition, returning `(q, r)`
    pub fn into_parts(self) -> (M, M) {
        (self.q, self.r)
    }

    /// Copy Q into `result`
    pub fn extract_q(&self, result: &mut M) -> Result<()> {
        check_extract_target(&self.q, result)?;
        copy(&self.q, result);
        Ok(())
    }

    /// Allocating [`QrDecomposition::extract_q`]
    pub fn extract_q_alloc(&self, result: &mut Option<M>) -> Result<()> {
        let n = self.order();
        self.extract_q(resize_if_needed(&self.q, result, n, n))
    }

    /// Copy R into `result`
    pub fn extract_upper(&self, result: &mut M) -> Result<()> {
        check_extract_target(&self.r, result)?;
        copy(&self.r, result);
        Ok(())
    }

    /// Allocating [`QrDecomposition::extract_upper`]
    pub fn extract_upper_alloc(&self, result: &mut Option<M>) -> Result<()> {
        let n = self.order();
        self.extract_upper(resize_if_needed(&self.r, result, n, n))
    }

    /// Rebuild `A = Q·R`
    pub fn reconstruct(&self) -> Result<M> {
        let n = self.order();
        let mut a = self.q.new_matrix(n, n);
        multiply(&self.q, &self.r, &mut a)?;
        Ok(a)
    }
}

impl<M: Matrix> Decomposition<M> for QrDecomposition<M> {
    fn order(&self) -> usize {
        self.q.rows()
    }

    fn template(&self) -> &M {
        &self.q
    }

    fn solve_slice(&self, rhs: &mut [f64]) {
        let n = self.order();

        // y = Qᵗ·b
        let y: Vec<f64> = (0..n)
            .map(|j| (0..n).map(|i| self.q.get(i, j) * rhs[i]).sum())
            .collect();
        rhs.copy_from_slice(&y);

        for i in (0..n).rev() {
            let mut sum = rhs[i];
            for (j, &xj) in rhs.iter().enumerate().skip(i + 1) {
                sum -= self.r.get(i, j) * xj;
            }
            rhs[i] = sum / self.r.get(i, i);
        }
    }

    fn determinant(&self) -> f64 {
        (0..self.order()).fold(self.q_determinant(), |det, i| det * self.r.get(i, i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{DenseMatrix, DenseVector, Vector};
    use crate::ops::multiply_transp_mat_alloc;

    fn sample() -> DenseMatrix {
        DenseMatrix::from_rows(&[
            vec![12.0, -51.0, 4.0],
            vec![6.0, 167.0, -68.0],
            vec![-4.0, 24.0, -41.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_q_orthonormal_and_r_upper() {
        let qr = QrDecomposition::decompose(&sample()).unwrap();

        let mut qtq = None;
        multiply_transp_mat_alloc(qr.q(), qr.q(), &mut qtq).unwrap();
        let qtq = qtq.unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((qtq.get(i, j) - expected).abs() < 1e-12);
            }
        }

        let r = qr.r();
        assert_eq!(r.get(0, 0), 14.0);
        assert_eq!(r.get(1, 0), 0.0);
        assert_eq!(r.get(2, 1), 0.0);
    }

    #[test]
    fn test_reconstruct_and_determinant() {
        let a = sample();
        let qr = QrDecomposition::decompose(&a).unwrap();
        let back = qr.reconstruct().unwrap();
        for (x, y) in back.to_array().iter().zip(a.to_array()) {
            assert!((x - y).abs() < 1e-9);
        }
        let reference = crate::algorithm::linalg::cofactor_determinant(&a).unwrap();
        assert!((qr.determinant() - reference).abs() < 1e-9 * reference.abs());
    }

    #[test]
    fn test_q_determinant_computed_on_demand() {
        let qr = QrDecomposition::decompose(&sample()).unwrap();
        assert!(qr.q_determinant.get().is_none());

        let det = qr.determinant();
        let sign = *qr.q_determinant.get().unwrap();
        assert_eq!(sign.abs(), 1.0);
        assert_eq!(det.signum(), sign);
        assert_eq!(qr.q_determinant(), sign);
    }

    #[test]
    fn test_nan_column_rejected() {
        let a = DenseMatrix::from_rows(&[vec![f64::NAN, 0.0], vec![0.0, 1.0]]).unwrap();
        match QrDecomposition::decompose(&a) {
            Err(Error::RankDeficiency { column, norm }) => {
                assert_eq!(column, 0);
                assert!(norm.is_nan());
            }
            other => panic!("expected rank deficiency, got {other:?}"),
        }
    }

    #[test]
    fn test_solve() {
        let a = sample();
        let qr = QrDecomposition::decompose_in_place(a.clone()).unwrap();
        let x_true = DenseVector::from_slice(&[1.0, 2.0, 3.0]);
        let mut b = DenseVector::zeros(3);
        crate::ops::multiply_vector(&a, &x_true, &mut b).unwrap();
        let mut x = b.clone();
        qr.solve(&b, &mut x).unwrap();
        for i in 0..3 {
            assert!((x.get(i) - x_true.get(i)).abs() < 1e-10);
        }
    }

    #[test]
    fn test_rank_deficient() {
        let a = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
        match QrDecomposition::decompose(&a) {
            Err(Error::RankDeficiency { column, .. }) => assert_eq!(column, 1),
            other => panic!("expected rank deficiency, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_aliasing() {
        let qr = QrDecomposition::decompose(&sample()).unwrap();
        let mut alias = qr.r().clone();
        assert_eq!(qr.extract_upper(&mut alias), Err(Error::aliased("extract")));

        let mut q = None;
        qr.extract_q_alloc(&mut q).unwrap();
        assert_eq!(q.as_ref(), Some(qr.q()));
    }
}
