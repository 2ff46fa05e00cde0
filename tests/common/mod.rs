//! Common test utilities
#![allow(dead_code)]

use densela::matrix::{DenseMatrix, Matrix};
use densela::ops::subtract_alloc;
use densela::runtime::{
    RandomMatrixOptions, ScratchPool, set_random, set_random_invertible,
    set_random_positive_definite_symmetric,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Deterministic generator for a test
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// `‖actual - expected‖_F / ‖expected‖_F`
pub fn rel_frobenius_error<M: Matrix>(actual: &M, expected: &M) -> f64 {
    let mut diff = None;
    subtract_alloc(actual, expected, &mut diff).unwrap();
    diff.unwrap().norm_frobenius() / expected.norm_frobenius()
}

/// Check if a matrix is close to identity
pub fn assert_near_identity<M: Matrix>(m: &M, tol: f64, msg: &str) {
    for i in 0..m.rows() {
        for j in 0..m.cols() {
            let expected = if i == j { 1.0 } else { 0.0 };
            let actual = m.get(i, j);
            assert!(
                (actual - expected).abs() <= tol,
                "{}: element [{},{}] differs: {} vs {}",
                msg,
                i,
                j,
                actual,
                expected
            );
        }
    }
}

/// Uniform `(0, 1)` matrix
pub fn random_matrix(rows: usize, cols: usize, seed: u64) -> DenseMatrix {
    let mut m = DenseMatrix::zeros(rows, cols);
    set_random(&mut m, &mut rng(seed));
    m
}

/// Random invertible `n x n` matrix
pub fn random_invertible(n: usize, seed: u64) -> DenseMatrix {
    let mut m = DenseMatrix::zeros(n, n);
    let opts = RandomMatrixOptions::default();
    set_random_invertible(&mut m, &mut rng(seed), &ScratchPool::new(), &opts).unwrap();
    m
}

/// Random symmetric positive definite `n x n` matrix
pub fn random_spd(n: usize, seed: u64) -> DenseMatrix {
    let mut m = DenseMatrix::zeros(n, n);
    set_random_positive_definite_symmetric(
        &mut m,
        &mut rng(seed),
        &ScratchPool::new(),
        &RandomMatrixOptions::default(),
    )
    .unwrap();
    m
}
