//! Random matrix generators
//!
//! Generators draw from any [`RandomSource`]. Every `rand::Rng` is one, so a
//! seeded `StdRng` gives reproducible matrices.
//!
//! The invertible and positive-definite generators assemble their result
//! from random triangular factors whose diagonals are pushed away from zero
//! by [`RandomMatrixOptions::diagonal_bias`]; the temporaries come from a
//! [`ScratchPool`].

use super::pool::ScratchPool;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::ops::{check_square, multiply, multiply_transp_mat};

/// Source of uniform samples in the open interval `(0, 1)`
pub trait RandomSource {
    /// Next sample; never exactly `0.0` or `1.0`
    fn next_f64(&mut self) -> f64;
}

impl<R: rand::Rng + ?Sized> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        loop {
            let u: f64 = self.random();
            if u > 0.0 {
                return u;
            }
        }
    }
}

/// Tuning for the structured random generators
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomMatrixOptions {
    /// Added to every diagonal entry of a generated triangular factor, so the
    /// diagonal lies in `[bias, bias + 1)`
    pub diagonal_bias: f64,
}

impl Default for RandomMatrixOptions {
    fn default() -> Self {
        Self { diagonal_bias: 1.0 }
    }
}

impl RandomMatrixOptions {
    /// Set the diagonal bias
    pub fn with_diagonal_bias(mut self, bias: f64) -> Self {
        self.diagonal_bias = bias;
        self
    }
}

/// Fill `m` with samples in `(0, 1)`
pub fn set_random<M: Matrix, R: RandomSource + ?Sized>(m: &mut M, rng: &mut R) {
    for i in 0..m.rows() {
        for j in 0..m.cols() {
            m.set(i, j, rng.next_f64());
        }
    }
}

/// Lower-triangular fill: samples below the diagonal, `bias + sample` on it,
/// zeros above
pub fn set_random_lower_triangular<M: Matrix, R: RandomSource + ?Sized>(
    m: &mut M,
    rng: &mut R,
    options: &RandomMatrixOptions,
) {
    for i in 0..m.rows() {
        for j in 0..m.cols() {
            let v = match j.cmp(&i) {
                std::cmp::Ordering::Less => rng.next_f64(),
                std::cmp::Ordering::Equal => options.diagonal_bias + rng.next_f64(),
                std::cmp::Ordering::Greater => 0.0,
            };
            m.set(i, j, v);
        }
    }
}

/// Upper-triangular counterpart of [`set_random_lower_triangular`]
pub fn set_random_upper_triangular<M: Matrix, R: RandomSource + ?Sized>(
    m: &mut M,
    rng: &mut R,
    options: &RandomMatrixOptions,
) {
    for i in 0..m.rows() {
        for j in 0..m.cols() {
            let v = match j.cmp(&i) {
                std::cmp::Ordering::Greater => rng.next_f64(),
                std::cmp::Ordering::Equal => options.diagonal_bias + rng.next_f64(),
                std::cmp::Ordering::Less => 0.0,
            };
            m.set(i, j, v);
        }
    }
}

/// Symmetric fill with samples in `(0, 1)`
pub fn set_random_symmetric<M: Matrix, R: RandomSource + ?Sized>(
    m: &mut M,
    rng: &mut R,
) -> Result<()> {
    let n = check_square(m)?;
    for i in 0..n {
        for j in 0..=i {
            let v = rng.next_f64();
            m.set(i, j, v);
            m.set(j, i, v);
        }
    }
    Ok(())
}

/// Fill the square `m` with `L·U` for random biased triangular factors
pub fn set_random_invertible<M: Matrix, R: RandomSource + ?Sized>(
    m: &mut M,
    rng: &mut R,
    pool: &ScratchPool<M>,
    options: &RandomMatrixOptions,
) -> Result<()> {
    let n = check_square(m)?;
    check_bias(options)?;
    let mut l = pool.acquire_shaped(m, n, n);
    let mut u = pool.acquire_shaped(m, n, n);
    set_random_lower_triangular(&mut l, rng, options);
    set_random_upper_triangular(&mut u, rng, options);

    let outcome = multiply(&l, &u, m);
    pool.try_release(l);
    pool.try_release(u);
    outcome
}

/// Fill the square `m` with `Lᵗ·L` for a random biased lower-triangular `L`
pub fn set_random_positive_definite_symmetric<M: Matrix, R: RandomSource + ?Sized>(
    m: &mut M,
    rng: &mut R,
    pool: &ScratchPool<M>,
    options: &RandomMatrixOptions,
) -> Result<()> {
    let n = check_square(m)?;
    check_bias(options)?;
    let mut l = pool.acquire_shaped(m, n, n);
    set_random_lower_triangular(&mut l, rng, options);

    let outcome = multiply_transp_mat(&l, &l, m);
    pool.try_release(l);
    outcome
}

fn check_bias(options: &RandomMatrixOptions) -> Result<()> {
    if !(options.diagonal_bias.is_finite() && options.diagonal_bias >= 0.0) {
        return Err(Error::invalid_argument(
            "diagonal_bias",
            format!("must be finite and non-negative, got {}", options.diagonal_bias),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::linalg::{CholeskyDecomposition, Decomposition, LuDecomposition};
    use crate::matrix::DenseMatrix;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_samples_in_open_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut m = DenseMatrix::zeros(8, 8);
        set_random(&mut m, &mut rng);
        assert!(m.to_array().iter().all(|&v| v > 0.0 && v < 1.0));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let mut a = DenseMatrix::zeros(4, 4);
        let mut b = DenseMatrix::zeros(4, 4);
        set_random(&mut a, &mut StdRng::seed_from_u64(42));
        set_random(&mut b, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_triangular_structure() {
        let mut rng = StdRng::seed_from_u64(1);
        let opts = RandomMatrixOptions::default();
        let mut l = DenseMatrix::zeros(4, 4);
        set_random_lower_triangular(&mut l, &mut rng, &opts);
        for i in 0..4 {
            assert!((1.0..2.0).contains(&l.get(i, i)));
            for j in (i + 1)..4 {
                assert_eq!(l.get(i, j), 0.0);
            }
        }

        let mut s = DenseMatrix::zeros(5, 5);
        set_random_symmetric(&mut s, &mut rng).unwrap();
        assert!(s.is_symmetric(0.0));
    }

    #[test]
    fn test_invertible_has_expected_determinant_sign() {
        let mut rng = StdRng::seed_from_u64(3);
        let pool = ScratchPool::new();
        let mut a = DenseMatrix::zeros(6, 6);
        set_random_invertible(&mut a, &mut rng, &pool, &RandomMatrixOptions::default()).unwrap();

        // det(L·U) = Π l_ii · Π u_ii > 1
        assert!(LuDecomposition::decompose(&a).unwrap().determinant() > 1.0);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_positive_definite_factors() {
        let mut rng = StdRng::seed_from_u64(11);
        let pool = ScratchPool::with_dimensions(5, 5);
        let mut a = DenseMatrix::zeros(5, 5);
        let opts = RandomMatrixOptions::default();
        set_random_positive_definite_symmetric(&mut a, &mut rng, &pool, &opts).unwrap();
        assert!(a.is_symmetric(1e-12));
        assert!(CholeskyDecomposition::decompose(&a).is_ok());
    }

    #[test]
    fn test_rejects_bad_bias() {
        let mut rng = StdRng::seed_from_u64(0);
        let pool = ScratchPool::new();
        let mut a = DenseMatrix::zeros(2, 2);
        let opts = RandomMatrixOptions::default().with_diagonal_bias(f64::NAN);
        assert!(matches!(
            set_random_invertible(&mut a, &mut rng, &pool, &opts),
            Err(Error::InvalidArgument { arg: "diagonal_bias", .. })
        ));
    }
}
