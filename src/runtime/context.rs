//! Explicit shared resources for random matrix generation

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::pool::ScratchPool;
use super::random::{
    RandomMatrixOptions, RandomSource, set_random, set_random_invertible,
    set_random_positive_definite_symmetric, set_random_symmetric,
};
use crate::error::Result;
use crate::matrix::{DenseMatrix, Matrix};

/// A seeded generator and a scratch pool, shared by reference
///
/// Both halves are internally locked, so a context can be shared across
/// threads behind an `Arc`. Create one at start-up and pass it to whatever
/// needs random matrices.
///
/// # Example
///
/// ```
/// use densela::prelude::*;
///
/// let ctx = LinalgContext::<DenseMatrix>::new(42);
/// let mut a = DenseMatrix::zeros(4, 4);
/// ctx.random_positive_definite_symmetric(&mut a)?;
/// assert!(a.is_symmetric(1e-12));
/// # Ok::<(), densela::error::Error>(())
/// ```
#[derive(Debug)]
pub struct LinalgContext<M: Matrix = DenseMatrix> {
    rng: Mutex<StdRng>,
    pool: ScratchPool<M>,
    options: RandomMatrixOptions,
}

impl<M: Matrix> Default for LinalgContext<M> {
    /// Context seeded from the operating system
    fn default() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }
}

impl<M: Matrix> LinalgContext<M> {
    /// Context with a reproducible generator
    pub fn new(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            pool: ScratchPool::new(),
            options: RandomMatrixOptions::default(),
        }
    }

    /// Replace the generator options
    pub fn with_options(mut self, options: RandomMatrixOptions) -> Self {
        self.options = options;
        self
    }

    /// Generator options in use
    pub fn options(&self) -> &RandomMatrixOptions {
        &self.options
    }

    /// The shared scratch pool
    pub fn pool(&self) -> &ScratchPool<M> {
        &self.pool
    }

    /// Run `f` with exclusive access to the generator
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        f(&mut self.rng.lock())
    }

    /// One sample in `(0, 1)`
    pub fn next_f64(&self) -> f64 {
        self.rng.lock().next_f64()
    }

    /// [`set_random`] with the context generator
    pub fn random(&self, m: &mut M) {
        set_random(m, &mut *self.rng.lock());
    }

    /// [`set_random_symmetric`] with the context generator
    pub fn random_symmetric(&self, m: &mut M) -> Result<()> {
        set_random_symmetric(m, &mut *self.rng.lock())
    }

    /// [`set_random_invertible`] with the context generator and pool
    pub fn random_invertible(&self, m: &mut M) -> Result<()> {
        set_random_invertible(m, &mut *self.rng.lock(), &self.pool, &self.options)
    }

    /// [`set_random_positive_definite_symmetric`] with the context generator and pool
    pub fn random_positive_definite_symmetric(&self, m: &mut M) -> Result<()> {
        set_random_positive_definite_symmetric(m, &mut *self.rng.lock(), &self.pool, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::JaggedMatrix;
    use std::sync::Arc;

    #[test]
    fn test_same_seed_same_matrices() {
        let a_ctx: LinalgContext = LinalgContext::new(5);
        let b_ctx: LinalgContext = LinalgContext::new(5);
        let mut a = DenseMatrix::zeros(3, 3);
        let mut b = DenseMatrix::zeros(3, 3);
        a_ctx.random_invertible(&mut a).unwrap();
        b_ctx.random_invertible(&mut b).unwrap();
        assert_eq!(a, b);
        assert_eq!(a_ctx.pool().len(), 2);
    }

    #[test]
    fn test_jagged_context() {
        let ctx = LinalgContext::<JaggedMatrix>::new(9);
        let mut m = JaggedMatrix::zeros(2, 3);
        ctx.random(&mut m);
        assert!(m.to_array().iter().all(|&v| v > 0.0));
        assert!(ctx.random_symmetric(&mut m).is_err());
    }

    #[test]
    fn test_shared_across_threads() {
        let ctx = Arc::new(LinalgContext::<DenseMatrix>::default());
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let ctx = Arc::clone(&ctx);
                std::thread::spawn(move || {
                    let mut m = DenseMatrix::zeros(4, 4);
                    ctx.random_positive_definite_symmetric(&mut m).unwrap();
                    m.is_symmetric(1e-12)
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }
    }
}
