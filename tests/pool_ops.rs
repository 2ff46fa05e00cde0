//! Integration tests for the scratch pool and the linear algebra context
//!
//! Tests verify:
//! - Acquire never blocks and falls back to direct allocation
//! - Dimension changes purge ineligible entries, also under contention
//! - Seeded contexts are reproducible and feed the decompositions

mod common;

use std::sync::Arc;
use std::thread;

use common::rel_frobenius_error;
use densela::prelude::*;
use densela::runtime::{set_random_invertible, set_random_positive_definite_symmetric};

#[test]
fn test_generators_recycle_scratch() {
    let pool = ScratchPool::with_dimensions(6, 6);
    let mut rng = common::rng(1);
    let opts = RandomMatrixOptions::default();
    let mut a = DenseMatrix::zeros(6, 6);

    set_random_invertible(&mut a, &mut rng, &pool, &opts).unwrap();
    assert_eq!(pool.len(), 2);
    set_random_positive_definite_symmetric(&mut a, &mut rng, &pool, &opts).unwrap();
    assert_eq!(pool.len(), 2);

    // A pool constrained to another size rejects the scratch and stays empty
    let other = ScratchPool::with_dimensions(3, 3);
    set_random_invertible(&mut a, &mut rng, &other, &opts).unwrap();
    assert!(other.is_empty());
}

#[test]
fn test_concurrent_acquire_release() {
    let pool: Arc<ScratchPool<DenseMatrix>> = Arc::new(ScratchPool::with_capacity(8));
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                for k in 0..100 {
                    let n = 1 + (t + k) % 3;
                    let mut m = pool.acquire_or_else(|| DenseMatrix::zeros(n, n));
                    m.set(0, 0, k as f64);
                    pool.try_release(m);
                    if k % 25 == 0 {
                        pool.set_dimensions(Some((2, 2)));
                    } else if k % 25 == 12 {
                        pool.set_dimensions(None);
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert!(pool.len() <= 8);
    pool.set_dimensions(Some((3, 3)));
    while let Some(m) = pool.try_acquire() {
        assert_eq!(m.shape(), (3, 3));
    }
}

#[test]
fn test_context_drives_decompositions() {
    let ctx = LinalgContext::<DenseMatrix>::new(2024);
    let mut a = DenseMatrix::zeros(8, 8);

    ctx.random_invertible(&mut a).unwrap();
    let qr = QrDecomposition::decompose(&a).unwrap();
    assert!(rel_frobenius_error(&qr.reconstruct().unwrap(), &a) < 1e-6);

    ctx.random_positive_definite_symmetric(&mut a).unwrap();
    let chol = CholeskyDecomposition::decompose(&a).unwrap();
    assert!(rel_frobenius_error(&chol.reconstruct().unwrap(), &a) < 1e-6);
}

#[test]
fn test_context_with_options() {
    let ctx = LinalgContext::<DenseMatrix>::new(3)
        .with_options(RandomMatrixOptions::default().with_diagonal_bias(10.0));
    let mut a = DenseMatrix::zeros(4, 4);
    ctx.random_positive_definite_symmetric(&mut a).unwrap();

    // Each diagonal entry of Lᵗ·L includes the square of a diagonal in [10, 11)
    for i in 0..4 {
        assert!(a.get(i, i) >= 100.0);
    }
    assert!(ctx.next_f64() > 0.0);
    let draws: Vec<f64> = ctx.with_rng(|rng| (0..4).map(|_| rng.next_f64()).collect());
    assert!(draws.iter().all(|&v| v > 0.0 && v < 1.0));
}
