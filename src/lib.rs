//! # densela
//!
//! **Dense real-matrix algebra with aliasing-checked kernels and direct solvers.**
//!
//! densela provides the arithmetic and decomposition engine for dense `f64`
//! matrices: element-wise operations, every transpose combination of two- and
//! three-factor products, diagonal specializations, and LU, LDLᵗ, Cholesky
//! and QR decompositions with solves, inverses and determinants.
//!
//! ## Features
//!
//! - **Representation-generic**: algorithms are written against the
//!   [`Matrix`](matrix::Matrix) trait; results are created in the operand's
//!   family
//! - **Three calling conventions**: plain, checked (`_checked`) and
//!   allocating (`_alloc`) variants of every operation
//! - **Aliasing detection**: matrices are copy-on-write handles, and products
//!   that cannot run in place reject a result sharing an operand's storage
//! - **Decompositions**: LU (partial pivoting), LDLᵗ, Cholesky, QR
//! - **Scratch pool**: thread-safe recycling of temporaries
//!
//! ## Quick Start
//!
//! ```rust
//! use densela::prelude::*;
//!
//! let a = DenseMatrix::from_rows(&[vec![4.0, 3.0], vec![6.0, 3.0]])?;
//! let b = DenseVector::from_slice(&[10.0, 12.0]);
//!
//! let lu = LuDecomposition::decompose(&a)?;
//! let mut x = None;
//! lu.solve_alloc(&b, &mut x)?;
//! assert!((lu.determinant() + 6.0).abs() < 1e-12);
//!
//! let mut product = None;
//! densela::ops::multiply_transp_mat_alloc(&a, &a, &mut product)?;
//! # Ok::<(), densela::error::Error>(())
//! ```
//!
//! ## Logging
//!
//! densela emits diagnostics through the [`log`] facade under the targets
//! `densela::decompose`, `densela::pool` and `densela::resize`. It never
//! installs a logger.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithm;
pub mod error;
pub mod matrix;
pub mod ops;
pub mod runtime;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithm::linalg::{
        CholeskyDecomposition, Decomposition, DecompositionOptions, LdltDecomposition,
        LuDecomposition, QrDecomposition,
    };
    pub use crate::error::{Error, Result};
    pub use crate::matrix::{DenseMatrix, DenseVector, JaggedMatrix, Matrix, StorageId, Vector};
    pub use crate::runtime::{LinalgContext, RandomMatrixOptions, RandomSource, ScratchPool};
}
