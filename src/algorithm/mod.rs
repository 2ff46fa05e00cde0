//! Numerical algorithms built on the arithmetic kernel
//!
//! - [`linalg`] - LU, LDLᵗ, Cholesky and QR decompositions with solves,
//!   inverses, determinants and factor extraction

pub mod linalg;

pub use linalg::{
    CholeskyDecomposition, Decomposition, DecompositionOptions, LdltDecomposition,
    LuDecomposition, QrDecomposition, cofactor_determinant,
};
