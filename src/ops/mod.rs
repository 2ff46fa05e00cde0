//! Matrix arithmetic
//!
//! This module holds the arithmetic kernel: element-wise operations, the
//! product family, and diagonal specializations, together with the
//! validation and resize policy they share.
//!
//! # Calling conventions
//!
//! ```text
//! op(a, .., result)            plain: no shape checks, fastest path
//! op_checked(Some(a), .., Some(result))
//!                              checked: MissingOperand / ShapeMismatch
//! op_alloc(a, .., &mut result) allocating: result: &mut Option<M> is
//!                              (re)created when absent or wrongly sized
//! op_in_place(a, ..)           overwrite the first operand; its checked
//!                              form is op_in_place_checked(Some(a), ..)
//! ```
//!
//! # Aliasing
//!
//! Matrices are handles; clones share a backing store until written.
//! Element-wise operations and diagonal scalings tolerate a result that
//! shares storage with an operand. Non-diagonal products do not: they compare
//! [`StorageId`](crate::matrix::StorageId)s before computing and fail with
//! `AliasingViolation`.
//!
//! # Operation Categories
//!
//! ## Element-wise Operations
//! Setters, negate, scale, add/subtract, Hadamard multiply/divide/power,
//! transpose, symmetric and antisymmetric parts.
//!
//! ## Products
//! `multiply`, `multiply_transp_mat`, `multiply_mat_transp`,
//! `multiply_transp_transp`, the eight `multiply_{a,at}{b,bt}{c,ct}`
//! three-factor forms, matrix/vector products and the bilinear form.
//!
//! ## Diagonal Products
//! Row and column scaling by a diagonal given as a vector.

mod diagonal;
mod elementwise;
mod matmul;
mod resize;
mod triple;
mod validate;

pub use diagonal::*;
pub use elementwise::*;
pub use matmul::*;
pub use resize::*;
pub use triple::*;
pub use validate::*;
