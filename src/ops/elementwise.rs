//! Element-wise operations
//!
//! Each operation comes in three calling conventions:
//!
//! - **plain** (`negate`): no validation, the caller guarantees shapes;
//! - **checked** (`negate_checked`): operands are `Option`s, absent operands
//!   and shape mismatches are reported as errors, the result must already
//!   have the right shape;
//! - **allocating** (`negate_alloc`): the result is `&mut Option<M>` and is
//!   replaced by a fresh companion when absent or wrongly sized.
//!
//! Every operation here reads each operand element before writing the
//! corresponding result element, so results may share storage with operands.

use super::resize::resize_if_needed;
use super::validate::{check_len, check_same_shape, check_shape, check_square, require, require_mut};
use crate::error::Result;
use crate::matrix::{Matrix, Vector};

/// Binary element-wise operation kind
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition: a + b
    Add,
    /// Subtraction: a - b
    Sub,
    /// Multiplication: a * b
    Mul,
    /// Division: a / b
    Div,
    /// Power: a^b
    Pow,
}

impl BinaryOp {
    /// Apply the operation to one pair of elements
    #[inline]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Pow => a.powf(b),
        }
    }
}

// ============================================================================
// Setters
// ============================================================================

/// Set every element to zero
pub fn set_zero<M: Matrix>(m: &mut M) {
    set_constant(m, 0.0);
}

/// Checked [`set_zero`]
pub fn set_zero_checked<M: Matrix>(m: Option<&mut M>) -> Result<()> {
    set_zero(require_mut(m, "result")?);
    Ok(())
}

/// Set every element to `value`
pub fn set_constant<M: Matrix>(m: &mut M, value: f64) {
    for i in 0..m.rows() {
        for j in 0..m.cols() {
            m.set(i, j, value);
        }
    }
}

/// Checked [`set_constant`]
pub fn set_constant_checked<M: Matrix>(m: Option<&mut M>, value: f64) -> Result<()> {
    set_constant(require_mut(m, "result")?, value);
    Ok(())
}

/// Set ones on the main diagonal and zeros elsewhere
pub fn set_identity<M: Matrix>(m: &mut M) {
    set_zero(m);
    set_diagonal_constant(m, 1.0);
}

/// Checked [`set_identity`]: the matrix must be square
pub fn set_identity_checked<M: Matrix>(m: Option<&mut M>) -> Result<()> {
    let m = require_mut(m, "result")?;
    check_square(m)?;
    set_identity(m);
    Ok(())
}

/// Set `value` on the main diagonal, leaving off-diagonal entries untouched
pub fn set_diagonal_constant<M: Matrix>(m: &mut M, value: f64) {
    for i in 0..m.rows().min(m.cols()) {
        m.set(i, i, value);
    }
}

/// Checked [`set_diagonal_constant`]: the matrix must be square
pub fn set_diagonal_constant_checked<M: Matrix>(m: Option<&mut M>, value: f64) -> Result<()> {
    let m = require_mut(m, "result")?;
    check_square(m)?;
    set_diagonal_constant(m, value);
    Ok(())
}

/// Turn `m` into `diag(d)`: `d` on the main diagonal, zeros elsewhere
pub fn set_diagonal<M: Matrix, V: Vector>(m: &mut M, d: &V) {
    set_zero(m);
    for i in 0..m.rows().min(m.cols()) {
        m.set(i, i, d.get(i));
    }
}

/// Checked [`set_diagonal`]: the matrix must be square and match `d`
pub fn set_diagonal_checked<M: Matrix, V: Vector>(m: Option<&mut M>, d: Option<&V>) -> Result<()> {
    let m = require_mut(m, "result")?;
    let d = require(d, "d")?;
    let n = check_square(m)?;
    check_len(d, n)?;
    set_diagonal(m, d);
    Ok(())
}

// ============================================================================
// Unary operations
// ============================================================================

/// Generates the checked and allocating conventions of a same-shape unary op
macro_rules! unary_conventions {
    ($name:ident $(, $arg:ident : $ty:ty)*) => {
        paste::paste! {
            #[doc = concat!("Checked [`", stringify!($name), "`]: validates operands and the result shape")]
            pub fn [<$name _checked>]<M: Matrix>(
                a: Option<&M>,
                $($arg: $ty,)*
                result: Option<&mut M>,
            ) -> Result<()> {
                let a = require(a, "a")?;
                let result = require_mut(result, "result")?;
                check_same_shape(a, result)?;
                $name(a, $($arg,)* result);
                Ok(())
            }

            #[doc = concat!("Allocating [`", stringify!($name), "`]: resizes `result` when needed")]
            pub fn [<$name _alloc>]<M: Matrix>(a: &M, $($arg: $ty,)* result: &mut Option<M>) {
                let (rows, cols) = a.shape();
                $name(a, $($arg,)* resize_if_needed(a, result, rows, cols));
            }
        }
    };
}

/// Apply `f` to every element of `a`, writing into `result`
pub fn map<M: Matrix>(a: &M, f: impl Fn(f64) -> f64, result: &mut M) {
    for i in 0..a.rows() {
        for j in 0..a.cols() {
            result.set(i, j, f(a.get(i, j)));
        }
    }
}
unary_conventions!(map, f: impl Fn(f64) -> f64);

/// Copy `a` into `result`
pub fn copy<M: Matrix>(a: &M, result: &mut M) {
    result.copy_from(a);
}
unary_conventions!(copy);

/// `result = -a`
pub fn negate<M: Matrix>(a: &M, result: &mut M) {
    map(a, |x| -x, result);
}
unary_conventions!(negate);

/// `result = s * a`
pub fn scale<M: Matrix>(a: &M, s: f64, result: &mut M) {
    map(a, |x| s * x, result);
}
unary_conventions!(scale, s: f64);

/// `result[i,j] = a[i,j]^p`
pub fn elementwise_pow<M: Matrix>(a: &M, p: f64, result: &mut M) {
    map(a, |x| x.powf(p), result);
}
unary_conventions!(elementwise_pow, p: f64);

/// Negate `a` in place
pub fn negate_in_place<M: Matrix>(a: &mut M) {
    scale_in_place(a, -1.0);
}

/// Multiply every element of `a` by `s` in place
pub fn scale_in_place<M: Matrix>(a: &mut M, s: f64) {
    for i in 0..a.rows() {
        for j in 0..a.cols() {
            let v = a.get(i, j);
            a.set(i, j, s * v);
        }
    }
}

/// Checked [`negate_in_place`]
pub fn negate_in_place_checked<M: Matrix>(a: Option<&mut M>) -> Result<()> {
    negate_in_place(require_mut(a, "a")?);
    Ok(())
}

/// Checked [`scale_in_place`]
pub fn scale_in_place_checked<M: Matrix>(a: Option<&mut M>, s: f64) -> Result<()> {
    scale_in_place(require_mut(a, "a")?, s);
    Ok(())
}

// ============================================================================
// Transpose and symmetric parts
// ============================================================================

/// `result = aᵗ`; `result` must be `cols x rows`
pub fn transpose<M: Matrix>(a: &M, result: &mut M) {
    if a.is_square() && a.shares_storage(result) {
        transpose_in_place(result);
        return;
    }
    for i in 0..a.rows() {
        for j in 0..a.cols() {
            result.set(j, i, a.get(i, j));
        }
    }
}

/// Checked [`transpose`]
pub fn transpose_checked<M: Matrix>(a: Option<&M>, result: Option<&mut M>) -> Result<()> {
    let a = require(a, "a")?;
    let result = require_mut(result, "result")?;
    check_shape(result, (a.cols(), a.rows()))?;
    transpose(a, result);
    Ok(())
}

/// Allocating [`transpose`]
pub fn transpose_alloc<M: Matrix>(a: &M, result: &mut Option<M>) {
    let (rows, cols) = a.shape();
    transpose(a, resize_if_needed(a, result, cols, rows));
}

/// Transpose a square matrix in place by swapping mirrored elements
///
/// # Panics
///
/// Panics if `a` is not square; use [`transpose_in_place_checked`] for an
/// error instead.
pub fn transpose_in_place<M: Matrix>(a: &mut M) {
    assert!(a.is_square(), "transpose_in_place: non-square matrix cannot be transposed in place");
    let n = a.rows();
    for i in 0..n {
        for j in (i + 1)..n {
            let upper = a.get(i, j);
            let lower = a.get(j, i);
            a.set(i, j, lower);
            a.set(j, i, upper);
        }
    }
}

/// Checked [`transpose_in_place`]: non-square matrices are rejected
pub fn transpose_in_place_checked<M: Matrix>(a: Option<&mut M>) -> Result<()> {
    let a = require_mut(a, "a")?;
    check_square(a)?;
    transpose_in_place(a);
    Ok(())
}

/// `result = 0.5 (a + aᵗ)`
pub fn symmetric_part<M: Matrix>(a: &M, result: &mut M) {
    let n = a.rows();
    for i in 0..n {
        for j in i..n {
            let v = 0.5 * (a.get(i, j) + a.get(j, i));
            result.set(i, j, v);
            result.set(j, i, v);
        }
    }
}

/// `result = 0.5 (a - aᵗ)`
pub fn antisymmetric_part<M: Matrix>(a: &M, result: &mut M) {
    let n = a.rows();
    for i in 0..n {
        result.set(i, i, 0.0);
        for j in (i + 1)..n {
            let v = 0.5 * (a.get(i, j) - a.get(j, i));
            result.set(i, j, v);
            result.set(j, i, -v);
        }
    }
}

/// Generates the conventions of a square-only unary op
macro_rules! square_conventions {
    ($name:ident) => {
        paste::paste! {
            #[doc = concat!("Checked [`", stringify!($name), "`]: `a` must be square and match `result`")]
            pub fn [<$name _checked>]<M: Matrix>(a: Option<&M>, result: Option<&mut M>) -> Result<()> {
                let a = require(a, "a")?;
                let result = require_mut(result, "result")?;
                let n = check_square(a)?;
                check_shape(result, (n, n))?;
                $name(a, result);
                Ok(())
            }

            #[doc = concat!("Allocating [`", stringify!($name), "`]")]
            pub fn [<$name _alloc>]<M: Matrix>(a: &M, result: &mut Option<M>) -> Result<()> {
                let n = check_square(a)?;
                $name(a, resize_if_needed(a, result, n, n));
                Ok(())
            }
        }
    };
}

square_conventions!(symmetric_part);
square_conventions!(antisymmetric_part);

/// Replace a square matrix by its symmetric part, in place
pub fn symmetrize<M: Matrix>(a: &mut M) {
    let n = a.rows();
    for i in 0..n {
        for j in (i + 1)..n {
            let v = 0.5 * (a.get(i, j) + a.get(j, i));
            a.set(i, j, v);
            a.set(j, i, v);
        }
    }
}

/// Checked [`symmetrize`]
pub fn symmetrize_checked<M: Matrix>(a: Option<&mut M>) -> Result<()> {
    let a = require_mut(a, "a")?;
    check_square(a)?;
    symmetrize(a);
    Ok(())
}

/// Split a square matrix into `0.5 (a + aᵗ)` and `0.5 (a - aᵗ)`
///
/// The antisymmetric part is written first and the symmetric part last, so
/// when both outputs refer to one store the symmetric part is what remains.
pub fn symmetric_and_antisymmetric_parts<M: Matrix>(
    a: &M,
    symmetric: &mut M,
    antisymmetric: &mut M,
) {
    antisymmetric_part(a, antisymmetric);
    symmetric_part(a, symmetric);
}

/// Checked [`symmetric_and_antisymmetric_parts`]
pub fn symmetric_and_antisymmetric_parts_checked<M: Matrix>(
    a: Option<&M>,
    symmetric: Option<&mut M>,
    antisymmetric: Option<&mut M>,
) -> Result<()> {
    let a = require(a, "a")?;
    let symmetric = require_mut(symmetric, "symmetric")?;
    let antisymmetric = require_mut(antisymmetric, "antisymmetric")?;
    let n = check_square(a)?;
    check_shape(symmetric, (n, n))?;
    check_shape(antisymmetric, (n, n))?;
    symmetric_and_antisymmetric_parts(a, symmetric, antisymmetric);
    Ok(())
}

/// Allocating [`symmetric_and_antisymmetric_parts`]
pub fn symmetric_and_antisymmetric_parts_alloc<M: Matrix>(
    a: &M,
    symmetric: &mut Option<M>,
    antisymmetric: &mut Option<M>,
) -> Result<()> {
    let n = check_square(a)?;
    let symmetric = resize_if_needed(a, symmetric, n, n);
    let antisymmetric = resize_if_needed(a, antisymmetric, n, n);
    symmetric_and_antisymmetric_parts(a, symmetric, antisymmetric);
    Ok(())
}

// ============================================================================
// Binary operations
// ============================================================================

/// `result[i,j] = op(a[i,j], b[i,j])`
pub fn binary<M: Matrix>(op: BinaryOp, a: &M, b: &M, result: &mut M) {
    for i in 0..a.rows() {
        for j in 0..a.cols() {
            result.set(i, j, op.apply(a.get(i, j), b.get(i, j)));
        }
    }
}

/// Checked [`binary`]
pub fn binary_checked<M: Matrix>(
    op: BinaryOp,
    a: Option<&M>,
    b: Option<&M>,
    result: Option<&mut M>,
) -> Result<()> {
    let a = require(a, "a")?;
    let b = require(b, "b")?;
    let result = require_mut(result, "result")?;
    check_same_shape(a, b)?;
    check_same_shape(a, result)?;
    binary(op, a, b, result);
    Ok(())
}

/// Allocating [`binary`]
pub fn binary_alloc<M: Matrix>(op: BinaryOp, a: &M, b: &M, result: &mut Option<M>) -> Result<()> {
    check_same_shape(a, b)?;
    let (rows, cols) = a.shape();
    binary(op, a, b, resize_if_needed(a, result, rows, cols));
    Ok(())
}

/// Generates the three conventions of a named binary op
macro_rules! binary_op {
    ($name:ident, $op:expr, $doc:literal) => {
        paste::paste! {
            #[doc = $doc]
            pub fn $name<M: Matrix>(a: &M, b: &M, result: &mut M) {
                binary($op, a, b, result);
            }

            #[doc = concat!("Checked [`", stringify!($name), "`]")]
            pub fn [<$name _checked>]<M: Matrix>(
                a: Option<&M>,
                b: Option<&M>,
                result: Option<&mut M>,
            ) -> Result<()> {
                binary_checked($op, a, b, result)
            }

            #[doc = concat!("Allocating [`", stringify!($name), "`]")]
            pub fn [<$name _alloc>]<M: Matrix>(a: &M, b: &M, result: &mut Option<M>) -> Result<()> {
                binary_alloc($op, a, b, result)
            }
        }
    };
}

binary_op!(add, BinaryOp::Add, "`result = a + b`");
binary_op!(subtract, BinaryOp::Sub, "`result = a - b`");
binary_op!(elementwise_multiply, BinaryOp::Mul, "`result[i,j] = a[i,j] * b[i,j]`");
binary_op!(elementwise_divide, BinaryOp::Div, "`result[i,j] = a[i,j] / b[i,j]`");

/// `result = a + s * b`
pub fn add_scaled<M: Matrix>(a: &M, s: f64, b: &M, result: &mut M) {
    for i in 0..a.rows() {
        for j in 0..a.cols() {
            result.set(i, j, a.get(i, j) + s * b.get(i, j));
        }
    }
}

/// Checked [`add_scaled`]
pub fn add_scaled_checked<M: Matrix>(
    a: Option<&M>,
    s: f64,
    b: Option<&M>,
    result: Option<&mut M>,
) -> Result<()> {
    let a = require(a, "a")?;
    let b = require(b, "b")?;
    let result = require_mut(result, "result")?;
    check_same_shape(a, b)?;
    check_same_shape(a, result)?;
    add_scaled(a, s, b, result);
    Ok(())
}

/// Allocating [`add_scaled`]
pub fn add_scaled_alloc<M: Matrix>(a: &M, s: f64, b: &M, result: &mut Option<M>) -> Result<()> {
    check_same_shape(a, b)?;
    let (rows, cols) = a.shape();
    add_scaled(a, s, b, resize_if_needed(a, result, rows, cols));
    Ok(())
}

/// `a += b`
pub fn add_in_place<M: Matrix>(a: &mut M, b: &M) {
    for i in 0..a.rows() {
        for j in 0..a.cols() {
            let v = a.get(i, j) + b.get(i, j);
            a.set(i, j, v);
        }
    }
}

/// `a -= b`
pub fn subtract_in_place<M: Matrix>(a: &mut M, b: &M) {
    for i in 0..a.rows() {
        for j in 0..a.cols() {
            let v = a.get(i, j) - b.get(i, j);
            a.set(i, j, v);
        }
    }
}

/// Checked [`add_in_place`]
pub fn add_in_place_checked<M: Matrix>(a: Option<&mut M>, b: Option<&M>) -> Result<()> {
    let a = require_mut(a, "a")?;
    let b = require(b, "b")?;
    check_same_shape(a, b)?;
    add_in_place(a, b);
    Ok(())
}

/// Checked [`subtract_in_place`]
pub fn subtract_in_place_checked<M: Matrix>(a: Option<&mut M>, b: Option<&M>) -> Result<()> {
    let a = require_mut(a, "a")?;
    let b = require(b, "b")?;
    check_same_shape(a, b)?;
    subtract_in_place(a, b);
    Ok(())
}
