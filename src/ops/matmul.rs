//! Two-factor and matrix/vector products
//!
//! Transposed operands are read through swapped indices; no transpose is
//! ever materialized. None of these products can be computed in place: a
//! result sharing storage with an operand is rejected with
//! [`Error::AliasingViolation`](crate::error::Error::AliasingViolation) in
//! every calling convention, which is why even the plain functions return a
//! `Result`.

use super::resize::{resize_if_needed, resize_vector_if_needed};
use super::validate::{
    check_distinct, check_inner, check_len, check_shape, effective_shape, require, require_mut,
};
use crate::error::Result;
use crate::matrix::{Matrix, Vector};

/// Element `(i, j)` of `m` or of `mᵗ`
#[inline(always)]
pub(crate) fn entry<M: Matrix, const T: bool>(m: &M, i: usize, j: usize) -> f64 {
    if T { m.get(j, i) } else { m.get(i, j) }
}

/// Shapes `(m, k, n)` of `op(a) · op(b)`
#[inline]
fn product_dims<M: Matrix>(a: &M, ta: bool, b: &M, tb: bool) -> Result<(usize, usize, usize)> {
    let lhs = effective_shape(a, ta);
    let rhs = effective_shape(b, tb);
    check_inner(lhs, rhs)?;
    Ok((lhs.0, lhs.1, rhs.1))
}

/// `result = op(a) · op(b)` where `op` transposes when the flag is set
fn product_kernel<M: Matrix, const TA: bool, const TB: bool>(a: &M, b: &M, result: &mut M) {
    let (m, k) = effective_shape(a, TA);
    let n = effective_shape(b, TB).1;
    for i in 0..m {
        for j in 0..n {
            let mut sum = 0.0;
            for p in 0..k {
                sum += entry::<M, TA>(a, i, p) * entry::<M, TB>(b, p, j);
            }
            result.set(i, j, sum);
        }
    }
}

/// Generates the three conventions of a two-factor product
macro_rules! two_factor {
    ($name:ident, $ta:literal, $tb:literal, $formula:literal) => {
        paste::paste! {
            #[doc = concat!("`result = ", $formula, "`")]
            ///
            /// Shapes are not validated; `result` must not share storage with
            /// either operand.
            pub fn $name<M: Matrix>(a: &M, b: &M, result: &mut M) -> Result<()> {
                check_distinct(result.storage_id(), &[a.storage_id(), b.storage_id()], stringify!($name))?;
                product_kernel::<M, $ta, $tb>(a, b, result);
                Ok(())
            }

            #[doc = concat!("Checked [`", stringify!($name), "`]: `", $formula, "` with full validation")]
            pub fn [<$name _checked>]<M: Matrix>(
                a: Option<&M>,
                b: Option<&M>,
                result: Option<&mut M>,
            ) -> Result<()> {
                let a = require(a, "a")?;
                let b = require(b, "b")?;
                let result = require_mut(result, "result")?;
                let (m, _, n) = product_dims(a, $ta, b, $tb)?;
                check_shape(result, (m, n))?;
                $name(a, b, result)
            }

            #[doc = concat!("Allocating [`", stringify!($name), "`]: `", $formula, "` into a resized result")]
            pub fn [<$name _alloc>]<M: Matrix>(a: &M, b: &M, result: &mut Option<M>) -> Result<()> {
                let (m, _, n) = product_dims(a, $ta, b, $tb)?;
                $name(a, b, resize_if_needed(a, result, m, n))
            }
        }
    };
}

two_factor!(multiply, false, false, "a · b");
two_factor!(multiply_transp_mat, true, false, "aᵗ · b");
two_factor!(multiply_mat_transp, false, true, "a · bᵗ");
two_factor!(multiply_transp_transp, true, true, "aᵗ · bᵗ");

// ============================================================================
// Matrix / vector products
// ============================================================================

fn matvec_kernel<M: Matrix, const TA: bool>(a: &M, x: &M::Vector, y: &mut M::Vector) {
    let (m, k) = effective_shape(a, TA);
    for i in 0..m {
        let mut sum = 0.0;
        for p in 0..k {
            sum += entry::<M, TA>(a, i, p) * x.get(p);
        }
        y.set(i, sum);
    }
}

macro_rules! matvec {
    ($name:ident, $ta:literal, $formula:literal) => {
        paste::paste! {
            #[doc = concat!("`y = ", $formula, "`; `y` must not share storage with `x`")]
            pub fn $name<M: Matrix>(a: &M, x: &M::Vector, y: &mut M::Vector) -> Result<()> {
                check_distinct(y.storage_id(), &[x.storage_id()], stringify!($name))?;
                matvec_kernel::<M, $ta>(a, x, y);
                Ok(())
            }

            #[doc = concat!("Checked [`", stringify!($name), "`]")]
            pub fn [<$name _checked>]<M: Matrix>(
                a: Option<&M>,
                x: Option<&M::Vector>,
                y: Option<&mut M::Vector>,
            ) -> Result<()> {
                let a = require(a, "a")?;
                let x = require(x, "x")?;
                let y = require_mut(y, "y")?;
                let (m, k) = effective_shape(a, $ta);
                check_len(x, k)?;
                check_len(y, m)?;
                $name(a, x, y)
            }

            #[doc = concat!("Allocating [`", stringify!($name), "`]")]
            pub fn [<$name _alloc>]<M: Matrix>(
                a: &M,
                x: &M::Vector,
                y: &mut Option<M::Vector>,
            ) -> Result<()> {
                let (m, k) = effective_shape(a, $ta);
                check_len(x, k)?;
                $name(a, x, resize_vector_if_needed(a, y, m))
            }
        }
    };
}

matvec!(multiply_vector, false, "a · x");
matvec!(multiply_transp_vector, true, "aᵗ · x");

/// Bilinear form `xᵗ · a · y`
pub fn bilinear_form<M: Matrix>(x: &M::Vector, a: &M, y: &M::Vector) -> f64 {
    let mut total = 0.0;
    for i in 0..a.rows() {
        let mut row = 0.0;
        for j in 0..a.cols() {
            row += a.get(i, j) * y.get(j);
        }
        total += x.get(i) * row;
    }
    total
}

/// Checked [`bilinear_form`]
pub fn bilinear_form_checked<M: Matrix>(
    x: Option<&M::Vector>,
    a: Option<&M>,
    y: Option<&M::Vector>,
) -> Result<f64> {
    let x = require(x, "x")?;
    let a = require(a, "a")?;
    let y = require(y, "y")?;
    check_len(x, a.rows())?;
    check_len(y, a.cols())?;
    Ok(bilinear_form(x, a, y))
}
