//! Products with diagonal matrices
//!
//! A diagonal matrix is passed as the vector of its diagonal. Scaling the
//! rows or columns of a matrix this way costs O(rows · cols) and never builds
//! `diag(d)`.
//!
//! The row/column scalings read each element once before writing it, so they
//! are safe when `result` shares storage with `a`. The three-factor forms
//! (`aᵗ · diag(d) · b`, `a · diag(d) · bᵗ`) are ordinary products and reject
//! aliasing like the rest of the product family.

use super::matmul::entry;
use super::resize::resize_if_needed;
use super::validate::{
    check_distinct, check_len, check_same_shape, check_shape, require, require_mut,
};
use crate::error::{Error, Result};
use crate::matrix::{Matrix, Vector};

/// Which side `diag(d)` multiplies from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagonalSide {
    /// `diag(d) · a`: scales rows
    Left,
    /// `a · diag(d)`: scales columns
    Right,
}

impl DiagonalSide {
    /// Required length of `d` for a matrix of `shape`
    #[inline]
    fn len_for(self, shape: (usize, usize)) -> usize {
        match self {
            DiagonalSide::Left => shape.0,
            DiagonalSide::Right => shape.1,
        }
    }
}

/// Scale the rows (`Left`) or columns (`Right`) of `a` by `d`, or divide
/// them when `invert` is set
pub fn diagonal_scale<M: Matrix, V: Vector>(
    side: DiagonalSide,
    invert: bool,
    a: &M,
    d: &V,
    result: &mut M,
) {
    for i in 0..a.rows() {
        for j in 0..a.cols() {
            let di = match side {
                DiagonalSide::Left => d.get(i),
                DiagonalSide::Right => d.get(j),
            };
            let v = a.get(i, j);
            result.set(i, j, if invert { v / di } else { v * di });
        }
    }
}

macro_rules! diagonal_op {
    ($name:ident, $side:expr, $invert:literal, $formula:literal) => {
        paste::paste! {
            #[doc = concat!("`result = ", $formula, "`")]
            pub fn $name<M: Matrix, V: Vector>(a: &M, d: &V, result: &mut M) {
                diagonal_scale($side, $invert, a, d, result);
            }

            #[doc = concat!("Checked [`", stringify!($name), "`]")]
            pub fn [<$name _checked>]<M: Matrix, V: Vector>(
                a: Option<&M>,
                d: Option<&V>,
                result: Option<&mut M>,
            ) -> Result<()> {
                let a = require(a, "a")?;
                let d = require(d, "d")?;
                let result = require_mut(result, "result")?;
                check_len(d, $side.len_for(a.shape()))?;
                check_same_shape(a, result)?;
                $name(a, d, result);
                Ok(())
            }

            #[doc = concat!("Allocating [`", stringify!($name), "`]")]
            pub fn [<$name _alloc>]<M: Matrix, V: Vector>(
                a: &M,
                d: &V,
                result: &mut Option<M>,
            ) -> Result<()> {
                check_len(d, $side.len_for(a.shape()))?;
                let (rows, cols) = a.shape();
                $name(a, d, resize_if_needed(a, result, rows, cols));
                Ok(())
            }

            #[doc = concat!("[`", stringify!($name), "`] overwriting `a`")]
            pub fn [<$name _in_place>]<M: Matrix, V: Vector>(a: &mut M, d: &V) {
                for i in 0..a.rows() {
                    for j in 0..a.cols() {
                        let di = match $side {
                            DiagonalSide::Left => d.get(i),
                            DiagonalSide::Right => d.get(j),
                        };
                        let v = a.get(i, j);
                        a.set(i, j, if $invert { v / di } else { v * di });
                    }
                }
            }

            #[doc = concat!("Checked [`", stringify!($name), "_in_place`]")]
            pub fn [<$name _in_place_checked>]<M: Matrix, V: Vector>(
                a: Option<&mut M>,
                d: Option<&V>,
            ) -> Result<()> {
                let a = require_mut(a, "a")?;
                let d = require(d, "d")?;
                check_len(d, $side.len_for(a.shape()))?;
                [<$name _in_place>](a, d);
                Ok(())
            }
        }
    };
}

diagonal_op!(multiply_diag_mat, DiagonalSide::Left, false, "diag(d) · a");
diagonal_op!(multiply_mat_diag, DiagonalSide::Right, false, "a · diag(d)");
diagonal_op!(divide_diag_mat, DiagonalSide::Left, true, "diag(d)⁻¹ · a");
diagonal_op!(divide_mat_diag, DiagonalSide::Right, true, "a · diag(d)⁻¹");

fn weighted_kernel<M: Matrix, V: Vector, const TA: bool, const TB: bool>(
    a: &M,
    d: &V,
    b: &M,
    result: &mut M,
) {
    let (rows, cols) = result.shape();
    for i in 0..rows {
        for j in 0..cols {
            let mut sum = 0.0;
            for p in 0..d.len() {
                sum += entry::<M, TA>(a, i, p) * d.get(p) * entry::<M, TB>(b, p, j);
            }
            result.set(i, j, sum);
        }
    }
}

/// `result = aᵗ · diag(d) · b`
///
/// `a` and `b` must have `d.len()` rows; `result` is `a.cols() x b.cols()`
/// and must not share storage with `a` or `b`.
pub fn multiply_transp_diag_mat<M: Matrix, V: Vector>(
    a: &M,
    d: &V,
    b: &M,
    result: &mut M,
) -> Result<()> {
    check_distinct(
        result.storage_id(),
        &[a.storage_id(), b.storage_id()],
        "multiply_transp_diag_mat",
    )?;
    weighted_kernel::<M, V, true, false>(a, d, b, result);
    Ok(())
}

/// Checked [`multiply_transp_diag_mat`]
pub fn multiply_transp_diag_mat_checked<M: Matrix, V: Vector>(
    a: Option<&M>,
    d: Option<&V>,
    b: Option<&M>,
    result: Option<&mut M>,
) -> Result<()> {
    let a = require(a, "a")?;
    let d = require(d, "d")?;
    let b = require(b, "b")?;
    let result = require_mut(result, "result")?;
    check_weighted(a.rows(), d, b.rows(), a, b)?;
    check_shape(result, (a.cols(), b.cols()))?;
    multiply_transp_diag_mat(a, d, b, result)
}

/// Allocating [`multiply_transp_diag_mat`]
pub fn multiply_transp_diag_mat_alloc<M: Matrix, V: Vector>(
    a: &M,
    d: &V,
    b: &M,
    result: &mut Option<M>,
) -> Result<()> {
    check_weighted(a.rows(), d, b.rows(), a, b)?;
    multiply_transp_diag_mat(a, d, b, resize_if_needed(a, result, a.cols(), b.cols()))
}

/// `result = a · diag(d) · bᵗ`
///
/// `a` and `b` must have `d.len()` columns; `result` is `a.rows() x b.rows()`
/// and must not share storage with `a` or `b`.
pub fn multiply_mat_diag_transp<M: Matrix, V: Vector>(
    a: &M,
    d: &V,
    b: &M,
    result: &mut M,
) -> Result<()> {
    check_distinct(
        result.storage_id(),
        &[a.storage_id(), b.storage_id()],
        "multiply_mat_diag_transp",
    )?;
    weighted_kernel::<M, V, false, true>(a, d, b, result);
    Ok(())
}

/// Checked [`multiply_mat_diag_transp`]
pub fn multiply_mat_diag_transp_checked<M: Matrix, V: Vector>(
    a: Option<&M>,
    d: Option<&V>,
    b: Option<&M>,
    result: Option<&mut M>,
) -> Result<()> {
    let a = require(a, "a")?;
    let d = require(d, "d")?;
    let b = require(b, "b")?;
    let result = require_mut(result, "result")?;
    check_weighted(a.cols(), d, b.cols(), a, b)?;
    check_shape(result, (a.rows(), b.rows()))?;
    multiply_mat_diag_transp(a, d, b, result)
}

/// Allocating [`multiply_mat_diag_transp`]
pub fn multiply_mat_diag_transp_alloc<M: Matrix, V: Vector>(
    a: &M,
    d: &V,
    b: &M,
    result: &mut Option<M>,
) -> Result<()> {
    check_weighted(a.cols(), d, b.cols(), a, b)?;
    multiply_mat_diag_transp(a, d, b, resize_if_needed(a, result, a.rows(), b.rows()))
}

/// The shared dimension of `a`, `d` and `b` must agree
fn check_weighted<M: Matrix, V: Vector>(
    a_inner: usize,
    d: &V,
    b_inner: usize,
    a: &M,
    b: &M,
) -> Result<()> {
    check_len(d, a_inner)?;
    if a_inner != b_inner {
        return Err(Error::shape_mismatch(a.shape(), b.shape()));
    }
    Ok(())
}
