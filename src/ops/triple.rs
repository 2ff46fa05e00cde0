//! Three-factor products
//!
//! All eight transpose combinations of `op(a) · op(b) · op(c)` are exposed
//! as separate functions. A `t` after a factor letter marks it as transposed:
//! `multiply_atbct` computes `aᵗ · b · cᵗ`.
//!
//! The product is accumulated one result row at a time: row `i` of
//! `op(a) · op(b)` is formed in a scratch buffer of length `cols(op(b))` and
//! immediately multiplied by `op(c)`, so neither the transposes nor the
//! intermediate product are materialized.

use super::matmul::entry;
use super::resize::resize_if_needed;
use super::validate::{
    check_distinct, check_inner, check_shape, effective_shape, require, require_mut,
};
use crate::error::Result;
use crate::matrix::Matrix;

/// Result shape of `op(a) · op(b) · op(c)`
fn triple_dims<M: Matrix>(
    a: &M,
    ta: bool,
    b: &M,
    tb: bool,
    c: &M,
    tc: bool,
) -> Result<(usize, usize)> {
    let sa = effective_shape(a, ta);
    let sb = effective_shape(b, tb);
    let sc = effective_shape(c, tc);
    check_inner(sa, sb)?;
    check_inner(sb, sc)?;
    Ok((sa.0, sc.1))
}

fn triple_kernel<M: Matrix, const TA: bool, const TB: bool, const TC: bool>(
    a: &M,
    b: &M,
    c: &M,
    result: &mut M,
) {
    let (m, k) = effective_shape(a, TA);
    let l = effective_shape(b, TB).1;
    let n = effective_shape(c, TC).1;

    let mut row = vec![0.0; l];
    for i in 0..m {
        for (q, slot) in row.iter_mut().enumerate() {
            let mut sum = 0.0;
            for p in 0..k {
                sum += entry::<M, TA>(a, i, p) * entry::<M, TB>(b, p, q);
            }
            *slot = sum;
        }
        for j in 0..n {
            let mut sum = 0.0;
            for (q, &r) in row.iter().enumerate() {
                sum += r * entry::<M, TC>(c, q, j);
            }
            result.set(i, j, sum);
        }
    }
}

macro_rules! three_factor {
    ($suffix:ident, $ta:literal, $tb:literal, $tc:literal, $formula:literal) => {
        paste::paste! {
            #[doc = concat!("`result = ", $formula, "`")]
            ///
            /// Shapes are not validated; `result` must not share storage with
            /// any operand.
            pub fn [<multiply_ $suffix>]<M: Matrix>(a: &M, b: &M, c: &M, result: &mut M) -> Result<()> {
                check_distinct(
                    result.storage_id(),
                    &[a.storage_id(), b.storage_id(), c.storage_id()],
                    stringify!([<multiply_ $suffix>]),
                )?;
                triple_kernel::<M, $ta, $tb, $tc>(a, b, c, result);
                Ok(())
            }

            #[doc = concat!("Checked `", $formula, "`")]
            pub fn [<multiply_ $suffix _checked>]<M: Matrix>(
                a: Option<&M>,
                b: Option<&M>,
                c: Option<&M>,
                result: Option<&mut M>,
            ) -> Result<()> {
                let a = require(a, "a")?;
                let b = require(b, "b")?;
                let c = require(c, "c")?;
                let result = require_mut(result, "result")?;
                let shape = triple_dims(a, $ta, b, $tb, c, $tc)?;
                check_shape(result, shape)?;
                [<multiply_ $suffix>](a, b, c, result)
            }

            #[doc = concat!("Allocating `", $formula, "`")]
            pub fn [<multiply_ $suffix _alloc>]<M: Matrix>(
                a: &M,
                b: &M,
                c: &M,
                result: &mut Option<M>,
            ) -> Result<()> {
                let (m, n) = triple_dims(a, $ta, b, $tb, c, $tc)?;
                [<multiply_ $suffix>](a, b, c, resize_if_needed(a, result, m, n))
            }
        }
    };
}

three_factor!(abc, false, false, false, "a · b · c");
three_factor!(abct, false, false, true, "a · b · cᵗ");
three_factor!(abtc, false, true, false, "a · bᵗ · c");
three_factor!(abtct, false, true, true, "a · bᵗ · cᵗ");
three_factor!(atbc, true, false, false, "aᵗ · b · c");
three_factor!(atbct, true, false, true, "aᵗ · b · cᵗ");
three_factor!(atbtc, true, true, false, "aᵗ · bᵗ · c");
three_factor!(atbtct, true, true, true, "aᵗ · bᵗ · cᵗ");
