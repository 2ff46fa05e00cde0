//! Integration tests for the product family
//!
//! Tests verify:
//! - Every transposed two-factor and three-factor variant agrees with
//!   explicit transposes followed by plain products
//! - Diagonal specializations agree with full products
//! - Every non-diagonal product rejects a result aliasing an operand

mod common;

use common::{assert_allclose_f64, random_matrix};
use densela::error::{Error, Result};
use densela::ops::*;
use densela::prelude::*;
use proptest::prelude::*;

type TwoFactor = fn(&DenseMatrix, &DenseMatrix, &mut Option<DenseMatrix>) -> Result<()>;
type ThreeFactor =
    fn(&DenseMatrix, &DenseMatrix, &DenseMatrix, &mut Option<DenseMatrix>) -> Result<()>;

const TWO_FACTOR: [(&str, bool, bool, TwoFactor); 4] = [
    ("multiply", false, false, multiply_alloc::<DenseMatrix>),
    ("multiply_transp_mat", true, false, multiply_transp_mat_alloc::<DenseMatrix>),
    ("multiply_mat_transp", false, true, multiply_mat_transp_alloc::<DenseMatrix>),
    ("multiply_transp_transp", true, true, multiply_transp_transp_alloc::<DenseMatrix>),
];

const THREE_FACTOR: [(&str, [bool; 3], ThreeFactor); 8] = [
    ("abc", [false, false, false], multiply_abc_alloc::<DenseMatrix>),
    ("abct", [false, false, true], multiply_abct_alloc::<DenseMatrix>),
    ("abtc", [false, true, false], multiply_abtc_alloc::<DenseMatrix>),
    ("abtct", [false, true, true], multiply_abtct_alloc::<DenseMatrix>),
    ("atbc", [true, false, false], multiply_atbc_alloc::<DenseMatrix>),
    ("atbct", [true, false, true], multiply_atbct_alloc::<DenseMatrix>),
    ("atbtc", [true, true, false], multiply_atbtc_alloc::<DenseMatrix>),
    ("atbtct", [true, true, true], multiply_atbtct_alloc::<DenseMatrix>),
];

/// A matrix whose `op` (transpose when `t`) has shape `rows x cols`
fn operand(rows: usize, cols: usize, t: bool, seed: u64) -> DenseMatrix {
    if t {
        random_matrix(cols, rows, seed)
    } else {
        random_matrix(rows, cols, seed)
    }
}

fn op(m: &DenseMatrix, t: bool) -> DenseMatrix {
    if t {
        let mut out = None;
        transpose_alloc(m, &mut out);
        out.unwrap()
    } else {
        m.clone()
    }
}

fn explicit_product(a: &DenseMatrix, b: &DenseMatrix) -> DenseMatrix {
    let mut out = None;
    multiply_alloc(a, b, &mut out).unwrap();
    out.unwrap()
}

proptest! {
    #[test]
    fn prop_two_factor_variants_match_explicit_transpose(
        m in 1usize..6, k in 1usize..6, n in 1usize..6, seed in 0u64..1000,
    ) {
        for (name, ta, tb, f) in TWO_FACTOR {
            let a = operand(m, k, ta, seed);
            let b = operand(k, n, tb, seed + 1);
            let mut fast = None;
            f(&a, &b, &mut fast).unwrap();

            let expected = explicit_product(&op(&a, ta), &op(&b, tb));
            let fast = fast.unwrap();
            prop_assert_eq!(fast.shape(), (m, n), "{}", name);
            assert_allclose_f64(&fast.to_array(), &expected.to_array(), 1e-12, 1e-12, name);
        }
    }

    #[test]
    fn prop_three_factor_variants_match_explicit_transpose(
        m in 1usize..5, k in 1usize..5, l in 1usize..5, n in 1usize..5, seed in 0u64..1000,
    ) {
        for (name, [ta, tb, tc], f) in THREE_FACTOR {
            let a = operand(m, k, ta, seed);
            let b = operand(k, l, tb, seed + 1);
            let c = operand(l, n, tc, seed + 2);
            let mut fast = None;
            f(&a, &b, &c, &mut fast).unwrap();

            let ab = explicit_product(&op(&a, ta), &op(&b, tb));
            let expected = explicit_product(&ab, &op(&c, tc));
            let fast = fast.unwrap();
            prop_assert_eq!(fast.shape(), (m, n), "{}", name);
            assert_allclose_f64(&fast.to_array(), &expected.to_array(), 1e-12, 1e-12, name);
        }
    }
}

#[test]
fn test_every_product_rejects_aliasing() {
    let a = random_matrix(3, 3, 1);
    let b = random_matrix(3, 3, 2);
    let c = random_matrix(3, 3, 3);

    for (name, _, _, f) in TWO_FACTOR {
        for shared in [&a, &b] {
            let mut alias = Some(shared.clone());
            assert_eq!(f(&a, &b, &mut alias), Err(Error::aliased(name)));
        }
    }

    for (name, _, f) in THREE_FACTOR {
        for shared in [&a, &b, &c] {
            let mut alias = Some(shared.clone());
            match f(&a, &b, &c, &mut alias) {
                Err(Error::AliasingViolation { op }) => assert_eq!(op, format!("multiply_{name}")),
                other => panic!("multiply_{name}: expected aliasing violation, got {other:?}"),
            }
        }
    }

    let d = DenseVector::from_slice(&[1.0, 2.0, 3.0]);
    let mut alias = a.clone();
    assert!(multiply_transp_diag_mat(&a, &d, &b, &mut alias).is_err());
    let mut alias = b.clone();
    assert!(multiply_mat_diag_transp(&a, &d, &b, &mut alias).is_err());
}

#[test]
fn test_written_result_no_longer_aliases() {
    let a = random_matrix(2, 2, 5);
    let mut result = a.clone();
    assert!(multiply(&a, &a, &mut result).is_err());

    // Writing detaches the clone, after which it is a valid result buffer
    result.set(0, 0, 0.0);
    assert!(multiply(&a, &a, &mut result).is_ok());
    assert_eq!(result, explicit_product(&a, &a));
}

#[test]
fn test_diagonal_specializations() {
    let a = random_matrix(4, 3, 11);
    let b = random_matrix(4, 2, 12);
    let d4 = DenseVector::from_slice(&[1.0, 2.0, 0.5, 4.0]);

    let mut diag = DenseMatrix::zeros(4, 4);
    set_diagonal(&mut diag, &d4);

    let mut fast = None;
    multiply_transp_diag_mat_alloc(&a, &d4, &b, &mut fast).unwrap();
    let mut expected = None;
    multiply_atbc_alloc(&a, &diag, &b, &mut expected).unwrap();
    assert_allclose_f64(
        &fast.unwrap().to_array(),
        &expected.unwrap().to_array(),
        1e-12,
        1e-12,
        "aᵗ·diag(d)·b",
    );

    let mut scaled = None;
    divide_diag_mat_alloc(&a, &d4, &mut scaled).unwrap();
    let mut back = None;
    multiply_diag_mat_alloc(scaled.as_ref().unwrap(), &d4, &mut back).unwrap();
    assert_allclose_f64(&back.unwrap().to_array(), &a.to_array(), 1e-15, 0.0, "diag round trip");
}

#[test]
fn test_bilinear_form_matches_products() {
    let a = random_matrix(3, 4, 21);
    let x = DenseVector::from_slice(&[1.0, -2.0, 0.5]);
    let y = DenseVector::from_slice(&[0.0, 1.0, 3.0, -1.0]);

    let mut ay = None;
    multiply_vector_alloc(&a, &y, &mut ay).unwrap();
    let expected = x.dot(ay.as_ref().unwrap());
    let value = bilinear_form_checked(Some(&x), Some(&a), Some(&y)).unwrap();
    assert!((value - expected).abs() < 1e-12);

    assert_eq!(
        bilinear_form_checked::<DenseMatrix>(None, Some(&a), Some(&y)),
        Err(Error::MissingOperand { arg: "x" })
    );
}
