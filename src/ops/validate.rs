//! Operand validation shared by the checked and allocating conventions

use crate::error::{Error, Result};
use crate::matrix::{Matrix, StorageId, Vector};

/// Unwrap a checked-convention operand, reporting `arg` when it is absent
#[inline]
pub fn require<'a, T>(operand: Option<&'a T>, arg: &'static str) -> Result<&'a T> {
    operand.ok_or_else(|| Error::missing(arg))
}

/// Mutable counterpart of [`require`]
#[inline]
pub fn require_mut<'a, T>(operand: Option<&'a mut T>, arg: &'static str) -> Result<&'a mut T> {
    operand.ok_or_else(|| Error::missing(arg))
}

/// Validate that two matrices have identical shapes
#[inline]
pub fn check_same_shape<A: Matrix, B: Matrix>(a: &A, b: &B) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(Error::shape_mismatch(a.shape(), b.shape()));
    }
    Ok(())
}

/// Validate that `m` has exactly the `expected` shape
#[inline]
pub fn check_shape<M: Matrix>(m: &M, expected: (usize, usize)) -> Result<()> {
    if m.shape() != expected {
        return Err(Error::shape_mismatch(expected, m.shape()));
    }
    Ok(())
}

/// Validate that `m` is square, returning its order
#[inline]
pub fn check_square<M: Matrix>(m: &M) -> Result<usize> {
    let (rows, cols) = m.shape();
    if rows != cols {
        return Err(Error::shape_mismatch((rows, rows), (rows, cols)));
    }
    Ok(rows)
}

/// Validate that `v` has `expected` elements
#[inline]
pub fn check_len<V: Vector>(v: &V, expected: usize) -> Result<()> {
    if v.len() != expected {
        return Err(Error::shape_mismatch((expected, 1), (v.len(), 1)));
    }
    Ok(())
}

/// Validate that the inner dimensions of a product agree
///
/// `lhs` and `rhs` are the effective (possibly transposed) operand shapes.
#[inline]
pub fn check_inner(lhs: (usize, usize), rhs: (usize, usize)) -> Result<()> {
    if lhs.1 != rhs.0 {
        return Err(Error::shape_mismatch(lhs, rhs));
    }
    Ok(())
}

/// Reject a result buffer that shares storage with any operand
#[inline]
pub fn check_distinct(result: StorageId, operands: &[StorageId], op: &'static str) -> Result<()> {
    if operands.contains(&result) {
        return Err(Error::aliased(op));
    }
    Ok(())
}

/// Shape of `m`, or of its transpose when `transposed` is set
#[inline]
pub fn effective_shape<M: Matrix>(m: &M, transposed: bool) -> (usize, usize) {
    if transposed {
        (m.cols(), m.rows())
    } else {
        m.shape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{DenseMatrix, DenseVector};

    #[test]
    fn test_require_missing() {
        let err = require::<DenseMatrix>(None, "a").unwrap_err();
        assert_eq!(err, Error::MissingOperand { arg: "a" });
    }

    #[test]
    fn test_check_square() {
        assert_eq!(check_square(&DenseMatrix::zeros(3, 3)).unwrap(), 3);
        assert_eq!(
            check_square(&DenseMatrix::zeros(2, 3)).unwrap_err(),
            Error::shape_mismatch((2, 2), (2, 3))
        );
    }

    #[test]
    fn test_check_len() {
        let v = DenseVector::zeros(4);
        assert!(check_len(&v, 4).is_ok());
        assert!(check_len(&v, 3).is_err());
    }

    #[test]
    fn test_check_distinct() {
        let a = DenseMatrix::zeros(2, 2);
        let b = a.clone();
        let c = DenseMatrix::zeros(2, 2);

        assert!(check_distinct(c.storage_id(), &[a.storage_id()], "op").is_ok());
        assert_eq!(
            check_distinct(b.storage_id(), &[c.storage_id(), a.storage_id()], "op"),
            Err(Error::aliased("op"))
        );
    }
}
