//! Reuse-or-reallocate policy for result references
//!
//! The allocating convention hands results around as `&mut Option<M>`. A
//! result that is present and already has the required shape is reused as
//! is; anything else (absent, or wrongly sized) is replaced by a fresh
//! zero-filled companion built from a template operand, so the result is
//! always of the template's family.

use crate::matrix::{Matrix, Vector};

/// Ensure `result` holds a `rows x cols` matrix, returning it
pub fn resize_if_needed<'r, M: Matrix>(
    template: &M,
    result: &'r mut Option<M>,
    rows: usize,
    cols: usize,
) -> &'r mut M {
    if result.as_ref().is_some_and(|m| m.shape() != (rows, cols)) {
        log::trace!(
            target: "densela::resize",
            "discarding result of wrong shape, need {rows}x{cols}"
        );
        *result = None;
    }
    result.get_or_insert_with(|| template.new_matrix(rows, cols))
}

/// Ensure `result` holds a vector of `len` elements from `template`'s vector family
pub fn resize_vector_if_needed<'r, M: Matrix>(
    template: &M,
    result: &'r mut Option<M::Vector>,
    len: usize,
) -> &'r mut M::Vector {
    if result.as_ref().is_some_and(|v| v.len() != len) {
        log::trace!(
            target: "densela::resize",
            "discarding vector result of wrong length, need {len}"
        );
        *result = None;
    }
    result.get_or_insert_with(|| template.new_vector(len))
}

/// Ensure `result` holds a vector of `len` elements from `template`'s family
pub fn resize_like_vector<'r, V: Vector>(
    template: &V,
    result: &'r mut Option<V>,
    len: usize,
) -> &'r mut V {
    if result.as_ref().is_some_and(|v| v.len() != len) {
        *result = None;
    }
    result.get_or_insert_with(|| template.new_vector(len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{DenseMatrix, JaggedMatrix};

    #[test]
    fn test_allocates_when_absent() {
        let template = JaggedMatrix::zeros(2, 2);
        let mut result: Option<JaggedMatrix> = None;

        let m = resize_if_needed(&template, &mut result, 3, 5);
        assert_eq!(m.shape(), (3, 5));
        assert!(result.is_some());
    }

    #[test]
    fn test_reuses_matching_result() {
        let template = DenseMatrix::zeros(2, 2);
        let existing = DenseMatrix::zeros(3, 3);
        let id = existing.storage_id();
        let mut result = Some(existing);

        let m = resize_if_needed(&template, &mut result, 3, 3);
        assert_eq!(m.storage_id(), id);
    }

    #[test]
    fn test_replaces_wrong_shape() {
        let template = DenseMatrix::zeros(2, 2);
        let mut result = Some(DenseMatrix::from_fn(2, 3, |_, _| 1.0));

        let m = resize_if_needed(&template, &mut result, 3, 2);
        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m.get(0, 0), 0.0);
    }

    #[test]
    fn test_vector_resize() {
        let template = DenseMatrix::zeros(2, 2);
        let mut result = None;

        let v = resize_vector_if_needed(&template, &mut result, 4);
        assert_eq!(v.len(), 4);
    }
}
