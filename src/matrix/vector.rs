//! Vector capability contract and the dense vector family

use super::id::StorageId;
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// A mutable vector of `f64` elements
pub trait Vector: Clone + fmt::Debug + Send + Sync + Sized {
    /// Number of elements
    fn len(&self) -> usize;

    /// Read element `i`
    fn get(&self, i: usize) -> f64;

    /// Write element `i`
    fn set(&mut self, i: usize, value: f64);

    /// New zero-filled vector of the same family
    fn new_vector(&self, len: usize) -> Self;

    /// Identity of the backing store
    fn storage_id(&self) -> StorageId;

    /// Whether the vector has no elements
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of all elements
    fn to_vec(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }

    /// Inner product with a vector of equal length
    fn dot<V: Vector>(&self, other: &V) -> f64 {
        (0..self.len()).map(|i| self.get(i) * other.get(i)).sum()
    }

    /// Euclidean norm
    fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }
}

/// Contiguous vector with the same handle semantics as [`super::DenseMatrix`]
#[derive(Clone, Debug)]
pub struct DenseVector {
    data: Arc<Vec<f64>>,
}

impl DenseVector {
    /// Create a zero-filled vector
    pub fn zeros(len: usize) -> Self {
        Self {
            data: Arc::new(vec![0.0; len]),
        }
    }

    /// Create a vector from a slice
    pub fn from_slice(data: &[f64]) -> Self {
        Self {
            data: Arc::new(data.to_vec()),
        }
    }

    /// Create a vector taking ownership of `data`
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    /// Create a non-empty vector, rejecting empty input
    pub fn try_from_slice(data: &[f64]) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::invalid_argument("data", "vector must not be empty"));
        }
        Ok(Self::from_slice(data))
    }

    /// View of the elements
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable view of the elements, detaching from shared handles
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }
}

impl Vector for DenseVector {
    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn get(&self, i: usize) -> f64 {
        self.data[i]
    }

    #[inline]
    fn set(&mut self, i: usize, value: f64) {
        self.as_mut_slice()[i] = value;
    }

    fn new_vector(&self, len: usize) -> Self {
        Self::zeros(len)
    }

    #[inline]
    fn storage_id(&self) -> StorageId {
        StorageId::of(&self.data)
    }

    fn to_vec(&self) -> Vec<f64> {
        self.data.as_ref().clone()
    }
}

impl PartialEq for DenseVector {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl From<Vec<f64>> for DenseVector {
    fn from(data: Vec<f64>) -> Self {
        Self::from_vec(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_and_norm() {
        let a = DenseVector::from_slice(&[3.0, 4.0]);
        let b = DenseVector::from_slice(&[1.0, 2.0]);

        assert_eq!(a.dot(&b), 11.0);
        assert_eq!(a.norm(), 5.0);
    }

    #[test]
    fn test_write_detaches_clone() {
        let a = DenseVector::from_slice(&[1.0, 2.0]);
        let mut b = a.clone();
        assert_eq!(a.storage_id(), b.storage_id());

        b.set(0, 9.0);
        assert_ne!(a.storage_id(), b.storage_id());
        assert_eq!(a.get(0), 1.0);
    }

    #[test]
    fn test_try_from_slice_rejects_empty() {
        assert!(DenseVector::try_from_slice(&[]).is_err());
    }
}
