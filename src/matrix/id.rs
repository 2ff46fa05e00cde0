//! Backing-store identity for aliasing detection

use std::sync::Arc;

/// Identity of a matrix or vector backing store
///
/// Two handles compare equal exactly when they currently read and write the
/// same allocation. Handles obtained through `clone` share a store until one
/// of them is mutated, at which point the writer is detached onto a private
/// copy and receives a fresh identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StorageId(usize);

impl StorageId {
    /// Identity of the allocation behind an `Arc`
    #[inline]
    pub fn of<T: ?Sized>(store: &Arc<T>) -> Self {
        Self(Arc::as_ptr(store) as *const () as usize)
    }

    /// Get the raw address value
    #[inline]
    pub fn raw(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for StorageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Storage({:#x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_allocations() {
        let a = Arc::new(vec![0.0f64; 4]);
        let b = Arc::new(vec![0.0f64; 4]);

        assert_ne!(StorageId::of(&a), StorageId::of(&b));
    }

    #[test]
    fn test_shared_allocation() {
        let a = Arc::new(vec![1.0f64; 4]);
        let b = Arc::clone(&a);

        assert_eq!(StorageId::of(&a), StorageId::of(&b));
    }
}
