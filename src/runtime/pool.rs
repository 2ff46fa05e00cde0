//! Recycling pool for scratch matrices
//!
//! Algorithms that need temporaries (the random generators, for instance)
//! take them from a [`ScratchPool`] and hand them back when done, so repeated
//! calls at a fixed size stop allocating. The pool never blocks waiting for a
//! matrix: an empty pool answers `None` and the caller allocates directly.
//!
//! A pool may be constrained to one `(rows, cols)` shape. Changing the
//! constraint purges every entry that no longer fits, under the same lock
//! that guards acquire and release, so a concurrent release can never slip a
//! stale-shaped matrix past the purge.

use parking_lot::Mutex;

use crate::matrix::Matrix;

/// Default number of matrices a pool retains
pub const DEFAULT_POOL_CAPACITY: usize = 16;

#[derive(Debug)]
struct PoolState<M> {
    dimensions: Option<(usize, usize)>,
    free: Vec<M>,
    capacity: usize,
}

impl<M: Matrix> PoolState<M> {
    fn accepts(&self, m: &M) -> bool {
        self.dimensions.is_none_or(|dims| dims == m.shape())
    }
}

/// Thread-safe free list of reusable matrices
///
/// Acquired matrices keep whatever contents they had when released; callers
/// must overwrite them.
#[derive(Debug)]
pub struct ScratchPool<M: Matrix> {
    state: Mutex<PoolState<M>>,
}

impl<M: Matrix> Default for ScratchPool<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Matrix> ScratchPool<M> {
    /// Unconstrained pool with the default capacity
    pub fn new() -> Self {
        Self::build(None, DEFAULT_POOL_CAPACITY)
    }

    /// Pool that only retains `rows x cols` matrices
    pub fn with_dimensions(rows: usize, cols: usize) -> Self {
        Self::build(Some((rows, cols)), DEFAULT_POOL_CAPACITY)
    }

    /// Unconstrained pool retaining at most `capacity` matrices
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(None, capacity)
    }

    fn build(dimensions: Option<(usize, usize)>, capacity: usize) -> Self {
        Self {
            state: Mutex::new(PoolState {
                dimensions,
                free: Vec::with_capacity(capacity.min(DEFAULT_POOL_CAPACITY)),
                capacity,
            }),
        }
    }

    /// Take any pooled matrix, or `None` when the pool is empty
    pub fn try_acquire(&self) -> Option<M> {
        let m = self.state.lock().free.pop();
        if m.is_some() {
            log::debug!(target: "densela::pool", "acquired pooled matrix");
        }
        m
    }

    /// Take a pooled matrix, or build one with `f` when the pool is empty
    pub fn acquire_or_else(&self, f: impl FnOnce() -> M) -> M {
        self.try_acquire().unwrap_or_else(f)
    }

    /// Take a pooled `rows x cols` matrix, or a fresh zeroed companion of `template`
    pub fn acquire_shaped(&self, template: &M, rows: usize, cols: usize) -> M {
        let found = {
            let mut state = self.state.lock();
            state
                .free
                .iter()
                .rposition(|m| m.shape() == (rows, cols))
                .map(|pos| state.free.swap_remove(pos))
        };
        match found {
            Some(m) => {
                log::debug!(target: "densela::pool", "acquired pooled {rows}x{cols} matrix");
                m
            }
            None => template.new_matrix(rows, cols),
        }
    }

    /// Return `m` to the pool
    ///
    /// Returns `false` (and drops `m`) when its shape violates the pool's
    /// constraint or the pool is full.
    pub fn try_release(&self, m: M) -> bool {
        let mut state = self.state.lock();
        if !state.accepts(&m) || state.free.len() >= state.capacity {
            log::debug!(
                target: "densela::pool",
                "rejected {}x{} matrix ({} pooled)",
                m.rows(),
                m.cols(),
                state.free.len()
            );
            return false;
        }
        state.free.push(m);
        true
    }

    /// Change the shape constraint, purging entries that no longer qualify
    pub fn set_dimensions(&self, dimensions: Option<(usize, usize)>) {
        let mut state = self.state.lock();
        state.dimensions = dimensions;
        let before = state.free.len();
        if let Some(dims) = dimensions {
            state.free.retain(|m| m.shape() == dims);
        }
        let purged = before - state.free.len();
        if purged > 0 {
            log::debug!(
                target: "densela::pool",
                "purged {purged} matrices after resize to {dimensions:?}"
            );
        }
    }

    /// Current shape constraint
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.state.lock().dimensions
    }

    /// Maximum number of retained matrices
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity
    }

    /// Number of pooled matrices
    pub fn len(&self) -> usize {
        self.state.lock().free.len()
    }

    /// Whether the pool holds no matrices
    pub fn is_empty(&self) -> bool {
        self.state.lock().free.is_empty()
    }

    /// Drop every pooled matrix
    pub fn clear(&self) {
        self.state.lock().free.clear();
    }
}
