//! Shared runtime resources
//!
//! Nothing in this crate keeps process-wide state. The resources some
//! operations need are explicit values owned by the caller:
//!
//! ```text
//! LinalgContext
//! ├── StdRng (mutex-guarded, seedable)
//! ├── ScratchPool (mutex-guarded free list of temporaries)
//! └── RandomMatrixOptions
//! ```

mod context;
mod pool;
mod random;

pub use context::LinalgContext;
pub use pool::{DEFAULT_POOL_CAPACITY, ScratchPool};
pub use random::{
    RandomMatrixOptions, RandomSource, set_random, set_random_invertible,
    set_random_lower_triangular, set_random_positive_definite_symmetric, set_random_symmetric,
    set_random_upper_triangular,
};
