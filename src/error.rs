//! Error types for densela

use thiserror::Error;

/// Result type alias using densela's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in densela operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A required matrix, vector or array was not supplied
    #[error("Missing operand '{arg}'")]
    MissingOperand {
        /// The argument name
        arg: &'static str,
    },

    /// Incompatible row/column counts for the requested operation
    #[error("Shape mismatch: {lhs:?} vs {rhs:?}")]
    ShapeMismatch {
        /// Shape of the left-hand side (or the expected shape)
        lhs: (usize, usize),
        /// Shape of the right-hand side (or the shape actually found)
        rhs: (usize, usize),
    },

    /// The result buffer shares storage with an operand the operation reads
    #[error("Operation '{op}' cannot be computed in place: result aliases an operand")]
    AliasingViolation {
        /// The operation name
        op: &'static str,
    },

    /// A pivot or diagonal entry fell below the decomposition tolerance
    #[error("Singular or indefinite matrix in '{op}': entry {index} has magnitude {value:e}")]
    SingularMatrix {
        /// The decomposition name
        op: &'static str,
        /// Row/column of the failing pivot
        index: usize,
        /// The offending pivot, diagonal or radicand value
        value: f64,
    },

    /// Gram-Schmidt could not normalize a column
    #[error("Rank deficiency: column {column} has residual norm {norm:e}")]
    RankDeficiency {
        /// The column that collapsed
        column: usize,
        /// Residual norm after orthogonalization
        norm: f64,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(lhs: (usize, usize), rhs: (usize, usize)) -> Self {
        Self::ShapeMismatch { lhs, rhs }
    }

    /// Create an aliasing error
    pub fn aliased(op: &'static str) -> Self {
        Self::AliasingViolation { op }
    }

    /// Create a missing operand error
    pub fn missing(arg: &'static str) -> Self {
        Self::MissingOperand { arg }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = Error::shape_mismatch((2, 3), (4, 5));
        assert_eq!(err.to_string(), "Shape mismatch: (2, 3) vs (4, 5)");
    }

    #[test]
    fn test_aliasing_display() {
        let err = Error::aliased("multiply");
        assert!(err.to_string().contains("multiply"));
        assert!(err.to_string().contains("in place"));
    }
}
