//! Error type shared by the container algebras
//!
//! Only structural problems are errors. Numeric edge cases such as dividing by a zero
//! quaternion are not: they produce NaN or infinite components, which can be detected
//! with [Predicates](crate::ops::Predicates).

use thiserror::Error;

/// Result type for container operations
pub type Result<T> = std::result::Result<T, AlgebraError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgebraError {
    #[error("shape mismatch in {op}: {left:?} vs {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: Vec<usize>,
        right: Vec<usize>,
    },

    #[error("index {index} out of range for {op} (limit {limit})")]
    IndexOutOfRange {
        op: &'static str,
        index: usize,
        limit: usize,
    },

    #[error("invalid argument to {op}: {reason}")]
    InvalidArgument { op: &'static str, reason: String },

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("parse error at byte {position}: {reason}")]
    Parse { position: usize, reason: String },
}

impl AlgebraError {
    pub(crate) fn shape(op: &'static str, left: &[usize], right: &[usize]) -> AlgebraError {
        AlgebraError::ShapeMismatch {
            op,
            left: left.to_vec(),
            right: right.to_vec(),
        }
    }

    pub(crate) fn invalid(op: &'static str, reason: impl Into<String>) -> AlgebraError {
        AlgebraError::InvalidArgument {
            op,
            reason: reason.into(),
        }
    }
}
