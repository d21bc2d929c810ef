//! Error types for dense containers and their on-disk format.
//!
//! Structured error handling with `thiserror`, plus helper methods for
//! error categorization.

use thiserror::Error;

/// Errors that can occur when building, combining or persisting dense buffers.
#[derive(Debug, Error)]
pub enum DenseError {
    /// A buffer was requested with a zero dimension.
    #[error("dimensions must be >= 1, got {rows}x{cols}")]
    EmptyDimension {
        /// Requested number of rows
        rows: usize,
        /// Requested number of columns
        cols: usize,
    },

    /// Operands have structurally incompatible shapes.
    #[error("{operation}: dimension mismatch, expected {expected}, got {got}")]
    DimensionMismatch {
        /// Operation that rejected its operands
        operation: &'static str,
        /// Expected extent
        expected: usize,
        /// Actual extent
        got: usize,
    },

    /// An index (row, column or component) lies outside the buffer.
    #[error("index {index} out of bounds for extent {len}")]
    IndexOutOfBounds {
        /// The offending index
        index: usize,
        /// The extent it was checked against
        len: usize,
    },

    /// A stored file disagrees with its own header.
    #[error("storage corruption: {reason}")]
    StorageCorruption {
        /// What the loader found inconsistent
        reason: String,
    },

    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for dense container operations.
pub type Result<T> = std::result::Result<T, DenseError>;

impl DenseError {
    /// Returns `true` if operand shapes were incompatible.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            DenseError::EmptyDimension { .. } | DenseError::DimensionMismatch { .. }
        )
    }

    /// Returns `true` if a stored file failed validation.
    pub fn is_corruption(&self) -> bool {
        matches!(self, DenseError::StorageCorruption { .. })
    }

    pub(crate) fn corruption(reason: impl Into<String>) -> Self {
        DenseError::StorageCorruption {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DenseError::DimensionMismatch {
            operation: "matmul",
            expected: 3,
            got: 2,
        };
        assert_eq!(
            err.to_string(),
            "matmul: dimension mismatch, expected 3, got 2"
        );
    }

    #[test]
    fn test_categories() {
        let dim = DenseError::EmptyDimension { rows: 0, cols: 2 };
        let bad = DenseError::corruption("truncated");

        assert!(dim.is_dimension_error());
        assert!(!dim.is_corruption());
        assert!(bad.is_corruption());
        assert!(!bad.is_dimension_error());
    }
}
