//! Error types for factorization and direct solves.
//!
//! Structured error handling with `thiserror`, plus helper methods so callers
//! can branch on the error category without matching every variant.

use thiserror::Error;

/// Errors that can occur while factoring or solving a linear system.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Operand lengths are structurally incompatible.
    #[error("system is dimensionally inconsistent: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length (the system side)
        expected: usize,
        /// Actual length of the offending operand
        got: usize,
    },

    /// Factorization requires a square matrix.
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// A row with no non-zero entry leaves the system without a unique solution.
    #[error("no unique solution: row {row} is identically zero")]
    ZeroRow {
        /// Index of the zero row
        row: usize,
    },

    /// A pivot collapsed within rounding tolerance during elimination.
    #[error("no unique solution: pivot vanished at elimination step {step}")]
    SingularPivot {
        /// Zero-based elimination step
        step: usize,
    },

    /// The matrix changed after it was factored and was not refactored.
    #[error(
        "stale factorization: matrix is at revision {current}, factorization was built at revision {factored}"
    )]
    StaleFactorization {
        /// Revision the cached factorization was built from
        factored: u64,
        /// Current revision of the matrix
        current: u64,
    },

    /// A handle no longer refers to a live factorization.
    #[error("no factorization registered for handle {slot}:{generation}")]
    UnknownFactorization {
        /// Slot index of the handle
        slot: usize,
        /// Generation of the handle
        generation: u64,
    },

    /// Solver configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A specialized `Result` type for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;

impl SolverError {
    /// Returns `true` if operand shapes were incompatible.
    ///
    /// This includes `DimensionMismatch` and `NotSquare`.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            SolverError::DimensionMismatch { .. } | SolverError::NotSquare { .. }
        )
    }

    /// Returns `true` if the system has no unique solution.
    ///
    /// This includes `ZeroRow` and `SingularPivot`.
    pub fn is_singular(&self) -> bool {
        matches!(
            self,
            SolverError::ZeroRow { .. } | SolverError::SingularPivot { .. }
        )
    }

    /// Returns `true` if a cached factorization no longer matches its matrix.
    pub fn is_stale(&self) -> bool {
        matches!(self, SolverError::StaleFactorization { .. })
    }
}
