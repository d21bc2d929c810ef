//! Error types for the numerical methods.

use thiserror::Error;

/// Errors raised by the ODE integrators and root finders.
#[derive(Debug, Error)]
pub enum MethodsError {
    /// Initial state and system disagree on the number of components.
    #[error("system has inconsistent dimensions: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Number of components of the system
        expected: usize,
        /// Length of the initial state
        got: usize,
    },

    /// Step size must be finite and positive.
    #[error("invalid step size {step}")]
    InvalidStep {
        /// Offending step size
        step: f64,
    },

    /// Integration interval must be finite and non-empty.
    #[error("invalid integration interval [{t_min}, {t_max}]")]
    InvalidInterval { t_min: f64, t_max: f64 },

    /// Newton's method hit a flat spot.
    #[error("derivative vanished at x = {x} (iteration {iteration})")]
    ZeroDerivative {
        /// Iterate at which f'(x) = 0
        x: f64,
        /// Iteration count when it happened
        iteration: usize,
    },

    /// An iterate or residual became NaN or infinite.
    #[error("iteration {iteration} produced a non-finite value")]
    NonFinite { iteration: usize },

    /// Configuration could not be parsed or is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A specialized `Result` type for numerical methods.
pub type Result<T> = std::result::Result<T, MethodsError>;

impl MethodsError {
    /// Returns `true` for rejected inputs: dimensions, step or interval.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            MethodsError::DimensionMismatch { .. }
                | MethodsError::InvalidStep { .. }
                | MethodsError::InvalidInterval { .. }
        )
    }

    /// Returns `true` if an iteration broke down numerically.
    pub fn is_breakdown(&self) -> bool {
        matches!(
            self,
            MethodsError::ZeroDerivative { .. } | MethodsError::NonFinite { .. }
        )
    }
}
