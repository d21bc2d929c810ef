//! Direct solvers for linear systems
//!
//! This module provides direct (non-iterative) solvers:
//! - [`forward_substitute`] / [`backward_substitute`]: triangular solves
//! - [`lu_factorize`] / [`lu_solve`]: LU decomposition with total scaled pivoting
//! - [`FactorizationCache`]: reuse of factorizations across right-hand sides

mod cache;
mod lu;
mod triangular;

pub use cache::{FactorHandle, FactorizationCache};
pub use lu::{LuFactorization, lu_factorize, lu_solve};
pub use triangular::{backward_substitute, forward_substitute};
