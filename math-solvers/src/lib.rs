//! Dense direct solvers built on LU factorization
//!
//! This crate factors dense square systems with total scaled pivoting and
//! solves them by forward/backward substitution. Factorizations are kept in an
//! explicit cache keyed by the identity of the system matrix, so repeated
//! solves against new right-hand sides skip the O(n³) factorization.
//!
//! # Features
//!
//! - **Direct Solvers**: LU with total scaled pivoting, triangular solves
//! - **Factorization Cache**: identity-keyed reuse with explicit refactor and
//!   release, plus stale-factorization detection
//! - **Generic Scalar Types**: Works with f64 and f32
//!
//! # Example
//!
//! ```
//! use math_numerics_solvers::{FactorizationCache, SystemMatrix};
//! use ndarray::{Array1, array};
//!
//! let a = SystemMatrix::new(array![[4.0, 3.0], [6.0, 3.0]]).unwrap();
//! let mut cache = FactorizationCache::new();
//!
//! let mut x: Array1<f64> = Array1::zeros(2);
//! cache.solve(&a, &mut x, &array![7.0, 9.0]).unwrap();
//! assert!((x[0] - 1.0).abs() < 1e-12 && (x[1] - 1.0).abs() < 1e-12);
//!
//! // second right-hand side: no new factorization
//! cache.solve(&a, &mut x, &array![1.0, 1.0]).unwrap();
//! assert_eq!(cache.factorization_count(), 1);
//! ```

pub mod config;
pub mod direct;
pub mod error;
pub mod system;
pub mod tolerance;

pub use config::LuConfig;
pub use error::{Result, SolverError};
pub use system::{SystemId, SystemMatrix};
pub use tolerance::nearly_equal;

// Re-export direct solvers
pub use direct::{
    FactorHandle, FactorizationCache, LuFactorization, backward_substitute, forward_substitute,
    lu_factorize, lu_solve,
};

// Re-export the scalar trait so callers need not depend on the container crate
pub use math_numerics_dense::RealScalar;
