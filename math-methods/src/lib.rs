//! Numerical methods on top of the dense containers
//!
//! - **ODE integrators**: explicit Euler and classical fourth-order
//!   Runge-Kutta on a fixed step, returning the full trajectory
//! - **Root finding**: Newton's method for scalar functions
//!
//! These routines only use the container types; they never factor a matrix.
//!
//! # Example
//!
//! ```
//! use math_numerics_methods::{ComponentSystem, OdeConfig, runge_kutta4};
//! use ndarray::array;
//!
//! // y' = -y, y(0) = 1
//! let system = ComponentSystem::uniform(1, |_t: f64, y| -y[0]);
//! let trajectory = runge_kutta4(&system, &array![1.0], &OdeConfig::new(0.0, 1.0, 0.01)).unwrap();
//!
//! let last = trajectory.nrows() - 1;
//! assert!((trajectory[[last, 1]] - (-1.0_f64).exp()).abs() < 1e-9);
//! ```

pub mod error;
pub mod ode;
pub mod roots;

pub use error::{MethodsError, Result};
pub use ode::{
    ComponentFn, ComponentSystem, MAX_STEPS, OdeConfig, OdeSystem, euler, runge_kutta4,
};
pub use roots::{NewtonConfig, NewtonSolution, newton};
