//! Newton's method for scalar roots

use crate::error::{MethodsError, Result};
use math_numerics_dense::RealScalar;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Newton iteration configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewtonConfig<T> {
    /// Stop once `|f(x)| <= tolerance`
    pub tolerance: T,
    /// Maximum number of Newton steps
    pub max_iterations: usize,
    /// Log progress every N iterations (0 = silent)
    pub print_interval: usize,
}

impl<T: RealScalar> Default for NewtonConfig<T> {
    fn default() -> Self {
        Self {
            tolerance: T::epsilon(),
            max_iterations: 100,
            print_interval: 0,
        }
    }
}

impl<T: RealScalar + DeserializeOwned> NewtonConfig<T> {
    /// Parse a JSON configuration; missing fields are an error.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MethodsError::InvalidConfig(format!("failed to parse JSON: {e}")))?;
        if !config.tolerance.is_finite() || config.tolerance < T::zero() {
            return Err(MethodsError::InvalidConfig(format!(
                "tolerance must be finite and non-negative, got {}",
                config.tolerance
            )));
        }
        Ok(config)
    }
}

/// Result of a Newton iteration
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonSolution<T> {
    /// Final iterate
    pub root: T,
    /// Number of Newton steps taken
    pub iterations: usize,
    /// `|f(root)|`
    pub residual: T,
    /// Whether the tolerance was met within `max_iterations`
    pub converged: bool,
}

/// Find a root of `f` starting from `x0` with `x_{k+1} = x_k - f(x_k) / f'(x_k)`.
///
/// Returns the last iterate with `converged = false` when the iteration budget
/// runs out.
///
/// # Example
///
/// ```
/// use math_numerics_methods::{NewtonConfig, newton};
///
/// let config = NewtonConfig { tolerance: 1e-12, ..NewtonConfig::default() };
/// let sol = newton(|x: f64| x * x - 2.0, |x| 2.0 * x, 1.0, &config).unwrap();
/// assert!(sol.converged);
/// assert!((sol.root - 2.0_f64.sqrt()).abs() < 1e-12);
/// ```
pub fn newton<T, F, D>(f: F, fprime: D, x0: T, config: &NewtonConfig<T>) -> Result<NewtonSolution<T>>
where
    T: RealScalar,
    F: Fn(T) -> T,
    D: Fn(T) -> T,
{
    let mut x = x0;
    let mut fx = f(x);
    let mut iterations = 0;

    while fx.abs() > config.tolerance && iterations < config.max_iterations {
        let dfx = fprime(x);
        if dfx == T::zero() {
            log::warn!("newton: derivative vanished at iteration {iterations}");
            return Err(MethodsError::ZeroDerivative {
                x: x.to_f64().unwrap_or(f64::NAN),
                iteration: iterations,
            });
        }

        x -= fx / dfx;
        fx = f(x);
        iterations += 1;

        if !x.is_finite() || !fx.is_finite() {
            return Err(MethodsError::NonFinite {
                iteration: iterations,
            });
        }
        if config.print_interval > 0 && iterations % config.print_interval == 0 {
            log::info!("newton iter {iterations}: x = {x:e}, |f(x)| = {:e}", fx.abs());
        }
    }

    let converged = fx.abs() <= config.tolerance;
    if !converged {
        log::debug!(
            "newton stopped after {iterations} iterations with |f(x)| = {:e}",
            fx.abs()
        );
    }
    Ok(NewtonSolution {
        root: x,
        iterations,
        residual: fx.abs(),
        converged,
    })
}
