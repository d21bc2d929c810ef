//! Fixed-step explicit integrators for `dy/dt = f(t, y)`, `y(t_min) = y0`
//!
//! Both integrators return the whole trajectory as a matrix: one row per time
//! sample, column 0 holding `t` and columns `1..=n` holding the state.

use crate::error::{MethodsError, Result};
use math_numerics_dense::RealScalar;
use ndarray::{Array1, Array2, ArrayView1, s};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of steps in one integration
pub const MAX_STEPS: usize = 1 << 24;

/// Upper bound on the number of entries of a trajectory matrix
const MAX_TRAJECTORY_LEN: usize = 1 << 28;

/// A first-order system of `dim()` coupled equations.
pub trait OdeSystem<T: RealScalar> {
    /// Number of state components
    fn dim(&self) -> usize;

    /// Evaluate `f(t, y)` into `dydt`, which has length `dim()`.
    fn derivative(&self, t: T, y: ArrayView1<'_, T>, dydt: &mut Array1<T>);
}

/// Right-hand side of one component: `f_j(t, y)`.
pub type ComponentFn<T> = Box<dyn Fn(T, ArrayView1<'_, T>) -> T>;

/// A system given as one closure per component.
///
/// ```
/// use math_numerics_methods::ComponentSystem;
///
/// // harmonic oscillator: y0' = y1, y1' = -y0
/// let system = ComponentSystem::new()
///     .with_component(|_t: f64, y| y[1])
///     .with_component(|_t: f64, y| -y[0]);
/// assert_eq!(system.len(), 2);
/// ```
pub struct ComponentSystem<T: RealScalar> {
    components: Vec<ComponentFn<T>>,
}

impl<T: RealScalar> Default for ComponentSystem<T> {
    fn default() -> Self {
        Self {
            components: Vec::new(),
        }
    }
}

impl<T: RealScalar> ComponentSystem<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// `n` components sharing the same right-hand side.
    pub fn uniform<F>(n: usize, f: F) -> Self
    where
        F: Fn(T, ArrayView1<'_, T>) -> T + Clone + 'static,
    {
        let components = (0..n)
            .map(|_| Box::new(f.clone()) as ComponentFn<T>)
            .collect();
        Self { components }
    }

    /// Append the next component.
    pub fn with_component<F>(mut self, f: F) -> Self
    where
        F: Fn(T, ArrayView1<'_, T>) -> T + 'static,
    {
        self.components.push(Box::new(f));
        self
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<T: RealScalar> OdeSystem<T> for ComponentSystem<T> {
    fn dim(&self) -> usize {
        self.components.len()
    }

    fn derivative(&self, t: T, y: ArrayView1<'_, T>, dydt: &mut Array1<T>) {
        for (out, f) in dydt.iter_mut().zip(&self.components) {
            *out = f(t, y.view());
        }
    }
}

/// Integration interval and step size
///
/// # Example JSON
///
/// ```json
/// { "t_min": 0.0, "t_max": 10.0, "step": 0.01 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdeConfig<T> {
    pub t_min: T,
    pub t_max: T,
    pub step: T,
}

impl Default for OdeConfig<f64> {
    fn default() -> Self {
        Self {
            t_min: 0.0,
            t_max: 1.0,
            step: 0.01,
        }
    }
}

impl<T: RealScalar> OdeConfig<T> {
    pub fn new(t_min: T, t_max: T, step: T) -> Self {
        Self { t_min, t_max, step }
    }

    /// Number of steps taken, `round((t_max - t_min) / step)`.
    ///
    /// More than [`MAX_STEPS`] steps is an `InvalidStep`.
    pub fn num_steps(&self) -> Result<usize> {
        if !self.step.is_finite() || self.step <= T::zero() {
            return Err(MethodsError::InvalidStep {
                step: to_f64(self.step),
            });
        }
        if !self.t_min.is_finite() || !self.t_max.is_finite() || self.t_max <= self.t_min {
            return Err(MethodsError::InvalidInterval {
                t_min: to_f64(self.t_min),
                t_max: to_f64(self.t_max),
            });
        }
        ((self.t_max - self.t_min) / self.step)
            .round()
            .to_usize()
            .filter(|&steps| steps <= MAX_STEPS)
            .ok_or(MethodsError::InvalidStep {
                step: to_f64(self.step),
            })
    }
}

impl<T: RealScalar + DeserializeOwned> OdeConfig<T> {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MethodsError::InvalidConfig(format!("failed to parse JSON: {e}")))?;
        config.num_steps()?;
        Ok(config)
    }
}

/// Explicit Euler: `y_{i+1} = y_i + h f(t_i, y_i)`.
pub fn euler<T, S>(system: &S, y0: &Array1<T>, config: &OdeConfig<T>) -> Result<Array2<T>>
where
    T: RealScalar,
    S: OdeSystem<T> + ?Sized,
{
    let h = config.step;
    let mut k = Array1::zeros(system.dim());

    integrate(system, y0, config, |t, y, next| {
        system.derivative(t, y.view(), &mut k);
        next.assign(&y);
        next.scaled_add(h, &k);
    })
}

/// Classical fourth-order Runge-Kutta.
pub fn runge_kutta4<T, S>(system: &S, y0: &Array1<T>, config: &OdeConfig<T>) -> Result<Array2<T>>
where
    T: RealScalar,
    S: OdeSystem<T> + ?Sized,
{
    let n = system.dim();
    let h = config.step;
    let two = T::one() + T::one();
    let half = h / two;
    let sixth = h / (two + two + two);
    let third = sixth + sixth;

    let mut k1 = Array1::zeros(n);
    let mut k2 = Array1::zeros(n);
    let mut k3 = Array1::zeros(n);
    let mut k4 = Array1::zeros(n);
    let mut stage = Array1::zeros(n);

    integrate(system, y0, config, |t, y, next| {
        system.derivative(t, y.view(), &mut k1);

        stage.assign(&y);
        stage.scaled_add(half, &k1);
        system.derivative(t + half, stage.view(), &mut k2);

        stage.assign(&y);
        stage.scaled_add(half, &k2);
        system.derivative(t + half, stage.view(), &mut k3);

        stage.assign(&y);
        stage.scaled_add(h, &k3);
        system.derivative(t + h, stage.view(), &mut k4);

        next.assign(&y);
        next.scaled_add(sixth, &k1);
        next.scaled_add(third, &k2);
        next.scaled_add(third, &k3);
        next.scaled_add(sixth, &k4);
    })
}

/// Drive a one-step method over the sample grid.
///
/// `advance(t_i, y_i, y_{i+1})` writes the next state into the trajectory.
fn integrate<T, S, F>(system: &S, y0: &Array1<T>, config: &OdeConfig<T>, mut advance: F) -> Result<Array2<T>>
where
    T: RealScalar,
    S: OdeSystem<T> + ?Sized,
    F: FnMut(T, ArrayView1<'_, T>, &mut ndarray::ArrayViewMut1<'_, T>),
{
    let n = system.dim();
    if y0.len() != n {
        return Err(MethodsError::DimensionMismatch {
            expected: n,
            got: y0.len(),
        });
    }
    let steps = config.num_steps()?;
    log::debug!("integrating {n} components over {} steps", steps);

    let len = (steps + 1).checked_mul(n + 1);
    if len.is_none_or(|len| len > MAX_TRAJECTORY_LEN) {
        return Err(MethodsError::InvalidStep {
            step: to_f64(config.step),
        });
    }
    let mut trajectory = Array2::zeros((steps + 1, n + 1));
    for (i, mut row) in trajectory.rows_mut().into_iter().enumerate() {
        row[0] = sample_time(config, i);
    }
    trajectory.slice_mut(s![0, 1..]).assign(y0);

    for i in 0..steps {
        let t = trajectory[[i, 0]];
        let (current, mut next) = trajectory.multi_slice_mut((s![i, 1..], s![i + 1, 1..]));
        advance(t, current.view(), &mut next);
    }
    Ok(trajectory)
}

/// `t_min + i * step`, computed directly to avoid accumulating rounding
fn sample_time<T: RealScalar>(config: &OdeConfig<T>, i: usize) -> T {
    let i = T::from_usize(i).unwrap_or_else(T::max_value);
    config.t_min + i * config.step
}

fn to_f64<T: RealScalar>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
