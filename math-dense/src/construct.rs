//! Constructors for dense matrices and vectors
//!
//! Element-function constructors take an ordinary closure of the element
//! indices and the buffer dimensions. An `origin` shifts the indices handed to
//! the closure, so a sub-block of a larger formula-defined matrix can be built
//! without materialising the whole thing.

use crate::error::{DenseError, Result};
use crate::traits::RealScalar;
use ndarray::{Array1, Array2};

/// Zero-filled `rows x cols` matrix; both dimensions must be at least 1.
pub fn zeros<T: RealScalar>(rows: usize, cols: usize) -> Result<Array2<T>> {
    check_dims(rows, cols)?;
    Ok(Array2::zeros((rows, cols)))
}

/// Zero-filled vector of length `n >= 1`.
pub fn zero_vector<T: RealScalar>(n: usize) -> Result<Array1<T>> {
    check_dims(n, 1)?;
    Ok(Array1::zeros(n))
}

/// `n x n` identity matrix.
pub fn identity<T: RealScalar>(n: usize) -> Result<Array2<T>> {
    check_dims(n, n)?;
    Ok(Array2::eye(n))
}

/// Build a `rows x cols` matrix where element `(i, j)` is
/// `f(origin.0 + i, origin.1 + j, rows, cols)`.
///
/// # Example
///
/// ```
/// use math_numerics_dense::matrix_from_fn;
///
/// // Hilbert matrix, indices shifted to start at 1
/// let h = matrix_from_fn(3, 3, (1, 1), |i, j, _, _| 1.0 / (i + j - 1) as f64).unwrap();
/// assert_eq!(h[[0, 0]], 1.0);
/// assert_eq!(h[[2, 2]], 0.2);
/// ```
pub fn matrix_from_fn<T, F>(rows: usize, cols: usize, origin: (usize, usize), f: F) -> Result<Array2<T>>
where
    T: RealScalar,
    F: Fn(usize, usize, usize, usize) -> T,
{
    check_dims(rows, cols)?;
    let (x, y) = origin;
    Ok(Array2::from_shape_fn((rows, cols), |(i, j)| {
        f(x + i, y + j, rows, cols)
    }))
}

/// Build a length-`n` vector where component `i` is `f(origin + i, n)`.
pub fn vector_from_fn<T, F>(n: usize, origin: usize, f: F) -> Result<Array1<T>>
where
    T: RealScalar,
    F: Fn(usize, usize) -> T,
{
    check_dims(n, 1)?;
    Ok(Array1::from_shape_fn(n, |i| f(origin + i, n)))
}

/// The identity permutation `[0, 1, ..., n-1]`.
pub fn index_vector(n: usize) -> Vec<usize> {
    (0..n).collect()
}

fn check_dims(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(DenseError::EmptyDimension { rows, cols });
    }
    Ok(())
}
