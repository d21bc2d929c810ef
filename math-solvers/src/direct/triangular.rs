//! Forward and backward substitution
//!
//! Direct solves of `Lx = b` and `Ux = b` for a triangular matrix. Only the
//! relevant triangle of the matrix is read. The diagonal is not checked:
//! a zero on the diagonal yields infinities or NaNs in `x`.

use crate::error::{Result, SolverError};
use math_numerics_dense::RealScalar;
use ndarray::{Array1, ArrayBase, Data, Ix2};

/// Solve the lower triangular system `Lx = b`, writing the solution into `x`.
pub fn forward_substitute<T, S>(l: &ArrayBase<S, Ix2>, x: &mut Array1<T>, b: &Array1<T>) -> Result<()>
where
    T: RealScalar,
    S: Data<Elem = T>,
{
    check_dims(l, x, b)?;
    let n = x.len();

    for i in 0..n {
        let mut sum = T::zero();
        for k in 0..i {
            sum += l[[i, k]] * x[k];
        }
        x[i] = (b[i] - sum) / l[[i, i]];
    }
    Ok(())
}

/// Solve the upper triangular system `Ux = b`, writing the solution into `x`.
pub fn backward_substitute<T, S>(u: &ArrayBase<S, Ix2>, x: &mut Array1<T>, b: &Array1<T>) -> Result<()>
where
    T: RealScalar,
    S: Data<Elem = T>,
{
    check_dims(u, x, b)?;
    let n = x.len();

    for i in (0..n).rev() {
        let mut sum = T::zero();
        for k in (i + 1)..n {
            sum += u[[i, k]] * x[k];
        }
        x[i] = (b[i] - sum) / u[[i, i]];
    }
    Ok(())
}

fn check_dims<T, S>(m: &ArrayBase<S, Ix2>, x: &Array1<T>, b: &Array1<T>) -> Result<()>
where
    S: Data<Elem = T>,
{
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(SolverError::NotSquare { rows, cols });
    }
    for len in [x.len(), b.len()] {
        if len != rows {
            return Err(SolverError::DimensionMismatch {
                expected: rows,
                got: len,
            });
        }
    }
    Ok(())
}
