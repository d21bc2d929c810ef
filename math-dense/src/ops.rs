//! Row/column swaps and checked products on dense buffers
//!
//! The partial swaps exchange two rows (or columns) only over a sub-range of
//! the other axis. Pivoting eliminations use them to touch just the active
//! part of a working matrix.

use crate::error::{DenseError, Result};
use crate::traits::RealScalar;
use ndarray::{Array1, Array2, ArrayBase, Data, DataMut, Ix1, Ix2, Zip};
use std::ops::Range;

/// In-place swap operations on a 2D buffer.
pub trait SwapOps {
    /// Swap rows `r1` and `r2` over the columns in `cols`.
    fn swap_rows_partial(&mut self, r1: usize, r2: usize, cols: Range<usize>);

    /// Swap columns `c1` and `c2` over the rows in `rows`.
    fn swap_cols_partial(&mut self, c1: usize, c2: usize, rows: Range<usize>);

    /// Swap two complete rows.
    fn swap_rows(&mut self, r1: usize, r2: usize);
}

impl<S: DataMut> SwapOps for ArrayBase<S, Ix2> {
    fn swap_rows_partial(&mut self, r1: usize, r2: usize, cols: Range<usize>) {
        if r1 == r2 {
            return;
        }
        for j in cols {
            self.swap([r1, j], [r2, j]);
        }
    }

    fn swap_cols_partial(&mut self, c1: usize, c2: usize, rows: Range<usize>) {
        if c1 == c2 {
            return;
        }
        for i in rows {
            self.swap([i, c1], [i, c2]);
        }
    }

    fn swap_rows(&mut self, r1: usize, r2: usize) {
        let ncols = self.ncols();
        self.swap_rows_partial(r1, r2, 0..ncols);
    }
}

/// `C = A * B`, rejecting incompatible inner dimensions.
pub fn checked_matmul<T, S1, S2>(
    a: &ArrayBase<S1, Ix2>,
    b: &ArrayBase<S2, Ix2>,
) -> Result<Array2<T>>
where
    T: RealScalar,
    S1: Data<Elem = T>,
    S2: Data<Elem = T>,
{
    if a.ncols() != b.nrows() {
        return Err(DenseError::DimensionMismatch {
            operation: "matmul",
            expected: a.ncols(),
            got: b.nrows(),
        });
    }
    Ok(a.dot(b))
}

/// `y = A * x`, rejecting a vector whose length differs from A's columns.
pub fn checked_matvec<T, S1, S2>(
    a: &ArrayBase<S1, Ix2>,
    x: &ArrayBase<S2, Ix1>,
) -> Result<Array1<T>>
where
    T: RealScalar,
    S1: Data<Elem = T>,
    S2: Data<Elem = T>,
{
    if a.ncols() != x.len() {
        return Err(DenseError::DimensionMismatch {
            operation: "matvec",
            expected: a.ncols(),
            got: x.len(),
        });
    }
    Ok(a.dot(x))
}

/// `A <- A * B` for a square `B` whose side equals A's column count.
pub fn multiply_assign<T, S>(a: &mut Array2<T>, b: &ArrayBase<S, Ix2>) -> Result<()>
where
    T: RealScalar,
    S: Data<Elem = T>,
{
    if b.nrows() != b.ncols() {
        return Err(DenseError::DimensionMismatch {
            operation: "multiply_assign",
            expected: b.nrows(),
            got: b.ncols(),
        });
    }
    let product = checked_matmul(&*a, b)?;
    a.assign(&product);
    Ok(())
}

/// Largest componentwise distance `max |a_i - b_i|`.
pub fn max_abs_diff<T, S1, S2>(a: &ArrayBase<S1, Ix1>, b: &ArrayBase<S2, Ix1>) -> Result<T>
where
    T: RealScalar,
    S1: Data<Elem = T>,
    S2: Data<Elem = T>,
{
    if a.len() != b.len() {
        return Err(DenseError::DimensionMismatch {
            operation: "max_abs_diff",
            expected: a.len(),
            got: b.len(),
        });
    }
    Ok(Zip::from(a)
        .and(b)
        .fold(T::zero(), |acc, &ai, &bi| acc.max((ai - bi).abs())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_swap_rows_partial() {
        let mut m = array![[1.0_f64, 2.0, 3.0], [4.0, 5.0, 6.0]];
        m.swap_rows_partial(0, 1, 1..3);
        assert_eq!(m, array![[1.0, 5.0, 6.0], [4.0, 2.0, 3.0]]);
    }

    #[test]
    fn test_swap_cols_partial() {
        let mut m = array![[1.0_f64, 2.0], [3.0, 4.0], [5.0, 6.0]];
        m.swap_cols_partial(0, 1, 0..2);
        assert_eq!(m, array![[2.0, 1.0], [4.0, 3.0], [5.0, 6.0]]);
    }

    #[test]
    fn test_swap_rows_full() {
        let mut m = array![[1.0_f64, 2.0], [3.0, 4.0]];
        m.swap_rows(0, 1);
        assert_eq!(m, array![[3.0, 4.0], [1.0, 2.0]]);
        m.swap_rows(1, 1);
        assert_eq!(m, array![[3.0, 4.0], [1.0, 2.0]]);
    }

    #[test]
    fn test_checked_matmul() {
        let a = array![[1.0_f64, 2.0], [3.0, 4.0]];
        let b = array![[0.0_f64, 1.0], [1.0, 0.0]];
        let c = checked_matmul(&a, &b).unwrap();
        assert_eq!(c, array![[2.0, 1.0], [4.0, 3.0]]);

        let bad = array![[1.0_f64, 2.0, 3.0]];
        let err = checked_matmul(&a, &bad).unwrap_err();
        assert!(err.is_dimension_error());
    }

    #[test]
    fn test_checked_matvec() {
        let a = array![[4.0_f64, 3.0], [6.0, 3.0]];
        let x = array![1.0_f64, 1.0];
        assert_eq!(checked_matvec(&a, &x).unwrap(), array![7.0, 9.0]);
        assert!(checked_matvec(&a, &array![1.0_f64]).is_err());
    }

    #[test]
    fn test_multiply_assign() {
        let mut a = array![[1.0_f64, 2.0], [3.0, 4.0]];
        let id = array![[1.0_f64, 0.0], [0.0, 1.0]];
        multiply_assign(&mut a, &id).unwrap();
        assert_eq!(a, array![[1.0, 2.0], [3.0, 4.0]]);

        let rect = array![[1.0_f64, 0.0, 0.0], [0.0, 1.0, 0.0]];
        assert!(multiply_assign(&mut a, &rect).is_err());
    }

    #[test]
    fn test_max_abs_diff() {
        let a = array![1.0_f64, -2.0, 3.0];
        let b = array![1.5_f64, -2.0, 1.0];
        assert_eq!(max_abs_diff(&a, &b).unwrap(), 2.0);
    }
}
