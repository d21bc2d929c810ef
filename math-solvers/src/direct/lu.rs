//! LU decomposition solver
//!
//! Provides LU factorization with total scaled pivoting for solving dense
//! linear systems. Each elimination step picks both a pivot row and a pivot
//! column from the trailing block, comparing entries relative to the largest
//! magnitude of their row, so two permutations are tracked:
//!
//! ```text
//! A[row_perm[i]][col_perm[j]] = (L U)[i][j]
//! ```
//!
//! L and U share one buffer. L's diagonal is the uniform value `alpha` and is
//! not stored; U's diagonal is.

use crate::config::LuConfig;
use crate::error::{Result, SolverError};
use crate::tolerance::nearly_equal;
use math_numerics_dense::{RealScalar, SwapOps, index_vector};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};

/// LU factorization result
///
/// Stores L and U factors along with both pivot permutations
#[derive(Debug, Clone)]
pub struct LuFactorization<T: RealScalar> {
    /// Strictly-lower part of L and all of U
    lu: Array2<T>,
    /// Solve-space row `i` reads component `row_perm[i]` of b
    row_perm: Vec<usize>,
    /// Solve-space column `i` writes component `col_perm[i]` of x
    col_perm: Vec<usize>,
    /// Diagonal of L
    alpha: T,
}

impl<T: RealScalar> LuFactorization<T> {
    fn with_dim(n: usize, alpha: T) -> Self {
        Self {
            lu: Array2::zeros((n, n)),
            row_perm: index_vector(n),
            col_perm: index_vector(n),
            alpha,
        }
    }

    /// Side of the factored system
    pub fn dim(&self) -> usize {
        self.lu.nrows()
    }

    /// Combined L/U buffer
    pub fn lu(&self) -> &Array2<T> {
        &self.lu
    }

    pub fn row_permutation(&self) -> &[usize] {
        &self.row_perm
    }

    pub fn column_permutation(&self) -> &[usize] {
        &self.col_perm
    }

    pub fn alpha(&self) -> T {
        self.alpha
    }

    /// Expanded L, with `alpha` on the diagonal
    pub fn lower(&self) -> Array2<T> {
        let n = self.dim();
        Array2::from_shape_fn((n, n), |(i, j)| match i.cmp(&j) {
            std::cmp::Ordering::Greater => self.lu[[i, j]],
            std::cmp::Ordering::Equal => self.alpha,
            std::cmp::Ordering::Less => T::zero(),
        })
    }

    /// Expanded U
    pub fn upper(&self) -> Array2<T> {
        let n = self.dim();
        Array2::from_shape_fn((n, n), |(i, j)| {
            if i <= j { self.lu[[i, j]] } else { T::zero() }
        })
    }

    /// Zero the L/U buffer and restore both identity permutations, keeping
    /// the allocations.
    pub(crate) fn reset(&mut self) {
        self.lu.fill(T::zero());
        for (i, (r, c)) in self
            .row_perm
            .iter_mut()
            .zip(self.col_perm.iter_mut())
            .enumerate()
        {
            *r = i;
            *c = i;
        }
    }

    /// Factor `a` into this record, reusing its buffers when the size matches.
    ///
    /// Elimination runs in place on the L/U buffer: the trailing block always
    /// holds the reduced entries, so pivots are chosen among the values the
    /// next step will actually divide by.
    ///
    /// On error the record holds partial results and must not be used to solve.
    pub(crate) fn refactor<S>(&mut self, a: &ArrayBase<S, Ix2>, config: &LuConfig) -> Result<()>
    where
        S: Data<Elem = T>,
    {
        let (rows, cols) = a.dim();
        if rows != cols {
            return Err(SolverError::NotSquare { rows, cols });
        }
        let n = rows;
        let alpha = config_alpha::<T>(config)?;

        // row scales first: a zero row fails before the record is touched
        let mut scale = row_scales(a)?;

        if self.dim() == n {
            self.reset();
        } else {
            *self = Self::with_dim(n, alpha);
        }
        self.alpha = alpha;
        // pivoting permutes this copy, never the caller's matrix
        self.lu.assign(a);

        for i in 0..n {
            let (pivot_row, pivot_col) = select_pivot(&self.lu, &scale, i, config.pivot_tolerance);

            if pivot_row != i {
                self.lu.swap_rows(i, pivot_row);
                self.row_perm.swap(i, pivot_row);
                scale.swap(i, pivot_row);
            }
            if pivot_col != i {
                self.lu.swap_cols_partial(i, pivot_col, 0..n);
                self.col_perm.swap(i, pivot_col);
            }

            // reduced pivot, compared relative to the magnitude of its row
            let beta = self.lu[[i, i]];
            if nearly_equal(beta.abs() / scale[i], T::zero(), (i + 1) * config.singular_tolerance) {
                log::warn!("no unique solution: pivot vanished at step {i} of {n}");
                return Err(SolverError::SingularPivot { step: i });
            }

            // L carries alpha on its diagonal, so U's row i is divided by alpha
            for k in i..n {
                self.lu[[i, k]] /= alpha;
            }
            let pivot = self.lu[[i, i]];
            for j in (i + 1)..n {
                let l = self.lu[[j, i]] / pivot;
                self.lu[[j, i]] = l;
                for k in (i + 1)..n {
                    let u = self.lu[[i, k]];
                    self.lu[[j, k]] -= l * u;
                }
            }
        }

        log::debug!("factored {n}x{n} system");
        Ok(())
    }

    /// Solve Ax = b using the pre-computed LU factorization
    ///
    /// Forward substitution on the row-permuted right-hand side, then backward
    /// substitution scattered through the column permutation into `x`.
    pub fn solve(&self, x: &mut Array1<T>, b: &Array1<T>) -> Result<()> {
        let n = self.dim();
        for len in [x.len(), b.len()] {
            if len != n {
                return Err(SolverError::DimensionMismatch {
                    expected: n,
                    got: len,
                });
            }
        }

        // Forward substitution: Lz = Pb
        let mut z = Array1::zeros(n);
        for i in 0..n {
            let mut sum = T::zero();
            for k in 0..i {
                sum += self.lu[[i, k]] * z[k];
            }
            z[i] = (b[self.row_perm[i]] - sum) / self.alpha;
        }

        // Backward substitution: U (Q^-1 x) = z
        for i in (0..n).rev() {
            let mut sum = T::zero();
            for k in (i + 1)..n {
                sum += self.lu[[i, k]] * x[self.col_perm[k]];
            }
            x[self.col_perm[i]] = (z[i] - sum) / self.lu[[i, i]];
        }

        Ok(())
    }

    /// Solve Ax = b into a freshly allocated vector
    pub fn solve_vec(&self, b: &Array1<T>) -> Result<Array1<T>> {
        let mut x = Array1::zeros(b.len());
        self.solve(&mut x, b)?;
        Ok(x)
    }
}

/// Compute LU factorization with total scaled pivoting
pub fn lu_factorize<T, S>(a: &ArrayBase<S, Ix2>, config: &LuConfig) -> Result<LuFactorization<T>>
where
    T: RealScalar,
    S: Data<Elem = T>,
{
    let alpha = config_alpha::<T>(config)?;
    let mut factorization = LuFactorization::with_dim(a.nrows(), alpha);
    factorization.refactor(a, config)?;
    Ok(factorization)
}

/// Solve Ax = b using LU decomposition
///
/// This is a convenience function that combines factorization and solve.
pub fn lu_solve<T, S>(a: &ArrayBase<S, Ix2>, b: &Array1<T>) -> Result<Array1<T>>
where
    T: RealScalar,
    S: Data<Elem = T>,
{
    let factorization = lu_factorize(a, &LuConfig::default())?;
    factorization.solve_vec(b)
}

fn config_alpha<T: RealScalar>(config: &LuConfig) -> Result<T> {
    config.validate()?;
    T::from_f64(config.alpha).ok_or_else(|| {
        SolverError::InvalidConfig(format!("alpha {} is not representable", config.alpha))
    })
}

/// Largest magnitude of every row; an all-zero row has no unique solution.
fn row_scales<T, S>(a: &ArrayBase<S, Ix2>) -> Result<Vec<T>>
where
    T: RealScalar,
    S: Data<Elem = T>,
{
    a.rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let max = row.iter().fold(T::zero(), |acc, v| acc.max(v.abs()));
            if max == T::zero() {
                log::warn!("no unique solution: row {i} is zero");
                Err(SolverError::ZeroRow { row: i })
            } else {
                Ok(max)
            }
        })
        .collect()
}

/// Pick the pivot for elimination step `i`.
///
/// `r` is the largest scaled magnitude `|lu[j][k]| / scale[j]` over the
/// reduced trailing block; the pivot is the first entry (row-major) whose
/// scaled magnitude matches `r`.
fn select_pivot<T: RealScalar>(
    lu: &Array2<T>,
    scale: &[T],
    i: usize,
    tolerance: usize,
) -> (usize, usize) {
    let n = lu.nrows();

    let mut r = T::zero();
    let mut best = (i, i);
    for j in i..n {
        for k in i..n {
            let scaled = lu[[j, k]].abs() / scale[j];
            if scaled > r {
                r = scaled;
                best = (j, k);
            }
        }
    }

    for j in i..n {
        for k in i..n {
            if nearly_equal(lu[[j, k]].abs() / scale[j], r, tolerance) {
                return (j, k);
            }
        }
    }
    best
}
