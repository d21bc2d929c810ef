//! System matrices with a stable identity
//!
//! The factorization cache is keyed by *which* matrix a factorization came
//! from, not by its contents. [`SystemMatrix`] carries that identity as an
//! opaque [`SystemId`], allocated once per instance, together with a revision
//! counter that every mutable access bumps. The cache records the revision it
//! factored so that a solve against a matrix edited since can be refused.

use math_numerics_dense::{DenseError, RealScalar};
use ndarray::{Array2, ArrayView2};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SYSTEM_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of one [`SystemMatrix`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(u64);

impl SystemId {
    fn fresh() -> Self {
        SystemId(NEXT_SYSTEM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A dense system matrix `A` of a linear system `Ax = b`.
///
/// Cloning produces a new identity: the clone is a different system as far as
/// the factorization cache is concerned.
#[derive(Debug)]
pub struct SystemMatrix<T: RealScalar> {
    id: SystemId,
    revision: u64,
    values: Array2<T>,
}

impl<T: RealScalar> SystemMatrix<T> {
    /// Wrap a buffer; the matrix must have at least one row and one column.
    pub fn new(values: Array2<T>) -> Result<Self, DenseError> {
        let (rows, cols) = values.dim();
        if rows == 0 || cols == 0 {
            return Err(DenseError::EmptyDimension { rows, cols });
        }
        Ok(Self {
            id: SystemId::fresh(),
            revision: 0,
            values,
        })
    }

    /// Identity used as the factorization cache key.
    pub fn id(&self) -> SystemId {
        self.id
    }

    /// Number of mutable accesses since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn is_square(&self) -> bool {
        self.values.is_square()
    }

    /// Read-only access to the entries.
    pub fn values(&self) -> &Array2<T> {
        &self.values
    }

    pub fn view(&self) -> ArrayView2<'_, T> {
        self.values.view()
    }

    /// Mutable access to the entries.
    ///
    /// Counts as a modification even if nothing is written: any factorization
    /// cached for this matrix must be refactored before the next solve.
    pub fn values_mut(&mut self) -> &mut Array2<T> {
        self.revision += 1;
        &mut self.values
    }

    /// Overwrite one entry.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), DenseError> {
        if row >= self.nrows() {
            return Err(DenseError::IndexOutOfBounds {
                index: row,
                len: self.nrows(),
            });
        }
        if col >= self.ncols() {
            return Err(DenseError::IndexOutOfBounds {
                index: col,
                len: self.ncols(),
            });
        }
        self.values_mut()[[row, col]] = value;
        Ok(())
    }

    /// Give the buffer back, dropping the identity.
    pub fn into_inner(self) -> Array2<T> {
        self.values
    }
}

impl<T: RealScalar> Clone for SystemMatrix<T> {
    fn clone(&self) -> Self {
        Self {
            id: SystemId::fresh(),
            revision: 0,
            values: self.values.clone(),
        }
    }
}

impl<T: RealScalar> TryFrom<Array2<T>> for SystemMatrix<T> {
    type Error = DenseError;

    fn try_from(values: Array2<T>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}
