//! Dense matrix and vector containers
//!
//! This crate provides the storage layer used by the linear solvers and the
//! numerical methods of this workspace. Buffers are plain
//! [`ndarray::Array2`] / [`ndarray::Array1`] values; the crate adds what the
//! solvers need on top of them.
//!
//! # Features
//!
//! - **Scalar trait**: [`RealScalar`] for `f64` and `f32`
//! - **Constructors**: zero, identity and element-function constructors that
//!   reject empty dimensions
//! - **Swaps**: partial row/column swaps over a sub-range ([`SwapOps`])
//! - **Products**: dimension-checked matrix-matrix and matrix-vector products
//! - **Storage**: a compact binary format whose loader validates the header
//!   against the file size
//!
//! # Example
//!
//! ```
//! use math_numerics_dense::{SwapOps, checked_matvec, matrix_from_fn};
//!
//! let mut a = matrix_from_fn(2, 2, (0, 0), |i, j, _, _| (2 * i + j) as f64).unwrap();
//! a.swap_rows(0, 1);
//! let y = checked_matvec(&a, &ndarray::array![1.0, 1.0]).unwrap();
//! assert_eq!(y.to_vec(), vec![5.0, 1.0]);
//! ```

pub mod construct;
pub mod display;
pub mod error;
pub mod io;
pub mod ops;
pub mod traits;

pub use construct::{identity, index_vector, matrix_from_fn, vector_from_fn, zero_vector, zeros};
pub use display::{MatrixDisplay, VectorDisplay, print_matrix, print_vector};
pub use error::{DenseError, Result};
pub use io::{
    decode_matrix, decode_vector, encode_matrix, encode_vector, load_matrix, load_vector,
    save_matrix, save_vector,
};
pub use ops::{SwapOps, checked_matmul, checked_matvec, max_abs_diff, multiply_assign};
pub use traits::RealScalar;
