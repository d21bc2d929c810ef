//! Plain-text rendering of dense buffers
//!
//! Every element is printed in scientific notation with 16 digits after the
//! point, separated by tabs; a matrix prints one row per line.

use crate::traits::RealScalar;
use ndarray::{ArrayBase, Data, Ix1, Ix2};
use std::fmt;

/// `Display` adapter for a matrix.
pub struct MatrixDisplay<'a, S: Data>(pub &'a ArrayBase<S, Ix2>);

/// `Display` adapter for a vector.
pub struct VectorDisplay<'a, S: Data>(pub &'a ArrayBase<S, Ix1>);

impl<S, T> fmt::Display for MatrixDisplay<'_, S>
where
    S: Data<Elem = T>,
    T: RealScalar,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0.rows() {
            for value in row.iter() {
                write!(f, "{value:.16E}\t")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<S, T> fmt::Display for VectorDisplay<'_, S>
where
    S: Data<Elem = T>,
    T: RealScalar,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in self.0.iter() {
            write!(f, "{value:.16E}\t")?;
        }
        writeln!(f)
    }
}

/// Print a matrix to standard output.
pub fn print_matrix<S, T>(matrix: &ArrayBase<S, Ix2>)
where
    S: Data<Elem = T>,
    T: RealScalar,
{
    print!("{}", MatrixDisplay(matrix));
}

/// Print a vector to standard output.
pub fn print_vector<S, T>(vector: &ArrayBase<S, Ix1>)
where
    S: Data<Elem = T>,
    T: RealScalar,
{
    print!("{}", VectorDisplay(vector));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_matrix_display() {
        let m = array![[1.0_f64, -2.5], [0.0, 1e-3]];
        let text = MatrixDisplay(&m).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "1.0000000000000000E0\t-2.5000000000000000E0\t");
        assert_eq!(lines[1], "0.0000000000000000E0\t1.0000000000000000E-3\t");
    }

    #[test]
    fn test_vector_display() {
        let v = array![3.0_f32];
        assert_eq!(VectorDisplay(&v).to_string(), "3.0000000000000000E0\t\n");
    }
}
