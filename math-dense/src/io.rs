//! Binary storage format for dense matrices and vectors
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! magic      4 bytes   "DMAT" for matrices, "DVEC" for vectors
//! width      1 byte    element width in bytes (4 = f32, 8 = f64)
//! rows       u64
//! cols       u64       matrices only
//! elements   rows * cols * width bytes, row-major
//! sentinel   1 byte    0xFF
//! ```
//!
//! Loaders check the header against the file size before reading any element,
//! so a tampered header is reported as [`DenseError::StorageCorruption`]
//! instead of driving an oversized allocation or a short read.

use crate::error::{DenseError, Result};
use crate::traits::RealScalar;
use ndarray::{Array1, Array2};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

const MATRIX_MAGIC: [u8; 4] = *b"DMAT";
const VECTOR_MAGIC: [u8; 4] = *b"DVEC";
const SENTINEL: u8 = 0xFF;

/// Which container a file holds; fixes the magic and the number of dimension fields.
#[derive(Debug, Clone, Copy)]
enum Layout {
    Matrix,
    Vector,
}

impl Layout {
    fn magic(self) -> [u8; 4] {
        match self {
            Layout::Matrix => MATRIX_MAGIC,
            Layout::Vector => VECTOR_MAGIC,
        }
    }

    fn dim_fields(self) -> usize {
        match self {
            Layout::Matrix => 2,
            Layout::Vector => 1,
        }
    }

    fn header_len(self) -> usize {
        4 + 1 + 8 * self.dim_fields()
    }
}

/// Decoded header: element count per axis.
#[derive(Debug, Clone, Copy)]
struct Header {
    rows: usize,
    cols: usize,
}

/// Serialize a matrix to the storage format.
pub fn encode_matrix<T: RealScalar>(matrix: &Array2<T>) -> Result<Vec<u8>> {
    let (rows, cols) = matrix.dim();
    let mut out = begin::<T>(Layout::Matrix, rows, cols)?;
    for &value in matrix.iter() {
        value.write_le(&mut out);
    }
    out.push(SENTINEL);
    Ok(out)
}

/// Serialize a vector to the storage format.
pub fn encode_vector<T: RealScalar>(vector: &Array1<T>) -> Result<Vec<u8>> {
    let mut out = begin::<T>(Layout::Vector, vector.len(), 1)?;
    for &value in vector.iter() {
        value.write_le(&mut out);
    }
    out.push(SENTINEL);
    Ok(out)
}

/// Parse a matrix from an in-memory image of the storage format.
pub fn decode_matrix<T: RealScalar>(bytes: &[u8]) -> Result<Array2<T>> {
    let header = read_header::<T>(Layout::Matrix, bytes)?;
    check_total_len::<T>(Layout::Matrix, header, bytes.len() as u64)?;
    let values = decode_body::<T>(&bytes[Layout::Matrix.header_len()..])?;
    Array2::from_shape_vec((header.rows, header.cols), values)
        .map_err(|e| DenseError::corruption(format!("element block does not fit its shape: {e}")))
}

/// Parse a vector from an in-memory image of the storage format.
pub fn decode_vector<T: RealScalar>(bytes: &[u8]) -> Result<Array1<T>> {
    let header = read_header::<T>(Layout::Vector, bytes)?;
    check_total_len::<T>(Layout::Vector, header, bytes.len() as u64)?;
    let values = decode_body::<T>(&bytes[Layout::Vector.header_len()..])?;
    Ok(Array1::from_vec(values))
}

/// Write a matrix to `path`, replacing any existing file.
pub fn save_matrix<T: RealScalar, P: AsRef<Path>>(matrix: &Array2<T>, path: P) -> Result<()> {
    let bytes = encode_matrix(matrix)?;
    fs::write(path.as_ref(), &bytes)?;
    log::debug!(
        "saved {}x{} matrix to {} ({} bytes)",
        matrix.nrows(),
        matrix.ncols(),
        path.as_ref().display(),
        bytes.len()
    );
    Ok(())
}

/// Write a vector to `path`, replacing any existing file.
pub fn save_vector<T: RealScalar, P: AsRef<Path>>(vector: &Array1<T>, path: P) -> Result<()> {
    let bytes = encode_vector(vector)?;
    fs::write(path.as_ref(), &bytes)?;
    log::debug!(
        "saved vector of length {} to {} ({} bytes)",
        vector.len(),
        path.as_ref().display(),
        bytes.len()
    );
    Ok(())
}

/// Load a matrix written by [`save_matrix`].
pub fn load_matrix<T: RealScalar, P: AsRef<Path>>(path: P) -> Result<Array2<T>> {
    let bytes = read_checked::<T>(Layout::Matrix, path.as_ref())?;
    decode_matrix(&bytes)
}

/// Load a vector written by [`save_vector`].
pub fn load_vector<T: RealScalar, P: AsRef<Path>>(path: P) -> Result<Array1<T>> {
    let bytes = read_checked::<T>(Layout::Vector, path.as_ref())?;
    decode_vector(&bytes)
}

/// Read a file only after its header has been validated against its size.
fn read_checked<T: RealScalar>(layout: Layout, path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let file_len = file.metadata()?.len();

    let mut head = vec![0u8; layout.header_len()];
    if file_len < head.len() as u64 {
        return Err(DenseError::corruption(format!(
            "{} is {file_len} bytes, shorter than its header",
            path.display()
        )));
    }
    file.read_exact(&mut head)?;
    let header = read_header::<T>(layout, &head)?;
    check_total_len::<T>(layout, header, file_len)?;

    let mut bytes = head;
    bytes.reserve_exact((file_len as usize).saturating_sub(bytes.len()));
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn begin<T: RealScalar>(layout: Layout, rows: usize, cols: usize) -> Result<Vec<u8>> {
    if rows == 0 || cols == 0 {
        return Err(DenseError::EmptyDimension { rows, cols });
    }
    let mut out = Vec::with_capacity(layout.header_len());
    out.extend_from_slice(&layout.magic());
    out.push(T::BYTES as u8);
    out.extend_from_slice(&(rows as u64).to_le_bytes());
    if let Layout::Matrix = layout {
        out.extend_from_slice(&(cols as u64).to_le_bytes());
    }
    Ok(out)
}

fn read_header<T: RealScalar>(layout: Layout, bytes: &[u8]) -> Result<Header> {
    if bytes.len() < layout.header_len() {
        return Err(DenseError::corruption(format!(
            "{} bytes cannot hold a {}-byte header",
            bytes.len(),
            layout.header_len()
        )));
    }
    if bytes[..4] != layout.magic() {
        return Err(DenseError::corruption(format!(
            "bad magic {:?}, expected {:?}",
            &bytes[..4],
            layout.magic()
        )));
    }
    let width = bytes[4] as usize;
    if width != T::BYTES {
        return Err(DenseError::corruption(format!(
            "element width {width} does not match the requested type ({} bytes)",
            T::BYTES
        )));
    }

    let rows = read_dim(&bytes[5..13])?;
    let cols = match layout {
        Layout::Matrix => read_dim(&bytes[13..21])?,
        Layout::Vector => 1,
    };
    if rows == 0 || cols == 0 {
        return Err(DenseError::corruption(format!(
            "header declares an empty {rows}x{cols} buffer"
        )));
    }
    Ok(Header { rows, cols })
}

fn read_dim(bytes: &[u8]) -> Result<usize> {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);
    usize::try_from(u64::from_le_bytes(raw))
        .map_err(|_| DenseError::corruption("dimension does not fit in memory"))
}

fn check_total_len<T: RealScalar>(layout: Layout, header: Header, actual: u64) -> Result<()> {
    let expected = (header.rows as u64)
        .checked_mul(header.cols as u64)
        .and_then(|count| count.checked_mul(T::BYTES as u64))
        .and_then(|body| body.checked_add(layout.header_len() as u64 + 1))
        .ok_or_else(|| {
            DenseError::corruption(format!(
                "header declares {}x{} elements, which overflows",
                header.rows, header.cols
            ))
        })?;
    if expected != actual {
        return Err(DenseError::corruption(format!(
            "header declares {}x{} elements ({expected} bytes) but the data is {actual} bytes",
            header.rows, header.cols
        )));
    }
    Ok(())
}

fn decode_body<T: RealScalar>(body: &[u8]) -> Result<Vec<T>> {
    let Some((&last, elements)) = body.split_last() else {
        return Err(DenseError::corruption("missing trailing sentinel"));
    };
    if last != SENTINEL {
        return Err(DenseError::corruption(format!(
            "trailing sentinel is {last:#04x}, expected {SENTINEL:#04x}"
        )));
    }
    Ok(elements.chunks_exact(T::BYTES).map(T::read_le).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_matrix_image_layout() {
        let m = array![[1.0_f64, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let bytes = encode_matrix(&m).unwrap();

        assert_eq!(&bytes[..4], b"DMAT");
        assert_eq!(bytes.len(), Layout::Matrix.header_len() + 6 * 8 + 1);
        assert_eq!(*bytes.last().unwrap(), SENTINEL);

        let back: Array2<f64> = decode_matrix(&bytes).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_width_byte_written() {
        let v = array![1.0_f32, 2.0];
        let bytes = encode_vector(&v).unwrap();
        assert_eq!(bytes[4] as usize, 4);
    }

    #[test]
    fn test_inflated_header_is_corruption() {
        let m = array![[1.0_f64, 2.0], [3.0, 4.0]];
        let mut bytes = encode_matrix(&m).unwrap();
        // claim 1000 rows
        bytes[5..13].copy_from_slice(&1000u64.to_le_bytes());

        let err = decode_matrix::<f64>(&bytes).unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_overflowing_header_is_corruption() {
        let m = array![[1.0_f64]];
        let mut bytes = encode_matrix(&m).unwrap();
        bytes[5..13].copy_from_slice(&u64::MAX.to_le_bytes());
        bytes[13..21].copy_from_slice(&u64::MAX.to_le_bytes());

        assert!(decode_matrix::<f64>(&bytes).unwrap_err().is_corruption());
    }

    #[test]
    fn test_truncated_and_bad_sentinel() {
        let v = array![1.0_f64, 2.0, 3.0];
        let bytes = encode_vector(&v).unwrap();

        let truncated = &bytes[..bytes.len() - 1];
        assert!(decode_vector::<f64>(truncated).unwrap_err().is_corruption());

        let mut bad = bytes.clone();
        *bad.last_mut().unwrap() = 0;
        assert!(decode_vector::<f64>(&bad).unwrap_err().is_corruption());
    }

    #[test]
    fn test_type_and_kind_checked() {
        let v = array![1.0_f64, 2.0];
        let bytes = encode_vector(&v).unwrap();

        assert!(decode_vector::<f32>(&bytes).unwrap_err().is_corruption());
        assert!(decode_matrix::<f64>(&bytes).unwrap_err().is_corruption());
    }

    #[test]
    fn test_empty_rejected_on_encode() {
        let empty: Array1<f64> = Array1::zeros(0);
        assert!(encode_vector(&empty).unwrap_err().is_dimension_error());
    }
}
