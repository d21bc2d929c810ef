//! Scalar abstraction shared by every container and algorithm in the workspace
//!
//! - [`RealScalar`]: real floating-point element type, with the little-endian
//!   byte codec used by [`crate::io`]

use ndarray::{LinalgScalar, ScalarOperand};
use num_traits::{Float, FromPrimitive, NumAssign, ToPrimitive};
use std::fmt::{Debug, Display, LowerExp, UpperExp};

/// Trait for real scalar types that can be stored in dense buffers.
///
/// This trait gathers the floating-point arithmetic needed by the solvers
/// (comparisons, absolute values, machine epsilon) together with a fixed-width
/// byte encoding so that matrices and vectors can be persisted.
///
/// # Implementations
///
/// Provided for:
/// - `f64` (default for most problems)
/// - `f32` (for memory-constrained applications)
pub trait RealScalar:
    Float
    + NumAssign
    + FromPrimitive
    + ToPrimitive
    + LinalgScalar
    + ScalarOperand
    + Send
    + Sync
    + Debug
    + Display
    + LowerExp
    + UpperExp
    + Default
    + 'static
{
    /// Width of one encoded element in bytes
    const BYTES: usize;

    /// Append the little-endian encoding of `self` to `out`
    fn write_le(self, out: &mut Vec<u8>);

    /// Decode one element from the first [`Self::BYTES`] bytes of `bytes`
    ///
    /// Callers guarantee that `bytes` holds at least `Self::BYTES` bytes.
    fn read_le(bytes: &[u8]) -> Self;

    /// Machine epsilon scaled by an integer multiplier
    #[inline]
    fn epsilon_times(n: usize) -> Self {
        Self::from_usize(n).unwrap_or_else(Self::max_value) * Self::epsilon()
    }
}

impl RealScalar for f64 {
    const BYTES: usize = 8;

    #[inline]
    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&bytes[..8]);
        f64::from_le_bytes(raw)
    }
}

impl RealScalar for f32 {
    const BYTES: usize = 4;

    #[inline]
    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&bytes[..4]);
        f32::from_le_bytes(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_codec_f64() {
        let mut buf = Vec::new();
        (-1.25_f64).write_le(&mut buf);
        assert_eq!(buf.len(), f64::BYTES);
        assert_eq!(f64::read_le(&buf), -1.25);
    }

    #[test]
    fn test_byte_codec_f32() {
        let mut buf = Vec::new();
        3.5_f32.write_le(&mut buf);
        assert_eq!(buf.len(), f32::BYTES);
        assert_eq!(f32::read_le(&buf), 3.5);
    }

    #[test]
    fn test_epsilon_times() {
        assert_eq!(f64::epsilon_times(0), 0.0);
        assert_eq!(f64::epsilon_times(3), 3.0 * f64::EPSILON);
        assert_eq!(f32::epsilon_times(1), f32::EPSILON);
    }
}
