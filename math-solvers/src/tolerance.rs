//! Floating-point comparison to a multiple of machine epsilon

use math_numerics_dense::RealScalar;

/// `true` iff `|a - b| < n * EPSILON`.
///
/// Callers pass a larger `n` for quantities that accumulated more rounding,
/// e.g. proportional to the elimination step.
#[inline]
pub fn nearly_equal<T: RealScalar>(a: T, b: T, n: usize) -> bool {
    (a - b).abs() < T::epsilon_times(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_values() {
        assert!(nearly_equal(1.0_f64, 1.0, 1));
        assert!(nearly_equal(0.0_f32, 0.0, 1));
    }

    #[test]
    fn test_within_one_ulp_at_one() {
        let a = 1.0_f64;
        let b = 1.0 + 0.5 * f64::EPSILON;
        assert!(nearly_equal(a, b, 1));
        assert!(!nearly_equal(a, 1.0 + 2.0 * f64::EPSILON, 1));
        assert!(nearly_equal(a, 1.0 + 2.0 * f64::EPSILON, 3));
    }

    #[test]
    fn test_tolerance_is_absolute() {
        // tolerance does not grow with magnitude
        assert!(!nearly_equal(1.0e6_f64, 1.0e6 + 1.0e-6, 1));
    }

    #[test]
    fn test_zero_multiplier_never_matches() {
        assert!(!nearly_equal(2.0_f64, 2.0, 0));
    }

    #[test]
    fn test_nan_never_matches() {
        assert!(!nearly_equal(f64::NAN, f64::NAN, 10));
    }
}
