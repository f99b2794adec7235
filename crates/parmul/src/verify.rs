//! Element-wise comparison of two products.

use crate::matrix::Matrix;

/// Absolute per-element tolerance used by the driver.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// First element where two matrices disagree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mismatch {
    pub row: usize,
    pub col: usize,
    pub expected: f64,
    pub actual: f64,
}

/// True when both matrices have the same dimension and every pair of
/// elements differs by at most `tolerance`. NaN never compares equal.
pub fn verify(expected: &Matrix, actual: &Matrix, tolerance: f64) -> bool {
    expected.dim() == actual.dim() && first_mismatch(expected, actual, tolerance).is_none()
}

/// Locate the first out-of-tolerance element in row-major order.
///
/// Returns `None` for matrices of different dimension as well; use
/// [`verify`] to tell the two cases apart.
pub fn first_mismatch(expected: &Matrix, actual: &Matrix, tolerance: f64) -> Option<Mismatch> {
    if expected.dim() != actual.dim() {
        return None;
    }
    let dim = expected.dim();
    expected
        .as_slice()
        .iter()
        .zip(actual.as_slice())
        .position(|(e, a)| !((e - a).abs() <= tolerance))
        .map(|idx| Mismatch {
            row: idx / dim,
            col: idx % dim,
            expected: expected.as_slice()[idx],
            actual: actual.as_slice()[idx],
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_within_tolerance() {
        let a = Matrix::sequential(3).unwrap();
        let mut b = a.clone();
        b.as_mut_slice()[4] += 1e-10;
        assert!(verify(&a, &b, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_reports_first_mismatch() {
        let a = Matrix::sequential(3).unwrap();
        let mut b = a.clone();
        b.as_mut_slice()[5] = 0.0;
        b.as_mut_slice()[7] = 0.0;
        assert!(!verify(&a, &b, DEFAULT_TOLERANCE));
        assert_eq!(
            first_mismatch(&a, &b, DEFAULT_TOLERANCE),
            Some(Mismatch {
                row: 1,
                col: 2,
                expected: 6.0,
                actual: 0.0,
            })
        );
    }

    #[test]
    fn test_nan_is_mismatch() {
        let a = Matrix::sequential(2).unwrap();
        let mut b = a.clone();
        b.as_mut_slice()[0] = f64::NAN;
        assert!(!verify(&a, &b, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_dimension_mismatch_is_not_equal() {
        let a = Matrix::sequential(2).unwrap();
        let b = Matrix::sequential(3).unwrap();
        assert!(!verify(&a, &b, DEFAULT_TOLERANCE));
        assert_eq!(first_mismatch(&a, &b, DEFAULT_TOLERANCE), None);
    }
}
