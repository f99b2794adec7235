//! Row-major dense square matrices of `f64`.

use core::fmt;
use core::ops::Index;

use crate::error::{element_count, MatmulError, Result};

/// A `dim x dim` matrix stored row-major in one contiguous buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    dim: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// All-zero matrix.
    pub fn zeros(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(MatmulError::ZeroDimension);
        }
        let len = element_count(dim)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| MatmulError::DimensionOverflow { dim })?;
        data.resize(len, 0.0);
        Ok(Self { dim, data })
    }

    /// Deterministic test pattern: element at flattened index `i` is `i + 1`.
    pub fn sequential(dim: usize) -> Result<Self> {
        let mut m = Self::zeros(dim)?;
        init_matrix(&mut m.data);
        Ok(m)
    }

    pub fn from_vec(dim: usize, data: Vec<f64>) -> Result<Self> {
        if dim == 0 {
            return Err(MatmulError::ZeroDimension);
        }
        let expected = element_count(dim)?;
        if data.len() != expected {
            return Err(MatmulError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { dim, data })
    }

    /// Build from nested rows; every row must be as long as there are rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let dim = rows.len();
        let mut data = Vec::new();
        data.try_reserve_exact(element_count(dim)?)
            .map_err(|_| MatmulError::DimensionOverflow { dim })?;
        for row in rows {
            let row = row.as_ref();
            if row.len() != dim {
                return Err(MatmulError::DimensionMismatch {
                    left: dim,
                    right: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_vec(dim, data)
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.dim + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.dim;
        &self.data[start..start + self.dim]
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Sum of all elements, handy for eyeballing large results.
    pub fn checksum(&self) -> f64 {
        self.data.iter().sum()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.dim + col]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.dim {
            for (j, value) in self.row(i).iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{value:.6}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Fill `buf` with `1, 2, 3, ...` in flattened order.
pub fn init_matrix(buf: &mut [f64]) {
    for (i, slot) in buf.iter_mut().enumerate() {
        *slot = (i + 1) as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_pattern() {
        let m = Matrix::sequential(3).unwrap();
        for (i, v) in m.as_slice().iter().enumerate() {
            assert_eq!(*v, (i + 1) as f64);
        }
        assert_eq!(m[(1, 2)], 6.0);
        assert_eq!(m.get(2, 0), 7.0);
    }

    #[test]
    fn test_init_is_deterministic() {
        let mut a = vec![0.0; 25];
        let mut b = vec![-1.0; 25];
        init_matrix(&mut a);
        init_matrix(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(matches!(Matrix::zeros(0), Err(MatmulError::ZeroDimension)));
        assert!(matches!(
            Matrix::from_vec(2, vec![1.0; 3]),
            Err(MatmulError::BufferLength { expected: 4, actual: 3 })
        ));
        assert!(Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
        assert!(Matrix::from_rows(&[[1.0, 2.0, 3.0]]).is_err());
    }

    #[test]
    fn test_oversized_dimension_is_an_error() {
        // 2^32 on 64-bit targets: the element count overflows usize.
        let dim = (usize::MAX >> (usize::BITS / 2)) + 1;
        assert!(matches!(
            Matrix::from_vec(dim, Vec::new()),
            Err(MatmulError::DimensionOverflow { .. })
        ));
        assert!(matches!(
            Matrix::zeros(dim),
            Err(MatmulError::DimensionOverflow { .. })
        ));
        assert!(matches!(
            Matrix::zeros(usize::MAX),
            Err(MatmulError::DimensionOverflow { .. })
        ));
        assert!(matches!(
            Matrix::sequential(dim / 2),
            Err(MatmulError::DimensionOverflow { .. })
        ));
    }

    #[test]
    fn test_display_matches_print_layout() {
        let m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.5]]).unwrap();
        assert_eq!(m.to_string(), "1.000000 2.000000\n3.000000 4.500000\n");
    }

    #[test]
    fn test_checksum() {
        let m = Matrix::sequential(2).unwrap();
        assert_eq!(m.checksum(), 10.0);
    }
}
