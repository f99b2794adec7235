//! Reference `O(n^3)` multiplication, also the per-worker kernel.

use crate::error::{check_operands, MatmulError, Result};
use crate::matrix::Matrix;
use crate::partition::RowRange;

/// `C = A * B` on the calling thread. This is the gold result the parallel
/// strategies are checked against.
pub fn multiply_serial(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let mut c = Matrix::zeros(check_operands(a.dim(), b.dim())?)?;
    multiply_serial_into(a, b, &mut c)?;
    Ok(c)
}

/// Like [`multiply_serial`] but writes into a caller-owned output.
pub fn multiply_serial_into(a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()> {
    let dim = check_operands(a.dim(), b.dim())?;
    if c.dim() != dim {
        return Err(MatmulError::DimensionMismatch {
            left: dim,
            right: c.dim(),
        });
    }
    multiply_rows(a.as_slice(), b.as_slice(), dim, RowRange::new(0, dim), c.as_mut_slice());
    Ok(())
}

/// Compute rows `range` of `A * B` into `out`, which holds exactly those
/// rows (`range.len() * dim` elements, row-major).
///
/// Each output element is summed over `k` in ascending order, so any split
/// of the rows reproduces the serial result bit for bit.
pub(crate) fn multiply_rows(a: &[f64], b: &[f64], dim: usize, range: RowRange, out: &mut [f64]) {
    debug_assert_eq!(out.len(), range.len() * dim);

    for (i, out_row) in range.rows().zip(out.chunks_exact_mut(dim)) {
        let a_row = &a[i * dim..(i + 1) * dim];
        for (j, slot) in out_row.iter_mut().enumerate() {
            let mut sum = 0.0;
            for k in 0..dim {
                sum += a_row[k] * b[k * dim + j];
            }
            *slot = sum;
        }
    }
}
