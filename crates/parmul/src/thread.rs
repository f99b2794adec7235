//! Thread-parallel multiplication writing straight into the caller's buffer.

use std::thread;

use crate::error::{check_operands, check_workers, MatmulError, Result};
use crate::matrix::Matrix;
use crate::partition::partition;
use crate::serial::multiply_rows;

/// `C = A * B` computed by `workers` threads (`workers - 1` spawned plus
/// the caller).
pub fn multiply_parallel_threads(a: &Matrix, b: &Matrix, workers: usize) -> Result<Matrix> {
    let mut c = Matrix::zeros(check_operands(a.dim(), b.dim())?)?;
    multiply_parallel_threads_into(a, b, &mut c, workers)?;
    Ok(c)
}

/// Like [`multiply_parallel_threads`] but fills a caller-owned output.
///
/// Each worker receives an exclusive `&mut` slice of its rows, so the
/// output needs no lock and no copy-back.
pub fn multiply_parallel_threads_into(
    a: &Matrix,
    b: &Matrix,
    c: &mut Matrix,
    workers: usize,
) -> Result<()> {
    let dim = check_operands(a.dim(), b.dim())?;
    check_operands(dim, c.dim())?;
    check_workers(workers)?;

    let partition = partition(dim, workers)?;
    let (a_buf, b_buf) = (a.as_slice(), b.as_slice());

    let mut parts = partition.split_rows(c.as_mut_slice())?;
    let own = parts.pop().ok_or(MatmulError::ZeroWorkers)?;

    thread::scope(|s| {
        let mut handles = Vec::new();
        for (worker, (range, out)) in partition.ranges().iter().copied().zip(parts).enumerate() {
            log::debug!(
                "[thread] worker {worker} rows {}..{}",
                range.start,
                range.end
            );
            let handle = thread::Builder::new()
                .name(format!("parmul-worker-{worker}"))
                .spawn_scoped(s, move || multiply_rows(a_buf, b_buf, dim, range, out))
                .map_err(|source| MatmulError::ThreadSpawn { worker, source })?;
            handles.push((worker, handle));
        }

        multiply_rows(a_buf, b_buf, dim, partition.last(), own);

        let mut panicked = None;
        for (worker, handle) in handles {
            if handle.join().is_err() && panicked.is_none() {
                panicked = Some(worker);
            }
        }
        match panicked {
            Some(worker) => Err(MatmulError::WorkerPanicked { worker }),
            None => Ok(()),
        }
    })
}
