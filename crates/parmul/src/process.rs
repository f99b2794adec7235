//! Process-parallel multiplication over a shared anonymous mapping.
//!
//! The output region is mapped before any fork so every child inherits the
//! same physical pages. Children compute their row range into the region
//! and `_exit`; the parent computes the last range, reaps every child by
//! pid, copies the region into the caller's matrix and unmaps it.

use std::io;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{check_operands, check_workers, element_count, MatmulError, Result};
use crate::matrix::Matrix;
use crate::partition::{partition, RowRange};
use crate::serial::multiply_rows;
use crate::shm::SharedRegion;

struct Child {
    worker: usize,
    pid: libc::pid_t,
    range: RowRange,
}

/// `C = A * B` computed by `workers` processes (`workers - 1` forked
/// children plus the caller).
pub fn multiply_parallel_processes(a: &Matrix, b: &Matrix, workers: usize) -> Result<Matrix> {
    let mut c = Matrix::zeros(check_operands(a.dim(), b.dim())?)?;
    multiply_parallel_processes_into(a, b, &mut c, workers)?;
    Ok(c)
}

/// Like [`multiply_parallel_processes`] but fills a caller-owned output.
///
/// Child exit status is only logged. A child that dies before writing
/// leaves its rows zero in the result; callers that care should verify
/// against a serial product.
pub fn multiply_parallel_processes_into(
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

    let mut region = SharedRegion::new(element_count(dim)?)?;
    let mut children: Vec<Child> = Vec::new();
    {
        let mut parts = partition.split_rows(region.as_mut_slice())?;
        let own = parts.pop().ok_or(MatmulError::ZeroWorkers)?;

        for (worker, (range, out)) in partition.ranges().iter().copied().zip(parts).enumerate() {
            match spawn_worker(a_buf, b_buf, dim, range, out) {
                Ok(pid) => {
                    log::debug!(
                        "[process] worker {worker} pid {pid} rows {}..{}",
                        range.start,
                        range.end
                    );
                    children.push(Child { worker, pid, range });
                }
                Err(source) => {
                    // Never leave already started children behind.
                    reap(&children);
                    return Err(MatmulError::ProcessSpawn { worker, source });
                }
            }
        }

        let last = partition.last();
        log::debug!(
            "[process] parent computes rows {}..{}",
            last.start,
            last.end
        );
        multiply_rows(a_buf, b_buf, dim, last, own);
    }

    reap(&children);

    c.as_mut_slice().copy_from_slice(region.as_slice());
    region.release()
}

/// Fork one worker. Returns the child's pid in the parent; the child
/// never returns.
fn spawn_worker(
    a: &[f64],
    b: &[f64],
    dim: usize,
    range: RowRange,
    out: &mut [f64],
) -> io::Result<libc::pid_t> {
    match unsafe { libc::fork() } {
        -1 => Err(io::Error::last_os_error()),
        0 => {
            // Child: no logging, no destructors, no unwinding past this frame.
            // Only the forking thread exists here, so a lock another parent
            // thread held at fork time (allocator, stderr) is never released.
            // The kernel does not allocate or lock on valid input; the panic
            // hook would, which makes a child panic a possible hang rather
            // than a clean exit status 1.
            let ok = panic::catch_unwind(AssertUnwindSafe(|| {
                multiply_rows(a, b, dim, range, out)
            }))
            .is_ok();
            unsafe { libc::_exit(if ok { 0 } else { 1 }) }
        }
        pid => Ok(pid),
    }
}

/// Block until every listed child has terminated.
fn reap(children: &[Child]) {
    for child in children {
        let mut status: libc::c_int = 0;
        loop {
            let rc = unsafe { libc::waitpid(child.pid, &mut status, 0) };
            if rc != -1 {
                break;
            }
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            log::warn!("[process] waitpid({}) failed: {err}", child.pid);
            break;
        }

        if !(libc::WIFEXITED(status) && libc::WEXITSTATUS(status) == 0) {
            log::warn!(
                "[process] worker {} (pid {}) ended abnormally (status {status:#x}); rows {}..{} may be incomplete",
                child.worker,
                child.pid,
                child.range.start,
                child.range.end
            );
        }
    }
}
