//! Dense square matrix multiplication with three execution strategies.
//!
//! The same naive `i -> j -> k` kernel runs sequentially, across forked
//! worker processes that publish their rows through an anonymous shared
//! mapping, and across scoped threads writing straight into the caller's
//! buffer. Both parallel strategies split the output by [`partition`],
//! whose ranges are disjoint and cover every row.

pub mod error;
pub mod matrix;
pub mod partition;
pub mod serial;
pub mod strategy;
pub mod thread;
pub mod timing;
pub mod verify;

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        pub mod process;
        pub mod shm;
    }
}

pub use error::{MatmulError, Result};
pub use matrix::{init_matrix, Matrix};
pub use partition::{partition, Partition, RowRange};
pub use serial::{multiply_serial, multiply_serial_into};
pub use strategy::Strategy;
pub use thread::{multiply_parallel_threads, multiply_parallel_threads_into};
pub use timing::{format_elapsed, run_and_time, ExecutionResult, RunSummary};
pub use verify::{first_mismatch, verify, Mismatch, DEFAULT_TOLERANCE};

/// Matrix dimension used when nothing else is configured.
pub const DEFAULT_DIM: usize = 1024;

/// Worker count used when nothing else is configured.
pub const DEFAULT_WORKERS: usize = 4;

/// Multiply on forked worker processes.
///
/// Only available on unix targets; elsewhere this returns
/// [`MatmulError::Unsupported`].
pub fn multiply_parallel_processes(a: &Matrix, b: &Matrix, workers: usize) -> Result<Matrix> {
    cfg_if::cfg_if! {
        if #[cfg(unix)] {
            process::multiply_parallel_processes(a, b, workers)
        } else {
            let _ = (a, b, workers);
            Err(MatmulError::Unsupported("process strategy requires fork(2)"))
        }
    }
}
