//! Error type shared by every strategy.

use core::fmt;
use std::io;

pub type Result<T> = core::result::Result<T, MatmulError>;

/// Everything that can stop a multiplication from producing a product.
///
/// Precondition violations (`ZeroDimension` .. `TooManyWorkers`) are caller
/// mistakes. The OS variants are fatal for the run: a partially started
/// worker set never yields a usable product, so callers are expected to
/// propagate them to the top level and terminate.
#[derive(Debug)]
pub enum MatmulError {
    ZeroDimension,
    ZeroWorkers,
    DimensionMismatch { left: usize, right: usize },
    BufferLength { expected: usize, actual: usize },
    DimensionOverflow { dim: usize },
    TooManyWorkers { workers: usize },
    SharedMemory(io::Error),
    Release(io::Error),
    ProcessSpawn { worker: usize, source: io::Error },
    ThreadSpawn { worker: usize, source: io::Error },
    WorkerPanicked { worker: usize },
    Unsupported(&'static str),
}

impl MatmulError {
    /// True for failures of an OS primitive rather than bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SharedMemory(_)
                | Self::Release(_)
                | Self::ProcessSpawn { .. }
                | Self::ThreadSpawn { .. }
                | Self::WorkerPanicked { .. }
        )
    }
}

impl fmt::Display for MatmulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "matrix dimension must be positive"),
            Self::ZeroWorkers => write!(f, "worker count must be at least 1"),
            Self::DimensionMismatch { left, right } => {
                write!(f, "dimension mismatch: {left}x{left} vs {right}x{right}")
            }
            Self::BufferLength { expected, actual } => {
                write!(f, "buffer holds {actual} elements, expected {expected}")
            }
            Self::DimensionOverflow { dim } => {
                write!(f, "a {dim}x{dim} matrix of f64 does not fit in memory")
            }
            Self::TooManyWorkers { workers } => {
                write!(f, "cannot track {workers} workers")
            }
            Self::SharedMemory(e) => write!(f, "mmap: {e}"),
            Self::Release(e) => write!(f, "munmap: {e}"),
            Self::ProcessSpawn { worker, source } => {
                write!(f, "fork for worker {worker}: {source}")
            }
            Self::ThreadSpawn { worker, source } => {
                write!(f, "spawning thread for worker {worker}: {source}")
            }
            Self::WorkerPanicked { worker } => write!(f, "worker {worker} panicked"),
            Self::Unsupported(what) => write!(f, "unsupported: {what}"),
        }
    }
}

impl std::error::Error for MatmulError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SharedMemory(e) | Self::Release(e) => Some(e),
            Self::ProcessSpawn { source, .. } | Self::ThreadSpawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Both operands must be non-empty and share a dimension.
pub(crate) fn check_operands(left: usize, right: usize) -> Result<usize> {
    if left == 0 || right == 0 {
        return Err(MatmulError::ZeroDimension);
    }
    if left != right {
        return Err(MatmulError::DimensionMismatch { left, right });
    }
    Ok(left)
}

/// Number of elements in a `dim x dim` matrix, if its bytes fit in an
/// allocation.
pub(crate) fn element_count(dim: usize) -> Result<usize> {
    dim.checked_mul(dim)
        .filter(|n| {
            n.checked_mul(core::mem::size_of::<f64>())
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(MatmulError::DimensionOverflow { dim })
}

pub(crate) fn check_workers(workers: usize) -> Result<()> {
    if workers == 0 {
        return Err(MatmulError::ZeroWorkers);
    }
    Ok(())
}
