//! Wall-clock measurement around a single strategy run.

use std::time::{Duration, Instant};

use crate::error::Result;
use crate::matrix::Matrix;
use crate::strategy::Strategy;
use crate::verify::{verify, DEFAULT_TOLERANCE};

/// Product of one strategy invocation and how long it took.
#[derive(Clone, Debug)]
pub struct ExecutionResult {
    pub strategy: Strategy,
    pub workers: usize,
    pub product: Matrix,
    pub elapsed: Duration,
    /// `None` when no gold matrix was supplied.
    pub verified: Option<bool>,
}

/// Serializable view of an [`ExecutionResult`] without the product.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RunSummary {
    pub strategy: Strategy,
    pub workers: usize,
    pub dim: usize,
    pub elapsed_micros: u64,
    pub verified: Option<bool>,
}

impl ExecutionResult {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            strategy: self.strategy,
            workers: self.workers,
            dim: self.product.dim(),
            elapsed_micros: u64::try_from(self.elapsed.as_micros()).unwrap_or(u64::MAX),
            verified: self.verified,
        }
    }
}

/// Time `strategy` on `a * b` and, given a gold product, check the result
/// against it with [`DEFAULT_TOLERANCE`].
///
/// A failed comparison is recorded in the result; only errors from the
/// multiplication itself are returned as `Err`.
pub fn run_and_time(
    strategy: Strategy,
    a: &Matrix,
    b: &Matrix,
    workers: usize,
    gold: Option<&Matrix>,
) -> Result<ExecutionResult> {
    log::info!("running {strategy} with {workers} worker(s) on {}x{}", a.dim(), a.dim());

    let start = Instant::now();
    let product = strategy.multiply(a, b, workers)?;
    let elapsed = start.elapsed();

    let verified = gold.map(|g| verify(g, &product, DEFAULT_TOLERANCE));
    log::info!("{strategy} finished in {elapsed:?}, verified={verified:?}");

    Ok(ExecutionResult {
        strategy,
        workers,
        product,
        elapsed,
        verified,
    })
}

/// `"1 second, 250 microseconds"` style rendering of a duration.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let micros = elapsed.subsec_micros();
    format!(
        "{secs} second{}, {micros} microsecond{}",
        if secs == 1 { "" } else { "s" },
        if micros == 1 { "" } else { "s" },
    )
}
