//! Driver for the matrix multiplication comparison.
//!
//! Builds two deterministic `dim x dim` inputs, computes the serial gold
//! product, then times each requested parallel strategy against it.

use std::io::Write;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use parmul::{format_elapsed, run_and_time, ExecutionResult, Matrix, Strategy};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "matrix-multiply",
    version,
    about = "Compare serial, multi-process and multi-threaded matrix multiplication"
)]
pub struct Args {
    /// Matrix dimension (NxN)
    #[arg(long, env = "PARMUL_DIM", default_value_t = parmul::DEFAULT_DIM)]
    pub dim: usize,

    /// Number of workers for the parallel strategies
    #[arg(short, long, env = "PARMUL_WORKERS", default_value_t = parmul::DEFAULT_WORKERS)]
    pub workers: usize,

    /// Strategy to time (repeatable). Defaults to all of them; the serial
    /// product is always computed as the reference.
    #[arg(short, long = "strategy")]
    pub strategies: Vec<Strategy>,

    /// Print the input matrices and every product
    #[arg(long)]
    pub print: bool,

    /// Skip comparing parallel products against the serial one
    #[arg(long)]
    pub no_verify: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Args {
    /// Parallel strategies to run after the serial reference, in order and
    /// without duplicates.
    fn parallel_strategies(&self) -> Vec<Strategy> {
        let requested: &[Strategy] = if self.strategies.is_empty() {
            &Strategy::ALL
        } else {
            &self.strategies
        };
        let mut out: Vec<Strategy> = Vec::new();
        for st in requested {
            if *st != Strategy::Serial && !out.contains(st) {
                out.push(*st);
            }
        }
        out
    }
}

pub fn run(args: &Args, out: &mut impl Write) -> anyhow::Result<()> {
    log::debug!(
        "[matrix-multiply] dim={} workers={} format={:?}",
        args.dim,
        args.workers,
        args.format
    );

    let a = Matrix::sequential(args.dim).context("building matrix A")?;
    let b = Matrix::sequential(args.dim).context("building matrix B")?;
    let text = args.format == Format::Text;

    if text && args.print {
        write!(out, "\nMatrix A\n{a}")?;
        write!(out, "\nMatrix B\n{b}")?;
    }

    let gold = run_and_time(Strategy::Serial, &a, &b, 1, None).context("serial multiply")?;
    let mut runs = Vec::new();
    if text {
        write_run(out, &gold, args.print)?;
        writeln!(out, "Result checksum: {}", gold.product.checksum())?;
    }

    for strategy in args.parallel_strategies() {
        let reference = (!args.no_verify).then_some(&gold.product);
        let run = run_and_time(strategy, &a, &b, args.workers, reference)
            .with_context(|| format!("{strategy} multiply with {} workers", args.workers))?;
        if text {
            write_run(out, &run, args.print)?;
        }
        runs.push(run);
    }

    if !text {
        let mut summaries = vec![gold.summary()];
        summaries.extend(runs.iter().map(ExecutionResult::summary));
        serde_json::to_writer_pretty(&mut *out, &summaries)?;
        writeln!(out)?;
    }

    out.flush()?;
    Ok(())
}

fn write_run(out: &mut impl Write, run: &ExecutionResult, print: bool) -> std::io::Result<()> {
    let name = run.strategy.name();
    writeln!(
        out,
        "Algorithm: {name} with {} worker{}",
        run.workers,
        if run.workers == 1 { "" } else { "s" }
    )?;
    writeln!(out, "Time elapsed for {name}: {}", format_elapsed(run.elapsed))?;

    if let Some(ok) = run.verified {
        writeln!(
            out,
            "Verification for {name}: {}",
            if ok { "success" } else { "failed" }
        )?;
    }

    if print {
        write!(out, "\nResult: {name}\n{}", run.product)?;
    }
    Ok(())
}
