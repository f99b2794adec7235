//! Named execution strategies and dispatch.

use core::fmt;
use core::str::FromStr;

use crate::error::Result;
use crate::matrix::Matrix;

/// One way of computing `A * B`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Serial,
    Processes,
    Threads,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Serial, Strategy::Processes, Strategy::Threads];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Serial => "serial",
            Strategy::Processes => "processes",
            Strategy::Threads => "threads",
        }
    }

    /// Run this strategy. `workers` is ignored by [`Strategy::Serial`].
    pub fn multiply(self, a: &Matrix, b: &Matrix, workers: usize) -> Result<Matrix> {
        match self {
            Strategy::Serial => crate::multiply_serial(a, b),
            Strategy::Processes => crate::multiply_parallel_processes(a, b, workers),
            Strategy::Threads => crate::multiply_parallel_threads(a, b, workers),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|st| st.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown strategy `{s}` (expected serial, processes or threads)"))
    }
}
