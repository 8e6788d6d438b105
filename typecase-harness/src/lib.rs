//! Benchmark harness for the `typecase` dispatch engine.
//!
//! The harness stays on the narrow side of the interface: it builds input
//! arrays through [`typecase::Registry::make_value`], calls each strategy's
//! `resolve`, and cross-checks against `baseline_dispatch`. It never reaches
//! into engine internals.
//!
//! A run is: build values for one kind distribution, verify agreement over
//! the whole array (any divergence is fatal), then time repeated resolution
//! rounds per strategy and reduce the samples to summary statistics plus a
//! throughput percentage relative to the virtual-dispatch ceiling. Results
//! can be dumped as CSV.

pub mod driver;
pub mod report;
pub mod stats;

use thiserror::Error;
use typecase::KindId;
use typecase::Strategy;

pub use driver::{Distribution, build_values};
pub use report::{Config, Report, StrategyReport, run, verify, write_csv};
pub use stats::RoundStats;

/// Exit status of the benchmark binary when a strategy disagrees with the
/// virtual-dispatch baseline. A correctness failure, distinguished from
/// ordinary errors.
pub const MISMATCH_EXIT_CODE: i32 = 3;

/// Exit status when the clock is too coarse for every round of a strategy.
pub const CLOCK_EXIT_CODE: i32 = 2;

/// Everything that can abort a harness run.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A strategy resolved a value to a different kind than the baseline.
    /// This is an engine correctness violation, never recoverable.
    #[error(
        "dispatch mismatch: strategy `{strategy}` resolved value #{index} to {got}, baseline says {expected}"
    )]
    Mismatch {
        /// The diverging strategy.
        strategy: Strategy,
        /// Index of the value in the input array.
        index: usize,
        /// What the strategy answered.
        got: KindId,
        /// What the baseline answered.
        expected: KindId,
    },

    /// Every timing round of a strategy measured a non-positive duration.
    #[error("clock resolution too coarse: no usable round for strategy `{strategy}`")]
    ClockResolution {
        /// The strategy whose rounds were all discarded.
        strategy: Strategy,
    },

    /// CSV export failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
