//! CLI entry point: run the dispatch benchmark and print the summary table.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;
use typecase_harness::{
    CLOCK_EXIT_CODE, Config, Distribution, HarnessError, MISMATCH_EXIT_CODE, Report, run,
};

#[derive(Debug, Parser)]
#[command(name = "typecase-bench", about = "Benchmark dispatch strategies over a closed kind hierarchy")]
struct Cli {
    /// Number of kinds in the hierarchy (1..=128).
    #[arg(long, default_value_t = 16)]
    kinds: usize,

    /// Input array length.
    #[arg(long, default_value_t = 10_000)]
    len: usize,

    /// Timing rounds per strategy.
    #[arg(long, default_value_t = 32)]
    rounds: usize,

    /// Seed for the random and repetitive distributions.
    #[arg(long, default_value_t = 0x42)]
    seed: u64,

    /// Kind distribution over the array.
    #[arg(long, value_enum, default_value_t = Distribution::Random)]
    distribution: Distribution,

    /// Dump the summary table as CSV to this path.
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn print_report(report: &Report) {
    println!(
        "distribution: {}, {} values, ns per dispatch",
        report.distribution, report.len
    );
    println!(
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>9}",
        "strategy", "mean", "median", "std dev", "min", "max", "rel %"
    );
    for (strategy, sr) in &report.strategies {
        println!(
            "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>9.1}",
            strategy.to_string(),
            sr.stats.mean_ns,
            sr.stats.median_ns,
            sr.stats.std_dev_ns,
            sr.stats.min_ns,
            sr.stats.max_ns,
            sr.relative,
        );
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config {
        kinds: cli.kinds,
        len: cli.len,
        rounds: cli.rounds,
        seed: cli.seed,
        distribution: cli.distribution,
        csv: cli.csv,
    };

    match run(&config) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(err @ HarnessError::Mismatch { .. }) => {
            error!("{err}");
            ExitCode::from(MISMATCH_EXIT_CODE as u8)
        }
        Err(err @ HarnessError::ClockResolution { .. }) => {
            error!("{err}");
            ExitCode::from(CLOCK_EXIT_CODE as u8)
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
