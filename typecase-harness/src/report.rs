//! Run orchestration: verify, time, summarize, export.

use std::hint::black_box;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use enum_map::EnumMap;
use log::{debug, info, warn};
use strum::IntoEnumIterator;
use typecase::kind::Registry;
use typecase::shape::Shape;
use typecase::strategy::{KindResolve, Strategy, baseline_dispatch};

use crate::driver::{Distribution, build_values};
use crate::stats::RoundStats;
use crate::HarnessError;

/// Parameters of one harness run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of kinds in the closed hierarchy.
    pub kinds: usize,
    /// Length of the input array.
    pub len: usize,
    /// Timing rounds per strategy.
    pub rounds: usize,
    /// Seed for the distribution drivers.
    pub seed: u64,
    /// Kind distribution over the array.
    pub distribution: Distribution,
    /// Optional CSV dump target.
    pub csv: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            kinds: 16,
            len: 10_000,
            rounds: 32,
            seed: 0x42,
            distribution: Distribution::Random,
            csv: None,
        }
    }
}

/// One strategy's summarized outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyReport {
    /// Per-round timing summary, ns per dispatch.
    pub stats: RoundStats,
    /// Throughput relative to the virtual baseline, in percent
    /// (100 = as fast as virtual dispatch).
    pub relative: f64,
}

/// Outcome of a full run.
#[derive(Debug, Clone)]
pub struct Report {
    /// The distribution the values were drawn from.
    pub distribution: Distribution,
    /// Array length the times are normalized by.
    pub len: usize,
    /// Per-strategy summaries.
    pub strategies: EnumMap<Strategy, StrategyReport>,
}

/// Cross-validates every strategy against the baseline over the whole array.
///
/// Divergence is a hard abort: the returned error carries enough context to
/// name the offending strategy and value.
pub fn verify(registry: &Registry, values: &[Box<dyn Shape>]) -> Result<(), HarnessError> {
    for strategy in Strategy::iter() {
        let resolver = strategy.build(registry);
        for (index, value) in values.iter().enumerate() {
            let got = resolver.resolve(value.as_ref());
            let expected = baseline_dispatch(value.as_ref());
            if got != expected {
                return Err(HarnessError::Mismatch {
                    strategy,
                    index,
                    got,
                    expected,
                });
            }
        }
    }
    debug!(
        "verification passed: {} strategies over {} values",
        Strategy::iter().count(),
        values.len()
    );
    Ok(())
}

/// Times one full pass over the array, returning ns per dispatch.
///
/// A non-positive measurement means the clock could not resolve the round;
/// the round is aborted and reported, the run goes on.
fn time_round(
    resolver: &(dyn KindResolve + Send + Sync),
    values: &[Box<dyn Shape>],
) -> Option<f64> {
    let start = Instant::now();
    let mut sum = 0u64;
    for value in values {
        sum = sum.wrapping_add(u64::from(resolver.resolve(value.as_ref()).0));
    }
    black_box(sum);
    let elapsed = start.elapsed();

    if elapsed.is_zero() {
        return None;
    }
    Some(elapsed.as_nanos() as f64 / values.len() as f64)
}

/// Runs the full benchmark: build, verify, time, summarize, export.
pub fn run(config: &Config) -> Result<Report, HarnessError> {
    let registry = Registry::new(config.kinds);
    let values = build_values(&registry, config.distribution, config.len, config.seed);

    verify(&registry, &values)?;

    let mut summaries: EnumMap<Strategy, RoundStats> = EnumMap::default();
    for strategy in Strategy::iter() {
        // Built once per strategy: the memo dispatcher keeps its cache warm
        // across rounds, which is the steady state being measured.
        let resolver = strategy.build(&registry);
        let mut samples = Vec::with_capacity(config.rounds);

        for round in 0..config.rounds {
            match time_round(resolver.as_ref(), &values) {
                Some(ns) => samples.push(ns),
                None => warn!("strategy `{strategy}`: round {round} below clock resolution, dropped"),
            }
        }

        summaries[strategy] = RoundStats::from_samples(&samples)
            .ok_or(HarnessError::ClockResolution { strategy })?;
        info!(
            "strategy `{strategy}`: {:.2} ns/dispatch mean over {} rounds",
            summaries[strategy].mean_ns, summaries[strategy].rounds
        );
    }

    let ceiling = summaries[Strategy::Virtual].mean_ns;
    let report = Report {
        distribution: config.distribution,
        len: config.len,
        strategies: EnumMap::from_fn(|strategy| StrategyReport {
            stats: summaries[strategy],
            relative: 100.0 * ceiling / summaries[strategy].mean_ns,
        }),
    };

    if let Some(path) = &config.csv {
        write_csv(&report, path)?;
    }
    Ok(report)
}

/// Dumps one row per strategy: name, mean, median, deviation, extrema,
/// relative throughput.
pub fn write_csv(report: &Report, path: &Path) -> Result<(), HarnessError> {
    let mut out = std::fs::File::create(path)?;
    writeln!(
        out,
        "strategy,distribution,mean_ns,median_ns,std_dev_ns,min_ns,max_ns,rounds,relative_pct"
    )?;
    for (strategy, sr) in &report.strategies {
        writeln!(
            out,
            "{strategy},{},{:.3},{:.3},{:.3},{:.3},{:.3},{},{:.1}",
            report.distribution,
            sr.stats.mean_ns,
            sr.stats.median_ns,
            sr.stats.std_dev_ns,
            sr.stats.min_ns,
            sr.stats.max_ns,
            sr.stats.rounds,
            sr.relative,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use typecase::kind::KindId;

    #[test]
    fn smoke_run_produces_positive_times() {
        let config = Config {
            kinds: 8,
            len: 512,
            rounds: 4,
            ..Config::default()
        };
        let report = run(&config).unwrap();

        for (_, sr) in &report.strategies {
            assert!(sr.stats.mean_ns > 0.0);
            assert!(sr.stats.min_ns <= sr.stats.median_ns);
            assert!(sr.stats.median_ns <= sr.stats.max_ns);
            assert!(sr.relative > 0.0);
        }
        assert!((report.strategies[Strategy::Virtual].relative - 100.0).abs() < 1e-9);
    }

    #[test]
    fn verify_rejects_values_from_a_foreign_hierarchy() {
        let small = Registry::new(4);
        let big = Registry::new(16);
        let mut values = build_values(&small, Distribution::Sequential, 16, 0);
        values.push(big.make_value(KindId(11)));

        let err = verify(&small, &values).unwrap_err();
        match err {
            HarnessError::Mismatch { index, expected, got, .. } => {
                assert_eq!(index, 16);
                assert_eq!(expected, KindId(11));
                assert_eq!(got, KindId::INVALID);
            }
            other => panic!("expected a mismatch, got {other}"),
        }
    }

    #[test]
    fn csv_dump_has_one_row_per_strategy() {
        let dir = std::env::temp_dir().join("typecase-harness-csv-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("report.csv");

        let config = Config {
            kinds: 4,
            len: 128,
            rounds: 2,
            csv: Some(path.clone()),
            ..Config::default()
        };
        run(&config).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 1 + Strategy::iter().count());
        assert!(lines[0].starts_with("strategy,"));
        assert!(lines.iter().skip(1).any(|l| l.starts_with("memo,")));
    }
}
