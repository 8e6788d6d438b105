//! Summary statistics over per-round timing samples.

/// Mean, median, sample deviation and extrema of one strategy's rounds, all
/// in nanoseconds per dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RoundStats {
    /// Arithmetic mean.
    pub mean_ns: f64,
    /// Median (midpoint average for even sample counts).
    pub median_ns: f64,
    /// Sample standard deviation (n - 1 denominator); 0 for a single round.
    pub std_dev_ns: f64,
    /// Fastest round.
    pub min_ns: f64,
    /// Slowest round.
    pub max_ns: f64,
    /// Number of rounds that produced a usable measurement.
    pub rounds: usize,
}

impl RoundStats {
    /// Reduces a set of samples; `None` when every round was discarded.
    pub fn from_samples(samples: &[f64]) -> Option<RoundStats> {
        if samples.is_empty() {
            return None;
        }

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        let std_dev = if sorted.len() > 1 {
            let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0);
            var.sqrt()
        } else {
            0.0
        };

        Some(RoundStats {
            mean_ns: mean,
            median_ns: median,
            std_dev_ns: std_dev,
            min_ns: sorted[0],
            max_ns: sorted[sorted.len() - 1],
            rounds: sorted.len(),
        })
    }
}
