//! Timing harness: repeated execution, statistics and benchmark records.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Runs a closure repeatedly and measures each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bencher {
    rounds: usize,
    warmup_rounds: usize,
}

impl Bencher {
    /// Create a bencher. At least one round is always measured.
    pub fn new(rounds: usize, warmup_rounds: usize) -> Self {
        Self {
            rounds: rounds.max(1),
            warmup_rounds,
        }
    }

    /// Number of measured rounds.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Number of unrecorded warmup rounds.
    pub fn warmup_rounds(&self) -> usize {
        self.warmup_rounds
    }

    /// Call `f` `warmup_rounds` times unrecorded, then `rounds` times
    /// recorded, and return the statistics together with the last value.
    ///
    /// The first error stops the run and is returned as is.
    pub fn run<T, E, F>(&self, mut f: F) -> Result<Measured<T>, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        for round in 0..self.warmup_rounds {
            let value = f()?;
            debug!("Warmup round {} done", round + 1);
            drop(value);
        }

        let mut samples = Vec::with_capacity(self.rounds);
        let mut value = timed(&mut f, &mut samples)?;
        for _ in 1..self.rounds {
            value = timed(&mut f, &mut samples)?;
        }

        Ok(Measured {
            stats: Stats::from_samples(&samples, self.warmup_rounds),
            value,
        })
    }
}

fn timed<T, E>(
    f: &mut impl FnMut() -> Result<T, E>,
    samples: &mut Vec<Duration>,
) -> Result<T, E> {
    let start = Instant::now();
    let value = f()?;
    let elapsed = start.elapsed();
    samples.push(elapsed);
    debug!("Round {}: {:?}", samples.len(), elapsed);
    Ok(value)
}

impl Default for Bencher {
    fn default() -> Self {
        Self::new(5, 1)
    }
}

/// Output of [`Bencher::run`].
#[derive(Debug, Clone)]
pub struct Measured<T> {
    /// Timing over the measured rounds.
    pub stats: Stats,
    /// Value returned by the last round.
    pub value: T,
}

/// Timing statistics in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub rounds: usize,
    pub warmup_rounds: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation, zero for a single round.
    pub stddev: f64,
    pub total: f64,
    /// Calls per second at the mean time.
    pub ops: f64,
}

impl Stats {
    /// Aggregate measured samples.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_samples(samples: &[Duration], warmup_rounds: usize) -> Self {
        let mut secs: Vec<f64> = samples.iter().map(Duration::as_secs_f64).collect();
        secs.sort_by(f64::total_cmp);
        let len = secs.len();
        if len == 0 {
            return Self {
                rounds: 0,
                warmup_rounds,
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                median: 0.0,
                stddev: 0.0,
                total: 0.0,
                ops: 0.0,
            };
        }

        let total: f64 = secs.iter().sum();
        let mean = total / len as f64;
        let median = if len % 2 == 0 {
            (secs[len / 2 - 1] + secs[len / 2]) / 2.0
        } else {
            secs[len / 2]
        };
        let stddev = if len > 1 {
            let variance = secs
                .iter()
                .map(|&s| (s - mean) * (s - mean))
                .sum::<f64>()
                / (len - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };
        let ops = if mean > 0.0 { 1.0 / mean } else { 0.0 };

        Self {
            rounds: len,
            warmup_rounds,
            min: secs[0],
            max: secs[len - 1],
            mean,
            median,
            stddev,
            total,
            ops,
        }
    }
}

/// One finished benchmark: its timing plus free-form metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Scenario name.
    pub name: String,
    /// Workout the scenario belongs to.
    pub group: String,
    pub stats: Stats,
    /// Metrics attached after timing.
    pub extra_info: serde_json::Map<String, serde_json::Value>,
}

impl BenchmarkRecord {
    /// Create a record without metrics.
    pub fn new(name: impl Into<String>, group: impl Into<String>, stats: Stats) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            stats,
            extra_info: serde_json::Map::new(),
        }
    }

    /// Add a metric.
    #[must_use]
    pub fn with_metric(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.extra_info.insert(key.into(), value.into());
        self
    }

    /// Read an integer metric back.
    pub fn metric_u64(&self, key: &str) -> Option<u64> {
        self.extra_info.get(key).and_then(serde_json::Value::as_u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|&v| Duration::from_millis(v)).collect()
    }

    #[test]
    fn test_stats_from_samples() {
        let stats = Stats::from_samples(&ms(&[30, 10, 20, 40]), 2);
        assert_eq!(stats.rounds, 4);
        assert_eq!(stats.warmup_rounds, 2);
        assert!((stats.min - 0.010).abs() < 1e-9);
        assert!((stats.max - 0.040).abs() < 1e-9);
        assert!((stats.mean - 0.025).abs() < 1e-9);
        assert!((stats.median - 0.025).abs() < 1e-9);
        assert!((stats.total - 0.100).abs() < 1e-9);
        assert!((stats.ops - 40.0).abs() < 1e-6);
        // sqrt(500 / 3) ms
        assert!((stats.stddev - 0.012_909_944).abs() < 1e-6);
    }

    #[test]
    fn test_single_sample_has_no_spread() {
        let stats = Stats::from_samples(&ms(&[7]), 0);
        assert_eq!(stats.rounds, 1);
        assert_eq!(stats.stddev, 0.0);
        assert_eq!(stats.min, stats.max);
        assert_eq!(stats.median, stats.mean);
    }

    #[test]
    fn test_run_counts_calls_and_keeps_last() {
        let bencher = Bencher::new(3, 2);
        let mut calls = 0;
        let measured = bencher
            .run(|| {
                calls += 1;
                Ok::<_, ()>(calls)
            })
            .unwrap();
        assert_eq!(calls, 5);
        assert_eq!(measured.value, 5);
        assert_eq!(measured.stats.rounds, 3);
        assert_eq!(measured.stats.warmup_rounds, 2);
    }

    #[test]
    fn test_run_stops_on_first_error() {
        let bencher = Bencher::new(4, 1);
        let mut calls = 0;
        let result = bencher.run(|| {
            calls += 1;
            if calls == 2 { Err("boom") } else { Ok(calls) }
        });
        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_zero_rounds_clamped() {
        let bencher = Bencher::new(0, 0);
        assert_eq!(bencher.rounds(), 1);
        let measured = bencher.run(|| Ok::<_, ()>("x")).unwrap();
        assert_eq!(measured.stats.rounds, 1);
    }

    #[test]
    fn test_record_metrics() {
        let stats = Stats::from_samples(&ms(&[1]), 0);
        let record = BenchmarkRecord::new("QFT_100_transpile", "device_transpile_100q", stats)
            .with_metric("gate_count_2q", 42_usize)
            .with_metric("depth_2q", 17_usize);
        assert_eq!(record.metric_u64("gate_count_2q"), Some(42));
        assert_eq!(record.metric_u64("depth_2q"), Some(17));
        assert_eq!(record.metric_u64("missing"), None);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["extra_info"]["gate_count_2q"], 42);
        assert_eq!(json["group"], "device_transpile_100q");
    }
}
