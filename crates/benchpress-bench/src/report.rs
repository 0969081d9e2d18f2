//! JSON report of a workout run.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BenchResult;
use crate::harness::BenchmarkRecord;
use crate::workout::ScenarioOutcome;

/// A failed scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub name: String,
    pub error: String,
}

/// A skipped scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skip {
    pub name: String,
    pub reason: String,
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub datetime: DateTime<Utc>,
    /// Version of the benchmark suite.
    pub version: String,
    pub backend: String,
    pub optimization_level: u8,
    pub benchmarks: Vec<BenchmarkRecord>,
    pub failures: Vec<Failure>,
    pub skipped: Vec<Skip>,
}

impl Report {
    /// Build a report from scenario outcomes, stamped with the current time.
    pub fn new(
        backend: impl Into<String>,
        optimization_level: u8,
        outcomes: impl IntoIterator<Item = ScenarioOutcome>,
    ) -> Self {
        let mut report = Self {
            datetime: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            backend: backend.into(),
            optimization_level,
            benchmarks: Vec::new(),
            failures: Vec::new(),
            skipped: Vec::new(),
        };
        for outcome in outcomes {
            match outcome {
                ScenarioOutcome::Passed(record) => report.benchmarks.push(record),
                ScenarioOutcome::Failed { name, error } => report.failures.push(Failure {
                    name,
                    error: error.to_string(),
                }),
                ScenarioOutcome::Skipped { name, reason } => {
                    report.skipped.push(Skip { name, reason });
                }
            }
        }
        report
    }

    /// Whether any scenario failed.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> BenchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> BenchResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;
    use crate::harness::Stats;
    use std::time::Duration;

    fn outcomes() -> Vec<ScenarioOutcome> {
        let stats = Stats::from_samples(&[Duration::from_millis(3)], 1);
        vec![
            ScenarioOutcome::Passed(
                BenchmarkRecord::new("QFT_100_transpile", "device_transpile_100q", stats)
                    .with_metric("gate_count_2q", 12_usize)
                    .with_metric("depth_2q", 5_usize),
            ),
            ScenarioOutcome::Failed {
                name: "QV_100_transpile".into(),
                error: BenchError::EmptyResult {
                    scenario: "QV_100_transpile".into(),
                },
            },
            ScenarioOutcome::Skipped {
                name: "QAOA_100_transpile".into(),
                reason: "not implemented".into(),
            },
        ]
    }

    #[test]
    fn test_report_sorts_outcomes() {
        let report = Report::new("heavy_hex_cz", 2, outcomes());
        assert_eq!(report.benchmarks.len(), 1);
        assert_eq!(report.failures[0].name, "QV_100_transpile");
        assert!(report.failures[0].error.contains("empty"));
        assert_eq!(report.skipped[0].reason, "not implemented");
        assert!(report.has_failures());
    }

    #[test]
    fn test_report_json() {
        let report = Report::new("linear_cx", 1, outcomes());
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["backend"], "linear_cx");
        assert_eq!(json["optimization_level"], 1);
        assert_eq!(json["benchmarks"][0]["extra_info"]["depth_2q"], 5);
        assert!(json["benchmarks"][0]["stats"]["mean"].is_f64());
        // RFC 3339 timestamps parse back.
        let stamp = json["datetime"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        Report::new("full_cx", 0, Vec::new()).write_json(&path).unwrap();
        let back: Report = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(back.benchmarks.is_empty());
        assert!(!back.has_failures());
    }
}
