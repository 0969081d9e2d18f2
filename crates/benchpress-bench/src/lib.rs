//! Device transpile benchmark suite.
//!
//! Measures how long the compiler needs to transpile fixed circuits for a
//! device, and how good the result is:
//! - **Scenarios** ([`device_transpile`]): QFT, quantum volume, circSU2,
//!   Bernstein-Vazirani, square Heisenberg, QAOA and a BV-like circuit that
//!   should simplify away, all at 100 qubits by default
//! - **Harness** ([`harness`]): warmup and measured rounds, timing statistics
//!   and records with free-form metrics
//! - **Fixtures** ([`fixtures`]): the QASM inputs, regenerated on demand
//!
//! # Example
//!
//! ```
//! use benchpress_bench::{Configuration, DeviceTranspile};
//!
//! let mut config = Configuration::default();
//! config.benchmark.rounds = 1;
//! config.benchmark.warmup_rounds = 0;
//!
//! let suite = DeviceTranspile::new(config).unwrap().with_num_qubits(10);
//! let record = suite.bvlike_simplification_transpile().unwrap();
//! assert_eq!(record.metric_u64("gate_count_2q"), Some(0));
//! ```

pub mod circuits;
pub mod config;
pub mod device_transpile;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod qv;
pub mod report;
pub mod workout;

pub use config::Configuration;
pub use device_transpile::{DEPTH_2Q, DeviceTranspile, GATE_COUNT_2Q, PreparedScenario};
pub use error::{BenchError, BenchResult};
pub use fixtures::FixtureFamily;
pub use harness::{Bencher, BenchmarkRecord, Measured, Stats};
pub use report::Report;
pub use workout::{Plan, ScenarioOutcome, Suite, Workout, run_workout, validate_workout};
