//! Error types for the benchmark harness.

use std::path::PathBuf;

use benchpress_compile::CompileError;
use benchpress_ir::IrError;
use benchpress_qasm::ParseError;
use thiserror::Error;

/// Errors raised while configuring, preparing or running scenarios.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BenchError {
    /// A fixture file is missing or unreadable.
    #[error("Cannot read fixture {}: {source}", path.display())]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fixture file is not valid OpenQASM 2.0.
    #[error("Malformed fixture {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Compilation failed inside the timed region.
    #[error("Compilation failed: {0}")]
    Compile(#[from] CompileError),

    /// The compiled circuit has no operations.
    #[error("Scenario {scenario} produced an empty circuit")]
    EmptyResult { scenario: String },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The configuration file is missing or unreadable.
    #[error("Cannot read configuration {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML.
    #[error("Invalid configuration file: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A report could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error outside fixture loading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend selector names no known target.
    #[error("Unknown backend '{0}'")]
    UnknownBackend(String),

    /// A circuit generator failed.
    #[error("Circuit construction failed: {0}")]
    Ir(#[from] IrError),

    /// A workout and its implementation disagree.
    #[error("Workout validation failed: {0}")]
    Workout(String),
}

/// Result type for harness operations.
pub type BenchResult<T> = Result<T, BenchError>;
