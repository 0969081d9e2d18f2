//! Benchmark configuration.
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables (`BENCHPRESS_*`)
//! 2. Configuration file (YAML)
//! 3. Default values
//!
//! ```yaml
//! backend: heavy_hex_cz
//! qasm_root: ./qasm
//! options:
//!   optimization_level: 2
//! benchmark:
//!   rounds: 5
//!   warmup_rounds: 1
//! ```

use std::path::{Path, PathBuf};

use benchpress_compile::{MAX_OPTIMIZATION_LEVEL, Target};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BenchError, BenchResult};
use crate::fixtures::FixtureFamily;
use crate::harness::Bencher;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "BENCHPRESS_CONFIG";

/// Complete benchmark configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Target preset name, see [`Target::from_name`].
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Directory holding one subdirectory per fixture family.
    #[serde(default = "default_qasm_root")]
    pub qasm_root: PathBuf,
    /// Compiler options.
    #[serde(default)]
    pub options: CompileOptions,
    /// Timing options.
    #[serde(default)]
    pub benchmark: BenchmarkOptions,
}

/// Options handed to the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Optimization level, 0 to 3.
    #[serde(default = "default_optimization_level")]
    pub optimization_level: u8,
}

/// Repetition counts for the timing harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkOptions {
    /// Measured rounds per scenario.
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    /// Unrecorded rounds before measuring.
    #[serde(default = "default_warmup_rounds")]
    pub warmup_rounds: usize,
}

fn default_backend() -> String {
    "heavy_hex_cz".to_string()
}

fn default_qasm_root() -> PathBuf {
    PathBuf::from("qasm")
}

fn default_optimization_level() -> u8 {
    2
}

fn default_rounds() -> usize {
    5
}

fn default_warmup_rounds() -> usize {
    1
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            qasm_root: default_qasm_root(),
            options: CompileOptions::default(),
            benchmark: BenchmarkOptions::default(),
        }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            optimization_level: default_optimization_level(),
        }
    }
}

impl Default for BenchmarkOptions {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            warmup_rounds: default_warmup_rounds(),
        }
    }
}

impl Configuration {
    /// Parse a YAML document.
    pub fn from_yaml(source: &str) -> BenchResult<Self> {
        Ok(serde_yaml_ng::from_str(source)?)
    }

    /// Read a YAML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> BenchResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| BenchError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&source)
    }

    /// Load the configuration.
    ///
    /// The file is `path` if given, otherwise `$BENCHPRESS_CONFIG`, otherwise
    /// `<config dir>/benchpress/config.yaml` when it exists. Without a file
    /// the defaults are used. Environment overrides are merged afterwards and
    /// the result is validated.
    pub fn load(path: Option<&Path>) -> BenchResult<Self> {
        let file = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| {
                dirs::config_dir()
                    .map(|dir| dir.join("benchpress").join("config.yaml"))
                    .filter(|candidate| candidate.is_file())
            });

        let config = match file {
            Some(file) => {
                debug!("Loading configuration from {}", file.display());
                Self::from_file(&file)?
            }
            None => Self::default(),
        };
        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `BENCHPRESS_*` environment overrides.
    pub fn merge_env(self) -> BenchResult<Self> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    ///
    /// Only keys that resolve change the configuration.
    pub fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> BenchResult<Self> {
        if let Some(v) = lookup("BENCHPRESS_BACKEND") {
            self.backend = v;
        }
        if let Some(v) = lookup("BENCHPRESS_QASM_ROOT") {
            self.qasm_root = PathBuf::from(v);
        }
        if let Some(v) = lookup("BENCHPRESS_OPT_LEVEL") {
            self.options.optimization_level = parse_var("BENCHPRESS_OPT_LEVEL", &v)?;
        }
        if let Some(v) = lookup("BENCHPRESS_ROUNDS") {
            self.benchmark.rounds = parse_var("BENCHPRESS_ROUNDS", &v)?;
        }
        if let Some(v) = lookup("BENCHPRESS_WARMUP") {
            self.benchmark.warmup_rounds = parse_var("BENCHPRESS_WARMUP", &v)?;
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> BenchResult<()> {
        if self.benchmark.rounds == 0 {
            return Err(BenchError::Config(
                "rounds must be greater than 0".to_string(),
            ));
        }
        if self.options.optimization_level > MAX_OPTIMIZATION_LEVEL {
            return Err(BenchError::Config(format!(
                "optimization_level must be at most {MAX_OPTIMIZATION_LEVEL}, got {}",
                self.options.optimization_level
            )));
        }
        Ok(())
    }

    /// Resolve the backend selector.
    pub fn backend(&self) -> BenchResult<Target> {
        Target::from_name(&self.backend)
            .ok_or_else(|| BenchError::UnknownBackend(self.backend.clone()))
    }

    /// The configured optimization level.
    pub fn optimization_level(&self) -> u8 {
        self.options.optimization_level
    }

    /// Directory of a fixture family.
    pub fn qasm_dir(&self, family: FixtureFamily) -> PathBuf {
        self.qasm_root.join(family.dir_name())
    }

    /// Timing harness with the configured round counts.
    pub fn bencher(&self) -> Bencher {
        Bencher::new(self.benchmark.rounds, self.benchmark.warmup_rounds)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> BenchResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| BenchError::Config(format!("{key}: invalid value '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert_eq!(config.backend, "heavy_hex_cz");
        assert_eq!(config.optimization_level(), 2);
        assert_eq!(config.benchmark.rounds, 5);
        assert_eq!(config.benchmark.warmup_rounds, 1);
        assert!(config.validate().is_ok());
        assert_eq!(config.backend().unwrap().name(), "heavy_hex_cz");
    }

    #[test]
    fn test_from_yaml() {
        let config = Configuration::from_yaml(
            "backend: linear_cx\nqasm_root: /data/qasm\noptions:\n  optimization_level: 3\nbenchmark:\n  rounds: 2\n  warmup_rounds: 0\n",
        )
        .unwrap();
        assert_eq!(config.backend, "linear_cx");
        assert_eq!(config.optimization_level(), 3);
        assert_eq!(config.benchmark.rounds, 2);
        assert_eq!(config.benchmark.warmup_rounds, 0);
        assert_eq!(
            config.qasm_dir(FixtureFamily::SquareHeisenberg),
            PathBuf::from("/data/qasm/square-heisenberg")
        );
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Configuration::from_yaml("options:\n  optimization_level: 0\n").unwrap();
        assert_eq!(config.optimization_level(), 0);
        assert_eq!(config.backend, "heavy_hex_cz");
        assert_eq!(config.benchmark, BenchmarkOptions::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let result = Configuration::from_yaml("options: [1, 2");
        assert!(matches!(result, Err(BenchError::Yaml(_))));
    }

    #[test]
    fn test_env_overrides() {
        let config = Configuration::default()
            .merge_vars(vars(&[
                ("BENCHPRESS_BACKEND", "full_cx"),
                ("BENCHPRESS_OPT_LEVEL", "1"),
                ("BENCHPRESS_QASM_ROOT", "/tmp/q"),
                ("BENCHPRESS_ROUNDS", "9"),
                ("BENCHPRESS_WARMUP", "3"),
            ]))
            .unwrap();
        assert_eq!(config.backend, "full_cx");
        assert_eq!(config.optimization_level(), 1);
        assert_eq!(config.qasm_root, PathBuf::from("/tmp/q"));
        assert_eq!(config.bencher(), Bencher::new(9, 3));
    }

    #[test]
    fn test_env_unset_keeps_values() {
        let base = Configuration::from_yaml("backend: linear_cx\n").unwrap();
        let merged = base.clone().merge_vars(vars(&[])).unwrap();
        assert_eq!(merged, base);
    }

    #[test]
    fn test_env_invalid_number() {
        let result = Configuration::default().merge_vars(vars(&[("BENCHPRESS_ROUNDS", "many")]));
        assert!(matches!(result, Err(BenchError::Config(_))));
    }

    #[test]
    fn test_validation() {
        let mut config = Configuration::default();
        config.benchmark.rounds = 0;
        assert!(matches!(config.validate(), Err(BenchError::Config(_))));

        let mut config = Configuration::default();
        config.options.optimization_level = 4;
        assert!(matches!(config.validate(), Err(BenchError::Config(_))));
    }

    #[test]
    fn test_unknown_backend() {
        let config = Configuration {
            backend: "nowhere".into(),
            ..Configuration::default()
        };
        assert!(matches!(config.backend(), Err(BenchError::UnknownBackend(name)) if name == "nowhere"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "backend: square_grid_cz\nbenchmark:\n  rounds: 1\n").unwrap();
        let config = Configuration::load(Some(&path)).unwrap();
        assert_eq!(config.backend().unwrap().name(), "square_grid_cz");
        assert_eq!(config.benchmark.rounds, 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.yaml");
        let result = Configuration::load(Some(&absent));
        assert!(matches!(
            &result,
            Err(BenchError::ConfigFile { path, source })
                if *path == absent && source.kind() == std::io::ErrorKind::NotFound
        ));

        let err = result.unwrap_err();
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("absent.yaml"));
    }
}
