//! QASM fixture families.
//!
//! Each family owns a directory under the QASM root and names its files
//! `<family>_N<n>[_<variant>].qasm`. The files can be regenerated from the
//! deterministic generators in [`crate::circuits`] and [`crate::qv`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use benchpress_ir::Circuit;
use tracing::info;

use crate::circuits;
use crate::error::{BenchError, BenchResult};
use crate::qv::{self, QV_FIXTURE_SEED};

/// QAOA repetitions in the bundled fixtures.
pub const QAOA_REPS: u32 = 3;

/// A family of QASM fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureFamily {
    Qft,
    Qv,
    Qaoa,
    SquareHeisenberg,
}

impl FixtureFamily {
    /// All families.
    pub const ALL: [FixtureFamily; 4] = [
        FixtureFamily::Qft,
        FixtureFamily::Qv,
        FixtureFamily::Qaoa,
        FixtureFamily::SquareHeisenberg,
    ];

    /// Directory name under the QASM root.
    pub fn dir_name(self) -> &'static str {
        match self {
            FixtureFamily::Qft => "qft",
            FixtureFamily::Qv => "qv",
            FixtureFamily::Qaoa => "qaoa",
            FixtureFamily::SquareHeisenberg => "square-heisenberg",
        }
    }

    /// File name of the `n`-qubit fixture.
    pub fn file_name(self, n: u32) -> String {
        match self {
            FixtureFamily::Qft => format!("qft_N{n}.qasm"),
            FixtureFamily::Qv => format!("qv_N{n}_{QV_FIXTURE_SEED}.qasm"),
            FixtureFamily::Qaoa => format!("qaoa_barabasi_albert_N{n}_{QAOA_REPS}reps.qasm"),
            FixtureFamily::SquareHeisenberg => format!("square_heisenberg_N{n}.qasm"),
        }
    }

    /// Build the `n`-qubit circuit of this family.
    pub fn build(self, n: u32) -> BenchResult<Circuit> {
        let circuit = match self {
            FixtureFamily::Qft => circuits::qft(n)?,
            FixtureFamily::Qv => qv::generate_qv_circuit(n, QV_FIXTURE_SEED)?,
            FixtureFamily::Qaoa => circuits::qaoa_barabasi_albert(n, QAOA_REPS)?,
            FixtureFamily::SquareHeisenberg => circuits::square_heisenberg(n)?,
        };
        Ok(circuit)
    }

    /// Write the `n`-qubit fixture under `root` and return its path.
    ///
    /// The family directory is created if needed and an existing file is
    /// overwritten.
    pub fn write(self, root: impl AsRef<Path>, n: u32) -> BenchResult<PathBuf> {
        let dir = root.as_ref().join(self.dir_name());
        fs::create_dir_all(&dir)?;
        let path = dir.join(self.file_name(n));
        let circuit = self.build(n)?;
        fs::write(&path, benchpress_qasm::emit(&circuit))?;
        info!(
            "Wrote {} ({} ops) to {}",
            circuit.name(),
            circuit.num_ops(),
            path.display()
        );
        Ok(path)
    }

    /// Write every family at `n` qubits.
    pub fn write_all(root: impl AsRef<Path>, n: u32) -> BenchResult<Vec<PathBuf>> {
        Self::ALL
            .iter()
            .map(|family| family.write(root.as_ref(), n))
            .collect()
    }
}

impl fmt::Display for FixtureFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for FixtureFamily {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.dir_name() == s)
            .ok_or_else(|| BenchError::Config(format!("unknown fixture family '{s}'")))
    }
}

/// Read and parse a fixture file.
///
/// A missing or unreadable file is a [`BenchError::Fixture`] and malformed
/// contents are a [`BenchError::Parse`].
pub fn load(path: impl AsRef<Path>) -> BenchResult<Circuit> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| BenchError::Fixture {
        path: path.to_path_buf(),
        source,
    })?;
    let mut circuit = benchpress_qasm::parse(&source).map_err(|source| BenchError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(stem) = path.file_stem() {
        circuit.set_name(stem.to_string_lossy());
    }
    Ok(circuit)
}
