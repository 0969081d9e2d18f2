//! Device transpile scenarios.
//!
//! Each scenario compiles one fixed circuit for the configured backend at
//! the configured optimization level. Loading the circuit and building the
//! pipeline happen once, outside the timed region. Every timed repetition
//! clones the circuit and compiles the clone, so the original is never
//! touched. The record carries the two-qubit gate count and the two-qubit
//! depth of the last compiled circuit.

use benchpress_compile::{CompilationPass, Target};
use benchpress_ir::{Circuit, GateType, IrResult};
use tracing::{debug, info};

use crate::circuits;
use crate::config::Configuration;
use crate::error::{BenchError, BenchResult};
use crate::fixtures::{self, FixtureFamily};
use crate::harness::BenchmarkRecord;
use crate::workout::{self, Suite, Workout};

/// Default circuit width.
pub const DEFAULT_NUM_QUBITS: u32 = 100;

/// Entanglement layers of the circSU2 ansatz.
pub const CIRC_SU2_REPS: u32 = 3;

/// Metric key for the two-qubit gate count.
pub const GATE_COUNT_2Q: &str = "gate_count_2q";

/// Metric key for the two-qubit depth.
pub const DEPTH_2Q: &str = "depth_2q";

/// Where a scenario gets its circuit.
#[derive(Debug, Clone, Copy)]
enum CircuitSource {
    Fixture(FixtureFamily),
    Generator(fn(u32) -> IrResult<Circuit>),
}

struct ScenarioDef {
    name: &'static str,
    source: CircuitSource,
}

fn circ_su2(n: u32) -> IrResult<Circuit> {
    circuits::circ_su2(n, CIRC_SU2_REPS)
}

static SCENARIOS: [ScenarioDef; 7] = [
    ScenarioDef {
        name: "QFT_100_transpile",
        source: CircuitSource::Fixture(FixtureFamily::Qft),
    },
    ScenarioDef {
        name: "QV_100_transpile",
        source: CircuitSource::Fixture(FixtureFamily::Qv),
    },
    ScenarioDef {
        name: "circSU2_100_transpile",
        source: CircuitSource::Generator(circ_su2),
    },
    ScenarioDef {
        name: "BV_100_transpile",
        source: CircuitSource::Generator(circuits::bv_all_ones),
    },
    ScenarioDef {
        name: "square_heisenberg_100_transpile",
        source: CircuitSource::Fixture(FixtureFamily::SquareHeisenberg),
    },
    ScenarioDef {
        name: "QAOA_100_transpile",
        source: CircuitSource::Fixture(FixtureFamily::Qaoa),
    },
    ScenarioDef {
        name: "BVlike_simplification_transpile",
        source: CircuitSource::Generator(circuits::trivial_bvlike_circuit),
    },
];

/// A scenario with its circuit loaded and its pipeline built.
pub struct PreparedScenario {
    name: &'static str,
    circuit: Circuit,
    pass: CompilationPass,
    two_q_gate: GateType,
}

impl PreparedScenario {
    /// Scenario name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The input circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// The backend's native two-qubit gate.
    pub fn two_q_gate(&self) -> GateType {
        self.two_q_gate
    }

    /// The timed unit: clone the input and compile the clone.
    pub fn compile(&self) -> BenchResult<Circuit> {
        let mut compiled = self.circuit.clone();
        self.pass.apply(&mut compiled)?;
        Ok(compiled)
    }
}

/// The device transpile suite for one configuration.
pub struct DeviceTranspile {
    config: Configuration,
    target: Target,
    workout: Workout,
    num_qubits: u32,
}

impl DeviceTranspile {
    /// Create the suite, resolving the configured backend.
    pub fn new(config: Configuration) -> BenchResult<Self> {
        config.validate()?;
        let target = config.backend()?;
        Ok(Self {
            config,
            target,
            workout: workout::device_transpile_100q(),
            num_qubits: DEFAULT_NUM_QUBITS,
        })
    }

    /// Run the same scenarios at `n` qubits. Fixture names use `N<n>`.
    #[must_use]
    pub fn with_num_qubits(mut self, n: u32) -> Self {
        self.num_qubits = n;
        self
    }

    /// Circuit width.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The resolved backend.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// The configuration.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Load the circuit and build the pipeline for `name`. Nothing here is
    /// timed.
    pub fn prepare(&self, name: &str) -> BenchResult<PreparedScenario> {
        let def = SCENARIOS
            .iter()
            .find(|def| def.name == name)
            .ok_or_else(|| BenchError::Workout(format!("unknown scenario '{name}'")))?;

        let circuit = match def.source {
            CircuitSource::Fixture(family) => {
                let path = self
                    .config
                    .qasm_dir(family)
                    .join(family.file_name(self.num_qubits));
                debug!("Loading {}", path.display());
                fixtures::load(&path)?
            }
            CircuitSource::Generator(generate) => generate(self.num_qubits)?,
        };
        let pass = self
            .target
            .default_compilation_pass(self.config.optimization_level())?;

        Ok(PreparedScenario {
            name: def.name,
            circuit,
            pass,
            two_q_gate: self.target.two_q_gate_type(),
        })
    }

    /// Time a prepared scenario and build its record.
    pub fn measure(&self, prepared: &PreparedScenario) -> BenchResult<BenchmarkRecord> {
        info!(
            "{}: {} qubits, {} ops on {} at level {}",
            prepared.name,
            prepared.circuit.num_qubits(),
            prepared.circuit.num_ops(),
            self.target.name(),
            self.config.optimization_level()
        );
        let measured = self.config.bencher().run(|| prepared.compile())?;

        let result = measured.value;
        let gate_count = result.n_gates_of_type(prepared.two_q_gate);
        let depth = result.depth_by_type(prepared.two_q_gate);
        info!(
            "{}: mean {:.4}s, {} = {}, {} = {}",
            prepared.name, measured.stats.mean, GATE_COUNT_2Q, gate_count, DEPTH_2Q, depth
        );

        if result.is_empty() {
            return Err(BenchError::EmptyResult {
                scenario: prepared.name.to_string(),
            });
        }
        Ok(
            BenchmarkRecord::new(prepared.name, self.workout.name, measured.stats)
                .with_metric(GATE_COUNT_2Q, gate_count)
                .with_metric(DEPTH_2Q, depth),
        )
    }

    /// 100-qubit QFT from the `qft` fixtures.
    pub fn qft_100_transpile(&self) -> BenchResult<BenchmarkRecord> {
        self.run_scenario("QFT_100_transpile")
    }

    /// 100-qubit quantum volume from the `qv` fixtures.
    pub fn qv_100_transpile(&self) -> BenchResult<BenchmarkRecord> {
        self.run_scenario("QV_100_transpile")
    }

    /// 100-qubit circSU2 ansatz with three repetitions.
    pub fn circ_su2_100_transpile(&self) -> BenchResult<BenchmarkRecord> {
        self.run_scenario("circSU2_100_transpile")
    }

    /// 100-qubit Bernstein-Vazirani with the all-ones secret.
    pub fn bv_100_transpile(&self) -> BenchResult<BenchmarkRecord> {
        self.run_scenario("BV_100_transpile")
    }

    /// 100-qubit square-lattice Heisenberg step from the fixtures.
    pub fn square_heisenberg_100_transpile(&self) -> BenchResult<BenchmarkRecord> {
        self.run_scenario("square_heisenberg_100_transpile")
    }

    /// 100-qubit QAOA on a Barabási–Albert graph from the fixtures.
    pub fn qaoa_100_transpile(&self) -> BenchResult<BenchmarkRecord> {
        self.run_scenario("QAOA_100_transpile")
    }

    /// The BV-like circuit that should compile to one X and one Z.
    pub fn bvlike_simplification_transpile(&self) -> BenchResult<BenchmarkRecord> {
        self.run_scenario("BVlike_simplification_transpile")
    }
}

impl Suite for DeviceTranspile {
    fn workout(&self) -> &Workout {
        &self.workout
    }

    fn registered(&self) -> Vec<&'static str> {
        SCENARIOS.iter().map(|def| def.name).collect()
    }

    fn run_scenario(&self, name: &str) -> BenchResult<BenchmarkRecord> {
        let prepared = self.prepare(name)?;
        self.measure(&prepared)
    }
}
