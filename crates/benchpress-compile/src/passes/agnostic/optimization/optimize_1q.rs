//! Single-qubit gate optimization.

use benchpress_ir::{CircuitDag, Instruction, InstructionKind, QubitId, StandardGate};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::{BasisGates, PropertySet};
use crate::unitary::Unitary2x2;

/// Target form for resynthesized single-qubit runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneQubitBasis {
    /// `rz`, `sx` and `x`, the native set of superconducting devices.
    Zsx,
    /// A single `u(θ, φ, λ)`.
    U,
}

impl OneQubitBasis {
    /// Pick the synthesis form a basis set can express.
    pub fn for_basis(basis: &BasisGates) -> Self {
        if basis.supports_zsx() {
            OneQubitBasis::Zsx
        } else {
            OneQubitBasis::U
        }
    }

    fn synthesize(self, unitary: &Unitary2x2) -> Vec<StandardGate> {
        match self {
            OneQubitBasis::Zsx => unitary.to_zsx(),
            OneQubitBasis::U => unitary.to_u(),
        }
    }
}

/// Merges runs of consecutive single-qubit gates.
///
/// Each maximal run on a qubit is multiplied into one 2x2 unitary. Runs
/// equal to the identity up to global phase are dropped. Other runs are
/// resynthesized and the result is kept when it is shorter, or when the
/// run contained a gate outside the basis.
///
/// The synthesis form comes from the basis gates in the property set, or
/// from [`Optimize1qGates::with_basis`]. Without either, runs are merged
/// into `u` gates.
pub struct Optimize1qGates {
    basis: Option<OneQubitBasis>,
}

impl Optimize1qGates {
    /// Create a pass that follows the basis gates of the property set.
    pub fn new() -> Self {
        Self { basis: None }
    }

    /// Create a pass with a fixed synthesis form.
    pub fn with_basis(basis: OneQubitBasis) -> Self {
        Self { basis: Some(basis) }
    }
}

impl Default for Optimize1qGates {
    fn default() -> Self {
        Self::new()
    }
}

/// A pending run of single-qubit gates on one wire.
struct Run {
    unitary: Unitary2x2,
    gates: Vec<StandardGate>,
}

impl Run {
    fn new() -> Self {
        Self {
            unitary: Unitary2x2::identity(),
            gates: Vec::new(),
        }
    }
}

struct Resynthesizer<'a> {
    form: OneQubitBasis,
    basis: Option<&'a BasisGates>,
    runs: FxHashMap<QubitId, Run>,
    merged: usize,
}

impl Resynthesizer<'_> {
    fn in_basis(&self, gate: &StandardGate) -> bool {
        self.basis.is_none_or(|b| b.contains(gate.gate_type()))
    }

    fn push(&mut self, qubit: QubitId, gate: StandardGate, unitary: Unitary2x2) {
        let run = self.runs.entry(qubit).or_insert_with(Run::new);
        run.unitary = unitary * run.unitary;
        run.gates.push(gate);
    }

    fn flush(&mut self, qubit: QubitId, out: &mut CircuitDag) -> CompileResult<()> {
        let Some(run) = self.runs.remove(&qubit) else {
            return Ok(());
        };

        let all_in_basis = run.gates.iter().all(|g| self.in_basis(g));
        let replacement = if run.unitary.is_identity() {
            Vec::new()
        } else if run.gates.len() == 1 && all_in_basis {
            run.gates.clone()
        } else {
            let synthesized = self.form.synthesize(&run.unitary);
            if synthesized.len() < run.gates.len() || !all_in_basis {
                synthesized
            } else {
                run.gates.clone()
            }
        };

        if replacement.len() < run.gates.len() {
            self.merged += run.gates.len() - replacement.len();
        }
        for gate in replacement {
            out.apply(Instruction::single_qubit_gate(gate, qubit))?;
        }
        Ok(())
    }
}

impl Pass for Optimize1qGates {
    fn name(&self) -> &'static str {
        "Optimize1qGates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let basis = properties.basis_gates.as_ref();
        let form = self
            .basis
            .or_else(|| basis.map(OneQubitBasis::for_basis))
            .unwrap_or(OneQubitBasis::U);

        let source = std::mem::take(dag);
        let mut out = source.empty_like();
        let mut state = Resynthesizer {
            form,
            basis,
            runs: FxHashMap::default(),
            merged: 0,
        };

        for instruction in source.into_ops() {
            if let InstructionKind::Gate(gate) = &instruction.kind {
                if instruction.qubits.len() == 1 {
                    if let Some(unitary) = Unitary2x2::from_gate(gate) {
                        state.push(instruction.qubits[0], *gate, unitary);
                        continue;
                    }
                }
            }
            for &qubit in &instruction.qubits {
                state.flush(qubit, &mut out)?;
            }
            out.apply(instruction)?;
        }

        let mut pending: Vec<QubitId> = state.runs.keys().copied().collect();
        pending.sort_unstable();
        for qubit in pending {
            state.flush(qubit, &mut out)?;
        }

        debug!("Optimize1qGates removed {} gates", state.merged);
        *dag = out;
        Ok(())
    }
}
