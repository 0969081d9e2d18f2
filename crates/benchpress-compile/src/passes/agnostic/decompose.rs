//! Decomposition of multi-qubit gates into `cx` and single-qubit gates.

use std::f64::consts::FRAC_PI_2;

use benchpress_ir::{CircuitDag, Instruction, InstructionKind, QubitId, StandardGate};
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Rewrite one multi-qubit gate as a sequence over `cx` and single-qubit
/// gates, in circuit order.
///
/// The sequence can still contain `ccx` (for `cswap`) or `cz`-family gates
/// one level down; callers expand recursively. Returns `None` for `cx`,
/// single-qubit gates and malformed operand lists.
#[allow(clippy::many_single_char_names)]
pub fn decompose_gate(gate: &StandardGate, qubits: &[QubitId]) -> Option<Vec<Instruction>> {
    use StandardGate as G;

    let one = |g: StandardGate, q: QubitId| Instruction::single_qubit_gate(g, q);
    let cx = |c: QubitId, t: QubitId| Instruction::two_qubit_gate(G::CX, c, t);

    if qubits.len() != gate.num_qubits() as usize {
        return None;
    }

    let seq = match (*gate, qubits) {
        (G::CY, &[c, t]) => vec![one(G::Sdg, t), cx(c, t), one(G::S, t)],
        (G::CZ, &[c, t]) => vec![one(G::H, t), cx(c, t), one(G::H, t)],
        (G::CH, &[c, t]) => vec![
            one(G::S, t),
            one(G::H, t),
            one(G::T, t),
            cx(c, t),
            one(G::Tdg, t),
            one(G::H, t),
            one(G::Sdg, t),
        ],
        (G::Swap, &[a, b]) => vec![cx(a, b), cx(b, a), cx(a, b)],
        (G::CRz(theta), &[c, t]) => vec![
            one(G::Rz(theta / 2.0), t),
            cx(c, t),
            one(G::Rz(-theta / 2.0), t),
            cx(c, t),
        ],
        (G::CRy(theta), &[c, t]) => vec![
            one(G::Ry(theta / 2.0), t),
            cx(c, t),
            one(G::Ry(-theta / 2.0), t),
            cx(c, t),
        ],
        (G::CRx(theta), &[c, t]) => vec![
            one(G::H, t),
            Instruction::two_qubit_gate(G::CRz(theta), c, t),
            one(G::H, t),
        ],
        (G::CP(lambda), &[c, t]) => vec![
            one(G::P(lambda / 2.0), c),
            cx(c, t),
            one(G::P(-lambda / 2.0), t),
            cx(c, t),
            one(G::P(lambda / 2.0), t),
        ],
        (G::RZZ(theta), &[a, b]) => vec![cx(a, b), one(G::Rz(theta), b), cx(a, b)],
        (G::RXX(theta), &[a, b]) => vec![
            one(G::H, a),
            one(G::H, b),
            Instruction::two_qubit_gate(G::RZZ(theta), a, b),
            one(G::H, a),
            one(G::H, b),
        ],
        (G::RYY(theta), &[a, b]) => vec![
            one(G::Rx(FRAC_PI_2), a),
            one(G::Rx(FRAC_PI_2), b),
            Instruction::two_qubit_gate(G::RZZ(theta), a, b),
            one(G::Rx(-FRAC_PI_2), a),
            one(G::Rx(-FRAC_PI_2), b),
        ],
        (G::CCX, &[a, b, c]) => vec![
            one(G::H, c),
            cx(b, c),
            one(G::Tdg, c),
            cx(a, c),
            one(G::T, c),
            cx(b, c),
            one(G::Tdg, c),
            cx(a, c),
            one(G::T, b),
            one(G::T, c),
            one(G::H, c),
            cx(a, b),
            one(G::T, a),
            one(G::Tdg, b),
            cx(a, b),
        ],
        (G::CSwap, &[a, b, c]) => vec![
            cx(c, b),
            Instruction::gate(G::CCX, [a, b, c]),
            cx(c, b),
        ],
        _ => return None,
    };
    Some(seq)
}

/// Recursively expand an instruction until only `cx` and single-qubit
/// gates remain, appending the result to `out`.
pub(crate) fn expand_into(instruction: Instruction, out: &mut Vec<Instruction>) {
    let expansion = match &instruction.kind {
        InstructionKind::Gate(gate) if instruction.qubits.len() > 1 => {
            decompose_gate(gate, &instruction.qubits)
        }
        _ => None,
    };
    match expansion {
        Some(seq) => {
            for inst in seq {
                expand_into(inst, out);
            }
        }
        None => out.push(instruction),
    }
}

fn needs_decomposition(instruction: &Instruction) -> bool {
    instruction.is_gate()
        && instruction.qubits.len() > 1
        && !matches!(instruction.as_gate(), Some(StandardGate::CX))
}

/// Rewrites every multi-qubit gate other than `cx` into `cx` plus
/// single-qubit gates.
pub struct DecomposeMultiQubit;

impl DecomposeMultiQubit {
    /// Create a new decomposition pass.
    pub fn new() -> Self {
        Self
    }
}

impl Default for DecomposeMultiQubit {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for DecomposeMultiQubit {
    fn name(&self) -> &'static str {
        "DecomposeMultiQubit"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        let source = std::mem::take(dag);
        let mut out = source.empty_like();
        let mut expanded = Vec::new();
        let mut rewritten = 0usize;

        for instruction in source.into_ops() {
            if needs_decomposition(&instruction) {
                rewritten += 1;
            }
            expand_into(instruction, &mut expanded);
        }
        for instruction in expanded {
            out.apply(instruction)?;
        }

        debug!("DecomposeMultiQubit rewrote {} gates", rewritten);
        *dag = out;
        Ok(())
    }

    fn should_run(&self, dag: &CircuitDag, _properties: &PropertySet) -> bool {
        dag.topological_ops()
            .any(|(_, inst)| needs_decomposition(inst))
    }
}
