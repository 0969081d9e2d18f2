//! Cancellation of self-inverse two-qubit gates through commuting neighbors.

use benchpress_ir::{CircuitDag, Instruction, InstructionKind, QubitId, StandardGate};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// How a gate acts on one of its qubits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WireAction {
    /// Diagonal in the computational basis.
    Z,
    /// Diagonal in the X basis.
    X,
    /// Anything else.
    General,
}

fn wire_action(instruction: &Instruction, position: usize) -> WireAction {
    let InstructionKind::Gate(gate) = &instruction.kind else {
        return WireAction::General;
    };
    match gate {
        StandardGate::CX => {
            if position == 0 {
                WireAction::Z
            } else {
                WireAction::X
            }
        }
        StandardGate::I
        | StandardGate::Z
        | StandardGate::S
        | StandardGate::Sdg
        | StandardGate::T
        | StandardGate::Tdg
        | StandardGate::Rz(_)
        | StandardGate::P(_)
        | StandardGate::CZ
        | StandardGate::CP(_)
        | StandardGate::CRz(_)
        | StandardGate::RZZ(_) => WireAction::Z,
        StandardGate::X
        | StandardGate::SX
        | StandardGate::SXdg
        | StandardGate::Rx(_)
        | StandardGate::RXX(_) => WireAction::X,
        _ => WireAction::General,
    }
}

/// Whether two operations commute on every wire they share.
fn commutes(a: &Instruction, b: &Instruction) -> bool {
    a.qubits.iter().enumerate().all(|(i, qa)| {
        b.qubits.iter().position(|qb| qb == qa).is_none_or(|j| {
            let (x, y) = (wire_action(a, i), wire_action(b, j));
            x == y && x != WireAction::General
        })
    })
}

fn cancels(gate: &StandardGate) -> bool {
    matches!(gate, StandardGate::CX | StandardGate::CZ | StandardGate::Swap)
}

/// Whether `b` is the same gate as `a` on the same operands.
fn is_inverse_pair(a: &Instruction, b: &Instruction) -> bool {
    match (a.as_gate(), b.as_gate()) {
        (Some(StandardGate::CX), Some(StandardGate::CX)) => a.qubits == b.qubits,
        (Some(ga @ (StandardGate::CZ | StandardGate::Swap)), Some(gb)) if ga == gb => {
            a.qubits == b.qubits || (a.qubits[0] == b.qubits[1] && a.qubits[1] == b.qubits[0])
        }
        _ => false,
    }
}

/// Commutation-aware gate cancellation.
///
/// A `cx`, `cz` or `swap` is removed together with a later identical gate
/// when every operation in between on their wires commutes with it. A gate
/// acting as Z on a wire commutes with any other Z-type action there, and
/// the same holds for X-type actions. `cx` acts as Z on its control and as
/// X on its target.
pub struct CommutativeCancellation;

impl CommutativeCancellation {
    /// Create a new commutative cancellation pass.
    pub fn new() -> Self {
        Self
    }
}

impl Default for CommutativeCancellation {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for CommutativeCancellation {
    fn name(&self) -> &'static str {
        "CommutativeCancellation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        let source = std::mem::take(dag);
        let mut out = source.empty_like();
        let ops = source.into_ops();

        // Per-wire operation lists, and each operation's slot in them.
        let mut wires: FxHashMap<QubitId, Vec<usize>> = FxHashMap::default();
        let mut slots: Vec<Vec<usize>> = Vec::with_capacity(ops.len());
        for (idx, op) in ops.iter().enumerate() {
            let mut op_slots = Vec::with_capacity(op.qubits.len());
            for qubit in &op.qubits {
                let wire = wires.entry(*qubit).or_default();
                op_slots.push(wire.len());
                wire.push(idx);
            }
            slots.push(op_slots);
        }

        let mut removed = vec![false; ops.len()];
        let mut cancelled = 0usize;

        for idx in 0..ops.len() {
            if removed[idx] || !ops[idx].as_gate().is_some_and(cancels) {
                continue;
            }
            let op = &ops[idx];

            let mut partner: Option<usize> = None;
            let mut matched = true;
            for (k, qubit) in op.qubits.iter().enumerate() {
                let Some(wire) = wires.get(qubit) else {
                    matched = false;
                    break;
                };
                let found = wire[slots[idx][k] + 1..]
                    .iter()
                    .copied()
                    .filter(|&j| !removed[j])
                    .find(|&j| is_inverse_pair(op, &ops[j]) || !commutes(op, &ops[j]))
                    .filter(|&j| is_inverse_pair(op, &ops[j]));
                match (found, partner) {
                    (Some(j), None) => partner = Some(j),
                    (Some(j), Some(p)) if j == p => {}
                    _ => {
                        matched = false;
                        break;
                    }
                }
            }

            if let (true, Some(j)) = (matched, partner) {
                removed[idx] = true;
                removed[j] = true;
                cancelled += 2;
            }
        }

        for (op, gone) in ops.into_iter().zip(removed) {
            if !gone {
                out.apply(op)?;
            }
        }

        debug!("CommutativeCancellation removed {} gates", cancelled);
        *dag = out;
        Ok(())
    }
}
