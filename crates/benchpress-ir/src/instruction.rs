//! Operations placed on circuit wires.

use serde::{Deserialize, Serialize};

use crate::gate::{GateType, StandardGate};
use crate::qubit::{ClbitId, QubitId};

/// What an instruction does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A unitary from the standard set.
    Gate(StandardGate),
    /// Z-basis measurement, one clbit per qubit.
    Measure,
    /// Non-unitary return to |0⟩.
    Reset,
    /// Scheduling fence. Passes never move gates across it.
    Barrier,
}

/// An operation together with the wires it touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub kind: InstructionKind,
    /// Quantum operands, in gate argument order.
    pub qubits: Vec<QubitId>,
    /// Classical targets. Only measurements have any.
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Apply `gate` to `qubits`.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            qubits: qubits.into_iter().collect(),
            clbits: Vec::new(),
        }
    }

    /// Apply a one-qubit gate.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Apply a two-qubit gate; `q1` is the control for controlled gates.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Measure `qubit` into `clbit`.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Reset `qubit`.
    pub fn reset(qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: vec![qubit],
            clbits: Vec::new(),
        }
    }

    /// Fence the given qubits.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: Vec::new(),
        }
    }

    /// Whether this is a unitary gate.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// The gate, for gate instructions.
    pub fn as_gate(&self) -> Option<&StandardGate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// The gate's type, for gate instructions.
    pub fn gate_type(&self) -> Option<GateType> {
        self.as_gate().map(StandardGate::gate_type)
    }

    /// Whether this is a unitary gate touching exactly `n` qubits.
    pub fn is_n_qubit_gate(&self, n: usize) -> bool {
        self.is_gate() && self.qubits.len() == n
    }

    /// Lowercase QASM-style name.
    pub fn name(&self) -> &'static str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::two_qubit_gate(StandardGate::CZ, QubitId(0), QubitId(1));
        assert!(inst.is_gate());
        assert!(inst.is_n_qubit_gate(2));
        assert_eq!(inst.gate_type(), Some(GateType::CZ));
        assert_eq!(inst.name(), "cz");
    }

    #[test]
    fn test_measure_instruction() {
        let inst = Instruction::measure(QubitId(0), ClbitId(0));
        assert!(inst.is_measure());
        assert_eq!(inst.gate_type(), None);
        assert_eq!(inst.clbits, vec![ClbitId(0)]);
    }

    #[test]
    fn test_barrier_instruction() {
        let inst = Instruction::barrier([QubitId(0), QubitId(1), QubitId(2)]);
        assert!(inst.is_barrier());
        assert!(!inst.is_n_qubit_gate(3));
        assert_eq!(inst.qubits.len(), 3);
    }
}
