//! High-level circuit builder API.

use std::collections::BTreeMap;

use crate::dag::CircuitDag;
use crate::error::IrResult;
use crate::gate::{GateType, StandardGate};
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId, Register};

/// A quantum circuit.
///
/// This provides a high-level API for building quantum circuits,
/// with convenient methods for common gates and operations. Cloning a
/// circuit copies its DAG, so a clone can be compiled in place without
/// touching the original.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Quantum registers, in declaration order.
    qregs: Vec<Register>,
    /// Classical registers, in declaration order.
    cregs: Vec<Register>,
    /// The underlying DAG representation.
    dag: CircuitDag,
    /// Counter for generating qubit IDs.
    next_qubit_id: u32,
    /// Counter for generating classical bit IDs.
    next_clbit_id: u32,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qregs: vec![],
            cregs: vec![],
            dag: CircuitDag::new(),
            next_qubit_id: 0,
            next_clbit_id: 0,
        }
    }

    /// Create a circuit with registers `q` and `c` of the given sizes.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        if num_qubits > 0 {
            circuit.add_qreg("q", num_qubits);
        }
        if num_clbits > 0 {
            circuit.add_creg("c", num_clbits);
        }
        circuit
    }

    /// Add a quantum register with multiple qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let reg = Register::new(name, self.next_qubit_id, size);
        let ids: Vec<_> = reg.ids().map(QubitId).collect();
        for &id in &ids {
            self.dag.add_qubit(id);
        }
        self.next_qubit_id += size;
        self.qregs.push(reg);
        ids
    }

    /// Add a classical register with multiple bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let reg = Register::new(name, self.next_clbit_id, size);
        let ids: Vec<_> = reg.ids().map(ClbitId).collect();
        for &id in &ids {
            self.dag.add_clbit(id);
        }
        self.next_clbit_id += size;
        self.cregs.push(reg);
        ids
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply any standard gate.
    pub fn gate(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    /// Append a prepared instruction.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction)?;
        Ok(self)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::H, [qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::X, [qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Y, [qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Z, [qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::S, [qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::T, [qubit])
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::SX, [qubit])
    }

    /// Apply Rx rotation.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rx(theta), [qubit])
    }

    /// Apply Ry rotation.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Ry(theta), [qubit])
    }

    /// Apply Rz rotation.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rz(theta), [qubit])
    }

    /// Apply U(θ, φ, λ).
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::U(theta, phi, lambda), [qubit])
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CX, [control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CZ, [control, target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Swap, [q1, q2])
    }

    /// Apply controlled phase.
    pub fn cp(&mut self, lambda: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CP(lambda), [control, target])
    }

    /// Apply ZZ rotation.
    pub fn rzz(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::RZZ(theta), [q1, q2])
    }

    /// Apply Toffoli gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CCX, [c1, c2, target])
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::measure(qubit, clbit))?;
        Ok(self)
    }

    /// Measure all qubits, adding a `meas` register if there are too few bits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let num_qubits = self.num_qubits() as u32;
        if (self.num_clbits() as u32) < num_qubits {
            self.add_creg("meas", num_qubits - self.num_clbits() as u32);
        }
        for i in 0..num_qubits {
            self.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(self)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::reset(qubit))?;
        Ok(self)
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::barrier(qubits))?;
        Ok(self)
    }

    // =========================================================================
    // Accessors and metrics
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the circuit.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.dag.num_qubits()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.dag.num_clbits()
    }

    /// Quantum registers in declaration order.
    pub fn qregs(&self) -> &[Register] {
        &self.qregs
    }

    /// Classical registers in declaration order.
    pub fn cregs(&self) -> &[Register] {
        &self.cregs
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Total number of operations, including measurements and barriers.
    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    /// Number of unitary gate operations.
    pub fn num_gates(&self) -> usize {
        self.instructions().filter(|i| i.is_gate()).count()
    }

    /// A circuit with no operations at all.
    pub fn is_empty(&self) -> bool {
        self.dag.num_ops() == 0
    }

    /// Number of gates whose type is `gate_type`.
    pub fn n_gates_of_type(&self, gate_type: GateType) -> usize {
        self.instructions()
            .filter(|i| i.gate_type() == Some(gate_type))
            .count()
    }

    /// Depth of the circuit counting only gates of `gate_type`.
    ///
    /// Other operations keep their wires ordered but contribute no layer,
    /// so for a routed circuit `depth_by_type(GateType::CZ)` is the number
    /// of sequential two-qubit layers.
    pub fn depth_by_type(&self, gate_type: GateType) -> usize {
        self.dag
            .depth_where(|i| i.gate_type() == Some(gate_type))
    }

    /// Operation counts keyed by instruction name.
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for inst in self.instructions() {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Iterate over instructions in topological order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.dag.topological_ops().map(|(_, inst)| inst)
    }

    /// Get a reference to the underlying DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    /// Consume the circuit and return the DAG.
    pub fn into_dag(self) -> CircuitDag {
        self.dag
    }

    /// Take the DAG out, leaving an empty one behind.
    ///
    /// Pair with [`Circuit::set_dag`] to transform a circuit in place.
    pub fn take_dag(&mut self) -> CircuitDag {
        std::mem::take(&mut self.dag)
    }

    /// Replace the DAG.
    ///
    /// Registers that no longer match the wire count are replaced by a
    /// single flat register, which happens when routing widens a circuit
    /// to the device size.
    #[allow(clippy::cast_possible_truncation)]
    pub fn set_dag(&mut self, dag: CircuitDag) {
        let num_qubits = dag.num_qubits() as u32;
        let num_clbits = dag.num_clbits() as u32;
        if num_qubits != self.next_qubit_id {
            self.qregs = vec![Register::new("q", 0, num_qubits)];
            self.next_qubit_id = num_qubits;
        }
        if num_clbits != self.next_clbit_id {
            self.cregs = if num_clbits > 0 {
                vec![Register::new("c", 0, num_clbits)]
            } else {
                vec![]
            };
            self.next_clbit_id = num_clbits;
        }
        self.dag = dag;
    }

    /// Create a circuit from a DAG.
    pub fn from_dag(dag: CircuitDag) -> Self {
        let mut circuit = Self::new("circuit");
        circuit.set_dag(dag);
        circuit
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        circuit
            .h(QubitId(0))?
            .cx(QubitId(0), QubitId(1))?
            .measure(QubitId(0), ClbitId(0))?
            .measure(QubitId(1), ClbitId(1))?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size("ghz", n, n);
        if n == 0 {
            return Ok(circuit);
        }
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        circuit.measure_all()?;
        Ok(circuit)
    }
}
