//! DAG-based circuit representation.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input node for a wire.
    In(WireId),
    /// Output node for a wire.
    Out(WireId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Check if this is an operation node.
    #[inline]
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// Identifier for a wire in the DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// A quantum wire.
    Qubit(QubitId),
    /// A classical wire.
    Clbit(ClbitId),
}

impl From<QubitId> for WireId {
    fn from(q: QubitId) -> Self {
        WireId::Qubit(q)
    }
}

impl From<ClbitId> for WireId {
    fn from(c: ClbitId) -> Self {
        WireId::Clbit(c)
    }
}

/// An edge in the circuit DAG representing a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this edge represents.
    pub wire: WireId,
}

/// The abstraction level of a circuit in the compilation pipeline.
///
/// Circuits start at the `Logical` level and are lowered to `Physical`
/// by routing, after which qubit ids are device positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CircuitLevel {
    /// Logical level: qubits are abstract, no physical mapping applied.
    #[default]
    Logical,
    /// Physical level: qubits are mapped to physical device positions.
    Physical,
}

/// DAG-based circuit representation.
///
/// The circuit is represented as a directed acyclic graph where:
/// - Nodes are either input nodes, output nodes, or operation nodes
/// - Edges represent wires (quantum or classical)
/// - Each wire runs from its input node to its output node
///
/// Nodes are only ever appended. An operation is always added after every
/// node it depends on, so ascending node index is a topological order and
/// passes that rewrite a circuit build a fresh DAG instead of editing one
/// in place.
#[derive(Debug, Clone)]
pub struct CircuitDag {
    /// The underlying graph.
    graph: DiGraph<DagNode, DagEdge, u32>,
    /// Map from qubit to its input node.
    qubit_inputs: FxHashMap<QubitId, NodeIndex>,
    /// Map from qubit to its output node.
    qubit_outputs: FxHashMap<QubitId, NodeIndex>,
    /// Map from classical bit to its input node.
    clbit_inputs: FxHashMap<ClbitId, NodeIndex>,
    /// Map from classical bit to its output node.
    clbit_outputs: FxHashMap<ClbitId, NodeIndex>,
    /// Wire front: maps each wire to the node just before the output node.
    wire_front: FxHashMap<WireId, NodeIndex>,
    /// Abstraction level of the circuit.
    level: CircuitLevel,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::default(),
            qubit_inputs: FxHashMap::default(),
            qubit_outputs: FxHashMap::default(),
            clbit_inputs: FxHashMap::default(),
            clbit_outputs: FxHashMap::default(),
            wire_front: FxHashMap::default(),
            level: CircuitLevel::Logical,
        }
    }

    /// Create a DAG with qubits `0..num_qubits` and clbits `0..num_clbits`.
    pub fn with_wires(num_qubits: u32, num_clbits: u32) -> Self {
        let mut dag = Self::new();
        for q in 0..num_qubits {
            dag.add_qubit(QubitId(q));
        }
        for c in 0..num_clbits {
            dag.add_clbit(ClbitId(c));
        }
        dag
    }

    /// Create an empty DAG over the same wires and level as `self`.
    pub fn empty_like(&self) -> Self {
        let mut dag = Self::new();
        for q in self.qubits() {
            dag.add_qubit(q);
        }
        for c in self.clbits() {
            dag.add_clbit(c);
        }
        dag.level = self.level;
        dag
    }

    /// Add a qubit to the circuit.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.qubit_inputs.contains_key(&qubit) {
            return;
        }
        let wire = WireId::Qubit(qubit);
        let in_node = self.graph.add_node(DagNode::In(wire));
        let out_node = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(in_node, out_node, DagEdge { wire });
        self.qubit_inputs.insert(qubit, in_node);
        self.qubit_outputs.insert(qubit, out_node);
        self.wire_front.insert(wire, in_node);
    }

    /// Add a classical bit to the circuit.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        if self.clbit_inputs.contains_key(&clbit) {
            return;
        }
        let wire = WireId::Clbit(clbit);
        let in_node = self.graph.add_node(DagNode::In(wire));
        let out_node = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(in_node, out_node, DagEdge { wire });
        self.clbit_inputs.insert(clbit, in_node);
        self.clbit_outputs.insert(clbit, out_node);
        self.wire_front.insert(wire, in_node);
    }

    /// Apply an instruction to the end of the circuit.
    #[allow(clippy::cast_possible_truncation)]
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let gate_name = instruction.as_gate().map(|g| g.name().to_string());

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits() as usize;
            let got = instruction.qubits.len();
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: expected as u32,
                    got: got as u32,
                });
            }
        }

        if instruction.is_measure() && instruction.qubits.len() != instruction.clbits.len() {
            return Err(IrError::MeasureArity {
                qubits: instruction.qubits.len(),
                clbits: instruction.clbits.len(),
            });
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !self.qubit_inputs.contains_key(&qubit) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        for &clbit in &instruction.clbits {
            if !self.clbit_inputs.contains_key(&clbit) {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let wires: Vec<(WireId, NodeIndex)> = instruction
            .qubits
            .iter()
            .map(|&q| (WireId::Qubit(q), self.qubit_outputs[&q]))
            .chain(
                instruction
                    .clbits
                    .iter()
                    .map(|&c| (WireId::Clbit(c), self.clbit_outputs[&c])),
            )
            .collect();

        let op_node = self.graph.add_node(DagNode::Op(instruction));

        for (wire, out_node) in wires {
            let prev_node = self.wire_front[&wire];
            let eid = self
                .graph
                .edges_directed(prev_node, Direction::Outgoing)
                .find(|e| e.weight().wire == wire && e.target() == out_node)
                .map(|e| e.id())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!(
                        "missing edge from wire front to output on {wire:?}"
                    ))
                })?;
            self.graph.remove_edge(eid);
            self.graph.add_edge(prev_node, op_node, DagEdge { wire });
            self.graph.add_edge(op_node, out_node, DagEdge { wire });
            self.wire_front.insert(wire, op_node);
        }

        Ok(op_node)
    }

    /// Iterate over operations in topological order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph[idx].instruction().map(|inst| (idx, inst)))
    }

    /// Consume the DAG and return its operations in topological order.
    pub fn into_ops(self) -> Vec<Instruction> {
        let (nodes, _) = self.graph.into_nodes_edges();
        nodes
            .into_iter()
            .filter_map(|node| match node.weight {
                DagNode::Op(inst) => Some(inst),
                _ => None,
            })
            .collect()
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(DagNode::instruction)
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubit_inputs.len()
    }

    /// Get the number of classical bits.
    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.clbit_inputs.len()
    }

    /// Get the number of operations.
    ///
    /// Computed as total nodes minus input and output nodes (2 per qubit + 2 per clbit).
    #[inline]
    pub fn num_ops(&self) -> usize {
        let io_nodes = 2 * (self.qubit_inputs.len() + self.clbit_inputs.len());
        self.graph.node_count().saturating_sub(io_nodes)
    }

    /// Calculate the circuit depth.
    ///
    /// Barriers order their wires but do not add a layer.
    pub fn depth(&self) -> usize {
        self.depth_where(|inst| !inst.is_barrier())
    }

    /// Longest dependency chain, counting only operations accepted by `counts`.
    ///
    /// Every operation still orders the wires it touches, so an uncounted
    /// gate between two counted ones keeps them in sequence.
    pub fn depth_where(&self, mut counts: impl FnMut(&Instruction) -> bool) -> usize {
        let mut front: FxHashMap<WireId, usize> =
            FxHashMap::with_capacity_and_hasher(self.wire_front.len(), Default::default());
        let mut max_depth = 0usize;

        for (_, inst) in self.topological_ops() {
            let wires = inst
                .qubits
                .iter()
                .map(|&q| WireId::Qubit(q))
                .chain(inst.clbits.iter().map(|&c| WireId::Clbit(c)));
            let start = wires
                .clone()
                .map(|w| front.get(&w).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);
            let depth = start + usize::from(counts(inst));
            for w in wires {
                front.insert(w, depth);
            }
            max_depth = max_depth.max(depth);
        }

        max_depth
    }

    /// Iterate over qubits in ascending id order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + use<> {
        let mut qubits: Vec<_> = self.qubit_inputs.keys().copied().collect();
        qubits.sort_unstable();
        qubits.into_iter()
    }

    /// Iterate over classical bits in ascending id order.
    pub fn clbits(&self) -> impl Iterator<Item = ClbitId> + use<> {
        let mut clbits: Vec<_> = self.clbit_inputs.keys().copied().collect();
        clbits.sort_unstable();
        clbits.into_iter()
    }

    /// Whether the qubit is a wire of this DAG.
    #[inline]
    pub fn has_qubit(&self, qubit: QubitId) -> bool {
        self.qubit_inputs.contains_key(&qubit)
    }

    /// Get the abstraction level of this circuit.
    pub fn level(&self) -> CircuitLevel {
        self.level
    }

    /// Set the abstraction level of this circuit.
    pub fn set_level(&mut self, level: CircuitLevel) {
        self.level = level;
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }

    /// Verify the structural integrity of the DAG.
    ///
    /// Checks that the graph is acyclic and that every wire forms a single
    /// path from its In node to its Out node.
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("graph contains a cycle".into()));
        }

        let wires = self
            .qubit_inputs
            .iter()
            .map(|(&q, &n)| (WireId::Qubit(q), n, self.qubit_outputs.get(&q).copied()))
            .chain(
                self.clbit_inputs
                    .iter()
                    .map(|(&c, &n)| (WireId::Clbit(c), n, self.clbit_outputs.get(&c).copied())),
            );

        for (wire, input, output) in wires {
            let output = output
                .ok_or_else(|| IrError::InvalidDag(format!("wire {wire:?} has no output node")))?;
            let mut current = input;
            let mut steps = 0usize;
            while current != output {
                let mut next = self
                    .graph
                    .edges_directed(current, Direction::Outgoing)
                    .filter(|e| e.weight().wire == wire);
                let edge = next.next().ok_or_else(|| {
                    IrError::InvalidDag(format!("wire {wire:?} is broken at {current:?}"))
                })?;
                if next.next().is_some() {
                    return Err(IrError::InvalidDag(format!(
                        "wire {wire:?} forks at {current:?}"
                    )));
                }
                current = edge.target();
                steps += 1;
                if steps > self.graph.node_count() {
                    return Err(IrError::InvalidDag(format!("wire {wire:?} does not terminate")));
                }
            }
        }

        Ok(())
    }
}

impl Default for CircuitDag {
    fn default() -> Self {
        Self::new()
    }
}
