//! Circuit Intermediate Representation for benchpress
//!
//! This crate provides the circuit data structures that the compiler and the
//! benchmark harness share.
//!
//! # Overview
//!
//! The circuit IR uses a DAG (Directed Acyclic Graph) representation internally,
//! which enables efficient compilation passes. The high-level [`Circuit`] API
//! provides a builder for constructing circuits and the metrics the benchmarks
//! report.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`] and named [`Register`]s
//! - **Gates**: [`StandardGate`] for built-in gates with concrete angles, and
//!   [`GateType`] for the parameter-free gate kind used by metrics
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **DAG**: [`CircuitDag`] for the internal graph representation
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example: Two-qubit metrics
//!
//! ```rust
//! use benchpress_ir::{Circuit, GateType, QubitId};
//!
//! let mut circuit = Circuit::with_size("chain", 3, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cz(QubitId(0), QubitId(1)).unwrap();
//! circuit.cz(QubitId(1), QubitId(2)).unwrap();
//!
//! assert_eq!(circuit.n_gates_of_type(GateType::CZ), 2);
//! assert_eq!(circuit.depth_by_type(GateType::CZ), 2);
//! assert_eq!(circuit.depth(), 3);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg` | 1 | Phase gates |
//! | `SX`, `SXdg` | 1 | sqrt(X) and its inverse |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `U` | 1 | Universal single-qubit gate U(θ,φ,λ) |
//! | `CX`, `CY`, `CZ`, `CH` | 2 | Controlled Paulis and Hadamard |
//! | `CRx`, `CRy`, `CRz`, `CP` | 2 | Controlled rotations and phase |
//! | `RXX`, `RYY`, `RZZ` | 2 | Two-qubit Pauli rotations |
//! | `Swap` | 2 | SWAP gate |
//! | `CCX`, `CSwap` | 3 | Toffoli and Fredkin gates |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, CircuitLevel, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::{GateType, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId, Register};
