//! Error types for compilation.

use thiserror::Error;

use benchpress_ir::IrError;

/// Errors raised while building or running a compilation pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Requested optimization level is outside 0..=3.
    #[error("Invalid optimization level {0}, expected 0 to 3")]
    InvalidOptimizationLevel(u8),

    /// The circuit needs more qubits than the device has.
    #[error("Circuit requires {required} qubits but target has only {available}")]
    CircuitTooLarge { required: u32, available: u32 },

    /// No swap path exists between two physical qubits.
    #[error("Routing failed: no path between physical qubits {qubit1} and {qubit2}")]
    RoutingFailed { qubit1: u32, qubit2: u32 },

    /// An operation touches more qubits than routing can handle.
    #[error("Routing failed: '{gate}' acts on {num_qubits} qubits")]
    UnroutableGate { gate: String, num_qubits: usize },

    /// A gate survived translation without a basis equivalent.
    #[error("Gate '{0}' is not in the target basis")]
    GateNotInBasis(String),

    /// A target-aware pass ran without a coupling map.
    #[error("Missing coupling map in property set")]
    MissingCouplingMap,

    /// A target-aware pass ran without basis gates.
    #[error("Missing basis gates in property set")]
    MissingBasisGates,

    /// Routing ran before a layout pass.
    #[error("Missing layout in property set")]
    MissingLayout,

    /// IR error while rebuilding the circuit.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
