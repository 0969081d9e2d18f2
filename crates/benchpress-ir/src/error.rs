//! IR errors.

use thiserror::Error;

use crate::qubit::{ClbitId, QubitId};

/// Failure while building or rewriting a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// An operand names a qubit the circuit does not have.
    #[error("Qubit {qubit} is out of range{}", gate_suffix(.gate_name.as_deref()))]
    QubitNotFound {
        qubit: QubitId,
        /// Gate being added, when known.
        gate_name: Option<String>,
    },

    /// An operand names a classical bit the circuit does not have.
    #[error("Classical bit {clbit} is out of range{}", gate_suffix(.gate_name.as_deref()))]
    ClbitNotFound {
        clbit: ClbitId,
        gate_name: Option<String>,
    },

    /// The DAG was edited into an inconsistent state.
    #[error("Invalid DAG: {0}")]
    InvalidDag(String),

    /// Wrong number of operands for a gate.
    #[error("'{gate_name}' acts on {expected} qubits but {got} were given")]
    QubitCountMismatch {
        gate_name: String,
        expected: u32,
        got: u32,
    },

    /// `measure` with unequal qubit and clbit lists.
    #[error("Cannot measure {qubits} qubits into {clbits} classical bits")]
    MeasureArity { qubits: usize, clbits: usize },

    /// The same qubit appears twice in one operation.
    #[error("Qubit {qubit} is used twice{}", gate_suffix(.gate_name.as_deref()))]
    DuplicateQubit {
        qubit: QubitId,
        gate_name: Option<String>,
    },

    /// A gate type name outside the standard set.
    #[error("Unknown gate type '{0}'")]
    UnknownGateType(String),
}

fn gate_suffix(gate_name: Option<&str>) -> String {
    gate_name.map_or_else(String::new, |name| format!(" in '{name}'"))
}

/// Result alias for IR operations.
pub type IrResult<T> = Result<T, IrError>;
