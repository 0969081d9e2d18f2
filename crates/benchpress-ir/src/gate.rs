//! Quantum gate types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IrError;

/// Standard gates with known semantics.
///
/// Rotation angles are concrete radians. Circuits read from QASM are fully
/// evaluated at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// Controlled rotation around X.
    CRx(f64),
    /// Controlled rotation around Y.
    CRy(f64),
    /// Controlled rotation around Z.
    CRz(f64),
    /// Controlled phase gate.
    CP(f64),
    /// XX rotation gate.
    RXX(f64),
    /// YY rotation gate.
    RYY(f64),
    /// ZZ rotation gate.
    RZZ(f64),

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,
}

impl StandardGate {
    /// The parameter-free type of this gate.
    pub fn gate_type(&self) -> GateType {
        match self {
            StandardGate::I => GateType::I,
            StandardGate::X => GateType::X,
            StandardGate::Y => GateType::Y,
            StandardGate::Z => GateType::Z,
            StandardGate::H => GateType::H,
            StandardGate::S => GateType::S,
            StandardGate::Sdg => GateType::Sdg,
            StandardGate::T => GateType::T,
            StandardGate::Tdg => GateType::Tdg,
            StandardGate::SX => GateType::SX,
            StandardGate::SXdg => GateType::SXdg,
            StandardGate::Rx(_) => GateType::Rx,
            StandardGate::Ry(_) => GateType::Ry,
            StandardGate::Rz(_) => GateType::Rz,
            StandardGate::P(_) => GateType::P,
            StandardGate::U(..) => GateType::U,
            StandardGate::CX => GateType::CX,
            StandardGate::CY => GateType::CY,
            StandardGate::CZ => GateType::CZ,
            StandardGate::CH => GateType::CH,
            StandardGate::Swap => GateType::Swap,
            StandardGate::CRx(_) => GateType::CRx,
            StandardGate::CRy(_) => GateType::CRy,
            StandardGate::CRz(_) => GateType::CRz,
            StandardGate::CP(_) => GateType::CP,
            StandardGate::RXX(_) => GateType::RXX,
            StandardGate::RYY(_) => GateType::RYY,
            StandardGate::RZZ(_) => GateType::RZZ,
            StandardGate::CCX => GateType::CCX,
            StandardGate::CSwap => GateType::CSwap,
        }
    }

    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.gate_type().name()
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.gate_type().num_qubits()
    }

    /// Get the rotation angles of this gate, in declaration order.
    pub fn parameters(&self) -> Vec<f64> {
        match *self {
            StandardGate::Rx(a)
            | StandardGate::Ry(a)
            | StandardGate::Rz(a)
            | StandardGate::P(a)
            | StandardGate::CRx(a)
            | StandardGate::CRy(a)
            | StandardGate::CRz(a)
            | StandardGate::CP(a)
            | StandardGate::RXX(a)
            | StandardGate::RYY(a)
            | StandardGate::RZZ(a) => vec![a],
            StandardGate::U(theta, phi, lambda) => vec![theta, phi, lambda],
            _ => vec![],
        }
    }

    /// Whether applying this gate twice in a row is the identity.
    pub fn is_self_inverse(&self) -> bool {
        matches!(
            self,
            StandardGate::I
                | StandardGate::X
                | StandardGate::Y
                | StandardGate::Z
                | StandardGate::H
                | StandardGate::CX
                | StandardGate::CY
                | StandardGate::CZ
                | StandardGate::CH
                | StandardGate::Swap
                | StandardGate::CCX
                | StandardGate::CSwap
        )
    }

    /// Whether the gate is unchanged by exchanging its two qubits.
    pub fn is_symmetric(&self) -> bool {
        matches!(
            self,
            StandardGate::CZ
                | StandardGate::Swap
                | StandardGate::CP(_)
                | StandardGate::RXX(_)
                | StandardGate::RYY(_)
                | StandardGate::RZZ(_)
        )
    }
}

/// The kind of a gate without its parameters.
///
/// This is what gate-count and depth metrics are keyed on; `cz` and
/// `rz(0.3)` and `rz(1.2)` are counted by type, not by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GateType {
    I,
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    SX,
    SXdg,
    Rx,
    Ry,
    Rz,
    P,
    U,
    CX,
    CY,
    CZ,
    CH,
    Swap,
    CRx,
    CRy,
    CRz,
    CP,
    RXX,
    RYY,
    RZZ,
    CCX,
    CSwap,
}

impl GateType {
    /// Every gate type, in declaration order.
    pub const ALL: [GateType; 30] = [
        GateType::I,
        GateType::X,
        GateType::Y,
        GateType::Z,
        GateType::H,
        GateType::S,
        GateType::Sdg,
        GateType::T,
        GateType::Tdg,
        GateType::SX,
        GateType::SXdg,
        GateType::Rx,
        GateType::Ry,
        GateType::Rz,
        GateType::P,
        GateType::U,
        GateType::CX,
        GateType::CY,
        GateType::CZ,
        GateType::CH,
        GateType::Swap,
        GateType::CRx,
        GateType::CRy,
        GateType::CRz,
        GateType::CP,
        GateType::RXX,
        GateType::RYY,
        GateType::RZZ,
        GateType::CCX,
        GateType::CSwap,
    ];

    /// Lowercase OpenQASM-style name.
    pub fn name(self) -> &'static str {
        match self {
            GateType::I => "id",
            GateType::X => "x",
            GateType::Y => "y",
            GateType::Z => "z",
            GateType::H => "h",
            GateType::S => "s",
            GateType::Sdg => "sdg",
            GateType::T => "t",
            GateType::Tdg => "tdg",
            GateType::SX => "sx",
            GateType::SXdg => "sxdg",
            GateType::Rx => "rx",
            GateType::Ry => "ry",
            GateType::Rz => "rz",
            GateType::P => "p",
            GateType::U => "u",
            GateType::CX => "cx",
            GateType::CY => "cy",
            GateType::CZ => "cz",
            GateType::CH => "ch",
            GateType::Swap => "swap",
            GateType::CRx => "crx",
            GateType::CRy => "cry",
            GateType::CRz => "crz",
            GateType::CP => "cp",
            GateType::RXX => "rxx",
            GateType::RYY => "ryy",
            GateType::RZZ => "rzz",
            GateType::CCX => "ccx",
            GateType::CSwap => "cswap",
        }
    }

    /// Number of qubits a gate of this type acts on.
    pub fn num_qubits(self) -> u32 {
        match self {
            GateType::I
            | GateType::X
            | GateType::Y
            | GateType::Z
            | GateType::H
            | GateType::S
            | GateType::Sdg
            | GateType::T
            | GateType::Tdg
            | GateType::SX
            | GateType::SXdg
            | GateType::Rx
            | GateType::Ry
            | GateType::Rz
            | GateType::P
            | GateType::U => 1,
            GateType::CX
            | GateType::CY
            | GateType::CZ
            | GateType::CH
            | GateType::Swap
            | GateType::CRx
            | GateType::CRy
            | GateType::CRz
            | GateType::CP
            | GateType::RXX
            | GateType::RYY
            | GateType::RZZ => 2,
            GateType::CCX | GateType::CSwap => 3,
        }
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateType {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let name = match lower.as_str() {
            "cnot" => "cx",
            "i" => "id",
            "u3" => "u",
            "u1" => "p",
            "cu1" => "cp",
            other => other,
        };
        GateType::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| IrError::UnknownGateType(s.to_string()))
    }
}

impl TryFrom<String> for GateType {
    type Error = IrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GateType> for String {
    fn from(value: GateType) -> Self {
        value.name().to_string()
    }
}
