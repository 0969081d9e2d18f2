//! Compilation targets and their prepared pipelines.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use benchpress_ir::{Circuit, GateType};

use crate::error::{CompileError, CompileResult};
use crate::manager::{PassManager, PassManagerBuilder};
use crate::property::{BasisGates, CouplingMap, PropertySet};

/// Names accepted by [`Target::from_name`], default first.
pub const PRESET_NAMES: [&str; 5] = [
    "heavy_hex_cz",
    "heavy_hex_cx",
    "square_grid_cz",
    "linear_cx",
    "full_cx",
];

/// A device to compile for: connectivity, native gates and a name.
#[derive(Debug, Clone)]
pub struct Target {
    name: String,
    description: String,
    coupling_map: Arc<CouplingMap>,
    basis_gates: BasisGates,
}

impl Target {
    /// Create a target from its parts.
    ///
    /// The basis must contain a two-qubit gate.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        coupling_map: CouplingMap,
        basis_gates: BasisGates,
    ) -> CompileResult<Self> {
        if basis_gates.two_qubit_gate().is_none() {
            return Err(CompileError::MissingBasisGates);
        }
        Ok(Self {
            name: name.into(),
            description: description.into(),
            coupling_map: Arc::new(coupling_map),
            basis_gates,
        })
    }

    fn preset(
        name: &str,
        description: &str,
        coupling_map: CouplingMap,
        basis: BasisGates,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            coupling_map: Arc::new(coupling_map),
            basis_gates: basis,
        }
    }

    /// 129-qubit heavy-hex lattice (7 rows of 15 with bridges), rz/sx/x + cz.
    pub fn heavy_hex_cz() -> Self {
        Self::preset(
            "heavy_hex_cz",
            "129-qubit heavy-hex lattice, native CZ",
            CouplingMap::heavy_hex(7, 15),
            BasisGates::zsx_cz(),
        )
    }

    /// 129-qubit heavy-hex lattice, rz/sx/x + cx.
    pub fn heavy_hex_cx() -> Self {
        Self::preset(
            "heavy_hex_cx",
            "129-qubit heavy-hex lattice, native CX",
            CouplingMap::heavy_hex(7, 15),
            BasisGates::zsx_cx(),
        )
    }

    /// 121-qubit 11x11 square grid, rz/sx/x + cz.
    pub fn square_grid_cz() -> Self {
        Self::preset(
            "square_grid_cz",
            "121-qubit 11x11 square grid, native CZ",
            CouplingMap::grid(11, 11),
            BasisGates::zsx_cz(),
        )
    }

    /// 128 qubits on a line, rz/sx/x + cx.
    pub fn linear_cx() -> Self {
        Self::preset(
            "linear_cx",
            "128-qubit line, native CX",
            CouplingMap::linear(128),
            BasisGates::zsx_cx(),
        )
    }

    /// 128 fully connected qubits, rz/sx/x + cx.
    pub fn full_cx() -> Self {
        Self::preset(
            "full_cx",
            "128-qubit all-to-all device, native CX",
            CouplingMap::full(128),
            BasisGates::zsx_cx(),
        )
    }

    /// Look up a preset by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "heavy_hex_cz" => Some(Self::heavy_hex_cz()),
            "heavy_hex_cx" => Some(Self::heavy_hex_cx()),
            "square_grid_cz" => Some(Self::square_grid_cz()),
            "linear_cx" => Some(Self::linear_cx()),
            "full_cx" => Some(Self::full_cx()),
            _ => None,
        }
    }

    /// All presets, default first.
    pub fn presets() -> Vec<Self> {
        PRESET_NAMES.iter().filter_map(|n| Self::from_name(n)).collect()
    }

    /// Target name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of physical qubits.
    pub fn num_qubits(&self) -> u32 {
        self.coupling_map.num_qubits()
    }

    /// The device connectivity.
    pub fn coupling_map(&self) -> &CouplingMap {
        &self.coupling_map
    }

    /// The native gate set.
    pub fn basis_gates(&self) -> &BasisGates {
        &self.basis_gates
    }

    /// The native two-qubit gate that metrics are keyed on.
    pub fn two_q_gate_type(&self) -> GateType {
        // `new` rejects bases without one and every preset has one.
        self.basis_gates.two_qubit_gate().unwrap_or(GateType::CX)
    }

    /// Build the default pipeline for this target at `level` (0 to 3).
    pub fn default_compilation_pass(&self, level: u8) -> CompileResult<CompilationPass> {
        let (manager, _) = PassManagerBuilder::new()
            .with_optimization_level(level)
            .with_target(Arc::clone(&self.coupling_map), self.basis_gates.clone())
            .build()?;
        debug!(
            "Prepared level {} pipeline for {} ({} passes)",
            level,
            self.name,
            manager.len()
        );
        Ok(CompilationPass {
            manager,
            coupling_map: Arc::clone(&self.coupling_map),
            basis_gates: self.basis_gates.clone(),
            optimization_level: level,
        })
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::heavy_hex_cz()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} qubits)", self.name, self.num_qubits())
    }
}

/// A prepared pipeline bound to a target.
///
/// Built once and applied to many circuits. Each [`CompilationPass::apply`]
/// starts from a fresh [`PropertySet`], so calls are independent.
pub struct CompilationPass {
    manager: PassManager,
    coupling_map: Arc<CouplingMap>,
    basis_gates: BasisGates,
    optimization_level: u8,
}

impl CompilationPass {
    /// Compile `circuit` in place.
    ///
    /// On error the circuit is left without operations.
    pub fn apply(&self, circuit: &mut Circuit) -> CompileResult<()> {
        let mut properties =
            PropertySet::new().with_target(Arc::clone(&self.coupling_map), self.basis_gates.clone());
        let mut dag = circuit.take_dag();
        self.manager.run(&mut dag, &mut properties)?;
        circuit.set_dag(dag);
        Ok(())
    }

    /// The optimization level this pipeline was built for.
    pub fn optimization_level(&self) -> u8 {
        self.optimization_level
    }

    /// The pass manager.
    pub fn manager(&self) -> &PassManager {
        &self.manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchpress_ir::QubitId;

    #[test]
    fn test_presets() {
        let presets = Target::presets();
        assert_eq!(presets.len(), PRESET_NAMES.len());
        assert_eq!(presets[0].name(), "heavy_hex_cz");
        assert_eq!(Target::default().name(), "heavy_hex_cz");
        assert_eq!(Target::heavy_hex_cz().num_qubits(), 129);
        assert_eq!(Target::square_grid_cz().num_qubits(), 121);
        assert_eq!(Target::linear_cx().num_qubits(), 128);
        assert!(Target::from_name("bogus").is_none());
    }

    #[test]
    fn test_two_q_gate_type() {
        assert_eq!(Target::heavy_hex_cz().two_q_gate_type(), GateType::CZ);
        assert_eq!(Target::heavy_hex_cx().two_q_gate_type(), GateType::CX);
        assert_eq!(Target::full_cx().two_q_gate_type(), GateType::CX);
    }

    #[test]
    fn test_new_requires_two_qubit_gate() {
        let result = Target::new(
            "bad",
            "no entangler",
            CouplingMap::linear(2),
            BasisGates::new([GateType::Rz, GateType::SX, GateType::X]),
        );
        assert!(matches!(result, Err(CompileError::MissingBasisGates)));
    }

    #[test]
    fn test_invalid_level() {
        let result = Target::linear_cx().default_compilation_pass(7);
        assert!(matches!(
            result,
            Err(CompileError::InvalidOptimizationLevel(7))
        ));
    }

    #[test]
    fn test_apply_widens_to_device() {
        let target = Target::new(
            "small",
            "five on a line",
            CouplingMap::linear(5),
            BasisGates::zsx_cz(),
        )
        .unwrap();
        let pass = target.default_compilation_pass(1).unwrap();
        let mut circuit = Circuit::bell().unwrap();
        pass.apply(&mut circuit).unwrap();

        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.n_gates_of_type(GateType::CZ), 1);
        assert_eq!(circuit.n_gates_of_type(GateType::CX), 0);
        assert_eq!(pass.optimization_level(), 1);
    }

    #[test]
    fn test_apply_is_repeatable() {
        let target = Target::linear_cx();
        let pass = target.default_compilation_pass(2).unwrap();
        let mut source = Circuit::with_size("ladder", 6, 0);
        source.h(QubitId(0)).unwrap();
        for k in 1..6 {
            source.cx(QubitId(0), QubitId(k)).unwrap();
        }

        let mut first = source.clone();
        pass.apply(&mut first).unwrap();
        let mut second = source.clone();
        pass.apply(&mut second).unwrap();

        assert_eq!(first.count_ops(), second.count_ops());
        assert_eq!(
            first.depth_by_type(GateType::CX),
            second.depth_by_type(GateType::CX)
        );
        assert_eq!(source.num_qubits(), 6);
    }
}
