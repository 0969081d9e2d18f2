//! Pass manager for orchestrating compilation.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use benchpress_ir::CircuitDag;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::passes::{
    BasisTranslation, CommutativeCancellation, DecomposeMultiQubit, DenseLayout, Optimize1qGates,
    RoutingStrategy, SwapRouting, TrivialLayout,
};
use crate::property::{BasisGates, CouplingMap, PropertySet};

/// Highest supported optimization level.
pub const MAX_OPTIMIZATION_LEVEL: u8 = 3;

/// Upper bound on post-routing rounds at level 3.
const LEVEL3_MAX_ROUNDS: usize = 4;

/// Manages and executes a sequence of compilation passes.
#[derive(Default)]
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given DAG.
    #[instrument(skip(self, dag, properties))]
    pub fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            dag.num_qubits()
        );

        run_passes(&self.passes, dag, properties)?;

        info!(
            "Pass manager completed, final depth: {}, ops: {}",
            dag.depth(),
            dag.num_ops()
        );

        Ok(())
    }

    /// Names of the passes in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

fn run_passes(
    passes: &[Box<dyn Pass>],
    dag: &mut CircuitDag,
    properties: &mut PropertySet,
) -> CompileResult<()> {
    for pass in passes {
        if pass.should_run(dag, properties) {
            debug!("Running pass: {}", pass.name());
            pass.run(dag, properties)?;
            debug!("Pass {} completed, ops: {}", pass.name(), dag.num_ops());
        } else {
            debug!("Skipping pass: {}", pass.name());
        }
    }
    Ok(())
}

/// Runs a group of passes repeatedly until the op count stops decreasing.
///
/// At most `max_rounds` rounds run.
pub struct RepeatUntilStable {
    passes: Vec<Box<dyn Pass>>,
    max_rounds: usize,
}

impl RepeatUntilStable {
    /// Create an empty group that runs at most `max_rounds` times.
    pub fn new(max_rounds: usize) -> Self {
        Self {
            passes: vec![],
            max_rounds: max_rounds.max(1),
        }
    }

    /// Add a pass to the group.
    #[must_use]
    pub fn with_pass(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }
}

impl Pass for RepeatUntilStable {
    fn name(&self) -> &'static str {
        "RepeatUntilStable"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let mut ops = dag.num_ops();
        for round in 1..=self.max_rounds {
            run_passes(&self.passes, dag, properties)?;
            let now = dag.num_ops();
            debug!("Round {}: {} -> {} ops", round, ops, now);
            if now >= ops {
                break;
            }
            ops = now;
        }
        Ok(())
    }
}

/// Builder for creating pass managers with preset configurations.
pub struct PassManagerBuilder {
    /// Optimization level (0-3).
    optimization_level: u8,
    /// Target properties.
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            optimization_level: 1,
            properties: PropertySet::new(),
        }
    }

    /// Set the optimization level.
    ///
    /// - Level 0: decomposition, trivial layout, routing and translation only
    /// - Level 1: adds gate cancellation and 1q merging (default)
    /// - Level 2: dense layout, balanced routing, optimization on both sides
    ///   of routing
    /// - Level 3: level 2 with the final optimization repeated to a fixed
    ///   point
    ///
    /// Levels above 3 are rejected by [`PassManagerBuilder::build`].
    #[must_use]
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level;
        self
    }

    /// Set the target properties.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Set the target coupling map and basis gates.
    #[must_use]
    pub fn with_target(
        mut self,
        coupling_map: impl Into<Arc<CouplingMap>>,
        basis_gates: BasisGates,
    ) -> Self {
        self.properties.coupling_map = Some(coupling_map.into());
        self.properties.basis_gates = Some(basis_gates);
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> CompileResult<(PassManager, PropertySet)> {
        let level = self.optimization_level;
        if level > MAX_OPTIMIZATION_LEVEL {
            return Err(CompileError::InvalidOptimizationLevel(level));
        }

        let has_coupling = self.properties.coupling_map.is_some();
        let has_basis = self.properties.basis_gates.is_some();
        let mut pm = PassManager::new();

        // Pre-routing
        pm.add_pass(DecomposeMultiQubit::new());
        if level >= 1 {
            pm.add_pass(CommutativeCancellation::new());
        }
        if level >= 2 {
            pm.add_pass(Optimize1qGates::new());
        }

        // Layout and routing
        if has_coupling {
            if level >= 2 {
                pm.add_pass(DenseLayout);
                pm.add_pass(SwapRouting::new(RoutingStrategy::Best));
            } else {
                pm.add_pass(TrivialLayout);
                pm.add_pass(SwapRouting::new(RoutingStrategy::Forward));
            }
        }

        // Post-routing; level 3 runs translation inside the repeated group.
        if has_basis && level < 3 {
            pm.add_pass(BasisTranslation);
        }
        match level {
            0 => {}
            1 => pm.add_pass(Optimize1qGates::new()),
            2 => {
                pm.add_pass(Optimize1qGates::new());
                pm.add_pass(CommutativeCancellation::new());
                pm.add_pass(Optimize1qGates::new());
            }
            _ => {
                let mut group = RepeatUntilStable::new(LEVEL3_MAX_ROUNDS);
                if has_basis {
                    group = group.with_pass(BasisTranslation);
                }
                pm.add_pass(
                    group
                        .with_pass(Optimize1qGates::new())
                        .with_pass(CommutativeCancellation::new())
                        .with_pass(Optimize1qGates::new()),
                );
            }
        }

        debug!("Built level {} pipeline: {:?}", level, pm.pass_names());
        Ok((pm, self.properties))
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchpress_ir::{Circuit, GateType, QubitId};

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);
    }

    #[test]
    fn test_pass_manager_run() {
        let pm = PassManager::new();
        let mut props = PropertySet::new();

        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let mut dag = circuit.into_dag();
        pm.run(&mut dag, &mut props).unwrap();

        assert_eq!(dag.num_ops(), 2);
    }

    #[test]
    fn test_pass_manager_builder() {
        let (pm, props) = PassManagerBuilder::new()
            .with_optimization_level(2)
            .with_target(CouplingMap::linear(5), BasisGates::zsx_cz())
            .build()
            .unwrap();

        assert_eq!(
            pm.pass_names(),
            vec![
                "DecomposeMultiQubit",
                "CommutativeCancellation",
                "Optimize1qGates",
                "DenseLayout",
                "SwapRouting",
                "BasisTranslation",
                "Optimize1qGates",
                "CommutativeCancellation",
                "Optimize1qGates",
            ]
        );
        assert!(props.coupling_map.is_some());
        assert!(props.basis_gates.is_some());
    }

    #[test]
    fn test_level_zero_pipeline() {
        let (pm, _) = PassManagerBuilder::new()
            .with_optimization_level(0)
            .with_target(CouplingMap::linear(5), BasisGates::zsx_cx())
            .build()
            .unwrap();
        assert_eq!(
            pm.pass_names(),
            vec![
                "DecomposeMultiQubit",
                "TrivialLayout",
                "SwapRouting",
                "BasisTranslation"
            ]
        );
    }

    #[test]
    fn test_level_three_repeats() {
        let (pm, _) = PassManagerBuilder::new()
            .with_optimization_level(3)
            .with_target(CouplingMap::linear(5), BasisGates::zsx_cx())
            .build()
            .unwrap();
        assert_eq!(pm.pass_names().last(), Some(&"RepeatUntilStable"));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let result = PassManagerBuilder::new().with_optimization_level(4).build();
        assert!(matches!(
            result,
            Err(CompileError::InvalidOptimizationLevel(4))
        ));
    }

    #[test]
    fn test_repeat_until_stable_reaches_fixed_point() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.h(QubitId(1)).unwrap();
        circuit.h(QubitId(1)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let mut dag = circuit.into_dag();

        // The H pair must go before the CX pair can cancel.
        let group = RepeatUntilStable::new(4)
            .with_pass(CommutativeCancellation::new())
            .with_pass(Optimize1qGates::new());
        group.run(&mut dag, &mut PropertySet::new()).unwrap();
        assert_eq!(dag.num_ops(), 0);

        let circuit = Circuit::from_dag(dag);
        assert_eq!(circuit.n_gates_of_type(GateType::CX), 0);
    }
}
