//! Integration tests for measurement safety across optimization passes.
//!
//! No pass may merge or cancel gates across a measurement, reset or
//! barrier. This holds for the passes on their own and for every level of
//! the full pipeline.

use std::f64::consts::PI;

use benchpress_compile::passes::{CommutativeCancellation, Optimize1qGates};
use benchpress_compile::{Pass, PassManagerBuilder, PropertySet, Target};
use benchpress_ir::{Circuit, CircuitDag, ClbitId, GateType, QubitId};

fn count_measurements(dag: &CircuitDag) -> usize {
    dag.topological_ops()
        .filter(|(_, inst)| inst.is_measure())
        .count()
}

fn ops_on_qubit(dag: &CircuitDag, qubit: QubitId) -> Vec<String> {
    dag.topological_ops()
        .filter(|(_, inst)| inst.qubits.contains(&qubit))
        .map(|(_, inst)| inst.name().to_string())
        .collect()
}

#[test]
fn test_h_measure_h_not_optimized() {
    let mut circuit = Circuit::with_size("test", 1, 1);
    circuit.h(QubitId(0)).unwrap();
    circuit.measure(QubitId(0), ClbitId(0)).unwrap();
    circuit.h(QubitId(0)).unwrap();

    let mut dag = circuit.into_dag();
    Optimize1qGates::new()
        .run(&mut dag, &mut PropertySet::new())
        .unwrap();

    assert_eq!(count_measurements(&dag), 1);
    let ops = ops_on_qubit(&dag, QubitId(0));
    assert_eq!(ops.len(), 3, "got {ops:?}");
    assert_eq!(ops[1], "measure");
}

#[test]
fn test_cx_measure_cx_not_cancelled() {
    let mut circuit = Circuit::with_size("test", 2, 1);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.measure(QubitId(1), ClbitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    let mut dag = circuit.into_dag();
    CommutativeCancellation::new()
        .run(&mut dag, &mut PropertySet::new())
        .unwrap();

    assert_eq!(dag.num_ops(), 3);
}

#[test]
fn test_rz_measure_rz_not_merged() {
    let mut circuit = Circuit::with_size("test", 1, 1);
    circuit.rz(PI / 4.0, QubitId(0)).unwrap();
    circuit.measure(QubitId(0), ClbitId(0)).unwrap();
    circuit.rz(-PI / 4.0, QubitId(0)).unwrap();

    let mut dag = circuit.into_dag();
    Optimize1qGates::new()
        .run(&mut dag, &mut PropertySet::new())
        .unwrap();

    assert_eq!(dag.num_ops(), 3);
}

#[test]
fn test_reset_separates_runs() {
    let mut circuit = Circuit::with_size("test", 1, 0);
    circuit.x(QubitId(0)).unwrap();
    circuit.reset(QubitId(0)).unwrap();
    circuit.x(QubitId(0)).unwrap();

    let mut dag = circuit.into_dag();
    Optimize1qGates::new()
        .run(&mut dag, &mut PropertySet::new())
        .unwrap();

    assert_eq!(ops_on_qubit(&dag, QubitId(0)).len(), 3);
}

#[test]
fn test_barrier_blocks_optimization() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.barrier([QubitId(0), QubitId(1)]).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    let mut dag = circuit.into_dag();
    CommutativeCancellation::new()
        .run(&mut dag, &mut PropertySet::new())
        .unwrap();

    assert_eq!(dag.num_ops(), 3);
}

#[test]
fn test_full_pipeline_mid_circuit_measurement() {
    let target = Target::linear_cx();
    for level in 0..=3 {
        let mut circuit = Circuit::with_size("mid", 2, 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.measure(QubitId(1), ClbitId(1)).unwrap();

        let pass = target.default_compilation_pass(level).unwrap();
        pass.apply(&mut circuit).unwrap();

        assert_eq!(count_measurements(circuit.dag()), 2, "level {level}");
        assert_eq!(circuit.n_gates_of_type(GateType::CX), 2, "level {level}");
    }
}

#[test]
fn test_builder_without_target_only_optimizes() {
    let (pm, mut props) = PassManagerBuilder::new()
        .with_optimization_level(2)
        .build()
        .unwrap();

    let mut circuit = Circuit::with_size("test", 2, 1);
    circuit.h(QubitId(0)).unwrap();
    circuit.h(QubitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.measure(QubitId(1), ClbitId(0)).unwrap();

    let mut dag = circuit.into_dag();
    pm.run(&mut dag, &mut props).unwrap();

    assert_eq!(dag.num_qubits(), 2);
    assert_eq!(dag.num_ops(), 2);
    assert_eq!(count_measurements(&dag), 1);
}
