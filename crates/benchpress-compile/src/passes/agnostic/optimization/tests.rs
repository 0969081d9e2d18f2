//! Tests for optimization passes.

use std::f64::consts::PI;

use benchpress_ir::{Circuit, CircuitDag, GateType, QubitId};

use crate::pass::Pass;
use crate::property::{BasisGates, CouplingMap, PropertySet};
use crate::unitary::Unitary2x2;

use super::{CommutativeCancellation, OneQubitBasis, Optimize1qGates};

/// Product of every gate on a single-qubit DAG.
fn unitary_of(dag: &CircuitDag) -> Unitary2x2 {
    dag.topological_ops()
        .filter_map(|(_, inst)| inst.as_gate().and_then(Unitary2x2::from_gate))
        .fold(Unitary2x2::identity(), |acc, g| g * acc)
}

fn zsx_props() -> PropertySet {
    PropertySet::new().with_target(CouplingMap::linear(2), BasisGates::zsx_cz())
}

#[test]
fn test_optimize_1q_hh_cancels() {
    let mut circuit = Circuit::with_size("test", 1, 0);
    circuit.h(QubitId(0)).unwrap();
    circuit.h(QubitId(0)).unwrap();
    let mut dag = circuit.into_dag();

    let mut props = PropertySet::new();
    Optimize1qGates::new().run(&mut dag, &mut props).unwrap();

    assert_eq!(dag.num_ops(), 0);
}

#[test]
fn test_optimize_1q_merges_into_u() {
    let mut circuit = Circuit::with_size("test", 1, 0);
    circuit.h(QubitId(0)).unwrap();
    circuit.t(QubitId(0)).unwrap();
    circuit.t(QubitId(0)).unwrap();
    circuit.h(QubitId(0)).unwrap();
    let mut dag = circuit.into_dag();
    let expected = unitary_of(&dag);

    let mut props = PropertySet::new();
    Optimize1qGates::with_basis(OneQubitBasis::U)
        .run(&mut dag, &mut props)
        .unwrap();

    assert_eq!(dag.num_ops(), 1);
    assert!(unitary_of(&dag).approx_eq_up_to_phase(&expected));
}

#[test]
fn test_optimize_1q_translates_out_of_basis_gate() {
    let mut circuit = Circuit::with_size("test", 1, 0);
    circuit.h(QubitId(0)).unwrap();
    let mut dag = circuit.into_dag();
    let expected = unitary_of(&dag);

    let mut props = zsx_props();
    Optimize1qGates::new().run(&mut dag, &mut props).unwrap();

    let basis = BasisGates::zsx_cz();
    assert!(
        dag.topological_ops()
            .all(|(_, inst)| inst.gate_type().is_some_and(|g| basis.contains(g)))
    );
    assert!(unitary_of(&dag).approx_eq_up_to_phase(&expected));
}

#[test]
fn test_optimize_1q_keeps_single_basis_gate() {
    let mut circuit = Circuit::with_size("test", 1, 0);
    circuit.rz(0.3, QubitId(0)).unwrap();
    let mut dag = circuit.into_dag();

    let mut props = zsx_props();
    Optimize1qGates::new().run(&mut dag, &mut props).unwrap();

    assert_eq!(dag.num_ops(), 1);
    assert_eq!(
        dag.topological_ops().next().and_then(|(_, i)| i.gate_type()),
        Some(GateType::Rz)
    );
}

#[test]
fn test_optimize_1q_long_run_in_zsx() {
    let mut circuit = Circuit::with_size("test", 1, 0);
    let q = QubitId(0);
    circuit
        .rz(0.2, q)
        .unwrap()
        .sx(q)
        .unwrap()
        .rz(1.1, q)
        .unwrap()
        .sx(q)
        .unwrap()
        .rz(-0.4, q)
        .unwrap()
        .sx(q)
        .unwrap()
        .rz(0.9, q)
        .unwrap();
    let mut dag = circuit.into_dag();
    let expected = unitary_of(&dag);

    let mut props = zsx_props();
    Optimize1qGates::new().run(&mut dag, &mut props).unwrap();

    assert!(dag.num_ops() <= 5, "got {} ops", dag.num_ops());
    assert!(unitary_of(&dag).approx_eq_up_to_phase(&expected));
}

#[test]
fn test_optimize_1q_stops_at_measure() {
    let mut circuit = Circuit::with_size("test", 1, 1);
    circuit.h(QubitId(0)).unwrap();
    circuit.measure_all().unwrap();
    circuit.h(QubitId(0)).unwrap();
    let mut dag = circuit.into_dag();

    let mut props = PropertySet::new();
    Optimize1qGates::new().run(&mut dag, &mut props).unwrap();

    assert_eq!(dag.num_ops(), 3);
}

#[test]
fn test_optimize_1q_runs_split_by_two_qubit_gate() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.h(QubitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.h(QubitId(0)).unwrap();
    let mut dag = circuit.into_dag();

    let mut props = PropertySet::new();
    Optimize1qGates::new().run(&mut dag, &mut props).unwrap();

    assert_eq!(dag.num_ops(), 3);
    dag.verify_integrity().unwrap();
}

fn cancel(circuit: Circuit) -> CircuitDag {
    let mut dag = circuit.into_dag();
    let mut props = PropertySet::new();
    CommutativeCancellation::new()
        .run(&mut dag, &mut props)
        .unwrap();
    dag
}

#[test]
fn test_cancel_cx_adjacent() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    assert_eq!(cancel(circuit).num_ops(), 0);
}

#[test]
fn test_cancel_cx_blocked_by_h() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.h(QubitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    assert_eq!(cancel(circuit).num_ops(), 3);
}

#[test]
fn test_cancel_cx_reversed_operands_kept() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.cx(QubitId(1), QubitId(0)).unwrap();

    assert_eq!(cancel(circuit).num_ops(), 2);
}

#[test]
fn test_cancel_through_rz_on_control() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.rz(PI / 3.0, QubitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    let dag = cancel(circuit);
    assert_eq!(dag.num_ops(), 1);
    assert_eq!(
        dag.topological_ops().next().and_then(|(_, i)| i.gate_type()),
        Some(GateType::Rz)
    );
}

#[test]
fn test_cancel_through_x_on_target() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.x(QubitId(1)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    assert_eq!(cancel(circuit).num_ops(), 1);
}

#[test]
fn test_cancel_blocked_by_z_on_target() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.z(QubitId(1)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    assert_eq!(cancel(circuit).num_ops(), 3);
}

#[test]
fn test_cancel_symmetric_cz() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.cz(QubitId(0), QubitId(1)).unwrap();
    circuit.rz(0.7, QubitId(1)).unwrap();
    circuit.cz(QubitId(1), QubitId(0)).unwrap();

    assert_eq!(cancel(circuit).num_ops(), 1);
}

#[test]
fn test_cancel_nested_cx_ladder() {
    let n = 6;
    let target = QubitId(n - 1);
    let mut circuit = Circuit::with_size("bvlike", n, 0);
    for k in 0..n - 1 {
        circuit.cx(QubitId(k), target).unwrap();
    }
    circuit.x(target).unwrap();
    circuit.z(QubitId(n - 2)).unwrap();
    for k in (0..n - 1).rev() {
        circuit.cx(QubitId(k), target).unwrap();
    }

    let dag = cancel(circuit);
    let kinds: Vec<_> = dag
        .topological_ops()
        .filter_map(|(_, i)| i.gate_type())
        .collect();
    assert_eq!(kinds, vec![GateType::X, GateType::Z]);
    dag.verify_integrity().unwrap();
}

#[test]
fn test_cancel_measure_blocks() {
    let mut circuit = Circuit::with_size("test", 2, 2);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.measure(QubitId(0), benchpress_ir::ClbitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    assert_eq!(cancel(circuit).num_ops(), 3);
}
