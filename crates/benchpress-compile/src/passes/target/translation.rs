//! Basis translation passes.

use benchpress_ir::{CircuitDag, GateType, Instruction, InstructionKind, StandardGate};
use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::passes::agnostic::decompose_gate;
use crate::property::{BasisGates, PropertySet};
use crate::unitary::Unitary2x2;

/// Basis translation pass.
///
/// Translates gates to the target basis gate set:
/// - `cx`, `cz` and `swap` become the native two-qubit gate, conjugated
///   by Hadamards where the native gate is the other one;
/// - other multi-qubit gates are decomposed first;
/// - single-qubit gates outside the basis are resynthesized as rz/sx/x, or
///   as `u` when the basis has `u` instead.
///
/// Anything left without a basis equivalent fails with
/// [`CompileError::GateNotInBasis`].
pub struct BasisTranslation;

impl Pass for BasisTranslation {
    fn name(&self) -> &'static str {
        "BasisTranslation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let basis = properties
            .basis_gates
            .as_ref()
            .ok_or(CompileError::MissingBasisGates)?;

        // The DAG is append-only, so translation rebuilds it in order.
        let source = std::mem::take(dag);
        let mut new_dag = source.empty_like();
        let mut translated = Vec::new();
        let mut rewritten = 0usize;

        for inst in source.into_ops() {
            let in_basis = inst
                .gate_type()
                .is_none_or(|gate_type| basis.contains(gate_type));
            if in_basis {
                new_dag.apply(inst)?;
                continue;
            }
            rewritten += 1;
            translated.clear();
            translate_into(inst, basis, &mut translated)?;
            for r in translated.drain(..) {
                new_dag.apply(r)?;
            }
        }

        debug!("BasisTranslation rewrote {} gates", rewritten);
        *dag = new_dag;
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.basis_gates.is_some()
    }
}

/// Translate one instruction, appending basis-only instructions to `out`.
fn translate_into(
    instruction: Instruction,
    basis: &BasisGates,
    out: &mut Vec<Instruction>,
) -> CompileResult<()> {
    let InstructionKind::Gate(gate) = instruction.kind else {
        out.push(instruction);
        return Ok(());
    };
    if basis.contains(gate.gate_type()) {
        out.push(instruction);
        return Ok(());
    }

    let qubits = instruction.qubits;
    let not_in_basis = || CompileError::GateNotInBasis(gate.name().to_string());

    if qubits.len() == 1 {
        if gate == StandardGate::I {
            return Ok(());
        }
        let unitary = Unitary2x2::from_gate(&gate).ok_or_else(not_in_basis)?;
        let gates = if basis.supports_zsx() {
            unitary.to_zsx()
        } else if basis.contains(GateType::U) {
            unitary.to_u()
        } else {
            return Err(not_in_basis());
        };
        out.extend(
            gates
                .into_iter()
                .map(|g| Instruction::single_qubit_gate(g, qubits[0])),
        );
        return Ok(());
    }

    let replacement = match gate {
        StandardGate::CX | StandardGate::CZ => {
            let native = basis.two_qubit_gate().ok_or_else(not_in_basis)?;
            let (c, t) = (qubits[0], qubits[1]);
            let other = match native {
                GateType::CZ if gate == StandardGate::CX => StandardGate::CZ,
                GateType::CX if gate == StandardGate::CZ => StandardGate::CX,
                _ => return Err(not_in_basis()),
            };
            vec![
                Instruction::single_qubit_gate(StandardGate::H, t),
                Instruction::two_qubit_gate(other, c, t),
                Instruction::single_qubit_gate(StandardGate::H, t),
            ]
        }
        _ => decompose_gate(&gate, &qubits).ok_or_else(not_in_basis)?,
    };

    for inst in replacement {
        translate_into(inst, basis, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::CouplingMap;
    use benchpress_ir::{Circuit, QubitId};

    fn translate(circuit: Circuit, basis: BasisGates) -> CompileResult<Circuit> {
        let mut circuit = circuit;
        let mut dag = circuit.take_dag();
        let mut props = PropertySet::new().with_target(CouplingMap::linear(3), basis);
        BasisTranslation.run(&mut dag, &mut props)?;
        circuit.set_dag(dag);
        Ok(circuit)
    }

    fn in_basis(circuit: &Circuit, basis: &BasisGates) -> bool {
        circuit
            .instructions()
            .all(|i| i.gate_type().is_none_or(|g| basis.contains(g)))
    }

    #[test]
    fn test_bell_to_cz_basis() {
        let basis = BasisGates::zsx_cz();
        let out = translate(Circuit::bell().unwrap(), basis.clone()).unwrap();
        assert!(in_basis(&out, &basis));
        assert_eq!(out.n_gates_of_type(GateType::CZ), 1);
        assert_eq!(out.n_gates_of_type(GateType::CX), 0);
    }

    #[test]
    fn test_bell_state_ordering() {
        // The translated H must still come before the two-qubit gate.
        let out = translate(Circuit::bell().unwrap(), BasisGates::zsx_cx()).unwrap();
        let first_2q = out
            .instructions()
            .position(|i| i.is_n_qubit_gate(2))
            .unwrap();
        let on_q0_before = out
            .instructions()
            .take(first_2q)
            .filter(|i| i.qubits == vec![QubitId(0)])
            .count();
        assert!(on_q0_before >= 1);
    }

    #[test]
    fn test_cz_to_cx_basis() {
        let mut circuit = Circuit::with_size("t", 2, 0);
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        let basis = BasisGates::zsx_cx();
        let out = translate(circuit, basis.clone()).unwrap();
        assert!(in_basis(&out, &basis));
        assert_eq!(out.n_gates_of_type(GateType::CX), 1);
    }

    #[test]
    fn test_swap_to_cz_basis() {
        let mut circuit = Circuit::with_size("t", 2, 0);
        circuit.swap(QubitId(0), QubitId(1)).unwrap();
        let basis = BasisGates::zsx_cz();
        let out = translate(circuit, basis.clone()).unwrap();
        assert!(in_basis(&out, &basis));
        assert_eq!(out.n_gates_of_type(GateType::CZ), 3);
    }

    #[test]
    fn test_ccx_to_cz_basis() {
        let mut circuit = Circuit::with_size("t", 3, 0);
        circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
        let basis = BasisGates::zsx_cz();
        let out = translate(circuit, basis.clone()).unwrap();
        assert!(in_basis(&out, &basis));
        assert_eq!(out.n_gates_of_type(GateType::CZ), 6);
    }

    #[test]
    fn test_identity_dropped() {
        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit.gate(StandardGate::I, [QubitId(0)]).unwrap();
        let out = translate(circuit, BasisGates::zsx_cz()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_u_basis() {
        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit.h(QubitId(0)).unwrap();
        let basis = BasisGates::new([GateType::U, GateType::CX]);
        let out = translate(circuit, basis).unwrap();
        assert_eq!(out.n_gates_of_type(GateType::U), 1);
    }

    #[test]
    fn test_untranslatable_gate() {
        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit.h(QubitId(0)).unwrap();
        let result = translate(circuit, BasisGates::new([GateType::CZ]));
        assert!(matches!(result, Err(CompileError::GateNotInBasis(name)) if name == "h"));
    }

    #[test]
    fn test_missing_basis_gates() {
        let mut dag = Circuit::bell().unwrap().into_dag();
        let result = BasisTranslation.run(&mut dag, &mut PropertySet::new());
        assert!(matches!(result, Err(CompileError::MissingBasisGates)));
    }
}
