//! Layout passes for mapping logical qubits to physical qubits.

use benchpress_ir::{CircuitDag, CircuitLevel, QubitId};
use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{CouplingMap, Layout, PropertySet};

#[allow(clippy::cast_possible_truncation)]
fn check_fits(dag: &CircuitDag, coupling_map: &CouplingMap) -> CompileResult<()> {
    let required = dag.num_qubits() as u32;
    if required > coupling_map.num_qubits() {
        return Err(CompileError::CircuitTooLarge {
            required,
            available: coupling_map.num_qubits(),
        });
    }
    Ok(())
}

/// Place the DAG's qubits, in index order, onto `physical` in order.
fn place(dag: &CircuitDag, num_physical: u32, physical: &[u32]) -> Layout {
    let mut layout = Layout::new(num_physical);
    for (logical, &p) in dag.qubits().zip(physical) {
        layout.add(logical, p);
    }
    layout
}

/// Trivial layout pass.
///
/// Maps logical qubit i to physical qubit i.
pub struct TrivialLayout;

impl Pass for TrivialLayout {
    fn name(&self) -> &'static str {
        "TrivialLayout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;
        check_fits(dag, coupling_map)?;

        let physical: Vec<u32> = dag.qubits().map(|QubitId(q)| q).collect();
        properties.layout = Some(place(dag, coupling_map.num_qubits(), &physical));
        Ok(())
    }

    fn should_run(&self, dag: &CircuitDag, properties: &PropertySet) -> bool {
        dag.level() == CircuitLevel::Logical
            && properties.layout.is_none()
            && properties.coupling_map.is_some()
    }
}

/// Dense layout pass.
///
/// Scores three placements by the summed coupling distance over the
/// circuit's two-qubit gates and keeps the cheapest:
/// - the trivial placement;
/// - a depth-first walk from the device periphery, which keeps logical
///   neighbours on adjacent physical qubits along lines and grid snakes;
/// - a breadth-first region around the device centre, which keeps
///   all-to-all interactions compact.
///
/// Ties go to the earlier candidate, so the result never scores worse than
/// [`TrivialLayout`]. Qubits outside the walked component are used last, in
/// index order.
pub struct DenseLayout;

/// Extend `order` with every physical qubit it is missing.
fn fill(mut order: Vec<u32>, num_physical: u32) -> Vec<u32> {
    if order.len() < num_physical as usize {
        let mut seen = vec![false; num_physical as usize];
        for &p in &order {
            seen[p as usize] = true;
        }
        order.extend((0..num_physical).filter(|&p| !seen[p as usize]));
    }
    order
}

/// Summed distance between the operands of every two-qubit gate.
fn interaction_cost(dag: &CircuitDag, coupling_map: &CouplingMap, layout: &Layout) -> u64 {
    let unreachable = u64::from(coupling_map.num_qubits());
    dag.topological_ops()
        .filter(|(_, inst)| inst.is_n_qubit_gate(2))
        .map(|(_, inst)| {
            match (layout.physical(inst.qubits[0]), layout.physical(inst.qubits[1])) {
                (Some(a), Some(b)) => coupling_map.distance(a, b).map_or(unreachable, u64::from),
                _ => unreachable,
            }
        })
        .sum()
}

impl Pass for DenseLayout {
    fn name(&self) -> &'static str {
        "DenseLayout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;
        check_fits(dag, coupling_map)?;

        let n = coupling_map.num_qubits();
        let trivial: Vec<u32> = dag.qubits().map(|QubitId(q)| q).collect();
        let walk = coupling_map
            .periphery()
            .map(|p| coupling_map.dfs_order(p))
            .unwrap_or_default();
        let region = coupling_map
            .center()
            .map(|c| coupling_map.bfs_order(c))
            .unwrap_or_default();

        let mut best: Option<(u64, &'static str, Layout)> = None;
        for (label, order) in [
            ("trivial", trivial),
            ("periphery walk", fill(walk, n)),
            ("centre region", fill(region, n)),
        ] {
            let layout = place(dag, n, &order);
            let cost = interaction_cost(dag, coupling_map, &layout);
            if best.as_ref().is_none_or(|(lowest, _, _)| cost < *lowest) {
                best = Some((cost, label, layout));
            }
        }

        if let Some((cost, label, layout)) = best {
            debug!("DenseLayout chose {} placement (cost {})", label, cost);
            properties.layout = Some(layout);
        }
        Ok(())
    }

    fn should_run(&self, dag: &CircuitDag, properties: &PropertySet) -> bool {
        dag.level() == CircuitLevel::Logical
            && properties.layout.is_none()
            && properties.coupling_map.is_some()
    }
}
