//! Routing passes for inserting SWAP gates.

use benchpress_ir::{CircuitDag, CircuitLevel, ClbitId, Instruction, QubitId, StandardGate};
use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{CouplingMap, Layout, PropertySet};

/// Where the swaps for a distant pair are placed along the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingStrategy {
    /// Move the first operand all the way to the second.
    #[default]
    Forward,
    /// Move both operands towards each other, splitting the swaps.
    MeetInMiddle,
    /// Route with both placements and keep the one with fewer swaps.
    ///
    /// Ties go to [`RoutingStrategy::Forward`].
    Best,
}

/// Statistics left in the property set by [`SwapRouting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoutingStats {
    /// Number of SWAP gates inserted.
    pub swaps_inserted: usize,
}

/// Swap-insertion routing.
///
/// Walks the operations in order and, for each two-qubit gate whose
/// operands are not adjacent, inserts SWAPs along the shortest path in the
/// coupling map and updates the layout. The output DAG is over physical
/// qubits and spans the whole device. The layout left in the property set
/// is the final one.
pub struct SwapRouting {
    strategy: RoutingStrategy,
}

impl SwapRouting {
    /// Create a routing pass with the given swap placement.
    pub fn new(strategy: RoutingStrategy) -> Self {
        Self { strategy }
    }

    /// The swap placement strategy.
    pub fn strategy(&self) -> RoutingStrategy {
        self.strategy
    }

    /// `(p, q)` physical pairs to swap so that `path[0]` and
    /// `path[len - 1]` end up adjacent.
    fn swap_sequence(strategy: RoutingStrategy, path: &[u32]) -> Vec<(u32, u32)> {
        let hops = path.len().saturating_sub(2);
        let forward = match strategy {
            RoutingStrategy::Forward | RoutingStrategy::Best => hops,
            RoutingStrategy::MeetInMiddle => hops.div_ceil(2),
        };
        let last = path.len() - 1;
        let mut swaps: Vec<(u32, u32)> = (0..forward).map(|i| (path[i], path[i + 1])).collect();
        swaps.extend((0..hops - forward).map(|j| (path[last - j], path[last - j - 1])));
        swaps
    }

    /// Route `ops` with one placement strategy, starting from `layout`.
    ///
    /// Returns the physical DAG, the final layout and the swap count.
    fn route(
        strategy: RoutingStrategy,
        ops: &[Instruction],
        clbits: &[ClbitId],
        coupling_map: &CouplingMap,
        mut layout: Layout,
    ) -> CompileResult<(CircuitDag, Layout, usize)> {
        let mut routed = CircuitDag::new();
        for p in 0..coupling_map.num_qubits() {
            routed.add_qubit(QubitId(p));
        }
        for &c in clbits {
            routed.add_clbit(c);
        }
        routed.set_level(CircuitLevel::Physical);

        let mut swaps_inserted = 0usize;
        for instruction in ops {
            if instruction.is_gate() && instruction.qubits.len() > 2 {
                return Err(CompileError::UnroutableGate {
                    gate: instruction.name().to_string(),
                    num_qubits: instruction.qubits.len(),
                });
            }

            if instruction.is_gate() && instruction.qubits.len() == 2 {
                let p0 = physical(&layout, instruction.qubits[0])?;
                let p1 = physical(&layout, instruction.qubits[1])?;
                if !coupling_map.is_connected(p0, p1) {
                    let path = coupling_map
                        .shortest_path(p0, p1)
                        .ok_or(CompileError::RoutingFailed {
                            qubit1: p0,
                            qubit2: p1,
                        })?;
                    for (a, b) in Self::swap_sequence(strategy, &path) {
                        routed.apply(Instruction::two_qubit_gate(
                            StandardGate::Swap,
                            QubitId(a),
                            QubitId(b),
                        ))?;
                        layout.swap_physical(a, b);
                        swaps_inserted += 1;
                    }
                }
            }

            let mut placed = instruction.clone();
            for qubit in &mut placed.qubits {
                *qubit = QubitId(physical(&layout, *qubit)?);
            }
            routed.apply(placed)?;
        }
        Ok((routed, layout, swaps_inserted))
    }
}

impl Default for SwapRouting {
    fn default() -> Self {
        Self::new(RoutingStrategy::Forward)
    }
}

fn physical(layout: &Layout, qubit: QubitId) -> CompileResult<u32> {
    layout.physical(qubit).ok_or(CompileError::MissingLayout)
}

impl Pass for SwapRouting {
    fn name(&self) -> &'static str {
        "SwapRouting"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .clone()
            .ok_or(CompileError::MissingCouplingMap)?;
        let initial = properties
            .layout
            .clone()
            .ok_or(CompileError::MissingLayout)?;

        let clbits: Vec<ClbitId> = dag.clbits().collect();
        let ops = std::mem::take(dag).into_ops();

        let (routed, layout, swaps_inserted) = match self.strategy {
            RoutingStrategy::Best => {
                let forward = Self::route(
                    RoutingStrategy::Forward,
                    &ops,
                    &clbits,
                    &coupling_map,
                    initial.clone(),
                )?;
                let middle = Self::route(
                    RoutingStrategy::MeetInMiddle,
                    &ops,
                    &clbits,
                    &coupling_map,
                    initial,
                )?;
                debug!(
                    "SwapRouting trials: forward {} swaps, meet in middle {} swaps",
                    forward.2, middle.2
                );
                if middle.2 < forward.2 { middle } else { forward }
            }
            strategy => Self::route(strategy, &ops, &clbits, &coupling_map, initial)?,
        };

        debug!(
            "SwapRouting ({:?}) inserted {} swaps",
            self.strategy, swaps_inserted
        );
        properties.insert(RoutingStats { swaps_inserted });
        properties.layout = Some(layout);
        *dag = routed;
        Ok(())
    }

    fn should_run(&self, dag: &CircuitDag, properties: &PropertySet) -> bool {
        dag.level() == CircuitLevel::Logical
            && properties.coupling_map.is_some()
            && properties.layout.is_some()
    }
}
