//! `PropertySet` and related types for pass communication.
//!
//! A compilation shares one [`PropertySet`] between all of its passes. The
//! layout pass writes the [`Layout`], routing reads the [`CouplingMap`] and
//! updates the layout, and translation reads the [`BasisGates`].
//!
//! # Examples
//!
//! ```
//! use benchpress_compile::{BasisGates, CouplingMap, PropertySet};
//! use benchpress_ir::GateType;
//!
//! let props = PropertySet::new()
//!     .with_target(CouplingMap::linear(5), BasisGates::zsx_cz());
//!
//! assert!(props.coupling_map.as_ref().unwrap().is_connected(3, 4));
//! assert!(props.basis_gates.as_ref().unwrap().contains(GateType::CZ));
//! ```

use std::any::{Any, TypeId};
use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use benchpress_ir::{GateType, QubitId};

const UNREACHABLE: u32 = u32::MAX;

/// A mapping from logical qubits to physical qubits.
///
/// Every physical qubit holds at most one logical qubit. Physical qubits
/// without a logical qubit are free and can be swapped through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    logical_to_physical: FxHashMap<QubitId, u32>,
    physical_to_logical: Vec<Option<QubitId>>,
}

impl Layout {
    /// Create an empty layout over `num_physical` device qubits.
    pub fn new(num_physical: u32) -> Self {
        Self {
            logical_to_physical: FxHashMap::default(),
            physical_to_logical: vec![None; num_physical as usize],
        }
    }

    /// Create a trivial layout (logical qubit i -> physical qubit i).
    pub fn trivial(num_logical: u32, num_physical: u32) -> Self {
        let mut layout = Self::new(num_physical.max(num_logical));
        for i in 0..num_logical {
            layout.add(QubitId(i), i);
        }
        layout
    }

    /// Place a logical qubit on a physical qubit, evicting whatever was
    /// mapped to either side before.
    pub fn add(&mut self, logical: QubitId, physical: u32) {
        let slot = physical as usize;
        if slot >= self.physical_to_logical.len() {
            self.physical_to_logical.resize(slot + 1, None);
        }
        if let Some(old) = self.physical_to_logical[slot] {
            self.logical_to_physical.remove(&old);
        }
        if let Some(old) = self.logical_to_physical.insert(logical, physical) {
            self.physical_to_logical[old as usize] = None;
        }
        self.physical_to_logical[slot] = Some(logical);
    }

    /// Get the physical qubit for a logical qubit.
    pub fn physical(&self, logical: QubitId) -> Option<u32> {
        self.logical_to_physical.get(&logical).copied()
    }

    /// Get the logical qubit for a physical qubit.
    pub fn logical(&self, physical: u32) -> Option<QubitId> {
        self.physical_to_logical
            .get(physical as usize)
            .copied()
            .flatten()
    }

    /// Exchange the contents of two physical qubits.
    pub fn swap_physical(&mut self, p1: u32, p2: u32) {
        let (a, b) = (p1 as usize, p2 as usize);
        let needed = a.max(b) + 1;
        if needed > self.physical_to_logical.len() {
            self.physical_to_logical.resize(needed, None);
        }
        self.physical_to_logical.swap(a, b);
        if let Some(l) = self.physical_to_logical[a] {
            self.logical_to_physical.insert(l, p1);
        }
        if let Some(l) = self.physical_to_logical[b] {
            self.logical_to_physical.insert(l, p2);
        }
    }

    /// Number of placed logical qubits.
    pub fn len(&self) -> usize {
        self.logical_to_physical.len()
    }

    /// Check if the layout is empty.
    pub fn is_empty(&self) -> bool {
        self.logical_to_physical.is_empty()
    }

    /// `(logical, physical)` pairs in logical order.
    pub fn iter(&self) -> impl Iterator<Item = (QubitId, u32)> + '_ {
        self.physical_to_logical
            .iter()
            .enumerate()
            .filter_map(|(p, l)| l.map(|l| (l, p as u32)))
            .collect::<std::collections::BTreeMap<_, _>>()
            .into_iter()
    }
}

/// Target device coupling map.
///
/// Edges are undirected. All-pairs distances and BFS predecessors are
/// computed once at construction, so `distance` is a lookup and
/// `shortest_path` costs one step per hop.
#[derive(Debug, Clone)]
pub struct CouplingMap {
    num_qubits: u32,
    edges: Vec<(u32, u32)>,
    adjacency: Vec<Vec<u32>>,
    /// `dist[from * n + to]`, or `UNREACHABLE`.
    dist: Vec<u32>,
    /// `pred[from * n + to]` is the node before `to` on a shortest path.
    pred: Vec<u32>,
}

impl CouplingMap {
    /// Build a coupling map from an edge list.
    ///
    /// Self-loops, duplicates and reversed duplicates are ignored, as are
    /// edges that name a qubit outside `0..num_qubits`.
    pub fn from_edges(num_qubits: u32, edges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let n = num_qubits as usize;
        let mut map = Self {
            num_qubits,
            edges: vec![],
            adjacency: vec![vec![]; n],
            dist: vec![],
            pred: vec![],
        };
        for (a, b) in edges {
            if a == b || a >= num_qubits || b >= num_qubits || map.is_connected(a, b) {
                continue;
            }
            map.edges.push((a.min(b), a.max(b)));
            map.adjacency[a as usize].push(b);
            map.adjacency[b as usize].push(a);
        }
        for neighbors in &mut map.adjacency {
            neighbors.sort_unstable();
        }
        map.compute_distances();
        map
    }

    fn compute_distances(&mut self) {
        let n = self.num_qubits as usize;
        self.dist = vec![UNREACHABLE; n * n];
        self.pred = vec![UNREACHABLE; n * n];

        let mut queue = VecDeque::new();
        for src in 0..n {
            let row = src * n;
            self.dist[row + src] = 0;
            queue.clear();
            queue.push_back(src);
            while let Some(current) = queue.pop_front() {
                for &next in &self.adjacency[current] {
                    let next = next as usize;
                    if self.dist[row + next] == UNREACHABLE {
                        self.dist[row + next] = self.dist[row + current] + 1;
                        self.pred[row + next] = current as u32;
                        queue.push_back(next);
                    }
                }
            }
        }
    }

    /// Create a linear coupling map (0-1-2-3-...).
    pub fn linear(n: u32) -> Self {
        Self::from_edges(n, (1..n).map(|i| (i - 1, i)))
    }

    /// Create a fully connected coupling map.
    pub fn full(n: u32) -> Self {
        Self::from_edges(n, (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j))))
    }

    /// Create a `rows` x `cols` nearest-neighbour grid, numbered row-major.
    pub fn grid(rows: u32, cols: u32) -> Self {
        let mut edges = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let q = r * cols + c;
                if c + 1 < cols {
                    edges.push((q, q + 1));
                }
                if r + 1 < rows {
                    edges.push((q, q + cols));
                }
            }
        }
        Self::from_edges(rows * cols, edges)
    }

    /// Create a heavy-hex lattice of `rows` lines of `row_len` qubits.
    ///
    /// Neighbouring lines are joined through single bridge qubits placed
    /// every fourth column, offset by two on odd lines. Qubits are numbered
    /// line by line, with each line followed by the bridges below it.
    pub fn heavy_hex(rows: u32, row_len: u32) -> Self {
        let mut edges = Vec::new();
        let mut row_start = Vec::with_capacity(rows as usize);
        let mut next = 0;
        let mut pending_bridges: Vec<(u32, u32)> = Vec::new();

        for r in 0..rows {
            row_start.push(next);
            for c in 1..row_len {
                edges.push((next + c - 1, next + c));
            }
            for (bridge, col) in pending_bridges.drain(..) {
                edges.push((bridge, next + col));
            }
            next += row_len;

            if r + 1 < rows {
                let offset = if r % 2 == 0 { 0 } else { 2 };
                for col in (offset..row_len).step_by(4) {
                    edges.push((row_start[r as usize] + col, next));
                    pending_bridges.push((next, col));
                    next += 1;
                }
            }
        }
        Self::from_edges(next, edges)
    }

    /// Check if two qubits are directly connected.
    #[inline]
    pub fn is_connected(&self, q1: u32, q2: u32) -> bool {
        self.adjacency
            .get(q1 as usize)
            .is_some_and(|neighbors| neighbors.contains(&q2))
    }

    /// Get the number of physical qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the coupling edges, each as `(low, high)`.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Neighbours of a qubit in ascending order.
    pub fn neighbors(&self, qubit: u32) -> &[u32] {
        self.adjacency.get(qubit as usize).map_or(&[][..], Vec::as_slice)
    }

    /// Shortest-path distance in edges, `None` when unreachable.
    pub fn distance(&self, from: u32, to: u32) -> Option<u32> {
        let n = self.num_qubits;
        if from >= n || to >= n {
            return None;
        }
        let d = self.dist[(from * n + to) as usize];
        (d != UNREACHABLE).then_some(d)
    }

    /// Qubits on a shortest path from `from` to `to`, both ends included.
    pub fn shortest_path(&self, from: u32, to: u32) -> Option<Vec<u32>> {
        self.distance(from, to)?;
        let row = (from * self.num_qubits) as usize;
        let mut path = vec![to];
        let mut current = to;
        while current != from {
            current = self.pred[row + current as usize];
            path.push(current);
        }
        path.reverse();
        Some(path)
    }

    /// The qubit with the smallest eccentricity; ties go to the lowest index.
    pub fn center(&self) -> Option<u32> {
        let n = self.num_qubits as usize;
        (0..self.num_qubits).min_by_key(|&q| {
            let row = q as usize * n;
            self.dist[row..row + n].iter().copied().max().unwrap_or(0)
        })
    }

    /// The qubit with the largest eccentricity; ties go to the lowest index.
    ///
    /// On a line or grid this is the lowest-numbered corner.
    pub fn periphery(&self) -> Option<u32> {
        let n = self.num_qubits as usize;
        (0..self.num_qubits).rev().max_by_key(|&q| {
            let row = q as usize * n;
            self.dist[row..row + n]
                .iter()
                .copied()
                .filter(|&d| d != UNREACHABLE)
                .max()
                .unwrap_or(0)
        })
    }

    /// Qubits in depth-first preorder from `start`, visiting neighbours in
    /// ascending order. Unreachable qubits are left out.
    ///
    /// Consecutive entries are usually adjacent: a line is walked end to
    /// end and a grid row by row in a snake.
    pub fn dfs_order(&self, start: u32) -> Vec<u32> {
        let mut seen = vec![false; self.num_qubits as usize];
        let mut order = Vec::with_capacity(self.num_qubits as usize);
        let mut stack = Vec::new();
        if start < self.num_qubits {
            stack.push(start);
        }
        while let Some(q) = stack.pop() {
            if std::mem::replace(&mut seen[q as usize], true) {
                continue;
            }
            order.push(q);
            stack.extend(
                self.neighbors(q)
                    .iter()
                    .rev()
                    .copied()
                    .filter(|&next| !seen[next as usize]),
            );
        }
        order
    }

    /// Qubits in breadth-first order from `start`, visiting neighbours in
    /// ascending order. Unreachable qubits are left out.
    pub fn bfs_order(&self, start: u32) -> Vec<u32> {
        let mut seen = vec![false; self.num_qubits as usize];
        let mut order = Vec::with_capacity(self.num_qubits as usize);
        let mut queue = VecDeque::new();
        if let Some(flag) = seen.get_mut(start as usize) {
            *flag = true;
            queue.push_back(start);
        }
        while let Some(q) = queue.pop_front() {
            order.push(q);
            for &next in self.neighbors(q) {
                if !seen[next as usize] {
                    seen[next as usize] = true;
                    queue.push_back(next);
                }
            }
        }
        order
    }
}

/// Basis gates for the target device.
///
/// Measure, reset and barrier are always allowed and never listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisGates {
    gates: Vec<GateType>,
}

impl BasisGates {
    /// Create a new basis gates set.
    pub fn new(gates: impl IntoIterator<Item = GateType>) -> Self {
        let mut gates: Vec<GateType> = gates.into_iter().collect();
        gates.dedup();
        Self { gates }
    }

    /// Check if a gate type is in the basis.
    pub fn contains(&self, gate: GateType) -> bool {
        self.gates.contains(&gate)
    }

    /// Get the basis gates.
    pub fn gates(&self) -> &[GateType] {
        &self.gates
    }

    /// Whether single-qubit gates can be synthesized as rz/sx/x.
    pub fn supports_zsx(&self) -> bool {
        self.contains(GateType::Rz) && self.contains(GateType::SX) && self.contains(GateType::X)
    }

    /// The first two-qubit gate in the basis.
    pub fn two_qubit_gate(&self) -> Option<GateType> {
        self.gates.iter().copied().find(|g| g.num_qubits() == 2)
    }

    /// RZ + SX + X + CZ.
    pub fn zsx_cz() -> Self {
        Self::new([GateType::Rz, GateType::SX, GateType::X, GateType::CZ])
    }

    /// RZ + SX + X + CX.
    pub fn zsx_cx() -> Self {
        Self::new([GateType::Rz, GateType::SX, GateType::X, GateType::CX])
    }
}

/// Properties shared between compilation passes.
///
/// # Custom Properties
///
/// Passes can store arbitrary data using the type-safe [`insert`](Self::insert)
/// and [`get`](Self::get) methods. Each type can have at most one value stored.
#[derive(Debug, Default)]
pub struct PropertySet {
    /// Qubit layout mapping (logical → physical).
    ///
    /// Set by layout passes, updated by routing.
    pub layout: Option<Layout>,

    /// Target coupling map, shared with the [`Target`](crate::Target) it came from.
    pub coupling_map: Option<Arc<CouplingMap>>,

    /// Target basis gates for gate decomposition.
    pub basis_gates: Option<BasisGates>,

    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a property set with target configuration.
    #[must_use]
    pub fn with_target(
        mut self,
        coupling_map: impl Into<Arc<CouplingMap>>,
        basis_gates: BasisGates,
    ) -> Self {
        self.coupling_map = Some(coupling_map.into());
        self.basis_gates = Some(basis_gates);
        self
    }

    /// Set the layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Insert a custom property.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }
}
