//! Deterministic circuit generators used by the scenarios and the fixture
//! writer.
//!
//! Every generator is a pure function of its arguments. Randomized circuits
//! draw from a `SmallRng` seeded with a fixed value, so two calls with the
//! same arguments build identical circuits.

use std::f64::consts::PI;

use benchpress_ir::{Circuit, ClbitId, IrError, IrResult, QubitId, StandardGate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seed for the circSU2 rotation angles.
pub const CIRC_SU2_SEED: u64 = 42;

/// Seed for the QAOA graph and angles.
pub const QAOA_SEED: u64 = 0;

/// Bernstein-Vazirani with the all-ones secret.
///
/// Qubits `0..n-1` hold the data and qubit `n-1` is the ancilla. Only the
/// data qubits are measured.
pub fn bv_all_ones(n: u32) -> IrResult<Circuit> {
    let data = n.saturating_sub(1);
    let ancilla = QubitId(data);
    let mut circuit = Circuit::with_size(format!("bv_all_ones_{n}"), n, data);

    circuit.x(ancilla)?;
    for q in 0..n {
        circuit.h(QubitId(q))?;
    }
    for q in 0..data {
        circuit.cx(QubitId(q), ancilla)?;
    }
    for q in 0..data {
        circuit.h(QubitId(q))?;
    }
    for q in 0..data {
        circuit.measure(QubitId(q), ClbitId(q))?;
    }
    Ok(circuit)
}

/// Hardware-efficient SU(2) ansatz with circular CX entanglement.
///
/// `reps` layers of Ry, Rz, then CX(n-1, 0) followed by the CX chain, and a
/// closing Ry and Rz layer.
pub fn circ_su2(n: u32, reps: u32) -> IrResult<Circuit> {
    let mut rng = SmallRng::seed_from_u64(CIRC_SU2_SEED);
    let mut circuit = Circuit::with_size(format!("circ_su2_{n}_{reps}"), n, 0);

    let mut rotations = |circuit: &mut Circuit| -> IrResult<()> {
        for q in 0..n {
            circuit.ry(rng.gen_range(0.0..2.0 * PI), QubitId(q))?;
        }
        for q in 0..n {
            circuit.rz(rng.gen_range(0.0..2.0 * PI), QubitId(q))?;
        }
        Ok(())
    };

    for _ in 0..reps {
        rotations(&mut circuit)?;
        if n >= 2 {
            circuit.cx(QubitId(n - 1), QubitId(0))?;
            for q in 0..n - 1 {
                circuit.cx(QubitId(q), QubitId(q + 1))?;
            }
        }
    }
    rotations(&mut circuit)?;
    Ok(circuit)
}

/// A CX ladder into the last qubit, X on it and Z on its neighbour, then
/// the ladder mirrored.
///
/// The X commutes through every CX target and the Z through the CX control
/// on qubit `n-2`, so an optimizer can remove every CX and leave one X and
/// one Z. Requires `n >= 2`.
pub fn trivial_bvlike_circuit(n: u32) -> IrResult<Circuit> {
    let Some(neighbour) = n.checked_sub(2) else {
        return Err(IrError::QubitNotFound {
            qubit: QubitId(1),
            gate_name: Some("z".into()),
        });
    };
    let target = QubitId(n - 1);
    let mut circuit = Circuit::with_size(format!("trivial_bvlike_{n}"), n, 0);

    for k in 0..n - 1 {
        circuit.cx(QubitId(k), target)?;
    }
    circuit.x(target)?.z(QubitId(neighbour))?;
    for k in (0..n - 1).rev() {
        circuit.cx(QubitId(k), target)?;
    }
    Ok(circuit)
}

/// Quantum Fourier transform: H and controlled-phase ladder, bit-reversal
/// swaps, then a measurement of every qubit.
pub fn qft(n: u32) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size(format!("qft_N{n}"), n, n);
    for i in 0..n {
        circuit.h(QubitId(i))?;
        for j in i + 1..n {
            // Angles below 2^-62 pi are kept as 2^-62 pi.
            let angle = PI / 2_f64.powi((j - i).min(62) as i32);
            circuit.cp(angle, QubitId(j), QubitId(i))?;
        }
    }
    for i in 0..n / 2 {
        circuit.swap(QubitId(i), QubitId(n - 1 - i))?;
    }
    circuit.measure_all()?;
    Ok(circuit)
}

/// Edges of a Barabási–Albert graph with one edge per new node.
///
/// Nodes 0 and 1 start connected. Each further node attaches to an existing
/// node chosen with probability proportional to its degree.
pub fn barabasi_albert_edges(n: u32, rng: &mut SmallRng) -> Vec<(u32, u32)> {
    if n < 2 {
        return Vec::new();
    }
    let mut edges = vec![(0, 1)];
    // Each node appears once per incident edge.
    let mut endpoints = vec![0, 1];
    for node in 2..n {
        let partner = endpoints[rng.gen_range(0..endpoints.len())];
        edges.push((partner, node));
        endpoints.push(partner);
        endpoints.push(node);
    }
    edges
}

/// QAOA MaxCut ansatz on a seeded Barabási–Albert graph.
///
/// H on every qubit, then `reps` rounds of rzz on every edge and an rx
/// mixer, then a measurement of every qubit.
pub fn qaoa_barabasi_albert(n: u32, reps: u32) -> IrResult<Circuit> {
    let mut rng = SmallRng::seed_from_u64(QAOA_SEED);
    let edges = barabasi_albert_edges(n, &mut rng);
    let mut circuit = Circuit::with_size(format!("qaoa_barabasi_albert_N{n}_{reps}reps"), n, n);

    for q in 0..n {
        circuit.h(QubitId(q))?;
    }
    for _ in 0..reps {
        let gamma: f64 = rng.gen_range(0.0..PI);
        let beta: f64 = rng.gen_range(0.0..PI);
        for &(a, b) in &edges {
            circuit.rzz(2.0 * gamma, QubitId(a), QubitId(b))?;
        }
        for q in 0..n {
            circuit.rx(2.0 * beta, QubitId(q))?;
        }
    }
    circuit.measure_all()?;
    Ok(circuit)
}

/// Interaction edges of `n` qubits laid out row-major on a square lattice
/// of side `ceil(sqrt(n))`, grouped into the four layers even-horizontal,
/// odd-horizontal, even-vertical and odd-vertical.
pub fn square_lattice_layers(n: u32) -> [Vec<(u32, u32)>; 4] {
    let mut side = 0;
    while side * side < n {
        side += 1;
    }
    let mut layers: [Vec<(u32, u32)>; 4] = Default::default();
    for q in 0..n {
        let (row, col) = (q / side.max(1), q % side.max(1));
        if col + 1 < side && q + 1 < n {
            layers[(col % 2) as usize].push((q, q + 1));
        }
        if q + side < n {
            layers[2 + (row % 2) as usize].push((q, q + side));
        }
    }
    layers
}

/// One Trotter step of the Heisenberg model on a square lattice: rxx, ryy
/// and rzz on every edge, layer by layer.
pub fn square_heisenberg(n: u32) -> IrResult<Circuit> {
    const THETA: f64 = 0.2;
    let mut circuit = Circuit::with_size(format!("square_heisenberg_N{n}"), n, 0);
    for layer in square_lattice_layers(n) {
        for (a, b) in layer {
            let pair = [QubitId(a), QubitId(b)];
            circuit
                .gate(StandardGate::RXX(THETA), pair)?
                .gate(StandardGate::RYY(THETA), pair)?
                .gate(StandardGate::RZZ(THETA), pair)?;
        }
    }
    Ok(circuit)
}
