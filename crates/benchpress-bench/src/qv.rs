//! Quantum Volume model circuits.
//!
//! A QV circuit of width `w` has `w` layers. Each layer pairs the qubits at
//! random and applies a generic two-qubit block to every pair. The block is
//! the three-CX form of an arbitrary SU(4): u3 on both qubits, then three
//! rounds of cx followed by u3 on both qubits.

use std::f64::consts::PI;

use benchpress_ir::{Circuit, IrResult, QubitId};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seed used for the bundled QV fixtures.
pub const QV_FIXTURE_SEED: u64 = 12345;

/// Generate a QV circuit of the given width from `seed`, measured at the end.
pub fn generate_qv_circuit(width: u32, seed: u64) -> IrResult<Circuit> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut circuit = Circuit::with_size(format!("qv_N{width}_{seed}"), width, width);

    for _layer in 0..width {
        let mut available: Vec<u32> = (0..width).collect();
        while available.len() >= 2 {
            let q1 = available.remove(rng.gen_range(0..available.len()));
            let q2 = available.remove(rng.gen_range(0..available.len()));
            su4_block(&mut circuit, &mut rng, QubitId(q1), QubitId(q2))?;
        }
    }

    circuit.measure_all()?;
    Ok(circuit)
}

fn su4_block(
    circuit: &mut Circuit,
    rng: &mut SmallRng,
    a: QubitId,
    b: QubitId,
) -> IrResult<()> {
    random_u3(circuit, rng, a)?;
    random_u3(circuit, rng, b)?;
    for _ in 0..3 {
        circuit.cx(a, b)?;
        random_u3(circuit, rng, a)?;
        random_u3(circuit, rng, b)?;
    }
    Ok(())
}

fn random_u3(circuit: &mut Circuit, rng: &mut SmallRng, qubit: QubitId) -> IrResult<()> {
    let theta = rng.gen_range(0.0..PI);
    let phi = rng.gen_range(0.0..2.0 * PI);
    let lambda = rng.gen_range(0.0..2.0 * PI);
    circuit.u(theta, phi, lambda, qubit)?;
    Ok(())
}
