//! Benchmarks for circuit construction, cloning and metrics
//!
//! Run with: cargo bench -p benchpress-ir

use benchpress_ir::{Circuit, GateType, QubitId};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Brickwork of rz layers and cz pairs.
fn layered(num_qubits: u32, layers: u32) -> Circuit {
    let mut circuit = Circuit::with_size("bench", num_qubits, 0);
    for layer in 0..layers {
        for i in 0..num_qubits {
            circuit.rz(0.1 * f64::from(i), QubitId(i)).unwrap();
        }
        for i in ((layer % 2)..num_qubits.saturating_sub(1)).step_by(2) {
            circuit.cz(QubitId(i), QubitId(i + 1)).unwrap();
        }
    }
    circuit
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for num_qubits in &[10, 50, 100] {
        group.bench_with_input(
            BenchmarkId::new("layered_10", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| black_box(layered(n, 10)));
            },
        );
    }

    group.finish();
}

/// Cloning sits inside every timed transpile repetition.
fn bench_clone(c: &mut Criterion) {
    let mut group = c.benchmark_group("clone");

    for num_qubits in &[10, 50, 100] {
        let circuit = layered(*num_qubits, 20);
        group.bench_with_input(
            BenchmarkId::new("layered_20", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(circuit.clone()));
            },
        );
    }

    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");

    for num_qubits in &[10, 50, 100] {
        let circuit = layered(*num_qubits, 20);

        group.bench_with_input(
            BenchmarkId::new("n_gates_of_type", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(circuit.n_gates_of_type(GateType::CZ)));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("depth_by_type", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(circuit.depth_by_type(GateType::CZ)));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("depth", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(circuit.depth()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_construction, bench_clone, bench_metrics);

criterion_main!(benches);
