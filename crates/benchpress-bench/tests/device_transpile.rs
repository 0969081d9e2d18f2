//! Scenario behaviour against generated fixtures.

use std::path::Path;

use benchpress_bench::{
    BenchError, Configuration, DEPTH_2Q, DeviceTranspile, FixtureFamily, GATE_COUNT_2Q, Report,
    ScenarioOutcome, Suite, run_workout,
};

const QUBITS: u32 = 9;

fn config(root: &Path, backend: &str, level: u8) -> Configuration {
    let mut config = Configuration::default();
    config.backend = backend.to_string();
    config.qasm_root = root.to_path_buf();
    config.options.optimization_level = level;
    config.benchmark.rounds = 2;
    config.benchmark.warmup_rounds = 1;
    config
}

fn suite_with_fixtures(backend: &str, level: u8) -> (tempfile::TempDir, DeviceTranspile) {
    let dir = tempfile::tempdir().unwrap();
    FixtureFamily::write_all(dir.path(), QUBITS).unwrap();
    let suite = DeviceTranspile::new(config(dir.path(), backend, level))
        .unwrap()
        .with_num_qubits(QUBITS);
    (dir, suite)
}

#[test]
fn test_every_scenario_passes_on_every_level() {
    for level in 0..=3 {
        let (_dir, suite) = suite_with_fixtures("heavy_hex_cz", level);
        let outcomes = run_workout(&suite, None).unwrap();
        assert_eq!(outcomes.len(), 7);
        for outcome in &outcomes {
            let record = outcome
                .record()
                .unwrap_or_else(|| panic!("level {level}: {outcome:?}"));
            assert!(record.metric_u64(GATE_COUNT_2Q).is_some());
            assert!(record.metric_u64(DEPTH_2Q).is_some());
            assert_eq!(record.stats.rounds, 2);
            assert_eq!(record.stats.warmup_rounds, 1);
            assert!(record.stats.min <= record.stats.max);
        }
    }
}

#[test]
fn test_qft_fixture_end_to_end() {
    for backend in ["heavy_hex_cz", "linear_cx", "square_grid_cz"] {
        let (_dir, suite) = suite_with_fixtures(backend, 2);
        let record = suite.qft_100_transpile().unwrap();
        let gate_count = record.metric_u64(GATE_COUNT_2Q).unwrap();
        let depth = record.metric_u64(DEPTH_2Q).unwrap();
        // 36 entangling controlled phases.
        assert!(gate_count >= 36, "{backend}: {gate_count}");
        assert!(depth > 0 && depth <= gate_count, "{backend}: {depth}");
    }
}

#[test]
fn test_scenarios_are_repeatable() {
    let (_dir, suite) = suite_with_fixtures("square_grid_cz", 3);
    for name in suite.registered() {
        let prepared = suite.prepare(name).unwrap();
        let before = prepared.circuit().count_ops();

        let first = suite.measure(&prepared).unwrap();
        let second = suite.measure(&prepared).unwrap();
        assert_eq!(first.extra_info, second.extra_info, "{name}");
        assert_eq!(prepared.circuit().count_ops(), before, "{name}");
    }
}

#[test]
fn test_bvlike_collapses_above_level_zero() {
    for level in 1..=3 {
        let (_dir, suite) = suite_with_fixtures("heavy_hex_cx", level);
        let record = suite.bvlike_simplification_transpile().unwrap();
        assert_eq!(record.metric_u64(GATE_COUNT_2Q), Some(0), "level {level}");
        assert_eq!(record.metric_u64(DEPTH_2Q), Some(0), "level {level}");
    }
}

#[test]
fn test_missing_fixture_fails_during_setup() {
    let dir = tempfile::tempdir().unwrap();
    let suite = DeviceTranspile::new(config(dir.path(), "heavy_hex_cz", 1))
        .unwrap()
        .with_num_qubits(QUBITS);

    let result = suite.prepare("QFT_100_transpile");
    assert!(
        matches!(&result, Err(BenchError::Fixture { path, .. }) if path.ends_with("qft/qft_N9.qasm"))
    );

    // Generator scenarios still pass; fixture scenarios fail without a record.
    let report = Report::new("heavy_hex_cz", 1, run_workout(&suite, None).unwrap());
    assert_eq!(report.benchmarks.len(), 3);
    assert_eq!(report.failures.len(), 4);
    assert!(report.has_failures());
}

#[test]
fn test_malformed_fixture_is_a_parse_error() {
    let (dir, suite) = suite_with_fixtures("heavy_hex_cz", 1);
    let path = dir
        .path()
        .join("qv")
        .join(FixtureFamily::Qv.file_name(QUBITS));
    std::fs::write(&path, "OPENQASM 2.0;\nqreg q[2];\nmeasure q[0] -> c[0];\n").unwrap();
    assert!(matches!(
        suite.qv_100_transpile(),
        Err(BenchError::Parse { .. })
    ));
}

#[test]
fn test_filter_selects_scenarios() {
    let (_dir, suite) = suite_with_fixtures("full_cx", 1);
    let outcomes = benchpress_bench::run_workout(&suite, Some("BV")).unwrap();
    let names: Vec<&str> = outcomes.iter().map(ScenarioOutcome::name).collect();
    assert_eq!(names, vec!["BV_100_transpile", "BVlike_simplification_transpile"]);
}

#[test]
fn test_device_too_small_is_a_compile_failure() {
    let dir = tempfile::tempdir().unwrap();
    let suite = DeviceTranspile::new(config(dir.path(), "linear_cx", 1))
        .unwrap()
        .with_num_qubits(200);
    assert!(matches!(
        suite.bv_100_transpile(),
        Err(BenchError::Compile(_))
    ));
}

#[test]
fn test_unknown_backend() {
    let dir = tempfile::tempdir().unwrap();
    let result = DeviceTranspile::new(config(dir.path(), "ion_trap", 1));
    assert!(matches!(result, Err(BenchError::UnknownBackend(_))));
}

#[test]
fn test_empty_circuit_is_an_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    let suite = DeviceTranspile::new(config(dir.path(), "heavy_hex_cz", 2))
        .unwrap()
        .with_num_qubits(0);

    let result = suite.circ_su2_100_transpile();
    assert!(
        matches!(&result, Err(BenchError::EmptyResult { scenario }) if scenario == "circSU2_100_transpile"),
        "{result:?}"
    );

    let outcomes = run_workout(&suite, Some("circSU2")).unwrap();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].record().is_none());
    assert!(matches!(
        &outcomes[0],
        ScenarioOutcome::Failed {
            error: BenchError::EmptyResult { .. },
            ..
        }
    ));
}

#[test]
fn test_level_two_is_no_worse_than_level_one_on_a_line() {
    let dir = tempfile::tempdir().unwrap();
    let gate_count = |level| {
        let mut config = config(dir.path(), "linear_cx", level);
        config.benchmark.rounds = 1;
        config.benchmark.warmup_rounds = 0;
        DeviceTranspile::new(config)
            .unwrap()
            .circ_su2_100_transpile()
            .unwrap()
            .metric_u64(GATE_COUNT_2Q)
            .unwrap()
    };

    let level1 = gate_count(1);
    let level2 = gate_count(2);
    assert!(level2 <= level1, "level 1: {level1}, level 2: {level2}");
}
