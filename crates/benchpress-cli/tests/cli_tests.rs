//! End-to-end tests of the `benchpress` binary.
//!
//! Each test writes its own configuration file into a temporary directory
//! and clears `BENCHPRESS_*` variables so the host environment cannot leak in.

use std::path::Path;
use std::process::{Command, Output};

const ENV_VARS: [&str; 6] = [
    "BENCHPRESS_CONFIG",
    "BENCHPRESS_BACKEND",
    "BENCHPRESS_QASM_ROOT",
    "BENCHPRESS_OPT_LEVEL",
    "BENCHPRESS_ROUNDS",
    "BENCHPRESS_WARMUP",
];

fn benchpress(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_benchpress"));
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd.args(args);
    cmd
}

fn write_config(dir: &Path, backend: &str) -> String {
    let path = dir.join("benchpress.yaml");
    let yaml = format!(
        "backend: {backend}\nqasm_root: {}\noptions:\n  optimization_level: 1\nbenchmark:\n  rounds: 1\n  warmup_rounds: 0\n",
        dir.join("qasm").display()
    );
    std::fs::write(&path, yaml).unwrap();
    path.to_string_lossy().into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_backends_lists_presets() {
    let output = benchpress(&["backends"]).output().unwrap();
    assert!(output.status.success());
    let text = stdout(&output);
    for name in ["heavy_hex_cz", "heavy_hex_cx", "square_grid_cz", "linear_cx", "full_cx"] {
        assert!(text.contains(name), "missing {name} in:\n{text}");
    }
    assert!(text.contains("(default)"));
}

#[test]
fn test_fixtures_writes_every_family() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let out_arg = out.to_string_lossy().into_owned();
    let config = write_config(dir.path(), "heavy_hex_cz");

    let output = benchpress(&["--config", &config, "fixtures", "--qubits", "9", "--out", &out_arg])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    for rel in [
        "qft/qft_N9.qasm",
        "qv/qv_N9_12345.qasm",
        "qaoa/qaoa_barabasi_albert_N9_3reps.qasm",
        "square-heisenberg/square_heisenberg_N9.qasm",
    ] {
        assert!(out.join(rel).is_file(), "missing {rel}");
    }
}

#[test]
fn test_run_writes_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "heavy_hex_cx");
    let report = dir.path().join("report.json");
    let report_arg = report.to_string_lossy().into_owned();

    let output = benchpress(&[
        "--config", &config, "run", "--qubits", "9", "--filter", "BV", "--json", &report_arg,
    ])
    .output()
    .unwrap();
    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("BVlike_simplification_transpile"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["backend"], "heavy_hex_cx");
    assert_eq!(json["optimization_level"], 1);
    let benchmarks = json["benchmarks"].as_array().unwrap();
    assert_eq!(benchmarks.len(), 2);
    for bench in benchmarks {
        assert!(bench["extra_info"]["gate_count_2q"].is_u64());
        assert!(bench["extra_info"]["depth_2q"].is_u64());
        assert_eq!(bench["stats"]["rounds"], 1);
    }
    assert!(json["failures"].as_array().unwrap().is_empty());
}

#[test]
fn test_run_fails_on_missing_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "heavy_hex_cz");

    let output = benchpress(&["--config", &config, "run", "--qubits", "9", "--filter", "QFT"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("QFT_100_transpile"));
}

#[test]
fn test_run_with_generated_fixtures_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "square_grid_cz");

    let fixtures = benchpress(&["--config", &config, "fixtures", "--qubits", "9"])
        .output()
        .unwrap();
    assert!(fixtures.status.success(), "{fixtures:?}");

    let output = benchpress(&["--config", &config, "run", "--qubits", "9", "--filter", "QFT"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
}

#[test]
fn test_run_rejects_unknown_backend() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "heavy_hex_cz");

    let output = benchpress(&["--config", &config, "run", "--backend", "ion_trap"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ion_trap"));
}

#[test]
fn test_run_rejects_empty_selection() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "heavy_hex_cz");

    let output = benchpress(&["--config", &config, "run", "--filter", "nothing-matches"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No scenarios match"));
}
