//! Fixtures command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use benchpress_bench::FixtureFamily;

use super::common::load_config;

/// Execute the fixtures command.
pub fn execute(config: Option<&Path>, qubits: u32, out: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let root = out.unwrap_or(config.qasm_root.as_path());

    println!(
        "{} Writing {}-qubit fixtures to {}",
        style("→").cyan().bold(),
        qubits,
        style(root.display()).green()
    );

    let paths = FixtureFamily::write_all(root, qubits)
        .with_context(|| format!("Failed to write fixtures under {}", root.display()))?;
    for path in &paths {
        println!("  {} {}", style("✓").green(), path.display());
    }

    Ok(())
}
