//! Backends command implementation.

use anyhow::Result;
use console::style;

use benchpress_compile::Target;

/// Execute the backends command.
pub fn execute() -> Result<()> {
    println!("{} Available backends:\n", style("benchpress").cyan().bold());

    let default = Target::default();
    for target in Target::presets() {
        let is_default = target.name() == default.name();
        println!(
            "  {} {} {}",
            if is_default {
                style("●").green()
            } else {
                style("●").dim()
            },
            style(target.name()).bold(),
            if is_default { "(default)" } else { "" }
        );
        println!("    Qubits: {}", target.num_qubits());
        println!(
            "    Gates: {}",
            target
                .basis_gates()
                .gates()
                .iter()
                .map(|g| g.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("    Two-qubit gate: {}", target.two_q_gate_type().name());
        println!("    {}", style(target.description()).dim());
        println!();
    }

    Ok(())
}
