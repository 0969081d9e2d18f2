//! benchpress command-line interface
//!
//! Runs the device transpile workout against a configured backend, writes
//! the QASM fixtures it reads, and lists the available backends.
//!
//! ```text
//! benchpress run --backend heavy_hex_cz --opt-level 2 --json report.json
//! benchpress fixtures --qubits 100 --out ./qasm
//! benchpress backends
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{backends, fixtures, run};

/// benchpress - quantum transpiler benchmarks
#[derive(Parser, Debug)]
#[command(name = "benchpress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML)
    #[arg(short, long, global = true, env = "BENCHPRESS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the device transpile workout
    Run {
        /// Only run scenarios whose name contains this string
        #[arg(short, long)]
        filter: Option<String>,

        /// Measured rounds per scenario
        #[arg(long)]
        rounds: Option<usize>,

        /// Warmup rounds per scenario
        #[arg(long)]
        warmup: Option<usize>,

        /// Optimization level (0-3)
        #[arg(long)]
        opt_level: Option<u8>,

        /// Target backend preset
        #[arg(short, long)]
        backend: Option<String>,

        /// Circuit width
        #[arg(long, default_value = "100")]
        qubits: u32,

        /// Write a JSON report to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Write the QASM fixtures
    Fixtures {
        /// Circuit width
        #[arg(long, default_value = "100")]
        qubits: u32,

        /// Output root (defaults to the configured qasm_root)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List available backends
    Backends,
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Ok(false) means some scenario failed.
    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Run {
            filter,
            rounds,
            warmup,
            opt_level,
            backend,
            qubits,
            json,
        } => run::execute(
            config,
            &run::RunArgs {
                filter,
                rounds,
                warmup,
                opt_level,
                backend,
                qubits,
                json,
            },
        ),

        Commands::Fixtures { qubits, out } => {
            fixtures::execute(config, qubits, out.as_deref()).map(|()| true)
        }

        Commands::Backends => backends::execute().map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_minimal() {
        let cli = Cli::try_parse_from(["benchpress", "run"]).unwrap();
        match cli.command {
            Commands::Run {
                filter,
                rounds,
                opt_level,
                qubits,
                json,
                ..
            } => {
                assert!(filter.is_none());
                assert!(rounds.is_none());
                assert!(opt_level.is_none());
                assert_eq!(qubits, 100);
                assert!(json.is_none());
            }
            _ => panic!("expected run"),
        }
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_run_with_all_args() {
        let cli = Cli::try_parse_from([
            "benchpress",
            "-vv",
            "run",
            "--filter",
            "QFT",
            "--rounds",
            "3",
            "--warmup",
            "0",
            "--opt-level",
            "3",
            "--backend",
            "linear_cx",
            "--qubits",
            "20",
            "--json",
            "out.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run {
                filter,
                rounds,
                warmup,
                opt_level,
                backend,
                qubits,
                json,
            } => {
                assert_eq!(filter.as_deref(), Some("QFT"));
                assert_eq!(rounds, Some(3));
                assert_eq!(warmup, Some(0));
                assert_eq!(opt_level, Some(3));
                assert_eq!(backend.as_deref(), Some("linear_cx"));
                assert_eq!(qubits, 20);
                assert_eq!(json, Some(PathBuf::from("out.json")));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["benchpress", "fixtures", "--config", "bp.yaml", "-o", "q"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("bp.yaml")));
        assert!(matches!(
            cli.command,
            Commands::Fixtures { qubits: 100, out: Some(_) }
        ));
    }

    #[test]
    fn test_parse_backends() {
        let cli = Cli::try_parse_from(["benchpress", "backends"]).unwrap();
        assert!(matches!(cli.command, Commands::Backends));
    }

    #[test]
    fn test_parse_rejects_bad_level() {
        assert!(Cli::try_parse_from(["benchpress", "run", "--opt-level", "high"]).is_err());
        assert!(Cli::try_parse_from(["benchpress"]).is_err());
    }
}
