//! Shared helpers for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};

use benchpress_bench::Configuration;

/// Load the configuration, from `path` when given.
pub fn load_config(path: Option<&Path>) -> Result<Configuration> {
    Configuration::load(path).with_context(|| match path {
        Some(p) => format!("Failed to load configuration from {}", p.display()),
        None => "Failed to load configuration".to_string(),
    })
}

/// Format a duration in seconds with a unit that keeps it readable.
pub fn format_seconds(secs: f64) -> String {
    if secs >= 1.0 {
        format!("{secs:.3} s")
    } else if secs >= 1e-3 {
        format!("{:.3} ms", secs * 1e3)
    } else {
        format!("{:.3} µs", secs * 1e6)
    }
}
