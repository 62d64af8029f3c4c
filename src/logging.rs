// 📝 Tracing setup
//
// RUST_LOG wins over the configured filter. The terminal UI writes to a file
// so the alternate screen stays clean; the server logs to stderr.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn env_filter(default_filter: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("Invalid log filter: {}", default_filter)),
    }
}

/// Append plain-text logs to `path`
pub fn init_file(default_filter: &str, path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter(default_filter)?)
        .with(fmt::layer().with_writer(file).with_ansi(false))
        .try_init()
        .context("Tracing subscriber already installed")?;

    Ok(())
}

pub fn init_stderr(default_filter: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(default_filter)?)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init()
        .context("Tracing subscriber already installed")?;

    Ok(())
}
