// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use belegzuordnung::{logging, Settings, UserRole, APP_TITLE, VERSION};

/// Receipt matching assistant for tax office clerks and their clients
#[derive(Debug, Parser)]
#[command(name = "belegzuordnung", version, about)]
struct Cli {
    /// Optional TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Persona to start with (tax-clerk or client)
    #[arg(short, long)]
    role: Option<UserRole>,

    /// Open this path instead of the persona's start page
    #[arg(short, long)]
    path: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(role) = cli.role {
        settings.role = role;
    }

    logging::init_file(&settings.log.filter, &settings.log.file)?;
    tracing::info!(version = VERSION, role = %settings.role, "Starting {}", APP_TITLE);

    run_ui_mode(settings, cli.path)
}

#[cfg(feature = "tui")]
fn run_ui_mode(settings: Settings, path: Option<String>) -> Result<()> {
    let mut app = ui::App::new(settings, path.as_deref());
    ui::run_ui(&mut app)?;

    tracing::info!("UI closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_settings: Settings, _path: Option<String>) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin belegzuordnung-server --features server");
    std::process::exit(1);
}
