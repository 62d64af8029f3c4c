// Belegzuordnung - Web Server
// REST API with Axum over the shared page logic

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use belegzuordnung::api::{router, AppState};
use belegzuordnung::{logging, Settings, APP_TITLE, VERSION};

/// JSON API of the receipt matching assistant
#[derive(Debug, Parser)]
#[command(name = "belegzuordnung-server", version, about)]
struct Cli {
    /// Optional TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the settings
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(bind) = cli.bind {
        settings.server.bind = bind;
    }

    logging::init_stderr(&settings.log.filter)?;

    let bind = settings.server.bind.clone();
    let app = router(AppState::new(settings));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    tracing::info!(version = VERSION, address = %bind, "🚀 {} API listening", APP_TITLE);
    println!("🚀 Server running on http://{}", bind);
    println!("📊 API endpoints:");
    println!("   GET  /api/health");
    println!("   GET  /api/role              PUT /api/role");
    println!("   GET  /api/clients           GET /api/clients/:id");
    println!("   GET  /api/clients/:id/matching");
    println!("   POST /api/clients/:id/matching/requests");
    println!("   GET  /api/inbox");
    println!("   GET  /api/mandant/dashboard");
    println!("   GET  /api/mandant/transactions");
    println!("   POST /api/mandant/transactions/:id/upload");
    println!("   GET  /api/mandant/receipts      POST /api/mandant/receipts");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
