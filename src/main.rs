//! # Yatube
//!
//! Application entry point. Initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Storage, page cache and media backends
//! - HTTP server

use anyhow::Result;
use tracing::info;

use yatube::config::Settings;
use yatube::presentation::http::handlers::health;
use yatube::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    yatube::telemetry::init_tracing();

    info!("Starting Yatube...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        storage = ?settings.storage.backend,
        cache = ?settings.cache.backend,
        "Configuration loaded"
    );

    health::init_server_start();
    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
