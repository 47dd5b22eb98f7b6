//! joia-ui - Karaoke Library UI service
//!
//! Serves the shared karaoke song library over HTTP: ordered and filtered
//! listing, validated inserts, and the creation workflow against the
//! external video-to-karaoke processor (submit, poll, reconcile into the
//! library).

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use joia_common::config::{RootFolderInitializer, RootFolderResolver};
use joia_ui::config::{resolve_backend_url, TomlConfig};
use joia_ui::jobs::client::KaraokeClient;
use joia_ui::jobs::poller::POLL_INTERVAL;
use joia_ui::AppState;

#[derive(Parser, Debug)]
#[command(name = "joia-ui", about = "Joia karaoke library UI service", version)]
struct Args {
    /// Path to the TOML config file (default: ~/.config/joia/joia-ui.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP port override
    #[arg(long)]
    port: Option<u16>,

    /// Root folder override (library database location)
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Karaoke service base URL override
    #[arg(long)]
    backend_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Bootstrap config before tracing so the configured level can seed the
    // filter; RUST_LOG still wins.
    let config_path = args.config.clone().unwrap_or_else(TomlConfig::default_path);
    let config = TomlConfig::load(&config_path)
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        "Starting Joia Library UI (joia-ui) v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Config file: {}", config_path.display());

    // Resolve root folder and open the library database
    let root_folder = if let Some(path) = args.root_folder {
        info!("Root folder: {} (from CLI override)", path.display());
        path
    } else if let Some(path) = &config.root_folder {
        info!("Root folder: {} (from TOML config)", path.display());
        path.clone()
    } else {
        let resolved = RootFolderResolver::new("joia-ui").resolve();
        info!("Root folder: {} (resolved)", resolved.display());
        resolved
    };

    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .map_err(|e| anyhow::anyhow!("Failed to initialize root folder: {}", e))?;

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());

    let db_pool = joia_ui::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Karaoke service client
    let backend_url = resolve_backend_url(args.backend_url.as_deref(), &config);
    let karaoke = Arc::new(KaraokeClient::new(&backend_url)?);

    // Application state and router
    let state = AppState::new(db_pool, karaoke, POLL_INTERVAL);
    let app = joia_ui::build_router(state);

    // Start server
    let port = args.port.unwrap_or(config.port);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
