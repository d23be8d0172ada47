//! # lodge-server
//!
//! API server for the Lodge site and back office:
//! - **Cookie/JWT authentication** (register, login, logout, check-auth)
//! - **Content CRUD** for events and meetings behind one generic
//!   resource implementation
//! - **Image upload pass-through** to the external asset host
//! - **Credentialed CORS** restricted to the configured origins

use std::sync::{Arc, Mutex};

use tracing::info;
use tracing_subscriber::EnvFilter;

use lodge_server::api::{self, AppState};
use lodge_server::config::ServerConfig;
use lodge_server::upload::AssetHost;
use lodge_store::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,lodge_server=debug")),
        )
        .init();

    info!("Starting Lodge API server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(
        addr = %config.http_addr,
        open_contributions = config.open_contributions,
        origins = ?config.allowed_origins,
        "Loaded configuration"
    );

    // -----------------------------------------------------------------------
    // 3. Initialize subsystems
    // -----------------------------------------------------------------------

    // Database (runs migrations on open)
    let database = match &config.database_path {
        Some(path) => Database::open_at(path)?,
        None => Database::new()?,
    };

    // Asset host client for image uploads
    let asset_host = AssetHost::new(
        config.asset_host_url.clone(),
        config.asset_host_key.clone(),
    );

    let http_addr = config.http_addr;
    let state = AppState {
        db: Arc::new(Mutex::new(database)),
        asset_host: Arc::new(asset_host),
        config: Arc::new(config),
    };

    // -----------------------------------------------------------------------
    // 4. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
