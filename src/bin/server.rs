//! PFI HTTP Server Binary
//!
//! This is the main entry point for the PFI REST API server. It opens a
//! session with the compute backend, resolves the asset registry, sets up
//! the HTTP router and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the local (in-memory) backend (default)
//! cargo run --bin pfi-server --features "local-backend,http-server"
//!
//! # Run against the remote compute service
//! EE_PROJECT=ee-unipvgee \
//! EE_SERVICE_ACCOUNT_KEY=/path/to/key.json \
//!   cargo run --bin pfi-server --features "ee-backend,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `EE_PROJECT`, `EE_BASE_URL`, `EE_SERVICE_ACCOUNT_KEY`, `EE_ACCESS_TOKEN`:
//!   Remote service configuration (required for the ee-backend feature)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use pfi_rust::catalog::AssetRegistry;
use pfi_rust::http::{create_router, AppState};
use pfi_rust::remote::GeoComputeClient;

// Backend selection priority: ee-backend > local-backend.
#[cfg(feature = "ee-backend")]
async fn create_selected_backend() -> anyhow::Result<Arc<dyn GeoComputeClient>> {
    use pfi_rust::remote::{BackendFactory, RemoteConfig};

    let config = RemoteConfig::from_env().map_err(anyhow::Error::msg)?;
    let backend = BackendFactory::create_earth_engine(&config).await?;
    Ok(backend as Arc<dyn GeoComputeClient>)
}

#[cfg(all(feature = "local-backend", not(feature = "ee-backend")))]
async fn create_selected_backend() -> anyhow::Result<Arc<dyn GeoComputeClient>> {
    use pfi_rust::remote::BackendFactory;

    Ok(BackendFactory::create_local())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting PFI HTTP Server");

    // Open the compute session and resolve the asset registry once;
    // both are reused for the life of the process.
    let client = create_selected_backend().await?;
    let registry = AssetRegistry::resolve(client.as_ref()).await?;
    info!("Compute backend ready, {} layers resolved", registry.layers().len());

    // Create application state
    let state = AppState::new(client, registry);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("API documentation: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
