//! # Finance Backend
//!
//! Thin entry point that delegates to lib-web for server setup.
//!
//! Startup failures (invalid environment, unreachable database, port in use)
//! are logged and terminate the process with exit code 1.

use lib_core::Config;
use lib_web::{init_tracing, start_server};

#[tokio::main]
async fn main() {
    // Only ./.env is read, never a parent directory's. The real environment wins.
    dotenvy::from_path(".env").ok();

    if let Err(e) = init_tracing() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }

    tracing::info!(phase = "created", "FINANCE BACKEND STARTING");

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid environment, refusing to start");
            std::process::exit(1);
        }
    };

    if let Err(e) = start_server(config).await {
        tracing::error!("Server startup failed: {e:#}");
        std::process::exit(1);
    }
}
