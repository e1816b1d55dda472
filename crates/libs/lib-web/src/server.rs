//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! Startup is one linear sequence, each step logged with its `phase`:
//!
//! ```text
//! created → env-validated → db-initialized → middleware-registered → listening
//! ```
//!
//! Any failing step aborts startup with an error; the binary turns that into
//! exit code 1.

// region: --- Imports
use anyhow::Context;
use axum::{
    extract::FromRef,
    http::{header, HeaderValue, Method, Uri},
    routing::get,
    Router,
};
use lib_core::{AppError, Config, Database};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::handlers;
use crate::middleware::{log_requests, set_security_headers, stamp_req, RequestStamp};
// endregion: --- Imports

/// Address the listener binds to; the port comes from [`Config::port`].
pub const BIND_HOST: &str = "0.0.0.0";

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

// endregion: --- AppState

// region: --- Tracing
/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `LOG_LEVEL` (`trace`, `debug`, `info`,
/// `warn`, `error`, default `info`). `LOG_FORMAT=json` emits one JSON object
/// per line.
pub fn init_tracing() -> anyhow::Result<()> {
    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let level = match log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => log_level.as_str(),
        _ => "info",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to set global tracing subscriber: {e}"))?;

    info!(log_level = level, json, "Tracing initialized");
    Ok(())
}
// endregion: --- Tracing

// region: --- Server Setup
/// Open the database, register middleware, bind the listener, and serve
/// until SIGINT/SIGTERM.
///
/// # Errors
///
/// This function will return an error if:
/// - The database file cannot be opened
/// - The CORS origin is not a valid header value
/// - The listener cannot bind
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    info!(phase = "env-validated", config = ?config, "Configuration loaded");
    if config.is_production() && config.session_secret.is_none() {
        warn!("SESSION_SECRET is not set while NODE_ENV=production");
    }

    let db = Database::open(&config.database_path)
        .await
        .with_context(|| {
            format!("Failed to open database at {}", config.database_path.display())
        })?;
    info!(phase = "db-initialized", path = %config.database_path.display(), "Database ready");

    let port = config.port;
    let state = AppState {
        db: db.clone(),
        config,
    };

    let app = create_router(state).context("Failed to register middleware")?;
    info!(phase = "middleware-registered", "Security headers and CORS registered");

    let bind_address = format!("{BIND_HOST}:{port}");
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    serve(listener, app, db).await
}

/// Serve `app` on an already bound listener with graceful shutdown.
///
/// The database is closed once the server stops, whether it stopped cleanly
/// or not.
pub async fn serve(listener: TcpListener, app: Router, db: Database) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(phase = "listening", " SERVER READY: http://{}", addr);
    log_server_info();

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    db.close().await;
    result.context("HTTP server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// CORS policy allowing exactly one origin.
pub fn cors_layer(frontend_url: &str) -> lib_core::Result<CorsLayer> {
    let origin = HeaderValue::from_str(frontend_url).map_err(|_| {
        AppError::Config(format!("FRONTEND_URL is not a valid origin: {frontend_url}"))
    })?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

/// Create the main application router with all routes.
///
/// Layers, outermost first: security headers, CORS, request stamping,
/// trace span, request logging.
pub fn create_router(state: AppState) -> lib_core::Result<Router> {
    let cors = cors_layer(&state.config.frontend_url)?;

    info!("[ROUTE SETUP] Registering HTTP routes...");
    let app = Router::new()
        .route("/api/health", get(handlers::health::health_check))
        .fallback(not_found)
        .with_state(state)
        .layer(axum::middleware::from_fn(log_requests))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .extensions()
                    .get::<RequestStamp>()
                    .map(|s| s.id.clone())
                    .unwrap_or_else(|| "unknown".to_string());
                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(axum::middleware::from_fn(stamp_req))
        .layer(cors)
        .layer(axum::middleware::from_fn(set_security_headers));

    Ok(app)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route not found: {}", uri.path()))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// Log server information
fn log_server_info() {
    info!(" HEALTH:");
    info!("   • GET  /api/health");
}
// endregion: --- Server Setup
