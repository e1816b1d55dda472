//! # Web Library
//!
//! HTTP handlers, middleware, and server startup for the finance backend.
//!
//! ## Endpoints
//!
//! ```text
//! GET /api/health  →  200 {"status":"ok"|"degraded","database":"connected"|"disconnected"}
//! ```

pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::{create_router, init_tracing, serve, start_server, AppState};
