//! # HTTP Request Handlers
//!
//! Axum handlers organized by feature domain.
//!
//! - **[`health`]**: liveness check
//!   - `GET /api/health` - process and database status
//!
//! Handlers take what they need from [`AppState`](crate::AppState) through
//! `FromRef`, e.g. `State(db): State<Database>`.

pub mod health;
