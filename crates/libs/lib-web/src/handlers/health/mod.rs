//! # Health Check Handler
//!
//! Liveness endpoint reporting the process status together with the
//! database check.
//!
//! ```text
//! GET /api/health
//! 200 {"status":"ok","database":"connected"}
//! 200 {"status":"degraded","database":"disconnected"}
//! ```
//!
//! The response is always `200 OK`. A failing database is reported in the body
//! only, so orchestrators using this as a liveness check do not restart a
//! process that is merely waiting on its storage.


use axum::{extract::State, Json};
use lib_core::Database;
use serde::{Deserialize, Serialize};

/// Overall service status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Ok,
    Degraded,
}

/// Result of the database check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    Connected,
    Disconnected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub database: DatabaseStatus,
}

impl HealthResponse {
    pub fn from_database_check(database_ok: bool) -> Self {
        if database_ok {
            Self {
                status: ServiceStatus::Ok,
                database: DatabaseStatus::Connected,
            }
        } else {
            Self {
                status: ServiceStatus::Degraded,
                database: DatabaseStatus::Disconnected,
            }
        }
    }
}

/// `GET /api/health`
pub async fn health_check(State(db): State<Database>) -> Json<HealthResponse> {
    let response = HealthResponse::from_database_check(db.health_check().await);

    if response.status == ServiceStatus::Degraded {
        tracing::warn!("Health check degraded: database disconnected");
    }

    Json(response)
}
