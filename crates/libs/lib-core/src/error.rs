//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] used consistently
//! across all backend modules. It follows the `thiserror` pattern for ergonomic error handling.
//!
//! ## Error Categories
//!
//! 1. **Startup Errors** - fatal, the process exits before listening
//!    - [`Config`](AppError::Config) → missing or malformed environment values
//!
//! 2. **Database Errors** - surfaced to the health check as `false`, never to clients
//!    - [`Database`](AppError::Database) → connection or query failure
//!    - [`DatabaseUninitialized`](AppError::DatabaseUninitialized) → accessor used before `initialize`
//!
//! 3. **Client Errors** (4xx)
//!    - [`NotFound`](AppError::NotFound) → 404 Not Found
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn require_path(path: &str) -> Result<&str> {
//!     if path.is_empty() {
//!         return Err(AppError::Config("DATABASE_PATH cannot be empty".to_string()));
//!     }
//!     Ok(path)
//! }
//! ```

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type covering all error scenarios.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    ///
    /// **HTTP Status**: 500 Internal Server Error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SQLite connection or query failure.
    ///
    /// **HTTP Status**: 503 Service Unavailable
    #[error("Database error: {0}")]
    Database(String),

    /// The database context was used before `initialize` (or after `close`).
    ///
    /// **HTTP Status**: 503 Service Unavailable
    #[error("Database not initialized. Call initialize() first.")]
    DatabaseUninitialized,

    /// Requested resource not found.
    ///
    /// **HTTP Status**: 404 Not Found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::DatabaseUninitialized => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message.
    ///
    /// Configuration and database details stay in the logs; clients get a
    /// generic message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::Database(_) | AppError::DatabaseUninitialized => {
                "Database temporarily unavailable".to_string()
            }
            AppError::Config(_) => "An internal error occurred".to_string(),
        }
    }

    /// Variant name used as the `code` field of error responses.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Config",
            AppError::Database(_) => "Database",
            AppError::DatabaseUninitialized => "DatabaseUninitialized",
            AppError::NotFound(_) => "NotFound",
        }
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        let body = Json(json!({
            "error": self.user_message(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

/// Convert `sqlx::Error` to `AppError`.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => AppError::Database(db_err.message().to_string()),
            _ => AppError::Database(err.to_string()),
        }
    }
}

/// Convert environment lookup failures to `AppError::Config`.
impl From<lib_utils::envs::Error> for AppError {
    fn from(err: lib_utils::envs::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::DatabaseUninitialized.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Config("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_error_details_are_hidden() {
        let err = AppError::Config("SESSION_SECRET=abc is too short".into());
        assert_eq!(err.user_message(), "An internal error occurred");
        assert_eq!(err.code(), "Config");

        let err = AppError::Database("disk I/O error at /var/data/finance.db".into());
        assert_eq!(err.user_message(), "Database temporarily unavailable");
    }

    #[test]
    fn test_env_error_becomes_config_error() {
        let err: AppError = lib_utils::envs::Error::MissingEnv("PORT").into();
        assert!(matches!(err, AppError::Config(ref msg) if msg.contains("PORT")));
    }
}
