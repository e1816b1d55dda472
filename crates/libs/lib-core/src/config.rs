//! # Application Configuration
//!
//! This module manages application configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `PORT` | **Yes** | - (`.env.example` ships `3000`) |
//! | `DATABASE_PATH` | No | `./data/finance.db` |
//! | `SESSION_SECRET` | No | - |
//! | `TELEGRAM_BOT_TOKEN` | No | - |
//! | `NODE_ENV` | No | `development` |
//! | `FRONTEND_URL` | No | `http://localhost:5173` |
//!
//! The config is built once at startup and handed to the server state; there is
//! no global instance.
//!
//! ```rust,no_run
//! use lib_core::config::Config;
//!
//! let config = Config::load().expect("invalid configuration");
//! println!("listening on port {}", config.port);
//! ```

use std::fmt;
use std::path::PathBuf;

use lib_utils::envs::{self, EnvSource, ProcessEnv};
use lib_utils::validation::validate_http_origin;

use crate::error::{AppError, Result};

/// Port written to `.env.example`.
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_PATH: &str = "./data/finance.db";
pub const DEFAULT_NODE_ENV: &str = "development";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

/// Application configuration loaded from environment variables.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// TCP port the HTTP listener binds on `0.0.0.0`.
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Secret for signing session cookies
    pub session_secret: Option<String>,

    /// Telegram bot API token
    pub telegram_bot_token: Option<String>,

    /// Runtime environment (`development`, `test`, `production`)
    pub node_env: String,

    /// The single origin allowed by CORS
    pub frontend_url: String,
}

impl Config {
    /// Load and validate configuration from the process environment.
    pub fn load() -> Result<Self> {
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_source(&ProcessEnv)
    }

    /// Load configuration from an arbitrary [`EnvSource`].
    pub fn from_source(source: &impl EnvSource) -> Result<Self> {
        let port = envs::get_env_parse::<u16>(source, "PORT").map_err(|e| match e {
            envs::Error::WrongFormat(_) => {
                AppError::Config("PORT must be a number between 1 and 65535".to_string())
            }
            envs::Error::MissingEnv(_) => AppError::Config(format!(
                "PORT must be set in environment (e.g. PORT={DEFAULT_PORT})"
            )),
        })?;

        Ok(Self {
            port,
            database_path: PathBuf::from(envs::get_env_or(
                source,
                "DATABASE_PATH",
                DEFAULT_DATABASE_PATH,
            )),
            session_secret: envs::get_env_opt(source, "SESSION_SECRET"),
            telegram_bot_token: envs::get_env_opt(source, "TELEGRAM_BOT_TOKEN"),
            node_env: envs::get_env_or(source, "NODE_ENV", DEFAULT_NODE_ENV),
            frontend_url: envs::get_env_or(source, "FRONTEND_URL", DEFAULT_FRONTEND_URL),
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(AppError::Config(
                "PORT must be a number between 1 and 65535".to_string(),
            ));
        }

        if self.database_path.file_name().is_none() {
            return Err(AppError::Config(format!(
                "DATABASE_PATH must name a file, got {}",
                self.database_path.display()
            )));
        }

        validate_http_origin(&self.frontend_url, "FRONTEND_URL").map_err(AppError::Config)?;
        if axum::http::HeaderValue::from_str(&self.frontend_url).is_err() {
            return Err(AppError::Config(
                "FRONTEND_URL must be a valid header value".to_string(),
            ));
        }

        Ok(())
    }

    /// `NODE_ENV=production`, case-insensitive.
    pub fn is_production(&self) -> bool {
        self.node_env.eq_ignore_ascii_case("production")
    }
}

// Secrets never reach the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &Option<String>) -> &'static str {
            if value.is_some() {
                "<redacted>"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("Config")
            .field("port", &self.port)
            .field("database_path", &self.database_path)
            .field("session_secret", &redact(&self.session_secret))
            .field("telegram_bot_token", &redact(&self.telegram_bot_token))
            .field("node_env", &self.node_env)
            .field("frontend_url", &self.frontend_url)
            .finish()
    }
}
