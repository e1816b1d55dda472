//! # Database Store
//!
//! The SQLite connection context shared by every component that needs storage.
//!
//! [`Database`] is constructed explicitly at startup and cloned into the
//! server state. Its lifecycle (`initialize`, `get`, `close`, `health_check`)
//! lives on the object itself instead of in module-level state, so a process
//! can hold several independent contexts (tests do).
//!
//! Every connection is opened with:
//!
//! - `journal_mode = WAL` so readers do not block the writer
//! - `foreign_keys = ON` since SQLite leaves enforcement off by default
//! - `synchronous = NORMAL`, which is safe under WAL
//!
//! The sqlx SQLite driver runs each connection on a dedicated worker thread,
//! so file I/O never blocks the async request loop.

#[cfg(test)]
mod tests;

// region: --- Imports
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, Result};
// endregion: --- Imports

// region: --- Types
/// Type alias for SQLite connection pool.
pub type DbPool = SqlitePool;

const MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

struct OpenDatabase {
    pool: DbPool,
    path: PathBuf,
}

/// Explicitly constructed database context.
///
/// Cloning is cheap and every clone observes the same connection.
#[derive(Clone, Default)]
pub struct Database {
    inner: Arc<RwLock<Option<OpenDatabase>>>,
}
// endregion: --- Types

// region: --- Lifecycle
impl Database {
    /// Create an uninitialized context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context and initialize it with the file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Self::new();
        db.initialize(path).await?;
        Ok(db)
    }

    /// Open the SQLite file at `path` (creating it and its parent directory
    /// if needed) and make it the current connection.
    ///
    /// A connection that was already held is closed once the new one is in
    /// place, so exactly one pool stays open per context.
    pub async fn initialize(&self, path: impl AsRef<Path>) -> Result<DbPool> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if tokio::fs::metadata(parent).await.is_err() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::Database(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
                info!("Created database directory: {:?}", parent);
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        let previous = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(OpenDatabase {
                pool: pool.clone(),
                path: path.clone(),
            });

        if let Some(previous) = previous {
            warn!(
                previous = %previous.path.display(),
                "Database re-initialized, closing previous connection"
            );
            previous.pool.close().await;
        }

        info!(path = %path.display(), "Database initialized (WAL, foreign_keys=ON, synchronous=NORMAL)");
        Ok(pool)
    }

    /// The current connection pool.
    ///
    /// # Errors
    ///
    /// [`AppError::DatabaseUninitialized`] before [`initialize`](Self::initialize)
    /// or after [`close`](Self::close).
    pub fn get(&self) -> Result<DbPool> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|open| open.pool.clone())
            .ok_or(AppError::DatabaseUninitialized)
    }

    /// Path of the currently open database file.
    pub fn path(&self) -> Option<PathBuf> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|open| open.path.clone())
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Close the current connection and return to the uninitialized state.
    ///
    /// Calling this on an uninitialized context is a no-op.
    pub async fn close(&self) {
        let open = self.inner.write().unwrap_or_else(PoisonError::into_inner).take();

        if let Some(open) = open {
            open.pool.close().await;
            info!(path = %open.path.display(), "Database closed");
        }
    }
}
// endregion: --- Lifecycle

// region: --- Health
impl Database {
    /// Whether the database can currently serve requests.
    ///
    /// Returns `false` (after logging the cause) when the context is
    /// uninitialized, the file has disappeared or cannot be opened for
    /// writing, or `SELECT 1` fails or exceeds [`HEALTH_CHECK_TIMEOUT`].
    /// Never panics or propagates an error.
    pub async fn health_check(&self) -> bool {
        let (pool, path) = {
            let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            match guard.as_ref() {
                Some(open) => (open.pool.clone(), open.path.clone()),
                None => {
                    warn!("Database health check failed: {}", AppError::DatabaseUninitialized);
                    return false;
                }
            }
        };

        if let Err(reason) = check_file_writable(&path).await {
            error!(path = %path.display(), "Database health check failed: {reason}");
            return false;
        }

        let select_one = sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&pool);
        match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, select_one).await {
            Ok(Ok(_)) => {
                debug!("Database health check passed");
                true
            }
            Ok(Err(e)) => {
                error!(error = %e, "Database health check failed");
                false
            }
            Err(_) => {
                error!(
                    timeout_ms = HEALTH_CHECK_TIMEOUT.as_millis(),
                    "Database health check timed out"
                );
                false
            }
        }
    }
}

/// The file must exist, carry no read-only bit, and accept a write handle.
///
/// Opening for write goes through the same access check SQLite hits on its
/// next write (ownership, ACLs, read-only mounts), without touching the data.
/// The permission bit is checked separately because privileged users can
/// open read-only files for writing.
async fn check_file_writable(path: &Path) -> std::result::Result<(), String> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| format!("file unreachable: {e}"))?;
    if meta.permissions().readonly() {
        return Err("file is read-only".to_string());
    }

    tokio::fs::OpenOptions::new()
        .write(true)
        .open(path)
        .await
        .map_err(|e| format!("file not writable: {e}"))?;
    Ok(())
}
// endregion: --- Health
