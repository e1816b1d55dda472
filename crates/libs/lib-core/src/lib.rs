//! # Core Library
//!
//! Configuration, error type, and the database context for the finance backend.

pub mod config;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use model::store::{Database, DbPool};
