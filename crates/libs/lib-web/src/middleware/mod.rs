//! # Middleware
//!
//! Axum middleware for request stamping, logging, and security headers.
//!
//! ## Modules
//!
//! - **[`mw_req_stamp`]**: Request ID stamping
//! - **[`mw_logging`]**: Structured request/response logging
//! - **[`mw_security_headers`]**: Browser hardening headers on every response

// region: --- Modules
pub mod mw_logging;
pub mod mw_req_stamp;
pub mod mw_security_headers;
// endregion: --- Modules

// region: --- Re-exports
pub use mw_logging::log_requests;
pub use mw_req_stamp::{stamp_req, RequestStamp};
pub use mw_security_headers::set_security_headers;
// endregion: --- Re-exports
