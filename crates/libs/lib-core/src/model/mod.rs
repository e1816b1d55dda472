//! # Model Layer
//!
//! Persistence for the finance domain. Only the connection context exists so
//! far; table repositories will live next to it under [`store`].

pub mod store;
