//! user-registry - a small JSON CRUD service for user records
//!
//! - MongoDB-backed store gateway with a pooled client and per-call timeouts
//! - In-memory backend for development and tests
//! - axum HTTP API with uniform `{status, ...}` envelopes

pub mod api;
pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use error::{Error, Result};
