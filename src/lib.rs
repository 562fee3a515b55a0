//! Todos - a minimal todo CRUD service
//!
//! One resource, four operations:
//! - Create, List, Update (partial patch) and Delete over HTTP/JSON
//! - Backed by a single SQLite table managed through sqlx
//! - Configured from file + environment, CORS-restricted to one origin

pub mod api;
pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use error::{Error, Result};
