//! bizreviews-server: REST API over businesses and their reviews
//!
//! Each route parses a JSON body or query string, runs one parameterized
//! statement through a repository, and returns the row(s) as JSON with
//! links built from the request's own root URL.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{ConfigError, DatabaseConfig};
pub use http::{build_router, run_server, AppState, ServerConfig};
