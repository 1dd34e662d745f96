//! Database layer - connection pool, schema, and repositories
//!
//! # Design Principles
//!
//! - Connection pool (default 5 connections) - no shared single connection
//! - Handlers see repository traits, never the pool
//! - Rely on DB constraints, handle conflicts - no check-then-insert

pub mod memory;
pub mod pool;
pub mod repos;
pub mod schema;

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use repos::*;
pub use sqlx::PgPool;
