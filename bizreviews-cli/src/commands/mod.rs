//! Command implementations for bizreviews CLI

pub mod init_db;
pub mod serve;

use anyhow::{Context, Result};
use clap::Args;

use bizreviews_server::db::{create_pool_with_options, PgPool};
use bizreviews_server::DatabaseConfig;

// Re-export main dispatcher functions for flat access from main.rs
pub use init_db::run_init_db;
pub use serve::run_serve;

/// Database connection arguments shared by commands
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Database URL (overrides INSTANCE_CONNECTION_NAME)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

impl DatabaseArgs {
    /// Resolve configuration and open a pool.
    pub async fn connect(&self, max_connections: u32) -> Result<PgPool> {
        let config = match &self.database_url {
            Some(url) if !url.is_empty() => DatabaseConfig::Url(url.clone()),
            _ => DatabaseConfig::from_env()?,
        };
        tracing::info!("Connecting to {}", config.describe());

        let options = config.connect_options()?;
        create_pool_with_options(options, max_connections)
            .await
            .context("Failed to create database pool")
    }
}
