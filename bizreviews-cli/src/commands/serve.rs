//! HTTP server command
//!
//! Connects the pool, initializes the schema, and serves the API.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use bizreviews_server::db::{schema, DEFAULT_MAX_CONNECTIONS};
use bizreviews_server::{run_server, AppState, ServerConfig};

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Keep data in memory instead of PostgreSQL (lost on exit).
    /// Takes precedence over any database configuration.
    #[arg(long)]
    pub in_memory: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let state = if args.in_memory {
        if args.database.database_url.is_some() {
            tracing::info!("--in-memory set, ignoring DATABASE_URL");
        }
        tracing::warn!("Using in-memory storage; data is lost on shutdown");
        AppState::in_memory()
    } else {
        let pool = args.database.connect(args.max_connections).await?;

        // Businesses must exist; a reviews failure is only logged
        schema::initialize(&pool)
            .await
            .context("Failed to create businesses table")?;

        AppState::postgres(pool)
    };

    tracing::info!("Starting bizreviews server on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Run server (blocks until shutdown)
    run_server(state, config).await.context("Server error")?;

    Ok(())
}
