//! bizreviews CLI - REST API over businesses and reviews
//!
//! Subcommands:
//! - `serve`: run the HTTP API (PostgreSQL or `--in-memory`)
//! - `init-db`: create the tables and exit

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "bizreviews",
    author,
    version,
    about = "REST API for businesses and their reviews",
    long_about = "CRUD over businesses and reviews backed by PostgreSQL. \
                  Configure the database with DATABASE_URL, or with \
                  INSTANCE_CONNECTION_NAME plus DB_USER, DB_PASS and DB_NAME."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG still wins)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create the businesses and reviews tables if absent
    InitDb(commands::init_db::InitDbArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env in the working directory; existing variables win
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    match dotenv {
        Ok(path) => tracing::debug!("Loaded .env from {}", path.display()),
        Err(_) => tracing::debug!("No .env file found, using environment only"),
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::InitDb(args) => commands::run_init_db(args).await?,
    }
    Ok(())
}
