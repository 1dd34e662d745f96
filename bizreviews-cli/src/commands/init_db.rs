//! Schema initialization command

use anyhow::{Context, Result};
use clap::Parser;

use bizreviews_server::db::schema;

use super::DatabaseArgs;

/// Arguments for the init-db command
#[derive(Parser, Debug)]
pub struct InitDbArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Create the tables and exit
pub async fn run_init_db(args: InitDbArgs) -> Result<()> {
    let pool = args.database.connect(1).await?;

    schema::initialize(&pool)
        .await
        .context("Failed to create businesses table")?;

    pool.close().await;
    tracing::info!("Schema initialized");
    Ok(())
}
