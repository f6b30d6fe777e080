//! Schema bootstrap command

use anyhow::{Context, Result};

use sparkbill_server::db::migrations;

use super::DatabaseArgs;

/// Create tables and indexes if they are missing
pub async fn run_migrate(args: DatabaseArgs) -> Result<()> {
    let pool = args.connect().await?;
    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    println!("Schema is up to date");
    Ok(())
}
