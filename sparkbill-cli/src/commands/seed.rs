//! Default data command

use anyhow::{Context, Result};

use sparkbill_server::db::seed::{self, SeedOutcome};
use sparkbill_server::db::{migrations, PgStore};

use super::DatabaseArgs;

/// Ensure the schema exists, then insert the default rate card if no rate
/// card exists yet.
pub async fn run_seed(args: DatabaseArgs) -> Result<()> {
    let pool = args.connect().await?;
    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    let store = PgStore::new(pool);
    match seed::run(&store).await.context("Failed to seed")? {
        SeedOutcome::Inserted { items } => {
            println!("Inserted default rate card with {} items", items)
        }
        SeedOutcome::Skipped => println!("Rate cards already exist, nothing to do"),
    }
    Ok(())
}
