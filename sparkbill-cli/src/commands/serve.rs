//! HTTP server command
//!
//! Prepares storage (schema and default rate card) and runs the API until
//! Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use sparkbill_server::db::{migrations, seed, MemoryStore, PgStore, Store};
use sparkbill_server::http::{run_server, ServerConfig};

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    #[command(flatten)]
    pub db: DatabaseArgs,

    /// Directory with the built front-end, served at / when it exists
    #[arg(long, default_value = "dist/public")]
    pub static_dir: PathBuf,

    /// Only allow browser calls from localhost development ports
    #[arg(long)]
    pub cors_localhost: bool,

    /// Keep all data in process memory instead of PostgreSQL
    #[arg(long)]
    pub memory: bool,

    /// Skip inserting the default rate card
    #[arg(long)]
    pub no_seed: bool,
}

async fn open_store(args: &ServeArgs) -> Result<Arc<dyn Store>> {
    if args.memory {
        tracing::warn!("Using in-memory storage; data is lost on exit");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = args.db.connect().await?;
    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;
    Ok(Arc::new(PgStore::new(pool)))
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!("Starting sparkbill server on {}", args.bind);

    let store = open_store(&args).await?;

    if !args.no_seed {
        seed::run(store.as_ref())
            .await
            .context("Failed to seed default rate card")?;
    }

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: !args.cors_localhost,
        static_dir: Some(args.static_dir),
    };

    // Run server (blocks until shutdown)
    run_server(store, config).await.context("Server error")?;

    Ok(())
}
