//! sparkbill CLI - bills and rate cards backend
//!
//! Entry point for the `sparkbill` binary:
//! - `serve`: run the HTTP API (PostgreSQL or in-memory storage)
//! - `migrate`: create the schema
//! - `seed`: insert the default rate card when none exists

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "sparkbill",
    author,
    version,
    about = "Bills and rate cards backend for an electrical contracting business"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create database tables and indexes
    Migrate(commands::DatabaseArgs),
    /// Insert the default rate card if no rate card exists
    Seed(commands::DatabaseArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_file = config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init_tracing(&TracingConfig { debug: cli.debug }).ok();
    if let Some(path) = env_file {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
        Commands::Seed(args) => commands::run_seed(args).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["sparkbill", "serve", "--memory"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind.to_string(), "127.0.0.1:8000");
        assert_eq!(args.static_dir.to_str(), Some("dist/public"));
        assert!(args.memory);
        assert!(!args.cors_localhost);
        assert!(!args.no_seed);
    }

    #[test]
    fn debug_is_global() {
        let cli = Cli::try_parse_from([
            "sparkbill",
            "migrate",
            "--debug",
            "--database-url",
            "postgres://localhost/sparkbill",
        ])
        .unwrap();
        assert!(cli.debug);
        let Commands::Migrate(args) = cli.command else {
            panic!("expected migrate");
        };
        assert_eq!(args.max_connections, 5);
        assert_eq!(
            args.database_url.as_deref(),
            Some("postgres://localhost/sparkbill")
        );
    }
}
