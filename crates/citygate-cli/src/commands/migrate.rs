//! Database migration management commands.

use clap::{Args, Subcommand};

use citygate_core::config::AppConfig;
use citygate_core::error::AppError;
use citygate_database::DatabasePool;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    if config.database.provider != "postgres" {
        return Err(AppError::configuration(format!(
            "Migrations require the postgres provider, not '{}'",
            config.database.provider
        )));
    }

    match &args.command {
        MigrateCommand::Run => {
            let pool = DatabasePool::connect(&config.database).await?;
            println!("Running database migrations...");
            citygate_database::migration::run_migrations(pool.pool()).await?;
            pool.close().await;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
