//! CLI command definitions and dispatch.

pub mod migrate;
pub mod sync;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use citygate_cache::CacheManager;
use citygate_core::config::AppConfig;
use citygate_core::error::AppError;
use citygate_database::CredentialStore;

use crate::output::OutputFormat;

/// CityGate: authentication, session, and permission service
#[derive(Debug, Parser)]
#[command(name = "citygate", version, about, long_about = None)]
pub struct Cli {
    /// Environment overlay to load (`config/<env>.toml`)
    #[arg(long, env = "CITYGATE_ENV", default_value = "development")]
    pub env: String,

    /// Extra configuration file merged after the overlays
    #[arg(short, long, env = "CITYGATE_CONFIG")]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rebuild every `permissions:<domain>` cache set
    SyncPermissions(sync::SyncArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User and session management
    User(user::UserArgs),
}

impl Cli {
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load(&self.env, self.config.as_deref())
    }

    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::SyncPermissions(args) => sync::execute(args, config, self.format).await,
            Commands::Migrate(args) => migrate::execute(args, config).await,
            Commands::User(args) => user::execute(args, config, self.format).await,
        }
    }
}

/// Helper: open the configured cache.
///
/// The memory provider is refused: its contents die with this process, so
/// nothing written here would reach a running server.
pub async fn open_cache(config: &AppConfig) -> Result<Arc<CacheManager>, AppError> {
    if config.cache.provider == "memory" {
        return Err(AppError::configuration(
            "The memory cache provider is private to one process; \
             set cache.provider = \"redis\" to run this command",
        ));
    }
    Ok(Arc::new(CacheManager::new(&config.cache).await?))
}

/// Helper: open the configured credential store without migrating
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn CredentialStore>, AppError> {
    let mut database = config.database.clone();
    database.run_migrations = false;
    citygate_database::open_store(&database, config.session.public_domain.as_deref()).await
}
