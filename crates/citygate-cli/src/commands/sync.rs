//! Permission cache sync command.

use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use citygate_core::config::AppConfig;
use citygate_core::config::worker::SyncStrategy;
use citygate_core::error::AppError;
use citygate_worker::PermissionSyncJob;

use crate::output::{self, OutputFormat};

/// Arguments for the sync-permissions command
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Override `worker.sync_strategy`
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Delete each live set, then add its members
    Replace,
    /// Build a staging set and rename it over the live key
    Staging,
}

impl From<StrategyArg> for SyncStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Replace => SyncStrategy::Replace,
            StrategyArg::Staging => SyncStrategy::Staging,
        }
    }
}

/// Sync report row for table output
#[derive(Debug, Serialize, Tabled)]
struct SyncRow {
    strategy: String,
    domains: usize,
    permissions: usize,
    duration_ms: u64,
}

/// Execute the sync. Any failure is returned so the process exits non-zero.
pub async fn execute(
    args: &SyncArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let strategy = args
        .strategy
        .map(SyncStrategy::from)
        .unwrap_or(config.worker.sync_strategy);

    let cache = super::open_cache(config).await?;
    let store = super::open_store(config).await?;
    let job = PermissionSyncJob::new(store, cache, strategy);

    let report = job.sync().await?;

    output::print_list(
        &[SyncRow {
            strategy: report.strategy.to_string(),
            domains: report.domains_updated,
            permissions: report.permissions_written,
            duration_ms: report.duration_ms,
        }],
        format,
    );
    output::print_success("Permission cache synchronized.");
    Ok(())
}
