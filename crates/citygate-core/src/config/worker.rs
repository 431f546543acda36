//! Background worker configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether scheduled jobs run inside the server process.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Six-field cron expression for the permission sync job.
    #[serde(default = "default_sync_cron")]
    pub permission_sync_cron: String,
    /// Run one permission sync before the server starts accepting traffic.
    #[serde(default = "default_true")]
    pub sync_on_startup: bool,
    /// How each domain's permission set is rewritten.
    #[serde(default)]
    pub sync_strategy: SyncStrategy,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            permission_sync_cron: default_sync_cron(),
            sync_on_startup: true,
            sync_strategy: SyncStrategy::default(),
        }
    }
}

/// Rewrite strategy for `permissions:<domain>` sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStrategy {
    /// Delete the live set, then add the new members.
    #[default]
    Replace,
    /// Build a staging set and rename it over the live key.
    Staging,
}

impl fmt::Display for SyncStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStrategy::Replace => write!(f, "replace"),
            SyncStrategy::Staging => write!(f, "staging"),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sync_cron() -> String {
    "0 */15 * * * *".to_string()
}
