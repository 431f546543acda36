//! Permission sync job: projects the domain/role/permission graph into
//! per-domain cache sets.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use citygate_cache::{CacheManager, keys};
use citygate_core::config::worker::SyncStrategy;
use citygate_core::error::AppError;
use citygate_core::result::AppResult;
use citygate_core::traits::cache::CacheProvider;
use citygate_database::CredentialStore;
use citygate_entity::permission::model::DomainPermission;

use crate::executor::{JobExecutionError, JobHandler, JobRequest};

/// Job type string used for registration and scheduling.
pub const PERMISSION_SYNC_JOB: &str = "permission_sync";

/// Outcome of one sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub strategy: SyncStrategy,
    pub domains_updated: usize,
    pub permissions_written: usize,
    pub duration_ms: u64,
}

/// Rebuilds every `permissions:<domain>` set from the credential store.
#[derive(Debug)]
pub struct PermissionSyncJob {
    store: Arc<dyn CredentialStore>,
    cache: Arc<CacheManager>,
    strategy: SyncStrategy,
}

impl PermissionSyncJob {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        cache: Arc<CacheManager>,
        strategy: SyncStrategy,
    ) -> Self {
        Self {
            store,
            cache,
            strategy,
        }
    }

    pub fn strategy(&self) -> SyncStrategy {
        self.strategy
    }

    /// Run one full sync.
    ///
    /// Every domain is attempted even when an earlier one fails; the run
    /// then returns an error naming the failed domains. Running again
    /// converges to the same cache contents.
    pub async fn sync(&self) -> AppResult<SyncReport> {
        let started = Instant::now();
        let mappings = self.store.domain_permission_mappings().await?;
        let grouped = group_by_domain(mappings);

        info!(
            domains = grouped.len(),
            strategy = %self.strategy,
            "Starting permission sync"
        );

        let mut failed = Vec::new();
        let mut permissions_written = 0;

        for (domain, permissions) in &grouped {
            let members: Vec<String> = permissions.iter().cloned().collect();
            let result = match self.strategy {
                SyncStrategy::Replace => self.replace(domain, &members).await,
                SyncStrategy::Staging => self.stage_and_swap(domain, &members).await,
            };

            match result {
                Ok(()) => permissions_written += members.len(),
                Err(e) => {
                    error!(
                        domain = %domain,
                        set_size = members.len(),
                        error = %e,
                        "Failed to sync domain permissions"
                    );
                    failed.push(domain.clone());
                }
            }
        }

        if !failed.is_empty() {
            return Err(AppError::cache(format!(
                "Permission sync failed for domains: {}",
                failed.join(", ")
            )));
        }

        let report = SyncReport {
            strategy: self.strategy,
            domains_updated: grouped.len(),
            permissions_written,
            duration_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            domains = report.domains_updated,
            permissions = report.permissions_written,
            duration_ms = report.duration_ms,
            "Permission sync complete"
        );

        Ok(report)
    }

    async fn replace(&self, domain: &str, members: &[String]) -> AppResult<()> {
        let key = keys::permissions(domain);
        self.cache.delete(&key).await?;
        if !members.is_empty() {
            self.cache.set_add(&key, members).await?;
        }
        Ok(())
    }

    async fn stage_and_swap(&self, domain: &str, members: &[String]) -> AppResult<()> {
        let live = keys::permissions(domain);
        if members.is_empty() {
            return self.cache.delete(&live).await;
        }

        let staging = keys::permissions_staging(domain);
        self.cache.delete(&staging).await?;
        self.cache.set_add(&staging, members).await?;
        self.cache.rename(&staging, &live).await
    }
}

fn group_by_domain(mappings: Vec<DomainPermission>) -> BTreeMap<String, BTreeSet<String>> {
    let mut grouped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for mapping in mappings {
        grouped
            .entry(mapping.domain)
            .or_default()
            .insert(mapping.permission_name);
    }
    grouped
}

#[async_trait]
impl JobHandler for PermissionSyncJob {
    fn job_type(&self) -> &str {
        PERMISSION_SYNC_JOB
    }

    async fn execute(&self, _job: &JobRequest) -> Result<Option<Value>, JobExecutionError> {
        let report = self
            .sync()
            .await
            .map_err(|e| JobExecutionError::Transient(e.to_string()))?;

        let value = serde_json::to_value(&report).map_err(AppError::from)?;
        Ok(Some(value))
    }
}
