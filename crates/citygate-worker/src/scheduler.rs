//! Cron-based scheduler for recurring jobs inside the server process.

use std::sync::Arc;

use serde_json::Value;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use citygate_core::error::AppError;

use crate::executor::{JobExecutor, JobRequest};

/// Manages cron-scheduled jobs that dispatch through a [`JobExecutor`].
pub struct CronScheduler {
    scheduler: JobScheduler,
    executor: Arc<JobExecutor>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl CronScheduler {
    pub async fn new(executor: Arc<JobExecutor>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            executor,
        })
    }

    /// Run `job_type` on a six-field cron expression.
    ///
    /// Failures are logged; the next tick runs again regardless.
    pub async fn schedule(&self, cron_expr: &str, job_type: &str) -> Result<(), AppError> {
        if !self.executor.has_handler(job_type) {
            return Err(AppError::configuration(format!(
                "Cannot schedule unknown job type '{job_type}'"
            )));
        }

        let executor = Arc::clone(&self.executor);
        let job_type_owned = job_type.to_string();

        let job = CronJob::new_async(cron_expr, move |_uuid, _lock| {
            let executor = Arc::clone(&executor);
            let job_type = job_type_owned.clone();
            Box::pin(async move {
                let request = JobRequest::new(job_type, Value::Null);
                match executor.execute(&request).await {
                    Ok(result) => {
                        tracing::info!(
                            job_id = %request.id,
                            job_type = %request.job_type,
                            result = ?result,
                            "Scheduled job completed"
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            job_id = %request.id,
                            job_type = %request.job_type,
                            error = %e,
                            "Scheduled job failed"
                        );
                    }
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid cron expression '{cron_expr}': {e}"))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add cron job: {e}")))?;

        tracing::info!(job_type = %job_type, cron = %cron_expr, "Scheduled recurring job");
        Ok(())
    }

    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use citygate_core::error::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn test_unknown_job_type_rejected() {
        let scheduler = CronScheduler::new(Arc::new(JobExecutor::new()))
            .await
            .unwrap();
        let err = scheduler
            .schedule("0 */15 * * * *", "permission_sync")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
