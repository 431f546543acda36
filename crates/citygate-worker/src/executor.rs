//! Job executor, dispatching jobs to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use citygate_core::error::AppError;

/// A single invocation of a job.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub id: Uuid,
    pub job_type: String,
    pub payload: Value,
}

impl JobRequest {
    pub fn new(job_type: impl Into<String>, payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_type: job_type.into(),
            payload,
        }
    }
}

/// Trait for job handler implementations
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// The job type this handler processes
    fn job_type(&self) -> &str;

    /// Execute the job
    async fn execute(&self, job: &JobRequest) -> Result<Option<Value>, JobExecutionError>;
}

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure, do not retry
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure, a later run may succeed
    #[error("Transient job failure: {0}")]
    Transient(String),

    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

/// Dispatches jobs to the appropriate handler based on job_type
#[derive(Debug, Default)]
pub struct JobExecutor {
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job handler, replacing any previous one for its type
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type().to_string();
        tracing::info!(job_type = %job_type, "Registered job handler");
        self.handlers.insert(job_type, handler);
    }

    /// Execute a job by dispatching to the correct handler
    pub async fn execute(&self, job: &JobRequest) -> Result<Option<Value>, JobExecutionError> {
        let handler = self.handlers.get(&job.job_type).ok_or_else(|| {
            JobExecutionError::Permanent(format!(
                "No handler registered for job type '{}'",
                job.job_type
            ))
        })?;

        tracing::info!(job_id = %job.id, job_type = %job.job_type, "Executing job");
        handler.execute(job).await
    }

    pub fn has_handler(&self, job_type: &str) -> bool {
        self.handlers.contains_key(job_type)
    }
}
