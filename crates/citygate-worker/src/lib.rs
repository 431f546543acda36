//! Background jobs and scheduled tasks for CityGate.
//!
//! This crate provides:
//! - A job executor that dispatches jobs to the correct handler
//! - The permission sync job that rebuilds `permissions:<domain>` sets
//! - A cron scheduler that runs registered jobs inside the server process

pub mod executor;
pub mod jobs;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler, JobRequest};
pub use jobs::{PERMISSION_SYNC_JOB, PermissionSyncJob, SyncReport};
pub use scheduler::CronScheduler;
