//! Built-in job handler implementations.

pub mod permission_sync;

pub use permission_sync::{PERMISSION_SYNC_JOB, PermissionSyncJob, SyncReport};
