//! PostgreSQL repositories backing [`crate::PgCredentialStore`].

pub mod permission;
pub mod user;

use std::future::Future;
use std::time::Duration;

use citygate_core::error::{AppError, ErrorKind};
use citygate_core::result::AppResult;

pub use permission::PermissionRepository;
pub use user::UserRepository;

/// Await a query under a deadline, mapping both failure modes into `AppError`.
pub(crate) async fn bounded<T, F>(limit: Duration, context: &'static str, query: F) -> AppResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, query).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(AppError::with_source(ErrorKind::Database, context, e)),
        Err(elapsed) => Err(AppError::with_source(
            ErrorKind::Timeout,
            format!("{context}: query timed out"),
            elapsed,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, sqlx::Error>(1)
        };
        let err = bounded(Duration::from_secs(1), "slow query", slow)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_bounded_maps_query_error() {
        let failing = async { Err::<i32, _>(sqlx::Error::RowNotFound) };
        let err = bounded(Duration::from_secs(1), "lookup", failing)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(err.message, "lookup");
    }
}
